//! Durable slot storage for the session credential and the [`TokenStore`] that owns it.
//!
//! Backends implement [`SlotStore`], a synchronous key/value contract over the two named slots
//! described by [`Slot`]. The contract is synchronous: the session writes through to storage
//! before any consumer can observe its new in-memory value.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

// self
use crate::{
	_prelude::*,
	auth::{Credential, UserId},
	obs::trace_event,
};

/// Named storage slots holding the session credential.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Slot {
	/// Bearer token string.
	#[serde(rename = "userToken")]
	UserToken,
	/// User identifier string.
	#[serde(rename = "userId")]
	UserId,
}
impl Slot {
	/// Every slot, in write order.
	pub const ALL: [Slot; 2] = [Slot::UserToken, Slot::UserId];

	/// Stable storage key for the slot.
	pub const fn key(self) -> &'static str {
		match self {
			Slot::UserToken => "userToken",
			Slot::UserId => "userId",
		}
	}
}
impl Display for Slot {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.key())
	}
}

/// Storage backend contract for the credential slots.
pub trait SlotStore
where
	Self: Send + Sync,
{
	/// Reads a slot, returning `None` when it is absent.
	fn get(&self, slot: Slot) -> Result<Option<String>, StoreError>;

	/// Writes (or replaces) a slot.
	fn set(&self, slot: Slot, value: &str) -> Result<(), StoreError>;

	/// Deletes a slot. Removing an absent slot succeeds.
	fn remove(&self, slot: Slot) -> Result<(), StoreError>;
}

/// Error type produced by [`SlotStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

/// Sole reader and writer of the credential slots.
#[derive(Clone)]
pub struct TokenStore {
	backend: Arc<dyn SlotStore>,
}
impl TokenStore {
	/// Wraps a slot backend.
	pub fn new(backend: Arc<dyn SlotStore>) -> Self {
		Self { backend }
	}

	/// Loads the persisted credential.
	///
	/// Both slots present yields a credential and both absent yields `None`. A half-written pair
	/// (one slot missing, or a user id that does not parse) is removed and reported as `None`.
	pub fn load(&self) -> Result<Option<Credential>, StoreError> {
		let token = self.backend.get(Slot::UserToken)?.filter(|token| !token.is_empty());
		let user_id = self.backend.get(Slot::UserId)?.filter(|id| !id.is_empty());

		match (token, user_id) {
			(None, None) => Ok(None),
			(Some(token), Some(raw_id)) => match raw_id.parse::<UserId>() {
				Ok(user_id) => Ok(Some(Credential::new(token, user_id))),
				Err(e) => {
					trace_event!(warn, error = %e, "Discarding stored session with an invalid user id.");

					self.clear()?;

					Ok(None)
				},
			},
			(token, _) => {
				trace_event!(
					warn,
					token_present = token.is_some(),
					"Discarding a partially stored session."
				);

				self.clear()?;

				Ok(None)
			},
		}
	}

	/// Persists both slots for the credential.
	///
	/// When the user id cannot be written, the token slot is restored to its previous value so
	/// storage never pairs the new token with the old user id. If that restore fails too, the
	/// user id slot is removed and the next [`load`](Self::load) discards the half-written pair.
	pub fn persist(&self, credential: &Credential) -> Result<(), StoreError> {
		let previous_token = self.backend.get(Slot::UserToken)?;

		self.backend.set(Slot::UserToken, credential.token.expose())?;

		let Err(e) = self.backend.set(Slot::UserId, &credential.user_id.to_string()) else {
			return Ok(());
		};
		let restored = match previous_token {
			Some(token) => self.backend.set(Slot::UserToken, &token),
			None => self.backend.remove(Slot::UserToken),
		};

		if let Err(restore_error) = restored {
			trace_event!(warn, error = %restore_error, "Failed to restore the previous token.");

			if let Err(remove_error) = self.backend.remove(Slot::UserId) {
				trace_event!(warn, error = %remove_error, "Failed to drop the stale user id.");
			}
		}

		Err(e)
	}

	/// Removes both slots, attempting each even if the first removal fails.
	pub fn clear(&self) -> Result<(), StoreError> {
		let mut first_error = None;

		for slot in Slot::ALL {
			if let Err(e) = self.backend.remove(slot) {
				first_error.get_or_insert(e);
			}
		}

		match first_error {
			Some(e) => Err(e),
			None => Ok(()),
		}
	}
}
impl Debug for TokenStore {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("TokenStore(..)")
	}
}
