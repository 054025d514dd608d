//! Tab-wide session holder that writes through to the [`TokenStore`].
//!
//! [`SessionContext`] is the only owner of the in-memory credential. It hydrates from storage
//! the first time it is touched, persists every change before publishing it, and then calls the
//! registered listeners with the new value. Listeners run after the internal lock is released,
//! so they may read or mutate the context again (the access guard clears expired sessions from
//! inside its listener).

// std
use std::sync::atomic::{AtomicU64, Ordering};
// self
use crate::{
	_prelude::*,
	auth::{Credential, expiry},
	obs::trace_event,
	store::TokenStore,
};

/// Callback invoked with the new session value after every change.
pub type SessionListener = Arc<dyn Fn(Option<&Credential>) + Send + Sync>;

/// Handle returned by [`SessionContext::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Default)]
struct SessionState {
	hydrated: bool,
	current: Option<Credential>,
	revision: u64,
}

/// Process-wide holder of the current credential.
pub struct SessionContext {
	store: TokenStore,
	state: Mutex<SessionState>,
	listeners: Mutex<Vec<(SubscriptionId, SessionListener)>>,
	next_subscription: AtomicU64,
}
impl SessionContext {
	/// Creates a context over the provided store. Storage is not touched until first use.
	pub fn new(store: TokenStore) -> Self {
		Self {
			store,
			state: Mutex::new(SessionState::default()),
			listeners: Mutex::new(Vec::new()),
			next_subscription: AtomicU64::new(0),
		}
	}

	/// Current session value.
	pub fn read(&self) -> Option<Credential> {
		let mut state = self.state.lock();

		self.hydrate(&mut state);

		state.current.clone()
	}

	/// Returns `true` when a credential is held (expired or not).
	pub fn is_present(&self) -> bool {
		let mut state = self.state.lock();

		self.hydrate(&mut state);

		state.current.is_some()
	}

	/// Current credential, or [`Error::MissingSession`] when none is held.
	pub fn require(&self) -> Result<Credential> {
		self.read().ok_or(Error::MissingSession)
	}

	/// Current credential if it is still valid at `now`.
	///
	/// Fails with [`Error::MissingSession`], [`Error::AuthExpired`], or [`Error::Decode`].
	pub fn require_valid_at(&self, now: OffsetDateTime) -> Result<Credential> {
		let credential = self.require()?;

		expiry::ensure_valid_at(&credential, now)?;

		Ok(credential)
	}

	/// Replaces the session value.
	///
	/// The credential is persisted first; the in-memory value only changes, and listeners only
	/// run, once storage accepted it. On a storage failure the previous session stays in place.
	pub fn write(&self, credential: Credential) -> Result<()> {
		{
			let mut state = self.state.lock();

			self.hydrate(&mut state);
			self.store.persist(&credential)?;

			state.current = Some(credential.clone());
			state.revision += 1;
		}

		self.publish(Some(&credential));

		Ok(())
	}

	/// Sets the session to absent and deletes the persisted entry.
	///
	/// The in-memory value is cleared and listeners run even when the storage removal fails, so
	/// a logout always takes effect in this tab; the storage error is still returned.
	pub fn clear(&self) -> Result<()> {
		let removal = {
			let mut state = self.state.lock();

			state.hydrated = true;

			let removal = self.store.clear();

			state.current = None;
			state.revision += 1;

			removal
		};

		if let Err(e) = &removal {
			trace_event!(warn, error = %e, "Failed to delete the persisted session.");
		}

		self.publish(None);

		removal.map_err(Error::from)
	}

	/// Monotonic counter incremented on every `write` and `clear`.
	pub fn revision(&self) -> u64 {
		self.state.lock().revision
	}

	/// Registers a listener called after every change.
	pub fn subscribe(&self, listener: SessionListener) -> SubscriptionId {
		let id = SubscriptionId(self.next_subscription.fetch_add(1, Ordering::Relaxed));

		self.listeners.lock().push((id, listener));

		id
	}

	/// Removes a listener. Returns `false` if it was not registered.
	pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
		let mut listeners = self.listeners.lock();
		let before = listeners.len();

		listeners.retain(|(registered, _)| *registered != id);

		listeners.len() != before
	}

	fn hydrate(&self, state: &mut SessionState) {
		if state.hydrated {
			return;
		}

		state.hydrated = true;
		state.current = match self.store.load() {
			Ok(current) => current,
			Err(e) => {
				trace_event!(warn, error = %e, "Failed to hydrate the session; starting logged out.");

				None
			},
		};
	}

	fn publish(&self, current: Option<&Credential>) {
		let listeners = self
			.listeners
			.lock()
			.iter()
			.map(|(_, listener)| listener.clone())
			.collect::<Vec<_>>();

		for listener in listeners {
			listener(current);
		}
	}
}
impl Debug for SessionContext {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		let state = self.state.lock();

		f.debug_struct("SessionContext")
			.field("hydrated", &state.hydrated)
			.field("present", &state.current.is_some())
			.field("revision", &state.revision)
			.finish()
	}
}
