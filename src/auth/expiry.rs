//! Expiry checks for stored credentials.
//!
//! A credential is valid only while its decoded `exp` instant lies strictly after "now". Any
//! credential whose payload cannot be decoded is reported as expired, so an unreadable token is
//! never admitted.

// self
use crate::{_prelude::*, auth::Credential};

/// Lifecycle state of a credential at a given instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExpiryStatus {
	/// The token carries a future expiry.
	Valid,
	/// The token expiry is at or before the instant.
	Expired,
	/// The token payload could not be decoded; treated as expired.
	Undecodable,
}
impl ExpiryStatus {
	/// Returns `true` unless the status is [`ExpiryStatus::Valid`].
	pub const fn is_expired(self) -> bool {
		!matches!(self, Self::Valid)
	}
}

/// Succeeds only while the credential's expiry lies after `now`.
///
/// Expired credentials fail with [`Error::AuthExpired`]; undecodable ones with [`Error::Decode`].
pub fn ensure_valid_at(credential: &Credential, now: OffsetDateTime) -> Result<()> {
	if credential.expires_at()? > now { Ok(()) } else { Err(Error::AuthExpired) }
}

/// Classifies the credential at the provided instant.
pub fn status_at(credential: &Credential, now: OffsetDateTime) -> ExpiryStatus {
	match ensure_valid_at(credential, now) {
		Ok(()) => ExpiryStatus::Valid,
		Err(Error::AuthExpired) => ExpiryStatus::Expired,
		Err(_) => ExpiryStatus::Undecodable,
	}
}

/// Returns `true` if the credential is expired (or undecodable) at the provided instant.
pub fn is_expired_at(credential: &Credential, now: OffsetDateTime) -> bool {
	status_at(credential, now).is_expired()
}

/// Returns `true` if the credential is expired (or undecodable) relative to the current clock.
pub fn is_expired(credential: &Credential) -> bool {
	is_expired_at(credential, OffsetDateTime::now_utc())
}
