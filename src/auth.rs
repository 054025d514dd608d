//! Auth-domain identifiers, secrets, credentials, and expiry checks.

pub mod credential;
pub mod expiry;
pub mod id;
pub mod secret;

pub use credential::*;
pub use id::*;
pub use secret::*;
