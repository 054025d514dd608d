//! Remote collaborator contracts.
//!
//! The client core talks to the gateway only through these traits. [`crate::api::LedgerApi`]
//! implements all of them over HTTP; tests and alternative transports provide their own.

// self
use crate::{
	_prelude::*,
	auth::{Credential, OperationId, Password, UserName},
	history::HistoryEntry,
};

/// Boxed future returned by every service call.
pub type ServiceFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + 'a + Send>>;

/// Result of a remote evaluation, already rendered as display text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
	/// Display text of the computed value.
	pub result: String,
}
impl Evaluation {
	/// Wraps a display string.
	pub fn new(result: impl Into<String>) -> Self {
		Self { result: result.into() }
	}
}

/// Server-side arithmetic evaluator.
pub trait RemoteEvaluator
where
	Self: Send + Sync,
{
	/// Evaluates `expression` on behalf of the credential's user.
	///
	/// Expressions may contain digits, `. + - * /`, and the `sqrt(...)` form. Malformed input
	/// yields an error, never a panic.
	fn evaluate<'a>(
		&'a self,
		credential: &'a Credential,
		expression: &'a str,
	) -> ServiceFuture<'a, Evaluation>;
}

/// Account creation and login.
pub trait AuthService
where
	Self: Send + Sync,
{
	/// Exchanges a user name and password for a credential.
	fn login<'a>(
		&'a self,
		user_name: &'a UserName,
		password: &'a Password,
	) -> ServiceFuture<'a, Credential>;

	/// Creates an account.
	fn register<'a>(
		&'a self,
		user_name: &'a UserName,
		password: &'a Password,
	) -> ServiceFuture<'a, ()>;
}

/// Past operations owned by the remote service.
pub trait HistoryService
where
	Self: Send + Sync,
{
	/// Lists the user's operations in service order.
	fn list<'a>(&'a self, credential: &'a Credential) -> ServiceFuture<'a, Vec<HistoryEntry>>;

	/// Deletes one operation. Returns `false` when the service reports it as unknown.
	fn delete<'a>(&'a self, credential: &'a Credential, id: OperationId)
	-> ServiceFuture<'a, bool>;
}

/// Account balance and the paid random-string operation.
pub trait AccountService
where
	Self: Send + Sync,
{
	/// Current balance of the user's account.
	fn balance<'a>(&'a self, credential: &'a Credential) -> ServiceFuture<'a, f64>;

	/// Generates a random string, charged to the user's balance.
	fn random_string<'a>(&'a self, credential: &'a Credential) -> ServiceFuture<'a, String>;
}
