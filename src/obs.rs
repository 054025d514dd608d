//! Optional observability helpers for service calls.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `ledger_client.call` with the `call`
//!   (service operation) and `stage` (call site) fields, plus warn/debug events for storage
//!   failures, guard redirects, and discarded evaluations.
//! - Enable `metrics` to increment the `ledger_client_call_total` counter for every
//!   attempt/success/failure (labeled by `call` + `outcome`), record finished calls in the
//!   `ledger_client_call_seconds` histogram, and count access-guard redirects in
//!   `ledger_client_guard_redirect_total` (labeled by `reason`).

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Remote operations observed by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallKind {
	/// `POST /auth/login`.
	Login,
	/// `POST /auth/register`.
	Register,
	/// `POST /operations/execute`.
	Evaluate,
	/// `GET /operations`.
	HistoryList,
	/// `DELETE /operations/{id}`.
	HistoryDelete,
	/// `GET /users/balance`.
	Balance,
	/// `POST /operations/random-string`.
	RandomString,
}
impl CallKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CallKind::Login => "login",
			CallKind::Register => "register",
			CallKind::Evaluate => "evaluate",
			CallKind::HistoryList => "history_list",
			CallKind::HistoryDelete => "history_delete",
			CallKind::Balance => "balance",
			CallKind::RandomString => "random_string",
		}
	}
}
impl Display for CallKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallOutcome {
	/// Entry to a service call.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl CallOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CallOutcome::Attempt => "attempt",
			CallOutcome::Success => "success",
			CallOutcome::Failure => "failure",
		}
	}
}
impl Display for CallOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
