// std
use std::time::Duration as StdDuration;
// self
use crate::obs::{CallKind, CallOutcome};

/// Counts a gateway call outcome (when the `metrics` feature is enabled).
pub fn record_call_outcome(kind: CallKind, outcome: CallOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"ledger_client_call_total",
			"call" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}

/// Records how long a finished gateway call took, in seconds.
pub fn record_call_latency(kind: CallKind, outcome: CallOutcome, elapsed: StdDuration) {
	#[cfg(feature = "metrics")]
	{
		metrics::histogram!(
			"ledger_client_call_seconds",
			"call" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.record(elapsed.as_secs_f64());
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome, elapsed);
	}
}

/// Counts an access-guard redirect, labeled by reason (`absent` or `expired`).
pub fn record_guard_redirect(reason: &'static str) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("ledger_client_guard_redirect_total", "reason" => reason).increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = reason;
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn recorders_are_noops_without_a_recorder() {
		record_call_outcome(CallKind::HistoryDelete, CallOutcome::Failure);
		record_call_latency(CallKind::Evaluate, CallOutcome::Success, StdDuration::from_millis(12));
		record_guard_redirect("expired");
	}
}
