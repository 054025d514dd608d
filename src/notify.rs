//! Transient user notifications.
//!
//! The core never owns a toast layer; it reports through the [`Notifier`] capability so the UI
//! can render notices however it likes.

// self
use crate::_prelude::*;

/// Severity of a notice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
	/// Completed action.
	Success,
	/// Neutral information.
	Info,
	/// Failed action.
	Error,
}

/// A notice emitted through a [`Notifier`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
	/// Severity.
	pub kind: NoticeKind,
	/// User-facing text.
	pub message: String,
}

/// Capability used to surface notices to the user.
pub trait Notifier
where
	Self: Send + Sync,
{
	/// Shows `message` with the given severity.
	fn notify(&self, kind: NoticeKind, message: &str);
}

/// [`Notifier`] that forwards notices to `tracing`.
#[cfg(feature = "tracing")]
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingNotifier;
#[cfg(feature = "tracing")]
impl Notifier for TracingNotifier {
	fn notify(&self, kind: NoticeKind, message: &str) {
		match kind {
			NoticeKind::Error => tracing::warn!(notice = "error", "{message}"),
			NoticeKind::Info => tracing::info!(notice = "info", "{message}"),
			NoticeKind::Success => tracing::info!(notice = "success", "{message}"),
		}
	}
}

/// [`Notifier`] that keeps every notice in memory.
#[derive(Clone, Debug, Default)]
pub struct RecordingNotifier(Arc<Mutex<Vec<Notice>>>);
impl RecordingNotifier {
	/// Snapshot of all notices in emission order.
	pub fn notices(&self) -> Vec<Notice> {
		self.0.lock().clone()
	}

	/// Notices of the given severity.
	pub fn of_kind(&self, kind: NoticeKind) -> Vec<Notice> {
		self.0.lock().iter().filter(|notice| notice.kind == kind).cloned().collect()
	}

	/// Most recent notice.
	pub fn last(&self) -> Option<Notice> {
		self.0.lock().last().cloned()
	}
}
impl Notifier for RecordingNotifier {
	fn notify(&self, kind: NoticeKind, message: &str) {
		self.0.lock().push(Notice { kind, message: message.to_owned() });
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn recording_notifier_filters_by_kind() {
		let notifier = RecordingNotifier::default();

		notifier.notify(NoticeKind::Success, "Login success!");
		notifier.notify(NoticeKind::Error, "Unable to get user token");

		assert_eq!(notifier.notices().len(), 2);
		assert_eq!(notifier.of_kind(NoticeKind::Error)[0].message, "Unable to get user token");
		assert_eq!(notifier.last().map(|notice| notice.kind), Some(NoticeKind::Error));
	}

	#[cfg(feature = "tracing")]
	#[test]
	fn tracing_notifier_accepts_every_kind() {
		for kind in [NoticeKind::Success, NoticeKind::Info, NoticeKind::Error] {
			TracingNotifier.notify(kind, "notice");
		}
	}
}
