//! Past operations: wire model and the history view state.

// crates.io
use serde::{Deserializer, Serializer};
use time::{
	PrimitiveDateTime, format_description::BorrowedFormatItem,
	format_description::well_known::Rfc3339, macros,
};
// self
use crate::{
	_prelude::*,
	auth::OperationId,
	notify::{NoticeKind, Notifier},
	obs::trace_event,
	service::HistoryService,
	session::SessionContext,
};

/// Message shown when a history action is attempted without a session.
pub const MISSING_TOKEN_MESSAGE: &str = "Unable to get user token";

const NAIVE_TIMESTAMP: &[BorrowedFormatItem<'static>] = macros::format_description!(
	"[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]"
);
const DISPLAY_DATE: &[BorrowedFormatItem<'static>] =
	macros::format_description!("[day]/[month]/[year]");

/// One operation recorded by the remote service.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
	/// Service-assigned identifier.
	pub id: OperationId,
	/// Human-readable outcome of the operation.
	#[serde(rename = "operationResponse")]
	pub description: String,
	/// When the operation ran.
	#[serde(with = "entry_date")]
	pub date: OffsetDateTime,
	/// Amount charged for the operation.
	pub amount: f64,
}
impl HistoryEntry {
	/// Date rendered as `DD/MM/YYYY`.
	pub fn display_date(&self) -> String {
		self.date.format(DISPLAY_DATE).unwrap_or_else(|_| self.date.date().to_string())
	}
}

mod entry_date {
	// self
	use super::*;

	pub fn serialize<S>(date: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		let formatted = date.format(&Rfc3339).map_err(serde::ser::Error::custom)?;

		serializer.serialize_str(&formatted)
	}

	pub fn deserialize<'de, D>(deserializer: D) -> Result<OffsetDateTime, D::Error>
	where
		D: Deserializer<'de>,
	{
		let raw = String::deserialize(deserializer)?;

		parse(&raw).map_err(serde::de::Error::custom)
	}

	// Offset-less timestamps are read as UTC.
	pub fn parse(raw: &str) -> Result<OffsetDateTime, time::error::Parse> {
		OffsetDateTime::parse(raw, &Rfc3339).or_else(|rfc_err| {
			PrimitiveDateTime::parse(raw, NAIVE_TIMESTAMP)
				.map(PrimitiveDateTime::assume_utc)
				.map_err(|_| rfc_err)
		})
	}
}

#[derive(Debug, Default)]
struct HistoryState {
	entries: Vec<HistoryEntry>,
	pending: Option<OperationId>,
}

/// History view: a local copy of the user's operations plus a pending-delete selection.
pub struct OperationHistory {
	session: Arc<SessionContext>,
	service: Arc<dyn HistoryService>,
	notifier: Arc<dyn Notifier>,
	state: Mutex<HistoryState>,
}
impl OperationHistory {
	/// Creates an empty view.
	pub fn new(
		session: Arc<SessionContext>,
		service: Arc<dyn HistoryService>,
		notifier: Arc<dyn Notifier>,
	) -> Self {
		Self { session, service, notifier, state: Mutex::new(HistoryState::default()) }
	}

	/// Local entries in service order.
	pub fn entries(&self) -> Vec<HistoryEntry> {
		self.state.lock().entries.clone()
	}

	/// Reloads the entries. Returns `true` when the local copy was replaced.
	///
	/// Failures keep the previous entries and surface as an error notice.
	pub async fn refresh(&self) -> bool {
		let Ok(credential) = self.session.require() else {
			self.notifier.notify(NoticeKind::Error, MISSING_TOKEN_MESSAGE);

			return false;
		};

		match self.service.list(&credential).await {
			Ok(entries) => {
				self.state.lock().entries = entries;

				true
			},
			Err(e) => {
				trace_event!(warn, error = %e, "Failed to load the operation history.");

				self.notifier.notify(
					NoticeKind::Error,
					&format!("An error occurred while retrieving transaction history: {e}"),
				);

				false
			},
		}
	}

	/// Opens the delete confirmation for `id`.
	pub fn select(&self, id: OperationId) {
		self.state.lock().pending = Some(id);
	}

	/// Closes the delete confirmation without deleting.
	pub fn cancel(&self) {
		self.state.lock().pending = None;
	}

	/// Operation awaiting confirmation, if any.
	pub fn pending(&self) -> Option<OperationId> {
		self.state.lock().pending
	}

	/// Deletes the selected operation. Returns `true` when it was removed.
	///
	/// The selection is closed regardless of the outcome; without a selection nothing happens.
	pub async fn confirm_delete(&self) -> bool {
		let Some(id) = self.state.lock().pending.take() else {
			return false;
		};
		let Ok(credential) = self.session.require() else {
			self.notifier.notify(NoticeKind::Error, MISSING_TOKEN_MESSAGE);

			return false;
		};

		match self.service.delete(&credential, id).await {
			Ok(true) => {
				self.state.lock().entries.retain(|entry| entry.id != id);
				self.notifier.notify(NoticeKind::Success, "Operation deleted from history.");

				true
			},
			Ok(false) => {
				self.notifier.notify(
					NoticeKind::Error,
					&format!("Operation {id} no longer exists in the history."),
				);

				false
			},
			Err(e) => {
				trace_event!(warn, error = %e, operation = %id, "Failed to delete an operation.");

				self.notifier.notify(
					NoticeKind::Error,
					&format!("An error occurred while deleting the operation from history: {e}"),
				);

				false
			},
		}
	}
}
impl Debug for OperationHistory {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		let state = self.state.lock();

		f.debug_struct("OperationHistory")
			.field("entries", &state.entries.len())
			.field("pending", &state.pending)
			.finish()
	}
}
