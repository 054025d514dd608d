//! Account panel: balance and the random-string operation.

// self
use crate::{
	_prelude::*,
	history::MISSING_TOKEN_MESSAGE,
	notify::{NoticeKind, Notifier},
	obs::trace_event,
	service::AccountService,
	session::SessionContext,
};

#[derive(Debug, Default)]
struct AccountState {
	balance: Option<f64>,
	random_string: Option<String>,
}

/// Cached account figures shown next to the calculator.
pub struct AccountPanel {
	session: Arc<SessionContext>,
	service: Arc<dyn AccountService>,
	notifier: Arc<dyn Notifier>,
	state: Mutex<AccountState>,
}
impl AccountPanel {
	/// Creates a panel with nothing cached.
	pub fn new(
		session: Arc<SessionContext>,
		service: Arc<dyn AccountService>,
		notifier: Arc<dyn Notifier>,
	) -> Self {
		Self { session, service, notifier, state: Mutex::new(AccountState::default()) }
	}

	/// Last fetched balance.
	pub fn balance(&self) -> Option<f64> {
		self.state.lock().balance
	}

	/// Last generated random string.
	pub fn random_string(&self) -> Option<String> {
		self.state.lock().random_string.clone()
	}

	/// Fetches the balance; the cache keeps its previous value on failure.
	pub async fn refresh_balance(&self) -> Option<f64> {
		let Ok(credential) = self.session.require() else {
			self.notifier.notify(NoticeKind::Error, MISSING_TOKEN_MESSAGE);

			return None;
		};

		match self.service.balance(&credential).await {
			Ok(balance) => {
				self.state.lock().balance = Some(balance);

				Some(balance)
			},
			Err(e) => {
				trace_event!(warn, error = %e, "Failed to fetch the balance.");

				self.notifier.notify(
					NoticeKind::Error,
					&format!("An error occurred while getting the current balance: {e}"),
				);

				None
			},
		}
	}

	/// Requests a random string; the cache keeps its previous value on failure.
	pub async fn generate_random_string(&self) -> Option<String> {
		let Ok(credential) = self.session.require() else {
			self.notifier.notify(NoticeKind::Error, MISSING_TOKEN_MESSAGE);

			return None;
		};

		match self.service.random_string(&credential).await {
			Ok(value) => {
				self.state.lock().random_string = Some(value.clone());

				Some(value)
			},
			Err(e) => {
				trace_event!(warn, error = %e, "Failed to generate a random string.");

				self.notifier.notify(
					NoticeKind::Error,
					&format!("An error occurred while generating the random string: {e}"),
				);

				None
			},
		}
	}
}
impl Debug for AccountPanel {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AccountPanel").field("balance", &self.balance()).finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{
		_preludet::memory_session,
		auth::{Credential, UserId},
		error::TransportError,
		notify::RecordingNotifier,
		service::ServiceFuture,
	};

	struct FixedAccount {
		online: bool,
	}
	impl AccountService for FixedAccount {
		fn balance<'a>(&'a self, _: &'a Credential) -> ServiceFuture<'a, f64> {
			Box::pin(async move {
				if self.online {
					Ok(95.5)
				} else {
					Err(TransportError::Io(std::io::ErrorKind::TimedOut.into()).into())
				}
			})
		}

		fn random_string<'a>(&'a self, _: &'a Credential) -> ServiceFuture<'a, String> {
			Box::pin(async move {
				if self.online {
					Ok("k3j2h1".into())
				} else {
					Err(TransportError::Io(std::io::ErrorKind::TimedOut.into()).into())
				}
			})
		}
	}

	fn panel(online: bool, signed_in: bool) -> (AccountPanel, RecordingNotifier) {
		let (session, _) = memory_session();
		let notifier = RecordingNotifier::default();

		if signed_in {
			session
				.write(Credential::new("token", UserId::new(1)))
				.expect("Writing to memory storage should succeed.");
		}

		let panel =
			AccountPanel::new(session, Arc::new(FixedAccount { online }), Arc::new(notifier.clone()));

		(panel, notifier)
	}

	#[tokio::test]
	async fn successful_calls_update_the_cache() {
		let (panel, notifier) = panel(true, true);

		assert_eq!(panel.refresh_balance().await, Some(95.5));
		assert_eq!(panel.generate_random_string().await.as_deref(), Some("k3j2h1"));
		assert_eq!(panel.balance(), Some(95.5));
		assert_eq!(panel.random_string().as_deref(), Some("k3j2h1"));
		assert!(notifier.notices().is_empty());
	}

	#[tokio::test]
	async fn failures_notify_and_keep_the_cache() {
		let (panel, notifier) = panel(false, true);

		assert_eq!(panel.refresh_balance().await, None);
		assert_eq!(panel.generate_random_string().await, None);
		assert_eq!(panel.balance(), None);
		assert_eq!(notifier.of_kind(NoticeKind::Error).len(), 2);
	}

	#[tokio::test]
	async fn missing_session_notifies_without_calling_the_service() {
		let (panel, notifier) = panel(true, false);

		assert_eq!(panel.refresh_balance().await, None);
		assert_eq!(notifier.last().map(|notice| notice.message), Some(MISSING_TOKEN_MESSAGE.into()));
	}
}
