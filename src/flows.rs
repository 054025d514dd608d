//! The client aggregate and its user-facing flows.

pub mod common;

mod sign_in;
mod sign_up;

pub use common::*;
pub use sign_in::*;
pub use sign_up::*;

// self
use crate::{
	_prelude::*,
	account::AccountPanel,
	calculator::{Calculator, ResultListener},
	guard::AccessGuard,
	history::OperationHistory,
	notify::Notifier,
	route::Navigator,
	service::{AccountService, AuthService, HistoryService, RemoteEvaluator},
	session::SessionContext,
	store::TokenStore,
};
#[cfg(feature = "reqwest")]
use crate::{api::LedgerApi, config::ClientConfig, error::ConfigError};

/// Remote collaborators used by a [`LedgerClient`].
#[derive(Clone)]
pub struct Services {
	/// Login and registration.
	pub auth: Arc<dyn AuthService>,
	/// Expression evaluation.
	pub evaluator: Arc<dyn RemoteEvaluator>,
	/// Operation history.
	pub history: Arc<dyn HistoryService>,
	/// Balance and random strings.
	pub account: Arc<dyn AccountService>,
}
impl Services {
	/// Uses one implementation for every service.
	pub fn shared<S>(service: Arc<S>) -> Self
	where
		S: 'static + AuthService + RemoteEvaluator + HistoryService + AccountService,
	{
		Self {
			auth: service.clone(),
			evaluator: service.clone(),
			history: service.clone(),
			account: service,
		}
	}
}

/// Ties the session, the remote services, navigation, and notifications together.
///
/// The client owns one [`SessionContext`] and hands it to every component it builds, so the
/// guard, calculator, and views all observe the same session.
#[derive(Clone)]
pub struct LedgerClient {
	/// Session shared by every component.
	pub session: Arc<SessionContext>,
	/// Login and registration.
	pub auth: Arc<dyn AuthService>,
	/// Expression evaluation.
	pub evaluator: Arc<dyn RemoteEvaluator>,
	/// Operation history.
	pub history: Arc<dyn HistoryService>,
	/// Balance and random strings.
	pub account: Arc<dyn AccountService>,
	/// Route changes.
	pub navigator: Arc<dyn Navigator>,
	/// User-visible notices.
	pub notifier: Arc<dyn Notifier>,
}
impl LedgerClient {
	/// Creates a client over caller-provided services.
	pub fn with_services(
		store: TokenStore,
		services: Services,
		navigator: Arc<dyn Navigator>,
		notifier: Arc<dyn Notifier>,
	) -> Self {
		Self {
			session: Arc::new(SessionContext::new(store)),
			auth: services.auth,
			evaluator: services.evaluator,
			history: services.history,
			account: services.account,
			navigator,
			notifier,
		}
	}

	/// Guard for the protected routes.
	pub fn access_guard(&self) -> AccessGuard {
		AccessGuard::new(self.session.clone(), self.navigator.clone())
	}

	/// Calculator with no result listener.
	pub fn calculator(&self) -> Calculator {
		Calculator::new(self.session.clone(), self.evaluator.clone(), self.notifier.clone())
	}

	/// Calculator that reports every successful result to `listener`.
	pub fn calculator_with_listener(&self, listener: ResultListener) -> Calculator {
		self.calculator().with_result_listener(listener)
	}

	/// History view bound to this client's session.
	pub fn operation_history(&self) -> OperationHistory {
		OperationHistory::new(self.session.clone(), self.history.clone(), self.notifier.clone())
	}

	/// Account panel bound to this client's session.
	pub fn account_panel(&self) -> AccountPanel {
		AccountPanel::new(self.session.clone(), self.account.clone(), self.notifier.clone())
	}
}
#[cfg(feature = "reqwest")]
impl LedgerClient {
	/// Creates a client backed by the HTTP gateway described by `config`.
	pub fn new(
		config: ClientConfig,
		store: TokenStore,
		navigator: Arc<dyn Navigator>,
		notifier: Arc<dyn Notifier>,
	) -> Result<Self, ConfigError> {
		let api = Arc::new(LedgerApi::new(config)?);

		Ok(Self::with_services(store, Services::shared(api), navigator, notifier))
	}
}
impl Debug for LedgerClient {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("LedgerClient").field("session", &self.session).finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{
		_preludet::unsigned_token,
		auth::{Credential, OperationId, Password, UserId, UserName},
		error::RemoteError,
		history::HistoryEntry,
		notify::{NoticeKind, RecordingNotifier},
		route::{RecordingNavigator, Route},
		service::{Evaluation, ServiceFuture},
		store::MemoryStore,
	};

	#[derive(Default)]
	struct StubGateway {
		accept: bool,
		logins: Mutex<Vec<String>>,
	}
	impl AuthService for StubGateway {
		fn login<'a>(
			&'a self,
			user_name: &'a UserName,
			_: &'a Password,
		) -> ServiceFuture<'a, Credential> {
			self.logins.lock().push(user_name.to_string());

			Box::pin(async move {
				if self.accept {
					Ok(Credential::new(
						unsigned_token(&serde_json::json!({ "exp": 4_102_444_800_i64 })),
						UserId::new(21),
					))
				} else {
					Err(RemoteError::Rejected { status: 401, message: "Bad credentials".into() }
						.into())
				}
			})
		}

		fn register<'a>(&'a self, _: &'a UserName, _: &'a Password) -> ServiceFuture<'a, ()> {
			Box::pin(async move {
				if self.accept {
					Ok(())
				} else {
					Err(RemoteError::Rejected { status: 409, message: "Taken".into() }.into())
				}
			})
		}
	}
	impl RemoteEvaluator for StubGateway {
		fn evaluate<'a>(&'a self, _: &'a Credential, e: &'a str) -> ServiceFuture<'a, Evaluation> {
			Box::pin(async move { Ok(Evaluation::new(e)) })
		}
	}
	impl HistoryService for StubGateway {
		fn list<'a>(&'a self, _: &'a Credential) -> ServiceFuture<'a, Vec<HistoryEntry>> {
			Box::pin(async { Ok(Vec::new()) })
		}

		fn delete<'a>(&'a self, _: &'a Credential, _: OperationId) -> ServiceFuture<'a, bool> {
			Box::pin(async { Ok(false) })
		}
	}
	impl AccountService for StubGateway {
		fn balance<'a>(&'a self, _: &'a Credential) -> ServiceFuture<'a, f64> {
			Box::pin(async { Ok(100.0) })
		}

		fn random_string<'a>(&'a self, _: &'a Credential) -> ServiceFuture<'a, String> {
			Box::pin(async { Ok("abc".into()) })
		}
	}

	fn build_client(
		accept: bool,
	) -> (LedgerClient, Arc<StubGateway>, RecordingNavigator, RecordingNotifier) {
		let gateway = Arc::new(StubGateway { accept, ..Default::default() });
		let navigator = RecordingNavigator::default();
		let notifier = RecordingNotifier::default();
		let client = LedgerClient::with_services(
			TokenStore::new(Arc::new(MemoryStore::default())),
			Services::shared(gateway.clone()),
			Arc::new(navigator.clone()),
			Arc::new(notifier.clone()),
		);

		(client, gateway, navigator, notifier)
	}

	#[tokio::test]
	async fn sign_in_stores_the_session_and_enters_home() {
		let (client, _, navigator, notifier) = build_client(true);

		assert_eq!(client.sign_in(SignInForm::new("ada", "hunter22")).await, FormOutcome::Completed);
		assert_eq!(client.session.read().map(|c| c.user_id), Some(UserId::new(21)));
		assert_eq!(navigator.current(), Some(Route::Home));
		assert_eq!(notifier.last().map(|n| n.message), Some(SIGN_IN_SUCCESS.into()));

		let guard = client.access_guard();

		assert!(guard.enter(Route::Home, |_| ()).into_view().is_some());
	}

	#[tokio::test]
	async fn invalid_forms_never_reach_the_service() {
		let (client, gateway, navigator, notifier) = build_client(true);

		assert_eq!(
			client.sign_in(SignInForm::new("", "short")).await,
			FormOutcome::Invalid(vec![FieldError::UserName, FieldError::Password])
		);
		assert!(gateway.logins.lock().is_empty());
		assert!(navigator.history().is_empty());
		assert!(notifier.notices().is_empty());
	}

	#[tokio::test]
	async fn rejected_sign_in_notifies_and_stays_logged_out() {
		let (client, _, navigator, notifier) = build_client(false);

		assert_eq!(client.sign_in(SignInForm::new("ada", "hunter22")).await, FormOutcome::Failed);
		assert!(!client.session.is_present());
		assert!(navigator.history().is_empty());
		assert_eq!(
			notifier.last().map(|n| (n.kind, n.message)),
			Some((NoticeKind::Error, SIGN_IN_FAILURE.into()))
		);
	}

	#[tokio::test]
	async fn sign_up_returns_to_login() {
		let (client, _, navigator, notifier) = build_client(true);

		assert_eq!(client.sign_up(SignUpForm::new("grace", "cobol60")).await, FormOutcome::Completed);
		assert_eq!(navigator.current(), Some(Route::Login));
		assert_eq!(notifier.last().map(|n| n.message), Some(SIGN_UP_SUCCESS.into()));

		let (client, _, navigator, notifier) = build_client(false);

		assert_eq!(client.sign_up(SignUpForm::new("grace", "cobol60")).await, FormOutcome::Failed);
		assert!(navigator.history().is_empty());
		assert_eq!(notifier.last().map(|n| n.message), Some(SIGN_UP_FAILURE.into()));
	}

	#[tokio::test]
	async fn sign_out_clears_and_evicts_an_admitted_guard() {
		let (client, _, navigator, _) = build_client(true);

		client.sign_in(SignInForm::new("ada", "hunter22")).await;

		let guard = client.access_guard();

		guard.enter(Route::Home, |_| ());
		client.sign_out();

		assert!(!client.session.is_present());
		assert_eq!(navigator.history(), vec![Route::Home, Route::Unauthorized, Route::Login]);
	}
}
