#![cfg(feature = "reqwest")]

// std
use std::{env, fs, path::PathBuf, process};
// crates.io
use httpmock::prelude::*;
use serde_json::json;
// self
use ledger_client::{
	_preludet::*,
	auth::{OperationId, UserId},
	calculator::{EvaluateOutcome, MISSING_SESSION_MESSAGE},
	flows::{FormOutcome, SIGN_IN_SUCCESS, SignInForm},
	guard::{Admission, GuardState, RedirectReason},
	notify::{NoticeKind, RecordingNotifier},
	route::{RecordingNavigator, Route},
	store::{FileStore, Slot, SlotStore, TokenStore},
};

async fn mock_login<'a>(server: &'a MockServer, token: &str) -> httpmock::Mock<'a> {
	server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/login");
			then.status(200).json_body(json!({ "token": token, "userId": 21 }));
		})
		.await
}

#[tokio::test]
async fn fresh_session_is_redirected_without_rendering() {
	let server = MockServer::start_async().await;
	let (client, _, navigator, _) = build_test_client(&server.base_url());
	let guard = client.access_guard();
	let mut rendered = false;
	let admission = guard.enter(Route::Home, |_| rendered = true);

	assert_eq!(admission, Admission::Redirected(RedirectReason::Absent));
	assert!(!rendered);
	assert_eq!(guard.state(), GuardState::Redirecting);
	assert_eq!(navigator.current(), Some(Route::Unauthorized));
}

#[tokio::test]
async fn sign_in_persists_both_slots_and_admits_home() {
	let server = MockServer::start_async().await;
	let token = token_expiring_in(Duration::hours(1));
	let login = mock_login(&server, &token).await;
	let (client, backend, navigator, notifier) = build_test_client(&server.base_url());

	assert_eq!(client.sign_in(SignInForm::new(" ada ", "hunter22")).await, FormOutcome::Completed);

	login.assert_async().await;

	assert_eq!(backend.get(Slot::UserToken).expect("Memory reads should succeed."), Some(token));
	assert_eq!(
		backend.get(Slot::UserId).expect("Memory reads should succeed."),
		Some("21".to_owned())
	);
	assert_eq!(navigator.current(), Some(Route::Home));
	assert_eq!(notifier.last().map(|n| n.message), Some(SIGN_IN_SUCCESS.to_owned()));

	let guard = client.access_guard();
	let view = guard.enter(Route::Home, |credential| credential.map(|c| c.user_id));

	assert_eq!(view, Admission::Admitted(Some(UserId::new(21))));
	assert_eq!(guard.state(), GuardState::Admitted(Route::Home));
}

#[tokio::test]
async fn expired_login_is_evicted_and_cleared() {
	let server = MockServer::start_async().await;
	let token = token_expiring_in(Duration::minutes(-5));

	mock_login(&server, &token).await;

	let (client, backend, navigator, _) = build_test_client(&server.base_url());

	client.sign_in(SignInForm::new("ada", "hunter22")).await;

	let admission = client.access_guard().enter(Route::OperationsHistory, |_| ());

	assert_eq!(admission, Admission::Redirected(RedirectReason::Expired));
	assert!(!client.session.is_present());
	assert!(backend.is_empty());
	assert_eq!(navigator.history(), vec![Route::Home, Route::Unauthorized]);
}

#[tokio::test]
async fn calculator_round_trip_replaces_the_expression() {
	let server = MockServer::start_async().await;

	mock_login(&server, &token_expiring_in(Duration::hours(1))).await;

	let execute = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/operations/execute")
				.json_body(json!({ "userId": 21, "expression": "12" }));
			then.status(200).json_body(json!({ "result": "12" }));
		})
		.await;
	let (client, _, _, _) = build_test_client(&server.base_url());

	client.sign_in(SignInForm::new("ada", "hunter22")).await;

	let seen = Arc::new(Mutex::new(Vec::new()));
	let sink = seen.clone();
	let calculator = client
		.calculator_with_listener(Arc::new(move |result: &str| sink.lock().push(result.to_owned())));

	assert_eq!(calculator.expression(), "0");

	calculator.input("1").expect("Digits are valid keys.");

	assert_eq!(calculator.expression(), "1");

	calculator.input("2").expect("Digits are valid keys.");

	assert_eq!(calculator.expression(), "12");
	assert_eq!(calculator.evaluate().await, EvaluateOutcome::Updated("12".into()));

	execute.assert_async().await;

	assert_eq!(calculator.expression(), "12");
	assert_eq!(*seen.lock(), vec!["12".to_owned()]);
}

#[tokio::test]
async fn square_roots_are_sent_as_function_calls() {
	let server = MockServer::start_async().await;

	mock_login(&server, &token_expiring_in(Duration::hours(1))).await;

	let execute = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/operations/execute")
				.json_body(json!({ "userId": 21, "expression": "sqrt(9)" }));
			then.status(200).json_body(json!({ "result": "3" }));
		})
		.await;
	let (client, _, _, _) = build_test_client(&server.base_url());

	client.sign_in(SignInForm::new("ada", "hunter22")).await;

	let calculator = client.calculator();

	calculator.input("√").expect("Root is a valid key.");
	calculator.input("9").expect("Digits are valid keys.");

	assert_eq!(calculator.expression(), "√9");
	assert_eq!(calculator.evaluate().await, EvaluateOutcome::Updated("3".into()));

	execute.assert_async().await;
}

#[tokio::test]
async fn evaluate_without_session_never_calls_the_gateway() {
	let server = MockServer::start_async().await;
	let execute = server
		.mock_async(|when, then| {
			when.method(POST).path("/operations/execute");
			then.status(200).json_body(json!({ "result": "0" }));
		})
		.await;
	let (client, _, _, notifier) = build_test_client(&server.base_url());
	let calculator = client.calculator();

	calculator.input("7").expect("Digits are valid keys.");

	assert_eq!(calculator.evaluate().await, EvaluateOutcome::Aborted);
	assert_eq!(calculator.expression(), "7");
	assert_eq!(
		notifier.last().map(|n| (n.kind, n.message)),
		Some((NoticeKind::Error, MISSING_SESSION_MESSAGE.to_owned()))
	);

	execute.assert_calls_async(0).await;
}

#[tokio::test]
async fn rejected_evaluation_resets_to_zero() {
	let server = MockServer::start_async().await;

	mock_login(&server, &token_expiring_in(Duration::hours(1))).await;
	server
		.mock_async(|when, then| {
			when.method(POST).path("/operations/execute");
			then.status(400).json_body(json!({ "message": "Insufficient balance" }));
		})
		.await;

	let (client, _, _, notifier) = build_test_client(&server.base_url());

	client.sign_in(SignInForm::new("ada", "hunter22")).await;

	let calculator = client.calculator();

	calculator.input("4").expect("Digits are valid keys.");

	assert_eq!(calculator.evaluate().await, EvaluateOutcome::Reset);
	assert_eq!(calculator.expression(), "0");

	let last = notifier.last().expect("A failure notice should be recorded.");

	assert_eq!(last.kind, NoticeKind::Error);
	assert!(last.message.contains("Insufficient balance"));
}

#[tokio::test]
async fn history_view_deletes_through_the_gateway() {
	let server = MockServer::start_async().await;

	mock_login(&server, &token_expiring_in(Duration::hours(1))).await;
	server
		.mock_async(|when, then| {
			when.method(GET).path("/operations").query_param("userId", "21");
			then.status(200).json_body(json!([
				{ "id": 3, "operationResponse": "2*3 = 6", "date": "2024-10-05T14:30:00Z", "amount": 5 },
				{ "id": 4, "operationResponse": "9-1 = 8", "date": "2024-10-05T15:00:00Z", "amount": 5 }
			]));
		})
		.await;

	let delete = server
		.mock_async(|when, then| {
			when.method(DELETE).path("/operations/3");
			then.status(200).json_body(json!(true));
		})
		.await;
	let (client, _, _, _) = build_test_client(&server.base_url());

	client.sign_in(SignInForm::new("ada", "hunter22")).await;

	let history = client.operation_history();

	assert!(history.refresh().await);
	assert_eq!(history.entries().len(), 2);

	history.select(OperationId::new(3));

	assert!(history.confirm_delete().await);

	delete.assert_async().await;

	let remaining: Vec<_> = history.entries().into_iter().map(|e| e.id.get()).collect();

	assert_eq!(remaining, vec![4]);
	assert_eq!(history.pending(), None);
}

#[tokio::test]
async fn file_backed_session_survives_a_restart() {
	let server = MockServer::start_async().await;
	let token = token_expiring_in(Duration::hours(1));

	mock_login(&server, &token).await;

	let path = env::temp_dir().join(format!(
		"ledger_client_session_it_{}_{}.json",
		process::id(),
		OffsetDateTime::now_utc().unix_timestamp_nanos(),
	));
	let open_client = |path: &PathBuf| {
		let store = FileStore::open(path).expect("Failed to open file store.");

		test_client_with_store(
			&server.base_url(),
			TokenStore::new(Arc::new(store)),
			RecordingNavigator::default(),
			RecordingNotifier::default(),
		)
	};
	let first = open_client(&path);

	first.sign_in(SignInForm::new("ada", "hunter22")).await;
	drop(first);

	let second = open_client(&path);

	assert_eq!(second.session.read().map(|c| c.token.expose().to_owned()), Some(token));
	assert!(second.access_guard().enter(Route::Home, |_| ()).into_view().is_some());

	second.sign_out();

	let reopened = FileStore::open(&path).expect("Failed to reopen file store.");

	assert_eq!(reopened.get(Slot::UserToken).expect("Read should succeed."), None);

	fs::remove_file(&path).unwrap_or_else(|e| {
		panic!("Failed to remove temporary session file {}: {e}", path.display())
	});
}
