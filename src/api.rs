//! HTTP implementation of the service traits against the ledger gateway.

// std
use std::time::Instant;
// crates.io
use reqwest::header::AUTHORIZATION;
use serde_json::Value;
// self
use crate::{
	_prelude::*,
	auth::{Credential, OperationId, Password, UserName},
	config::ClientConfig,
	error::{ConfigError, RemoteError},
	history::HistoryEntry,
	http::{GatewayResponse, ReqwestHttpClient},
	obs::{self, CallKind, CallOutcome, CallSpan},
	service::{
		AccountService, AuthService, Evaluation, HistoryService, RemoteEvaluator, ServiceFuture,
	},
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AccountRequest<'a> {
	user_name: &'a str,
	password: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EvaluateRequest<'a> {
	user_id: u64,
	expression: &'a str,
}

/// Gateway client implementing every service trait over HTTP.
#[derive(Clone, Debug)]
pub struct LedgerApi {
	config: ClientConfig,
	http_client: ReqwestHttpClient,
}
impl LedgerApi {
	/// Builds the API with a client configured from `config`.
	pub fn new(config: ClientConfig) -> Result<Self, ConfigError> {
		let http_client = ReqwestHttpClient::from_config(&config)?;

		Ok(Self { config, http_client })
	}

	/// Reuses a caller-provided HTTP client.
	pub fn with_http_client(config: ClientConfig, http_client: ReqwestHttpClient) -> Self {
		Self { config, http_client }
	}

	/// Active configuration.
	pub fn config(&self) -> &ClientConfig {
		&self.config
	}

	fn url(&self, path: &str) -> Result<Url> {
		Ok(self.config.endpoint(path)?)
	}

	fn authorized_url(&self, path: &str, credential: &Credential) -> Result<Url> {
		let mut url = self.url(path)?;

		url.query_pairs_mut().append_pair("userId", &credential.user_id.to_string());

		Ok(url)
	}

	async fn login_inner(&self, user_name: &UserName, password: &Password) -> Result<Credential> {
		let body = AccountRequest { user_name: user_name.as_ref(), password: password.expose() };
		let request = self.http_client.post(self.url("auth/login")?).json(&body);
		let response = self.http_client.execute(request).await?;

		if !matches!(response.status.as_u16(), 200 | 201) {
			return Err(response.rejection().into());
		}

		response.json()
	}

	async fn register_inner(&self, user_name: &UserName, password: &Password) -> Result<()> {
		let body = AccountRequest { user_name: user_name.as_ref(), password: password.expose() };
		let request = self.http_client.post(self.url("auth/register")?).json(&body);

		self.http_client.execute(request).await?.success()?;

		Ok(())
	}

	async fn evaluate_inner(&self, credential: &Credential, expression: &str) -> Result<Evaluation> {
		let body = EvaluateRequest { user_id: credential.user_id.get(), expression };
		let request = self
			.http_client
			.post(self.url("operations/execute")?)
			.header(AUTHORIZATION, credential.bearer())
			.json(&body);
		let response = self.http_client.execute(request).await?.success()?;

		evaluation_from(response.json()?).map(Evaluation::new)
	}

	async fn list_inner(&self, credential: &Credential) -> Result<Vec<HistoryEntry>> {
		let request = self
			.http_client
			.get(self.authorized_url("operations", credential)?)
			.header(AUTHORIZATION, credential.bearer());

		self.http_client.execute(request).await?.success()?.json()
	}

	async fn delete_inner(&self, credential: &Credential, id: OperationId) -> Result<bool> {
		let request = self
			.http_client
			.delete(self.url(&format!("operations/{id}"))?)
			.header(AUTHORIZATION, credential.bearer());
		let response = self.http_client.execute(request).await?;

		match response.status.as_u16() {
			404 => Ok(false),
			_ => response.success().map(|_| true),
		}
	}

	async fn balance_inner(&self, credential: &Credential) -> Result<f64> {
		let request = self
			.http_client
			.get(self.authorized_url("users/balance", credential)?)
			.header(AUTHORIZATION, credential.bearer());
		let response = self.http_client.execute(request).await?.success()?;

		balance_from(response.json()?)
	}

	async fn random_string_inner(&self, credential: &Credential) -> Result<String> {
		let request = self
			.http_client
			.post(self.authorized_url("operations/random-string", credential)?)
			.header(AUTHORIZATION, credential.bearer());
		let response: GatewayResponse = self.http_client.execute(request).await?.success()?;

		response.text()
	}
}
impl RemoteEvaluator for LedgerApi {
	fn evaluate<'a>(
		&'a self,
		credential: &'a Credential,
		expression: &'a str,
	) -> ServiceFuture<'a, Evaluation> {
		observed(CallKind::Evaluate, self.evaluate_inner(credential, expression))
	}
}
impl AuthService for LedgerApi {
	fn login<'a>(
		&'a self,
		user_name: &'a UserName,
		password: &'a Password,
	) -> ServiceFuture<'a, Credential> {
		observed(CallKind::Login, self.login_inner(user_name, password))
	}

	fn register<'a>(
		&'a self,
		user_name: &'a UserName,
		password: &'a Password,
	) -> ServiceFuture<'a, ()> {
		observed(CallKind::Register, self.register_inner(user_name, password))
	}
}
impl HistoryService for LedgerApi {
	fn list<'a>(&'a self, credential: &'a Credential) -> ServiceFuture<'a, Vec<HistoryEntry>> {
		observed(CallKind::HistoryList, self.list_inner(credential))
	}

	fn delete<'a>(
		&'a self,
		credential: &'a Credential,
		id: OperationId,
	) -> ServiceFuture<'a, bool> {
		observed(CallKind::HistoryDelete, self.delete_inner(credential, id))
	}
}
impl AccountService for LedgerApi {
	fn balance<'a>(&'a self, credential: &'a Credential) -> ServiceFuture<'a, f64> {
		observed(CallKind::Balance, self.balance_inner(credential))
	}

	fn random_string<'a>(&'a self, credential: &'a Credential) -> ServiceFuture<'a, String> {
		observed(CallKind::RandomString, self.random_string_inner(credential))
	}
}

fn observed<'a, T, Fut>(kind: CallKind, call: Fut) -> ServiceFuture<'a, T>
where
	Fut: 'a + Send + Future<Output = Result<T>>,
{
	let span = CallSpan::new(kind, "gateway");

	Box::pin(span.instrument(async move {
		obs::record_call_outcome(kind, CallOutcome::Attempt);

		let started = Instant::now();
		let result = call.await;
		let outcome = match &result {
			Ok(_) => CallOutcome::Success,
			Err(e) => {
				obs::trace_event!(debug, error = %e, "Gateway call failed.");

				CallOutcome::Failure
			},
		};

		obs::record_call_outcome(kind, outcome);
		obs::record_call_latency(kind, outcome, started.elapsed());

		result
	}))
}

// The evaluator answers with a bare string, a bare number, or `{ "result": ... }`.
fn evaluation_from(payload: Value) -> Result<String> {
	match payload {
		Value::String(text) => Ok(text),
		Value::Number(number) => Ok(number.to_string()),
		Value::Object(mut object) => match object.remove("result") {
			Some(Value::String(text)) => Ok(text),
			Some(Value::Number(number)) => Ok(number.to_string()),
			_ => Err(unexpected("Evaluation object has no textual or numeric `result`.")),
		},
		_ => Err(unexpected("Evaluation payload is neither text, a number, nor an object.")),
	}
}

fn balance_from(payload: Value) -> Result<f64> {
	match &payload {
		Value::Number(number) => number.as_f64(),
		Value::String(text) => text.trim().parse().ok(),
		_ => None,
	}
	.ok_or_else(|| unexpected("Balance payload is not numeric."))
}

fn unexpected(message: &str) -> Error {
	RemoteError::UnexpectedPayload { message: message.to_owned() }.into()
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn evaluation_accepts_all_payload_shapes() {
		assert_eq!(evaluation_from(serde_json::json!("12")).expect("Text should decode."), "12");
		assert_eq!(evaluation_from(serde_json::json!(2.5)).expect("Numbers should decode."), "2.5");
		assert_eq!(
			evaluation_from(serde_json::json!({ "result": "3" })).expect("Objects should decode."),
			"3"
		);
		assert_eq!(
			evaluation_from(serde_json::json!({ "result": 4 })).expect("Objects should decode."),
			"4"
		);
		assert!(evaluation_from(serde_json::json!([1])).is_err());
		assert!(evaluation_from(serde_json::json!({ "value": 1 })).is_err());
	}

	#[test]
	fn balance_accepts_numbers_and_numeric_strings() {
		assert_eq!(balance_from(serde_json::json!(87.5)).expect("Numbers should decode."), 87.5);
		assert_eq!(balance_from(serde_json::json!(" 12 ")).expect("Strings should decode."), 12.0);
		assert!(matches!(
			balance_from(serde_json::json!({ "balance": 1 })),
			Err(Error::Remote(RemoteError::UnexpectedPayload { .. }))
		));
	}
}
