//! Reqwest transport shared by every gateway call.
//!
//! [`ReqwestHttpClient`] owns the configured [`ReqwestClient`]; [`ReqwestHttpClient::execute`]
//! sends a prepared request and buffers the reply into a [`GatewayResponse`], which knows how to
//! decode success payloads and how to turn error bodies into [`RemoteError::Rejected`].

// std
use std::ops::Deref;
// crates.io
use reqwest::{RequestBuilder, StatusCode, redirect::Policy};
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	config::ClientConfig,
	error::{ConfigError, RemoteError, TransportError},
};

/// Fallback message used when an error body carries no `message`.
pub const UNKNOWN_ERROR_MESSAGE: &str = "An unknown error occurred";

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
/// Gateway calls answer directly, so clients built here never follow redirects.
#[derive(Clone, Debug, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a client honoring the configured request timeout.
	pub fn from_config(config: &ClientConfig) -> Result<Self, ConfigError> {
		let client =
			ReqwestClient::builder().timeout(config.request_timeout).redirect(Policy::none()).build()?;

		Ok(Self(client))
	}

	/// Sends `request` and buffers the reply.
	pub async fn execute(&self, request: RequestBuilder) -> Result<GatewayResponse> {
		let response = request.send().await.map_err(TransportError::from)?;
		let status = response.status();
		let body = response.bytes().await.map_err(TransportError::from)?.to_vec();

		Ok(GatewayResponse { status, body })
	}
}
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

#[derive(Deserialize)]
struct ErrorBody {
	#[serde(default)]
	message: Option<String>,
}

/// Buffered gateway reply.
#[derive(Clone, Debug)]
pub struct GatewayResponse {
	/// HTTP status.
	pub status: StatusCode,
	/// Raw body.
	pub body: Vec<u8>,
}
impl GatewayResponse {
	/// Returns `true` for 2xx statuses.
	pub fn is_success(&self) -> bool {
		self.status.is_success()
	}

	/// Fails with [`RemoteError::Rejected`] unless the status is 2xx.
	pub fn success(self) -> Result<Self> {
		if self.is_success() { Ok(self) } else { Err(self.rejection().into()) }
	}

	/// Decodes the body as JSON, reporting the failing path on mismatch.
	pub fn json<T>(&self) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let mut deserializer = serde_json::Deserializer::from_slice(&self.body);

		serde_path_to_error::deserialize(&mut deserializer).map_err(|source| {
			RemoteError::ResponseParse { source, status: self.status.as_u16() }.into()
		})
	}

	/// Body as UTF-8 text.
	pub fn text(&self) -> Result<String> {
		String::from_utf8(self.body.clone()).map_err(|e| {
			RemoteError::UnexpectedPayload { message: format!("Body is not UTF-8: {e}.") }.into()
		})
	}

	/// Builds the rejection for a non-success reply from its `{ message }` body.
	pub fn rejection(&self) -> RemoteError {
		let message = serde_json::from_slice::<ErrorBody>(&self.body)
			.ok()
			.and_then(|body| body.message)
			.filter(|message| !message.trim().is_empty())
			.unwrap_or_else(|| UNKNOWN_ERROR_MESSAGE.to_owned());

		RemoteError::Rejected { status: self.status.as_u16(), message }
	}
}
