//! Browser-style client core for the ledger calculator gateway: a write-through session, an
//! expiry-aware access guard, and a calculator buffer that evaluates remotely.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod account;
#[cfg(feature = "reqwest")] pub mod api;
pub mod auth;
pub mod calculator;
pub mod config;
pub mod error;
pub mod flows;
pub mod guard;
pub mod history;
#[cfg(feature = "reqwest")] pub mod http;
pub mod notify;
pub mod obs;
pub mod route;
pub mod service;
pub mod session;
pub mod store;
#[doc(hidden)]
pub mod _preludet {
	//! Convenience re-exports and helpers shared by unit and integration tests.

	pub use crate::_prelude::*;

	// crates.io
	use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
	// self
	use crate::{
		session::SessionContext,
		store::{MemoryStore, TokenStore},
	};
	#[cfg(feature = "reqwest")]
	use crate::{
		api::LedgerApi,
		config::ClientConfig,
		flows::{LedgerClient, Services},
		http::ReqwestHttpClient,
		notify::RecordingNotifier,
		route::RecordingNavigator,
	};

	/// Encodes `claims` into an unsigned `header.payload.signature` token.
	pub fn unsigned_token(claims: &serde_json::Value) -> String {
		let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
		let payload = URL_SAFE_NO_PAD.encode(claims.to_string());

		format!("{header}.{payload}.unsigned")
	}

	/// Unsigned token whose `exp` lies `valid_for` after now (negative for already expired).
	pub fn token_expiring_in(valid_for: Duration) -> String {
		let exp = (OffsetDateTime::now_utc() + valid_for).unix_timestamp();

		unsigned_token(&serde_json::json!({ "exp": exp, "sub": "tests" }))
	}

	/// Session over a fresh in-memory backend; the backend handle observes persisted slots.
	pub fn memory_session() -> (Arc<SessionContext>, MemoryStore) {
		let backend = MemoryStore::default();
		let session = SessionContext::new(TokenStore::new(Arc::new(backend.clone())));

		(Arc::new(session), backend)
	}

	/// Plain-HTTP configuration pointing at a mock gateway.
	#[cfg(feature = "reqwest")]
	pub fn mock_gateway_config(base_url: &str) -> ClientConfig {
		ClientConfig::builder()
			.base_url(base_url)
			.allow_insecure_http(true)
			.build()
			.expect("Mock gateway URL should validate.")
	}

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	#[cfg(feature = "reqwest")]
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.redirect(reqwest::redirect::Policy::none())
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Gateway API against a mock server, over the insecure test transport.
	#[cfg(feature = "reqwest")]
	pub fn test_api(base_url: &str) -> LedgerApi {
		LedgerApi::with_http_client(mock_gateway_config(base_url), test_reqwest_http_client())
	}

	/// HTTP-backed client over `store` against a mock gateway.
	#[cfg(feature = "reqwest")]
	pub fn test_client_with_store(
		base_url: &str,
		store: TokenStore,
		navigator: RecordingNavigator,
		notifier: RecordingNotifier,
	) -> LedgerClient {
		LedgerClient::with_services(
			store,
			Services::shared(Arc::new(test_api(base_url))),
			Arc::new(navigator),
			Arc::new(notifier),
		)
	}

	/// HTTP-backed client against a mock gateway with recording navigation and notices.
	#[cfg(feature = "reqwest")]
	pub fn build_test_client(
		base_url: &str,
	) -> (LedgerClient, MemoryStore, RecordingNavigator, RecordingNotifier) {
		let backend = MemoryStore::default();
		let navigator = RecordingNavigator::default();
		let notifier = RecordingNotifier::default();
		let client = test_client_with_store(
			base_url,
			TokenStore::new(Arc::new(backend.clone())),
			navigator.clone(),
			notifier.clone(),
		);

		(client, backend, navigator, notifier)
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
