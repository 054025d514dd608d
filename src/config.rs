//! Client configuration and its validating builder.

// std
use std::time::Duration as StdDuration;
// self
use crate::{_prelude::*, error::ConfigError};

/// Public gateway used when no base URL is configured.
pub const DEFAULT_BASE_URL: &str = "https://gateway-api-d8a0222e1f5e.herokuapp.com";
/// Request timeout used when none is configured.
pub const DEFAULT_REQUEST_TIMEOUT: StdDuration = StdDuration::from_secs(30);
/// Environment variable overriding the base URL.
pub const ENV_BASE_URL: &str = "LEDGER_API_URL";
/// Environment variable overriding the request timeout, in whole seconds.
pub const ENV_TIMEOUT_SECS: &str = "LEDGER_API_TIMEOUT_SECS";

/// Validated settings for the HTTP-backed services.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
	/// Gateway root; always ends with `/` so endpoint paths join beneath it.
	pub base_url: Url,
	/// Per-request timeout.
	pub request_timeout: StdDuration,
}
impl ClientConfig {
	/// Starts a builder seeded with the defaults.
	pub fn builder() -> ClientConfigBuilder {
		ClientConfigBuilder::default()
	}

	/// Reads overrides from the process environment.
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_lookup(|name| std::env::var(name).ok())
	}

	/// Reads overrides through `lookup`, falling back to the defaults for unset names.
	pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let mut builder = Self::builder();

		if let Some(url) = lookup(ENV_BASE_URL) {
			builder = builder.base_url(url);
		}
		if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
			let secs = raw.trim().parse::<u64>().map_err(|e| ConfigError::InvalidEnv {
				name: ENV_TIMEOUT_SECS,
				reason: e.to_string(),
			})?;

			builder = builder.request_timeout(StdDuration::from_secs(secs));
		}

		builder.build()
	}

	/// Resolves an endpoint path against the base URL.
	pub fn endpoint(&self, path: &str) -> Result<Url, ConfigError> {
		self.base_url
			.join(path.trim_start_matches('/'))
			.map_err(|source| ConfigError::InvalidEndpoint { path: path.to_owned(), source })
	}
}

/// Builder for [`ClientConfig`].
#[derive(Clone, Debug)]
pub struct ClientConfigBuilder {
	/// Raw base URL.
	pub base_url: String,
	/// Per-request timeout.
	pub request_timeout: StdDuration,
	/// Accept plain `http` base URLs (local gateways and tests).
	pub allow_insecure_http: bool,
}
impl ClientConfigBuilder {
	/// Overrides the base URL.
	pub fn base_url(mut self, url: impl Into<String>) -> Self {
		self.base_url = url.into();

		self
	}

	/// Overrides the request timeout.
	pub fn request_timeout(mut self, timeout: StdDuration) -> Self {
		self.request_timeout = timeout;

		self
	}

	/// Allows `http` base URLs.
	pub fn allow_insecure_http(mut self, allow: bool) -> Self {
		self.allow_insecure_http = allow;

		self
	}

	/// Validates and produces the configuration.
	pub fn build(self) -> Result<ClientConfig, ConfigError> {
		if self.request_timeout.is_zero() {
			return Err(ConfigError::ZeroTimeout);
		}

		let mut base_url = Url::parse(self.base_url.trim())
			.map_err(|source| ConfigError::InvalidBaseUrl { source })?;

		if base_url.cannot_be_a_base() {
			return Err(ConfigError::OpaqueBaseUrl { url: base_url.to_string() });
		}

		match base_url.scheme() {
			"https" => {},
			"http" if self.allow_insecure_http => {},
			_ => return Err(ConfigError::InsecureBaseUrl { url: base_url.to_string() }),
		}

		if !base_url.path().ends_with('/') {
			let path = format!("{}/", base_url.path());

			base_url.set_path(&path);
		}

		base_url.set_query(None);
		base_url.set_fragment(None);

		Ok(ClientConfig { base_url, request_timeout: self.request_timeout })
	}
}
impl Default for ClientConfigBuilder {
	fn default() -> Self {
		Self {
			base_url: DEFAULT_BASE_URL.to_owned(),
			request_timeout: DEFAULT_REQUEST_TIMEOUT,
			allow_insecure_http: false,
		}
	}
}
