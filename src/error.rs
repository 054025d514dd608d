//! Client-level error types shared across the session, guard, calculator, and transport layers.

// self
use crate::_prelude::*;

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Storage-layer failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS, timeout).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// The remote service rejected the call or answered with an unusable payload.
	#[error(transparent)]
	Remote(#[from] RemoteError),
	/// Credential payload could not be decoded.
	#[error(transparent)]
	Decode(#[from] crate::auth::DecodeError),

	/// An authenticated action was attempted without a stored credential.
	#[error("No session is stored; log in again.")]
	MissingSession,
	/// The stored credential is past its expiry.
	#[error("The stored session has expired.")]
	AuthExpired,
}

/// Configuration and validation failures raised while wiring the client.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// The configured base URL cannot be parsed.
	#[error("Base URL is invalid.")]
	InvalidBaseUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// The configured base URL cannot carry relative endpoint paths.
	#[error("Base URL `{url}` cannot be used as a base for endpoint paths.")]
	OpaqueBaseUrl {
		/// Offending URL.
		url: String,
	},
	/// The configured base URL does not use HTTPS.
	#[error("Base URL must use HTTPS: {url}.")]
	InsecureBaseUrl {
		/// Offending URL.
		url: String,
	},
	/// An endpoint path could not be joined onto the base URL.
	#[error("Endpoint `{path}` cannot be joined onto the base URL.")]
	InvalidEndpoint {
		/// Endpoint path that failed to join.
		path: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Request timeout must be strictly positive.
	#[error("Request timeout must be greater than zero.")]
	ZeroTimeout,
	/// An environment variable held an unusable value.
	#[error("Environment variable `{name}` is invalid: {reason}.")]
	InvalidEnv {
		/// Variable name.
		name: &'static str,
		/// Human-readable reason.
		reason: String,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Failures reported by (or parsed from) the remote service.
#[derive(Debug, ThisError)]
pub enum RemoteError {
	/// The service answered with a non-success status.
	#[error("Remote service rejected the request with status {status}: {message}.")]
	Rejected {
		/// HTTP status code.
		status: u16,
		/// Service-supplied message, or a generic fallback.
		message: String,
	},
	/// The service answered with JSON that does not match the expected shape.
	#[error("Remote service returned malformed JSON.")]
	ResponseParse {
		/// Structured parsing failure, including the JSON path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code of the response.
		status: u16,
	},
	/// The service answered with a well-formed payload that carries no usable value.
	#[error("Remote service returned an unexpected payload: {message}.")]
	UnexpectedPayload {
		/// Description of what was wrong with the payload.
		message: String,
	},
}
impl RemoteError {
	/// Returns the HTTP status associated with the failure, when known.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Rejected { status, .. } | Self::ResponseParse { status, .. } => Some(*status),
			Self::UnexpectedPayload { .. } => None,
		}
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the ledger service.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the ledger service.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}
