//! Bearer credential issued at login and the claims embedded in its payload.

// crates.io
use base64::{
	Engine as _, alphabet,
	engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
};
// self
use crate::{
	_prelude::*,
	auth::{TokenSecret, UserId},
};

/// Accepts base64url payloads with or without trailing padding.
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
	&alphabet::URL_SAFE,
	GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Reasons a credential payload cannot be decoded.
#[derive(Debug, ThisError)]
pub enum DecodeError {
	/// The token is not made of `header.payload.signature`.
	#[error("Token must have 3 dot-separated segments, found {found}.")]
	Segments {
		/// Number of segments present.
		found: usize,
	},
	/// The payload segment is not valid base64url.
	#[error("Token payload is not valid base64url.")]
	Base64(#[from] base64::DecodeError),
	/// The payload is not a JSON object with a numeric `exp` claim.
	#[error("Token payload is not a valid claims object.")]
	Claims(#[source] serde_json::Error),
	/// The `exp` claim cannot be represented as an instant.
	#[error("Token expiry {exp} is out of range.")]
	ExpiryOutOfRange {
		/// Raw claim value.
		exp: f64,
	},
}

/// Registered claims the client relies on.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct TokenClaims {
	/// Expiry, in seconds since the Unix epoch. Fractional values are allowed.
	pub exp: f64,
	/// Subject claim, when the issuer includes one.
	#[serde(default)]
	pub sub: Option<String>,
}
impl TokenClaims {
	/// Converts the `exp` claim into an instant.
	pub fn expires_at(&self) -> Result<OffsetDateTime, DecodeError> {
		let exp = self.exp;

		if !exp.is_finite() {
			return Err(DecodeError::ExpiryOutOfRange { exp });
		}

		let nanos = (exp * 1_000_000_000_f64).round() as i128;

		OffsetDateTime::from_unix_timestamp_nanos(nanos)
			.map_err(|_| DecodeError::ExpiryOutOfRange { exp })
	}
}

/// Authenticated session identity: the bearer token plus the user it was issued to.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
	/// Opaque bearer token; callers must avoid logging it.
	pub token: TokenSecret,
	/// User the token was issued to.
	#[serde(rename = "userId")]
	pub user_id: UserId,
}
impl Credential {
	/// Pairs a token with its user.
	pub fn new(token: impl Into<String>, user_id: UserId) -> Self {
		Self { token: TokenSecret::new(token), user_id }
	}

	/// Decodes the claims embedded in the token payload without verifying the signature.
	pub fn claims(&self) -> Result<TokenClaims, DecodeError> {
		decode_claims(self.token.expose())
	}

	/// Decoded expiry instant.
	pub fn expires_at(&self) -> Result<OffsetDateTime, DecodeError> {
		self.claims()?.expires_at()
	}

	/// `Authorization` header value for authenticated calls.
	pub fn bearer(&self) -> String {
		format!("Bearer {}", self.token.expose())
	}
}
impl Debug for Credential {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Credential")
			.field("token", &"<redacted>")
			.field("user_id", &self.user_id)
			.finish()
	}
}

/// Decodes the payload segment of a `header.payload.signature` token.
pub fn decode_claims(token: &str) -> Result<TokenClaims, DecodeError> {
	let segments = token.split('.').collect::<Vec<_>>();

	if segments.len() != 3 {
		return Err(DecodeError::Segments { found: segments.len() });
	}

	let payload = PAYLOAD_ENGINE.decode(segments[1])?;

	serde_json::from_slice(&payload).map_err(DecodeError::Claims)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::_preludet::unsigned_token;

	#[test]
	fn decodes_integer_and_fractional_expiry() {
		let token = unsigned_token(&serde_json::json!({ "exp": 1_700_000_000, "sub": "7" }));
		let claims = decode_claims(&token).expect("Integer expiry should decode.");

		assert_eq!(claims.exp, 1_700_000_000_f64);
		assert_eq!(claims.sub.as_deref(), Some("7"));
		assert_eq!(
			claims.expires_at().expect("Expiry should be in range.").unix_timestamp(),
			1_700_000_000
		);

		let token = unsigned_token(&serde_json::json!({ "exp": 1_700_000_000.5 }));
		let expires_at = decode_claims(&token)
			.and_then(|claims| claims.expires_at())
			.expect("Fractional expiry should decode.");

		assert_eq!(expires_at.unix_timestamp(), 1_700_000_000);
		assert_eq!(expires_at.nanosecond(), 500_000_000);
	}

	#[test]
	fn accepts_padded_payloads() {
		let padded = base64::engine::general_purpose::URL_SAFE.encode(br#"{"exp":1}"#);
		let token = format!("e30.{padded}.sig");

		assert_eq!(decode_claims(&token).expect("Padded payload should decode.").exp, 1.0);
	}

	#[test]
	fn rejects_malformed_tokens() {
		assert!(matches!(decode_claims("not-a-jwt"), Err(DecodeError::Segments { found: 1 })));
		assert!(matches!(decode_claims("a.%%%.c"), Err(DecodeError::Base64(_))));

		let no_exp = unsigned_token(&serde_json::json!({ "sub": "7" }));

		assert!(matches!(decode_claims(&no_exp), Err(DecodeError::Claims(_))));

		let text_exp = unsigned_token(&serde_json::json!({ "exp": "tomorrow" }));

		assert!(matches!(decode_claims(&text_exp), Err(DecodeError::Claims(_))));

		let huge = TokenClaims { exp: 1e300, sub: None };

		assert!(matches!(huge.expires_at(), Err(DecodeError::ExpiryOutOfRange { .. })));
	}

	#[test]
	fn debug_redacts_token() {
		let credential = Credential::new("secret-token", UserId::new(3));
		let rendered = format!("{credential:?}");

		assert!(!rendered.contains("secret-token"));
		assert!(rendered.contains("User(3)"));
		assert_eq!(credential.bearer(), "Bearer secret-token");
	}
}
