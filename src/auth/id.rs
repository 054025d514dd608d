//! Strongly typed identifiers used across the client domain.

// self
use crate::_prelude::*;

macro_rules! def_numeric_id {
	($name:ident, $doc:literal, $kind:literal) => {
		#[doc = $doc]
		#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
		#[serde(try_from = "NumericRepr", into = "u64")]
		pub struct $name(u64);
		impl $name {
			/// Wraps a raw numeric identifier.
			pub const fn new(value: u64) -> Self {
				Self(value)
			}

			/// Returns the raw numeric value.
			pub const fn get(self) -> u64 {
				self.0
			}
		}
		impl From<u64> for $name {
			fn from(value: u64) -> Self {
				Self(value)
			}
		}
		impl From<$name> for u64 {
			fn from(value: $name) -> Self {
				value.0
			}
		}
		impl TryFrom<NumericRepr> for $name {
			type Error = IdentifierError;

			fn try_from(value: NumericRepr) -> Result<Self, Self::Error> {
				match value {
					NumericRepr::Number(n) => Ok(Self(n)),
					NumericRepr::Text(s) => s.parse(),
				}
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				write!(f, concat!($kind, "({})"), self.0)
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				write!(f, "{}", self.0)
			}
		}
		impl FromStr for $name {
			type Err = IdentifierError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				let trimmed = s.trim();

				if trimmed.is_empty() {
					return Err(IdentifierError::Empty { kind: $kind });
				}

				trimmed
					.parse::<u64>()
					.map(Self)
					.map_err(|_| IdentifierError::NotNumeric { kind: $kind, value: s.to_owned() })
			}
		}
	};
}

const NAME_MAX_LEN: usize = 128;

/// Error returned when identifier validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// The identifier was empty or whitespace.
	#[error("{kind} identifier cannot be empty.")]
	Empty {
		/// Kind of identifier (user, user name, operation).
		kind: &'static str,
	},
	/// The identifier starts or ends with whitespace.
	#[error("{kind} identifier has surrounding whitespace.")]
	SurroundingWhitespace {
		/// Kind of identifier (user, user name, operation).
		kind: &'static str,
	},
	/// The identifier exceeded the allowed character count.
	#[error("{kind} identifier exceeds {max} characters.")]
	TooLong {
		/// Kind of identifier (user, user name, operation).
		kind: &'static str,
		/// Maximum permitted character count.
		max: usize,
	},
	/// A numeric identifier could not be parsed.
	#[error("{kind} identifier `{value}` is not a non-negative integer.")]
	NotNumeric {
		/// Kind of identifier (user, user name, operation).
		kind: &'static str,
		/// Raw value that failed to parse.
		value: String,
	},
}

/// Wire representation accepted for numeric identifiers: the gateway has emitted both JSON
/// numbers and numeric strings.
#[doc(hidden)]
#[derive(Deserialize)]
#[serde(untagged)]
pub enum NumericRepr {
	/// Plain JSON number.
	Number(u64),
	/// Decimal digits carried as a string.
	Text(String),
}

def_numeric_id! { UserId, "Numeric identifier assigned to a user by the ledger service.", "User" }
def_numeric_id! { OperationId, "Identifier of a recorded ledger operation.", "Operation" }

/// Login name chosen at sign-up.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserName(String);
impl UserName {
	const KIND: &'static str = "UserName";

	/// Validates and wraps a login name.
	pub fn new(value: impl Into<String>) -> Result<Self, IdentifierError> {
		let value = value.into();

		if value.trim().is_empty() {
			return Err(IdentifierError::Empty { kind: Self::KIND });
		}
		if value.trim() != value {
			return Err(IdentifierError::SurroundingWhitespace { kind: Self::KIND });
		}
		if value.chars().count() > NAME_MAX_LEN {
			return Err(IdentifierError::TooLong { kind: Self::KIND, max: NAME_MAX_LEN });
		}

		Ok(Self(value))
	}
}
impl AsRef<str> for UserName {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl TryFrom<String> for UserName {
	type Error = IdentifierError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		Self::new(value)
	}
}
impl From<UserName> for String {
	fn from(value: UserName) -> Self {
		value.0
	}
}
impl Debug for UserName {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "UserName({})", self.0)
	}
}
impl Display for UserName {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}
