//! Calculator input: keys and the pending expression text.

// self
use crate::_prelude::*;

/// Text that represents an empty expression.
pub const EMPTY_SENTINEL: &str = "0";

/// Arithmetic operators offered by the keypad.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
	/// `+`
	Add,
	/// `-`
	Subtract,
	/// `*`
	Multiply,
	/// `/`
	Divide,
	/// `√`
	SquareRoot,
}
impl Operator {
	/// Display symbol appended to the expression.
	pub const fn symbol(self) -> char {
		match self {
			Operator::Add => '+',
			Operator::Subtract => '-',
			Operator::Multiply => '*',
			Operator::Divide => '/',
			Operator::SquareRoot => '√',
		}
	}
}

/// A decimal digit, `0` through `9`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Digit(u8);
impl Digit {
	/// Validates a digit value.
	pub fn new(value: u8) -> Result<Self, KeyError> {
		if value > 9 {
			return Err(KeyError::DigitOutOfRange { digit: value });
		}

		Ok(Self(value))
	}

	/// Numeric value of the digit.
	pub const fn get(self) -> u8 {
		self.0
	}
}
impl TryFrom<u8> for Digit {
	type Error = KeyError;

	fn try_from(value: u8) -> Result<Self, Self::Error> {
		Self::new(value)
	}
}
impl From<Digit> for u8 {
	fn from(digit: Digit) -> Self {
		digit.0
	}
}

/// A single keypad key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
	/// Digit key.
	Digit(Digit),
	/// Decimal point.
	Decimal,
	/// Operator key.
	Operator(Operator),
}
impl Key {
	/// Digit key for `value`, rejecting anything above `9`.
	pub fn digit(value: u8) -> Result<Self, KeyError> {
		Digit::new(value).map(Key::Digit)
	}

	/// Display symbol appended to the expression.
	pub fn symbol(self) -> char {
		match self {
			Key::Digit(digit) => char::from(b'0' + digit.get()),
			Key::Decimal => '.',
			Key::Operator(operator) => operator.symbol(),
		}
	}
}
impl TryFrom<char> for Key {
	type Error = KeyError;

	fn try_from(c: char) -> Result<Self, Self::Error> {
		let key = match c {
			'0'..='9' => Key::Digit(Digit(c as u8 - b'0')),
			'.' => Key::Decimal,
			'+' => Key::Operator(Operator::Add),
			'-' => Key::Operator(Operator::Subtract),
			'*' => Key::Operator(Operator::Multiply),
			'/' => Key::Operator(Operator::Divide),
			'√' => Key::Operator(Operator::SquareRoot),
			_ => return Err(KeyError::Unknown { input: c.to_string() }),
		};

		Ok(key)
	}
}
impl FromStr for Key {
	type Err = KeyError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let mut chars = s.chars();

		match (chars.next(), chars.next()) {
			(Some(c), None) => Key::try_from(c),
			_ => Err(KeyError::Unknown { input: s.to_owned() }),
		}
	}
}
impl Display for Key {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "{}", self.symbol())
	}
}

/// Input that does not correspond to a keypad key.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum KeyError {
	/// Not a digit, decimal point, or operator symbol.
	#[error("`{input}` is not a calculator key.")]
	Unknown {
		/// Rejected input.
		input: String,
	},
	/// A digit value above `9`.
	#[error("{digit} is not a single decimal digit.")]
	DigitOutOfRange {
		/// Rejected value.
		digit: u8,
	},
}

/// Pending, unevaluated calculator input. Never empty; `"0"` means "nothing entered".
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Expression(String);
impl Expression {
	/// Creates the empty expression.
	pub fn new() -> Self {
		Self(EMPTY_SENTINEL.to_owned())
	}

	/// Replaces the expression with evaluator output; blank output becomes the sentinel.
	pub fn from_result(result: &str) -> Self {
		if result.trim().is_empty() { Self::new() } else { Self(result.to_owned()) }
	}

	/// Appends a key, replacing the sentinel on the first key.
	pub fn push(&mut self, key: Key) {
		if self.is_empty_sentinel() {
			self.0.clear();
		}

		self.0.push(key.symbol());
	}

	/// Resets to the sentinel.
	pub fn reset(&mut self) {
		EMPTY_SENTINEL.clone_into(&mut self.0);
	}

	/// Returns `true` when nothing has been entered.
	pub fn is_empty_sentinel(&self) -> bool {
		self.0 == EMPTY_SENTINEL
	}

	/// Expression text.
	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Text in the form the remote evaluator expects.
	pub fn normalized(&self) -> String {
		normalize_roots(&self.0)
	}
}
impl Default for Expression {
	fn default() -> Self {
		Self::new()
	}
}
impl AsRef<str> for Expression {
	fn as_ref(&self) -> &str {
		self.as_str()
	}
}
impl Display for Expression {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}

/// Rewrites `√9` and `√(9)` as `sqrt(9)` for every occurrence.
///
/// A `√` not followed by a digit run, bare or parenthesised, is copied unchanged so the remote
/// evaluator can reject it.
pub fn normalize_roots(input: &str) -> String {
	let mut out = String::with_capacity(input.len() + 8);
	let mut rest = input;

	while let Some(at) = rest.find('√') {
		out.push_str(&rest[..at]);

		let after = &rest[at + '√'.len_utf8()..];

		match root_operand(after) {
			Some((digits, consumed)) => {
				out.push_str("sqrt(");
				out.push_str(digits);
				out.push(')');

				rest = &after[consumed..];
			},
			None => {
				out.push('√');

				rest = after;
			},
		}
	}

	out.push_str(rest);

	out
}

// Returns the digit run and how many bytes of `after` it spans, parentheses included.
fn root_operand(after: &str) -> Option<(&str, usize)> {
	let leading_digits = |s: &str| s.bytes().take_while(u8::is_ascii_digit).count();

	if let Some(inner) = after.strip_prefix('(') {
		let len = leading_digits(inner);

		if len > 0 && inner[len..].starts_with(')') {
			return Some((&inner[..len], len + 2));
		}

		return None;
	}

	let len = leading_digits(after);

	(len > 0).then(|| (&after[..len], len))
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn first_key_replaces_sentinel() {
		let mut expression = Expression::new();

		expression.push(Key::digit(1).expect("1 is a digit."));

		assert_eq!(expression.as_str(), "1");

		expression.push(Key::digit(2).expect("2 is a digit."));

		assert_eq!(expression.as_str(), "12");
	}

	#[test]
	fn appending_concatenates_symbols_without_validation() {
		let mut expression = Expression::new();

		for c in "0+*..√/-3".chars() {
			expression.push(Key::try_from(c).expect("Every char is a keypad key."));
		}

		assert_eq!(expression.as_str(), "+*..√/-3");
	}

	#[test]
	fn reset_is_idempotent() {
		let mut expression = Expression::from_result("42");

		expression.reset();

		let once = expression.clone();

		expression.reset();

		assert_eq!(expression, once);
		assert!(expression.is_empty_sentinel());
	}

	#[test]
	fn blank_results_become_the_sentinel() {
		assert!(Expression::from_result("").is_empty_sentinel());
		assert!(Expression::from_result("  ").is_empty_sentinel());
		assert_eq!(Expression::from_result("3.5").as_str(), "3.5");
	}

	#[test]
	fn key_parsing_rejects_non_keys() {
		assert_eq!("√".parse::<Key>(), Ok(Key::Operator(Operator::SquareRoot)));
		assert_eq!("7".parse::<Key>(), Key::digit(7));
		assert!("12".parse::<Key>().is_err());
		assert!("".parse::<Key>().is_err());
		assert!(Key::try_from('x').is_err());
		assert_eq!(Key::digit(4).map(|key| key.to_string()), Ok("4".to_owned()));
	}

	#[test]
	fn out_of_range_digits_are_rejected() {
		assert_eq!(Key::digit(12), Err(KeyError::DigitOutOfRange { digit: 12 }));
		assert_eq!(Key::digit(9).map(Key::symbol), Ok('9'));
		assert!(serde_json::from_str::<Key>(r#"{"Digit":12}"#).is_err());
		assert_eq!(
			serde_json::from_str::<Key>(r#"{"Digit":7}"#).expect("7 should deserialize."),
			Key::Digit(Digit::new(7).expect("7 is a digit."))
		);
	}

	#[test]
	fn normalize_roots_rewrites_both_forms() {
		assert_eq!(normalize_roots("√(9)"), "sqrt(9)");
		assert_eq!(normalize_roots("√9"), "sqrt(9)");
		assert_eq!(normalize_roots("√16+√(25)*2"), "sqrt(16)+sqrt(25)*2");
		assert_eq!(normalize_roots("12+3"), "12+3");
	}

	#[test]
	fn normalize_roots_leaves_unmatched_roots() {
		assert_eq!(normalize_roots("√"), "√");
		assert_eq!(normalize_roots("√(9"), "√(9");
		assert_eq!(normalize_roots("√()+1"), "√()+1");
		assert_eq!(normalize_roots("2√.5"), "2√.5");
	}
}
