//! Shared form types and validation for the sign-in and sign-up flows.

// self
use crate::{
	_prelude::*,
	auth::{Password, UserName},
};

/// Minimum password length, in characters.
pub const MIN_PASSWORD_CHARS: usize = 6;

/// A form field that failed validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldError {
	/// User name missing or malformed.
	UserName,
	/// Password shorter than [`MIN_PASSWORD_CHARS`].
	Password,
}
impl FieldError {
	/// Message shown under the field.
	pub const fn message(self) -> &'static str {
		match self {
			FieldError::UserName => "Please enter a valid username.",
			FieldError::Password => "Password must be at least 6 characters long.",
		}
	}
}
impl Display for FieldError {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.message())
	}
}

/// Result of submitting a form. Failures are already surfaced as notices.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormOutcome {
	/// The flow completed and navigation happened.
	Completed,
	/// Validation failed; the service was not called.
	Invalid(Vec<FieldError>),
	/// The service or storage failed.
	Failed,
}

/// Raw credentials entered on the sign-in or sign-up page.
#[derive(Clone, Debug)]
pub struct AccountForm {
	/// User name as typed.
	pub user_name: String,
	/// Password as typed.
	pub password: Password,
}
impl AccountForm {
	/// Captures the typed values.
	pub fn new(user_name: impl Into<String>, password: impl Into<String>) -> Self {
		Self { user_name: user_name.into(), password: Password::new(password) }
	}

	/// Checks every field and reports all failures at once.
	pub fn validate(&self) -> Result<(UserName, &Password), Vec<FieldError>> {
		let user_name = UserName::new(self.user_name.trim());
		let password_ok = self.password.char_len() >= MIN_PASSWORD_CHARS;

		match (user_name, password_ok) {
			(Ok(user_name), true) => Ok((user_name, &self.password)),
			(user_name, password_ok) => {
				let mut errors = Vec::with_capacity(2);

				if user_name.is_err() {
					errors.push(FieldError::UserName);
				}
				if !password_ok {
					errors.push(FieldError::Password);
				}

				Err(errors)
			},
		}
	}
}

/// Sign-in form.
pub type SignInForm = AccountForm;
/// Sign-up form.
pub type SignUpForm = AccountForm;
