//! Sign-up flow: validate, create the account, then return to the sign-in page.

// self
use crate::{
	flows::{
		LedgerClient,
		common::{FormOutcome, SignUpForm},
	},
	notify::NoticeKind,
	obs::trace_event,
	route::Route,
};

/// Notice shown after an account was created.
pub const SIGN_UP_SUCCESS: &str = "User created successfully!";
/// Notice shown when account creation fails.
pub const SIGN_UP_FAILURE: &str = "Error creating a user";

impl LedgerClient {
	/// Creates an account and navigates to [`Route::Login`].
	pub async fn sign_up(&self, form: SignUpForm) -> FormOutcome {
		let (user_name, password) = match form.validate() {
			Ok(valid) => valid,
			Err(errors) => return FormOutcome::Invalid(errors),
		};

		match self.auth.register(&user_name, password).await {
			Ok(()) => {
				self.notifier.notify(NoticeKind::Success, SIGN_UP_SUCCESS);
				self.navigator.navigate(Route::Login);

				FormOutcome::Completed
			},
			Err(e) => {
				trace_event!(warn, error = %e, user = %user_name, "Sign-up failed.");

				self.notifier.notify(NoticeKind::Error, SIGN_UP_FAILURE);

				FormOutcome::Failed
			},
		}
	}
}
