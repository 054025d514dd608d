//! Sign-in flow: validate, log in, store the credential, then enter the protected region.

// self
use crate::{
	_prelude::*,
	flows::{
		LedgerClient,
		common::{FormOutcome, SignInForm},
	},
	notify::NoticeKind,
	obs::trace_event,
	route::Route,
};

/// Notice shown after a successful sign-in.
pub const SIGN_IN_SUCCESS: &str = "Login success!";
/// Notice shown when sign-in fails for any reason past validation.
pub const SIGN_IN_FAILURE: &str = "An error occurred during login, please contact support";

impl LedgerClient {
	/// Signs the user in and navigates to [`Route::Home`].
	///
	/// Validation failures are returned without calling the service. Service and storage
	/// failures surface as a single error notice.
	pub async fn sign_in(&self, form: SignInForm) -> FormOutcome {
		let (user_name, password) = match form.validate() {
			Ok(valid) => valid,
			Err(errors) => return FormOutcome::Invalid(errors),
		};
		let result = async {
			let credential = self.auth.login(&user_name, password).await?;

			self.session.write(credential)?;

			Ok::<_, Error>(())
		}
		.await;

		match result {
			Ok(()) => {
				self.navigator.navigate(Route::Home);
				self.notifier.notify(NoticeKind::Success, SIGN_IN_SUCCESS);

				FormOutcome::Completed
			},
			Err(e) => {
				trace_event!(warn, error = %e, user = %user_name, "Sign-in failed.");

				self.notifier.notify(NoticeKind::Error, SIGN_IN_FAILURE);

				FormOutcome::Failed
			},
		}
	}

	/// Logs out locally and returns to [`Route::Login`].
	///
	/// A storage failure while deleting the persisted credential is logged; the in-memory session
	/// is cleared regardless.
	pub fn sign_out(&self) {
		if let Err(e) = self.session.clear() {
			trace_event!(warn, error = %e, "Sign-out could not delete the persisted session.");
		}

		self.navigator.navigate(Route::Login);
	}
}
