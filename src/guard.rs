//! Access guard for protected routes.
//!
//! The guard admits a protected view only while the session holds a credential whose expiry lies
//! in the future. It re-checks on every session change while a protected view is shown, and it
//! never renders protected content once a redirect has been decided.

// self
use crate::{
	_prelude::*,
	auth::Credential,
	obs::{self, trace_event},
	route::{Navigator, Route},
	session::{SessionContext, SubscriptionId},
};

/// Why a protected route was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RedirectReason {
	/// No credential is held.
	Absent,
	/// The credential expired or its payload could not be decoded.
	Expired,
}
impl RedirectReason {
	/// Stable label for logs and metrics.
	pub const fn as_str(self) -> &'static str {
		match self {
			RedirectReason::Absent => "absent",
			RedirectReason::Expired => "expired",
		}
	}
}

/// Result of a single guard evaluation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardDecision {
	/// The credential is valid; carries it for rendering.
	Admit(Credential),
	/// The user must leave the protected region.
	Redirect(RedirectReason),
}

/// Lifecycle of the guard relative to the protected region.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardState {
	/// No protected view is mounted.
	Idle,
	/// A protected view is mounted for the route.
	Admitted(Route),
	/// A redirect to [`Route::Unauthorized`] was issued.
	Redirecting,
}

/// Outcome of [`AccessGuard::enter`].
#[derive(Debug, PartialEq, Eq)]
pub enum Admission<V> {
	/// The view was rendered.
	Admitted(V),
	/// The view was not rendered; the navigator was sent to [`Route::Unauthorized`].
	Redirected(RedirectReason),
}
impl<V> Admission<V> {
	/// Rendered view, if admitted.
	pub fn into_view(self) -> Option<V> {
		match self {
			Admission::Admitted(view) => Some(view),
			Admission::Redirected(_) => None,
		}
	}
}

struct GuardCore {
	session: Arc<SessionContext>,
	navigator: Arc<dyn Navigator>,
	state: Mutex<GuardState>,
}
impl GuardCore {
	fn decide_at(&self, now: OffsetDateTime) -> GuardDecision {
		match self.session.require_valid_at(now) {
			Ok(credential) => GuardDecision::Admit(credential),
			Err(Error::MissingSession) => GuardDecision::Redirect(RedirectReason::Absent),
			Err(e) => {
				trace_event!(debug, error = %e, "Session credential is not usable.");

				GuardDecision::Redirect(RedirectReason::Expired)
			},
		}
	}

	fn evict(&self, reason: RedirectReason) {
		*self.state.lock() = GuardState::Redirecting;

		trace_event!(info, reason = reason.as_str(), "Redirecting away from a protected route.");
		obs::record_guard_redirect(reason.as_str());

		if reason == RedirectReason::Expired
			&& let Err(e) = self.session.clear()
		{
			trace_event!(warn, error = %e, "Failed to clear the expired session.");
		}

		self.navigator.navigate(Route::Unauthorized);
	}

	fn on_session_change(&self) {
		if !matches!(*self.state.lock(), GuardState::Admitted(_)) {
			return;
		}
		if let GuardDecision::Redirect(reason) = self.decide_at(OffsetDateTime::now_utc()) {
			self.evict(reason);
		}
	}
}

/// Gate in front of [`Route::Home`] and [`Route::OperationsHistory`].
pub struct AccessGuard {
	core: Arc<GuardCore>,
	subscription: SubscriptionId,
}
impl AccessGuard {
	/// Creates a guard and starts observing the session.
	pub fn new(session: Arc<SessionContext>, navigator: Arc<dyn Navigator>) -> Self {
		let core =
			Arc::new(GuardCore { session, navigator, state: Mutex::new(GuardState::Idle) });
		let weak = Arc::downgrade(&core);
		let subscription = core.session.subscribe(Arc::new(move |_| {
			if let Some(core) = weak.upgrade() {
				core.on_session_change();
			}
		}));

		Self { core, subscription }
	}

	/// Evaluates the session against the provided instant.
	pub fn decide_at(&self, now: OffsetDateTime) -> GuardDecision {
		self.core.decide_at(now)
	}

	/// Evaluates the session against the current clock.
	pub fn decide(&self) -> GuardDecision {
		self.decide_at(OffsetDateTime::now_utc())
	}

	/// Enters `route`, rendering it only when access is allowed.
	///
	/// Unprotected routes render without a check. For protected routes `render` is never called
	/// on a redirect; an expired credential is also cleared from the session.
	pub fn enter<V, F>(&self, route: Route, render: F) -> Admission<V>
	where
		F: FnOnce(Option<&Credential>) -> V,
	{
		if !route.is_protected() {
			return Admission::Admitted(render(self.core.session.read().as_ref()));
		}

		match self.decide() {
			GuardDecision::Admit(credential) => {
				*self.core.state.lock() = GuardState::Admitted(route);

				Admission::Admitted(render(Some(&credential)))
			},
			GuardDecision::Redirect(reason) => {
				self.core.evict(reason);

				Admission::Redirected(reason)
			},
		}
	}

	/// Marks the protected view as unmounted; later session changes are ignored.
	pub fn leave(&self) {
		*self.core.state.lock() = GuardState::Idle;
	}

	/// Current lifecycle state.
	pub fn state(&self) -> GuardState {
		*self.core.state.lock()
	}
}
impl Drop for AccessGuard {
	fn drop(&mut self) {
		self.core.session.unsubscribe(self.subscription);
	}
}
impl Debug for AccessGuard {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AccessGuard").field("state", &self.state()).finish()
	}
}
