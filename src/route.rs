//! Navigation surface: the client's routes and the capability used to move between them.

// self
use crate::_prelude::*;

/// Destinations reachable in the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Route {
	/// Sign-in form; the entry point.
	Login,
	/// Sign-up form.
	Register,
	/// Protected landing page hosting the calculator and balance.
	Home,
	/// Protected list of past operations.
	OperationsHistory,
	/// Landing page reached only through an access-guard redirect.
	Unauthorized,
	/// Catch-all for unknown paths.
	NotFound,
}
impl Route {
	/// Path the route is mounted at. [`Route::NotFound`] reports the catch-all pattern.
	pub const fn path(self) -> &'static str {
		match self {
			Route::Login => "/",
			Route::Register => "/register",
			Route::Home => "/home",
			Route::OperationsHistory => "/operations-history",
			Route::Unauthorized => "/error",
			Route::NotFound => "/*",
		}
	}

	/// Returns `true` for routes behind the access guard.
	pub const fn is_protected(self) -> bool {
		matches!(self, Route::Home | Route::OperationsHistory)
	}

	/// Maps a request path onto a route, ignoring query strings, fragments, and a trailing slash.
	pub fn resolve(path: &str) -> Self {
		let path = path.split(['?', '#']).next().unwrap_or_default();
		let trimmed = path.trim_end_matches('/');

		match trimmed {
			"" => Route::Login,
			"/register" => Route::Register,
			"/home" => Route::Home,
			"/operations-history" => Route::OperationsHistory,
			"/error" => Route::Unauthorized,
			_ => Route::NotFound,
		}
	}
}
impl Display for Route {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.path())
	}
}

/// Capability that moves the user to another route.
pub trait Navigator
where
	Self: Send + Sync,
{
	/// Requests navigation to `destination`.
	fn navigate(&self, destination: Route);
}

/// [`Navigator`] that records every navigation; useful for headless embeddings and tests.
#[derive(Clone, Debug, Default)]
pub struct RecordingNavigator(Arc<Mutex<Vec<Route>>>);
impl RecordingNavigator {
	/// Most recent destination, if any.
	pub fn current(&self) -> Option<Route> {
		self.0.lock().last().copied()
	}

	/// All destinations in navigation order.
	pub fn history(&self) -> Vec<Route> {
		self.0.lock().clone()
	}
}
impl Navigator for RecordingNavigator {
	fn navigate(&self, destination: Route) {
		self.0.lock().push(destination);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn resolve_maps_known_paths() {
		assert_eq!(Route::resolve("/"), Route::Login);
		assert_eq!(Route::resolve(""), Route::Login);
		assert_eq!(Route::resolve("/home/"), Route::Home);
		assert_eq!(Route::resolve("/operations-history?page=2"), Route::OperationsHistory);
		assert_eq!(Route::resolve("/error#top"), Route::Unauthorized);
		assert_eq!(Route::resolve("/admin"), Route::NotFound);
	}

	#[test]
	fn only_home_and_history_are_protected() {
		let protected = [
			Route::Login,
			Route::Register,
			Route::Home,
			Route::OperationsHistory,
			Route::Unauthorized,
			Route::NotFound,
		]
		.into_iter()
		.filter(|route| route.is_protected())
		.collect::<Vec<_>>();

		assert_eq!(protected, vec![Route::Home, Route::OperationsHistory]);
	}

	#[test]
	fn recording_navigator_keeps_order() {
		let navigator = RecordingNavigator::default();

		navigator.navigate(Route::Home);
		navigator.navigate(Route::Unauthorized);

		assert_eq!(navigator.current(), Some(Route::Unauthorized));
		assert_eq!(navigator.history(), vec![Route::Home, Route::Unauthorized]);
	}
}
