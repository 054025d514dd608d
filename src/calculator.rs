//! Calculator input buffer with remote evaluation.
//!
//! [`Calculator`] accumulates keystrokes into an [`Expression`] and hands it to a
//! [`RemoteEvaluator`] on demand. Key presses and clears are synchronous. An evaluation captures
//! the expression when it is requested; its result overwrites whatever the buffer holds when the
//! response lands, and overlapping evaluations resolve in completion order.

pub mod expression;

pub use expression::*;

// std
use std::sync::Weak;
// self
use crate::{
	_prelude::*,
	notify::{NoticeKind, Notifier},
	obs::trace_event,
	service::{Evaluation, RemoteEvaluator},
	session::SessionContext,
};

/// Message shown when evaluation is attempted without a session.
pub const MISSING_SESSION_MESSAGE: &str = "Log in again to get user id, user id not found";

/// Callback invoked with the display text of every successful evaluation.
pub type ResultListener = Arc<dyn Fn(&str) + Send + Sync>;

/// Future returned by [`Calculator::evaluate`]; owns everything it needs.
pub type EvaluateFuture = Pin<Box<dyn Future<Output = EvaluateOutcome> + Send + 'static>>;

/// How an evaluation ended. Evaluation never returns an error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EvaluateOutcome {
	/// The expression now holds the result.
	Updated(String),
	/// The evaluator failed; the expression was reset to `"0"`.
	Reset,
	/// No session was held; nothing was sent and the expression is unchanged.
	Aborted,
	/// The calculator was dropped before the response arrived.
	Discarded,
}

struct CalculatorShared {
	expression: Mutex<Expression>,
	on_result_change: RwLock<Option<ResultListener>>,
}

/// Calculator bound to a session, an evaluator, and a notifier.
pub struct Calculator {
	shared: Arc<CalculatorShared>,
	session: Arc<SessionContext>,
	evaluator: Arc<dyn RemoteEvaluator>,
	notifier: Arc<dyn Notifier>,
}
impl Calculator {
	/// Creates a calculator showing `"0"`.
	pub fn new(
		session: Arc<SessionContext>,
		evaluator: Arc<dyn RemoteEvaluator>,
		notifier: Arc<dyn Notifier>,
	) -> Self {
		Self {
			shared: Arc::new(CalculatorShared {
				expression: Mutex::new(Expression::new()),
				on_result_change: RwLock::new(None),
			}),
			session,
			evaluator,
			notifier,
		}
	}

	/// Registers the listener told about every successful result.
	pub fn with_result_listener(self, listener: ResultListener) -> Self {
		*self.shared.on_result_change.write() = Some(listener);

		self
	}

	/// Current expression text.
	pub fn expression(&self) -> String {
		self.shared.expression.lock().as_str().to_owned()
	}

	/// Appends a key.
	pub fn append(&self, key: Key) {
		self.shared.expression.lock().push(key);
	}

	/// Parses and appends a key; unknown input leaves the buffer untouched.
	pub fn input(&self, key: &str) -> Result<(), KeyError> {
		let key = key.parse()?;

		self.append(key);

		Ok(())
	}

	/// Resets the expression to `"0"`.
	pub fn clear(&self) {
		self.shared.expression.lock().reset();
	}

	/// Sends the current expression to the evaluator.
	///
	/// The session and the expression are captured now; the returned future performs the remote
	/// call and applies its result. Without a session the future is already complete with
	/// [`EvaluateOutcome::Aborted`].
	pub fn evaluate(&self) -> EvaluateFuture {
		let Ok(credential) = self.session.require() else {
			self.notifier.notify(NoticeKind::Error, MISSING_SESSION_MESSAGE);

			return Box::pin(async { EvaluateOutcome::Aborted });
		};
		let normalized = self.shared.expression.lock().normalized();
		let shared = Arc::downgrade(&self.shared);
		let evaluator = self.evaluator.clone();
		let notifier = self.notifier.clone();

		Box::pin(async move {
			let outcome = evaluator.evaluate(&credential, &normalized).await;

			settle(shared, notifier.as_ref(), outcome)
		})
	}
}
impl Debug for Calculator {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Calculator").field("expression", &self.expression()).finish()
	}
}

fn settle(
	shared: Weak<CalculatorShared>,
	notifier: &dyn Notifier,
	outcome: Result<Evaluation>,
) -> EvaluateOutcome {
	match outcome {
		Ok(evaluation) => {
			let Some(shared) = shared.upgrade() else {
				trace_event!(debug, "Dropping an evaluation result for a closed calculator.");

				return EvaluateOutcome::Discarded;
			};
			let expression = Expression::from_result(&evaluation.result);
			let text = expression.as_str().to_owned();

			*shared.expression.lock() = expression;

			let listener = shared.on_result_change.read().clone();

			if let Some(listener) = listener {
				listener(&text);
			}

			EvaluateOutcome::Updated(text)
		},
		Err(e) => {
			trace_event!(warn, error = %e, "Remote evaluation failed.");

			notifier.notify(
				NoticeKind::Error,
				&format!("An error occurred when trying to calculate operation: {e}"),
			);

			match shared.upgrade() {
				Some(shared) => {
					shared.expression.lock().reset();

					EvaluateOutcome::Reset
				},
				None => EvaluateOutcome::Discarded,
			}
		},
	}
}
