// self
use crate::{_prelude::*, obs::CallKind};

/// Emits a `tracing` event when the `tracing` feature is enabled; otherwise only borrows the
/// field values so they still count as used.
macro_rules! trace_event {
	($level:ident, $($arg:tt)+) => {{
		#[cfg(feature = "tracing")]
		{
			::tracing::$level!($($arg)+);
		}
		#[cfg(not(feature = "tracing"))]
		{
			$crate::obs::touch_fields!($($arg)+);
		}
	}};
}
pub(crate) use trace_event;

#[cfg(not(feature = "tracing"))]
macro_rules! touch_fields {
	() => {};
	($message:literal $(, $value:expr)* $(,)?) => {
		$(let _ = &$value;)*
	};
	($field:ident = %$value:expr $(, $($rest:tt)*)?) => {
		let _ = &$value;
		$($crate::obs::touch_fields!($($rest)*);)?
	};
	($field:ident = ?$value:expr $(, $($rest:tt)*)?) => {
		let _ = &$value;
		$($crate::obs::touch_fields!($($rest)*);)?
	};
	($field:ident = $value:expr $(, $($rest:tt)*)?) => {
		let _ = &$value;
		$($crate::obs::touch_fields!($($rest)*);)?
	};
	($field:ident $(, $($rest:tt)*)?) => {
		let _ = &$field;
		$($crate::obs::touch_fields!($($rest)*);)?
	};
}
#[cfg(not(feature = "tracing"))]
pub(crate) use touch_fields;

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedCall<F> = ::tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedCall<F> = F;

/// A span builder used around service calls.
#[derive(Clone, Debug)]
pub struct CallSpan {
	#[cfg(feature = "tracing")]
	span: ::tracing::Span,
}
impl CallSpan {
	/// Creates a new span tagged with the provided call kind + stage.
	pub fn new(kind: CallKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = ::tracing::info_span!("ledger_client.call", call = kind.as_str(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedCall<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use ::tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}
