//! Optional tracing hooks, compiled out when the `tracing` feature is off.
//!
//! Learning and matching sit in per-pixel hot loops, so instrumentation must
//! vanish entirely from release builds that do not opt in.

/// Open an info-level span around a learning or matching operation.
///
/// With the feature enabled this is `tracing::info_span!`; without it the
/// macro yields a [`SilentSpan`] guard, so call sites stay free of `cfg`.
#[cfg(feature = "tracing")]
macro_rules! trace_span {
    ($name:expr $(, $($field:tt)*)?) => {
        tracing::info_span!($name $(, $($field)*)?)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_span {
    ($name:expr $(, $($field:tt)*)?) => {
        $crate::trace::SilentSpan
    };
}

/// Record an info-level event with key/value payloads.
#[cfg(feature = "tracing")]
macro_rules! trace_event {
    ($name:expr, $($key:ident = $value:expr),+ $(,)?) => {
        tracing::info!(name: $name, $($key = $value),+)
    };
    ($name:expr) => {
        tracing::info!(name: $name)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_event {
    ($name:expr $(, $key:ident = $value:expr)* $(,)?) => {
        // Payload expressions are still evaluated and discarded.
        { $( let _ = $value; )* }
    };
}

pub(crate) use trace_event;
pub(crate) use trace_span;

/// Guard handed out by `trace_span!` in builds without the `tracing` feature.
#[cfg(not(feature = "tracing"))]
pub struct SilentSpan;

#[cfg(not(feature = "tracing"))]
impl SilentSpan {
    #[inline]
    pub fn entered(self) -> Self {
        self
    }
}
