//! Feature-gated tracing hooks for the correlation pipeline.
//!
//! Stage spans (`reconcile`, `transform`, `correlate`, `build_mask`) are
//! emitted at debug level under the `phasecorr` target. Events name their
//! level explicitly: per-pass detail such as individual DFTs goes to `trace`,
//! stage results go to `debug`. Without the `tracing` feature both macros
//! expand to nothing observable and call sites need no `#[cfg]`.

#[cfg(feature = "tracing")]
macro_rules! trace_span {
    ($name:literal $(, $($field:tt)*)?) => {
        tracing::debug_span!(target: "phasecorr", $name $(, $($field)*)?)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_span {
    ($name:literal $(, $($field:tt)*)?) => {
        $crate::trace::NoopSpan
    };
}

#[cfg(feature = "tracing")]
macro_rules! trace_event {
    (trace, $name:literal, $($key:ident = $value:expr),+ $(,)?) => {
        tracing::trace!(name: $name, target: "phasecorr", $($key = $value),+)
    };
    (debug, $name:literal, $($key:ident = $value:expr),+ $(,)?) => {
        tracing::debug!(name: $name, target: "phasecorr", $($key = $value),+)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_event {
    ($level:ident, $name:literal, $($key:ident = $value:expr),+ $(,)?) => {
        let _ = ($(&$value,)+);
    };
}

pub(crate) use trace_event;
pub(crate) use trace_span;

/// Span guard returned by `trace_span!` when tracing is compiled out.
#[cfg(not(feature = "tracing"))]
pub(crate) struct NoopSpan;

#[cfg(not(feature = "tracing"))]
impl NoopSpan {
    #[inline]
    pub(crate) fn entered(self) -> Self {
        self
    }
}
