//! Structured trace points, `defmt`-backed when the `defmt` feature is on.
//!
//! The core never owns a sink (see `SPEC_FULL.md` §1): these macros expand to
//! `defmt::trace!`/`defmt::debug!` when the feature is enabled, and to
//! nothing at all otherwise, so library consumers that don't care about
//! firmware-side tracing don't pay for it.

macro_rules! core_trace {
    ($($arg:tt)*) => {
        #[cfg(feature = "defmt")]
        defmt::trace!($($arg)*);
    };
}

macro_rules! core_debug {
    ($($arg:tt)*) => {
        #[cfg(feature = "defmt")]
        defmt::debug!($($arg)*);
    };
}

pub(crate) use core_debug;
pub(crate) use core_trace;
