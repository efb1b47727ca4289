//! Error taxonomy for the parts of the core that can fail in a way worth
//! reporting to a caller. Individual decoders keep returning `bool`/`Option`
//! per their external contract (a decoder's failure is "this isn't my
//! protocol", not an exceptional condition) — this enum only covers the
//! handful of operations spec.md §7 calls out as `AllocFailure`-class.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CoreError {
    /// A fixed-capacity buffer (field-set, dispatcher payload, bitmap) is
    /// too small for the write being attempted. There's no heap to fall
    /// back to, so this is the `AllocFailure` case from spec.md §7: fatal
    /// for the call in progress, but the caller is expected to treat it the
    /// same way the scanner does — leave prior latched state untouched.
    CapacityExceeded,
}

pub type CoreResult<T> = Result<T, CoreError>;
