//! Shared data-model types from spec.md §3: the raw pulse sample and the
//! message info a successful decode produces.

use heapless::Vec;

use crate::field_set::FieldSet;

/// A single RF level transition: held at `level` for `duration_us`
/// microseconds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Pulse {
    pub level: bool,
    pub duration_us: u32,
}

/// Largest matched-bits payload the dispatcher will ever copy out of its
/// working bitmap (see `dispatcher::WORKING_BITMAP_BYTES`).
pub const MAX_MATCHED_BITS_BYTES: usize = 4096;

/// Produced by a successful decoder invocation (spec.md §3). Owned by
/// whoever receives it from the dispatcher/scanner; dropping it is enough
/// to release everything, since nothing here is heap-allocated.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MessageInfo {
    pub decoder_name: &'static str,
    pub start_offset_bits: usize,
    pub pulses_count: usize,
    pub bits: Option<Vec<u8, MAX_MATCHED_BITS_BYTES>>,
    pub field_set: FieldSet,
}

impl MessageInfo {
    pub const fn empty() -> Self {
        Self {
            decoder_name: "",
            start_offset_bits: 0,
            pulses_count: 0,
            bits: None,
            field_set: FieldSet::new(),
        }
    }

    pub fn is_decoded(&self) -> bool {
        !self.decoder_name.is_empty()
    }
}

/// Releases a [`MessageInfo`]'s resources. There's no allocator to give
/// memory back to under `no_std`; this exists so call sites read the way
/// spec.md §5/§9 describe the resource-discipline contract ("every
/// `msg_info` ... is owned; a well-defined `free_msg_info` must release
/// the field-set and any allocated payload bits"), and so a future backend
/// with a real allocator has one place to hook in.
pub fn free_msg_info(info: &mut MessageInfo) {
    *info = MessageInfo::empty();
}
