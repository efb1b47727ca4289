//! Line-code decoders (spec.md §4.3): reconstruct data bits from a
//! level/duration pulse stream. Four forms are required because the
//! protocol registry in `decoders/` genuinely needs all four — see
//! spec.md §9's note that the two differential-Manchester variants are
//! *not* interchangeable.

use num_traits::Float;

use crate::{bitmap, ring_buffer::SampleBuffer};

/// A pulse widened past this many repetitions is clipped — a single
/// glitched or mis-timed pulse shouldn't be able to flood a fixed output
/// buffer.
const MAX_REPS_PER_PULSE: u32 = 1024;

/// NRZ-by-rate: widen each pulse in `buf` (starting `sample_count` samples
/// from `start_sample`, relative to `buf`'s head) into `round(dur /
/// unit_us)` repetitions of its level, written MSB-first into `dst`.
///
/// `start_sample` is relative and may be negative — this is how a decoder
/// locks onto a preamble that began slightly before the detected run
/// (spec.md §9); [`SampleBuffer::get_relative`] handles the wraparound.
/// Returns the number of bits written; `0` if `unit_us` is zero.
pub fn convert_signal_to_bits<const CAP: usize>(
    dst: &mut [u8],
    dst_cap_bytes: usize,
    buf: &SampleBuffer<CAP>,
    start_sample: i64,
    sample_count: i64,
    unit_us: u32,
) -> usize {
    if unit_us == 0 {
        return 0;
    }

    let dlen = dst_cap_bytes * 8;
    let mut bits_written = 0usize;

    'outer: for i in 0..sample_count {
        let pulse = buf.get_relative(start_sample + i);
        let reps = (pulse.duration_us as f32 / unit_us as f32).round();
        let reps = if reps < 0.0 { 0 } else { reps as u32 };
        let reps = reps.min(MAX_REPS_PER_PULSE);

        for _ in 0..reps {
            if bits_written / 8 >= dst_cap_bytes {
                break 'outer;
            }
            bitmap::set(dst, dlen, bits_written, pulse.level);
            bits_written += 1;
        }
    }

    bits_written
}

/// Generic line-code decode: walk `src_bits` from `src_off`, emitting a `0`
/// whenever the cursor matches `zero_pattern` and a `1` whenever it matches
/// `one_pattern`, advancing by the matched pattern's length each time.
/// Stops (without error — this is `CodecReject` from spec.md §7) the moment
/// neither pattern matches, or once `dst` is full.
pub fn convert_from_line_code(
    dst: &mut [u8],
    dst_cap_bytes: usize,
    src_bits: &[u8],
    src_len_bits: usize,
    src_off: usize,
    zero_pattern: &str,
    one_pattern: &str,
) -> usize {
    let dlen = dst_cap_bytes * 8;
    let mut cursor = src_off;
    let mut decoded = 0usize;

    loop {
        if decoded / 8 >= dst_cap_bytes {
            break;
        }
        if bitmap::match_bits(src_bits, src_len_bits, cursor, zero_pattern) {
            bitmap::set(dst, dlen, decoded, false);
            decoded += 1;
            cursor += zero_pattern.len();
        } else if bitmap::match_bits(src_bits, src_len_bits, cursor, one_pattern) {
            bitmap::set(dst, dlen, decoded, true);
            decoded += 1;
            cursor += one_pattern.len();
        } else {
            break;
        }
    }

    decoded
}

/// Sliding differential-Manchester decode (Toyota PMV-107J, BMW Gen2/3,
/// Porsche). Bootstraps with a single bit establishing the carried line
/// state, then for every output bit consumes two more source bits: the
/// first must differ from the carried state (the mandatory mid-bit
/// transition — if it doesn't, decoding stops, spec.md's `CodecReject`),
/// the second determines whether a transition occurred at the start of the
/// next bit. Convention: no start transition -> `1`; start transition ->
/// `0`.
pub fn diff_manchester_decode(
    dst: &mut [u8],
    dst_cap_bytes: usize,
    src_bits: &[u8],
    src_len_bits: usize,
    off: usize,
    max_bits: usize,
) -> usize {
    if off >= src_len_bits {
        return 0;
    }

    let dlen = dst_cap_bytes * 8;
    let mut state = bitmap::get(src_bits, src_len_bits, off);
    let mut cursor = off + 1;
    let mut decoded = 0usize;

    while decoded < max_bits && decoded / 8 < dst_cap_bytes {
        if cursor + 1 >= src_len_bits {
            break;
        }

        let mid = bitmap::get(src_bits, src_len_bits, cursor);
        if mid == state {
            // No transition where one was required: not a valid
            // differential-Manchester stream from here on.
            break;
        }

        let start_next = bitmap::get(src_bits, src_len_bits, cursor + 1);
        let bit_val = start_next == mid; // no transition -> 1, transition -> 0

        bitmap::set(dst, dlen, decoded, bit_val);
        decoded += 1;
        state = start_next;
        cursor += 2;
    }

    decoded
}

/// Pairwise differential-Manchester decode, retained for the legacy
/// decoders (Renault and its relatives) whose bit sense depends on this
/// exact form rather than the sliding one. Iterates non-overlapping pairs;
/// emits `b0 == b1` as the bit and carries `b1` forward.
///
/// `previous` seeds the comparison for a caller resuming a decode that
/// spans several calls (e.g. the legacy decoders historically pulled bits
/// one pair at a time from an interrupt handler); decoding a contiguous
/// run in a single call, as every decoder in this registry does, never
/// reads it.
pub fn convert_from_diff_manchester(
    dst: &mut [u8],
    dst_cap_bytes: usize,
    src_bits: &[u8],
    src_len_bits: usize,
    off: usize,
    _previous: bool,
) -> usize {
    let dlen = dst_cap_bytes * 8;
    let mut cursor = off;
    let mut decoded = 0usize;

    while decoded / 8 < dst_cap_bytes && cursor + 1 < src_len_bits {
        let b0 = bitmap::get(src_bits, src_len_bits, cursor);
        let b1 = bitmap::get(src_bits, src_len_bits, cursor + 1);
        bitmap::set(dst, dlen, decoded, b0 == b1);
        decoded += 1;
        cursor += 2;
    }

    decoded
}
