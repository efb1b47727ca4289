//! Dispatcher (spec.md §4.8): widens the ring buffer around a candidate run
//! into a working bitmap via NRZ-by-rate, then iterates the decoder
//! registry until one accepts.

use heapless::Vec;

use crate::{
    decoders::REGISTRY,
    line_code::convert_signal_to_bits,
    ring_buffer::SampleBuffer,
    types::{MessageInfo, MAX_MATCHED_BITS_BYTES},
};

/// Working bitmap size (spec.md §4.8): large enough for the widest decoded
/// frame this registry produces with slack to spare.
pub const WORKING_BITMAP_BYTES: usize = 4096;

/// Samples read before the detected run starts, and after it ends — gives
/// decoders room to lock onto a preamble that began slightly outside the
/// scanner's measured run (spec.md §4.8, §9's "negative sample indices"
/// note).
const LEAD_SAMPLES: i64 = 32;
const TAIL_SAMPLES: i64 = 100;

/// `decode_signal(buf, sample_count, out_info)`: widens `buf` around its
/// current center into a working bitmap, then runs the decoder registry in
/// order. On the first accepting decoder, copies its matched bits into
/// `out_info.bits` and returns `true`; returns `false` if none match.
pub fn decode_signal<const CAP: usize>(buf: &SampleBuffer<CAP>, sample_count: usize, out_info: &mut MessageInfo) -> bool {
    let mut working_bitmap = [0u8; WORKING_BITMAP_BYTES];
    let sample_span = sample_count as i64 + LEAD_SAMPLES + TAIL_SAMPLES;

    let bits_written = convert_signal_to_bits(
        &mut working_bitmap,
        WORKING_BITMAP_BYTES,
        buf,
        -LEAD_SAMPLES,
        sample_span,
        buf.short_pulse_dur_us,
    );
    if bits_written == 0 {
        return false;
    }

    let src_len_bytes = bits_written.div_ceil(8);

    for entry in REGISTRY {
        let mut candidate = MessageInfo::empty();
        if !(entry.decode)(&working_bitmap, src_len_bytes, bits_written, &mut candidate) {
            continue;
        }

        if candidate.pulses_count > 0 {
            let payload_bytes = candidate.pulses_count.div_ceil(8);
            let mut payload: Vec<u8, MAX_MATCHED_BITS_BYTES> = Vec::new();
            let copy_len = payload_bytes.min(MAX_MATCHED_BITS_BYTES);
            for _ in 0..copy_len {
                let _ = payload.push(0);
            }
            crate::bitmap::copy(
                &mut payload,
                copy_len * 8,
                0,
                &working_bitmap,
                bits_written,
                candidate.start_offset_bits,
                candidate.pulses_count.min(copy_len * 8),
            );
            candidate.bits = Some(payload);
        }

        *out_info = candidate;
        return true;
    }

    false
}
