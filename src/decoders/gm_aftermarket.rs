//! GM Aftermarket, 17-byte rtl_433-compatible variant (spec.md §4.7 row 7;
//! §9's Open Question resolution drops the 9-byte legacy variant). Preamble
//! is 48 Manchester-zero-inverted pairs encoding a leading `0x00` byte run;
//! the payload's own first 6 bytes must also be zero.

use crate::{bitmap, checksum, line_code, types::MessageInfo};

const PREAMBLE_PAIRS: usize = 48;
const PAYLOAD_BYTES: usize = 17;
const LEADING_ZERO_BYTES: usize = 6;
const SUM_START_BYTE: usize = 6;
const SUM_END_BYTE: usize = 16; // exclusive
const MAX_PRESSURE_KPA: f32 = 1000.0;

fn preamble_pattern() -> [u8; PREAMBLE_PAIRS * 2] {
    let mut pattern = [b'0'; PREAMBLE_PAIRS * 2];
    let mut i = 0;
    while i < PREAMBLE_PAIRS {
        pattern[i * 2] = b'1';
        pattern[i * 2 + 1] = b'0';
        i += 1;
    }
    pattern
}

pub fn decode(src_bits: &[u8], _src_len_bytes: usize, src_len_bits: usize, out: &mut MessageInfo) -> bool {
    let pattern_bytes = preamble_pattern();
    // `seek_bits`/`match_bits` take `&str`; the pattern is pure ASCII '0'/'1'.
    let pattern = core::str::from_utf8(&pattern_bytes).unwrap_or("");

    if src_len_bits < pattern.len() + PAYLOAD_BYTES * 8 * 2 {
        return false;
    }

    let preamble_pos = bitmap::seek_bits(src_bits, src_len_bits, 0, src_len_bits, pattern);
    if preamble_pos == bitmap::NOT_FOUND {
        return false;
    }
    let payload_start = preamble_pos + pattern.len();

    let mut payload = [0u8; PAYLOAD_BYTES];
    let decoded = line_code::convert_from_line_code(&mut payload, PAYLOAD_BYTES, src_bits, src_len_bits, payload_start, "10", "01");
    if decoded != PAYLOAD_BYTES * 8 {
        return false;
    }

    if payload[0..LEADING_ZERO_BYTES] != [0u8; LEADING_ZERO_BYTES] {
        return false;
    }

    let sum = checksum::sum_bytes(&payload[SUM_START_BYTE..SUM_END_BYTE], 0);
    if sum != payload[16] {
        return false;
    }

    let pressure_kpa = payload[14] as f32 * 2.75;
    if pressure_kpa > MAX_PRESSURE_KPA {
        return false;
    }
    let temperature_c = payload[15] as i32 - 60;
    let tire_id = [payload[6], payload[7], payload[8], payload[9], payload[10]];

    out.decoder_name = "GM Aftermarket";
    out.start_offset_bits = preamble_pos;
    out.pulses_count = payload_start + decoded * 2 - preamble_pos;
    out.field_set.add_bytes("Tire ID", &tire_id, tire_id.len() * 2);
    out.field_set.add_float("Pressure kpa", pressure_kpa, 1);
    out.field_set.add_int("Temperature C", temperature_c);

    true
}
