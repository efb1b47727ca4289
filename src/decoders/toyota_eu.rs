//! Toyota EU (spec.md §4.7 row 8, generic Toyota fallback). Sliding
//! differential Manchester like PMV-107J, but a different preamble, frame
//! length and CRC configuration — registered after PMV-107J so the more
//! specific decoder gets first refusal, per spec.md §4.8's tie-break rule.

use crate::{bitmap, checksum, line_code, types::MessageInfo};

const PREAMBLE: &str = "1111010";
const PAYLOAD_BYTES: usize = 10;
const CRC_POLY: u8 = 0x07;
const CRC_INIT: u8 = 0xFF;

pub fn decode(src_bits: &[u8], _src_len_bytes: usize, src_len_bits: usize, out: &mut MessageInfo) -> bool {
    if src_len_bits < PREAMBLE.len() + PAYLOAD_BYTES * 8 * 2 {
        return false;
    }

    let preamble_pos = bitmap::seek_bits(src_bits, src_len_bits, 0, src_len_bits, PREAMBLE);
    if preamble_pos == bitmap::NOT_FOUND {
        return false;
    }
    let payload_start = preamble_pos + PREAMBLE.len();

    let mut payload = [0u8; PAYLOAD_BYTES];
    let decoded = line_code::diff_manchester_decode(&mut payload, PAYLOAD_BYTES, src_bits, src_len_bits, payload_start, PAYLOAD_BYTES * 8);
    if decoded != PAYLOAD_BYTES * 8 {
        return false;
    }

    if checksum::crc8(&payload[0..9], CRC_INIT, CRC_POLY) != payload[9] {
        return false;
    }

    let pressure_kpa = (payload[5] as f32 - 50.0) * 2.0;
    let temperature_c = payload[6] as i32 - 40;
    let tire_id = [payload[1], payload[2], payload[3], payload[4]];

    out.decoder_name = "Toyota EU";
    out.start_offset_bits = preamble_pos;
    out.pulses_count = payload_start + decoded * 2 - preamble_pos;
    out.field_set.add_bytes("Tire ID", &tire_id, tire_id.len() * 2);
    out.field_set.add_float("Pressure kpa", pressure_kpa, 1);
    out.field_set.add_int("Temperature C", temperature_c);

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diff_manchester_encode(dst: &mut [u8], dlen: usize, off: usize, bits: &[bool]) -> usize {
        let mut cursor = off;
        let mut state = false;
        bitmap::set(dst, dlen, cursor, state);
        cursor += 1;
        for &bit in bits {
            let mid = !state;
            bitmap::set(dst, dlen, cursor, mid);
            let start_next = if bit { mid } else { !mid };
            bitmap::set(dst, dlen, cursor + 1, start_next);
            cursor += 2;
            state = start_next;
        }
        cursor
    }

    #[test]
    fn decodes_reference_fixture() {
        let mut payload = [0u8; PAYLOAD_BYTES];
        payload[1..5].copy_from_slice(&[0x21, 0x22, 0x23, 0x24]);
        payload[5] = 95; // (95-50)*2.0 = 90
        payload[6] = 72; // 72-40=32
        let crc = checksum::crc8(&payload[0..9], CRC_INIT, CRC_POLY);
        payload[9] = crc;

        let mut bits = [false; PAYLOAD_BYTES * 8];
        for i in 0..bits.len() {
            bits[i] = bitmap::get(&payload, bits.len(), i);
        }

        let mut src = [0u8; 32];
        bitmap::set_pattern(&mut src, 256, 0, PREAMBLE);
        let end = diff_manchester_encode(&mut src, 256, PREAMBLE.len(), &bits);

        let mut out = MessageInfo::empty();
        assert!(decode(&src, src.len(), end, &mut out));
        assert!((out.field_set.get_float("Pressure kpa").unwrap() - 90.0).abs() < 1e-3);
        assert_eq!(out.field_set.get_int("Temperature C").unwrap(), 32);
    }
}
