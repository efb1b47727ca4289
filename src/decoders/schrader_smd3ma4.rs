//! Schrader SMD3MA4 (spec.md §4.7 row 6). Preamble tail `010101011110`,
//! Manchester (`01`=0, `10`=1), a 39-bit payload with no checksum beyond an
//! all-zero rejection and a pressure sanity clamp — matches the weaker
//! validation this protocol's real-world decoders use. No temperature.

use crate::{bitmap, line_code, types::MessageInfo};

const PREAMBLE_TAIL: &str = "010101011110";
const PAYLOAD_BITS: usize = 39;
const PAYLOAD_BYTES: usize = 5; // 40-bit capacity, last bit unused

const TIRE_ID_BITS: usize = 24;
const PRESSURE_BYTE_OFFSET_BITS: usize = TIRE_ID_BITS;

pub fn decode(src_bits: &[u8], _src_len_bytes: usize, src_len_bits: usize, out: &mut MessageInfo) -> bool {
    if src_len_bits < PREAMBLE_TAIL.len() + PAYLOAD_BITS * 2 {
        return false;
    }

    let preamble_pos = bitmap::seek_bits(src_bits, src_len_bits, 0, src_len_bits, PREAMBLE_TAIL);
    if preamble_pos == bitmap::NOT_FOUND {
        return false;
    }
    let payload_start = preamble_pos + PREAMBLE_TAIL.len();

    let mut payload = [0u8; PAYLOAD_BYTES];
    let decoded = line_code::convert_from_line_code(&mut payload, PAYLOAD_BYTES, src_bits, src_len_bits, payload_start, "01", "10");
    if decoded < PAYLOAD_BITS {
        return false;
    }

    if payload.iter().all(|&b| b == 0) {
        return false;
    }

    let mut tire_id = [0u8; 3];
    bitmap::copy(&mut tire_id, 24, 0, &payload, PAYLOAD_BYTES * 8, 0, TIRE_ID_BITS);

    let pressure_raw = {
        let mut b = [0u8; 1];
        bitmap::copy(&mut b, 8, 0, &payload, PAYLOAD_BYTES * 8, PRESSURE_BYTE_OFFSET_BITS, 8);
        b[0]
    };
    let pressure_psi = pressure_raw as f32 * 0.2;
    if !(0.0..=100.0).contains(&pressure_psi) {
        return false;
    }

    out.decoder_name = "Schrader SMD3MA4";
    out.start_offset_bits = preamble_pos;
    out.pulses_count = payload_start + decoded * 2 - preamble_pos;
    out.field_set.add_bytes("Tire ID", &tire_id, tire_id.len() * 2);
    out.field_set.add_float("Pressure psi", pressure_psi, 1);

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manchester_encode(dst: &mut [u8], dlen: usize, off: usize, bits: &[bool]) -> usize {
        let mut cursor = off;
        for &bit in bits {
            bitmap::set(dst, dlen, cursor, !bit);
            bitmap::set(dst, dlen, cursor + 1, bit);
            cursor += 2;
        }
        cursor
    }

    fn payload_bits(payload: &[u8; PAYLOAD_BYTES]) -> [bool; PAYLOAD_BITS] {
        let mut bits = [false; PAYLOAD_BITS];
        for i in 0..PAYLOAD_BITS {
            bits[i] = bitmap::get(payload, PAYLOAD_BYTES * 8, i);
        }
        bits
    }

    #[test]
    fn decodes_valid_pressure_reading() {
        let mut payload = [0u8; PAYLOAD_BYTES];
        payload[0..3].copy_from_slice(&[0x01, 0x02, 0x03]);
        payload[3] = 200; // pressure_raw * 0.2 = 40.0
        let bits = payload_bits(&payload);

        let mut src = [0u8; 32];
        bitmap::set_pattern(&mut src, 256, 0, PREAMBLE_TAIL);
        let end = manchester_encode(&mut src, 256, PREAMBLE_TAIL.len(), &bits);

        let mut out = MessageInfo::empty();
        assert!(decode(&src, src.len(), end, &mut out));
        assert!((out.field_set.get_float("Pressure psi").unwrap() - 40.0).abs() < 1e-3);
    }

    #[test]
    fn rejects_all_zero_payload() {
        let payload = [0u8; PAYLOAD_BYTES];
        let bits = payload_bits(&payload);
        let mut src = [0u8; 32];
        bitmap::set_pattern(&mut src, 256, 0, PREAMBLE_TAIL);
        let end = manchester_encode(&mut src, 256, PREAMBLE_TAIL.len(), &bits);
        let mut out = MessageInfo::empty();
        assert!(!decode(&src, src.len(), end, &mut out));
    }
}
