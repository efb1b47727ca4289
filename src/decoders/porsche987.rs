//! Porsche 987 (spec.md §4.7 row 5, §8 fixture 4). Preamble tail
//! `110011001010`, sliding differential Manchester, 10-byte payload, CRC-16
//! poly 0x1021 init 0xFFFF verifying to zero over the whole payload.

use crate::{bitmap, checksum, line_code, types::MessageInfo};

const PREAMBLE_TAIL: &str = "110011001010";
const PAYLOAD_BYTES: usize = 10;
const CRC_POLY: u16 = 0x1021;
const CRC_INIT: u16 = 0xFFFF;

pub fn decode(src_bits: &[u8], _src_len_bytes: usize, src_len_bits: usize, out: &mut MessageInfo) -> bool {
    if src_len_bits < PREAMBLE_TAIL.len() + PAYLOAD_BYTES * 8 * 2 {
        return false;
    }

    let preamble_pos = bitmap::seek_bits(src_bits, src_len_bits, 0, src_len_bits, PREAMBLE_TAIL);
    if preamble_pos == bitmap::NOT_FOUND {
        return false;
    }
    let payload_start = preamble_pos + PREAMBLE_TAIL.len();

    let mut payload = [0u8; PAYLOAD_BYTES];
    let decoded = line_code::diff_manchester_decode(&mut payload, PAYLOAD_BYTES, src_bits, src_len_bits, payload_start, PAYLOAD_BYTES * 8);
    if decoded != PAYLOAD_BYTES * 8 {
        return false;
    }

    if checksum::crc16(&payload, CRC_INIT, CRC_POLY) != 0 {
        return false;
    }

    let pressure_kpa = payload[4] as f32 * 2.5 - 100.0;
    let temperature_c = payload[5] as i32 - 40;
    let tire_id = [payload[0], payload[1], payload[2], payload[3]];

    out.decoder_name = "Porsche 987";
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

    fn diff_manchester_encode(dst: &mut [u8], dlen: usize, off: usize, bits: &[bool], start_state: bool) -> usize {
        let mut cursor = off;
        let mut state = start_state;
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
        payload[0..4].copy_from_slice(&[0x01, 0x02, 0x03, 0x04]);
        payload[4] = 88; // raw*2.5-100 = 120
        payload[5] = 70; // 70-40=30
        let crc = checksum::crc16(&payload[0..8], CRC_INIT, CRC_POLY);
        payload[8] = (crc >> 8) as u8;
        payload[9] = (crc & 0xFF) as u8;
        assert_eq!(checksum::crc16(&payload, CRC_INIT, CRC_POLY), 0);

        let mut bits = [false; PAYLOAD_BYTES * 8];
        for i in 0..bits.len() {
            bits[i] = bitmap::get(&payload, bits.len(), i);
        }

        let mut src = [0u8; 32];
        bitmap::set_pattern(&mut src, 256, 0, PREAMBLE_TAIL);
        let end = diff_manchester_encode(&mut src, 256, PREAMBLE_TAIL.len(), &bits, false);

        let mut out = MessageInfo::empty();
        assert!(decode(&src, src.len(), end, &mut out));
        assert!((out.field_set.get_float("Pressure kpa").unwrap() - 120.0).abs() < 1e-3);
        assert_eq!(out.field_set.get_int("Temperature C").unwrap(), 30);
    }
}
