//! BMW Gen2/3 (spec.md §4.7 row 4). Preamble `0xCCCD`, sliding differential
//! Manchester, CRC-16 poly 0x1021 init 0x0000 over the whole payload
//! (verifies to zero, per the append-verification property in checksum.rs).

use crate::{bitmap, checksum, line_code, log::core_trace, types::MessageInfo};

const PREAMBLE: &str = "1100110011001101";
const CRC_POLY: u16 = 0x1021;
const CRC_INIT: u16 = 0x0000;

const LONG_PAYLOAD_BYTES: usize = 11;
const SHORT_PAYLOAD_BYTES: usize = 10;

fn try_decode_len(src_bits: &[u8], src_len_bits: usize, payload_start: usize, payload_bytes: usize) -> Option<[u8; LONG_PAYLOAD_BYTES]> {
    let mut payload = [0u8; LONG_PAYLOAD_BYTES];
    let decoded = line_code::diff_manchester_decode(&mut payload, payload_bytes, src_bits, src_len_bits, payload_start, payload_bytes * 8);
    if decoded != payload_bytes * 8 {
        return None;
    }
    if checksum::crc16(&payload[0..payload_bytes], CRC_INIT, CRC_POLY) != 0 {
        core_trace!("bmw_gen23: checksum failure at payload_bytes={}", payload_bytes);
        return None;
    }
    Some(payload)
}

pub fn decode(src_bits: &[u8], _src_len_bytes: usize, src_len_bits: usize, out: &mut MessageInfo) -> bool {
    if src_len_bits < PREAMBLE.len() + SHORT_PAYLOAD_BYTES * 8 * 2 {
        return false;
    }

    let preamble_pos = bitmap::seek_bits(src_bits, src_len_bits, 0, src_len_bits, PREAMBLE);
    if preamble_pos == bitmap::NOT_FOUND {
        core_trace!("bmw_gen23: preamble miss");
        return false;
    }
    let payload_start = preamble_pos + PREAMBLE.len();

    let (payload, payload_bytes) = if let Some(p) = try_decode_len(src_bits, src_len_bits, payload_start, LONG_PAYLOAD_BYTES) {
        (p, LONG_PAYLOAD_BYTES)
    } else if let Some(p) = try_decode_len(src_bits, src_len_bits, payload_start, SHORT_PAYLOAD_BYTES) {
        (p, SHORT_PAYLOAD_BYTES)
    } else {
        return false;
    };

    let pressure_kpa = (payload[4] as f32 - 43.0) * 2.5;
    let temperature_c = payload[5] as i32 - 40;
    let tire_id = [payload[0], payload[1], payload[2], payload[3]];

    out.decoder_name = "BMW Gen2/3";
    out.start_offset_bits = preamble_pos;
    out.pulses_count = payload_start + payload_bytes * 8 * 2 - preamble_pos;
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
    fn decodes_ten_byte_frame_with_valid_crc() {
        let mut payload = [0u8; SHORT_PAYLOAD_BYTES];
        payload[0..4].copy_from_slice(&[0xAA, 0xBB, 0xCC, 0xDD]);
        payload[4] = 83; // pressure raw, (83-43)*2.5 = 100
        payload[5] = 65; // temperature raw, 65-40=25
        let crc = checksum::crc16(&payload[0..8], CRC_INIT, CRC_POLY);
        payload[8] = (crc >> 8) as u8;
        payload[9] = (crc & 0xFF) as u8;

        let mut bits = [false; SHORT_PAYLOAD_BYTES * 8];
        for i in 0..bits.len() {
            bits[i] = bitmap::get(&payload, bits.len(), i);
        }

        let mut src = [0u8; 32];
        bitmap::set_pattern(&mut src, 256, 0, PREAMBLE);
        let end = diff_manchester_encode(&mut src, 256, PREAMBLE.len(), &bits, false);

        let mut out = MessageInfo::empty();
        assert!(decode(&src, src.len(), end, &mut out));
        assert_eq!(out.decoder_name, "BMW Gen2/3");
        assert!((out.field_set.get_float("Pressure kpa").unwrap() - 100.0).abs() < 1e-3);
        assert_eq!(out.field_set.get_int("Temperature C").unwrap(), 25);
    }
}
