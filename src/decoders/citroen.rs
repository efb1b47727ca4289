//! Citroen (spec.md §4.7 row 8). Manchester (`01`=0, `10`=1), CRC-8 poly
//! 0x1D init 0x00 over the first 7 bytes.

use crate::{bitmap, checksum, line_code, types::MessageInfo};

const PREAMBLE: &str = "0101100110";
const PAYLOAD_BYTES: usize = 8;
const CRC_POLY: u8 = 0x1D;
const CRC_INIT: u8 = 0x00;

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
    let decoded = line_code::convert_from_line_code(&mut payload, PAYLOAD_BYTES, src_bits, src_len_bits, payload_start, "01", "10");
    if decoded != PAYLOAD_BYTES * 8 {
        return false;
    }

    if checksum::crc8(&payload[0..7], CRC_INIT, CRC_POLY) != payload[7] {
        return false;
    }

    let tire_id = [payload[0], payload[1], payload[2], payload[3]];
    let pressure_kpa = payload[4] as f32 * 1.36;
    let temperature_c = payload[5] as i32 - 40;

    out.decoder_name = "Citroen";
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

    fn manchester_encode(dst: &mut [u8], dlen: usize, off: usize, byte: u8) -> usize {
        let mut cursor = off;
        for bit_i in 0..8 {
            let bit = (byte >> (7 - bit_i)) & 1 == 1;
            bitmap::set(dst, dlen, cursor, !bit);
            bitmap::set(dst, dlen, cursor + 1, bit);
            cursor += 2;
        }
        cursor
    }

    #[test]
    fn decodes_reference_fixture() {
        let mut payload = [0u8; PAYLOAD_BYTES];
        payload[0..4].copy_from_slice(&[0x71, 0x72, 0x73, 0x74]);
        payload[4] = 200; // 200*1.36 = 272
        payload[5] = 65; // 65-40=25
        let crc = checksum::crc8(&payload[0..7], CRC_INIT, CRC_POLY);
        payload[7] = crc;

        let mut src = [0u8; 16];
        bitmap::set_pattern(&mut src, 128, 0, PREAMBLE);
        let mut cursor = PREAMBLE.len();
        for &b in &payload {
            cursor = manchester_encode(&mut src, 128, cursor, b);
        }

        let mut out = MessageInfo::empty();
        assert!(decode(&src, src.len(), cursor, &mut out));
        assert!((out.field_set.get_float("Pressure kpa").unwrap() - 272.0).abs() < 1e-3);
        assert_eq!(out.field_set.get_int("Temperature C").unwrap(), 25);
    }
}
