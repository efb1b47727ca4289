//! Hyundai Elantra 2012 / Honda Civic (spec.md §4.7 row 2). Preamble
//! `0x7155`, Manchester (`01`=0, `10`=1), 8-byte payload, CRC-8 poly 0x07
//! init 0x00 over the first 7 bytes.

use crate::{bitmap, checksum, line_code, log::core_trace, types::MessageInfo};

const PREAMBLE: &str = "0111000101010101";
const PAYLOAD_BYTES: usize = 8;
const CRC_POLY: u8 = 0x07;
const CRC_INIT: u8 = 0x00;

pub fn decode(src_bits: &[u8], _src_len_bytes: usize, src_len_bits: usize, out: &mut MessageInfo) -> bool {
    if src_len_bits < PREAMBLE.len() + PAYLOAD_BYTES * 8 * 2 {
        return false;
    }

    let preamble_pos = bitmap::seek_bits(src_bits, src_len_bits, 0, src_len_bits, PREAMBLE);
    if preamble_pos == bitmap::NOT_FOUND {
        core_trace!("elantra2012: preamble miss");
        return false;
    }
    let payload_start = preamble_pos + PREAMBLE.len();

    let mut payload = [0u8; PAYLOAD_BYTES];
    let decoded = line_code::convert_from_line_code(&mut payload, PAYLOAD_BYTES, src_bits, src_len_bits, payload_start, "01", "10");
    if decoded != PAYLOAD_BYTES * 8 {
        return false;
    }

    let crc = checksum::crc8(&payload[0..7], CRC_INIT, CRC_POLY);
    if crc != payload[7] {
        core_trace!("elantra2012: checksum failure, got={} want={}", crc, payload[7]);
        return false;
    }

    let pressure_kpa = payload[0] as f32 + 60.0;
    let temperature_c = payload[1] as i32 - 50;
    let tire_id = [payload[2], payload[3], payload[4], payload[5]];

    out.decoder_name = "Elantra2012/Civic";
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
        let partial = [80u8, 90, 0xDE, 0xAD, 0xBE, 0xEF, 0x00];
        let crc = checksum::crc8(&partial, CRC_INIT, CRC_POLY);
        let payload = [80u8, 90, 0xDE, 0xAD, 0xBE, 0xEF, 0x00, crc];

        let mut src = [0u8; 16];
        bitmap::set_pattern(&mut src, 128, 0, PREAMBLE);
        let mut cursor = PREAMBLE.len();
        for &b in &payload {
            cursor = manchester_encode(&mut src, 128, cursor, b);
        }

        let mut out = MessageInfo::empty();
        assert!(decode(&src, src.len(), cursor, &mut out));
        let (tire_id, _) = out.field_set.get_bytes("Tire ID").unwrap();
        assert_eq!(tire_id, &[0xDE, 0xAD, 0xBE, 0xEF]);
        assert_eq!(out.field_set.get_float("Pressure kpa").unwrap(), 140.0);
        assert_eq!(out.field_set.get_int("Temperature C").unwrap(), 40);
    }

    #[test]
    fn missing_preamble_rejects() {
        let src = [0u8; 16];
        let mut out = MessageInfo::empty();
        assert!(!decode(&src, src.len(), 128, &mut out));
    }
}
