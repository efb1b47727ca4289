//! Toyota PMV-107J (spec.md §4.7 row 1). Preamble `111110`, sliding
//! differential Manchester, 66 decoded bits realigned into a 9-byte frame by
//! shifting them 6 bits in (the first 6 bits of byte 0 stay zero padding).

use crate::{bitmap, checksum, line_code, log::core_trace, types::MessageInfo};

const PREAMBLE: &str = "111110";
const PAYLOAD_BITS: usize = 66;
const FRAME_BYTES: usize = 9;
const FRAME_BITS: usize = FRAME_BYTES * 8;
const REALIGN_SHIFT_BITS: usize = FRAME_BITS - PAYLOAD_BITS; // 6

const CRC_POLY: u8 = 0x13;
const CRC_INIT: u8 = 0x00;

pub fn decode(src_bits: &[u8], _src_len_bytes: usize, src_len_bits: usize, out: &mut MessageInfo) -> bool {
    if src_len_bits < PREAMBLE.len() + PAYLOAD_BITS {
        return false;
    }

    let preamble_pos = bitmap::seek_bits(src_bits, src_len_bits, 0, src_len_bits, PREAMBLE);
    if preamble_pos == bitmap::NOT_FOUND {
        core_trace!("pmv107j: preamble miss");
        return false;
    }
    let payload_start = preamble_pos + PREAMBLE.len();

    let mut raw = [0u8; FRAME_BYTES];
    let decoded = line_code::diff_manchester_decode(&mut raw, FRAME_BYTES, src_bits, src_len_bits, payload_start, PAYLOAD_BITS);
    if decoded != PAYLOAD_BITS {
        return false;
    }

    let mut frame = [0u8; FRAME_BYTES];
    bitmap::copy(&mut frame, FRAME_BITS, REALIGN_SHIFT_BITS, &raw, FRAME_BITS, 0, PAYLOAD_BITS);

    let crc = checksum::crc8(&frame[0..8], CRC_INIT, CRC_POLY);
    if crc != frame[8] {
        core_trace!("pmv107j: checksum failure, got={} want={}", crc, frame[8]);
        return false;
    }
    if frame[5] ^ frame[6] != 0xFF {
        return false;
    }

    let tire_id_word = u32::from_be_bytes([frame[1], frame[2], frame[3], frame[4]]) >> 2;
    let tire_id = tire_id_word.to_be_bytes();
    let pressure_kpa = (frame[5] as f32 - 40.0) * 2.48;
    let temperature_c = frame[7] as i32 - 40;

    out.decoder_name = "Toyota PMV-107J";
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

    fn encode_diff_manchester_bits(dst: &mut [u8], dlen: usize, off: usize, bits: &[bool], start_state: bool) -> usize {
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

    fn build_frame(payload: [u8; 9]) -> ([u8; 32], usize) {
        // The realigned frame's first REALIGN_SHIFT_BITS bits are padding;
        // the actual 66-bit payload starts there.
        let mut frame_bits = [0u8; FRAME_BYTES];
        frame_bits.copy_from_slice(&payload);
        let mut raw66 = [false; PAYLOAD_BITS];
        for i in 0..PAYLOAD_BITS {
            raw66[i] = bitmap::get(&frame_bits, FRAME_BITS, REALIGN_SHIFT_BITS + i);
        }

        let mut src = [0u8; 32];
        bitmap::set_pattern(&mut src, 256, 0, PREAMBLE);
        let end = encode_diff_manchester_bits(&mut src, 256, PREAMBLE.len(), &raw66, false);
        (src, end)
    }

    #[test]
    fn decodes_reference_fixture() {
        let b0_4 = {
            // Tire ID {0x04,0x8D,0x15,0x9E} <- (u32::from_be_bytes(b1..5) >> 2)
            // so b1..5 = (tire_id << 2) as u32 big-endian bytes.
            let tire_id = u32::from_be_bytes([0x04, 0x8D, 0x15, 0x9E]);
            (tire_id << 2).to_be_bytes()
        };
        let payload = [0x00, b0_4[0], b0_4[1], b0_4[2], b0_4[3], 0xC8, 0x37, 0x5A, 0x00];
        let crc = checksum::crc8(&payload[0..8], CRC_INIT, CRC_POLY);
        let mut payload = payload;
        payload[8] = crc;

        let (src, len) = build_frame(payload);
        let mut out = MessageInfo::empty();
        assert!(decode(&src, src.len(), len, &mut out));
        assert_eq!(out.decoder_name, "Toyota PMV-107J");

        let (tire_id, nibbles) = out.field_set.get_bytes("Tire ID").unwrap();
        assert_eq!(tire_id, &[0x04, 0x8D, 0x15, 0x9E]);
        assert_eq!(nibbles, 8);
        assert!((out.field_set.get_float("Pressure kpa").unwrap() - 396.8).abs() < 1e-2);
        assert_eq!(out.field_set.get_int("Temperature C").unwrap(), 50);
    }

    #[test]
    fn rejects_truncated_payload() {
        // 64 bits of diff-Manchester instead of the full 66: the source
        // stream ends 4 encoded bits short of a complete frame.
        let payload = [0x00, 0x12, 0x34, 0x56, 0x78, 0xC8, 0x37, 0x5A, 0x00];
        let (src, len) = build_frame(payload);
        let mut out = MessageInfo::empty();
        assert!(!decode(&src, src.len(), len - 4, &mut out));
        assert!(!out.is_decoded());
    }

    #[test]
    fn bad_crc_is_rejected() {
        let payload = [0x00, 0x12, 0x34, 0x56, 0x78, 0xC8, 0x37, 0x5A, 0xFF];
        let (src, len) = build_frame(payload);
        let mut out = MessageInfo::empty();
        assert!(!decode(&src, src.len(), len, &mut out));
    }
}
