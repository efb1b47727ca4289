//! Schrader EG53MA4 (spec.md §4.7 row 8). Manchester-zero-inverted
//! (`10`=0, `01`=1), running-XOR checksum over the first 8 bytes.

use crate::{bitmap, checksum, line_code, types::MessageInfo};

const PREAMBLE: &str = "1010011001";
const PAYLOAD_BYTES: usize = 9;
const XOR_INIT: u8 = 0x00;

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
    let decoded = line_code::convert_from_line_code(&mut payload, PAYLOAD_BYTES, src_bits, src_len_bits, payload_start, "10", "01");
    if decoded != PAYLOAD_BYTES * 8 {
        return false;
    }

    if checksum::xor_bytes(&payload[0..8], XOR_INIT) != payload[8] {
        return false;
    }

    let tire_id = [payload[0], payload[1], payload[2], payload[3]];
    let pressure_kpa = payload[5] as f32 * 2.0;
    let temperature_c = payload[6] as i32 - 56;

    out.decoder_name = "Schrader EG53MA4";
    out.start_offset_bits = preamble_pos;
    out.pulses_count = payload_start + decoded * 2 - preamble_pos;
    out.field_set.add_bytes("Tire ID", &tire_id, tire_id.len() * 2);
    out.field_set.add_float("Pressure kpa", pressure_kpa, 1);
    out.field_set.add_int("Temperature C", temperature_c);

    true
}
