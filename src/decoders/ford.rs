//! Ford (spec.md §4.7 row 8). Manchester-zero-inverted (`10`=0, `01`=1),
//! CRC-8 poly 0x07 init 0xFF over the first 9 bytes.

use crate::{bitmap, checksum, line_code, types::MessageInfo};

const PREAMBLE: &str = "1100101100";
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
    let decoded = line_code::convert_from_line_code(&mut payload, PAYLOAD_BYTES, src_bits, src_len_bits, payload_start, "10", "01");
    if decoded != PAYLOAD_BYTES * 8 {
        return false;
    }

    if checksum::crc8(&payload[0..9], CRC_INIT, CRC_POLY) != payload[9] {
        return false;
    }

    let tire_id = [payload[1], payload[2], payload[3], payload[4]];
    let pressure_kpa = (payload[6] as f32 - 20.0) * 2.0;
    let temperature_c = payload[7] as i32 - 40;

    out.decoder_name = "Ford";
    out.start_offset_bits = preamble_pos;
    out.pulses_count = payload_start + decoded * 2 - preamble_pos;
    out.field_set.add_bytes("Tire ID", &tire_id, tire_id.len() * 2);
    out.field_set.add_float("Pressure kpa", pressure_kpa, 1);
    out.field_set.add_int("Temperature C", temperature_c);

    true
}
