//! Schrader GEN1 (spec.md §4.7 row 8). Manchester (`01`=0, `10`=1), byte-sum
//! checksum over the first 7 bytes.

use crate::{bitmap, checksum, line_code, types::MessageInfo};

const PREAMBLE: &str = "010101011001";
const PAYLOAD_BYTES: usize = 8;
const SUM_INIT: u8 = 0x00;

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

    if checksum::sum_bytes(&payload[0..7], SUM_INIT) != payload[7] {
        return false;
    }

    let tire_id = [payload[0], payload[1], payload[2], payload[3]];
    let pressure_psi = payload[4] as f32 * 0.25;
    let temperature_c = payload[5] as i32 - 50;

    out.decoder_name = "Schrader GEN1";
    out.start_offset_bits = preamble_pos;
    out.pulses_count = payload_start + decoded * 2 - preamble_pos;
    out.field_set.add_bytes("Tire ID", &tire_id, tire_id.len() * 2);
    out.field_set.add_float("Pressure psi", pressure_psi, 2);
    out.field_set.add_int("Temperature C", temperature_c);

    true
}
