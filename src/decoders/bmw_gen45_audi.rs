//! BMW Gen4/5 and Audi (spec.md §4.7 row 3). Shared preamble `0xAA59`,
//! Manchester-zero-inverted (`10`=0, `01`=1), CRC-8 poly 0x2F init 0xAA.
//! BMW frames are 11 bytes, Audi frames 8 — the decoder tries the longer
//! frame first since it's the more specific of the two.

use crate::{bitmap, checksum, line_code, types::MessageInfo};

const PREAMBLE: &str = "1010101001011001";
const CRC_POLY: u8 = 0x2F;
const CRC_INIT: u8 = 0xAA;

const BMW_PAYLOAD_BYTES: usize = 11;
const AUDI_PAYLOAD_BYTES: usize = 8;

fn try_decode_len(
    src_bits: &[u8],
    src_len_bits: usize,
    payload_start: usize,
    payload_bytes: usize,
) -> Option<[u8; BMW_PAYLOAD_BYTES]> {
    let mut payload = [0u8; BMW_PAYLOAD_BYTES];
    let decoded = line_code::convert_from_line_code(
        &mut payload,
        payload_bytes,
        src_bits,
        src_len_bits,
        payload_start,
        "10",
        "01",
    );
    if decoded != payload_bytes * 8 {
        return None;
    }
    let crc = checksum::crc8(&payload[0..payload_bytes - 1], CRC_INIT, CRC_POLY);
    if crc != payload[payload_bytes - 1] {
        return None;
    }
    Some(payload)
}

pub fn decode(src_bits: &[u8], _src_len_bytes: usize, src_len_bits: usize, out: &mut MessageInfo) -> bool {
    if src_len_bits < PREAMBLE.len() + AUDI_PAYLOAD_BYTES * 8 * 2 {
        return false;
    }

    let preamble_pos = bitmap::seek_bits(src_bits, src_len_bits, 0, src_len_bits, PREAMBLE);
    if preamble_pos == bitmap::NOT_FOUND {
        return false;
    }
    let payload_start = preamble_pos + PREAMBLE.len();

    let (payload, name, decoded_bytes) = if let Some(p) = try_decode_len(src_bits, src_len_bits, payload_start, BMW_PAYLOAD_BYTES) {
        (p, "BMW Gen4/5", BMW_PAYLOAD_BYTES)
    } else if let Some(p) = try_decode_len(src_bits, src_len_bits, payload_start, AUDI_PAYLOAD_BYTES) {
        (p, "Audi", AUDI_PAYLOAD_BYTES)
    } else {
        return false;
    };

    let pressure_kpa = payload[5] as f32 * 2.45;
    let temperature_c = payload[6] as i32 - 52;
    let tire_id = [payload[0], payload[1], payload[2], payload[3]];

    out.decoder_name = name;
    out.start_offset_bits = preamble_pos;
    out.pulses_count = payload_start + decoded_bytes * 8 * 2 - preamble_pos;
    out.field_set.add_bytes("Tire ID", &tire_id, tire_id.len() * 2);
    out.field_set.add_float("Pressure kpa", pressure_kpa, 1);
    out.field_set.add_int("Temperature C", temperature_c);

    true
}
