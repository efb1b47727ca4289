//! CRC-8, CRC-16 (both MSB-first, no reflection, no final XOR), byte-sum and
//! byte-XOR checksums. Every protocol decoder in `decoders/` calls one of
//! these with its own polynomial/init pair rather than hand-rolling the
//! loop — the donor codebase does the same for its own CRC
//! (`dshot::calc_crc`): one small pure function, called with the field
//! values that vary per use site.

/// MSB-first CRC-8: XOR each byte into the accumulator, then for 8
/// iterations shift left, XORing in `poly` whenever the bit shifted out was
/// set. No input/output reflection, no final XOR.
pub fn crc8(data: &[u8], init: u8, poly: u8) -> u8 {
    let mut acc = init;
    for &byte in data {
        acc ^= byte;
        for _ in 0..8 {
            let top = acc & 0x80 != 0;
            acc <<= 1;
            if top {
                acc ^= poly;
            }
        }
    }
    acc
}

/// Same structure as [`crc8`], with a 16-bit accumulator.
pub fn crc16(data: &[u8], init: u16, poly: u16) -> u16 {
    let mut acc = init;
    for &byte in data {
        acc ^= (byte as u16) << 8;
        for _ in 0..8 {
            let top = acc & 0x8000 != 0;
            acc <<= 1;
            if top {
                acc ^= poly;
            }
        }
    }
    acc
}

/// `(init + sum(data)) mod 256`.
pub fn sum_bytes(data: &[u8], init: u8) -> u8 {
    let mut acc = init;
    for &byte in data {
        acc = acc.wrapping_add(byte);
    }
    acc
}

/// Running XOR of `data`, seeded with `init`.
pub fn xor_bytes(data: &[u8], init: u8) -> u8 {
    let mut acc = init;
    for &byte in data {
        acc ^= byte;
    }
    acc
}
