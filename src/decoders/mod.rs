//! Protocol decoder registry (spec.md §4.7/§4.8): one module per vehicle
//! protocol, each implementing the shared `decode` contract. The donor
//! codebase never reaches for `dyn Trait` (no_std, no allocator), so the
//! registry is a static table of function pointers — spec.md §9's suggested
//! "function-pointer table" variant.

pub mod bmw_gen23;
pub mod bmw_gen45_audi;
pub mod citroen;
pub mod elantra2012;
pub mod ford;
pub mod gm_aftermarket;
pub mod hyundai_kia;
pub mod pmv107j;
pub mod porsche987;
pub mod renault;
pub mod schrader_eg53ma4;
pub mod schrader_gen1;
pub mod schrader_smd3ma4;
pub mod toyota_eu;

use crate::types::MessageInfo;

/// Shared decoder contract (spec.md §4.7): a quick length precheck, a
/// preamble search, a line-code decode into a stack buffer, a checksum, and
/// field extraction. Returns `false` with no visible side effects other than
/// the decoder's own stack buffers on any failure.
pub type DecodeFn = fn(src_bits: &[u8], src_len_bytes: usize, src_len_bits: usize, out: &mut MessageInfo) -> bool;

pub struct DecoderEntry {
    pub name: &'static str,
    pub decode: DecodeFn,
}

/// Iteration order is a contract (spec.md §4.8): more specific decoders
/// precede generic ones, and only the 17-byte rtl_433-compatible GM
/// Aftermarket variant is registered (spec.md §9's Open Question
/// resolution — the 9-byte legacy variant is not implemented).
pub const REGISTRY: &[DecoderEntry] = &[
    DecoderEntry { name: "Toyota PMV-107J", decode: pmv107j::decode },
    DecoderEntry { name: "Elantra2012/Civic", decode: elantra2012::decode },
    DecoderEntry { name: "BMW Gen4/5 & Audi", decode: bmw_gen45_audi::decode },
    DecoderEntry { name: "BMW Gen2/3", decode: bmw_gen23::decode },
    DecoderEntry { name: "Porsche 987", decode: porsche987::decode },
    DecoderEntry { name: "Schrader SMD3MA4", decode: schrader_smd3ma4::decode },
    DecoderEntry { name: "GM Aftermarket", decode: gm_aftermarket::decode },
    DecoderEntry { name: "Renault", decode: renault::decode },
    DecoderEntry { name: "Toyota EU", decode: toyota_eu::decode },
    DecoderEntry { name: "Schrader GEN1", decode: schrader_gen1::decode },
    DecoderEntry { name: "Schrader EG53MA4", decode: schrader_eg53ma4::decode },
    DecoderEntry { name: "Citroen", decode: citroen::decode },
    DecoderEntry { name: "Ford", decode: ford::decode },
    DecoderEntry { name: "Hyundai/Kia", decode: hyundai_kia::decode },
];
