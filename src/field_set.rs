//! Field-set: an ordered, append-only, type-tagged record of values a
//! decoder emits. There's no allocator under `no_std`, so — same as the
//! donor codebase's `PAYLOAD`/`PAYLOAD_REC_BB_*` static arrays — everything
//! here is a fixed-capacity `heapless` container sized generously for the
//! handful of fields any one TPMS message actually carries.

use heapless::{String, Vec};
use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Max fields a single decoded message can carry. TPMS payloads in this
/// registry top out at tire ID + pressure + temperature + a couple of
/// protocol-specific extras (flags, battery status); 8 leaves headroom.
pub const MAX_FIELDS: usize = 8;
/// Max length of a `bytes`-tagged field's payload (tire IDs run 3-5 bytes;
/// the widest raw payload any decoder here copies in full is 11 bytes).
pub const MAX_FIELD_BYTES: usize = 16;
/// Max length of a `string`-tagged field's value.
pub const MAX_FIELD_STR: usize = 32;

#[derive(Clone, Copy, Debug, PartialEq, Eq, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FieldType {
    Str = 0,
    SignedInt = 1,
    UnsignedInt = 2,
    Binary = 3,
    Hex = 4,
    Bytes = 5,
    Float = 6,
}

#[derive(Clone, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FieldValue {
    Str(String<MAX_FIELD_STR>),
    SignedInt(i32),
    UnsignedInt(u32),
    /// Displayed in binary; stored as a plain integer.
    Binary(u32),
    /// Displayed in hex; stored as a plain integer.
    Hex(u32),
    /// Raw bytes, tagged with a length in *nibbles* (spec contract: the
    /// shell divides by two and rounds up to get a byte count, since a
    /// protocol's payload may end on a nibble boundary).
    Bytes { data: Vec<u8, MAX_FIELD_BYTES>, nibble_len: usize },
    Float { value: f32, fractional_digits: u8 },
}

impl FieldValue {
    pub fn type_tag(&self) -> FieldType {
        match self {
            FieldValue::Str(_) => FieldType::Str,
            FieldValue::SignedInt(_) => FieldType::SignedInt,
            FieldValue::UnsignedInt(_) => FieldType::UnsignedInt,
            FieldValue::Binary(_) => FieldType::Binary,
            FieldValue::Hex(_) => FieldType::Hex,
            FieldValue::Bytes { .. } => FieldType::Bytes,
            FieldValue::Float { .. } => FieldType::Float,
        }
    }
}

#[derive(Clone, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Field {
    pub name: &'static str,
    pub value: FieldValue,
}

/// Ordered sequence of [`Field`]s emitted by a single decoder invocation.
/// Owned by the [`crate::types::MessageInfo`] that holds it; freed with it
/// (there's nothing to free under `no_std` beyond dropping the fixed array,
/// but the name mirrors spec.md §3's lifecycle language).
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FieldSet {
    fields: Vec<Field, MAX_FIELDS>,
}

impl FieldSet {
    pub const fn new() -> Self {
        Self { fields: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> core::slice::Iter<'_, Field> {
        self.fields.iter()
    }

    fn push(&mut self, name: &'static str, value: FieldValue) {
        // Append-only: if the set is already full, the field is silently
        // dropped, matching the bitmap module's "out-of-range writes are
        // silently dropped" posture rather than panicking on a decoder's
        // behalf.
        let _ = self.fields.push(Field { name, value });
    }

    pub fn add_int(&mut self, name: &'static str, value: i32) {
        self.push(name, FieldValue::SignedInt(value));
    }

    pub fn add_uint(&mut self, name: &'static str, value: u32) {
        self.push(name, FieldValue::UnsignedInt(value));
    }

    pub fn add_hex(&mut self, name: &'static str, value: u32) {
        self.push(name, FieldValue::Hex(value));
    }

    pub fn add_bin(&mut self, name: &'static str, value: u32) {
        self.push(name, FieldValue::Binary(value));
    }

    pub fn add_str(&mut self, name: &'static str, value: &str) {
        let mut s = String::new();
        // Truncate rather than fail: a display string that doesn't fit is
        // still better than dropping the field entirely.
        for c in value.chars() {
            if s.push(c).is_err() {
                break;
            }
        }
        self.push(name, FieldValue::Str(s));
    }

    /// `nibble_len` is the length of the field in nibbles, per spec.md
    /// §4.5; callers pass the raw bytes that back it (the nibble count may
    /// be odd, so it isn't always `bytes.len() * 2`).
    pub fn add_bytes(&mut self, name: &'static str, bytes: &[u8], nibble_len: usize) {
        let mut data = Vec::new();
        for &b in bytes.iter().take(MAX_FIELD_BYTES) {
            let _ = data.push(b);
        }
        self.push(name, FieldValue::Bytes { data, nibble_len });
    }

    pub fn add_float(&mut self, name: &'static str, value: f32, fractional_digits: u8) {
        self.push(name, FieldValue::Float { value, fractional_digits });
    }

    /// Exact-name lookup; the shell uses this to pull `"Tire ID"`,
    /// `"Pressure kpa"` / `"Pressure psi"`, `"Temperature C"` out of a
    /// successful decode per spec.md §6.
    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn get_bytes(&self, name: &str) -> Option<(&[u8], usize)> {
        match &self.get(name)?.value {
            FieldValue::Bytes { data, nibble_len } => Some((data.as_slice(), *nibble_len)),
            _ => None,
        }
    }

    pub fn get_float(&self, name: &str) -> Option<f32> {
        match self.get(name)?.value {
            FieldValue::Float { value, .. } => Some(value),
            _ => None,
        }
    }

    pub fn get_int(&self, name: &str) -> Option<i32> {
        match self.get(name)?.value {
            FieldValue::SignedInt(v) => Some(v),
            _ => None,
        }
    }

    pub fn get_uint(&self, name: &str) -> Option<u32> {
        match self.get(name)?.value {
            FieldValue::UnsignedInt(v) => Some(v),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_exact_name() {
        let mut fs = FieldSet::new();
        fs.add_bytes("Tire ID", &[0x04, 0x8D, 0x15, 0x9E], 8);
        fs.add_float("Pressure kpa", 396.8, 1);
        fs.add_int("Temperature C", 50);

        let (id, nibbles) = fs.get_bytes("Tire ID").unwrap();
        assert_eq!(id, &[0x04, 0x8D, 0x15, 0x9E]);
        assert_eq!(nibbles, 8);
        assert!((fs.get_float("Pressure kpa").unwrap() - 396.8).abs() < 1e-3);
        assert_eq!(fs.get_int("Temperature C").unwrap(), 50);
        assert!(fs.get("Nonexistent").is_none());
    }

    #[test]
    fn append_only_and_capacity_bounded() {
        let mut fs = FieldSet::new();
        for i in 0..(MAX_FIELDS + 4) {
            fs.add_int("spam", i as i32);
        }
        assert_eq!(fs.len(), MAX_FIELDS);
    }

    #[test]
    fn odd_nibble_length_is_preserved() {
        let mut fs = FieldSet::new();
        fs.add_bytes("partial", &[0xAB, 0xC0], 3); // 3 nibbles, not 4
        let (_, nibbles) = fs.get_bytes("partial").unwrap();
        assert_eq!(nibbles, 3);
    }
}
