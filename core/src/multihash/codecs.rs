//! Multicodec identifiers we know by name.
//!
//! Used for log labels only; unknown identifiers are still forwarded.
use num_enum::TryFromPrimitive;

use crate::utils::enum_name_or_hex;

#[repr(u64)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, TryFromPrimitive)]
pub enum Multicodec {
    Identity   = 0x00,
    Sha1       = 0x11,
    Sha2_256   = 0x12,
    Sha2_512   = 0x13,
    Sha3_512   = 0x14,
    Sha3_256   = 0x16,
    Blake2b216 = 0xb21b,
    Blake2b256 = 0xb220,
}

impl Multicodec {
    /// `"Sha2_256"` for known codecs, `"0x…"` otherwise.
    pub fn label(raw: u64) -> String {
        enum_name_or_hex::<Multicodec>(raw)
    }
}
