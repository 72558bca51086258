use std::fmt;

use num_enum::TryFromPrimitive;

/// `Debug` name of a registry enum, or the raw value in hex when unknown.
pub fn enum_name_or_hex<T>(raw: T::Primitive) -> String
where
    T: TryFromPrimitive + fmt::Debug,
    T::Primitive: fmt::LowerHex,
{
    match T::try_from_primitive(raw) {
        Ok(variant) => format!("{:?}", variant),
        Err(_) => format!("0x{:x}", raw),
    }
}

// Helper function to flatten blocks or chunks into a single blob
pub fn blocks_to_bytes(blocks: &[impl AsRef<[u8]>]) -> Vec<u8> {
    blocks.iter()
        .flat_map(|b| b.as_ref())
        .copied()
        .collect()
}
