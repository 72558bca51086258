//! Unsigned LEB128 varints.
//!
//! Responsibilities:
//! - Encode `u64` values into 1..=10 bytes, 7 payload bits per byte
//! - Decode from a complete buffer or incrementally, byte by byte
//!
//! Non-responsibilities:
//! - Framing
//! - IO

pub mod types;
pub mod encode;
pub mod decode;

pub use types::VarintError;
pub use encode::{
    encode_varint,
    encode_varint_into,
    encoded_len,
};
pub use decode::{
    decode_varint,
    VarintReader,
};
