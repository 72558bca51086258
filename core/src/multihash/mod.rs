//! Multihash envelope handling.
//!
//! Responsibilities:
//! - Strip the `varint(codec) ‖ varint(length)` header from a byte stream
//! - Forward the payload tagged with `(codec, length)` metadata
//! - Enforce the declared length against the message boundary
//! - Pack metadata into the fixed-width sideband word of the transport
//!
//! Non-responsibilities:
//! - Resolving or validating codecs (identifiers pass through untouched)
//! - Hashing
//! - IO

pub mod types;
pub mod codecs;
pub mod encode;
pub mod decode;
pub mod sideband;

pub use types::{
    EnvelopeError,
    EnvelopeMeta,
    HeaderField,
    OverlongPolicy,
    PayloadChunk,
};
pub use codecs::Multicodec;
pub use encode::{
    encode_envelope,
    encode_envelope_header,
};
pub use decode::{
    decode_envelope,
    EnvelopeDecoder,
    EnvelopeState,
};
pub use sideband::{
    pack_sideband,
    unpack_sideband,
};
