//! hashprep-core
//!
//! Streaming front-ends of a hash pipeline:
//! - a multihash envelope decoder that strips `varint(codec) ‖ varint(length)`
//!   and forwards the payload tagged with both values
//! - a Merkle-Damgard segmenter that cuts a message into fixed-width blocks
//!   and appends `0x80 ‖ zeros ‖ bit length`
//!
//! Both are push-driven per-message state machines; `stream` wires them to
//! readers, writers and bounded channels.

#![forbid(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod config;
pub mod types;
pub mod utils;

pub mod varint;
pub mod multihash;
pub mod padding;
pub mod telemetry;

// Stream layer
pub mod stream;

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::config::{DecoderConfig, PipelineConfig, SegmenterConfig};
    pub use crate::multihash::{
        decode_envelope, encode_envelope, EnvelopeDecoder, EnvelopeError, EnvelopeMeta,
        OverlongPolicy, PayloadChunk,
    };
    pub use crate::padding::{pad_message, PaddedBlock, PaddingError, PaddingParams, Segmenter};
    pub use crate::stream::{ChunkFlags, InputChunk};
    pub use crate::types::StreamError;
    pub use crate::varint::{decode_varint, encode_varint, VarintError};
}
