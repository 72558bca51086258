use std::fmt;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::multihash::sideband::pack_sideband;
use crate::varint::VarintError;

/// Which header varint an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderField {
    Codec,
    Length,
}

impl fmt::Display for HeaderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderField::Codec => write!(f, "codec"),
            HeaderField::Length => write!(f, "length"),
        }
    }
}

/// What to do with payload bytes beyond the declared length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlongPolicy {
    /// Fail the message with `OverlongPayload`.
    #[default]
    Reject,
    /// Forward exactly `length` bytes and drop the rest of the message.
    Truncate,
}

/// Header fields decoded from one envelope, attached to every payload chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvelopeMeta {
    pub codec: u64,
    pub length: u64,
    /// Sideband tag the first input chunk carried, forwarded unchanged.
    pub upstream_tag: Option<u128>,
}

impl EnvelopeMeta {
    /// Fixed-width transport encoding of `(codec, length)`.
    pub fn sideband(&self) -> Result<u128, EnvelopeError> {
        pack_sideband(self.codec, self.length)
    }
}

/// Payload bytes of one envelope, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadChunk {
    pub data: Bytes,
    pub meta: EnvelopeMeta,
    /// Final chunk of the output message.
    pub last: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvelopeError {
    #[error("{field} varint overflow")]
    VarintOverflow { field: HeaderField },

    #[error("message ended inside the {field} varint")]
    TruncatedHeader { field: HeaderField },

    #[error("short payload: declared {declared} bytes, received {received}")]
    ShortPayload { declared: u64, received: u64 },

    #[error("overlong payload: declared {declared} bytes, received at least {received}")]
    OverlongPayload { declared: u64, received: u64 },

    #[error("{field} value {value:#x} does not fit a {bits}-bit sideband field")]
    SidebandOverflow { field: HeaderField, value: u64, bits: u32 },
}

impl EnvelopeError {
    pub(crate) fn from_varint(field: HeaderField, e: VarintError) -> Self {
        match e {
            VarintError::Overflow => EnvelopeError::VarintOverflow { field },
            VarintError::Incomplete { .. } => EnvelopeError::TruncatedHeader { field },
        }
    }
}
