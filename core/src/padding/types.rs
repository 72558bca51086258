use bytes::Bytes;
use num_enum::TryFromPrimitive;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::widths::{
    MAX_LENGTH_FIELD, SHA256_BLOCK, SHA256_LENGTH_FIELD, SHA512_BLOCK, SHA512_LENGTH_FIELD,
};

/// Block geometry of the target hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaddingParams {
    /// Bytes per compression block.
    pub block_width: usize,
    /// Bytes of the trailing big-endian bit-length field.
    pub length_field_width: usize,
}

impl Default for PaddingParams {
    fn default() -> Self {
        Self::SHA256
    }
}

impl PaddingParams {
    /// SHA-224 / SHA-256.
    pub const SHA256: Self = Self {
        block_width: SHA256_BLOCK,
        length_field_width: SHA256_LENGTH_FIELD,
    };

    /// SHA-384 / SHA-512 and the truncated variants.
    pub const SHA512: Self = Self {
        block_width: SHA512_BLOCK,
        length_field_width: SHA512_LENGTH_FIELD,
    };

    pub fn new(block_width: usize, length_field_width: usize) -> Result<Self, PaddingError> {
        let params = Self { block_width, length_field_width };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<(), PaddingError> {
        if self.length_field_width == 0 || self.length_field_width > MAX_LENGTH_FIELD {
            return Err(PaddingError::InvalidParams {
                block_width: self.block_width,
                length_field_width: self.length_field_width,
                reason: "length field must be 1..=16 bytes",
            });
        }
        if self.block_width <= self.reserved_tail() {
            return Err(PaddingError::InvalidParams {
                block_width: self.block_width,
                length_field_width: self.length_field_width,
                reason: "block must be wider than marker + length field",
            });
        }
        Ok(())
    }

    /// Marker byte + length field.
    #[inline]
    pub const fn reserved_tail(&self) -> usize {
        1 + self.length_field_width
    }

    /// Offset of the length field inside the final block.
    #[inline]
    pub const fn length_field_offset(&self) -> usize {
        self.block_width - self.length_field_width
    }

    /// Longest message (in bytes) whose bit length fits the length field.
    pub fn max_message_len(&self) -> u64 {
        let bits = (self.length_field_width * 8) as u32 - 3;
        if bits >= u64::BITS {
            u64::MAX
        } else {
            (1u64 << bits) - 1
        }
    }
}

/// Hash family select, as driven on the hardware `sha_type` input.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, TryFromPrimitive, Serialize, Deserialize)]
pub enum ShaFamily {
    /// SHA-224 / SHA-256
    Sha256 = 0,
    /// SHA-384 / SHA-512
    Sha512 = 1,
}

impl ShaFamily {
    pub const fn params(self) -> PaddingParams {
        match self {
            ShaFamily::Sha256 => PaddingParams::SHA256,
            ShaFamily::Sha512 => PaddingParams::SHA512,
        }
    }
}

impl From<ShaFamily> for PaddingParams {
    fn from(family: ShaFamily) -> Self {
        family.params()
    }
}

/// One block of exactly `block_width` bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaddedBlock {
    /// Position of the block within its message, from 0.
    pub index: u64,
    pub bytes: Bytes,
    /// Final block of the message (carries the length field).
    pub is_last: bool,
}

impl PaddedBlock {
    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Concise debug summary of the block.
    pub fn summary(&self) -> String {
        format!(
            "PaddedBlock {{ index: {}, len: {}, last: {}, bytes: {} }}",
            self.index,
            self.bytes.len(),
            self.is_last,
            hex::encode(&self.bytes),
        )
    }
}

impl AsRef<[u8]> for PaddedBlock {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaddingError {
    #[error("message of {message_len} bytes does not fit a {field_width}-byte bit-length field")]
    LengthOverflow { message_len: u64, field_width: usize },

    #[error("invalid padding params (block {block_width}, length field {length_field_width}): {reason}")]
    InvalidParams {
        block_width: usize,
        length_field_width: usize,
        reason: &'static str,
    },
}
