use byteorder::{BigEndian, ByteOrder};

use crate::constants::PADDING_MARKER;
use crate::padding::types::{PaddingError, PaddingParams};

/// Padding layout of one message, derived from its length.
///
/// ```text
/// [ message (L) ][ 0x80 ][ zero fill ][ L * 8 (length_field_width, BE) ]
/// └──────────────── total_blocks * block_width ────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaddingPlan {
    pub message_len: u64,
    pub block_width: usize,
    pub length_field_width: usize,
    /// Marker + length field.
    pub reserved_tail: usize,
    /// Message bytes in the first tail block (`L mod block_width`).
    pub remaining: usize,
    /// Zero bytes between the marker and the length field.
    pub zero_fill: usize,
    pub total_blocks: u64,
    pub last_block_index: u64,
    /// Marker and length field do not fit after `remaining`; the tail spans two blocks.
    pub extra_block_needed: bool,
    /// `L * 8`.
    pub bit_length: u128,
}

impl PaddingPlan {
    pub fn new(message_len: u64, params: PaddingParams) -> Result<Self, PaddingError> {
        params.validate()?;
        if message_len > params.max_message_len() {
            return Err(PaddingError::LengthOverflow {
                message_len,
                field_width: params.length_field_width,
            });
        }

        let width = params.block_width;
        let reserved_tail = params.reserved_tail();
        let full_blocks = message_len / width as u64;
        let remaining = (message_len % width as u64) as usize;

        let extra_block_needed = remaining + reserved_tail > width;
        let tail_blocks = if extra_block_needed { 2 } else { 1 };
        let zero_fill = tail_blocks * width - remaining - reserved_tail;
        let total_blocks = full_blocks + tail_blocks as u64;

        Ok(Self {
            message_len,
            block_width: width,
            length_field_width: params.length_field_width,
            reserved_tail,
            remaining,
            zero_fill,
            total_blocks,
            last_block_index: total_blocks - 1,
            extra_block_needed,
            bit_length: message_len as u128 * 8,
        })
    }

    /// Total output length, a multiple of `block_width`.
    #[inline]
    pub fn padded_len(&self) -> u64 {
        self.total_blocks * self.block_width as u64
    }

    /// Bytes appended after the message.
    #[inline]
    pub fn padding_len(&self) -> usize {
        1 + self.zero_fill + self.length_field_width
    }

    /// Append marker, zero fill and length field to `out`.
    pub fn write_padding(&self, out: &mut Vec<u8>) {
        out.reserve(self.padding_len());
        out.push(PADDING_MARKER);
        out.resize(out.len() + self.zero_fill, 0);

        let start = out.len();
        out.resize(start + self.length_field_width, 0);
        BigEndian::write_uint128(&mut out[start..], self.bit_length, self.length_field_width);
    }

    /// The padding tail as a fresh buffer.
    pub fn padding_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.padding_len());
        self.write_padding(&mut out);
        out
    }
}
