use crate::constants::{MAX_VARINT_LEN, VARINT_CONTINUATION, VARINT_PAYLOAD_MASK};
use crate::varint::types::VarintError;

/// Incremental varint decoder.
///
/// Fed one byte at a time so a header may straddle any number of input
/// chunks. Holds no heap state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VarintReader {
    value: u64,
    shift: u32,
    consumed: usize,
}

impl VarintReader {
    pub const fn new() -> Self {
        Self { value: 0, shift: 0, consumed: 0 }
    }

    /// Feed one byte.
    ///
    /// Returns `Ok(Some(value))` on the terminating byte, `Ok(None)` while
    /// more bytes are needed.
    #[inline]
    pub fn push(&mut self, byte: u8) -> Result<Option<u64>, VarintError> {
        if self.consumed == MAX_VARINT_LEN {
            return Err(VarintError::Overflow);
        }
        self.consumed += 1;

        let bits = (byte & VARINT_PAYLOAD_MASK) as u64;
        // 10th byte: only bit 0 still lands inside a u64
        if self.shift == 63 && bits > 1 {
            return Err(VarintError::Overflow);
        }
        self.value |= bits << self.shift;

        if byte & VARINT_CONTINUATION == 0 {
            return Ok(Some(self.value));
        }
        if self.consumed == MAX_VARINT_LEN {
            return Err(VarintError::Overflow);
        }
        self.shift += 7;
        Ok(None)
    }

    /// Bytes consumed so far, terminator included once complete.
    #[inline]
    pub fn len(&self) -> usize {
        self.consumed
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.consumed == 0
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

/// Decode a varint from the front of `buf`.
///
/// # Returns
/// - `Ok((value, consumed))`, `consumed` counting the terminator.
/// - `Err(Overflow)` if byte 10 still has its continuation bit set.
/// - `Err(Incomplete)` if `buf` ends first.
pub fn decode_varint(buf: &[u8]) -> Result<(u64, usize), VarintError> {
    let mut reader = VarintReader::new();
    for &byte in buf.iter().take(MAX_VARINT_LEN) {
        if let Some(value) = reader.push(byte)? {
            return Ok((value, reader.len()));
        }
    }
    Err(VarintError::Incomplete { consumed: reader.len() })
}
