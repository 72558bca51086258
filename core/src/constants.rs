/// Longest varint accepted on the wire (ceil(64 / 7) bytes).
pub const MAX_VARINT_LEN: usize = 10;

/// Continuation bit of a varint byte.
pub const VARINT_CONTINUATION: u8 = 0x80;

/// Payload bits of a varint byte.
pub const VARINT_PAYLOAD_MASK: u8 = 0x7f;

/// First padding byte appended after the message.
pub const PADDING_MARKER: u8 = 0x80;

/// Block and length-field widths (in bytes) of the hash families we prepare for.
pub mod widths {
    /// SHA-224 / SHA-256: 512-bit blocks, 64-bit length field.
    pub const SHA256_BLOCK: usize = 64;
    pub const SHA256_LENGTH_FIELD: usize = 8;

    /// SHA-384 / SHA-512: 1024-bit blocks, 128-bit length field.
    pub const SHA512_BLOCK: usize = 128;
    pub const SHA512_LENGTH_FIELD: usize = 16;

    /// Widest length field we can express (u128).
    pub const MAX_LENGTH_FIELD: usize = 16;
}

/// Bit layout of the decoder's output sideband word.
///
/// ```text
/// [ zero (80) ][ codec (16) ][ length (32) ]
/// ```
pub mod sideband {
    pub const WORD_BITS: u32 = 128;
    pub const CODEC_BITS: u32 = 16;
    pub const LENGTH_BITS: u32 = 32;
}

/// Defaults when Option<T> is None
pub const DEFAULT_READ_CHUNK: usize = 4 * 1024; // 4 KiB
/// Bounded channel depth between pipeline stages.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 16;
/// Worker threads for multi-message padding.
pub const DEFAULT_WORKERS: usize = 4;
