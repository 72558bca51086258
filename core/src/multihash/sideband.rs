use crate::constants::sideband::{CODEC_BITS, LENGTH_BITS};
use crate::multihash::types::{EnvelopeError, HeaderField};

/// Pack `(codec, length)` into the transport's sideband word.
///
/// Layout (MSB first):
///
/// ```text
/// [ zero (80) ][ codec (16) ][ length (32) ]
/// ```
pub fn pack_sideband(codec: u64, length: u64) -> Result<u128, EnvelopeError> {
    if codec >> CODEC_BITS != 0 {
        return Err(EnvelopeError::SidebandOverflow {
            field: HeaderField::Codec,
            value: codec,
            bits: CODEC_BITS,
        });
    }
    if length >> LENGTH_BITS != 0 {
        return Err(EnvelopeError::SidebandOverflow {
            field: HeaderField::Length,
            value: length,
            bits: LENGTH_BITS,
        });
    }
    Ok(((codec as u128) << LENGTH_BITS) | length as u128)
}

/// Inverse of [`pack_sideband`]; bits above the codec field are ignored.
pub fn unpack_sideband(word: u128) -> (u64, u64) {
    let length = (word & ((1u128 << LENGTH_BITS) - 1)) as u64;
    let codec = ((word >> LENGTH_BITS) & ((1u128 << CODEC_BITS) - 1)) as u64;
    (codec, length)
}
