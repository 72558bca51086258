use crate::constants::{VARINT_CONTINUATION, VARINT_PAYLOAD_MASK, MAX_VARINT_LEN};

/// Append the varint form of `value` to `out`.
///
/// Low 7 bits first; every byte except the last carries the continuation bit.
#[inline]
pub fn encode_varint_into(mut value: u64, out: &mut Vec<u8>) {
    while value > VARINT_PAYLOAD_MASK as u64 {
        out.push((value as u8 & VARINT_PAYLOAD_MASK) | VARINT_CONTINUATION);
        value >>= 7;
    }
    out.push(value as u8);
}

/// Encode `value` into a fresh buffer.
pub fn encode_varint(value: u64) -> Vec<u8> {
    let mut out = Vec::with_capacity(MAX_VARINT_LEN);
    encode_varint_into(value, &mut out);
    out
}

/// Number of bytes `encode_varint(value)` produces.
#[inline]
pub const fn encoded_len(value: u64) -> usize {
    let bits = 64 - value.leading_zeros() as usize;
    if bits == 0 {
        1
    } else {
        (bits + 6) / 7
    }
}
