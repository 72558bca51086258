use crate::varint::encode_varint_into;

/// `varint(codec) ‖ varint(length)`.
pub fn encode_envelope_header(codec: u64, length: u64) -> Vec<u8> {
    let mut out = Vec::with_capacity(20);
    encode_varint_into(codec, &mut out);
    encode_varint_into(length, &mut out);
    out
}

/// Wrap `payload` in a multihash envelope.
///
/// Layout:
///
/// ```text
/// [ codec   (varint) ]
/// [ length  (varint) ]
/// [ payload (length) ]
/// ```
pub fn encode_envelope(codec: u64, payload: &[u8]) -> Vec<u8> {
    let mut out = encode_envelope_header(codec, payload.len() as u64);
    out.reserve(payload.len());
    out.extend_from_slice(payload);
    out
}
