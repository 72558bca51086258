use bytes::Bytes;
use tracing::{debug, trace, warn};

use crate::config::DecoderConfig;
use crate::multihash::codecs::Multicodec;
use crate::multihash::types::{EnvelopeError, EnvelopeMeta, HeaderField, OverlongPolicy, PayloadChunk};
use crate::stream::types::InputChunk;
use crate::telemetry::StreamCounters;
use crate::varint::VarintReader;

/// Per-message decoder state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnvelopeState {
    /// Accumulating the codec varint.
    #[default]
    AwaitingCodec,
    /// Accumulating the length varint.
    AwaitingLength { codec: u64 },
    /// Forwarding payload bytes.
    StreamingPayload { codec: u64, length: u64, forwarded: u64 },
    /// Message completed; the next chunk starts a new one.
    Done,
    /// Message failed before its boundary; input is dropped until end-of-message.
    Draining,
}

/// Streaming multihash envelope decoder.
///
/// One instance handles one message at a time and resets itself at every
/// end-of-message marker, so it can be reused for a whole stream of messages.
/// Errors are local to the message that caused them.
#[derive(Debug)]
pub struct EnvelopeDecoder {
    policy: OverlongPolicy,
    state: EnvelopeState,
    varint: VarintReader,
    header_len: usize,
    upstream_tag: Option<u128>,
    in_message: bool,
    truncating: bool,
    counters: StreamCounters,
}

impl Default for EnvelopeDecoder {
    fn default() -> Self {
        Self::new(&DecoderConfig::default())
    }
}

impl EnvelopeDecoder {
    pub fn new(config: &DecoderConfig) -> Self {
        Self {
            policy: config.overlong_policy,
            state: EnvelopeState::AwaitingCodec,
            varint: VarintReader::new(),
            header_len: 0,
            upstream_tag: None,
            in_message: false,
            truncating: false,
            counters: StreamCounters::default(),
        }
    }

    #[inline]
    pub fn state(&self) -> EnvelopeState {
        self.state
    }

    pub fn counters(&self) -> &StreamCounters {
        &self.counters
    }

    /// Drop all per-message state. Counters survive.
    pub fn reset(&mut self) {
        self.state = EnvelopeState::AwaitingCodec;
        self.varint.reset();
        self.header_len = 0;
        self.upstream_tag = None;
        self.in_message = false;
        self.truncating = false;
    }

    /// Feed one input chunk.
    ///
    /// # Returns
    /// - `Ok(Some(chunk))` with the payload bytes this input carried; an
    ///   end-of-message input always yields a chunk with `last == true`.
    /// - `Ok(None)` when the input held only header bytes (or was dropped).
    /// - `Err(EnvelopeError)` when the current message is malformed. The rest
    ///   of that message is discarded; the next message decodes normally.
    pub fn push(&mut self, chunk: &InputChunk) -> Result<Option<PayloadChunk>, EnvelopeError> {
        if chunk.is_abort() {
            if self.in_message {
                debug!("envelope aborted, discarding message state");
                self.counters.message_failed();
            }
            self.reset();
            return Ok(None);
        }

        if self.state == EnvelopeState::Done {
            self.reset();
        }
        if !self.in_message {
            self.in_message = true;
            self.upstream_tag = chunk.tag;
        }
        self.counters.add_input(chunk.data.len());

        match self.step(&chunk.data, chunk.is_last()) {
            Ok(out) => Ok(out),
            Err(e) => {
                warn!(error = %e, "envelope rejected");
                self.counters.message_failed();
                if chunk.is_last() {
                    self.reset();
                } else {
                    self.state = EnvelopeState::Draining;
                }
                Err(e)
            }
        }
    }

    fn step(&mut self, data: &Bytes, last: bool) -> Result<Option<PayloadChunk>, EnvelopeError> {
        let mut pos = 0usize;

        // ---- Header ----
        while pos < data.len() {
            let state = self.state;
            match state {
                EnvelopeState::AwaitingCodec => {
                    let byte = data[pos];
                    pos += 1;
                    self.header_len += 1;
                    let decoded = self
                        .varint
                        .push(byte)
                        .map_err(|e| EnvelopeError::from_varint(HeaderField::Codec, e))?;
                    if let Some(codec) = decoded {
                        trace!(codec, "codec varint complete");
                        self.varint.reset();
                        self.state = EnvelopeState::AwaitingLength { codec };
                    }
                }
                EnvelopeState::AwaitingLength { codec } => {
                    let byte = data[pos];
                    pos += 1;
                    self.header_len += 1;
                    let decoded = self
                        .varint
                        .push(byte)
                        .map_err(|e| EnvelopeError::from_varint(HeaderField::Length, e))?;
                    if let Some(length) = decoded {
                        debug!(
                            codec = %Multicodec::label(codec),
                            length,
                            header_len = self.header_len,
                            "envelope header decoded"
                        );
                        self.varint.reset();
                        self.counters.add_header(self.header_len);
                        self.state = EnvelopeState::StreamingPayload { codec, length, forwarded: 0 };
                    }
                }
                _ => break,
            }
        }

        // ---- Payload ----
        match self.state {
            EnvelopeState::AwaitingCodec => {
                if last {
                    return Err(EnvelopeError::TruncatedHeader { field: HeaderField::Codec });
                }
                Ok(None)
            }
            EnvelopeState::AwaitingLength { .. } => {
                if last {
                    return Err(EnvelopeError::TruncatedHeader { field: HeaderField::Length });
                }
                Ok(None)
            }
            EnvelopeState::StreamingPayload { codec, length, forwarded } => {
                let rest = data.slice(pos..);
                let room = length - forwarded;
                let mut take = rest.len();

                if rest.len() as u64 > room {
                    let received = forwarded + rest.len() as u64;
                    match self.policy {
                        OverlongPolicy::Reject => {
                            return Err(EnvelopeError::OverlongPayload { declared: length, received });
                        }
                        OverlongPolicy::Truncate => {
                            if !self.truncating {
                                warn!(declared = length, received, "overlong payload, truncating");
                                self.truncating = true;
                            }
                            take = room as usize;
                        }
                    }
                }

                let forwarded = forwarded + take as u64;
                self.state = EnvelopeState::StreamingPayload { codec, length, forwarded };

                if last && forwarded < length {
                    return Err(EnvelopeError::ShortPayload { declared: length, received: forwarded });
                }
                if take == 0 && !last {
                    return Ok(None);
                }

                let meta = EnvelopeMeta { codec, length, upstream_tag: self.upstream_tag };
                self.counters.add_output(take);
                if last {
                    trace!(codec, length, "envelope complete");
                    self.counters.message_ok();
                    self.state = EnvelopeState::Done;
                    self.in_message = false;
                }

                Ok(Some(PayloadChunk { data: rest.slice(..take), meta, last }))
            }
            EnvelopeState::Draining => {
                if last {
                    self.reset();
                }
                Ok(None)
            }
            EnvelopeState::Done => Ok(None),
        }
    }
}

/// Decode a complete in-memory envelope.
///
/// Convenience over [`EnvelopeDecoder`] for callers that already hold the
/// whole message.
pub fn decode_envelope(
    message: &[u8],
    config: &DecoderConfig,
) -> Result<(EnvelopeMeta, Bytes), EnvelopeError> {
    let mut decoder = EnvelopeDecoder::new(config);
    let chunk = InputChunk::last(Bytes::copy_from_slice(message));
    match decoder.push(&chunk)? {
        Some(out) => Ok((out.meta, out.data)),
        // end-of-message always yields a chunk on success
        None => Err(EnvelopeError::TruncatedHeader { field: HeaderField::Codec }),
    }
}
