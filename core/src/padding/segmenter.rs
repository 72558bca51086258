use bytes::{Bytes, BytesMut};
use tracing::{debug, trace, warn};

use crate::padding::plan::PaddingPlan;
use crate::padding::types::{PaddedBlock, PaddingError, PaddingParams};
use crate::stream::types::InputChunk;
use crate::telemetry::StreamCounters;

/// Streaming message segmenter.
///
/// Full data blocks are released as soon as they fill; they are never the
/// last block because padding always follows. The padding decision is taken
/// in [`Segmenter::finish`], once the message length is known.
#[derive(Debug)]
pub struct Segmenter {
    params: PaddingParams,
    buf: BytesMut,
    message_len: u64,
    next_index: u64,
    /// A chunk of the current message has been accepted.
    in_message: bool,
    /// A chunk of the current message failed; drop input until end-of-message.
    draining: bool,
    counters: StreamCounters,
}

impl Segmenter {
    pub fn new(params: PaddingParams) -> Result<Self, PaddingError> {
        params.validate()?;
        Ok(Self {
            params,
            buf: BytesMut::with_capacity(params.block_width),
            message_len: 0,
            next_index: 0,
            in_message: false,
            draining: false,
            counters: StreamCounters::default(),
        })
    }

    #[inline]
    pub fn params(&self) -> PaddingParams {
        self.params
    }

    /// Message bytes accepted so far.
    #[inline]
    pub fn message_len(&self) -> u64 {
        self.message_len
    }

    pub fn counters(&self) -> &StreamCounters {
        &self.counters
    }

    /// Discard the message in flight.
    pub fn abort(&mut self) {
        self.draining = false;
        if self.in_message {
            debug!(message_len = self.message_len, "segmenter aborted, discarding message state");
            self.counters.message_failed();
        }
        self.reset();
    }

    fn reset(&mut self) {
        self.buf.clear();
        self.message_len = 0;
        self.next_index = 0;
        self.in_message = false;
    }

    /// Accept message bytes and return every block that filled up.
    ///
    /// Fails with `LengthOverflow` as soon as the running length can no longer
    /// be expressed in the length field; the message is discarded.
    pub fn push(&mut self, mut data: &[u8]) -> Result<Vec<PaddedBlock>, PaddingError> {
        let new_len = self.message_len.saturating_add(data.len() as u64);
        if new_len > self.params.max_message_len() {
            let e = PaddingError::LengthOverflow {
                message_len: new_len,
                field_width: self.params.length_field_width,
            };
            warn!(error = %e, "message rejected");
            self.counters.message_failed();
            self.reset();
            return Err(e);
        }
        self.message_len = new_len;
        self.in_message = true;
        self.counters.add_input(data.len());

        let width = self.params.block_width;
        let mut blocks = Vec::with_capacity((self.buf.len() + data.len()) / width);
        while !data.is_empty() {
            let take = (width - self.buf.len()).min(data.len());
            self.buf.extend_from_slice(&data[..take]);
            data = &data[take..];

            if self.buf.len() == width {
                let bytes = self.buf.split().freeze();
                blocks.push(self.emit(bytes, false));
            }
        }
        Ok(blocks)
    }

    /// Close the message: pad, emit the final block(s) and reset.
    pub fn finish(&mut self) -> Result<Vec<PaddedBlock>, PaddingError> {
        let plan = match PaddingPlan::new(self.message_len, self.params) {
            Ok(plan) => plan,
            Err(e) => {
                self.counters.message_failed();
                self.reset();
                return Err(e);
            }
        };
        debug_assert_eq!(plan.remaining, self.buf.len());

        let width = self.params.block_width;
        let mut tail = Vec::with_capacity(2 * width);
        tail.extend_from_slice(&self.buf);
        plan.write_padding(&mut tail);
        debug_assert_eq!(tail.len() % width, 0);

        let tail = Bytes::from(tail);
        let tail_blocks = tail.len() / width;
        let mut blocks = Vec::with_capacity(tail_blocks);
        for i in 0..tail_blocks {
            let bytes = tail.slice(i * width..(i + 1) * width);
            blocks.push(self.emit(bytes, i + 1 == tail_blocks));
        }

        debug!(
            message_len = plan.message_len,
            blocks = plan.total_blocks,
            extra_block = plan.extra_block_needed,
            "message padded"
        );
        self.counters.add_padding(plan.padding_len(), plan.extra_block_needed);
        self.counters.message_ok();
        self.reset();
        Ok(blocks)
    }

    /// Feed one input chunk, honouring its abort and end-of-message flags.
    ///
    /// After an error the remaining chunks of the same message are dropped,
    /// so they are not mistaken for the start of a new one.
    pub fn push_chunk(&mut self, chunk: &InputChunk) -> Result<Vec<PaddedBlock>, PaddingError> {
        if chunk.is_abort() {
            self.abort();
            return Ok(Vec::new());
        }
        if self.draining {
            trace!(len = chunk.data.len(), "dropping chunk of failed message");
            self.draining = !chunk.is_last();
            return Ok(Vec::new());
        }

        let mut blocks = match self.push(&chunk.data) {
            Ok(blocks) => blocks,
            Err(e) => {
                self.draining = !chunk.is_last();
                return Err(e);
            }
        };
        if chunk.is_last() {
            blocks.extend(self.finish()?);
        }
        Ok(blocks)
    }

    fn emit(&mut self, bytes: Bytes, is_last: bool) -> PaddedBlock {
        let block = PaddedBlock { index: self.next_index, bytes, is_last };
        trace!(index = block.index, last = is_last, "block emitted");
        self.next_index += 1;
        self.counters.add_block(self.params.block_width);
        block
    }
}

/// Pad a complete in-memory message.
pub fn pad_message(message: &[u8], params: PaddingParams) -> Result<Vec<PaddedBlock>, PaddingError> {
    let mut segmenter = Segmenter::new(params)?;
    let mut blocks = segmenter.push(message)?;
    blocks.extend(segmenter.finish()?);
    Ok(blocks)
}
