use std::collections::BTreeMap;
use std::io::{self, Read, Write};

use bytes::Bytes;
use tracing::{debug, trace};

use crate::config::PipelineConfig;
use crate::multihash::{EnvelopeDecoder, EnvelopeMeta};
use crate::padding::{PaddedBlock, Segmenter};
use crate::stream::types::InputChunk;
use crate::telemetry::StreamCounters;
use crate::types::StreamError;

// ================= Readers =================

/// Fill up to `len` bytes, stopping early only at EOF.
pub fn read_exact_or_eof<R: Read>(r: &mut R, len: usize) -> Result<Bytes, StreamError> {
    let mut buf = vec![0u8; len];
    let mut off = 0;

    while off < len {
        let n = match r.read(&mut buf[off..]) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        off += n;
    }

    buf.truncate(off);
    Ok(Bytes::from(buf))
}

/// Iterator over the chunks of one message read from `R`.
///
/// The final chunk carries `END_OF_MESSAGE`; an empty reader yields a single
/// empty final chunk. One chunk of lookahead is kept so the flag lands on the
/// last data chunk rather than on a trailing empty one.
pub struct MessageChunks<R: Read> {
    reader: R,
    chunk_size: usize,
    lookahead: Option<Bytes>,
    done: bool,
}

/// Slice everything `reader` yields into one message of `chunk_size` chunks.
pub fn read_message_chunks<R: Read>(reader: R, chunk_size: usize) -> MessageChunks<R> {
    MessageChunks {
        reader,
        chunk_size: chunk_size.max(1),
        lookahead: None,
        done: false,
    }
}

impl<R: Read> MessageChunks<R> {
    fn read_next(&mut self) -> Result<Bytes, StreamError> {
        read_exact_or_eof(&mut self.reader, self.chunk_size)
    }
}

impl<R: Read> Iterator for MessageChunks<R> {
    type Item = Result<InputChunk, StreamError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let current = match self.lookahead.take() {
            Some(buf) => buf,
            None => match self.read_next() {
                Ok(buf) => buf,
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            },
        };

        // A short read is EOF.
        if current.len() < self.chunk_size {
            self.done = true;
            return Some(Ok(InputChunk::last(current)));
        }

        match self.read_next() {
            Ok(next) if next.is_empty() => {
                self.done = true;
                Some(Ok(InputChunk::last(current)))
            }
            Ok(next) => {
                self.lookahead = Some(next);
                Some(Ok(InputChunk::new(current)))
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

// ================= Envelope =================

/// Decode one envelope read from `reader`.
///
/// # Returns
/// The decoded header fields and the payload bytes, in order.
pub fn decode_envelope_from_reader<R: Read>(
    reader: R,
    config: &PipelineConfig,
) -> Result<(EnvelopeMeta, Vec<u8>), StreamError> {
    config.validate()?;
    let mut decoder = EnvelopeDecoder::new(&config.decoder);
    let mut payload = Vec::new();
    let mut meta = None;

    for chunk in read_message_chunks(reader, config.read_chunk_size) {
        let chunk = chunk?;
        if let Some(out) = decoder.push(&chunk)? {
            payload.extend_from_slice(&out.data);
            meta = Some(out.meta);
        }
    }

    match meta {
        Some(meta) => Ok((meta, payload)),
        None => Err(StreamError::Pipeline("reader produced no envelope")),
    }
}

// ================= Padding =================

fn write_blocks<W: Write>(w: &mut W, blocks: &[PaddedBlock]) -> Result<(), StreamError> {
    for block in blocks {
        w.write_all(&block.bytes)?;
    }
    Ok(())
}

/// Pad everything `reader` yields as one message and write the blocks to `writer`.
pub fn pad_reader_to_writer<R: Read, W: Write>(
    reader: R,
    writer: &mut W,
    config: &PipelineConfig,
) -> Result<StreamCounters, StreamError> {
    config.validate()?;
    let mut segmenter = Segmenter::new(config.segmenter.params)?;

    for chunk in read_message_chunks(reader, config.read_chunk_size) {
        let blocks = segmenter.push_chunk(&chunk?)?;
        write_blocks(&mut *writer, &blocks)?;
    }
    writer.flush()?;

    Ok(segmenter.counters().clone())
}

// ================= Ordered writer =================

/// Writes padded messages in message-index order, whatever order they finish in.
pub struct OrderedBlockWriter<'a, W: Write> {
    out: &'a mut W,
    next: u64,
    pending: BTreeMap<u64, Option<Vec<PaddedBlock>>>,
}

impl<'a, W: Write> OrderedBlockWriter<'a, W> {
    pub fn new(out: &'a mut W) -> Self {
        Self {
            out,
            next: 0,
            pending: BTreeMap::new(),
        }
    }

    /// Queue message `index`; `None` marks a failed message that writes nothing.
    pub fn push(&mut self, index: u64, blocks: Option<Vec<PaddedBlock>>) -> Result<(), StreamError> {
        trace!(index, "queuing message");
        self.pending.insert(index, blocks);
        self.flush_ready()
    }

    /// Index of the next message to be written.
    pub fn next_index(&self) -> u64 {
        self.next
    }

    pub fn finish(&mut self) -> Result<(), StreamError> {
        self.flush_ready()?;
        if !self.pending.is_empty() {
            return Err(StreamError::Pipeline("ordered writer has a gap in message indices"));
        }
        self.out.flush()?;
        debug!(messages = self.next, "ordered writer finished");
        Ok(())
    }

    fn flush_ready(&mut self) -> Result<(), StreamError> {
        while let Some(blocks) = self.pending.remove(&self.next) {
            if let Some(blocks) = blocks {
                write_blocks(&mut *self.out, &blocks)?;
            }
            self.next += 1;
        }
        Ok(())
    }
}
