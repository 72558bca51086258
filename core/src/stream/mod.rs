//! stream: adapters between the per-message state machines and the outside.
//!
//! - `types`: input chunks and their control flags
//! - `io`: `Read` chunkers, `Write` block sinks, ordered multi-message writer
//! - `pipeline`: worker threads behind bounded channels (backpressure)

pub mod types;
pub mod io;
pub mod pipeline;

pub use types::{
    ChunkFlags,
    InputChunk,
};
pub use io::{
    decode_envelope_from_reader,
    pad_reader_to_writer,
    read_message_chunks,
    MessageChunks,
    OrderedBlockWriter,
};
pub use pipeline::{
    pad_messages_parallel,
    spawn_envelope_decoder,
    spawn_segmenter,
    BatchReport,
    DecoderEvent,
    SegmenterEvent,
    StageWorker,
};
