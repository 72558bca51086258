use bytes::Bytes;

bitflags::bitflags! {
    /// Per-chunk control bits delivered alongside input bytes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ChunkFlags: u8 {
        /// Last chunk of the current message.
        const END_OF_MESSAGE = 0b0000_0001;

        /// Discard everything accumulated for the current message.
        const ABORT = 0b0000_0010;
    }
}

/// One slice of an input message.
///
/// Chunk boundaries carry no meaning; only byte order, the end-of-message
/// flag and the first chunk's tag do.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InputChunk {
    pub data: Bytes,
    pub flags: ChunkFlags,
    /// Upstream sideband value, honoured on the first chunk of a message.
    pub tag: Option<u128>,
}

impl InputChunk {
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self { data: data.into(), flags: ChunkFlags::empty(), tag: None }
    }

    /// Final chunk of a message.
    pub fn last(data: impl Into<Bytes>) -> Self {
        Self { data: data.into(), flags: ChunkFlags::END_OF_MESSAGE, tag: None }
    }

    /// Zero-length chunk that only aborts the message in flight.
    pub fn abort() -> Self {
        Self { data: Bytes::new(), flags: ChunkFlags::ABORT, tag: None }
    }

    pub fn with_tag(mut self, tag: u128) -> Self {
        self.tag = Some(tag);
        self
    }

    #[inline]
    pub fn is_last(&self) -> bool {
        self.flags.contains(ChunkFlags::END_OF_MESSAGE)
    }

    #[inline]
    pub fn is_abort(&self) -> bool {
        self.flags.contains(ChunkFlags::ABORT)
    }

    /// Split `message` into `chunk_size` pieces, the final one flagged.
    ///
    /// An empty message still yields one (empty) end-of-message chunk.
    pub fn split_message(message: &[u8], chunk_size: usize) -> Vec<InputChunk> {
        let message = Bytes::copy_from_slice(message);
        if message.is_empty() || chunk_size == 0 {
            return vec![InputChunk::last(message)];
        }

        let count = message.len().div_ceil(chunk_size);
        (0..count)
            .map(|i| {
                let start = i * chunk_size;
                let end = (start + chunk_size).min(message.len());
                let data = message.slice(start..end);
                if i + 1 == count {
                    InputChunk::last(data)
                } else {
                    InputChunk::new(data)
                }
            })
            .collect()
    }
}
