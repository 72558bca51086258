use std::io;

use thiserror::Error;

use crate::config::ConfigError;
use crate::multihash::EnvelopeError;
use crate::padding::PaddingError;
use crate::varint::VarintError;

/// Unified stream error covering I/O, configuration and every per-message failure.
/// - `From<T>` impls enable `?` across the adapters and pipelines.
/// - Per-message variants never imply the component itself is unusable.
#[derive(Debug, Error)]
pub enum StreamError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("varint error: {0}")]
    Varint(#[from] VarintError),

    #[error("envelope error: {0}")]
    Envelope(#[from] EnvelopeError),

    #[error("padding error: {0}")]
    Padding(#[from] PaddingError),

    /// A pipeline stage went away (channel closed or worker panicked).
    #[error("pipeline error: {0}")]
    Pipeline(&'static str),
}
