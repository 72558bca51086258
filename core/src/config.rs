//! Runtime configuration for the decoder, the segmenter and the pipelines.
//!
//! Every struct has a usable `Default`, (de)serializes with serde and is
//! validated before use.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{DEFAULT_CHANNEL_CAPACITY, DEFAULT_READ_CHUNK, DEFAULT_WORKERS};
use crate::multihash::OverlongPolicy;
use crate::padding::{PaddingError, PaddingParams};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{field} must be non-zero")]
    Zero { field: &'static str },

    #[error(transparent)]
    Padding(#[from] PaddingError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    pub overlong_policy: OverlongPolicy,
}

impl DecoderConfig {
    pub fn new(overlong_policy: OverlongPolicy) -> Self {
        Self { overlong_policy }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmenterConfig {
    pub params: PaddingParams,
}

impl SegmenterConfig {
    pub fn new(params: PaddingParams) -> Result<Self, ConfigError> {
        let config = Self { params };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.params.validate()?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub decoder: DecoderConfig,
    pub segmenter: SegmenterConfig,
    /// Bytes per chunk when slicing a reader into input chunks.
    pub read_chunk_size: usize,
    /// Depth of every bounded channel; a full channel stalls its producer.
    pub channel_capacity: usize,
    /// Worker threads for multi-message padding.
    pub workers: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            decoder: DecoderConfig::default(),
            segmenter: SegmenterConfig::default(),
            read_chunk_size: DEFAULT_READ_CHUNK,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            workers: DEFAULT_WORKERS,
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.read_chunk_size == 0 {
            return Err(ConfigError::Zero { field: "read_chunk_size" });
        }
        if self.channel_capacity == 0 {
            return Err(ConfigError::Zero { field: "channel_capacity" });
        }
        if self.workers == 0 {
            return Err(ConfigError::Zero { field: "workers" });
        }
        self.decoder.validate()?;
        self.segmenter.validate()?;
        Ok(())
    }

    /// Parse and validate a JSON document; missing fields take defaults.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: PipelineConfig = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
