//! telemetry/counters.rs
//! Mutable counters used by the decoder, the segmenter and their pipelines.
use std::ops::AddAssign;

use serde::{Deserialize, Serialize};

/// Deterministic counters collected during stream processing
#[derive(Default, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamCounters {
    pub messages_ok: u64,
    pub messages_failed: u64,
    pub bytes_in: u64,
    pub bytes_out: u64,
    pub header_bytes: u64,
    pub blocks_emitted: u64,
    pub extra_blocks: u64,
    pub padding_bytes: u64,
}

impl StreamCounters {
    /// Record input bytes accepted by a state machine.
    pub fn add_input(&mut self, len: usize) {
        self.bytes_in += len as u64;
    }

    /// Record envelope header bytes stripped from the stream.
    pub fn add_header(&mut self, header_len: usize) {
        self.header_bytes += header_len as u64;
    }

    /// Record payload bytes forwarded downstream.
    pub fn add_output(&mut self, len: usize) {
        self.bytes_out += len as u64;
    }

    /// Record one emitted block of `block_width` bytes.
    pub fn add_block(&mut self, block_width: usize) {
        self.blocks_emitted += 1;
        self.bytes_out += block_width as u64;
    }

    /// Record the padding tail of a finished message.
    /// - `padding_len`: marker + zero fill + length field
    /// - `extra_block`: whether the tail spilled into an additional block
    pub fn add_padding(&mut self, padding_len: usize, extra_block: bool) {
        self.padding_bytes += padding_len as u64;
        if extra_block {
            self.extra_blocks += 1;
        }
    }

    pub fn message_ok(&mut self) {
        self.messages_ok += 1;
    }

    pub fn message_failed(&mut self) {
        self.messages_failed += 1;
    }

    /// Total messages that reached a boundary, successfully or not.
    pub fn messages_total(&self) -> u64 {
        self.messages_ok + self.messages_failed
    }

    pub fn merge(&mut self, other: &StreamCounters) {
        self.messages_ok += other.messages_ok;
        self.messages_failed += other.messages_failed;
        self.bytes_in += other.bytes_in;
        self.bytes_out += other.bytes_out;
        self.header_bytes += other.header_bytes;
        self.blocks_emitted += other.blocks_emitted;
        self.extra_blocks += other.extra_blocks;
        self.padding_bytes += other.padding_bytes;
    }
}

impl AddAssign for StreamCounters {
    fn add_assign(&mut self, rhs: Self) {
        self.merge(&rhs);
    }
}
