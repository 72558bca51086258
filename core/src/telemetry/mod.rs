//! telemetry/mod.rs
//! Deterministic counters collected while decoding and padding.
//!
//! Each state machine owns its own counters; pipelines merge them at the end
//! instead of sharing atomics between workers.

pub mod counters;

pub use counters::*;
