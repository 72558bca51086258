//! Merkle-Damgard message padding.
//!
//! Responsibilities:
//! - Cut a message into fixed-width blocks as bytes arrive
//! - Append `0x80 ‖ zero fill ‖ bit length (big-endian)` at end-of-message
//! - Reject messages whose bit length does not fit the length field
//!
//! Non-responsibilities:
//! - Compression rounds (blocks are handed to a hash core as-is)
//! - IO

pub mod types;
pub mod plan;
pub mod segmenter;

pub use types::{
    PaddedBlock,
    PaddingError,
    PaddingParams,
    ShaFamily,
};
pub use plan::PaddingPlan;
pub use segmenter::{
    pad_message,
    Segmenter,
};
