use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VarintError {
    /// No terminating byte within `MAX_VARINT_LEN` bytes, or the value does not fit u64.
    #[error("varint overflow: no terminator within 10 bytes")]
    Overflow,

    /// Buffer ended before the terminating byte.
    #[error("varint incomplete after {consumed} bytes")]
    Incomplete { consumed: usize },
}
