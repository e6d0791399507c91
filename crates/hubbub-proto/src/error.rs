//! Protocol error type.

use thiserror::Error;

/// Errors raised while framing lines on the wire.
///
/// Malformed bot addressing is deliberately NOT an error: the decoder in
/// [`crate::line`] absorbs it and yields empty fields instead, so a bad
/// line never takes a session down.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Underlying transport I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A line exceeded the codec's length limit.
    #[error("line exceeds {limit} bytes (got {actual})")]
    LineTooLong {
        /// Observed length in bytes, including the terminator.
        actual: usize,
        /// Configured limit in bytes.
        limit: usize,
    },

    /// A line was not valid UTF-8.
    #[error("line is not valid UTF-8")]
    InvalidUtf8,
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ProtocolError>;
