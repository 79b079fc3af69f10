//! Wire decoding errors.

use thiserror::Error;

/// Result alias for wire operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Errors produced while decoding or encoding wire messages.
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// Frame is not valid JSON, or a payload does not match its event type.
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Envelope is missing a required field.
    #[error("missing field: {0}")]
    MissingField(&'static str),

    /// Frame exceeds [`crate::MAX_FRAME_BYTES`].
    #[error("frame too large: {size} bytes (max {max})")]
    FrameTooLarge {
        /// Size of the rejected frame.
        size: usize,
        /// Maximum accepted size.
        max: usize,
    },
}
