//! # Error Types

use thiserror::Error;
use ts_02_cell_codec::CellError;

/// Errors produced while decoding a result stack.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// No registered decoder accepted the stack.
    #[error("no decoder for method '{0}'")]
    NoDecoder(String),

    /// The stack matched a decoder's shape but an entry was out of range.
    #[error("entry {index}: {reason}")]
    InvalidEntry {
        /// Position in the result stack.
        index: usize,
        /// What was wrong.
        reason: String,
    },

    /// Cell data inside an entry could not be read.
    #[error(transparent)]
    Cell(#[from] CellError),

    /// The decoded value could not be turned into JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for DecodeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
