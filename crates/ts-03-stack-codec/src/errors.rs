//! # Error Types

use thiserror::Error;
use ts_02_cell_codec::CellError;

/// Errors produced while converting stack values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StackError {
    /// A textual argument matched none of the accepted forms.
    #[error("can't parse arg '{token}'")]
    UnparsableArgument {
        /// The offending token, verbatim.
        token: String,
    },

    /// A value kind that has no representation here (continuations).
    #[error("unsupported stack value: {0}")]
    UnsupportedValue(String),

    /// Integer outside the signed 257-bit range.
    #[error("integer out of int257 range")]
    IntegerOutOfRange,

    /// Underlying cell failure.
    #[error(transparent)]
    Cell(#[from] CellError),
}
