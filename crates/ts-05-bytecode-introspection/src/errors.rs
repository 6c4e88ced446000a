//! # Error Types

use thiserror::Error;
use ts_02_cell_codec::CellError;

/// Errors produced while introspecting contract code and data.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IntrospectionError {
    /// The code hash does not belong to a known wallet.
    #[error("unknown wallet layout for code hash {code_hash}")]
    UnknownWalletLayout {
        /// Hex code hash.
        code_hash: String,
    },

    /// The data cell is too short for the wallet's layout.
    #[error(transparent)]
    Cell(#[from] CellError),
}
