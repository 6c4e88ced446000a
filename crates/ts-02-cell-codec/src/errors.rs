//! # Error Types
//!
//! Cell construction, slice reads and bag-of-cells decoding failures.
//! Everything except [`CellError::UnexpectedCellCount`] is a malformed-data
//! condition.

use thiserror::Error;

/// Errors produced by the cell codec.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CellError {
    /// More than 1023 data bits.
    #[error("cell data overflow: {0} bits")]
    DataOverflow(usize),

    /// More than 4 references.
    #[error("cell reference overflow: {0} refs")]
    RefOverflow(usize),

    /// Exotic cell with an unknown or inconsistent layout.
    #[error("invalid exotic cell: {0}")]
    InvalidExotic(String),

    /// Read past the end of the slice data.
    #[error("not enough bits: need {needed}, have {available}")]
    NotEnoughBits {
        /// Bits requested.
        needed: usize,
        /// Bits left.
        available: usize,
    },

    /// Read past the last reference of the slice.
    #[error("no more references in slice")]
    NotEnoughRefs,

    /// Integer does not fit the requested width.
    #[error("integer does not fit in {0} bits")]
    IntegerOverflow(usize),

    /// Bit pattern does not match the expected TL-B constructor.
    #[error("unexpected tag: {0}")]
    UnexpectedTag(String),

    /// Input does not start with a known bag-of-cells magic.
    #[error("unknown boc magic: {0:08x}")]
    BadMagic(u32),

    /// Input ended before the declared structure.
    #[error("boc truncated: {0}")]
    Truncated(&'static str),

    /// Bytes remain after the declared structure.
    #[error("boc has {0} trailing bytes")]
    TrailingBytes(usize),

    /// CRC32C trailer does not match.
    #[error("boc checksum mismatch: expected {expected:08x}, got {actual:08x}")]
    ChecksumMismatch {
        /// Checksum computed over the body.
        expected: u32,
        /// Checksum carried by the trailer.
        actual: u32,
    },

    /// Structural header or cell descriptor problem.
    #[error("malformed boc: {0}")]
    Malformed(String),

    /// A reference index points to the same or an earlier cell.
    #[error("cell {from} references cell {to}: references must point forward")]
    BackwardReference {
        /// Referencing cell index.
        from: usize,
        /// Referenced cell index.
        to: usize,
    },

    /// A root or reference index is out of range.
    #[error("cell index {index} out of range ({count} cells)")]
    IndexOutOfRange {
        /// Offending index.
        index: usize,
        /// Number of cells in the bag.
        count: usize,
    },

    /// The caller expected exactly one root.
    #[error("expected exactly one root cell, got {0}")]
    UnexpectedCellCount(usize),
}

impl CellError {
    /// Returns true when the input data itself was malformed.
    #[must_use]
    pub fn is_malformed(&self) -> bool {
        !matches!(self, Self::UnexpectedCellCount(_))
    }
}
