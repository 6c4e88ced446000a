//! # Stack Entry
//!
//! One typed value on the VM stack. Integers are signed 257-bit; cells are
//! shared; slices keep their window into the cell they came from.

use num_bigint::BigInt;
use num_traits::{One, ToPrimitive};
use std::sync::Arc;
use ts_01_address_codec::AccountId;
use ts_02_cell_codec::{Cell, CellError, CellSlice, MsgAddress};

/// Width of a VM integer.
pub const INT_BITS: usize = 257;

/// A VM stack value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StackEntry {
    /// Signed 257-bit integer.
    Int(BigInt),
    /// The VM's NaN integer.
    Nan,
    /// Null.
    Null,
    /// A cell.
    Cell(Arc<Cell>),
    /// A window over a cell.
    Slice(CellSlice),
    /// A builder, carried as the cell it would produce.
    Builder(Arc<Cell>),
    /// A tuple of values.
    Tuple(Vec<StackEntry>),
}

impl StackEntry {
    /// Creates an integer entry.
    #[must_use]
    pub fn int(value: impl Into<BigInt>) -> Self {
        Self::Int(value.into())
    }

    /// Short type name used in diagnostics and records.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Int(_) => "num",
            Self::Nan => "nan",
            Self::Null => "null",
            Self::Cell(_) => "cell",
            Self::Slice(_) => "slice",
            Self::Builder(_) => "builder",
            Self::Tuple(_) => "tuple",
        }
    }

    /// The integer value, if this is an integer.
    #[must_use]
    pub fn as_int(&self) -> Option<&BigInt> {
        match self {
            Self::Int(v) => Some(v),
            _ => None,
        }
    }

    /// The integer value when it fits in `i64`.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        self.as_int().and_then(ToPrimitive::to_i64)
    }

    /// A fresh read cursor for cell and slice entries.
    #[must_use]
    pub fn as_slice(&self) -> Option<CellSlice> {
        match self {
            Self::Cell(c) => Some(CellSlice::new(c.clone())),
            Self::Slice(s) => Some(s.clone()),
            _ => None,
        }
    }

    /// The cell behind cell, slice and builder entries.
    #[must_use]
    pub fn as_cell(&self) -> Option<&Arc<Cell>> {
        match self {
            Self::Cell(c) | Self::Builder(c) => Some(c),
            Self::Slice(s) => Some(s.cell()),
            _ => None,
        }
    }

    /// Tuple elements, if this is a tuple.
    #[must_use]
    pub fn as_tuple(&self) -> Option<&[StackEntry]> {
        match self {
            Self::Tuple(items) => Some(items),
            _ => None,
        }
    }

    /// Reads a message address from a cell or slice entry.
    ///
    /// # Errors
    ///
    /// Returns [`CellError::UnexpectedTag`] for non-address data or other entry
    /// kinds.
    pub fn load_address(&self) -> Result<MsgAddress, CellError> {
        let mut slice = self
            .as_slice()
            .ok_or_else(|| CellError::UnexpectedTag(format!("{} is not a slice", self.type_name())))?;
        slice.load_address()
    }

    /// A slice holding one `addr_std`, the way addresses are passed to get methods.
    ///
    /// # Errors
    ///
    /// Propagates cell construction errors.
    pub fn address(id: &AccountId) -> Result<Self, CellError> {
        let cell = ts_02_cell_codec::address_cell(id)?;
        Ok(Self::Slice(CellSlice::new(Arc::new(cell))))
    }
}

/// True when `value` fits a signed 257-bit integer.
#[must_use]
pub fn fits_int257(value: &BigInt) -> bool {
    let bound = BigInt::one() << (INT_BITS - 1);
    value < &bound && value >= &-bound
}
