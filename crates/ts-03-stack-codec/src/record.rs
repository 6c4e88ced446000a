//! # Stack Records
//!
//! JSON-safe rendering of stack entries:
//!
//! ```text
//! {"type":"num","num":"-12"}
//! {"type":"cell","cell":"b5ee9c72..."}
//! {"type":"slice","slice":"b5ee9c72..."}
//! {"type":"tuple","tuple":[...]}
//! {"type":"null"}
//! {"type":"nan"}
//! ```
//!
//! Integers are decimal strings so 257-bit values survive JSON consumers.
//! Cells and slices are hex bags of cells; a slice renders only its unread
//! window.

use crate::entry::StackEntry;
use crate::errors::StackError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use ts_02_cell_codec::boc;

/// Rendered stack entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TvmStackRecord {
    /// Integer as a decimal string.
    Num {
        /// Decimal digits with optional leading `-`.
        num: String,
    },
    /// Cell as a hex bag of cells.
    Cell {
        /// Hex bag of cells.
        cell: String,
    },
    /// Slice window as a hex bag of cells.
    Slice {
        /// Hex bag of cells.
        slice: String,
    },
    /// Builder contents as a hex bag of cells.
    Builder {
        /// Hex bag of cells.
        builder: String,
    },
    /// Nested values.
    Tuple {
        /// Elements in order.
        tuple: Vec<TvmStackRecord>,
    },
    /// Null.
    Null,
    /// NaN.
    Nan,
}

/// Renders one entry.
///
/// # Errors
///
/// Returns [`StackError::Cell`] only when a cell tree cannot be serialized.
pub fn render(entry: &StackEntry) -> Result<TvmStackRecord, StackError> {
    Ok(match entry {
        StackEntry::Int(v) => TvmStackRecord::Num { num: v.to_string() },
        StackEntry::Nan => TvmStackRecord::Nan,
        StackEntry::Null => TvmStackRecord::Null,
        StackEntry::Cell(c) => TvmStackRecord::Cell {
            cell: boc::to_hex(c)?,
        },
        StackEntry::Slice(s) => TvmStackRecord::Slice {
            slice: boc::to_hex(&Arc::new(s.to_cell()?))?,
        },
        StackEntry::Builder(c) => TvmStackRecord::Builder {
            builder: boc::to_hex(c)?,
        },
        StackEntry::Tuple(items) => TvmStackRecord::Tuple {
            tuple: render_stack(items)?,
        },
    })
}

/// Renders entries in order.
///
/// # Errors
///
/// See [`render`].
pub fn render_stack(entries: &[StackEntry]) -> Result<Vec<TvmStackRecord>, StackError> {
    entries.iter().map(render).collect()
}
