//! # TS-02 Cell Codec - Cells and Bags of Cells
//!
//! **Subsystem ID:** 2
//!
//! ## Purpose
//!
//! Contract code, contract data and VM values travel as trees of cells. This
//! crate builds, reads, hashes and (de)serializes them.
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement Location |
//! |-----------|---------------------|
//! | At most 1023 bits and 4 references per cell | `cell.rs` - `Cell::with_kind()` |
//! | Identical content yields an identical hash | `cell.rs` - `Cell::compute_hash()` |
//! | References point forward only (no cycles) | `boc.rs` - `read_raw_cell()` |
//! | Byte-exact round trip in canonical layout | `boc.rs` - `serialize()` ordering |
//!
//! ## Components
//!
//! | Component | Location | Purpose |
//! |-----------|----------|---------|
//! | Cell | `cell.rs` | Immutable cell, hash, depth, level |
//! | Builder | `builder.rs` | Bit/integer/reference writer |
//! | Slice | `slice.rs` | Bit/integer/reference reader |
//! | Bag of cells | `boc.rs` | Binary container, CRC32C |
//! | Addresses | `address.rs` | `addr_none` / `addr_std` |
//! | Dictionaries | `hashmap.rs` | `Hashmap` / `HashmapE` walk and build |
//!
//! ## Usage Example
//!
//! ```
//! use std::sync::Arc;
//! use ts_02_cell_codec::{boc, CellBuilder, CellSlice};
//!
//! let mut builder = CellBuilder::new();
//! builder.store_uint(32, 42).unwrap();
//! let cell = Arc::new(builder.build().unwrap());
//!
//! let bytes = boc::serialize_single(&cell).unwrap();
//! let back = boc::deserialize_single(&bytes).unwrap();
//! assert_eq!(back.hash(), cell.hash());
//! assert_eq!(CellSlice::new(back).load_uint(32).unwrap(), 42);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// =============================================================================
// MODULES
// =============================================================================

pub mod address;
pub mod boc;
pub mod builder;
pub mod cell;
pub mod errors;
pub mod hashmap;
pub mod slice;

// =============================================================================
// RE-EXPORTS
// =============================================================================

pub use address::{address_cell, MsgAddress, STD_ADDRESS_BITS};
pub use boc::{deserialize, deserialize_single, serialize, BocOptions};
pub use builder::CellBuilder;
pub use cell::{Cell, CellKind, MAX_BITS, MAX_REFS};
pub use errors::CellError;
pub use hashmap::{
    hashmap_entries, hashmap_entries_bounded, load_hashmap_e, HashmapEntry, MAX_HASHMAP_ENTRIES,
};
pub use slice::CellSlice;
