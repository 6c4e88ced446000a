//! # TS-05 Bytecode Introspection - What Contract Code Exposes
//!
//! **Subsystem ID:** 5
//!
//! ## Purpose
//!
//! Reads facts out of contract code and data without executing anything:
//!
//! | Question | Function | Source |
//! |----------|----------|--------|
//! | Which get methods exist? | [`scan_dispatch`], [`extract_method_ids`] | dispatch dictionary in the code cell |
//! | What are they called? | [`known_method_name`] | [`KNOWN_METHODS`] catalog |
//! | Which wallet is this? | [`WalletRegistry::detect_wallet_version`] | code hash |
//! | Who owns it? | [`WalletRegistry::extract_public_key`] | version-specific data layout |
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement |
//! |-----------|-------------|
//! | Unknown wallets never get a guessed layout | `UnknownWalletLayout` |
//! | "No dispatch table" differs from "empty table" | [`DispatchTable`] |
//! | Tables are immutable after construction | registries are shared by `Arc` |
//!
//! ## Usage Example
//!
//! ```
//! use std::sync::Arc;
//! use ts_02_cell_codec::Cell;
//! use ts_05_bytecode_introspection::{scan_dispatch, DispatchTable, WalletRegistry};
//!
//! let code = Arc::new(Cell::empty());
//! assert_eq!(scan_dispatch(&code).unwrap(), DispatchTable::Unrecognized);
//!
//! let wallets = Arc::new(WalletRegistry::default());
//! assert!(wallets.detect_wallet_version(code.hash()).is_none());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// =============================================================================
// MODULES
// =============================================================================

pub mod catalog;
pub mod dispatch;
pub mod errors;
pub mod wallet;

// =============================================================================
// RE-EXPORTS
// =============================================================================

pub use catalog::{known_method_name, KNOWN_METHODS};
pub use dispatch::{extract_method_ids, scan_dispatch, DispatchTable, MAX_METHODS};
pub use errors::IntrospectionError;
pub use wallet::{WalletRegistry, WalletVersion};
