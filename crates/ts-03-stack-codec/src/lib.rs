//! # TS-03 Stack Codec - VM Stack Values
//!
//! **Subsystem ID:** 3
//!
//! ## Purpose
//!
//! Moves get-method arguments and results between three shapes:
//!
//! ```text
//!   "0x1f", "EQD2...", "b5ee9c72..."     text arguments    (argument.rs)
//!               │
//!               ▼
//!          StackEntry                   typed values       (entry.rs)
//!          │        │
//!          ▼        ▼
//!  TvmStackRecord   VmStack cell        JSON / executor    (record.rs, vm_stack.rs)
//! ```
//!
//! ## Usage Example
//!
//! ```
//! use ts_03_stack_codec::{parse_arguments, render_stack, TvmStackRecord};
//!
//! let stack = parse_arguments(&["-0x10", "Null"]).unwrap();
//! let records = render_stack(&stack).unwrap();
//! assert_eq!(records[0], TvmStackRecord::Num { num: "-16".into() });
//! assert_eq!(records[1], TvmStackRecord::Null);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_possible_truncation)]

// =============================================================================
// MODULES
// =============================================================================

pub mod argument;
pub mod entry;
pub mod errors;
pub mod record;
pub mod vm_stack;

// =============================================================================
// RE-EXPORTS
// =============================================================================

pub use argument::{parse_argument, parse_arguments};
pub use entry::{fits_int257, StackEntry, INT_BITS};
pub use errors::StackError;
pub use record::{render, render_stack, TvmStackRecord};
pub use vm_stack::{decode_stack, encode_stack};
