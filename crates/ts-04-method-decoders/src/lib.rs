//! # TS-04 Method Decoders - Typed Get-Method Results
//!
//! **Subsystem ID:** 4
//!
//! ## Purpose
//!
//! Turns the raw result stack of a well-known get method into a typed JSON
//! value. Each method owns an ordered list of pure decoders:
//!
//! ```text
//!   "get_wallet_data", [num, slice, slice, cell]
//!           │
//!           ▼
//!   GetWalletDataResult ── NotApplicable ──► GetWalletDataLegacyResult
//!           │ Decoded
//!           ▼
//!   {"balance": "...", "owner": "0:...", ...}
//! ```
//!
//! ## Decoding Rules
//!
//! | Rule | Behaviour |
//! |------|-----------|
//! | Order | Decoders are tried in registration order |
//! | Winner | The first `Decoded` outcome is returned |
//! | Partial | Trailing stack entries are ignored |
//! | Failure | A decoder error is logged and the next decoder runs |
//! | Keys | Output keys are snake case |
//!
//! ## Usage Example
//!
//! ```
//! use std::sync::Arc;
//! use ts_03_stack_codec::StackEntry;
//! use ts_04_method_decoders::DecoderRegistry;
//!
//! let registry = Arc::new(DecoderRegistry::default());
//! let decoded = registry.decode("seqno", &[StackEntry::int(4)]).unwrap();
//! assert_eq!(decoded.value, serde_json::json!({"state": 4}));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// =============================================================================
// MODULES
// =============================================================================

pub mod decoders;
pub mod errors;
pub mod method_id;
pub mod normalize;
pub mod registry;
pub mod results;

// =============================================================================
// RE-EXPORTS
// =============================================================================

pub use errors::DecodeError;
pub use method_id::method_id;
pub use normalize::{camel_to_snake, normalize_keys};
pub use registry::{
    DecodeOutcome, DecodedValue, DecoderFn, DecoderRegistry, MethodDecoders, NamedDecoder,
};
