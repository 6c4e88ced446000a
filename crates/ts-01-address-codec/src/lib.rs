//! # TS-01 Address Codec - Account Address Forms
//!
//! **Subsystem ID:** 1
//!
//! ## Purpose
//!
//! Parses and renders account addresses. Every accepted textual form maps to
//! one canonical [`AccountId`]; every [`AccountId`] renders to five strings.
//!
//! ## Forms
//!
//! | Form | Layout | Example prefix |
//! |------|--------|----------------|
//! | Raw | `workchain:hex64` | `0:f636` |
//! | Friendly bounceable | base64(`0x11` wc hash crc16) | `EQ` |
//! | Friendly non-bounceable | base64(`0x51` wc hash crc16) | `UQ` |
//! | Testnet variants | tag with `0x80` set | `kQ` / `0Q` |
//!
//! Domain names (anything with a `.` and no `:`) are recognized but not
//! decoded here; see [`AddressError::RequiresResolution`].
//!
//! ## Usage Example
//!
//! ```
//! use ts_01_address_codec::{parse, AddressForm};
//!
//! let parsed = parse("EQD2NmD_lH5f5u1Kj3KfGyTvhZSX0Eg6qp2a5IQUKXxOG21n").unwrap();
//! assert_eq!(parsed.form, AddressForm::FriendlyBounceable);
//! assert_eq!(
//!     parsed.id.to_raw(),
//!     "0:f63660ff947e5fe6ed4a8f729f1b24ef859497d0483aaa9d9ae48414297c4e1b"
//! );
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// =============================================================================
// MODULES
// =============================================================================

pub mod account_id;
pub mod errors;
pub mod friendly;
pub mod parser;

// =============================================================================
// RE-EXPORTS
// =============================================================================

pub use account_id::{AccountId, AddressRenderings, FriendlyPair, BASECHAIN, MASTERCHAIN};
pub use errors::AddressError;
pub use friendly::{crc16, FriendlyFlags, FRIENDLY_LEN};
pub use parser::{is_domain_shaped, parse, AddressForm, ParsedAddress};
