//! # Account Identifier
//!
//! The canonical `(workchain, hash)` pair every address string resolves to.
//! Two strings name the same account iff they canonicalize to equal values.

use crate::errors::AddressError;
use crate::friendly::{self, FriendlyFlags};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Workchain of the masterchain.
pub const MASTERCHAIN: i8 = -1;

/// Default workchain for user accounts.
pub const BASECHAIN: i8 = 0;

// =============================================================================
// ACCOUNT ID
// =============================================================================

/// A standard (`addr_std`) account address: signed 8-bit workchain plus the
/// 256-bit account hash.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AccountId {
    /// Workchain the account lives in.
    pub workchain: i8,
    /// Hash of the account's initial state.
    pub hash: [u8; 32],
}

impl AccountId {
    /// Creates an identifier from its parts.
    #[must_use]
    pub const fn new(workchain: i8, hash: [u8; 32]) -> Self {
        Self { workchain, hash }
    }

    /// Renders the raw form: `workchain:hex` with lowercase hex.
    #[must_use]
    pub fn to_raw(&self) -> String {
        format!("{}:{}", self.workchain, hex::encode(self.hash))
    }

    /// Renders the 48-character user-friendly form.
    #[must_use]
    pub fn to_friendly(&self, flags: FriendlyFlags, url_safe: bool) -> String {
        friendly::encode(self, flags, url_safe)
    }

    /// Renders every canonical form used by the presentation layer.
    #[must_use]
    pub fn render(&self) -> AddressRenderings {
        let bounceable = FriendlyFlags::bounceable();
        let non_bounceable = FriendlyFlags::non_bounceable();
        AddressRenderings {
            raw_form: self.to_raw(),
            bounceable: FriendlyPair {
                b64: self.to_friendly(bounceable, false),
                b64url: self.to_friendly(bounceable, true),
            },
            non_bounceable: FriendlyPair {
                b64: self.to_friendly(non_bounceable, false),
                b64url: self.to_friendly(non_bounceable, true),
            },
        }
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_raw())
    }
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountId({})", self.to_raw())
    }
}

impl FromStr for AccountId {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::parser::parse(s).map(|parsed| parsed.id)
    }
}

impl Serialize for AccountId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_raw())
    }
}

impl<'de> Deserialize<'de> for AccountId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// RENDERINGS
// =============================================================================

/// Standard and URL-safe base64 spellings of one friendly address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FriendlyPair {
    /// Standard alphabet (`+`, `/`).
    pub b64: String,
    /// URL-safe alphabet (`-`, `_`).
    pub b64url: String,
}

/// All canonical textual forms of an [`AccountId`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressRenderings {
    /// `workchain:hex`.
    pub raw_form: String,
    /// Bounceable friendly forms.
    pub bounceable: FriendlyPair,
    /// Non-bounceable friendly forms.
    pub non_bounceable: FriendlyPair,
}
