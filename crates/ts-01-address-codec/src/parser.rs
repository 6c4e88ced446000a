//! # Address Parser
//!
//! Accepted inputs:
//!
//! | Shape | Example | Result |
//! |-------|---------|--------|
//! | raw | `0:f636...4e1b` | parsed, bounceable |
//! | friendly (std/url base64) | `EQD2...G21n` | parsed, flags from tag |
//! | domain | `wallet.ton` | [`AddressError::RequiresResolution`] |
//!
//! Anything else is rejected whole.

use crate::account_id::AccountId;
use crate::errors::AddressError;
use crate::friendly::{self, FRIENDLY_LEN};
use serde::{Deserialize, Serialize};

/// Shape of the string a caller supplied, kept verbatim for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressForm {
    /// `workchain:hex`.
    RawForm,
    /// A domain name resolved elsewhere.
    Dns,
    /// Friendly form with the bounce flag set.
    FriendlyBounceable,
    /// Friendly form without the bounce flag.
    FriendlyNonBounceable,
}

impl AddressForm {
    /// Classifies the original input by shape. `bounceable` is only consulted
    /// for friendly input.
    #[must_use]
    pub fn classify(text: &str, bounceable: bool) -> Self {
        if text.contains(':') {
            Self::RawForm
        } else if text.contains('.') {
            Self::Dns
        } else if bounceable {
            Self::FriendlyBounceable
        } else {
            Self::FriendlyNonBounceable
        }
    }

    /// Wire name of the form.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::RawForm => "raw_form",
            Self::Dns => "dns",
            Self::FriendlyBounceable => "friendly_bounceable",
            Self::FriendlyNonBounceable => "friendly_non_bounceable",
        }
    }
}

/// An address together with what its text said about it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedAddress {
    /// Canonical identifier.
    pub id: AccountId,
    /// Bounce flag (raw input is treated as bounceable).
    pub bounceable: bool,
    /// Testnet-only flag from the friendly tag.
    pub testnet_only: bool,
    /// Shape of the input text.
    pub form: AddressForm,
}

/// Returns true when `text` can only be a domain name.
#[must_use]
pub fn is_domain_shaped(text: &str) -> bool {
    !text.contains(':') && text.contains('.')
}

/// Parses any supported address text into a [`ParsedAddress`].
///
/// # Errors
///
/// Returns an [`AddressError`] for malformed input and
/// [`AddressError::RequiresResolution`] for domain names.
pub fn parse(text: &str) -> Result<ParsedAddress, AddressError> {
    if text.is_empty() {
        return Err(AddressError::Empty);
    }
    if text.contains(':') {
        let id = parse_raw(text)?;
        return Ok(ParsedAddress {
            id,
            bounceable: true,
            testnet_only: false,
            form: AddressForm::RawForm,
        });
    }
    if is_domain_shaped(text) {
        return Err(AddressError::RequiresResolution(text.to_string()));
    }
    if text.len() != FRIENDLY_LEN {
        return Err(AddressError::InvalidLength(text.len()));
    }
    let (id, flags) = friendly::decode(text)?;
    Ok(ParsedAddress {
        id,
        bounceable: flags.bounceable,
        testnet_only: flags.testnet_only,
        form: AddressForm::classify(text, flags.bounceable),
    })
}

fn parse_raw(text: &str) -> Result<AccountId, AddressError> {
    let (workchain, account) = text
        .split_once(':')
        .ok_or_else(|| AddressError::InvalidHash(text.to_string()))?;
    let workchain: i8 = workchain
        .parse()
        .map_err(|_| AddressError::InvalidWorkchain(workchain.to_string()))?;
    if account.len() != 64 {
        return Err(AddressError::InvalidHash(account.to_string()));
    }
    let mut hash = [0u8; 32];
    hex::decode_to_slice(account, &mut hash)
        .map_err(|_| AddressError::InvalidHash(account.to_string()))?;
    Ok(AccountId::new(workchain, hash))
}
