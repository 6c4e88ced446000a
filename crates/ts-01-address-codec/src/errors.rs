//! # Error Types
//!
//! Every way an address string can be rejected. All variants belong to the
//! same "invalid address" class: parsing never yields a partial result.

use thiserror::Error;

/// Errors produced while parsing an address string.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AddressError {
    /// Input was empty.
    #[error("empty address")]
    Empty,

    /// Workchain part of a raw address is not a signed 8-bit integer.
    #[error("invalid workchain '{0}'")]
    InvalidWorkchain(String),

    /// Account part of a raw address is not 64 hex characters.
    #[error("invalid account hash '{0}'")]
    InvalidHash(String),

    /// User-friendly address has the wrong length.
    #[error("user-friendly address must be 48 characters, got {0}")]
    InvalidLength(usize),

    /// User-friendly address is not valid base64 in either alphabet.
    #[error("user-friendly address is not valid base64")]
    InvalidBase64,

    /// Tag byte is neither bounceable nor non-bounceable.
    #[error("unknown address tag: 0x{0:02x}")]
    UnknownTag(u8),

    /// CRC16 checksum does not match the payload.
    #[error("address checksum mismatch: expected 0x{expected:04x}, got 0x{actual:04x}")]
    ChecksumMismatch {
        /// Checksum computed over the payload.
        expected: u16,
        /// Checksum carried by the address.
        actual: u16,
    },

    /// Input is shaped like a domain name; it has to go through a resolver.
    #[error("'{0}' is a domain name and must be resolved first")]
    RequiresResolution(String),
}

impl AddressError {
    /// Returns true when the input was a domain name rather than malformed text.
    #[must_use]
    pub fn is_domain(&self) -> bool {
        matches!(self, Self::RequiresResolution(_))
    }
}
