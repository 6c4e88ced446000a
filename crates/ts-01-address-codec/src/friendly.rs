//! # User-Friendly Encoding
//!
//! 36-byte payload, base64 encoded to 48 characters:
//!
//! ```text
//! [tag:1][workchain:1][hash:32][crc16:2]
//! ```
//!
//! `tag` is `0x11` (bounceable) or `0x51` (non-bounceable), with `0x80` set for
//! testnet-only addresses. The checksum is CRC16/XMODEM over the first 34 bytes,
//! stored big-endian.

use crate::account_id::AccountId;
use crate::errors::AddressError;
use base64::engine::general_purpose::{STANDARD, URL_SAFE};
use base64::Engine;
use crc::{Crc, CRC_16_XMODEM};

/// Length of the textual friendly form.
pub const FRIENDLY_LEN: usize = 48;

const PAYLOAD_LEN: usize = 36;
const TAG_BOUNCEABLE: u8 = 0x11;
const TAG_NON_BOUNCEABLE: u8 = 0x51;
const FLAG_TESTNET: u8 = 0x80;

const CRC16: Crc<u16> = Crc::<u16>::new(&CRC_16_XMODEM);

/// Flags carried in the tag byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FriendlyFlags {
    /// Bounce messages back on failure.
    pub bounceable: bool,
    /// Only valid on testnet.
    pub testnet_only: bool,
}

impl FriendlyFlags {
    /// Mainnet bounceable flags.
    #[must_use]
    pub const fn bounceable() -> Self {
        Self {
            bounceable: true,
            testnet_only: false,
        }
    }

    /// Mainnet non-bounceable flags.
    #[must_use]
    pub const fn non_bounceable() -> Self {
        Self {
            bounceable: false,
            testnet_only: false,
        }
    }

    fn tag(self) -> u8 {
        let base = if self.bounceable {
            TAG_BOUNCEABLE
        } else {
            TAG_NON_BOUNCEABLE
        };
        if self.testnet_only {
            base | FLAG_TESTNET
        } else {
            base
        }
    }

    fn from_tag(tag: u8) -> Result<Self, AddressError> {
        let testnet_only = tag & FLAG_TESTNET != 0;
        let bounceable = match tag & !FLAG_TESTNET {
            TAG_BOUNCEABLE => true,
            TAG_NON_BOUNCEABLE => false,
            _ => return Err(AddressError::UnknownTag(tag)),
        };
        Ok(Self {
            bounceable,
            testnet_only,
        })
    }
}

/// CRC16/XMODEM checksum.
#[must_use]
pub fn crc16(data: &[u8]) -> u16 {
    CRC16.checksum(data)
}

pub(crate) fn encode(id: &AccountId, flags: FriendlyFlags, url_safe: bool) -> String {
    let mut payload = [0u8; PAYLOAD_LEN];
    payload[0] = flags.tag();
    payload[1] = id.workchain.to_be_bytes()[0];
    payload[2..34].copy_from_slice(&id.hash);
    let checksum = crc16(&payload[..34]);
    payload[34..].copy_from_slice(&checksum.to_be_bytes());

    if url_safe {
        URL_SAFE.encode(payload)
    } else {
        STANDARD.encode(payload)
    }
}

/// Decodes a friendly address written in either base64 alphabet.
pub(crate) fn decode(text: &str) -> Result<(AccountId, FriendlyFlags), AddressError> {
    if text.len() != FRIENDLY_LEN {
        return Err(AddressError::InvalidLength(text.len()));
    }
    let normalized: String = text
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect();
    let bytes = STANDARD
        .decode(normalized.as_bytes())
        .map_err(|_| AddressError::InvalidBase64)?;
    if bytes.len() != PAYLOAD_LEN {
        return Err(AddressError::InvalidBase64);
    }

    let expected = crc16(&bytes[..34]);
    let actual = u16::from_be_bytes([bytes[34], bytes[35]]);
    if expected != actual {
        return Err(AddressError::ChecksumMismatch { expected, actual });
    }

    let flags = FriendlyFlags::from_tag(bytes[0])?;
    let workchain = i8::from_be_bytes([bytes[1]]);
    let mut hash = [0u8; 32];
    hash.copy_from_slice(&bytes[2..34]);
    Ok((AccountId::new(workchain, hash), flags))
}
