//! # Method Identifiers
//!
//! Get methods are called by a 17-bit id derived from the method name:
//! `(crc16_xmodem(name) & 0xffff) | 0x10000`.

use ts_01_address_codec::crc16;

/// Computes the get-method id for `name`.
#[must_use]
pub fn method_id(name: &str) -> i64 {
    i64::from(crc16(name.as_bytes())) | 0x10000
}
