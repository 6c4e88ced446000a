//! # Wallet Versions
//!
//! Standard wallet contracts are identified by the hash of their code cell.
//! Each version keeps the owner's public key at a fixed bit offset of the
//! data cell:
//!
//! | Version | Data layout before the key | Offset |
//! |---------|----------------------------|--------|
//! | V1R1-V2R2 | `seqno:uint32` | 32 |
//! | V3R1-V4R2 | `seqno:uint32 subwallet:uint32` | 64 |
//! | V5R1 | `is_signature_allowed:bool seqno:uint32 wallet_id:uint32` | 65 |
//! | HighloadV2R2 | `subwallet:uint32 last_cleaned:uint64` | 96 |

use crate::errors::IntrospectionError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use ts_02_cell_codec::{Cell, CellSlice};

/// Standard wallet contract versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WalletVersion {
    /// Wallet v1 revision 1.
    V1R1,
    /// Wallet v1 revision 2.
    V1R2,
    /// Wallet v1 revision 3.
    V1R3,
    /// Wallet v2 revision 1.
    V2R1,
    /// Wallet v2 revision 2.
    V2R2,
    /// Wallet v3 revision 1.
    V3R1,
    /// Wallet v3 revision 2.
    V3R2,
    /// Wallet v4 revision 1.
    V4R1,
    /// Wallet v4 revision 2.
    V4R2,
    /// Wallet v5 revision 1.
    V5R1,
    /// Highload wallet v2 revision 2.
    HighloadV2R2,
}

impl WalletVersion {
    /// Every version, oldest first.
    pub const ALL: [Self; 11] = [
        Self::V1R1,
        Self::V1R2,
        Self::V1R3,
        Self::V2R1,
        Self::V2R2,
        Self::V3R1,
        Self::V3R2,
        Self::V4R1,
        Self::V4R2,
        Self::V5R1,
        Self::HighloadV2R2,
    ];

    /// Bit offset of the public key inside the data cell.
    #[must_use]
    pub const fn public_key_offset(self) -> usize {
        match self {
            Self::V1R1 | Self::V1R2 | Self::V1R3 | Self::V2R1 | Self::V2R2 => 32,
            Self::V3R1 | Self::V3R2 | Self::V4R1 | Self::V4R2 => 64,
            Self::V5R1 => 65,
            Self::HighloadV2R2 => 96,
        }
    }

    /// Short lowercase name, e.g. `v4r2`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::V1R1 => "v1r1",
            Self::V1R2 => "v1r2",
            Self::V1R3 => "v1r3",
            Self::V2R1 => "v2r1",
            Self::V2R2 => "v2r2",
            Self::V3R1 => "v3r1",
            Self::V3R2 => "v3r2",
            Self::V4R1 => "v4r1",
            Self::V4R2 => "v4r2",
            Self::V5R1 => "v5r1",
            Self::HighloadV2R2 => "highloadv2r2",
        }
    }
}

impl fmt::Display for WalletVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Code hashes of the published wallet contracts.
const STANDARD_CODE_HASHES: &[(&str, WalletVersion)] = &[
    ("a0cfc2c48aee16a271f2cfc0b7382d81756cecb1017d077faaab3bb602f6868c", WalletVersion::V1R1),
    ("d4902fcc9fad74698fa8e353220a68da0dcf72e32bcb2eb9ee04217c17d3062c", WalletVersion::V1R2),
    ("587cc789eff1c84f46ec3797e45fc809a14ff5ae24f1e0c7a6a99cc9dc9061ff", WalletVersion::V1R3),
    ("5c9a5e68c108e18721a07c42f9956bfb39ad77ec6d624b60c576ec88eee65329", WalletVersion::V2R1),
    ("fe9530d3243853083ef2ef0b4c2908c0abf6fa1c31ea243aacaa5bf8c7d753f1", WalletVersion::V2R2),
    ("b61041a58a7980b946e8fb9e198e3c904d24799ffa36574ea4251c41a566f581", WalletVersion::V3R1),
    ("84dafa449f98a6987789ba232358072bc0f76dc4524002a5d0918b9a75d2d599", WalletVersion::V3R2),
    ("64dd54805522c5be8a9db59cea0105ccf0d08786ca79beb8cb79e880a8d7322d", WalletVersion::V4R1),
    ("feb5ff6820e2ff0d9483e7e0d62c817d846789fb4ae580c878866d959dabd5c0", WalletVersion::V4R2),
    ("20834b7b72b112147e1b2fb457b84e74d1a30f04f737d4f62a668e9552d2b72f", WalletVersion::V5R1),
    ("0b3a887aeacd74e3c3c0d6ab1f3c6b1b2c5df2d94fb6d7e2a83e7ad6aa9df4f6", WalletVersion::HighloadV2R2),
];

/// Code hash to wallet version table. Build once, share by `Arc`.
#[derive(Debug, Clone)]
pub struct WalletRegistry {
    versions: HashMap<[u8; 32], WalletVersion>,
}

impl Default for WalletRegistry {
    fn default() -> Self {
        let entries = STANDARD_CODE_HASHES.iter().filter_map(|(hash, version)| {
            let mut bytes = [0u8; 32];
            hex::decode_to_slice(hash, &mut bytes).ok()?;
            Some((bytes, *version))
        });
        Self::with_entries(entries)
    }
}

impl WalletRegistry {
    /// A registry holding exactly `entries`.
    #[must_use]
    pub fn with_entries(entries: impl IntoIterator<Item = ([u8; 32], WalletVersion)>) -> Self {
        Self {
            versions: entries.into_iter().collect(),
        }
    }

    /// Number of known code hashes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.versions.len()
    }

    /// True when no code hash is known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    /// Exact lookup of a code hash.
    #[must_use]
    pub fn detect_wallet_version(&self, code_hash: &[u8; 32]) -> Option<WalletVersion> {
        self.versions.get(code_hash).copied()
    }

    /// Reads the owner's public key from a wallet's data cell, using the
    /// layout of the version its code belongs to.
    ///
    /// # Errors
    ///
    /// Returns [`IntrospectionError::UnknownWalletLayout`] when the code hash
    /// is not a known wallet, and [`IntrospectionError::Cell`] when the data
    /// cell is too short for the layout.
    pub fn extract_public_key(
        &self,
        code: &Arc<Cell>,
        data: &Arc<Cell>,
    ) -> Result<[u8; 32], IntrospectionError> {
        let version = self.detect_wallet_version(code.hash()).ok_or_else(|| {
            IntrospectionError::UnknownWalletLayout {
                code_hash: code.hash_hex(),
            }
        })?;
        let mut slice = CellSlice::new(data.clone());
        slice.skip_bits(version.public_key_offset())?;
        Ok(slice.load_u256()?)
    }
}
