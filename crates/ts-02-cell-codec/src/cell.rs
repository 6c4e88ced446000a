//! # Cell
//!
//! Up to 1023 data bits and up to 4 ordered references. Children are shared
//! through `Arc`, so a tree is acyclic by construction: a cell can only point at
//! cells that already exist.
//!
//! ## Representation Hash
//!
//! ```text
//! d1    = refs + 8 * exotic + 32 * level_mask
//! d2    = floor(bits / 8) + ceil(bits / 8)
//! data  = bits, padded with a single 1 bit then zeros when bits % 8 != 0
//! hash  = sha256(d1 || d2 || data || depth(ref_i) as u16 BE ... || hash(ref_i) ...)
//! depth = 0 without refs, else 1 + max(depth(ref_i))
//! ```
//!
//! Hash and depth are computed once, at construction.

use crate::errors::CellError;
use sha2::{Digest, Sha256};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Maximum number of data bits in a cell.
pub const MAX_BITS: usize = 1023;

/// Maximum number of references in a cell.
pub const MAX_REFS: usize = 4;

/// Maximum tree depth accepted.
pub const MAX_DEPTH: u16 = 1024;

const HASH_BYTES: usize = 32;
const DEPTH_BYTES: usize = 2;

// =============================================================================
// CELL KIND
// =============================================================================

/// Ordinary or one of the exotic cell types.
///
/// Exotic cells carry their type in the first data byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellKind {
    /// Plain data cell.
    Ordinary,
    /// Pruned branch of a Merkle proof (`0x01`).
    PrunedBranch,
    /// Library reference by hash (`0x02`).
    LibraryReference,
    /// Merkle proof (`0x03`).
    MerkleProof,
    /// Merkle update (`0x04`).
    MerkleUpdate,
}

impl CellKind {
    /// Maps an exotic type byte to its kind.
    #[must_use]
    pub fn from_exotic_tag(tag: u8) -> Option<Self> {
        match tag {
            1 => Some(Self::PrunedBranch),
            2 => Some(Self::LibraryReference),
            3 => Some(Self::MerkleProof),
            4 => Some(Self::MerkleUpdate),
            _ => None,
        }
    }

    /// True for every kind except [`CellKind::Ordinary`].
    #[must_use]
    pub fn is_exotic(self) -> bool {
        self != Self::Ordinary
    }
}

// =============================================================================
// CELL
// =============================================================================

/// An immutable cell with its representation hash and depth precomputed.
#[derive(Clone)]
pub struct Cell {
    kind: CellKind,
    data: Vec<u8>,
    bit_len: usize,
    refs: Vec<Arc<Cell>>,
    level_mask: u8,
    depth: u16,
    hash: [u8; HASH_BYTES],
}

impl Cell {
    /// Creates an ordinary cell from `bit_len` bits of `data` and references.
    ///
    /// Bits past `bit_len` in `data` are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the bit or reference limits are exceeded or `data`
    /// is shorter than `bit_len` bits.
    pub fn new(data: &[u8], bit_len: usize, refs: Vec<Arc<Cell>>) -> Result<Self, CellError> {
        Self::with_kind(CellKind::Ordinary, data, bit_len, refs)
    }

    /// Creates an exotic cell. The kind is read from the first data byte.
    ///
    /// # Errors
    ///
    /// Returns [`CellError::InvalidExotic`] when the type byte or the layout
    /// does not match a known exotic cell.
    pub fn exotic(data: &[u8], bit_len: usize, refs: Vec<Arc<Cell>>) -> Result<Self, CellError> {
        if bit_len < 8 || data.is_empty() {
            return Err(CellError::InvalidExotic("missing type byte".into()));
        }
        let kind = CellKind::from_exotic_tag(data[0])
            .ok_or_else(|| CellError::InvalidExotic(format!("unknown type {}", data[0])))?;
        Self::with_kind(kind, data, bit_len, refs)
    }

    /// The cell with no bits and no references.
    #[must_use]
    pub fn empty() -> Self {
        Self::finish(CellKind::Ordinary, Vec::new(), 0, Vec::new(), 0)
    }

    fn with_kind(
        kind: CellKind,
        data: &[u8],
        bit_len: usize,
        refs: Vec<Arc<Cell>>,
    ) -> Result<Self, CellError> {
        if bit_len > MAX_BITS {
            return Err(CellError::DataOverflow(bit_len));
        }
        if refs.len() > MAX_REFS {
            return Err(CellError::RefOverflow(refs.len()));
        }
        let byte_len = bit_len.div_ceil(8);
        if data.len() < byte_len {
            return Err(CellError::NotEnoughBits {
                needed: bit_len,
                available: data.len() * 8,
            });
        }

        let mut data = data[..byte_len].to_vec();
        if bit_len % 8 != 0 {
            if let Some(last) = data.last_mut() {
                *last &= 0xFFu8 << (8 - bit_len % 8);
            }
        }

        let level_mask = level_mask_for(kind, &data, bit_len, &refs)?;
        let depth = refs
            .iter()
            .map(|r| r.depth + 1)
            .max()
            .unwrap_or(0);
        if depth > MAX_DEPTH {
            return Err(CellError::Malformed(format!("cell depth {depth} exceeds {MAX_DEPTH}")));
        }

        Ok(Self::finish(kind, data, bit_len, refs, level_mask))
    }

    fn finish(
        kind: CellKind,
        data: Vec<u8>,
        bit_len: usize,
        refs: Vec<Arc<Cell>>,
        level_mask: u8,
    ) -> Self {
        let depth = refs.iter().map(|r| r.depth + 1).max().unwrap_or(0);
        let mut cell = Self {
            kind,
            data,
            bit_len,
            refs,
            level_mask,
            depth,
            hash: [0u8; HASH_BYTES],
        };
        cell.hash = cell.compute_hash();
        cell
    }

    fn compute_hash(&self) -> [u8; HASH_BYTES] {
        let (d1, d2) = self.descriptors();
        let mut hasher = Sha256::new();
        hasher.update([d1, d2]);
        hasher.update(self.padded_data());
        for child in &self.refs {
            hasher.update(child.depth.to_be_bytes());
        }
        for child in &self.refs {
            hasher.update(child.hash);
        }
        hasher.finalize().into()
    }

    /// Descriptor bytes `(d1, d2)` as used by hashing and serialization.
    #[must_use]
    pub fn descriptors(&self) -> (u8, u8) {
        #[allow(clippy::cast_possible_truncation)]
        let refs = self.refs.len() as u8;
        let d1 = refs + if self.kind.is_exotic() { 8 } else { 0 } + 32 * self.level_mask;
        #[allow(clippy::cast_possible_truncation)]
        let d2 = (self.bit_len / 8 + self.bit_len.div_ceil(8)) as u8;
        (d1, d2)
    }

    /// Data bytes with the completion tag applied.
    #[must_use]
    pub fn padded_data(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        let rem = self.bit_len % 8;
        if rem != 0 {
            if let Some(last) = out.last_mut() {
                *last |= 1 << (7 - rem);
            }
        }
        out
    }

    /// Cell kind.
    #[must_use]
    pub fn kind(&self) -> CellKind {
        self.kind
    }

    /// True for exotic cells.
    #[must_use]
    pub fn is_exotic(&self) -> bool {
        self.kind.is_exotic()
    }

    /// Raw data bytes; bits past [`Cell::bit_len`] are zero.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Number of data bits.
    #[must_use]
    pub fn bit_len(&self) -> usize {
        self.bit_len
    }

    /// Bit at position `index` (0 is the most significant bit of byte 0).
    #[must_use]
    pub fn bit(&self, index: usize) -> Option<bool> {
        (index < self.bit_len).then(|| get_bit(&self.data, index))
    }

    /// Child references in order.
    #[must_use]
    pub fn refs(&self) -> &[Arc<Cell>] {
        &self.refs
    }

    /// Child reference at `index`.
    #[must_use]
    pub fn reference(&self, index: usize) -> Option<&Arc<Cell>> {
        self.refs.get(index)
    }

    /// Level mask (non-zero only inside Merkle structures).
    #[must_use]
    pub fn level_mask(&self) -> u8 {
        self.level_mask
    }

    /// Cell level: index of the highest set bit of the level mask, plus one.
    #[must_use]
    pub fn level(&self) -> u8 {
        #[allow(clippy::cast_possible_truncation)]
        let level = (8 - self.level_mask.leading_zeros()) as u8;
        level
    }

    /// Depth of the subtree rooted here.
    #[must_use]
    pub fn depth(&self) -> u16 {
        self.depth
    }

    /// Representation hash.
    #[must_use]
    pub fn hash(&self) -> &[u8; HASH_BYTES] {
        &self.hash
    }

    /// Representation hash as lowercase hex.
    #[must_use]
    pub fn hash_hex(&self) -> String {
        hex::encode(self.hash)
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::empty()
    }
}

impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
    }
}

impl Eq for Cell {}

impl Hash for Cell {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.hash.hash(state);
    }
}

impl fmt::Debug for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cell")
            .field("kind", &self.kind)
            .field("bits", &self.bit_len)
            .field("data", &hex::encode(&self.data))
            .field("refs", &self.refs.len())
            .field("hash", &self.hash_hex())
            .finish()
    }
}

// =============================================================================
// LEVEL MASK
// =============================================================================

fn level_mask_for(
    kind: CellKind,
    data: &[u8],
    bit_len: usize,
    refs: &[Arc<Cell>],
) -> Result<u8, CellError> {
    let children = refs.iter().fold(0u8, |acc, r| acc | r.level_mask);
    let invalid = |what: &str| CellError::InvalidExotic(what.to_string());
    match kind {
        CellKind::Ordinary => Ok(children),
        CellKind::PrunedBranch => {
            if !refs.is_empty() || bit_len < 16 {
                return Err(invalid("pruned branch layout"));
            }
            let mask = data[1];
            if mask == 0 || mask > 7 {
                return Err(invalid("pruned branch level mask"));
            }
            let hashes = mask.count_ones() as usize;
            if bit_len != 16 + hashes * (HASH_BYTES + DEPTH_BYTES) * 8 {
                return Err(invalid("pruned branch length"));
            }
            Ok(mask)
        }
        CellKind::LibraryReference => {
            if !refs.is_empty() || bit_len != 8 + HASH_BYTES * 8 {
                return Err(invalid("library reference layout"));
            }
            Ok(0)
        }
        CellKind::MerkleProof => {
            if refs.len() != 1 || bit_len != 8 + (HASH_BYTES + DEPTH_BYTES) * 8 {
                return Err(invalid("merkle proof layout"));
            }
            Ok(children >> 1)
        }
        CellKind::MerkleUpdate => {
            if refs.len() != 2 || bit_len != 8 + 2 * (HASH_BYTES + DEPTH_BYTES) * 8 {
                return Err(invalid("merkle update layout"));
            }
            Ok(children >> 1)
        }
    }
}

// =============================================================================
// BIT HELPERS
// =============================================================================

pub(crate) fn get_bit(data: &[u8], index: usize) -> bool {
    data[index / 8] & (0x80 >> (index % 8)) != 0
}

pub(crate) fn set_bit(data: &mut [u8], index: usize, value: bool) {
    let mask = 0x80 >> (index % 8);
    if value {
        data[index / 8] |= mask;
    } else {
        data[index / 8] &= !mask;
    }
}
