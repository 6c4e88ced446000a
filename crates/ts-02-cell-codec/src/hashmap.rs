//! # Dictionaries
//!
//! Read and build `Hashmap n X` trees (Patricia tries keyed by `n`-bit strings).
//!
//! ```text
//! hm_edge#_ {n:#} {X:Type} {l:#} {m:#} label:(HmLabel ~l n) {n = (~m) + l}
//!           node:(HashmapNode m X) = Hashmap n X;
//! hmn_leaf#_ {X:Type} value:X = HashmapNode 0 X;
//! hmn_fork#_ {n:#} {X:Type} left:^(Hashmap n X) right:^(Hashmap n X)
//!            = HashmapNode (n + 1) X;
//!
//! hml_short$0  {m:#} {n:#} len:(Unary ~n) {n <= m} s:(n * Bit) = HmLabel ~n m;
//! hml_long$10  {m:#} n:(#<= m) s:(n * Bit) = HmLabel ~n m;
//! hml_same$11  {m:#} v:Bit n:(#<= m) = HmLabel ~n m;
//!
//! hme_empty$0 = HashmapE n X;
//! hme_root$1 root:^(Hashmap n X) = HashmapE n X;
//! ```

use crate::builder::{twos_complement, CellBuilder};
use crate::cell::Cell;
use crate::errors::CellError;
use crate::slice::CellSlice;
use num_bigint::{BigInt, BigUint};
use num_traits::{One, Zero};
use std::sync::Arc;

/// One dictionary entry: the key bits and the slice holding the value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashmapEntry {
    key: BigUint,
    key_bits: usize,
    /// Value, positioned right after the leaf label.
    pub value: CellSlice,
}

impl HashmapEntry {
    /// Key read as an unsigned integer.
    #[must_use]
    pub fn unsigned_key(&self) -> &BigUint {
        &self.key
    }

    /// Key read as a two's complement signed integer.
    #[must_use]
    pub fn signed_key(&self) -> BigInt {
        let raw = BigInt::from(self.key.clone());
        if self.key_bits > 0 && self.key.bit(self.key_bits as u64 - 1) {
            raw - (BigInt::one() << self.key_bits)
        } else {
            raw
        }
    }
}

// =============================================================================
// READING
// =============================================================================

/// Most entries [`hashmap_entries`] enumerates before giving up.
///
/// Forks may reference one shared child twice, so a handful of cells can
/// describe `2^n` leaves.
pub const MAX_HASHMAP_ENTRIES: usize = 1 << 16;

/// Enumerates a non-empty `Hashmap n X` rooted at `root`, in key order,
/// stopping at [`MAX_HASHMAP_ENTRIES`].
///
/// # Errors
///
/// See [`hashmap_entries_bounded`].
pub fn hashmap_entries(root: &Arc<Cell>, key_bits: usize) -> Result<Vec<HashmapEntry>, CellError> {
    hashmap_entries_bounded(root, key_bits, MAX_HASHMAP_ENTRIES)
}

/// Enumerates a non-empty `Hashmap n X` rooted at `root`, in key order,
/// holding at most `max_entries` leaves.
///
/// # Errors
///
/// Returns an error for malformed labels, missing fork references, label
/// lengths that exceed the remaining key width, and trees with more than
/// `max_entries` leaves.
pub fn hashmap_entries_bounded(
    root: &Arc<Cell>,
    key_bits: usize,
    max_entries: usize,
) -> Result<Vec<HashmapEntry>, CellError> {
    let mut entries = Vec::new();
    let mut pending = vec![(CellSlice::new(root.clone()), BigUint::zero(), key_bits)];

    while let Some((mut slice, prefix, remaining)) = pending.pop() {
        let (label, label_len) = load_label(&mut slice, remaining)?;
        let key = (prefix << label_len) | label;
        let rest = remaining - label_len;
        if rest == 0 {
            if entries.len() == max_entries {
                return Err(CellError::Malformed(format!(
                    "dictionary holds more than {max_entries} entries"
                )));
            }
            entries.push(HashmapEntry {
                key,
                key_bits,
                value: slice,
            });
            continue;
        }
        let left = slice.load_ref()?;
        let right = slice.load_ref()?;
        // Right first so the left subtree is popped, and emitted, first.
        pending.push((CellSlice::new(right), (key.clone() << 1u32) | BigUint::one(), rest - 1));
        pending.push((CellSlice::new(left), key << 1u32, rest - 1));
    }
    Ok(entries)
}

/// Enumerates a `HashmapE n X` stored inline in `slice`.
///
/// # Errors
///
/// See [`hashmap_entries`].
pub fn load_hashmap_e(slice: &mut CellSlice, key_bits: usize) -> Result<Vec<HashmapEntry>, CellError> {
    if slice.load_bit()? {
        let root = slice.load_ref()?;
        hashmap_entries(&root, key_bits)
    } else {
        Ok(Vec::new())
    }
}

fn load_label(slice: &mut CellSlice, max: usize) -> Result<(BigUint, usize), CellError> {
    let len;
    let mut bits = BigUint::zero();
    if !slice.load_bit()? {
        len = slice.load_unary()?;
        if len > max {
            return Err(CellError::UnexpectedTag(format!(
                "label length {len} exceeds {max}"
            )));
        }
        bits = slice.load_big_uint(len)?;
    } else if !slice.load_bit()? {
        len = slice.load_uint_leq(max)?;
        bits = slice.load_big_uint(len)?;
    } else {
        let same = slice.load_bit()?;
        len = slice.load_uint_leq(max)?;
        if same {
            bits = (BigUint::one() << len) - BigUint::one();
        }
    }
    Ok((bits, len))
}

// =============================================================================
// BUILDING
// =============================================================================

/// Builds a `Hashmap n X` from `(key, value)` pairs. Values are appended to
/// their leaf cells. Returns `None` for an empty map.
///
/// Labels are always written as `hml_long`.
///
/// # Errors
///
/// Returns an error for keys wider than `key_bits`, duplicate keys, or values
/// that do not fit next to their label.
pub fn build_hashmap(
    key_bits: usize,
    entries: &[(BigUint, Arc<Cell>)],
) -> Result<Option<Arc<Cell>>, CellError> {
    if entries.is_empty() {
        return Ok(None);
    }
    let mut sorted: Vec<(Vec<bool>, Arc<Cell>)> = Vec::with_capacity(entries.len());
    for (key, value) in entries {
        if key.bits() > key_bits as u64 {
            return Err(CellError::IntegerOverflow(key_bits));
        }
        let bits = (0..key_bits as u64).rev().map(|i| key.bit(i)).collect();
        sorted.push((bits, value.clone()));
    }
    sorted.sort_by(|a, b| a.0.cmp(&b.0));
    if sorted.windows(2).any(|w| w[0].0 == w[1].0) {
        return Err(CellError::Malformed("duplicate dictionary key".into()));
    }
    build_node(&sorted, 0, key_bits).map(Some)
}

/// Builds a dictionary keyed by signed integers.
///
/// # Errors
///
/// See [`build_hashmap`].
pub fn build_signed_hashmap(
    key_bits: usize,
    entries: &[(BigInt, Arc<Cell>)],
) -> Result<Option<Arc<Cell>>, CellError> {
    let unsigned = entries
        .iter()
        .map(|(k, v)| Ok((twos_complement(k, key_bits)?, v.clone())))
        .collect::<Result<Vec<_>, CellError>>()?;
    build_hashmap(key_bits, &unsigned)
}

fn build_node(
    entries: &[(Vec<bool>, Arc<Cell>)],
    offset: usize,
    remaining: usize,
) -> Result<Arc<Cell>, CellError> {
    let first = &entries[0].0;
    let last = &entries[entries.len() - 1].0;
    let mut label_len = 0;
    while label_len < remaining && first[offset + label_len] == last[offset + label_len] {
        label_len += 1;
    }

    let mut builder = CellBuilder::new();
    builder.store_uint(2, 0b10)?;
    let width = usize::BITS as usize - remaining.leading_zeros() as usize;
    builder.store_uint(width, label_len as u64)?;
    for &bit in &first[offset..offset + label_len] {
        builder.store_bit(bit)?;
    }

    let rest = remaining - label_len;
    if rest == 0 {
        builder.store_cell(&entries[0].1)?;
    } else {
        let split = offset + label_len;
        let pivot = entries.partition_point(|(key, _)| !key[split]);
        let left = build_node(&entries[..pivot], split + 1, rest - 1)?;
        let right = build_node(&entries[pivot..], split + 1, rest - 1)?;
        builder.store_ref(left)?.store_ref(right)?;
    }
    Ok(Arc::new(builder.build()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value(v: u64) -> Arc<Cell> {
        let mut b = CellBuilder::new();
        b.store_uint(16, v).unwrap();
        Arc::new(b.build().unwrap())
    }

    fn signed_keys(root: &Arc<Cell>, bits: usize) -> Vec<BigInt> {
        hashmap_entries(root, bits)
            .unwrap()
            .iter()
            .map(HashmapEntry::signed_key)
            .collect()
    }

    #[test]
    fn test_build_then_read_signed() {
        let keys = [0i64, 85143, 78748, -1, 113617];
        let entries: Vec<_> = keys
            .iter()
            .map(|k| (BigInt::from(*k), value(7)))
            .collect();
        let root = build_signed_hashmap(19, &entries).unwrap().unwrap();

        let mut read = signed_keys(&root, 19);
        read.sort();
        let mut expected: Vec<_> = keys.iter().map(|k| BigInt::from(*k)).collect();
        expected.sort();
        assert_eq!(read, expected);
    }

    #[test]
    fn test_values_follow_label() {
        let root = build_hashmap(8, &[(BigUint::from(3u8), value(0xBEEF))])
            .unwrap()
            .unwrap();
        let mut entries = hashmap_entries(&root, 8).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].unsigned_key(), &BigUint::from(3u8));
        assert_eq!(entries[0].value.load_uint(16).unwrap(), 0xBEEF);
    }

    #[test]
    fn test_short_and_same_labels() {
        // Single leaf, key 0b101 encoded with hml_short: 0 1110 101.
        let mut b = CellBuilder::new();
        b.store_uint(8, 0b0_1110_101).unwrap();
        let root = Arc::new(b.build().unwrap());
        let entries = hashmap_entries(&root, 3).unwrap();
        assert_eq!(entries[0].unsigned_key(), &BigUint::from(5u8));

        // Single leaf, key 0b1111 encoded with hml_same: 11 1 100.
        let mut b = CellBuilder::new();
        b.store_uint(6, 0b11_1_100).unwrap();
        let root = Arc::new(b.build().unwrap());
        let entries = hashmap_entries(&root, 4).unwrap();
        assert_eq!(entries[0].unsigned_key(), &BigUint::from(15u8));
        assert_eq!(entries[0].signed_key(), BigInt::from(-1));
    }

    #[test]
    fn test_hashmap_e_empty_and_root() {
        let mut b = CellBuilder::new();
        b.store_bit(false).unwrap();
        let mut slice = CellSlice::new(Arc::new(b.build().unwrap()));
        assert!(load_hashmap_e(&mut slice, 32).unwrap().is_empty());

        let dict = build_hashmap(32, &[(BigUint::from(1u8), value(1)), (BigUint::from(2u8), value(2))])
            .unwrap()
            .unwrap();
        let mut b = CellBuilder::new();
        b.store_bit(true).unwrap().store_ref(dict).unwrap();
        let mut slice = CellSlice::new(Arc::new(b.build().unwrap()));
        let keys: Vec<_> = load_hashmap_e(&mut slice, 32)
            .unwrap()
            .iter()
            .map(|e| e.unsigned_key().clone())
            .collect();
        assert_eq!(keys, vec![BigUint::from(1u8), BigUint::from(2u8)]);
    }

    #[test]
    fn test_label_longer_than_key_rejected() {
        // hml_short with length 4 for a 3-bit key.
        let mut b = CellBuilder::new();
        b.store_uint(10, 0b0_11110_0000).unwrap();
        let root = Arc::new(b.build().unwrap());
        assert!(hashmap_entries(&root, 3).is_err());
    }

    #[test]
    fn test_fork_without_refs_rejected() {
        // hml_long of length 0 for an 8-bit key, then no fork references.
        let mut b = CellBuilder::new();
        b.store_uint(2, 0b10).unwrap().store_uint(4, 0).unwrap();
        let root = Arc::new(b.build().unwrap());
        assert_eq!(hashmap_entries(&root, 8).unwrap_err(), CellError::NotEnoughRefs);
    }

    #[test]
    fn test_duplicate_keys_rejected() {
        let entries = [(BigUint::from(1u8), value(1)), (BigUint::from(1u8), value(2))];
        assert!(build_hashmap(8, &entries).is_err());
    }

    /// `key_bits` forks in a row, each referencing the same child twice.
    fn shared_fork_chain(key_bits: usize) -> Arc<Cell> {
        let mut b = CellBuilder::new();
        b.store_uint(2, 0b10).unwrap();
        let mut node = Arc::new(b.build().unwrap());
        for remaining in 1..=key_bits {
            let width = usize::BITS as usize - remaining.leading_zeros() as usize;
            let mut b = CellBuilder::new();
            b.store_uint(2, 0b10)
                .unwrap()
                .store_uint(width, 0)
                .unwrap()
                .store_ref(node.clone())
                .unwrap()
                .store_ref(node)
                .unwrap();
            node = Arc::new(b.build().unwrap());
        }
        node
    }

    #[test]
    fn test_shared_children_expand_to_every_path() {
        let root = shared_fork_chain(4);
        let keys: Vec<_> = hashmap_entries(&root, 4)
            .unwrap()
            .iter()
            .map(|e| e.unsigned_key().clone())
            .collect();
        let expected: Vec<_> = (0u8..16).map(BigUint::from).collect();
        assert_eq!(keys, expected);
    }

    #[test]
    fn test_entry_limit_stops_shared_fork_chain() {
        let root = shared_fork_chain(12);
        assert_eq!(hashmap_entries_bounded(&root, 12, 1 << 12).unwrap().len(), 1 << 12);
        assert!(matches!(
            hashmap_entries_bounded(&root, 12, 1000),
            Err(CellError::Malformed(_))
        ));

        let wide = shared_fork_chain(64);
        assert!(matches!(
            hashmap_entries(&wide, 64),
            Err(CellError::Malformed(_))
        ));
    }

    #[test]
    fn test_label_spanning_widest_key() {
        // hml_same of 1023 ones: 11 1 1111111111.
        let mut b = CellBuilder::new();
        b.store_uint(3, 0b11_1).unwrap().store_uint(10, 1023).unwrap();
        let root = Arc::new(b.build().unwrap());
        let entries = hashmap_entries(&root, 1023).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].unsigned_key().bits(), 1023);
        assert_eq!(entries[0].signed_key(), BigInt::from(-1));

        let mut b = CellBuilder::new();
        b.store_uint(3, 0b11_0).unwrap().store_uint(10, 1023).unwrap();
        let root = Arc::new(b.build().unwrap());
        assert_eq!(signed_keys(&root, 1023), vec![BigInt::zero()]);
    }
}
