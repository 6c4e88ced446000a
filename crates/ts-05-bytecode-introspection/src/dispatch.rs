//! # Method Dispatch Table
//!
//! Contracts compiled from FunC start with the same prologue:
//!
//! ```text
//! SETCP0                 FF00
//! DICTPUSHCONST n        F4A6_ n:(## 10) + ref(dictionary)
//! DICTIGETJMPZ           F4BC
//! THROWARG 11            F2C80B
//! ```
//!
//! The constant dictionary maps `n`-bit signed method ids to method bodies.
//! Reading its keys yields every method the contract can dispatch, including
//! `recv_internal` (0) and `recv_external` (-1).

use crate::errors::IntrospectionError;
use num_traits::ToPrimitive;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;
use ts_02_cell_codec::{hashmap_entries_bounded, Cell, CellSlice};

/// `SETCP0`
const SETCP0: u64 = 0xFF00;
/// Fixed 14-bit prefix of `DICTPUSHCONST`.
const DICTPUSHCONST_PREFIX: u64 = 0b1111_0100_1010_01;
const DICTPUSHCONST_PREFIX_BITS: usize = 14;
const KEY_WIDTH_BITS: usize = 10;
/// Dispatch tables larger than this are treated as malformed.
pub const MAX_METHODS: usize = 4096;

/// Outcome of scanning code for a dispatch table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchTable {
    /// The prologue was found; the set may legitimately be empty.
    Recognized(BTreeSet<i64>),
    /// The code does not start with the standard prologue.
    Unrecognized,
}

impl DispatchTable {
    /// Method ids, empty when unrecognized.
    #[must_use]
    pub fn into_ids(self) -> BTreeSet<i64> {
        match self {
            Self::Recognized(ids) => ids,
            Self::Unrecognized => BTreeSet::new(),
        }
    }
}

/// Looks for the dispatch prologue at the start of `code` and reads the
/// method ids of its dictionary.
///
/// # Errors
///
/// Returns [`IntrospectionError::Cell`] when the prologue is present but
/// the dictionary is malformed or holds more than [`MAX_METHODS`] entries.
pub fn scan_dispatch(code: &Arc<Cell>) -> Result<DispatchTable, IntrospectionError> {
    let mut slice = CellSlice::new(code.clone());
    let Some(key_bits) = read_prologue(&mut slice) else {
        return Ok(DispatchTable::Unrecognized);
    };
    let Ok(dictionary) = slice.load_ref() else {
        return Ok(DispatchTable::Unrecognized);
    };

    let mut ids = BTreeSet::new();
    for entry in hashmap_entries_bounded(&dictionary, key_bits, MAX_METHODS)? {
        let key = entry.signed_key();
        let id = key.to_i64().ok_or_else(|| {
            ts_02_cell_codec::CellError::Malformed(format!("method id {key} out of range"))
        })?;
        ids.insert(id);
    }
    Ok(DispatchTable::Recognized(ids))
}

/// Method ids of `code`. Code without a recognizable dispatch table, or with
/// a malformed one, yields an empty set; use [`scan_dispatch`] to tell the
/// cases apart.
#[must_use]
pub fn extract_method_ids(code: &Arc<Cell>) -> BTreeSet<i64> {
    match scan_dispatch(code) {
        Ok(table) => table.into_ids(),
        Err(err) => {
            debug!(error = %err, code_hash = %code.hash_hex(), "dispatch dictionary unreadable");
            BTreeSet::new()
        }
    }
}

fn read_prologue(slice: &mut CellSlice) -> Option<usize> {
    if slice.load_uint(16).ok()? != SETCP0 {
        return None;
    }
    if slice.load_uint(DICTPUSHCONST_PREFIX_BITS).ok()? != DICTPUSHCONST_PREFIX {
        return None;
    }
    let key_bits = usize::try_from(slice.load_uint(KEY_WIDTH_BITS).ok()?).ok()?;
    (key_bits > 0).then_some(key_bits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigInt;
    use proptest::prelude::*;
    use ts_02_cell_codec::hashmap::build_signed_hashmap;
    use ts_02_cell_codec::CellBuilder;

    /// Builds `SETCP0; DICTPUSHCONST 19; DICTIGETJMPZ; THROWARG 11` over `ids`.
    fn dispatch_code(ids: &[i64]) -> Arc<Cell> {
        let body = Arc::new(Cell::empty());
        let entries: Vec<(BigInt, Arc<Cell>)> =
            ids.iter().map(|&id| (BigInt::from(id), body.clone())).collect();
        let dictionary = build_signed_hashmap(19, &entries).unwrap().unwrap();

        let mut b = CellBuilder::new();
        b.store_uint(16, SETCP0)
            .unwrap()
            .store_uint(DICTPUSHCONST_PREFIX_BITS, DICTPUSHCONST_PREFIX)
            .unwrap()
            .store_uint(KEY_WIDTH_BITS, 19)
            .unwrap()
            .store_uint(16, 0xF4BC)
            .unwrap()
            .store_uint(24, 0xF2_C80B)
            .unwrap()
            .store_ref(dictionary)
            .unwrap();
        Arc::new(b.build().unwrap())
    }

    #[test]
    fn test_prologue_bytes_match_compiler_output() {
        let code = dispatch_code(&[0]);
        assert_eq!(&code.data()[..5], &[0xFF, 0x00, 0xF4, 0xA4, 0x13]);
    }

    #[test]
    fn test_reads_signed_ids() {
        let code = dispatch_code(&[0, -1, 85143, 78748]);
        assert_eq!(
            scan_dispatch(&code).unwrap(),
            DispatchTable::Recognized([-1, 0, 78748, 85143].into_iter().collect())
        );
        assert_eq!(extract_method_ids(&code).len(), 4);
    }

    #[test]
    fn test_unrecognized_code() {
        let mut b = CellBuilder::new();
        b.store_uint(16, 0xFF00).unwrap().store_uint(16, 0x2082).unwrap();
        let code = Arc::new(b.build().unwrap());
        assert_eq!(scan_dispatch(&code).unwrap(), DispatchTable::Unrecognized);
        assert!(extract_method_ids(&code).is_empty());

        let empty = Arc::new(Cell::empty());
        assert_eq!(scan_dispatch(&empty).unwrap(), DispatchTable::Unrecognized);
    }

    #[test]
    fn test_prologue_without_dictionary_ref() {
        let mut b = CellBuilder::new();
        b.store_uint(16, SETCP0)
            .unwrap()
            .store_uint(DICTPUSHCONST_PREFIX_BITS, DICTPUSHCONST_PREFIX)
            .unwrap()
            .store_uint(KEY_WIDTH_BITS, 19)
            .unwrap();
        let code = Arc::new(b.build().unwrap());
        assert_eq!(scan_dispatch(&code).unwrap(), DispatchTable::Unrecognized);
    }

    #[test]
    fn test_malformed_dictionary_is_an_error() {
        // Label claims 31 bits against a 19-bit key.
        let mut d = CellBuilder::new();
        d.store_uint(2, 0b10).unwrap().store_uint(5, 31).unwrap();
        let dictionary = Arc::new(d.build().unwrap());

        let mut b = CellBuilder::new();
        b.store_uint(16, SETCP0)
            .unwrap()
            .store_uint(DICTPUSHCONST_PREFIX_BITS, DICTPUSHCONST_PREFIX)
            .unwrap()
            .store_uint(KEY_WIDTH_BITS, 19)
            .unwrap()
            .store_ref(dictionary)
            .unwrap();
        let code = Arc::new(b.build().unwrap());
        assert!(scan_dispatch(&code).is_err());
        assert!(extract_method_ids(&code).is_empty());
    }

    fn code_with(key_bits: u64, dictionary: Arc<Cell>) -> Arc<Cell> {
        let mut b = CellBuilder::new();
        b.store_uint(16, SETCP0)
            .unwrap()
            .store_uint(DICTPUSHCONST_PREFIX_BITS, DICTPUSHCONST_PREFIX)
            .unwrap()
            .store_uint(KEY_WIDTH_BITS, key_bits)
            .unwrap()
            .store_ref(dictionary)
            .unwrap();
        Arc::new(b.build().unwrap())
    }

    /// Forks whose two references point at the same child, `key_bits` deep.
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
    fn test_oversized_dictionary_is_an_error() {
        let code = code_with(19, shared_fork_chain(19));
        assert!(scan_dispatch(&code).is_err());
        assert!(extract_method_ids(&code).is_empty());

        let code = code_with(1023, shared_fork_chain(1023));
        assert!(scan_dispatch(&code).is_err());

        let code = code_with(12, shared_fork_chain(12));
        assert_eq!(scan_dispatch(&code).unwrap().into_ids().len(), MAX_METHODS);
    }

    #[test]
    fn test_widest_key_dictionary() {
        // hml_same label covering all 1023 bits.
        for (same, id) in [(1u64, -1i64), (0, 0)] {
            let mut d = CellBuilder::new();
            d.store_uint(3, 0b110 | same).unwrap().store_uint(10, 1023).unwrap();
            let code = code_with(1023, Arc::new(d.build().unwrap()));
            assert_eq!(
                scan_dispatch(&code).unwrap(),
                DispatchTable::Recognized([id].into_iter().collect())
            );
        }
    }

    proptest! {
        #[test]
        fn prop_ids_survive_dispatch_dictionary(
            ids in proptest::collection::btree_set(-(1i64 << 18)..(1i64 << 18), 1..24)
        ) {
            let list: Vec<i64> = ids.iter().copied().collect();
            let code = dispatch_code(&list);
            prop_assert_eq!(scan_dispatch(&code).unwrap(), DispatchTable::Recognized(ids));
        }
    }
}
