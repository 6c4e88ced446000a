//! # Known Decoders
//!
//! Each decoder first checks the stack shape. A stack with too few entries
//! or the wrong entry kinds yields [`DecodeOutcome::NotApplicable`]; a stack
//! with the right shape whose contents are out of range yields a
//! [`DecodeError`]. Extra trailing entries are ignored and reported through
//! `consumed`.

use crate::errors::DecodeError;
use crate::registry::DecodeOutcome;
use crate::results::{
    GetCollectionDataResult, GetJettonDataResult, GetNftAddressByIndexResult, GetNftDataResult,
    GetPluginListResult, GetPublicKeyResult, GetSubwalletIdResult, GetWalletAddressResult,
    GetWalletDataLegacyResult, GetWalletDataResult, RoyaltyParamsResult, SeqnoResult,
    WalletPlugin,
};
use num_bigint::Sign;
use num_traits::{ToPrimitive, Zero};
use serde::Serialize;
use std::sync::Arc;
use ts_02_cell_codec::{boc, MsgAddress};
use ts_03_stack_codec::StackEntry;

// =============================================================================
// SHAPE MATCHING
// =============================================================================

#[derive(Debug, Clone, Copy)]
enum Shape {
    Int,
    /// Cell, slice or builder.
    Cell,
    /// Cell or slice holding an address.
    Slice,
    /// Tuple list head or `null`.
    List,
}

impl Shape {
    fn accepts(self, entry: &StackEntry) -> bool {
        match self {
            Self::Int => matches!(entry, StackEntry::Int(_)),
            Self::Cell => entry.as_cell().is_some(),
            Self::Slice => entry.as_slice().is_some(),
            Self::List => matches!(entry, StackEntry::Tuple(_) | StackEntry::Null),
        }
    }
}

fn fits(stack: &[StackEntry], shape: &[Shape]) -> bool {
    stack.len() >= shape.len() && shape.iter().zip(stack).all(|(s, e)| s.accepts(e))
}

fn decoded<T: Serialize>(consumed: usize, value: &T) -> Result<DecodeOutcome, DecodeError> {
    Ok(DecodeOutcome::Decoded {
        consumed,
        value: serde_json::to_value(value)?,
    })
}

// =============================================================================
// ENTRY READERS
// =============================================================================

fn invalid(index: usize, reason: impl Into<String>) -> DecodeError {
    DecodeError::InvalidEntry {
        index,
        reason: reason.into(),
    }
}

fn int_at(stack: &[StackEntry], index: usize) -> Result<&num_bigint::BigInt, DecodeError> {
    stack[index]
        .as_int()
        .ok_or_else(|| invalid(index, "expected an integer"))
}

fn u32_at(stack: &[StackEntry], index: usize) -> Result<u32, DecodeError> {
    int_at(stack, index)?
        .to_u32()
        .ok_or_else(|| invalid(index, "value does not fit uint32"))
}

fn u16_at(stack: &[StackEntry], index: usize) -> Result<u16, DecodeError> {
    int_at(stack, index)?
        .to_u16()
        .ok_or_else(|| invalid(index, "value does not fit uint16"))
}

fn decimal_at(stack: &[StackEntry], index: usize) -> Result<String, DecodeError> {
    Ok(int_at(stack, index)?.to_string())
}

fn flag_at(stack: &[StackEntry], index: usize) -> Result<bool, DecodeError> {
    Ok(!int_at(stack, index)?.is_zero())
}

/// A 256-bit unsigned integer as 64 hex characters.
fn key_hex_at(stack: &[StackEntry], index: usize) -> Result<String, DecodeError> {
    let value = int_at(stack, index)?;
    let (sign, bytes) = value.to_bytes_be();
    if sign == Sign::Minus || bytes.len() > 32 {
        return Err(invalid(index, "value is not a 256-bit unsigned integer"));
    }
    let mut key = [0u8; 32];
    key[32 - bytes.len()..].copy_from_slice(&bytes);
    Ok(hex::encode(key))
}

fn address_at(stack: &[StackEntry], index: usize) -> Result<Option<String>, DecodeError> {
    Ok(match stack[index].load_address()? {
        MsgAddress::None => None,
        MsgAddress::Std(id) => Some(id.to_raw()),
    })
}

fn boc_at(stack: &[StackEntry], index: usize) -> Result<String, DecodeError> {
    let hex = match &stack[index] {
        StackEntry::Slice(s) => boc::to_hex(&Arc::new(s.to_cell()?))?,
        entry => {
            let cell = entry
                .as_cell()
                .ok_or_else(|| invalid(index, "expected a cell"))?;
            boc::to_hex(cell)?
        }
    };
    Ok(hex)
}

// =============================================================================
// WALLET METHODS
// =============================================================================

/// `seqno`: `(int seqno)`.
///
/// # Errors
///
/// Fails when the value does not fit `uint32`.
pub fn seqno(stack: &[StackEntry]) -> Result<DecodeOutcome, DecodeError> {
    if !fits(stack, &[Shape::Int]) {
        return Ok(DecodeOutcome::NotApplicable);
    }
    decoded(1, &SeqnoResult { state: u32_at(stack, 0)? })
}

/// `get_public_key`: `(int public_key)`.
///
/// # Errors
///
/// Fails when the value is not a 256-bit unsigned integer.
pub fn get_public_key(stack: &[StackEntry]) -> Result<DecodeOutcome, DecodeError> {
    if !fits(stack, &[Shape::Int]) {
        return Ok(DecodeOutcome::NotApplicable);
    }
    decoded(
        1,
        &GetPublicKeyResult {
            public_key: key_hex_at(stack, 0)?,
        },
    )
}

/// `get_subwallet_id`: `(int subwallet_id)`.
///
/// # Errors
///
/// Fails when the value does not fit `uint32`.
pub fn get_subwallet_id(stack: &[StackEntry]) -> Result<DecodeOutcome, DecodeError> {
    if !fits(stack, &[Shape::Int]) {
        return Ok(DecodeOutcome::NotApplicable);
    }
    decoded(
        1,
        &GetSubwalletIdResult {
            subwallet_id: u32_at(stack, 0)?,
        },
    )
}

/// Legacy `get_wallet_data`: `(int seqno, int subwallet_id, int public_key)`.
///
/// # Errors
///
/// Fails on out-of-range values.
pub fn get_wallet_data_legacy(stack: &[StackEntry]) -> Result<DecodeOutcome, DecodeError> {
    if !fits(stack, &[Shape::Int, Shape::Int, Shape::Int]) {
        return Ok(DecodeOutcome::NotApplicable);
    }
    decoded(
        3,
        &GetWalletDataLegacyResult {
            seqno: u32_at(stack, 0)?,
            subwallet_id: u32_at(stack, 1)?,
            public_key: key_hex_at(stack, 2)?,
        },
    )
}

/// `get_plugin_list`: a tuple list of `[workchain, hash]` pairs.
///
/// # Errors
///
/// Fails when a list element is not a `[int, int]` pair or the list is not
/// terminated by `null`.
pub fn get_plugin_list(stack: &[StackEntry]) -> Result<DecodeOutcome, DecodeError> {
    if !fits(stack, &[Shape::List]) {
        return Ok(DecodeOutcome::NotApplicable);
    }
    let mut plugins = Vec::new();
    let mut cursor = &stack[0];
    loop {
        let cell = match cursor {
            StackEntry::Null => break,
            StackEntry::Tuple(cell) if cell.len() == 2 => cell,
            other => {
                return Err(invalid(
                    0,
                    format!("malformed list node: {}", other.type_name()),
                ))
            }
        };
        let pair = cell[0]
            .as_tuple()
            .filter(|p| p.len() == 2)
            .ok_or_else(|| invalid(0, "plugin entry is not a pair"))?;
        let workchain = int_at(pair, 0)?
            .to_i32()
            .ok_or_else(|| invalid(0, "plugin workchain out of range"))?;
        plugins.push(WalletPlugin {
            workchain,
            address: key_hex_at(pair, 1)?,
        });
        cursor = &cell[1];
    }
    decoded(1, &GetPluginListResult { plugins })
}

// =============================================================================
// JETTON METHODS
// =============================================================================

/// `get_wallet_address`: `(slice jetton_wallet_address)`.
///
/// # Errors
///
/// Fails when the slice does not hold an address.
pub fn get_wallet_address(stack: &[StackEntry]) -> Result<DecodeOutcome, DecodeError> {
    if !fits(stack, &[Shape::Slice]) {
        return Ok(DecodeOutcome::NotApplicable);
    }
    decoded(
        1,
        &GetWalletAddressResult {
            jetton_wallet_address: address_at(stack, 0)?,
        },
    )
}

/// `get_jetton_data`:
/// `(int total_supply, int mintable, slice admin, cell content, cell wallet_code)`.
///
/// # Errors
///
/// Fails when the admin slice does not hold an address.
pub fn get_jetton_data(stack: &[StackEntry]) -> Result<DecodeOutcome, DecodeError> {
    if !fits(
        stack,
        &[Shape::Int, Shape::Int, Shape::Slice, Shape::Cell, Shape::Cell],
    ) {
        return Ok(DecodeOutcome::NotApplicable);
    }
    decoded(
        5,
        &GetJettonDataResult {
            total_supply: decimal_at(stack, 0)?,
            mintable: flag_at(stack, 1)?,
            admin_address: address_at(stack, 2)?,
            jetton_content: boc_at(stack, 3)?,
            jetton_wallet_code: boc_at(stack, 4)?,
        },
    )
}

/// Jetton `get_wallet_data`:
/// `(int balance, slice owner, slice jetton, cell wallet_code)`.
///
/// # Errors
///
/// Fails when an address slice does not hold an address.
pub fn get_jetton_wallet_data(stack: &[StackEntry]) -> Result<DecodeOutcome, DecodeError> {
    if !fits(stack, &[Shape::Int, Shape::Slice, Shape::Slice, Shape::Cell]) {
        return Ok(DecodeOutcome::NotApplicable);
    }
    decoded(
        4,
        &GetWalletDataResult {
            balance: decimal_at(stack, 0)?,
            owner: address_at(stack, 1)?,
            jetton: address_at(stack, 2)?,
            jetton_wallet_code: boc_at(stack, 3)?,
        },
    )
}

// =============================================================================
// NFT METHODS
// =============================================================================

/// `get_nft_data`:
/// `(int init, int index, slice collection, slice owner, cell content)`.
///
/// # Errors
///
/// Fails when an address slice does not hold an address.
pub fn get_nft_data(stack: &[StackEntry]) -> Result<DecodeOutcome, DecodeError> {
    if !fits(
        stack,
        &[Shape::Int, Shape::Int, Shape::Slice, Shape::Slice, Shape::Cell],
    ) {
        return Ok(DecodeOutcome::NotApplicable);
    }
    decoded(
        5,
        &GetNftDataResult {
            init: flag_at(stack, 0)?,
            index: decimal_at(stack, 1)?,
            collection_address: address_at(stack, 2)?,
            owner_address: address_at(stack, 3)?,
            individual_content: boc_at(stack, 4)?,
        },
    )
}

/// `get_collection_data`: `(int next_item_index, cell content, slice owner)`.
///
/// # Errors
///
/// Fails when the owner slice does not hold an address.
pub fn get_collection_data(stack: &[StackEntry]) -> Result<DecodeOutcome, DecodeError> {
    if !fits(stack, &[Shape::Int, Shape::Cell, Shape::Slice]) {
        return Ok(DecodeOutcome::NotApplicable);
    }
    decoded(
        3,
        &GetCollectionDataResult {
            next_item_index: decimal_at(stack, 0)?,
            collection_content: boc_at(stack, 1)?,
            owner_address: address_at(stack, 2)?,
        },
    )
}

/// `get_nft_address_by_index`: `(slice nft_address)`.
///
/// # Errors
///
/// Fails when the slice does not hold an address.
pub fn get_nft_address_by_index(stack: &[StackEntry]) -> Result<DecodeOutcome, DecodeError> {
    if !fits(stack, &[Shape::Slice]) {
        return Ok(DecodeOutcome::NotApplicable);
    }
    decoded(
        1,
        &GetNftAddressByIndexResult {
            nft_address: address_at(stack, 0)?,
        },
    )
}

/// `royalty_params`: `(int numerator, int denominator, slice destination)`.
///
/// # Errors
///
/// Fails when a ratio part does not fit `uint16` or the destination is not
/// an address.
pub fn royalty_params(stack: &[StackEntry]) -> Result<DecodeOutcome, DecodeError> {
    if !fits(stack, &[Shape::Int, Shape::Int, Shape::Slice]) {
        return Ok(DecodeOutcome::NotApplicable);
    }
    decoded(
        3,
        &RoyaltyParamsResult {
            numerator: u16_at(stack, 0)?,
            denominator: u16_at(stack, 1)?,
            destination: address_at(stack, 2)?,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigInt;
    use num_traits::One;
    use serde_json::json;
    use ts_01_address_codec::AccountId;
    use ts_02_cell_codec::{Cell, CellBuilder, CellSlice};

    fn addr(byte: u8) -> (AccountId, StackEntry) {
        let id = AccountId::new(0, [byte; 32]);
        let entry = StackEntry::address(&id).unwrap();
        (id, entry)
    }

    fn addr_none() -> StackEntry {
        let mut b = CellBuilder::new();
        b.store_uint(2, 0).unwrap();
        StackEntry::Slice(CellSlice::new(Arc::new(b.build().unwrap())))
    }

    fn value(outcome: DecodeOutcome) -> (usize, serde_json::Value) {
        match outcome {
            DecodeOutcome::Decoded { consumed, value } => (consumed, value),
            DecodeOutcome::NotApplicable => panic!("expected a decoded value"),
        }
    }

    #[test]
    fn test_seqno() {
        let (consumed, v) = value(seqno(&[StackEntry::int(42)]).unwrap());
        assert_eq!(consumed, 1);
        assert_eq!(v, json!({"State": 42}));

        assert_eq!(seqno(&[]).unwrap(), DecodeOutcome::NotApplicable);
        assert_eq!(seqno(&[StackEntry::Null]).unwrap(), DecodeOutcome::NotApplicable);
        assert!(matches!(
            seqno(&[StackEntry::int(-1)]),
            Err(DecodeError::InvalidEntry { index: 0, .. })
        ));
    }

    #[test]
    fn test_public_key_is_zero_padded() {
        let (_, v) = value(get_public_key(&[StackEntry::int(255)]).unwrap());
        assert_eq!(
            v["PublicKey"],
            json!(format!("{}ff", "0".repeat(62)))
        );

        let too_wide = StackEntry::Int(BigInt::one() << 256);
        assert!(get_public_key(&[too_wide]).is_err());
    }

    #[test]
    fn test_partial_consumption() {
        let stack = [StackEntry::int(7), StackEntry::Null, StackEntry::int(1)];
        let (consumed, v) = value(get_subwallet_id(&stack).unwrap());
        assert_eq!(consumed, 1);
        assert_eq!(v, json!({"SubwalletId": 7}));
    }

    #[test]
    fn test_jetton_wallet_data() {
        let (owner, owner_entry) = addr(1);
        let (master, master_entry) = addr(2);
        let code = Arc::new(Cell::empty());
        let stack = [
            StackEntry::int(1_000_000_000_i64),
            owner_entry,
            master_entry,
            StackEntry::Cell(code),
        ];
        let (consumed, v) = value(get_jetton_wallet_data(&stack).unwrap());
        assert_eq!(consumed, 4);
        assert_eq!(v["Balance"], json!("1000000000"));
        assert_eq!(v["Owner"], json!(owner.to_raw()));
        assert_eq!(v["Jetton"], json!(master.to_raw()));
        assert_eq!(
            v["JettonWalletCode"],
            json!("b5ee9c724101010100020000004cacb9cd")
        );

        // The legacy layout does not fit the jetton shape.
        let legacy = [StackEntry::int(1), StackEntry::int(2), StackEntry::int(3)];
        assert_eq!(
            get_jetton_wallet_data(&legacy).unwrap(),
            DecodeOutcome::NotApplicable
        );
        let (consumed, v) = value(get_wallet_data_legacy(&legacy).unwrap());
        assert_eq!(consumed, 3);
        assert_eq!(v["Seqno"], json!(1));
        assert_eq!(v["SubwalletId"], json!(2));
    }

    #[test]
    fn test_jetton_data_with_no_admin() {
        let stack = [
            StackEntry::int(5),
            StackEntry::int(-1),
            addr_none(),
            StackEntry::Cell(Arc::new(Cell::empty())),
            StackEntry::Cell(Arc::new(Cell::empty())),
        ];
        let (_, v) = value(get_jetton_data(&stack).unwrap());
        assert_eq!(v["TotalSupply"], json!("5"));
        assert_eq!(v["Mintable"], json!(true));
        assert_eq!(v["AdminAddress"], json!(null));
    }

    #[test]
    fn test_nft_data_rejects_non_address_slice() {
        let (_, owner) = addr(3);
        let garbage = StackEntry::Cell(Arc::new(Cell::empty()));
        let stack = [
            StackEntry::int(-1),
            StackEntry::int(9),
            garbage,
            owner,
            StackEntry::Cell(Arc::new(Cell::empty())),
        ];
        assert!(matches!(get_nft_data(&stack), Err(DecodeError::Cell(_))));
    }

    #[test]
    fn test_royalty_params() {
        let (dest, dest_entry) = addr(4);
        let stack = [StackEntry::int(5), StackEntry::int(100), dest_entry];
        let (_, v) = value(royalty_params(&stack).unwrap());
        assert_eq!(
            v,
            json!({"Numerator": 5, "Denominator": 100, "Destination": dest.to_raw()})
        );
    }

    #[test]
    fn test_plugin_list() {
        let pair = |wc: i64, h: i64| StackEntry::Tuple(vec![StackEntry::int(wc), StackEntry::int(h)]);
        let list = StackEntry::Tuple(vec![
            pair(0, 1),
            StackEntry::Tuple(vec![pair(-1, 2), StackEntry::Null]),
        ]);
        let (_, v) = value(get_plugin_list(&[list]).unwrap());
        let plugins = v["Plugins"].as_array().unwrap();
        assert_eq!(plugins.len(), 2);
        assert_eq!(plugins[0]["Workchain"], json!(0));
        assert_eq!(plugins[1]["Workchain"], json!(-1));
        assert!(plugins[1]["Address"].as_str().unwrap().ends_with("02"));

        let (_, empty) = value(get_plugin_list(&[StackEntry::Null]).unwrap());
        assert_eq!(empty, json!({"Plugins": []}));

        let broken = StackEntry::Tuple(vec![StackEntry::int(1), StackEntry::Null]);
        assert!(get_plugin_list(&[broken]).is_err());
    }
}
