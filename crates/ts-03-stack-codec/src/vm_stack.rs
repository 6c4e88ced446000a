//! # VM Stack Cells
//!
//! Cell encoding of a whole stack, as exchanged with an executor:
//!
//! ```text
//! vm_stk_null#00 = VmStackValue;
//! vm_stk_tinyint#01 value:int64 = VmStackValue;
//! vm_stk_int#0201_ value:int257 = VmStackValue;
//! vm_stk_nan#02ff = VmStackValue;
//! vm_stk_cell#03 cell:^Cell = VmStackValue;
//! vm_stk_slice#04 _:VmCellSlice = VmStackValue;
//! vm_stk_builder#05 cell:^Cell = VmStackValue;
//! vm_stk_cont#06 cont:VmCont = VmStackValue;
//! vm_stk_tuple#07 len:(## 16) data:(VmTuple len) = VmStackValue;
//!
//! _ cell:^Cell st_bits:(## 10) end_bits:(## 10) st_ref:(#<= 4) end_ref:(#<= 4)
//!   = VmCellSlice;
//!
//! vm_tupref_nil$_ = VmTupleRef 0;
//! vm_tupref_single$_ entry:^VmStackValue = VmTupleRef 1;
//! vm_tupref_any$_ {n:#} ref:^(VmTuple (n + 2)) = VmTupleRef (n + 2);
//! vm_tuple_nil$_ = VmTuple 0;
//! vm_tuple_tcons$_ {n:#} head:(VmTupleRef n) tail:^VmStackValue = VmTuple (n + 1);
//!
//! vm_stack#_ depth:(## 24) stack:(VmStackList depth) = VmStack;
//! vm_stk_cons#_ {n:#} rest:^(VmStackList n) tos:VmStackValue = VmStackList (n + 1);
//! vm_stk_nil#_ = VmStackList 0;
//! ```
//!
//! The last entry of a `Vec<StackEntry>` is the top of the stack.
//! Continuations are not supported.

use crate::entry::{StackEntry, INT_BITS};
use crate::errors::StackError;
use num_bigint::BigInt;
use num_traits::ToPrimitive;
use std::sync::Arc;
use ts_02_cell_codec::{Cell, CellBuilder, CellSlice};

const TAG_NULL: u64 = 0x00;
const TAG_TINYINT: u64 = 0x01;
const TAG_INT: u64 = 0x02;
const TAG_CELL: u64 = 0x03;
const TAG_SLICE: u64 = 0x04;
const TAG_BUILDER: u64 = 0x05;
const TAG_CONT: u64 = 0x06;
const TAG_TUPLE: u64 = 0x07;

/// Suffix after `0x02` that marks a NaN (`0x02ff` minus the tag byte).
const NAN_SUFFIX: u64 = 0xff;

const DEPTH_BITS: usize = 24;
const TUPLE_LEN_BITS: usize = 16;
const SLICE_POS_BITS: usize = 10;

// =============================================================================
// ENCODING
// =============================================================================

/// Encodes a stack into a single `VmStack` cell.
///
/// # Errors
///
/// Returns an error for entries that do not fit the cell layout.
pub fn encode_stack(entries: &[StackEntry]) -> Result<Cell, StackError> {
    let depth = u64::try_from(entries.len()).map_err(|_| StackError::UnsupportedValue("stack depth".into()))?;
    let mut root = CellBuilder::new();
    root.store_uint(DEPTH_BITS, depth)?;
    if let Some((top, below)) = entries.split_last() {
        let rest = encode_list(below)?;
        root.store_ref(Arc::new(rest))?;
        store_value(&mut root, top)?;
    }
    Ok(root.build()?)
}

fn encode_list(entries: &[StackEntry]) -> Result<Cell, StackError> {
    let mut cell = Cell::empty();
    for entry in entries {
        let mut b = CellBuilder::new();
        b.store_ref(Arc::new(cell))?;
        store_value(&mut b, entry)?;
        cell = b.build()?;
    }
    Ok(cell)
}

fn store_value(b: &mut CellBuilder, entry: &StackEntry) -> Result<(), StackError> {
    match entry {
        StackEntry::Null => {
            b.store_uint(8, TAG_NULL)?;
        }
        StackEntry::Int(value) => store_int(b, value)?,
        StackEntry::Nan => {
            b.store_uint(8, TAG_INT)?.store_uint(8, NAN_SUFFIX)?;
        }
        StackEntry::Cell(c) => {
            b.store_uint(8, TAG_CELL)?.store_ref(c.clone())?;
        }
        StackEntry::Slice(s) => {
            let ((st_bits, end_bits), (st_ref, end_ref)) = s.bounds();
            b.store_uint(8, TAG_SLICE)?
                .store_ref(s.cell().clone())?
                .store_uint(SLICE_POS_BITS, st_bits as u64)?
                .store_uint(SLICE_POS_BITS, end_bits as u64)?
                .store_uint(3, st_ref as u64)?
                .store_uint(3, end_ref as u64)?;
        }
        StackEntry::Builder(c) => {
            b.store_uint(8, TAG_BUILDER)?.store_ref(c.clone())?;
        }
        StackEntry::Tuple(items) => {
            let len = u64::try_from(items.len())
                .ok()
                .filter(|l| *l < 1 << TUPLE_LEN_BITS)
                .ok_or_else(|| StackError::UnsupportedValue("tuple too long".into()))?;
            b.store_uint(8, TAG_TUPLE)?.store_uint(TUPLE_LEN_BITS, len)?;
            store_tuple(b, items)?;
        }
    }
    Ok(())
}

fn store_int(b: &mut CellBuilder, value: &BigInt) -> Result<(), StackError> {
    if let Some(small) = value.to_i64() {
        b.store_uint(8, TAG_TINYINT)?.store_int(64, small)?;
    } else {
        // 0x0201_ is the tag byte followed by seven zero bits.
        b.store_uint(8, TAG_INT)?
            .store_uint(7, 0)?
            .store_big_int(INT_BITS, value)
            .map_err(|_| StackError::IntegerOutOfRange)?;
    }
    Ok(())
}

fn value_cell(entry: &StackEntry) -> Result<Arc<Cell>, StackError> {
    let mut b = CellBuilder::new();
    store_value(&mut b, entry)?;
    Ok(Arc::new(b.build()?))
}

/// `VmTuple n`: head references the first `n - 1` items, tail the last.
fn store_tuple(b: &mut CellBuilder, items: &[StackEntry]) -> Result<(), StackError> {
    let Some((last, head)) = items.split_last() else {
        return Ok(());
    };
    match head.len() {
        0 => {}
        1 => {
            b.store_ref(value_cell(&head[0])?)?;
        }
        _ => {
            let mut inner = CellBuilder::new();
            store_tuple(&mut inner, head)?;
            b.store_ref(Arc::new(inner.build()?))?;
        }
    }
    b.store_ref(value_cell(last)?)?;
    Ok(())
}

// =============================================================================
// DECODING
// =============================================================================

/// Decodes a `VmStack` cell. The top of the stack is the last element.
///
/// # Errors
///
/// Returns an error for malformed layouts and
/// [`StackError::UnsupportedValue`] for continuations.
pub fn decode_stack(cell: &Arc<Cell>) -> Result<Vec<StackEntry>, StackError> {
    let mut slice = CellSlice::new(cell.clone());
    let depth = slice.load_uint(DEPTH_BITS)?;
    let mut entries = Vec::new();
    for _ in 0..depth {
        let rest = slice.load_ref()?;
        entries.push(load_value(&mut slice)?);
        slice = CellSlice::new(rest);
    }
    entries.reverse();
    Ok(entries)
}

fn load_value(slice: &mut CellSlice) -> Result<StackEntry, StackError> {
    match slice.load_uint(8)? {
        TAG_NULL => Ok(StackEntry::Null),
        TAG_TINYINT => Ok(StackEntry::int(slice.load_int(64)?)),
        TAG_INT => match slice.load_uint(7)? {
            0 => Ok(StackEntry::Int(slice.load_big_int(INT_BITS)?)),
            // vm_stk_nan#02ff: seven ones then a final one.
            0x7f if slice.load_bit()? => Ok(StackEntry::Nan),
            other => Err(StackError::UnsupportedValue(format!(
                "int tag suffix {other:#04x}"
            ))),
        },
        TAG_CELL => Ok(StackEntry::Cell(slice.load_ref()?)),
        TAG_SLICE => {
            let cell = slice.load_ref()?;
            let st_bits = to_usize(slice.load_uint(SLICE_POS_BITS)?);
            let end_bits = to_usize(slice.load_uint(SLICE_POS_BITS)?);
            let st_ref = slice.load_uint_leq(4)?;
            let end_ref = slice.load_uint_leq(4)?;
            let window = CellSlice::with_bounds(cell, (st_bits, end_bits), (st_ref, end_ref))?;
            Ok(StackEntry::Slice(window))
        }
        TAG_BUILDER => Ok(StackEntry::Builder(slice.load_ref()?)),
        TAG_CONT => Err(StackError::UnsupportedValue("continuation".into())),
        TAG_TUPLE => {
            let len = to_usize(slice.load_uint(TUPLE_LEN_BITS)?);
            Ok(StackEntry::Tuple(load_tuple(slice, len)?))
        }
        other => Err(StackError::UnsupportedValue(format!("stack value tag {other:#04x}"))),
    }
}

fn load_tuple(slice: &mut CellSlice, len: usize) -> Result<Vec<StackEntry>, StackError> {
    if len == 0 {
        return Ok(Vec::new());
    }
    let mut items = match len - 1 {
        0 => Vec::new(),
        1 => vec![load_value(&mut slice.load_ref_slice()?)?],
        n => load_tuple(&mut slice.load_ref_slice()?, n)?,
    };
    items.push(load_value(&mut slice.load_ref_slice()?)?);
    Ok(items)
}

fn to_usize(value: u64) -> usize {
    usize::try_from(value).unwrap_or(usize::MAX)
}
