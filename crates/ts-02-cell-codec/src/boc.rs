//! # Bag of Cells
//!
//! Binary container for one or more cell trees.
//!
//! ```text
//! magic:u32 flags:u8 off_bytes:u8
//! cells:size roots:size absent:size tot_cells_size:off_bytes
//! root_list:(roots * size) [index:(cells * off_bytes)]
//! cell_data:tot_cells_size [crc32c:u32 LE]
//! ```
//!
//! `flags` packs `has_idx:1 has_crc32c:1 has_cache_bits:1 flags:2 size:3`.
//! Two legacy magics are accepted on input only; they carry a single root at
//! index 0, a full-byte `size` and always an index.
//!
//! Each cell is `d1 d2 data refs`, with references written as `size`-byte
//! indices. A reference must point to a later index, which makes cycles
//! unrepresentable.

use crate::cell::Cell;
use crate::errors::CellError;
use crc::{Crc, CRC_32_ISCSI};
use std::collections::HashMap;
use std::sync::Arc;

/// Generic bag-of-cells magic.
pub const GENERIC_MAGIC: u32 = 0xb5ee_9c72;
/// Legacy magic with index.
pub const INDEXED_MAGIC: u32 = 0x68ff_65f3;
/// Legacy magic with index and CRC32C.
pub const INDEXED_CRC_MAGIC: u32 = 0xacc3_a728;

const CRC32C: Crc<u32> = Crc::<u32>::new(&CRC_32_ISCSI);

/// CRC32C (Castagnoli) checksum.
#[must_use]
pub fn crc32c(data: &[u8]) -> u32 {
    CRC32C.checksum(data)
}

/// Serialization knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BocOptions {
    /// Write the cell offset index.
    pub with_index: bool,
    /// Append a CRC32C trailer.
    pub with_crc: bool,
}

impl Default for BocOptions {
    fn default() -> Self {
        Self {
            with_index: false,
            with_crc: true,
        }
    }
}

// =============================================================================
// SERIALIZATION
// =============================================================================

/// Serializes root cells into a bag of cells.
///
/// Cells are deduplicated by representation hash and ordered parents first.
///
/// # Errors
///
/// Returns [`CellError::Malformed`] if the bag does not fit the format limits.
pub fn serialize(roots: &[Arc<Cell>], options: BocOptions) -> Result<Vec<u8>, CellError> {
    let order = topological_order(roots);
    let index: HashMap<[u8; 32], usize> = order
        .iter()
        .enumerate()
        .map(|(i, cell)| (*cell.hash(), i))
        .collect();

    let size = byte_width(order.len() as u64);
    if size > 4 {
        return Err(CellError::Malformed(format!("{} cells is too many", order.len())));
    }

    let mut blobs = Vec::with_capacity(order.len());
    for cell in &order {
        let (d1, d2) = cell.descriptors();
        let mut blob = vec![d1, d2];
        blob.extend_from_slice(&cell.padded_data());
        for child in cell.refs() {
            let position = index
                .get(child.hash())
                .copied()
                .ok_or_else(|| CellError::Malformed("child missing from order".into()))?;
            write_uint(&mut blob, position as u64, size);
        }
        blobs.push(blob);
    }

    let total: usize = blobs.iter().map(Vec::len).sum();
    let off_bytes = byte_width(total as u64);

    let mut out = Vec::with_capacity(total + 32);
    out.extend_from_slice(&GENERIC_MAGIC.to_be_bytes());
    #[allow(clippy::cast_possible_truncation)]
    let flags = (u8::from(options.with_index) << 7) | (u8::from(options.with_crc) << 6) | size as u8;
    out.push(flags);
    #[allow(clippy::cast_possible_truncation)]
    out.push(off_bytes as u8);
    write_uint(&mut out, order.len() as u64, size);
    write_uint(&mut out, roots.len() as u64, size);
    write_uint(&mut out, 0, size);
    write_uint(&mut out, total as u64, off_bytes);
    for root in roots {
        let position = index
            .get(root.hash())
            .copied()
            .ok_or_else(|| CellError::Malformed("root missing from order".into()))?;
        write_uint(&mut out, position as u64, size);
    }
    if options.with_index {
        let mut offset = 0u64;
        for blob in &blobs {
            offset += blob.len() as u64;
            write_uint(&mut out, offset, off_bytes);
        }
    }
    for blob in &blobs {
        out.extend_from_slice(blob);
    }
    if options.with_crc {
        let checksum = crc32c(&out);
        out.extend_from_slice(&checksum.to_le_bytes());
    }
    Ok(out)
}

/// Serializes a single root with default options.
///
/// # Errors
///
/// See [`serialize`].
pub fn serialize_single(root: &Arc<Cell>) -> Result<Vec<u8>, CellError> {
    serialize(std::slice::from_ref(root), BocOptions::default())
}

/// Reverse post-order DFS: every cell precedes its children, first root first.
fn topological_order(roots: &[Arc<Cell>]) -> Vec<Arc<Cell>> {
    enum Visit {
        Enter(Arc<Cell>),
        Exit(Arc<Cell>),
    }

    let mut seen = std::collections::HashSet::new();
    let mut post = Vec::new();
    let mut stack: Vec<Visit> = roots.iter().map(|r| Visit::Enter(r.clone())).collect();

    while let Some(visit) = stack.pop() {
        match visit {
            Visit::Enter(cell) => {
                if !seen.insert(*cell.hash()) {
                    continue;
                }
                stack.push(Visit::Exit(cell.clone()));
                for child in cell.refs() {
                    stack.push(Visit::Enter(child.clone()));
                }
            }
            Visit::Exit(cell) => post.push(cell),
        }
    }
    post.reverse();
    post
}

fn byte_width(value: u64) -> usize {
    let bits = 64 - value.leading_zeros() as usize;
    bits.div_ceil(8).max(1)
}

fn write_uint(out: &mut Vec<u8>, value: u64, bytes: usize) {
    out.extend_from_slice(&value.to_be_bytes()[8 - bytes..]);
}

// =============================================================================
// DESERIALIZATION
// =============================================================================

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn take(&mut self, len: usize, what: &'static str) -> Result<&'a [u8], CellError> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|end| *end <= self.bytes.len())
            .ok_or(CellError::Truncated(what))?;
        let out = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(out)
    }

    fn uint(&mut self, len: usize, what: &'static str) -> Result<usize, CellError> {
        let raw = self.take(len, what)?;
        let value = raw.iter().fold(0u64, |acc, b| (acc << 8) | u64::from(*b));
        usize::try_from(value).map_err(|_| CellError::Malformed(format!("{what} too large")))
    }
}

struct RawCell {
    exotic: bool,
    level_mask: u8,
    data: Vec<u8>,
    bit_len: usize,
    refs: Vec<usize>,
}

/// Deserializes a bag of cells into its root cells.
///
/// # Errors
///
/// Returns a malformed-data [`CellError`] for any structural problem; no
/// partial result is produced.
pub fn deserialize(bytes: &[u8]) -> Result<Vec<Arc<Cell>>, CellError> {
    let mut reader = Reader { bytes, pos: 0 };
    let magic_bytes = reader.take(4, "magic")?;
    let magic = u32::from_be_bytes([magic_bytes[0], magic_bytes[1], magic_bytes[2], magic_bytes[3]]);

    let (has_index, has_crc, size, legacy) = match magic {
        GENERIC_MAGIC => {
            let flags = reader.take(1, "flags")?[0];
            (
                flags & 0x80 != 0,
                flags & 0x40 != 0,
                usize::from(flags & 0x07),
                false,
            )
        }
        INDEXED_MAGIC | INDEXED_CRC_MAGIC => {
            let size = usize::from(reader.take(1, "size")?[0]);
            (true, magic == INDEXED_CRC_MAGIC, size, true)
        }
        other => return Err(CellError::BadMagic(other)),
    };
    if size == 0 || size > 4 {
        return Err(CellError::Malformed(format!("reference size {size}")));
    }
    let off_bytes = usize::from(reader.take(1, "off_bytes")?[0]);
    if off_bytes == 0 || off_bytes > 8 {
        return Err(CellError::Malformed(format!("offset size {off_bytes}")));
    }

    let cell_count = reader.uint(size, "cell count")?;
    let root_count = reader.uint(size, "root count")?;
    let absent = reader.uint(size, "absent count")?;
    let total_size = reader.uint(off_bytes, "total cells size")?;

    if absent != 0 {
        return Err(CellError::Malformed("absent cells are not supported".into()));
    }
    if root_count > cell_count {
        return Err(CellError::Malformed(format!(
            "{root_count} roots for {cell_count} cells"
        )));
    }
    if legacy && root_count != 1 {
        return Err(CellError::Malformed(format!(
            "legacy bag must have one root, got {root_count}"
        )));
    }

    let root_indices = if legacy {
        vec![0]
    } else {
        (0..root_count)
            .map(|_| reader.uint(size, "root list"))
            .collect::<Result<Vec<_>, _>>()?
    };
    if has_index {
        let index_len = cell_count
            .checked_mul(off_bytes)
            .ok_or(CellError::Truncated("index"))?;
        reader.take(index_len, "index")?;
    }

    let data = reader.take(total_size, "cell data")?;
    let mut cells_reader = Reader { bytes: data, pos: 0 };
    let mut raw_cells = Vec::with_capacity(cell_count.min(data.len() / 2 + 1));
    for i in 0..cell_count {
        raw_cells.push(read_raw_cell(&mut cells_reader, i, cell_count, size)?);
    }
    if cells_reader.pos != data.len() {
        return Err(CellError::Malformed(format!(
            "cell data size mismatch: declared {}, used {}",
            data.len(),
            cells_reader.pos
        )));
    }

    if has_crc {
        let body_len = reader.pos;
        let trailer = reader.take(4, "crc32c")?;
        let actual = u32::from_le_bytes([trailer[0], trailer[1], trailer[2], trailer[3]]);
        let expected = crc32c(&bytes[..body_len]);
        if expected != actual {
            return Err(CellError::ChecksumMismatch { expected, actual });
        }
    }
    if reader.pos != bytes.len() {
        return Err(CellError::TrailingBytes(bytes.len() - reader.pos));
    }

    let cells = build_cells(raw_cells)?;
    root_indices
        .into_iter()
        .map(|i| {
            cells.get(i).cloned().ok_or(CellError::IndexOutOfRange {
                index: i,
                count: cells.len(),
            })
        })
        .collect()
}

fn read_raw_cell(
    reader: &mut Reader<'_>,
    position: usize,
    count: usize,
    size: usize,
) -> Result<RawCell, CellError> {
    let descriptors = reader.take(2, "cell descriptors")?;
    let (d1, d2) = (descriptors[0], descriptors[1]);

    let ref_count = usize::from(d1 & 0x07);
    if ref_count == 7 {
        return Err(CellError::Malformed("absent cells are not supported".into()));
    }
    if ref_count > 4 {
        return Err(CellError::RefOverflow(ref_count));
    }
    if d1 & 0x10 != 0 {
        return Err(CellError::Malformed("stored cell hashes are not supported".into()));
    }
    let exotic = d1 & 0x08 != 0;
    let level_mask = d1 >> 5;

    let data_len = usize::from(d2).div_ceil(2);
    let mut data = reader.take(data_len, "cell data")?.to_vec();
    let bit_len = if d2 % 2 == 0 {
        data_len * 8
    } else {
        let last = data.last().copied().unwrap_or(0);
        if last == 0 {
            return Err(CellError::Malformed(format!("cell {position}: missing completion tag")));
        }
        let trailing = last.trailing_zeros() as usize;
        if let Some(byte) = data.last_mut() {
            *byte &= !(1u8 << trailing);
        }
        data_len * 8 - trailing - 1
    };

    let mut refs = Vec::with_capacity(ref_count);
    for _ in 0..ref_count {
        let target = reader.uint(size, "cell reference")?;
        if target >= count {
            return Err(CellError::IndexOutOfRange { index: target, count });
        }
        if target <= position {
            return Err(CellError::BackwardReference {
                from: position,
                to: target,
            });
        }
        refs.push(target);
    }

    Ok(RawCell {
        exotic,
        level_mask,
        data,
        bit_len,
        refs,
    })
}

/// Builds cells from the last index to the first so every child exists
/// before its parent.
fn build_cells(raw_cells: Vec<RawCell>) -> Result<Vec<Arc<Cell>>, CellError> {
    let mut built: Vec<Option<Arc<Cell>>> = vec![None; raw_cells.len()];
    for (position, raw) in raw_cells.into_iter().enumerate().rev() {
        let refs = raw
            .refs
            .iter()
            .map(|&i| {
                built[i]
                    .clone()
                    .ok_or(CellError::BackwardReference { from: position, to: i })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let cell = if raw.exotic {
            Cell::exotic(&raw.data, raw.bit_len, refs)?
        } else {
            Cell::new(&raw.data, raw.bit_len, refs)?
        };
        if cell.level_mask() != raw.level_mask {
            return Err(CellError::Malformed(format!(
                "cell {position}: level mask {} does not match computed {}",
                raw.level_mask,
                cell.level_mask()
            )));
        }
        built[position] = Some(Arc::new(cell));
    }
    Ok(built.into_iter().flatten().collect())
}

/// Deserializes a bag that must hold exactly one root.
///
/// # Errors
///
/// Returns [`CellError::UnexpectedCellCount`] for zero or several roots, or a
/// malformed-data error.
pub fn deserialize_single(bytes: &[u8]) -> Result<Arc<Cell>, CellError> {
    let mut roots = deserialize(bytes)?;
    if roots.len() != 1 {
        return Err(CellError::UnexpectedCellCount(roots.len()));
    }
    roots.pop().ok_or(CellError::UnexpectedCellCount(0))
}

/// Deserializes a hex-encoded bag of cells.
///
/// # Errors
///
/// Returns [`CellError::Malformed`] for invalid hex, otherwise as [`deserialize`].
pub fn deserialize_hex(text: &str) -> Result<Vec<Arc<Cell>>, CellError> {
    let bytes = hex::decode(text).map_err(|e| CellError::Malformed(format!("invalid hex: {e}")))?;
    deserialize(&bytes)
}

/// Hex encoding of a single-root bag with default options.
///
/// # Errors
///
/// See [`serialize`].
pub fn to_hex(root: &Arc<Cell>) -> Result<String, CellError> {
    serialize_single(root).map(hex::encode)
}
