//! # Cell Slice
//!
//! A read cursor over a shared cell: `[bit_pos, bit_end)` data bits and
//! `[ref_pos, ref_end)` references. Loads advance the cursor; preloads don't.

use crate::cell::{get_bit, Cell};
use crate::errors::CellError;
use num_bigint::{BigInt, BigUint};
use num_traits::{One, Zero};
use std::fmt;
use std::sync::Arc;

/// Read cursor over a [`Cell`].
#[derive(Clone)]
pub struct CellSlice {
    cell: Arc<Cell>,
    bit_pos: usize,
    bit_end: usize,
    ref_pos: usize,
    ref_end: usize,
}

impl CellSlice {
    /// Creates a slice covering the whole cell.
    #[must_use]
    pub fn new(cell: Arc<Cell>) -> Self {
        let bit_end = cell.bit_len();
        let ref_end = cell.refs().len();
        Self {
            cell,
            bit_pos: 0,
            bit_end,
            ref_pos: 0,
            ref_end,
        }
    }

    /// Creates a slice over an explicit window of the cell.
    ///
    /// # Errors
    ///
    /// Returns [`CellError::Malformed`] when the window is inverted or exceeds
    /// the cell.
    pub fn with_bounds(
        cell: Arc<Cell>,
        bits: (usize, usize),
        refs: (usize, usize),
    ) -> Result<Self, CellError> {
        if bits.0 > bits.1 || bits.1 > cell.bit_len() || refs.0 > refs.1 || refs.1 > cell.refs().len()
        {
            return Err(CellError::Malformed(format!(
                "slice window bits {}..{} refs {}..{} outside cell ({} bits, {} refs)",
                bits.0,
                bits.1,
                refs.0,
                refs.1,
                cell.bit_len(),
                cell.refs().len()
            )));
        }
        Ok(Self {
            cell,
            bit_pos: bits.0,
            bit_end: bits.1,
            ref_pos: refs.0,
            ref_end: refs.1,
        })
    }

    /// Underlying cell.
    #[must_use]
    pub fn cell(&self) -> &Arc<Cell> {
        &self.cell
    }

    /// Current window as `((bit_pos, bit_end), (ref_pos, ref_end))`.
    #[must_use]
    pub fn bounds(&self) -> ((usize, usize), (usize, usize)) {
        ((self.bit_pos, self.bit_end), (self.ref_pos, self.ref_end))
    }

    /// Unread data bits.
    #[must_use]
    pub fn remaining_bits(&self) -> usize {
        self.bit_end - self.bit_pos
    }

    /// Unread references.
    #[must_use]
    pub fn remaining_refs(&self) -> usize {
        self.ref_end - self.ref_pos
    }

    /// True when neither bits nor references remain.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.remaining_bits() == 0 && self.remaining_refs() == 0
    }

    /// Unread references.
    #[must_use]
    pub fn remaining_ref_cells(&self) -> &[Arc<Cell>] {
        &self.cell.refs()[self.ref_pos..self.ref_end]
    }

    /// Bit `offset` positions past the cursor.
    ///
    /// # Errors
    ///
    /// Returns [`CellError::NotEnoughBits`] past the end of the window.
    pub fn peek_bit(&self, offset: usize) -> Result<bool, CellError> {
        self.ensure_bits(offset + 1)?;
        Ok(get_bit(self.cell.data(), self.bit_pos + offset))
    }

    // =========================================================================
    // LOADS
    // =========================================================================

    /// Advances the cursor by `bits` without reading.
    ///
    /// # Errors
    ///
    /// Returns [`CellError::NotEnoughBits`] past the end of the window.
    pub fn skip_bits(&mut self, bits: usize) -> Result<(), CellError> {
        self.ensure_bits(bits)?;
        self.bit_pos += bits;
        Ok(())
    }

    /// Reads one bit.
    ///
    /// # Errors
    ///
    /// Returns [`CellError::NotEnoughBits`] past the end of the window.
    pub fn load_bit(&mut self) -> Result<bool, CellError> {
        let bit = self.peek_bit(0)?;
        self.bit_pos += 1;
        Ok(bit)
    }

    /// Reads an unsigned integer of at most 64 bits without advancing.
    ///
    /// # Errors
    ///
    /// Returns an error past the end of the window or for widths over 64.
    pub fn preload_uint(&self, bits: usize) -> Result<u64, CellError> {
        if bits > 64 {
            return Err(CellError::IntegerOverflow(bits));
        }
        self.ensure_bits(bits)?;
        let mut value = 0u64;
        for i in 0..bits {
            value = (value << 1) | u64::from(get_bit(self.cell.data(), self.bit_pos + i));
        }
        Ok(value)
    }

    /// Reads an unsigned integer of at most 64 bits.
    ///
    /// # Errors
    ///
    /// Returns an error past the end of the window or for widths over 64.
    pub fn load_uint(&mut self, bits: usize) -> Result<u64, CellError> {
        let value = self.preload_uint(bits)?;
        self.bit_pos += bits;
        Ok(value)
    }

    /// Reads a two's complement signed integer of at most 64 bits.
    ///
    /// # Errors
    ///
    /// Returns an error past the end of the window or for widths over 64.
    #[allow(clippy::cast_possible_wrap)]
    pub fn load_int(&mut self, bits: usize) -> Result<i64, CellError> {
        let raw = self.load_uint(bits)?;
        if bits == 0 {
            return Ok(0);
        }
        let shift = 64 - bits;
        Ok(((raw << shift) as i64) >> shift)
    }

    /// Reads an arbitrary-width unsigned integer.
    ///
    /// # Errors
    ///
    /// Returns [`CellError::NotEnoughBits`] past the end of the window.
    pub fn load_big_uint(&mut self, bits: usize) -> Result<BigUint, CellError> {
        self.ensure_bits(bits)?;
        let mut value = BigUint::zero();
        for _ in 0..bits {
            value <<= 1u32;
            if self.load_bit()? {
                value += 1u32;
            }
        }
        Ok(value)
    }

    /// Reads an arbitrary-width two's complement signed integer.
    ///
    /// # Errors
    ///
    /// Returns [`CellError::NotEnoughBits`] past the end of the window.
    pub fn load_big_int(&mut self, bits: usize) -> Result<BigInt, CellError> {
        let raw = BigInt::from(self.load_big_uint(bits)?);
        if bits > 0 && raw.bit(bits as u64 - 1) {
            Ok(raw - (BigInt::one() << bits))
        } else {
            Ok(raw)
        }
    }

    /// Reads `count` whole bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CellError::NotEnoughBits`] past the end of the window.
    #[allow(clippy::cast_possible_truncation)]
    pub fn load_bytes(&mut self, count: usize) -> Result<Vec<u8>, CellError> {
        self.ensure_bits(count * 8)?;
        let mut out = Vec::with_capacity(count);
        for _ in 0..count {
            out.push(self.load_uint(8)? as u8);
        }
        Ok(out)
    }

    /// Reads exactly 32 bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CellError::NotEnoughBits`] past the end of the window.
    pub fn load_u256(&mut self) -> Result<[u8; 32], CellError> {
        let bytes = self.load_bytes(32)?;
        let mut out = [0u8; 32];
        out.copy_from_slice(&bytes);
        Ok(out)
    }

    /// Reads a unary-encoded length (`1...10`).
    ///
    /// # Errors
    ///
    /// Returns [`CellError::NotEnoughBits`] when the terminating zero is missing.
    pub fn load_unary(&mut self) -> Result<usize, CellError> {
        let mut n = 0;
        while self.load_bit()? {
            n += 1;
        }
        Ok(n)
    }

    /// Reads a `#<= max` value: the minimal bit width able to hold `max`.
    ///
    /// # Errors
    ///
    /// Returns an error past the end of the window or when the value exceeds
    /// `max`.
    pub fn load_uint_leq(&mut self, max: usize) -> Result<usize, CellError> {
        let width = usize::BITS as usize - max.leading_zeros() as usize;
        let value = usize::try_from(self.load_uint(width)?)
            .map_err(|_| CellError::IntegerOverflow(width))?;
        if value > max {
            return Err(CellError::UnexpectedTag(format!("{value} exceeds bound {max}")));
        }
        Ok(value)
    }

    /// Takes the next reference.
    ///
    /// # Errors
    ///
    /// Returns [`CellError::NotEnoughRefs`] when none remain.
    pub fn load_ref(&mut self) -> Result<Arc<Cell>, CellError> {
        if self.ref_pos >= self.ref_end {
            return Err(CellError::NotEnoughRefs);
        }
        let cell = self.cell.refs()[self.ref_pos].clone();
        self.ref_pos += 1;
        Ok(cell)
    }

    /// Takes the next reference as a slice.
    ///
    /// # Errors
    ///
    /// Returns [`CellError::NotEnoughRefs`] when none remain.
    pub fn load_ref_slice(&mut self) -> Result<CellSlice, CellError> {
        self.load_ref().map(CellSlice::new)
    }

    /// Copies the unread window into a standalone cell.
    ///
    /// # Errors
    ///
    /// Propagates cell construction errors.
    pub fn to_cell(&self) -> Result<Cell, CellError> {
        let mut builder = crate::builder::CellBuilder::new();
        builder.store_slice(self)?;
        builder.build()
    }

    fn ensure_bits(&self, bits: usize) -> Result<(), CellError> {
        if bits > self.remaining_bits() {
            return Err(CellError::NotEnoughBits {
                needed: bits,
                available: self.remaining_bits(),
            });
        }
        Ok(())
    }

    fn content_eq(&self, other: &Self) -> bool {
        if self.remaining_bits() != other.remaining_bits()
            || self.remaining_refs() != other.remaining_refs()
        {
            return false;
        }
        let bits_equal = (0..self.remaining_bits()).all(|i| {
            get_bit(self.cell.data(), self.bit_pos + i)
                == get_bit(other.cell.data(), other.bit_pos + i)
        });
        bits_equal
            && self
                .remaining_ref_cells()
                .iter()
                .zip(other.remaining_ref_cells())
                .all(|(a, b)| a.hash() == b.hash())
    }
}

impl From<Arc<Cell>> for CellSlice {
    fn from(cell: Arc<Cell>) -> Self {
        Self::new(cell)
    }
}

impl PartialEq for CellSlice {
    fn eq(&self, other: &Self) -> bool {
        self.content_eq(other)
    }
}

impl Eq for CellSlice {}

impl fmt::Debug for CellSlice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CellSlice")
            .field("cell", &self.cell.hash_hex())
            .field("bits", &(self.bit_pos..self.bit_end))
            .field("refs", &(self.ref_pos..self.ref_end))
            .finish()
    }
}
