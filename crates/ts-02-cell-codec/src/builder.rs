//! # Cell Builder
//!
//! Appends bits and references, then freezes them into a [`Cell`].
//! Store methods return `&mut Self` so writes chain with `?`.

use crate::cell::{get_bit, set_bit, Cell, MAX_BITS, MAX_REFS};
use crate::errors::CellError;
use crate::slice::CellSlice;
use num_bigint::{BigInt, BigUint, Sign};
use num_traits::{One, Zero};
use std::sync::Arc;

/// Mutable cell under construction.
#[derive(Debug, Clone, Default)]
pub struct CellBuilder {
    data: Vec<u8>,
    bit_len: usize,
    refs: Vec<Arc<Cell>>,
}

impl CellBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bits written so far.
    #[must_use]
    pub fn bit_len(&self) -> usize {
        self.bit_len
    }

    /// Bits still available.
    #[must_use]
    pub fn bits_left(&self) -> usize {
        MAX_BITS - self.bit_len
    }

    /// References still available.
    #[must_use]
    pub fn refs_left(&self) -> usize {
        MAX_REFS - self.refs.len()
    }

    /// Appends one bit.
    ///
    /// # Errors
    ///
    /// Returns [`CellError::DataOverflow`] when the cell is full.
    pub fn store_bit(&mut self, bit: bool) -> Result<&mut Self, CellError> {
        self.ensure_bits(1)?;
        if self.bit_len % 8 == 0 {
            self.data.push(0);
        }
        set_bit(&mut self.data, self.bit_len, bit);
        self.bit_len += 1;
        Ok(self)
    }

    /// Appends the first `bits` bits of `data`.
    ///
    /// # Errors
    ///
    /// Returns an error when `data` is too short or the cell overflows.
    pub fn store_bits(&mut self, data: &[u8], bits: usize) -> Result<&mut Self, CellError> {
        if data.len() * 8 < bits {
            return Err(CellError::NotEnoughBits {
                needed: bits,
                available: data.len() * 8,
            });
        }
        self.ensure_bits(bits)?;
        for i in 0..bits {
            self.store_bit(get_bit(data, i))?;
        }
        Ok(self)
    }

    /// Appends whole bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CellError::DataOverflow`] when the cell overflows.
    pub fn store_bytes(&mut self, data: &[u8]) -> Result<&mut Self, CellError> {
        self.store_bits(data, data.len() * 8)
    }

    /// Appends an unsigned integer of `bits` width (at most 64).
    ///
    /// # Errors
    ///
    /// Returns [`CellError::IntegerOverflow`] when `value` does not fit.
    pub fn store_uint(&mut self, bits: usize, value: u64) -> Result<&mut Self, CellError> {
        if bits > 64 || (bits < 64 && value >> bits != 0) {
            return Err(CellError::IntegerOverflow(bits));
        }
        self.ensure_bits(bits)?;
        for i in (0..bits).rev() {
            self.store_bit((value >> i) & 1 == 1)?;
        }
        Ok(self)
    }

    /// Appends a two's complement signed integer of `bits` width (at most 64).
    ///
    /// # Errors
    ///
    /// Returns [`CellError::IntegerOverflow`] when `value` does not fit.
    pub fn store_int(&mut self, bits: usize, value: i64) -> Result<&mut Self, CellError> {
        self.store_big_int(bits, &BigInt::from(value))
    }

    /// Appends an arbitrary-width unsigned integer.
    ///
    /// # Errors
    ///
    /// Returns [`CellError::IntegerOverflow`] when `value` does not fit.
    pub fn store_big_uint(&mut self, bits: usize, value: &BigUint) -> Result<&mut Self, CellError> {
        if value.bits() > bits as u64 {
            return Err(CellError::IntegerOverflow(bits));
        }
        self.ensure_bits(bits)?;
        for i in (0..bits as u64).rev() {
            self.store_bit(value.bit(i))?;
        }
        Ok(self)
    }

    /// Appends an arbitrary-width two's complement signed integer.
    ///
    /// # Errors
    ///
    /// Returns [`CellError::IntegerOverflow`] when `value` does not fit.
    pub fn store_big_int(&mut self, bits: usize, value: &BigInt) -> Result<&mut Self, CellError> {
        let encoded = twos_complement(value, bits)?;
        self.store_big_uint(bits, &encoded)
    }

    /// Appends a child reference.
    ///
    /// # Errors
    ///
    /// Returns [`CellError::RefOverflow`] when four references are already stored.
    pub fn store_ref(&mut self, cell: Arc<Cell>) -> Result<&mut Self, CellError> {
        if self.refs.len() >= MAX_REFS {
            return Err(CellError::RefOverflow(self.refs.len() + 1));
        }
        self.refs.push(cell);
        Ok(self)
    }

    /// Appends the remaining bits and references of a slice.
    ///
    /// # Errors
    ///
    /// Returns an error when the combined cell would overflow.
    pub fn store_slice(&mut self, slice: &CellSlice) -> Result<&mut Self, CellError> {
        let bits = slice.remaining_bits();
        if slice.remaining_refs() > self.refs_left() {
            return Err(CellError::RefOverflow(self.refs.len() + slice.remaining_refs()));
        }
        self.ensure_bits(bits)?;
        for i in 0..bits {
            self.store_bit(slice.peek_bit(i)?)?;
        }
        for r in slice.remaining_ref_cells() {
            self.store_ref(r.clone())?;
        }
        Ok(self)
    }

    /// Appends the bits and references of a whole cell.
    ///
    /// # Errors
    ///
    /// Returns an error when the combined cell would overflow.
    pub fn store_cell(&mut self, cell: &Arc<Cell>) -> Result<&mut Self, CellError> {
        self.store_slice(&CellSlice::new(cell.clone()))
    }

    /// Freezes the builder into an ordinary cell.
    ///
    /// # Errors
    ///
    /// Propagates [`Cell::new`] validation errors.
    pub fn build(&self) -> Result<Cell, CellError> {
        Cell::new(&self.data, self.bit_len, self.refs.clone())
    }

    /// Freezes the builder into an exotic cell.
    ///
    /// # Errors
    ///
    /// Propagates [`Cell::exotic`] validation errors.
    pub fn build_exotic(&self) -> Result<Cell, CellError> {
        Cell::exotic(&self.data, self.bit_len, self.refs.clone())
    }

    fn ensure_bits(&self, bits: usize) -> Result<(), CellError> {
        if self.bit_len + bits > MAX_BITS {
            return Err(CellError::DataOverflow(self.bit_len + bits));
        }
        Ok(())
    }
}

/// Encodes `value` as a `bits`-wide two's complement unsigned integer.
///
/// # Errors
///
/// Returns [`CellError::IntegerOverflow`] when `value` is outside
/// `[-2^(bits-1), 2^(bits-1))`.
pub fn twos_complement(value: &BigInt, bits: usize) -> Result<BigUint, CellError> {
    if bits == 0 {
        return if value.is_zero() {
            Ok(BigUint::zero())
        } else {
            Err(CellError::IntegerOverflow(0))
        };
    }
    let half = BigInt::one() << (bits - 1);
    if value >= &half || value < &-&half {
        return Err(CellError::IntegerOverflow(bits));
    }
    let shifted = if value.sign() == Sign::Minus {
        value + (BigInt::one() << bits)
    } else {
        value.clone()
    };
    shifted.to_biguint().ok_or(CellError::IntegerOverflow(bits))
}
