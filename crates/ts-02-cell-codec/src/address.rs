//! # Message Addresses
//!
//! The `MsgAddress` subset that get methods return:
//!
//! ```text
//! addr_none$00 = MsgAddressExt;
//! addr_std$10 anycast:(Maybe Anycast) workchain_id:int8 address:bits256 = MsgAddressInt;
//! ```
//!
//! Anycast, external and variable-length addresses are rejected.

use crate::builder::CellBuilder;
use crate::cell::Cell;
use crate::errors::CellError;
use crate::slice::CellSlice;
use ts_01_address_codec::AccountId;

/// Serialized width of `addr_std` without anycast.
pub const STD_ADDRESS_BITS: usize = 267;

/// A decoded message address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MsgAddress {
    /// `addr_none`.
    None,
    /// `addr_std` without anycast.
    Std(AccountId),
}

impl MsgAddress {
    /// The standard address, if any.
    #[must_use]
    pub fn account(&self) -> Option<AccountId> {
        match self {
            Self::None => None,
            Self::Std(id) => Some(*id),
        }
    }
}

impl From<AccountId> for MsgAddress {
    fn from(id: AccountId) -> Self {
        Self::Std(id)
    }
}

impl CellBuilder {
    /// Appends a message address.
    ///
    /// # Errors
    ///
    /// Returns [`CellError::DataOverflow`] when the cell overflows.
    pub fn store_address(&mut self, address: &MsgAddress) -> Result<&mut Self, CellError> {
        match address {
            MsgAddress::None => self.store_uint(2, 0b00),
            MsgAddress::Std(id) => self
                .store_uint(2, 0b10)?
                .store_bit(false)?
                .store_int(8, i64::from(id.workchain))?
                .store_bytes(&id.hash),
        }
    }
}

impl CellSlice {
    /// Reads a message address.
    ///
    /// # Errors
    ///
    /// Returns [`CellError::UnexpectedTag`] for address kinds other than
    /// `addr_none` and plain `addr_std`.
    pub fn load_address(&mut self) -> Result<MsgAddress, CellError> {
        match self.load_uint(2)? {
            0b00 => Ok(MsgAddress::None),
            0b10 => {
                if self.load_bit()? {
                    return Err(CellError::UnexpectedTag("anycast address".into()));
                }
                let workchain = i8::try_from(self.load_int(8)?)
                    .map_err(|_| CellError::IntegerOverflow(8))?;
                let hash = self.load_u256()?;
                Ok(MsgAddress::Std(AccountId::new(workchain, hash)))
            }
            0b01 => Err(CellError::UnexpectedTag("external address".into())),
            _ => Err(CellError::UnexpectedTag("variable-length address".into())),
        }
    }
}

/// A cell holding exactly one `addr_std`.
///
/// # Errors
///
/// Propagates cell construction errors.
pub fn address_cell(id: &AccountId) -> Result<Cell, CellError> {
    let mut builder = CellBuilder::new();
    builder.store_address(&MsgAddress::Std(*id))?;
    builder.build()
}
