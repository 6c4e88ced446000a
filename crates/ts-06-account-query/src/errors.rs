//! # Error Types
//!
//! Every query failure belongs to one [`ErrorClass`]. An outer transport maps
//! the class to its own status codes; [`ErrorClass::status_code`] gives the
//! conventional HTTP mapping.

use crate::ports::PortError;
use thiserror::Error;
use ts_01_address_codec::AddressError;
use ts_02_cell_codec::CellError;
use ts_03_stack_codec::StackError;
use ts_05_bytecode_introspection::IntrospectionError;

/// Coarse failure categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// The caller sent something unusable.
    InvalidInput,
    /// The account or item does not exist.
    NotFound,
    /// Stored binary data could not be decoded.
    DataIntegrity,
    /// The request does not apply to this account.
    NotApplicable,
    /// A collaborator failed.
    Upstream,
}

impl ErrorClass {
    /// HTTP status code conventionally used for the class.
    #[must_use]
    pub const fn status_code(self) -> u16 {
        match self {
            Self::InvalidInput => 400,
            Self::NotFound => 404,
            Self::DataIntegrity => 500,
            Self::NotApplicable => 422,
            Self::Upstream => 502,
        }
    }
}

/// Errors returned by the query API.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// Address text could not be parsed or resolved.
    #[error("invalid address: {0}")]
    InvalidAddress(#[from] AddressError),

    /// A get-method argument matched no stack value form.
    #[error("{0} as any TVMStackValue")]
    InvalidArgument(#[from] StackError),

    /// Request shape violates a limit or precondition.
    #[error("{0}")]
    InvalidInput(String),

    /// The account or item does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// Stored binary data is not a valid bag of cells.
    #[error("malformed cell data: {0}")]
    MalformedCell(CellError),

    /// A bag of cells had the wrong number of roots.
    #[error("expected exactly one root cell, found {0}")]
    UnexpectedCellCount(usize),

    /// Contract code is not a known wallet.
    #[error("{0}")]
    UnknownWalletLayout(String),

    /// A collaborator failed.
    #[error("upstream failure: {0}")]
    Upstream(String),
}

impl QueryError {
    /// Failure category.
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::InvalidAddress(_) | Self::InvalidArgument(_) | Self::InvalidInput(_) => {
                ErrorClass::InvalidInput
            }
            Self::NotFound(_) => ErrorClass::NotFound,
            Self::MalformedCell(_) | Self::UnexpectedCellCount(_) => ErrorClass::DataIntegrity,
            Self::UnknownWalletLayout(_) => ErrorClass::NotApplicable,
            Self::Upstream(_) => ErrorClass::Upstream,
        }
    }

    /// HTTP status code for the failure category.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        self.class().status_code()
    }

    /// Maps a collaborator failure, naming what was looked up on `NotFound`.
    pub(crate) fn from_port(err: PortError, subject: impl Into<String>) -> Self {
        match err {
            PortError::NotFound => Self::NotFound(subject.into()),
            PortError::Backend(message) => Self::Upstream(message),
        }
    }
}

impl From<CellError> for QueryError {
    fn from(err: CellError) -> Self {
        match err {
            CellError::UnexpectedCellCount(count) => Self::UnexpectedCellCount(count),
            other => Self::MalformedCell(other),
        }
    }
}

impl From<IntrospectionError> for QueryError {
    fn from(err: IntrospectionError) -> Self {
        match err {
            IntrospectionError::UnknownWalletLayout { .. } => {
                Self::UnknownWalletLayout(err.to_string())
            }
            IntrospectionError::Cell(cell) => cell.into(),
        }
    }
}
