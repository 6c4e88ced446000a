//! # Domain Layer
//!
//! Account entities and query result records.

pub mod account;
mod hex_bytes;
pub mod records;

pub use account::{
    Account, AccountDiff, AccountStatus, AddressMetadata, AttachedAccount, FoundAccount,
    RawAccountState, StorageStats,
};
pub use records::{
    is_clean_exit, AddressParseRecord, Compiler, ContractInspection, InspectedMethod,
    MethodExecutionResult, PublicKeyRecord,
};
