//! # TS-06 Account Query - Orchestration Over Ports
//!
//! **Subsystem ID:** 6
//!
//! ## Purpose
//!
//! Answers account questions by combining the codecs with injected
//! collaborators. Storage, execution, naming and spam filtering live behind
//! outbound ports; this crate owns only the rules that connect them.
//!
//! ## Architecture
//!
//! ```text
//!            AccountQueryApi (inbound)
//!                    │
//!           AccountQueryService ── DecoderRegistry, WalletRegistry
//!      ┌──────────┬──┴───────┬─────────────┬────────────┐
//!      ▼          ▼          ▼             ▼            ▼
//! AccountStorage MethodExecutor AddressBook SpamFilter DnsResolver
//! ```
//!
//! ## Operations
//!
//! | Operation | Failure classes |
//! |-----------|-----------------|
//! | `parse_address` | invalid input |
//! | `get_raw_account` | invalid input, not found |
//! | `get_account`, `get_accounts` | invalid input (missing accounts become placeholders) |
//! | `exec_get_method` | invalid input, not found |
//! | `inspect_account` | not found, data integrity |
//! | `get_account_public_key` | not found, data integrity, not applicable |
//! | `search_accounts` | none |
//! | `reindex_account`, `get_account_diff` | invalid input, upstream |
//!
//! ## Usage Example
//!
//! ```
//! use std::sync::Arc;
//! use ts_06_account_query::{
//!     AccountQueryService, InMemoryAccountStorage, InMemoryAddressBook,
//!     InMemoryMethodExecutor, InMemorySpamFilter, QueryConfig, QueryPorts,
//! };
//!
//! let ports = QueryPorts {
//!     storage: Arc::new(InMemoryAccountStorage::new()),
//!     executor: Arc::new(InMemoryMethodExecutor::new()),
//!     address_book: Arc::new(InMemoryAddressBook::new()),
//!     spam_filter: Arc::new(InMemorySpamFilter::new()),
//!     dns: None,
//! };
//! let service = AccountQueryService::new(ports, QueryConfig::default()).unwrap();
//! assert_eq!(service.stats().queries, 0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// =============================================================================
// MODULES
// =============================================================================

pub mod adapters;
pub mod config;
pub mod domain;
pub mod errors;
pub mod ports;
pub mod service;
pub mod telemetry;

// =============================================================================
// RE-EXPORTS
// =============================================================================

pub use adapters::{
    InMemoryAccountStorage, InMemoryAddressBook, InMemoryDnsResolver, InMemoryMethodExecutor,
    InMemorySpamFilter,
};
pub use config::{ConfigError, QueryConfig, DEFAULT_MAX_BULK_ACCOUNTS, DEFAULT_MAX_METHOD_ARGS};
pub use domain::{
    is_clean_exit, Account, AccountDiff, AccountStatus, AddressMetadata, AddressParseRecord,
    AttachedAccount, Compiler, ContractInspection, FoundAccount, InspectedMethod,
    MethodExecutionResult, PublicKeyRecord, RawAccountState, StorageStats,
};
pub use errors::{ErrorClass, QueryError};
pub use ports::{
    AccountQueryApi, AccountStorage, AddressBook, DnsResolver, MethodExecutor, MethodOutcome,
    PortError, SpamFilter,
};
pub use service::{AccountQueryService, QueryPorts, QueryStats};
pub use telemetry::{init_tracing, TelemetryConfig, TelemetryError};
