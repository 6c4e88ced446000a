//! # Outbound Ports (Driven Ports)
//!
//! Collaborators the query service needs from the host application. None of
//! them is implemented for production here; `adapters::memory` holds
//! in-memory versions for tests and local wiring.

use crate::domain::{AddressMetadata, AttachedAccount, RawAccountState};
use async_trait::async_trait;
use thiserror::Error;
use ts_01_address_codec::AccountId;
use ts_03_stack_codec::StackEntry;

/// Failure reported by a collaborator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PortError {
    /// The collaborator has no record of the requested item.
    #[error("not found")]
    NotFound,

    /// The collaborator failed; the text is its own description.
    #[error("{0}")]
    Backend(String),
}

impl PortError {
    /// Creates a backend failure.
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }
}

/// Exit code and result stack of a finished get method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodOutcome {
    /// VM exit code.
    pub exit_code: i32,
    /// Result stack, first return value first.
    pub stack: Vec<StackEntry>,
}

/// Persistent account state and indexing.
#[async_trait]
pub trait AccountStorage: Send + Sync {
    /// Current state of one account.
    ///
    /// # Errors
    ///
    /// [`PortError::NotFound`] when storage never saw the account.
    async fn get_raw_account(&self, id: &AccountId) -> Result<RawAccountState, PortError>;

    /// Current state of several accounts. Unknown ids are omitted, and the
    /// result order is unspecified.
    ///
    /// # Errors
    ///
    /// [`PortError::Backend`] on storage failure.
    async fn get_raw_accounts(&self, ids: &[AccountId]) -> Result<Vec<RawAccountState>, PortError>;

    /// Public key indexed for a wallet.
    ///
    /// # Errors
    ///
    /// [`PortError::NotFound`] when nothing is indexed for the account.
    async fn get_wallet_public_key(&self, id: &AccountId) -> Result<[u8; 32], PortError>;

    /// Schedules the account for reindexing.
    ///
    /// # Errors
    ///
    /// [`PortError::Backend`] on storage failure.
    async fn reindex_account(&self, id: &AccountId) -> Result<(), PortError>;

    /// Balance change in nanotons between two unix times.
    ///
    /// # Errors
    ///
    /// [`PortError::Backend`] on storage failure.
    async fn get_account_diff(&self, id: &AccountId, start: i64, end: i64) -> Result<i64, PortError>;
}

/// Runs get methods against the current account state.
#[async_trait]
pub trait MethodExecutor: Send + Sync {
    /// Runs the method with id `method_id`.
    ///
    /// # Errors
    ///
    /// [`PortError::NotFound`] when the account does not exist, and
    /// [`PortError::Backend`] when the VM could not run.
    async fn run_method(
        &self,
        id: &AccountId,
        method_id: i64,
        args: &[StackEntry],
    ) -> Result<MethodOutcome, PortError>;
}

/// Human-facing knowledge about accounts.
#[async_trait]
pub trait AddressBook: Send + Sync {
    /// Metadata for one account.
    async fn lookup(&self, id: &AccountId) -> Option<AddressMetadata>;

    /// Entries whose name starts with `prefix`.
    async fn search_by_prefix(&self, prefix: &str) -> Vec<AttachedAccount>;
}

/// Spam and impersonation filter.
#[async_trait]
pub trait SpamFilter: Send + Sync {
    /// True when `symbol` shown for `id` must be hidden.
    async fn is_blacklisted(&self, id: &AccountId, symbol: &str) -> bool;
}

/// Domain name resolution.
#[async_trait]
pub trait DnsResolver: Send + Sync {
    /// The account a domain points at.
    ///
    /// # Errors
    ///
    /// [`PortError::Backend`] when the resolver failed.
    async fn resolve(&self, domain: &str) -> Result<Option<AccountId>, PortError>;
}
