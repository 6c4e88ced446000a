//! # In-Memory Adapters
//!
//! Port implementations backed by maps behind `parking_lot` locks, for tests
//! and local wiring.

use crate::domain::{AddressMetadata, AttachedAccount, RawAccountState};
use crate::ports::{
    AccountStorage, AddressBook, DnsResolver, MethodExecutor, MethodOutcome, PortError, SpamFilter,
};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use ts_01_address_codec::AccountId;
use ts_03_stack_codec::StackEntry;

// =============================================================================
// STORAGE
// =============================================================================

/// Account storage over a map.
#[derive(Debug, Default)]
pub struct InMemoryAccountStorage {
    accounts: RwLock<HashMap<AccountId, RawAccountState>>,
    public_keys: RwLock<HashMap<AccountId, [u8; 32]>>,
    diffs: RwLock<HashMap<AccountId, i64>>,
    reindexed: RwLock<Vec<AccountId>>,
}

impl InMemoryAccountStorage {
    /// Empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores or replaces an account.
    pub fn insert(&self, state: RawAccountState) {
        self.accounts.write().insert(state.account, state);
    }

    /// Indexes a wallet public key.
    pub fn set_public_key(&self, id: AccountId, key: [u8; 32]) {
        self.public_keys.write().insert(id, key);
    }

    /// Sets the balance change reported for any window.
    pub fn set_diff(&self, id: AccountId, change: i64) {
        self.diffs.write().insert(id, change);
    }

    /// Accounts reindexing was requested for, in request order.
    #[must_use]
    pub fn reindexed(&self) -> Vec<AccountId> {
        self.reindexed.read().clone()
    }
}

#[async_trait]
impl AccountStorage for InMemoryAccountStorage {
    async fn get_raw_account(&self, id: &AccountId) -> Result<RawAccountState, PortError> {
        self.accounts.read().get(id).cloned().ok_or(PortError::NotFound)
    }

    async fn get_raw_accounts(&self, ids: &[AccountId]) -> Result<Vec<RawAccountState>, PortError> {
        let accounts = self.accounts.read();
        // Reverse order so callers cannot rely on positions.
        Ok(ids.iter().rev().filter_map(|id| accounts.get(id).cloned()).collect())
    }

    async fn get_wallet_public_key(&self, id: &AccountId) -> Result<[u8; 32], PortError> {
        self.public_keys.read().get(id).copied().ok_or(PortError::NotFound)
    }

    async fn reindex_account(&self, id: &AccountId) -> Result<(), PortError> {
        self.reindexed.write().push(*id);
        Ok(())
    }

    async fn get_account_diff(&self, id: &AccountId, _start: i64, _end: i64) -> Result<i64, PortError> {
        Ok(self.diffs.read().get(id).copied().unwrap_or(0))
    }
}

// =============================================================================
// EXECUTOR
// =============================================================================

/// Executor answering from canned results keyed by account and method id.
#[derive(Debug, Default)]
pub struct InMemoryMethodExecutor {
    results: RwLock<HashMap<(AccountId, i64), MethodOutcome>>,
    calls: AtomicUsize,
}

impl InMemoryMethodExecutor {
    /// Executor with no canned results.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the outcome of one method on one account.
    pub fn set_result(&self, id: AccountId, method_id: i64, exit_code: i32, stack: Vec<StackEntry>) {
        self.results
            .write()
            .insert((id, method_id), MethodOutcome { exit_code, stack });
    }

    /// Number of `run_method` calls served so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl MethodExecutor for InMemoryMethodExecutor {
    async fn run_method(
        &self,
        id: &AccountId,
        method_id: i64,
        _args: &[StackEntry],
    ) -> Result<MethodOutcome, PortError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        let results = self.results.read();
        if let Some(outcome) = results.get(&(*id, method_id)) {
            return Ok(outcome.clone());
        }
        if results.keys().any(|(account, _)| account == id) {
            // The VM's "method not found" exit code.
            Ok(MethodOutcome {
                exit_code: 11,
                stack: Vec::new(),
            })
        } else {
            Err(PortError::NotFound)
        }
    }
}

// =============================================================================
// ADDRESS BOOK
// =============================================================================

/// Address book over a map and a list of attached accounts.
#[derive(Debug, Default)]
pub struct InMemoryAddressBook {
    metadata: RwLock<HashMap<AccountId, AddressMetadata>>,
    attached: RwLock<Vec<AttachedAccount>>,
}

impl InMemoryAddressBook {
    /// Empty address book.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores metadata for an account.
    pub fn insert(&self, id: AccountId, metadata: AddressMetadata) {
        self.metadata.write().insert(id, metadata);
    }

    /// Adds a searchable entry.
    pub fn attach(&self, account: AttachedAccount) {
        self.attached.write().push(account);
    }
}

#[async_trait]
impl AddressBook for InMemoryAddressBook {
    async fn lookup(&self, id: &AccountId) -> Option<AddressMetadata> {
        self.metadata.read().get(id).cloned()
    }

    async fn search_by_prefix(&self, prefix: &str) -> Vec<AttachedAccount> {
        let prefix = prefix.to_lowercase();
        self.attached
            .read()
            .iter()
            .filter(|a| a.name.to_lowercase().starts_with(&prefix))
            .cloned()
            .collect()
    }
}

// =============================================================================
// SPAM FILTER
// =============================================================================

/// Filter over a set of blacklisted symbols.
#[derive(Debug, Default)]
pub struct InMemorySpamFilter {
    symbols: RwLock<HashSet<String>>,
}

impl InMemorySpamFilter {
    /// Filter that lets everything through.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Blacklists a symbol, compared case-insensitively.
    pub fn blacklist(&self, symbol: &str) {
        self.symbols.write().insert(symbol.to_lowercase());
    }
}

#[async_trait]
impl SpamFilter for InMemorySpamFilter {
    async fn is_blacklisted(&self, _id: &AccountId, symbol: &str) -> bool {
        self.symbols.read().contains(&symbol.to_lowercase())
    }
}

// =============================================================================
// DNS
// =============================================================================

/// Resolver over a fixed domain table.
#[derive(Debug, Default)]
pub struct InMemoryDnsResolver {
    domains: RwLock<HashMap<String, AccountId>>,
}

impl InMemoryDnsResolver {
    /// Resolver that knows no domains.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Points `domain` at `id`.
    pub fn insert(&self, domain: &str, id: AccountId) {
        self.domains.write().insert(domain.to_lowercase(), id);
    }
}

#[async_trait]
impl DnsResolver for InMemoryDnsResolver {
    async fn resolve(&self, domain: &str) -> Result<Option<AccountId>, PortError> {
        Ok(self.domains.read().get(&domain.to_lowercase()).copied())
    }
}
