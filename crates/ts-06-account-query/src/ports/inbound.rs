//! # Inbound Ports (Driving Ports)
//!
//! The query API this crate exposes to an outer transport.

use crate::domain::{
    Account, AccountDiff, AddressParseRecord, ContractInspection, FoundAccount,
    MethodExecutionResult, PublicKeyRecord, RawAccountState,
};
use crate::errors::QueryError;
use async_trait::async_trait;

/// Read and execute access to accounts.
///
/// Every operation takes address text as the caller supplied it: raw,
/// friendly, or a domain name when a resolver is wired in.
#[async_trait]
pub trait AccountQueryApi: Send + Sync {
    /// Parses an address and returns all of its renderings.
    ///
    /// # Errors
    ///
    /// `InvalidAddress` for unparsable or unresolvable text.
    async fn parse_address(&self, text: &str) -> Result<AddressParseRecord, QueryError>;

    /// Account state exactly as storage holds it.
    ///
    /// # Errors
    ///
    /// `NotFound` when storage never saw the account.
    async fn get_raw_account(&self, text: &str) -> Result<RawAccountState, QueryError>;

    /// Account view enriched with address-book metadata. Unknown accounts
    /// come back as a `nonexist` placeholder.
    ///
    /// # Errors
    ///
    /// `InvalidAddress` or `Upstream`.
    async fn get_account(&self, text: &str) -> Result<Account, QueryError>;

    /// Batch form of [`get_account`](Self::get_account). Each distinct id is
    /// returned once, in order of first appearance.
    ///
    /// Entries naming the same account, such as its raw and friendly forms,
    /// collapse into one result, so the output can be shorter than `texts`
    /// and positions need not line up with the request. Match results by
    /// [`Account::address`]. The batch limit applies to `texts` before
    /// duplicates are removed.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for an empty or oversized batch, `InvalidAddress` for
    /// the first bad id.
    async fn get_accounts(&self, texts: &[String]) -> Result<Vec<Account>, QueryError>;

    /// Runs a get method with textual arguments.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` naming the first bad argument, before the executor
    /// is called; `NotFound` when the account does not exist.
    async fn exec_get_method(
        &self,
        text: &str,
        method: &str,
        args: &[String],
    ) -> Result<MethodExecutionResult, QueryError>;

    /// Static view of an account's code.
    ///
    /// # Errors
    ///
    /// `UnexpectedCellCount` when the code is not a single-root bag of cells.
    async fn inspect_account(&self, text: &str) -> Result<ContractInspection, QueryError>;

    /// Public key of a wallet account.
    ///
    /// # Errors
    ///
    /// `UnknownWalletLayout` when storage has no key indexed and the code is
    /// not a known wallet.
    async fn get_account_public_key(&self, text: &str) -> Result<PublicKeyRecord, QueryError>;

    /// Address-book entries whose name starts with `prefix`.
    ///
    /// # Errors
    ///
    /// Never fails on address-book content; malformed entries are skipped.
    async fn search_accounts(&self, prefix: &str) -> Result<Vec<FoundAccount>, QueryError>;

    /// Asks storage to reindex the account.
    ///
    /// # Errors
    ///
    /// `InvalidAddress` or `Upstream`.
    async fn reindex_account(&self, text: &str) -> Result<(), QueryError>;

    /// Balance change between two unix times.
    ///
    /// # Errors
    ///
    /// `InvalidInput` when `start` is after `end`.
    async fn get_account_diff(&self, text: &str, start: i64, end: i64) -> Result<AccountDiff, QueryError>;
}
