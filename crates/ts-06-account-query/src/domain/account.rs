//! # Account Entities
//!
//! Account state as the storage port reports it, and the enriched view the
//! query API returns.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use ts_01_address_codec::AccountId;

/// Lifecycle state of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    /// Deployed, code and data present.
    Active,
    /// Has a balance but no code.
    Uninit,
    /// Frozen for unpaid storage.
    Frozen,
    /// Never seen on chain.
    #[default]
    Nonexist,
}

impl AccountStatus {
    /// Lowercase status name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Uninit => "uninit",
            Self::Frozen => "frozen",
            Self::Nonexist => "nonexist",
        }
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Storage usage counters of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StorageStats {
    /// Cells used by code, data and libraries.
    pub used_cells: u64,
    /// Bits used by code, data and libraries.
    pub used_bits: u64,
    /// Cells shared with public libraries.
    pub used_public_cells: u64,
    /// Unix time storage fees were last paid.
    pub last_paid: i64,
    /// Storage fees owed, in nanotons.
    pub due_payment: u64,
}

/// Account state as returned by the storage port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawAccountState {
    /// Account address.
    pub account: AccountId,
    /// Lifecycle state.
    pub status: AccountStatus,
    /// Balance in nanotons.
    pub balance: u64,
    /// Extra currency balances by currency id, as decimal strings.
    pub extra_balances: BTreeMap<u32, String>,
    /// Code as a bag of cells.
    #[serde(with = "super::hex_bytes::option")]
    pub code: Option<Vec<u8>>,
    /// Data as a bag of cells.
    #[serde(with = "super::hex_bytes::option")]
    pub data: Option<Vec<u8>>,
    /// Logical time of the last transaction.
    pub last_transaction_lt: u64,
    /// Hash of the last transaction.
    #[serde(with = "hex::serde")]
    pub last_transaction_hash: [u8; 32],
    /// State hash a frozen account can be revived with.
    #[serde(with = "super::hex_bytes::option_array")]
    pub frozen_hash: Option<[u8; 32]>,
    /// Unix time of the last activity.
    pub last_activity: i64,
    /// Storage usage.
    pub storage: StorageStats,
    /// Interfaces detected on the contract.
    pub interfaces: Vec<String>,
    /// Get methods the contract exposes by name.
    pub get_methods: Vec<String>,
}

impl RawAccountState {
    /// An empty active account, for building fixtures.
    #[must_use]
    pub fn new(account: AccountId, status: AccountStatus) -> Self {
        Self {
            account,
            status,
            balance: 0,
            extra_balances: BTreeMap::new(),
            code: None,
            data: None,
            last_transaction_lt: 0,
            last_transaction_hash: [0; 32],
            frozen_hash: None,
            last_activity: 0,
            storage: StorageStats::default(),
            interfaces: Vec::new(),
            get_methods: Vec::new(),
        }
    }

    /// Sets the balance.
    #[must_use]
    pub fn with_balance(mut self, balance: u64) -> Self {
        self.balance = balance;
        self
    }

    /// Sets the code and data bags of cells.
    #[must_use]
    pub fn with_code_and_data(mut self, code: Vec<u8>, data: Vec<u8>) -> Self {
        self.code = Some(code);
        self.data = Some(data);
        self
    }

    /// Sets the detected interfaces.
    #[must_use]
    pub fn with_interfaces<I, S>(mut self, interfaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.interfaces = interfaces.into_iter().map(Into::into).collect();
        self
    }
}

/// Address-book knowledge about an account.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AddressMetadata {
    /// Human readable name.
    pub name: Option<String>,
    /// Icon URL.
    pub image: Option<String>,
    /// Known scam account.
    pub is_scam: bool,
    /// Transfers must carry a comment.
    pub require_memo: bool,
    /// Account is suspended by its operator.
    pub is_suspended: bool,
}

/// Account view returned by the query API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Raw address.
    pub address: String,
    /// Balance in nanotons.
    pub balance: u64,
    /// Unix time of the last activity.
    pub last_activity: i64,
    /// Lifecycle state.
    pub status: AccountStatus,
    /// Interfaces detected on the contract.
    pub interfaces: Vec<String>,
    /// Address-book name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Known scam account.
    pub is_scam: bool,
    /// Address-book icon.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Transfers must carry a comment.
    pub memo_required: bool,
    /// Get methods the contract exposes by name.
    pub get_methods: Vec<String>,
    /// Account is suspended by its operator.
    pub is_suspended: bool,
    /// Contract implements a wallet interface.
    pub is_wallet: bool,
}

impl Account {
    /// Placeholder for an account storage has never seen.
    #[must_use]
    pub fn nonexist(id: &AccountId) -> Self {
        Self {
            address: id.to_raw(),
            balance: 0,
            last_activity: 0,
            status: AccountStatus::Nonexist,
            interfaces: Vec::new(),
            name: None,
            is_scam: false,
            icon: None,
            memo_required: false,
            get_methods: Vec::new(),
            is_suspended: false,
            is_wallet: false,
        }
    }

    /// Builds the view from storage state and optional address-book data.
    #[must_use]
    pub fn from_state(state: &RawAccountState, metadata: Option<&AddressMetadata>) -> Self {
        let is_wallet = state.interfaces.iter().any(|i| i.starts_with("wallet"));
        let mut account = Self {
            address: state.account.to_raw(),
            balance: state.balance,
            last_activity: state.last_activity,
            status: state.status,
            interfaces: state.interfaces.clone(),
            get_methods: state.get_methods.clone(),
            is_wallet,
            ..Self::nonexist(&state.account)
        };
        if let Some(meta) = metadata {
            account.name.clone_from(&meta.name);
            account.icon.clone_from(&meta.image);
            account.is_scam = meta.is_scam;
            account.memo_required = meta.require_memo;
            account.is_suspended = meta.is_suspended;
        }
        account
    }
}

/// An address-book entry matched by a name prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachedAccount {
    /// Address text as the address book stores it.
    pub wallet: String,
    /// Display name.
    pub name: String,
    /// Preview image URL.
    pub preview: String,
    /// Token symbol, empty for non-token accounts.
    pub symbol: String,
}

/// A search hit returned by the query API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoundAccount {
    /// Raw address.
    pub address: String,
    /// Display name.
    pub name: String,
    /// Preview image URL.
    pub preview: String,
}

/// Balance change of an account over a time window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountDiff {
    /// Change in nanotons; negative when the balance went down.
    pub balance_change: i64,
}
