//! # Decoded Result Types
//!
//! Typed shapes of well-known get-method results. Field names serialize in
//! `PascalCase` and are normalized to snake case before leaving the registry.
//! Integers wider than 64 bits are decimal strings, cells are hex bags of
//! cells and addresses use the raw `workchain:hex` form (`null` for
//! `addr_none`).

use serde::Serialize;

/// `seqno`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SeqnoResult {
    /// Current sequence number.
    pub state: u32,
}

/// `get_public_key`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetPublicKeyResult {
    /// Ed25519 public key as 64 hex characters.
    pub public_key: String,
}

/// `get_subwallet_id`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetSubwalletIdResult {
    /// Subwallet id.
    pub subwallet_id: u32,
}

/// `get_wallet_address` on a jetton master.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetWalletAddressResult {
    /// Jetton wallet of the queried owner.
    pub jetton_wallet_address: Option<String>,
}

/// `get_jetton_data`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetJettonDataResult {
    /// Total supply in base units.
    pub total_supply: String,
    /// Whether more tokens can be minted.
    pub mintable: bool,
    /// Admin address.
    pub admin_address: Option<String>,
    /// Metadata content cell.
    pub jetton_content: String,
    /// Code of the wallets this master deploys.
    pub jetton_wallet_code: String,
}

/// `get_wallet_data` on a jetton wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetWalletDataResult {
    /// Balance in base units.
    pub balance: String,
    /// Owner address.
    pub owner: Option<String>,
    /// Jetton master address.
    pub jetton: Option<String>,
    /// Wallet code.
    pub jetton_wallet_code: String,
}

/// `get_wallet_data` on wallets that expose their seqno, subwallet and key
/// in one call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetWalletDataLegacyResult {
    /// Current sequence number.
    pub seqno: u32,
    /// Subwallet id.
    pub subwallet_id: u32,
    /// Public key as 64 hex characters.
    pub public_key: String,
}

/// `get_nft_data`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetNftDataResult {
    /// Whether the item is initialized.
    pub init: bool,
    /// Index inside the collection.
    pub index: String,
    /// Collection address.
    pub collection_address: Option<String>,
    /// Owner address.
    pub owner_address: Option<String>,
    /// Item content cell.
    pub individual_content: String,
}

/// `get_collection_data`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetCollectionDataResult {
    /// Index the next minted item will get.
    pub next_item_index: String,
    /// Collection content cell.
    pub collection_content: String,
    /// Owner address.
    pub owner_address: Option<String>,
}

/// `get_nft_address_by_index`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetNftAddressByIndexResult {
    /// Item address.
    pub nft_address: Option<String>,
}

/// `royalty_params`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RoyaltyParamsResult {
    /// Royalty numerator.
    pub numerator: u16,
    /// Royalty denominator.
    pub denominator: u16,
    /// Royalty receiver.
    pub destination: Option<String>,
}

/// One installed wallet plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WalletPlugin {
    /// Plugin workchain.
    pub workchain: i32,
    /// Plugin account hash as 64 hex characters.
    pub address: String,
}

/// `get_plugin_list`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetPluginListResult {
    /// Installed plugins in list order.
    pub plugins: Vec<WalletPlugin>,
}
