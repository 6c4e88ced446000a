//! # Known Get Methods
//!
//! Well-known get-method names keyed by method id, used to label the ids
//! found in a dispatch table. Ids without a catalog entry stay unlabelled.

use std::collections::HashMap;
use std::sync::LazyLock;
use ts_04_method_decoders::method_id;

/// Get methods from the wallet, jetton, NFT, DNS and staking standards.
const KNOWN_METHOD_NAMES: &[&str] = &[
    // Wallets
    "seqno",
    "get_public_key",
    "get_subwallet_id",
    "get_plugin_list",
    "is_plugin_installed",
    "get_extensions",
    "is_signature_allowed",
    "processed?",
    "get_wallet_data",
    // Jettons
    "get_jetton_data",
    "get_wallet_address",
    "get_status",
    // NFT
    "get_nft_data",
    "get_collection_data",
    "get_nft_address_by_index",
    "get_nft_content",
    "royalty_params",
    "get_authority_address",
    "get_revoked_time",
    "get_editor",
    // DNS and auctions
    "dnsresolve",
    "get_domain",
    "get_full_domain",
    "get_last_fill_up_time",
    "get_telemint_token_name",
    "get_telemint_auction_state",
    "get_telemint_auction_config",
    "get_sale_data",
    // Subscriptions and staking
    "get_subscription_data",
    "get_pool_data",
    "get_nominator_data",
    "get_lockup_data",
    "get_staking_status",
    "get_pool_full_data",
    "list_nominators",
    "get_member",
];

/// Method id to name, built on first use.
pub static KNOWN_METHODS: LazyLock<HashMap<i64, &'static str>> = LazyLock::new(|| {
    KNOWN_METHOD_NAMES
        .iter()
        .map(|&name| (method_id(name), name))
        .collect()
});

/// Name of the well-known method with id `id`.
#[must_use]
pub fn known_method_name(id: i64) -> Option<&'static str> {
    KNOWN_METHODS.get(&id).copied()
}
