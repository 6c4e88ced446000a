//! # Query Flows
//!
//! [`AccountQueryService`](ts_06_account_query::AccountQueryService) over the
//! in-memory ports, driven through the inbound API the way a transport would.

#[cfg(test)]
mod tests {
    use super::super::fixtures::{
        account, boc_bytes, dispatch_code, wallet_v4_data, Harness, WALLET_FRIENDLY, WALLET_RAW,
    };
    use serde_json::json;
    use std::sync::Arc;
    use ts_01_address_codec::AccountId;
    use ts_02_cell_codec::{boc, BocOptions, Cell};
    use ts_03_stack_codec::StackEntry;
    use ts_04_method_decoders::method_id;
    use ts_05_bytecode_introspection::{WalletRegistry, WalletVersion};
    use ts_06_account_query::{
        AccountQueryApi, AccountStatus, AddressMetadata, AttachedAccount, ErrorClass,
        QueryConfig, QueryError, RawAccountState,
    };

    fn wallet() -> AccountId {
        WALLET_RAW.parse().expect("raw address")
    }

    // =========================================================================
    // ADDRESS AND ACCOUNT LOOKUP
    // =========================================================================

    #[tokio::test]
    async fn test_friendly_and_raw_reach_the_same_account() -> anyhow::Result<()> {
        let h = Harness::new(QueryConfig::default())?;
        h.storage
            .insert(RawAccountState::new(wallet(), AccountStatus::Active).with_balance(5));

        let by_friendly = h.service.get_account(WALLET_FRIENDLY).await?;
        let by_raw = h.service.get_account(WALLET_RAW).await?;
        assert_eq!(by_friendly, by_raw);
        assert_eq!(by_raw.address, WALLET_RAW);
        assert_eq!(by_raw.balance, 5);

        let record = h.service.parse_address(WALLET_FRIENDLY).await?;
        assert_eq!(
            serde_json::to_value(&record)?["non_bounceable"]["b64url"],
            json!("UQD2NmD_lH5f5u1Kj3KfGyTvhZSX0Eg6qp2a5IQUKXxOGzCi")
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_domain_reaches_the_resolved_account() -> anyhow::Result<()> {
        let h = Harness::new(QueryConfig::default())?;
        h.dns.insert("foundation.ton", wallet());
        h.storage
            .insert(RawAccountState::new(wallet(), AccountStatus::Active).with_balance(9));
        h.address_book.insert(
            wallet(),
            AddressMetadata {
                name: Some("Foundation".into()),
                ..AddressMetadata::default()
            },
        );

        let account = h.service.get_account("foundation.ton").await?;
        assert_eq!(account.address, WALLET_RAW);
        assert_eq!(account.name.as_deref(), Some("Foundation"));
        Ok(())
    }

    #[tokio::test]
    async fn test_batch_returns_every_distinct_request() -> anyhow::Result<()> {
        let h = Harness::new(QueryConfig::default())?;
        for byte in [2u8, 4] {
            h.storage.insert(
                RawAccountState::new(account(byte), AccountStatus::Active)
                    .with_balance(u64::from(byte) * 100),
            );
        }

        // Five requested ids, four distinct, two stored.
        let request: Vec<String> = [1u8, 2, 3, 4, 2].iter().map(|&b| account(b).to_raw()).collect();
        let accounts = h.service.get_accounts(&request).await?;

        assert_eq!(accounts.len(), 4);
        let statuses: Vec<AccountStatus> = accounts.iter().map(|a| a.status).collect();
        assert_eq!(
            statuses,
            vec![
                AccountStatus::Nonexist,
                AccountStatus::Active,
                AccountStatus::Nonexist,
                AccountStatus::Active
            ]
        );
        assert_eq!(accounts[3].balance, 400);
        Ok(())
    }

    // =========================================================================
    // GET METHODS
    // =========================================================================

    #[tokio::test]
    async fn test_unparsable_argument_stops_before_execution() -> anyhow::Result<()> {
        let h = Harness::new(QueryConfig::default())?;
        h.executor
            .set_result(wallet(), method_id("seqno"), 0, vec![StackEntry::int(1)]);

        let err = h
            .service
            .exec_get_method(WALLET_RAW, "seqno", &["abc".to_string()])
            .await
            .unwrap_err();
        assert_eq!(err.class(), ErrorClass::InvalidInput);
        assert_eq!(err.status_code(), 400);
        assert!(err.to_string().contains("abc"));
        assert_eq!(h.executor.calls(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_jetton_wallet_data_round_trip() -> anyhow::Result<()> {
        let h = Harness::new(QueryConfig::default())?;
        let owner = account(1);
        let master = account(2);
        h.executor.set_result(
            wallet(),
            method_id("get_wallet_data"),
            0,
            vec![
                StackEntry::int(250u32),
                StackEntry::address(&owner)?,
                StackEntry::address(&master)?,
                StackEntry::Cell(Arc::new(Cell::empty())),
            ],
        );

        let result = h
            .service
            .exec_get_method(WALLET_FRIENDLY, "get_wallet_data", &[])
            .await?;
        assert!(result.success);
        assert_eq!(result.stack.len(), 4);
        let decoded = result.decoded.as_ref().expect("jetton wallet decoder applies");
        assert_eq!(decoded["balance"], json!("250"));
        assert_eq!(decoded["owner"], json!(owner.to_raw()));
        assert_eq!(decoded["jetton"], json!(master.to_raw()));

        let body = serde_json::to_value(&result)?;
        assert_eq!(body["stack"][0], json!({"type": "num", "num": "250"}));
        assert_eq!(body["exit_code"], json!(0));
        Ok(())
    }

    #[tokio::test]
    async fn test_undecodable_result_omits_decoded() -> anyhow::Result<()> {
        let h = Harness::new(QueryConfig::default())?;
        h.executor
            .set_result(wallet(), method_id("get_balance"), 0, vec![StackEntry::int(1)]);

        let result = h
            .service
            .exec_get_method(WALLET_RAW, "get_balance", &["0x01".to_string(), "Null".to_string()])
            .await?;
        assert!(result.decoded.is_none());
        let body = serde_json::to_value(&result)?;
        assert!(body.get("decoded").is_none());
        Ok(())
    }

    // =========================================================================
    // INSPECTION AND KEYS
    // =========================================================================

    #[tokio::test]
    async fn test_wallet_inspection_and_key() -> anyhow::Result<()> {
        let code = dispatch_code(&[
            method_id("seqno"),
            method_id("get_public_key"),
            method_id("get_subwallet_id"),
            method_id("get_plugin_list"),
        ])?;
        let data = wallet_v4_data(12, 698_983_191, [0x5A; 32])?;
        let h = Harness::new(QueryConfig::default())?;
        h.storage.insert(
            RawAccountState::new(wallet(), AccountStatus::Active)
                .with_code_and_data(boc_bytes(&code)?, boc_bytes(&data)?),
        );

        let inspection = h.service.inspect_account(WALLET_FRIENDLY).await?;
        assert_eq!(inspection.code_hash, code.hash_hex());
        let mut names: Vec<&str> = inspection.methods.iter().map(|m| m.method.as_str()).collect();
        names.sort_unstable();
        assert_eq!(
            names,
            vec!["get_plugin_list", "get_public_key", "get_subwallet_id", "seqno"]
        );

        let service = h
            .service
            .with_wallets(Arc::new(WalletRegistry::with_entries([(
                *code.hash(),
                WalletVersion::V4R2,
            )])));
        let key = service.get_account_public_key(WALLET_RAW).await?;
        assert_eq!(key.public_key, "5a".repeat(32));
        Ok(())
    }

    #[tokio::test]
    async fn test_two_root_code_is_rejected() -> anyhow::Result<()> {
        let h = Harness::new(QueryConfig::default())?;
        let first = dispatch_code(&[method_id("seqno")])?;
        let second = Arc::new(Cell::empty());
        let code = boc::serialize(&[first, second], BocOptions::default())?;
        h.storage.insert(
            RawAccountState::new(wallet(), AccountStatus::Active).with_code_and_data(code, Vec::new()),
        );

        let err = h.service.inspect_account(WALLET_RAW).await.unwrap_err();
        assert_eq!(err, QueryError::UnexpectedCellCount(2));
        assert_eq!(err.class(), ErrorClass::DataIntegrity);
        Ok(())
    }

    // =========================================================================
    // SEARCH
    // =========================================================================

    #[tokio::test]
    async fn test_search_hides_blacklisted_tokens() -> anyhow::Result<()> {
        let h = Harness::new(QueryConfig::default())?;
        let entry = |wallet: String, name: &str, symbol: &str| AttachedAccount {
            wallet,
            name: name.into(),
            preview: String::new(),
            symbol: symbol.into(),
        };
        h.address_book.attach(entry(WALLET_FRIENDLY.into(), "Ton Foundation", ""));
        h.address_book.attach(entry(account(7).to_raw(), "Ton Scam Coin", "TSC"));
        h.address_book.attach(entry(WALLET_RAW.into(), "Ton Foundation Mirror", ""));
        h.spam_filter.blacklist("TSC");

        let found = h.service.search_accounts("ton").await?;
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].address, WALLET_RAW);
        assert_eq!(h.service.stats().queries, 1);
        Ok(())
    }
}
