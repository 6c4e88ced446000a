//! # Codec Flows
//!
//! The address, cell, stack, decoder and introspection crates chained end to
//! end, without the query service in between.

#[cfg(test)]
mod tests {
    use super::super::fixtures::{dispatch_code, wallet_v4_data, WALLET_FRIENDLY, WALLET_RAW};
    use proptest::prelude::*;
    use serde_json::json;
    use std::sync::Arc;
    use ts_01_address_codec::{parse, AccountId, AddressForm, FriendlyFlags};
    use ts_02_cell_codec::{boc, BocOptions, Cell, CellBuilder};
    use ts_03_stack_codec::{decode_stack, encode_stack, parse_arguments, render_stack, StackEntry};
    use ts_04_method_decoders::{method_id, DecoderRegistry};
    use ts_05_bytecode_introspection::{
        extract_method_ids, known_method_name, scan_dispatch, DispatchTable, WalletRegistry,
        WalletVersion,
    };

    // =========================================================================
    // ADDRESSES
    // =========================================================================

    #[test]
    fn test_bounceable_scenario() {
        let parsed = parse(WALLET_FRIENDLY).expect("friendly address");
        assert_eq!(parsed.form, AddressForm::FriendlyBounceable);
        assert!(parsed.bounceable);
        assert_eq!(parsed.id.to_raw(), WALLET_RAW);

        let renderings = parsed.id.render();
        assert_eq!(renderings.bounceable.b64url, WALLET_FRIENDLY);
        assert_eq!(
            renderings.non_bounceable.b64url,
            "UQD2NmD_lH5f5u1Kj3KfGyTvhZSX0Eg6qp2a5IQUKXxOGzCi"
        );

        let again = parse(&renderings.non_bounceable.b64url).expect("non-bounceable form");
        assert_eq!(again.form, AddressForm::FriendlyNonBounceable);
        assert_eq!(again.id, parsed.id);
    }

    #[test]
    fn test_address_argument_reaches_decoder_as_raw() {
        // An address passed as an argument comes back out of a decoder in raw form.
        let stack = parse_arguments(&[WALLET_FRIENDLY]).expect("address argument");
        let decoded = DecoderRegistry::default()
            .decode("get_wallet_address", &stack)
            .expect("decoded");
        assert_eq!(decoded.value, json!({ "jetton_wallet_address": WALLET_RAW }));
    }

    proptest! {
        #[test]
        fn prop_every_rendering_parses_back(
            workchain in prop_oneof![Just(-1i8), Just(0i8)],
            hash in any::<[u8; 32]>(),
            testnet in any::<bool>(),
        ) {
            let id = AccountId::new(workchain, hash);
            let renderings = id.render();
            let texts = [
                renderings.raw_form.clone(),
                renderings.bounceable.b64.clone(),
                renderings.bounceable.b64url.clone(),
                renderings.non_bounceable.b64.clone(),
                renderings.non_bounceable.b64url.clone(),
            ];
            for text in &texts {
                prop_assert_eq!(parse(text).unwrap().id, id);
            }

            let flags = FriendlyFlags { bounceable: false, testnet_only: testnet };
            let parsed = parse(&id.to_friendly(flags, true)).unwrap();
            prop_assert_eq!(parsed.testnet_only, testnet);
            prop_assert!(!parsed.bounceable);
        }
    }

    // =========================================================================
    // CELLS
    // =========================================================================

    fn sample_tree() -> Arc<Cell> {
        let mut leaf = CellBuilder::new();
        leaf.store_uint(32, 0xDEAD_BEEF).unwrap();
        let leaf = Arc::new(leaf.build().unwrap());

        let mut middle = CellBuilder::new();
        middle.store_bit(true).unwrap().store_ref(leaf.clone()).unwrap();
        let middle = Arc::new(middle.build().unwrap());

        let mut root = CellBuilder::new();
        root.store_uint(8, 42)
            .unwrap()
            .store_ref(middle)
            .unwrap()
            .store_ref(leaf)
            .unwrap();
        Arc::new(root.build().unwrap())
    }

    #[test]
    fn test_boc_round_trip_is_byte_exact() {
        for options in [
            BocOptions::default(),
            BocOptions {
                with_index: true,
                with_crc: true,
            },
            BocOptions {
                with_index: false,
                with_crc: false,
            },
        ] {
            let bytes = boc::serialize(&[sample_tree()], options).unwrap();
            let roots = boc::deserialize(&bytes).unwrap();
            assert_eq!(roots.len(), 1);
            assert_eq!(boc::serialize(&roots, options).unwrap(), bytes);
        }
    }

    #[test]
    fn test_shared_subtree_is_stored_once() {
        let bytes = boc::serialize_single(&sample_tree()).unwrap();
        // magic, flags, off_bytes, then a one-byte cell count.
        assert_eq!(bytes[6], 3);
    }

    #[test]
    fn test_hash_is_independent_of_construction() {
        let first = sample_tree();
        let second = sample_tree();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(first.hash(), second.hash());

        let decoded = boc::deserialize_single(&boc::serialize_single(&first).unwrap()).unwrap();
        assert_eq!(decoded.hash(), first.hash());
    }

    // =========================================================================
    // STACK VALUES
    // =========================================================================

    #[test]
    fn test_arguments_survive_vm_stack_encoding() {
        let tokens = [
            "7",
            "-0x10",
            "Null",
            "NaN",
            WALLET_FRIENDLY,
            "b5ee9c724101010100020000004cacb9cd",
        ];
        let stack = parse_arguments(&tokens).unwrap();

        let cell = Arc::new(encode_stack(&stack).unwrap());
        let shipped = boc::deserialize_single(&boc::serialize_single(&cell).unwrap()).unwrap();
        let received = decode_stack(&shipped).unwrap();

        assert_eq!(render_stack(&received).unwrap(), render_stack(&stack).unwrap());
    }

    // =========================================================================
    // DECODERS
    // =========================================================================

    fn jetton_wallet_stack() -> Vec<StackEntry> {
        let owner = AccountId::new(0, [1; 32]);
        let master = AccountId::new(0, [2; 32]);
        vec![
            StackEntry::int(1_000_000_000u64),
            StackEntry::address(&owner).unwrap(),
            StackEntry::address(&master).unwrap(),
            StackEntry::Cell(Arc::new(Cell::empty())),
        ]
    }

    #[test]
    fn test_decoding_is_deterministic() {
        let stack = jetton_wallet_stack();
        let first = DecoderRegistry::default()
            .decode("get_wallet_data", &stack)
            .unwrap();
        let second = DecoderRegistry::default()
            .decode("get_wallet_data", &stack)
            .unwrap();
        assert_eq!(first.value, second.value);
        assert_eq!(first.consumed, 4);
        assert_eq!(
            first.value,
            json!({
                "balance": "1000000000",
                "owner": AccountId::new(0, [1; 32]).to_raw(),
                "jetton": AccountId::new(0, [2; 32]).to_raw(),
                "jetton_wallet_code": "b5ee9c724101010100020000004cacb9cd",
            })
        );
    }

    #[test]
    fn test_legacy_wallet_data_falls_through() {
        let stack = vec![StackEntry::int(5), StackEntry::int(698_983_191), StackEntry::int(9)];
        let decoded = DecoderRegistry::default()
            .decode("get_wallet_data", &stack)
            .unwrap();
        assert_eq!(decoded.value["seqno"], json!(5));
        assert_eq!(decoded.value["subwallet_id"], json!(698_983_191));
    }

    // =========================================================================
    // INTROSPECTION
    // =========================================================================

    #[test]
    fn test_dispatch_scan_labels_catalog_methods() {
        let ids = [
            method_id("seqno"),
            method_id("get_public_key"),
            method_id("get_plugin_list"),
            12_345,
        ];
        let code = dispatch_code(&ids).unwrap();
        let shipped = boc::deserialize_single(&boc::serialize_single(&code).unwrap()).unwrap();

        let found = extract_method_ids(&shipped);
        assert_eq!(found.len(), 4);
        let named: Vec<&str> = found.iter().filter_map(|&id| known_method_name(id)).collect();
        assert_eq!(named.len(), 3);
        assert!(named.contains(&"get_plugin_list"));

        assert_eq!(
            scan_dispatch(&Arc::new(Cell::empty())).unwrap(),
            DispatchTable::Unrecognized
        );
    }

    #[test]
    fn test_public_key_from_registered_wallet() {
        let code = dispatch_code(&[method_id("seqno")]).unwrap();
        let wallets = WalletRegistry::with_entries([(*code.hash(), WalletVersion::V4R2)]);
        let data = wallet_v4_data(3, 698_983_191, [0xAB; 32]).unwrap();

        assert_eq!(wallets.detect_wallet_version(code.hash()), Some(WalletVersion::V4R2));
        assert_eq!(wallets.extract_public_key(&code, &data).unwrap(), [0xAB; 32]);
        assert!(WalletRegistry::default()
            .extract_public_key(&code, &data)
            .is_err());
    }
}
