//! # Decoder Registry
//!
//! Maps get-method names to an ordered list of decoders. Decoding tries the
//! list in order; the first decoder that recognizes the stack wins and its
//! output keys are normalized to snake case.

use crate::decoders;
use crate::errors::DecodeError;
use crate::method_id::method_id;
use crate::normalize::normalize_keys;
use std::collections::HashMap;
use tracing::debug;
use ts_03_stack_codec::StackEntry;

/// Result of offering a stack to one decoder.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodeOutcome {
    /// The decoder recognized the leading `consumed` entries.
    Decoded {
        /// Number of stack entries read.
        consumed: usize,
        /// Value with the decoder's own key casing.
        value: serde_json::Value,
    },
    /// The stack does not have this decoder's shape.
    NotApplicable,
}

/// A pure stack decoder.
pub type DecoderFn = fn(&[StackEntry]) -> Result<DecodeOutcome, DecodeError>;

/// A decoder with the name it reports on success.
#[derive(Debug, Clone, Copy)]
pub struct NamedDecoder {
    /// Result type name, e.g. `GetWalletDataResult`.
    pub name: &'static str,
    /// Decoder function.
    pub decode: DecoderFn,
}

impl NamedDecoder {
    /// Pairs a result name with its decoder.
    #[must_use]
    pub const fn new(name: &'static str, decode: DecoderFn) -> Self {
        Self { name, decode }
    }
}

/// A successfully decoded result.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedValue {
    /// Name of the decoder that produced the value.
    pub decoder: &'static str,
    /// Number of stack entries read.
    pub consumed: usize,
    /// Value with snake case keys.
    pub value: serde_json::Value,
}

/// Decoders registered for one method.
#[derive(Debug, Clone)]
pub struct MethodDecoders {
    /// Method name.
    pub name: String,
    /// Method id derived from the name.
    pub method_id: i64,
    /// Decoders in priority order.
    pub decoders: Vec<NamedDecoder>,
}

// =============================================================================
// BUILT-IN TABLE
// =============================================================================

const BUILTIN: &[(&str, &[NamedDecoder])] = &[
    ("seqno", &[NamedDecoder::new("SeqnoResult", decoders::seqno)]),
    (
        "get_public_key",
        &[NamedDecoder::new("GetPublicKeyResult", decoders::get_public_key)],
    ),
    (
        "get_subwallet_id",
        &[NamedDecoder::new("GetSubwalletIdResult", decoders::get_subwallet_id)],
    ),
    (
        "get_wallet_address",
        &[NamedDecoder::new("GetWalletAddressResult", decoders::get_wallet_address)],
    ),
    (
        "get_jetton_data",
        &[NamedDecoder::new("GetJettonDataResult", decoders::get_jetton_data)],
    ),
    (
        "get_wallet_data",
        &[
            NamedDecoder::new("GetWalletDataResult", decoders::get_jetton_wallet_data),
            NamedDecoder::new("GetWalletDataLegacyResult", decoders::get_wallet_data_legacy),
        ],
    ),
    (
        "get_nft_data",
        &[NamedDecoder::new("GetNftDataResult", decoders::get_nft_data)],
    ),
    (
        "get_collection_data",
        &[NamedDecoder::new("GetCollectionDataResult", decoders::get_collection_data)],
    ),
    (
        "get_nft_address_by_index",
        &[NamedDecoder::new(
            "GetNftAddressByIndexResult",
            decoders::get_nft_address_by_index,
        )],
    ),
    (
        "royalty_params",
        &[NamedDecoder::new("RoyaltyParamsResult", decoders::royalty_params)],
    ),
    (
        "get_plugin_list",
        &[NamedDecoder::new("GetPluginListResult", decoders::get_plugin_list)],
    ),
];

// =============================================================================
// REGISTRY
// =============================================================================

/// Immutable method-name to decoders table. Build once, share by `Arc`.
#[derive(Debug, Clone)]
pub struct DecoderRegistry {
    methods: HashMap<String, MethodDecoders>,
    by_id: HashMap<i64, String>,
}

impl Default for DecoderRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        for (name, list) in BUILTIN {
            for decoder in *list {
                registry.register(name, *decoder);
            }
        }
        registry
    }
}

impl DecoderRegistry {
    /// A registry with no decoders.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            methods: HashMap::new(),
            by_id: HashMap::new(),
        }
    }

    /// Appends `decoder` to the end of `method`'s list.
    pub fn register(&mut self, method: &str, decoder: NamedDecoder) -> &mut Self {
        let id = method_id(method);
        self.by_id.insert(id, method.to_string());
        self.methods
            .entry(method.to_string())
            .or_insert_with(|| MethodDecoders {
                name: method.to_string(),
                method_id: id,
                decoders: Vec::new(),
            })
            .decoders
            .push(decoder);
        self
    }

    /// Decoders registered for `method`.
    #[must_use]
    pub fn get(&self, method: &str) -> Option<&MethodDecoders> {
        self.methods.get(method)
    }

    /// Decoders registered for the method with id `id`.
    #[must_use]
    pub fn get_by_id(&self, id: i64) -> Option<&MethodDecoders> {
        self.by_id.get(&id).and_then(|name| self.methods.get(name))
    }

    /// True when `method` has at least one decoder.
    #[must_use]
    pub fn has_decoder(&self, method: &str) -> bool {
        self.methods.contains_key(method)
    }

    /// Registered method names, sorted.
    #[must_use]
    pub fn method_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.methods.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Decodes the result stack of `method`.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::NoDecoder`] when the method is unknown or no
    /// decoder recognized the stack. Individual decoder failures are logged
    /// and skipped.
    pub fn decode(&self, method: &str, stack: &[StackEntry]) -> Result<DecodedValue, DecodeError> {
        let no_decoder = || DecodeError::NoDecoder(method.to_string());
        let entry = self.methods.get(method).ok_or_else(no_decoder)?;

        for decoder in &entry.decoders {
            match (decoder.decode)(stack) {
                Ok(DecodeOutcome::Decoded { consumed, value }) => {
                    debug!(method, decoder = decoder.name, consumed, "stack decoded");
                    return Ok(DecodedValue {
                        decoder: decoder.name,
                        consumed,
                        value: normalize_keys(value),
                    });
                }
                Ok(DecodeOutcome::NotApplicable) => {}
                Err(err) => {
                    debug!(method, decoder = decoder.name, error = %err, "decoder failed");
                }
            }
        }
        Err(no_decoder())
    }
}
