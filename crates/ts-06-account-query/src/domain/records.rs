//! # Query Results
//!
//! Records returned by the query operations other than account lookups.

use serde::{Deserialize, Serialize};
use ts_01_address_codec::{AddressForm, FriendlyPair};
use ts_03_stack_codec::TvmStackRecord;

/// Every rendering of a parsed address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressParseRecord {
    /// `workchain:hex` form.
    pub raw_form: String,
    /// Bounceable friendly forms.
    pub bounceable: FriendlyPair,
    /// Non-bounceable friendly forms.
    pub non_bounceable: FriendlyPair,
    /// Shape of the text the caller supplied.
    pub given_type: AddressForm,
    /// The supplied friendly form carried the testnet-only flag.
    pub test_only: bool,
}

/// Exit codes 0 and 1 both mean the compute phase finished normally.
#[must_use]
pub const fn is_clean_exit(exit_code: i32) -> bool {
    matches!(exit_code, 0 | 1)
}

/// Outcome of running a get method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodExecutionResult {
    /// [`is_clean_exit`] of `exit_code`.
    pub success: bool,
    /// VM exit code.
    pub exit_code: i32,
    /// Result stack, first return value first.
    pub stack: Vec<TvmStackRecord>,
    /// Typed value when a decoder recognized the stack.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decoded: Option<serde_json::Value>,
}

/// A get method found in contract code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InspectedMethod {
    /// Method id.
    pub id: i64,
    /// Well-known method name.
    pub method: String,
}

/// Language the contract was compiled from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Compiler {
    /// FunC.
    Func,
}

/// Static view of a contract's code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractInspection {
    /// Code as a hex bag of cells.
    pub code: String,
    /// Hex representation hash of the code root.
    pub code_hash: String,
    /// Well-known methods found in the dispatch table, by id.
    pub methods: Vec<InspectedMethod>,
    /// Source language.
    pub compiler: Compiler,
}

/// Public key of a wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKeyRecord {
    /// Ed25519 public key as 64 hex characters.
    pub public_key: String,
}
