//! # Account Query Service
//!
//! Implements [`AccountQueryApi`] over the outbound ports. The service owns
//! no account data; its only mutable state is the query statistics.
//!
//! ## Flow of `exec_get_method`
//!
//! ```text
//! text args ──parse (atomic)──► StackEntry ──► MethodExecutor
//!                                                  │
//!          MethodExecutionResult ◄── render + decode ◄┘
//! ```

use crate::config::{ConfigError, QueryConfig};
use crate::domain::{
    is_clean_exit, Account, AccountDiff, AddressParseRecord, Compiler, ContractInspection,
    FoundAccount, InspectedMethod, MethodExecutionResult, PublicKeyRecord, RawAccountState,
};
use crate::errors::QueryError;
use crate::ports::{
    AccountQueryApi, AccountStorage, AddressBook, DnsResolver, MethodExecutor, PortError,
    SpamFilter,
};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, instrument, warn};
use ts_01_address_codec::{AccountId, AddressError, AddressForm, ParsedAddress};
use ts_02_cell_codec::{boc, Cell, CellError};
use ts_03_stack_codec::{parse_arguments, render_stack, StackError};
use ts_04_method_decoders::{method_id, DecoderRegistry};
use ts_05_bytecode_introspection::{extract_method_ids, known_method_name, WalletRegistry};

/// Collaborators the service is wired to.
#[derive(Clone)]
pub struct QueryPorts {
    /// Account state and indexing.
    pub storage: Arc<dyn AccountStorage>,
    /// Get-method execution.
    pub executor: Arc<dyn MethodExecutor>,
    /// Names and flags for accounts.
    pub address_book: Arc<dyn AddressBook>,
    /// Symbol blacklist.
    pub spam_filter: Arc<dyn SpamFilter>,
    /// Domain resolution; domain input is rejected without it.
    pub dns: Option<Arc<dyn DnsResolver>>,
}

/// Counters kept by the service.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct QueryStats {
    /// Queries answered, successfully or not.
    pub queries: u64,
    /// Queries that returned an error.
    pub failures: u64,
    /// Get methods forwarded to the executor.
    pub methods_executed: u64,
    /// Get-method results a decoder recognized.
    pub decoded_results: u64,
}

/// Query service over injected ports.
pub struct AccountQueryService {
    ports: QueryPorts,
    decoders: Arc<DecoderRegistry>,
    wallets: Arc<WalletRegistry>,
    config: QueryConfig,
    stats: RwLock<QueryStats>,
}

impl AccountQueryService {
    /// Creates a service with the built-in decoder and wallet tables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when `config` does not validate.
    pub fn new(ports: QueryPorts, config: QueryConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            ports,
            decoders: Arc::new(DecoderRegistry::default()),
            wallets: Arc::new(WalletRegistry::default()),
            config,
            stats: RwLock::new(QueryStats::default()),
        })
    }

    /// Replaces the decoder table.
    #[must_use]
    pub fn with_decoders(mut self, decoders: Arc<DecoderRegistry>) -> Self {
        self.decoders = decoders;
        self
    }

    /// Replaces the wallet version table.
    #[must_use]
    pub fn with_wallets(mut self, wallets: Arc<WalletRegistry>) -> Self {
        self.wallets = wallets;
        self
    }

    /// Active limits.
    #[must_use]
    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    /// Snapshot of the counters.
    #[must_use]
    pub fn stats(&self) -> QueryStats {
        *self.stats.read()
    }

    fn record<T>(&self, result: Result<T, QueryError>) -> Result<T, QueryError> {
        let mut stats = self.stats.write();
        stats.queries += 1;
        if let Err(err) = &result {
            stats.failures += 1;
            debug!(error = %err, class = ?err.class(), "query failed");
        }
        result
    }

    // =========================================================================
    // ADDRESS RESOLUTION
    // =========================================================================

    async fn resolve(&self, text: &str) -> Result<ParsedAddress, QueryError> {
        match ts_01_address_codec::parse(text) {
            Ok(parsed) => Ok(parsed),
            Err(AddressError::RequiresResolution(domain)) => {
                let Some(dns) = &self.ports.dns else {
                    return Err(AddressError::RequiresResolution(domain).into());
                };
                let id = dns
                    .resolve(&domain)
                    .await
                    .map_err(|e| QueryError::from_port(e, format!("domain {domain}")))?
                    .ok_or_else(|| QueryError::InvalidInput(format!("can't resolve domain '{domain}'")))?;
                Ok(ParsedAddress {
                    id,
                    bounceable: true,
                    testnet_only: false,
                    form: AddressForm::Dns,
                })
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn resolve_id(&self, text: &str) -> Result<AccountId, QueryError> {
        Ok(self.resolve(text).await?.id)
    }

    async fn raw_account(&self, id: &AccountId) -> Result<RawAccountState, QueryError> {
        self.ports
            .storage
            .get_raw_account(id)
            .await
            .map_err(|e| QueryError::from_port(e, format!("account {id}")))
    }

    async fn enrich(&self, state: &RawAccountState) -> Account {
        let metadata = self.ports.address_book.lookup(&state.account).await;
        Account::from_state(state, metadata.as_ref())
    }

    // =========================================================================
    // OPERATIONS
    // =========================================================================

    async fn do_get_account(&self, text: &str) -> Result<Account, QueryError> {
        let id = self.resolve_id(text).await?;
        match self.ports.storage.get_raw_account(&id).await {
            Ok(state) => Ok(self.enrich(&state).await),
            Err(PortError::NotFound) => Ok(Account::nonexist(&id)),
            Err(PortError::Backend(message)) => Err(QueryError::Upstream(message)),
        }
    }

    async fn do_get_accounts(&self, texts: &[String]) -> Result<Vec<Account>, QueryError> {
        if texts.is_empty() {
            return Err(QueryError::InvalidInput("empty list of ids".into()));
        }
        if texts.len() > self.config.max_bulk_accounts {
            return Err(QueryError::InvalidInput(format!(
                "the maximum number of accounts to request at once: {}",
                self.config.max_bulk_accounts
            )));
        }

        let mut ids = Vec::with_capacity(texts.len());
        let mut seen = HashSet::with_capacity(texts.len());
        for text in texts {
            let id = self.resolve_id(text).await?;
            if seen.insert(id) {
                ids.push(id);
            }
        }

        let mut states: HashMap<AccountId, RawAccountState> = self
            .ports
            .storage
            .get_raw_accounts(&ids)
            .await
            .map_err(|e| QueryError::from_port(e, "accounts"))?
            .into_iter()
            .map(|state| (state.account, state))
            .collect();

        let mut accounts = Vec::with_capacity(ids.len());
        for id in &ids {
            let account = match states.remove(id) {
                Some(state) => self.enrich(&state).await,
                None => Account::nonexist(id),
            };
            accounts.push(account);
        }
        debug!(requested = texts.len(), distinct = ids.len(), "accounts fetched");
        Ok(accounts)
    }

    async fn do_exec_get_method(
        &self,
        text: &str,
        method: &str,
        args: &[String],
    ) -> Result<MethodExecutionResult, QueryError> {
        if args.len() > self.config.max_method_args {
            return Err(QueryError::InvalidInput(format!(
                "the maximum number of get method arguments: {}",
                self.config.max_method_args
            )));
        }
        let id = self.resolve_id(text).await?;
        let stack = parse_arguments(args)?;

        let outcome = self
            .ports
            .executor
            .run_method(&id, method_id(method), &stack)
            .await
            .map_err(|e| QueryError::from_port(e, format!("account {id}")))?;
        self.stats.write().methods_executed += 1;

        let records = render_stack(&outcome.stack).map_err(render_failure)?;
        let decoded = match self.decoders.decode(method, &outcome.stack) {
            Ok(value) => {
                self.stats.write().decoded_results += 1;
                Some(value.value)
            }
            Err(err) => {
                debug!(error = %err, "result left undecoded");
                None
            }
        };

        Ok(MethodExecutionResult {
            success: is_clean_exit(outcome.exit_code),
            exit_code: outcome.exit_code,
            stack: records,
            decoded,
        })
    }

    async fn do_inspect_account(&self, text: &str) -> Result<ContractInspection, QueryError> {
        let id = self.resolve_id(text).await?;
        let state = self.raw_account(&id).await?;
        let code = state
            .code
            .ok_or_else(|| QueryError::NotFound(format!("code of account {id}")))?;
        let root = boc::deserialize_single(&code)?;

        let methods = extract_method_ids(&root)
            .into_iter()
            .filter_map(|method_id| {
                known_method_name(method_id).map(|name| InspectedMethod {
                    id: method_id,
                    method: name.to_string(),
                })
            })
            .collect();

        Ok(ContractInspection {
            code: hex::encode(&code),
            code_hash: root.hash_hex(),
            methods,
            compiler: Compiler::Func,
        })
    }

    async fn do_get_account_public_key(&self, text: &str) -> Result<PublicKeyRecord, QueryError> {
        let id = self.resolve_id(text).await?;
        match self.ports.storage.get_wallet_public_key(&id).await {
            Ok(key) => {
                return Ok(PublicKeyRecord {
                    public_key: hex::encode(key),
                })
            }
            Err(err) => debug!(error = %err, "no indexed public key, reading wallet data"),
        }

        let state = self.raw_account(&id).await?;
        let code = single_root(state.code.as_deref(), "code", &id)?;
        let data = single_root(state.data.as_deref(), "data", &id)?;
        let key = self.wallets.extract_public_key(&code, &data)?;
        Ok(PublicKeyRecord {
            public_key: hex::encode(key),
        })
    }

    async fn do_search_accounts(&self, prefix: &str) -> Vec<FoundAccount> {
        let attached = self.ports.address_book.search_by_prefix(prefix).await;
        let mut seen = HashSet::new();
        let mut found = Vec::new();
        for entry in attached {
            let Ok(parsed) = ts_01_address_codec::parse(&entry.wallet) else {
                warn!(wallet = %entry.wallet, "skipping unparsable address-book entry");
                continue;
            };
            if !entry.symbol.is_empty()
                && self
                    .ports
                    .spam_filter
                    .is_blacklisted(&parsed.id, &entry.symbol)
                    .await
            {
                continue;
            }
            if !seen.insert(parsed.id) {
                continue;
            }
            found.push(FoundAccount {
                address: parsed.id.to_raw(),
                name: entry.name,
                preview: entry.preview,
            });
        }
        found
    }
}

fn render_failure(err: StackError) -> QueryError {
    match err {
        StackError::Cell(cell) => cell.into(),
        other => QueryError::MalformedCell(CellError::Malformed(other.to_string())),
    }
}

fn single_root(bytes: Option<&[u8]>, what: &str, id: &AccountId) -> Result<Arc<Cell>, QueryError> {
    let bytes = bytes.ok_or_else(|| QueryError::NotFound(format!("{what} of account {id}")))?;
    Ok(boc::deserialize_single(bytes)?)
}

// =============================================================================
// INBOUND PORT
// =============================================================================

#[async_trait]
impl AccountQueryApi for AccountQueryService {
    #[instrument(skip(self))]
    async fn parse_address(&self, text: &str) -> Result<AddressParseRecord, QueryError> {
        let result = self.resolve(text).await.map(|parsed| {
            let renderings = parsed.id.render();
            AddressParseRecord {
                raw_form: renderings.raw_form,
                bounceable: renderings.bounceable,
                non_bounceable: renderings.non_bounceable,
                given_type: parsed.form,
                test_only: parsed.testnet_only,
            }
        });
        self.record(result)
    }

    #[instrument(skip(self))]
    async fn get_raw_account(&self, text: &str) -> Result<RawAccountState, QueryError> {
        let result = match self.resolve_id(text).await {
            Ok(id) => self.raw_account(&id).await,
            Err(err) => Err(err),
        };
        self.record(result)
    }

    #[instrument(skip(self))]
    async fn get_account(&self, text: &str) -> Result<Account, QueryError> {
        let result = self.do_get_account(text).await;
        self.record(result)
    }

    #[instrument(skip(self, texts), fields(count = texts.len()))]
    async fn get_accounts(&self, texts: &[String]) -> Result<Vec<Account>, QueryError> {
        let result = self.do_get_accounts(texts).await;
        self.record(result)
    }

    #[instrument(skip(self, args), fields(args = args.len()))]
    async fn exec_get_method(
        &self,
        text: &str,
        method: &str,
        args: &[String],
    ) -> Result<MethodExecutionResult, QueryError> {
        let result = self.do_exec_get_method(text, method, args).await;
        self.record(result)
    }

    #[instrument(skip(self))]
    async fn inspect_account(&self, text: &str) -> Result<ContractInspection, QueryError> {
        let result = self.do_inspect_account(text).await;
        self.record(result)
    }

    #[instrument(skip(self))]
    async fn get_account_public_key(&self, text: &str) -> Result<PublicKeyRecord, QueryError> {
        let result = self.do_get_account_public_key(text).await;
        self.record(result)
    }

    #[instrument(skip(self))]
    async fn search_accounts(&self, prefix: &str) -> Result<Vec<FoundAccount>, QueryError> {
        let found = self.do_search_accounts(prefix).await;
        self.record(Ok(found))
    }

    #[instrument(skip(self))]
    async fn reindex_account(&self, text: &str) -> Result<(), QueryError> {
        let result = match self.resolve_id(text).await {
            Ok(id) => self
                .ports
                .storage
                .reindex_account(&id)
                .await
                .map_err(|e| QueryError::from_port(e, format!("account {id}"))),
            Err(err) => Err(err),
        };
        self.record(result)
    }

    #[instrument(skip(self))]
    async fn get_account_diff(&self, text: &str, start: i64, end: i64) -> Result<AccountDiff, QueryError> {
        let result = if start > end {
            Err(QueryError::InvalidInput(format!(
                "start {start} is after end {end}"
            )))
        } else {
            match self.resolve_id(text).await {
                Ok(id) => self
                    .ports
                    .storage
                    .get_account_diff(&id, start, end)
                    .await
                    .map(|balance_change| AccountDiff { balance_change })
                    .map_err(|e| QueryError::from_port(e, format!("account {id}"))),
                Err(err) => Err(err),
            }
        };
        self.record(result)
    }
}
