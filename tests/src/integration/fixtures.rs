//! # Fixtures
//!
//! Contract code, wallet data and a fully wired service for the flows.

use num_bigint::BigInt;
use std::sync::Arc;
use ts_01_address_codec::AccountId;
use ts_02_cell_codec::hashmap::build_signed_hashmap;
use ts_02_cell_codec::{boc, Cell, CellBuilder};
use ts_06_account_query::{
    AccountQueryService, DnsResolver, InMemoryAccountStorage, InMemoryAddressBook,
    InMemoryDnsResolver, InMemoryMethodExecutor, InMemorySpamFilter, QueryConfig, QueryPorts,
};

/// A mainnet basechain wallet in its bounceable URL-safe form.
pub const WALLET_FRIENDLY: &str = "EQD2NmD_lH5f5u1Kj3KfGyTvhZSX0Eg6qp2a5IQUKXxOG21n";
/// The same wallet in raw form.
pub const WALLET_RAW: &str = "0:f63660ff947e5fe6ed4a8f729f1b24ef859497d0483aaa9d9ae48414297c4e1b";

/// Basechain account whose hash is `byte` repeated.
#[must_use]
pub fn account(byte: u8) -> AccountId {
    AccountId::new(0, [byte; 32])
}

/// Code cell starting with `SETCP0; DICTPUSHCONST 19` over `ids`, followed
/// by the `DICTIGETJMPZ; THROWARG 11` tail FunC emits.
pub fn dispatch_code(ids: &[i64]) -> anyhow::Result<Arc<Cell>> {
    let body = Arc::new(Cell::empty());
    let entries: Vec<(BigInt, Arc<Cell>)> = ids
        .iter()
        .map(|&id| (BigInt::from(id), body.clone()))
        .collect();
    let dictionary = build_signed_hashmap(19, &entries)?
        .ok_or_else(|| anyhow::anyhow!("dispatch table needs at least one method"))?;

    let mut b = CellBuilder::new();
    b.store_uint(16, 0xFF00)?
        .store_uint(14, 0b1111_0100_1010_01)?
        .store_uint(10, 19)?
        .store_uint(16, 0xF4BC)?
        .store_uint(24, 0xF2_C80B)?
        .store_ref(dictionary)?;
    Ok(Arc::new(b.build()?))
}

/// Wallet v3/v4 data: `seqno:u32 subwallet:u32 public_key:bits256`, then the
/// empty plugin dictionary for v4.
pub fn wallet_v4_data(seqno: u32, subwallet: u32, key: [u8; 32]) -> anyhow::Result<Arc<Cell>> {
    let mut b = CellBuilder::new();
    b.store_uint(32, u64::from(seqno))?
        .store_uint(32, u64::from(subwallet))?
        .store_bytes(&key)?
        .store_bit(false)?;
    Ok(Arc::new(b.build()?))
}

/// Single-root bag of cells.
pub fn boc_bytes(cell: &Arc<Cell>) -> anyhow::Result<Vec<u8>> {
    Ok(boc::serialize_single(cell)?)
}

/// Service wired to in-memory ports, with handles on every port.
pub struct Harness {
    /// Account states.
    pub storage: Arc<InMemoryAccountStorage>,
    /// Scripted get-method results.
    pub executor: Arc<InMemoryMethodExecutor>,
    /// Names and search entries.
    pub address_book: Arc<InMemoryAddressBook>,
    /// Blacklisted symbols.
    pub spam_filter: Arc<InMemorySpamFilter>,
    /// Domain table.
    pub dns: Arc<InMemoryDnsResolver>,
    /// The service under test.
    pub service: AccountQueryService,
}

impl Harness {
    /// Wires a service with `config` and a DNS resolver.
    pub fn new(config: QueryConfig) -> anyhow::Result<Self> {
        let storage = Arc::new(InMemoryAccountStorage::new());
        let executor = Arc::new(InMemoryMethodExecutor::new());
        let address_book = Arc::new(InMemoryAddressBook::new());
        let spam_filter = Arc::new(InMemorySpamFilter::new());
        let dns = Arc::new(InMemoryDnsResolver::new());
        let ports = QueryPorts {
            storage: storage.clone(),
            executor: executor.clone(),
            address_book: address_book.clone(),
            spam_filter: spam_filter.clone(),
            dns: Some(dns.clone() as Arc<dyn DnsResolver>),
        };
        let service = AccountQueryService::new(ports, config)?;
        Ok(Self {
            storage,
            executor,
            address_book,
            spam_filter,
            dns,
            service,
        })
    }
}
