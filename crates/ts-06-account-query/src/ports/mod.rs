//! # Ports
//!
//! Hexagonal boundaries of the query service.

pub mod inbound;
pub mod outbound;

pub use inbound::AccountQueryApi;
pub use outbound::{
    AccountStorage, AddressBook, DnsResolver, MethodExecutor, MethodOutcome, PortError, SpamFilter,
};
