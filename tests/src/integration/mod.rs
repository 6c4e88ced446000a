//! # Integration Flows
//!
//! Cross-crate scenarios: the codecs chained the way the query service chains
//! them, and the service itself over in-memory ports.

pub mod codec_flows;
pub mod fixtures;
pub mod query_flows;
