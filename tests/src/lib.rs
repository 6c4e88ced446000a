//! # Tonscope Test Suite
//!
//! Unified test crate for flows that cross crate boundaries.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── codec_flows.rs    # address, cell and stack codecs end to end
//!     ├── fixtures.rs       # contract code and service wiring
//!     └── query_flows.rs    # AccountQueryService over in-memory ports
//!
//! tests/benches/
//! └── codec_benchmarks.rs   # parse, BOC and dispatch scan throughput
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p ts-tests
//! cargo test -p ts-tests integration::query_flows
//! cargo bench -p ts-tests
//! ```

pub mod integration;
