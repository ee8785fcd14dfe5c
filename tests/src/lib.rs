//! # Salmon Federation Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── benches/          # Envelope throughput benchmarks
//! └── src/integration/  # Cross-crate flows
//!     ├── envelope_flows.rs   # Pod-to-pod envelope delivery
//!     └── discovery_flows.rs  # host-meta → WebFinger → key → envelope
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p federation-tests
//!
//! # By category
//! cargo test -p federation-tests integration::envelope_flows
//! cargo test -p federation-tests integration::discovery_flows
//!
//! # Benchmarks
//! cargo bench -p federation-tests
//! ```

pub mod integration;
