//! # Integration Flows
//!
//! Each module simulates two pods exchanging data through the public APIs
//! only.

pub mod discovery_flows;
pub mod envelope_flows;
pub mod support;
