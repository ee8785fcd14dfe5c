//! # Ports Layer
//!
//! Trait definitions for the hexagonal architecture.
//! - **Inbound (Driving)**: API that callers use to envelop and unenvelop
//! - **Outbound (Driven)**: Key lookup, payload cipher and payload codec

pub mod inbound;
pub mod outbound;
