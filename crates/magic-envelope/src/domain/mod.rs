//! # Domain Layer
//!
//! Envelope model, wire form, signing subject and errors. No I/O; key
//! lookup and payload encryption arrive through the ports.

pub mod config;
pub mod encoding;
pub mod envelope;
pub mod errors;
pub mod subject;
pub mod wire;
