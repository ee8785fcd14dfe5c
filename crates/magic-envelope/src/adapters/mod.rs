//! # Adapters Module
//!
//! Implementations of the outbound ports.

pub mod cipher;
pub mod codec;
pub mod key_store;

pub use cipher::AesCbcCipherService;
pub use codec::XmlEntityCodec;
pub use key_store::{FnKeyResolver, InMemoryKeyResolver};
