//! # Shared Crypto - Federation Cryptographic Primitives
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `signatures` | RSASSA-PKCS1-v1_5 / SHA-256 | Envelope signing and verification |
//! | `symmetric` | AES-256-CBC, PKCS#7 | Optional payload encryption |
//!
//! ## Security Properties
//!
//! - **RSA-SHA256**: Deterministic, fixed by the protocol version
//! - **AES-256-CBC**: Fresh random key/IV per payload; key material is
//!   zeroized on drop and redacted from `Debug`

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod errors;
pub mod signatures;
pub mod symmetric;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// Re-exports
pub use errors::CryptoError;
pub use signatures::{RsaKeyPair, RsaPublicKey, RsaSignature};
pub use symmetric::{decrypt, encrypt, CipherParams};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
