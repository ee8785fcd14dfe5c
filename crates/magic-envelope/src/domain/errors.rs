//! # Envelope Errors
//!
//! Error types for building and validating Magic Envelopes.
//!
//! Validation stops at the first failing stage, so each rejected envelope
//! maps to exactly one variant:
//!
//! | Stage | Variant |
//! |-------|---------|
//! | Structure | `InvalidEnvelope` |
//! | Signature | `InvalidSignature`, `SenderKeyNotFound`, `KeyResolution` |
//! | Encoding | `InvalidEncoding` |
//! | Algorithm | `InvalidAlgorithm` |
//! | Decryption | `Crypto` |
//! | Payload | `Codec` |

use shared_crypto::CryptoError;
use shared_types::EntityError;
use thiserror::Error;

/// Errors that can occur while enveloping or unenveloping a message.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EnvelopeError {
    /// The envelope is not structurally a Magic Envelope
    #[error("Invalid envelope: {0}")]
    InvalidEnvelope(String),

    /// The signature does not verify against the sender's key
    #[error("Invalid signature")]
    InvalidSignature,

    /// No public key is known for the sender
    #[error("No public key found for sender {0}")]
    SenderKeyNotFound(String),

    /// The declared encoding is not `base64url`
    #[error("Unsupported encoding: {0}")]
    InvalidEncoding(String),

    /// The declared algorithm is not `RSA-SHA256`
    #[error("Unsupported algorithm: {0}")]
    InvalidAlgorithm(String),

    /// A caller passed an unusable argument
    #[error("Argument error: {0}")]
    ArgumentError(String),

    /// The key resolver itself failed
    #[error("Key resolution failed: {0}")]
    KeyResolution(#[from] KeyResolverError),

    /// Signing or payload decryption failed
    #[error("Cryptographic failure: {0}")]
    Crypto(#[from] CryptoError),

    /// The payload could not be serialized or deserialized
    #[error("Payload error: {0}")]
    Codec(#[from] EntityError),
}

impl EnvelopeError {
    /// Short stable name of the variant, for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidEnvelope(_) => "invalid_envelope",
            Self::InvalidSignature => "invalid_signature",
            Self::SenderKeyNotFound(_) => "sender_key_not_found",
            Self::InvalidEncoding(_) => "invalid_encoding",
            Self::InvalidAlgorithm(_) => "invalid_algorithm",
            Self::ArgumentError(_) => "argument_error",
            Self::KeyResolution(_) => "key_resolution",
            Self::Crypto(_) => "crypto",
            Self::Codec(_) => "codec",
        }
    }
}

/// Error reported by a `KeyResolver`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum KeyResolverError {
    /// The lookup could not be completed
    #[error("Key lookup failed for {identity}: {reason}")]
    LookupFailed { identity: String, reason: String },

    /// A key was found but cannot be used
    #[error("Unusable key for {identity}: {reason}")]
    InvalidKey { identity: String, reason: String },

    /// Communication error with the key source
    #[error("Communication error: {0}")]
    CommunicationError(String),
}
