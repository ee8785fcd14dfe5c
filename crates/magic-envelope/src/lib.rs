//! # Magic Envelope
//!
//! Signed, optionally encrypted XML envelopes carrying one federation
//! message between servers.
//!
//! ## Architecture
//!
//! This crate follows hexagonal architecture:
//! - **Domain Layer** (`domain/`): Envelope model, wire form, signing subject
//! - **Ports Layer** (`ports/`): The public API and the key/cipher/codec
//!   dependencies it is driven by
//! - **Adapters Layer** (`adapters/`): In-memory key store, AES-256-CBC
//!   cipher, XML entity codec
//! - **Service Layer** (`service.rs`): Wires domain logic to ports
//!
//! ## Example
//!
//! ```ignore
//! use magic_envelope::{InMemoryKeyResolver, MagicEnvelope, MagicEnvelopeApi, MagicEnvelopeService};
//! use shared_types::StatusMessage;
//!
//! let keys = InMemoryKeyResolver::new().with_key("alice@pod.example", alice.public_key());
//! let service = MagicEnvelopeService::with_resolver(keys);
//!
//! let message = StatusMessage::new("abc123", "hello")?;
//! let envelope = MagicEnvelope::new(message, "alice@pod.example")?;
//! let xml = service.envelop(envelope, &alice)?.to_xml()?;
//!
//! let received: StatusMessage = service.unenvelop_xml(&xml, None, None).await?;
//! ```
//!
//! ## Security Notes
//!
//! - **Fail closed**: the first failing validation stage rejects the envelope
//! - **Signature first**: declared encoding and algorithm are only trusted
//!   once the signature over them verifies
//! - **No key material in logs**: rejections log the error kind only

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

// Re-export public API
pub use adapters::{AesCbcCipherService, FnKeyResolver, InMemoryKeyResolver, XmlEntityCodec};
pub use domain::config::{EnvelopeConfig, EnvelopeConfigBuilder};
pub use domain::envelope::MagicEnvelope;
pub use domain::errors::{EnvelopeError, KeyResolverError};
pub use domain::subject::{envelope_subject, signature_subject};
pub use domain::wire::{EnvelopeWireForm, ALGORITHM, DATA_TYPE, ENCODING, NAMESPACE};
pub use ports::inbound::MagicEnvelopeApi;
pub use ports::outbound::{CipherService, KeyResolver, PayloadCodec};
pub use service::MagicEnvelopeService;
