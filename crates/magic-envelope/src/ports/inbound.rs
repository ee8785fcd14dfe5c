//! # Inbound Ports (Driving Ports / API)
//!
//! Traits that define the public API of the envelope engine.

use crate::domain::envelope::MagicEnvelope;
use crate::domain::errors::EnvelopeError;
use crate::domain::wire::EnvelopeWireForm;
use shared_crypto::{CipherParams, RsaKeyPair};
use shared_types::Entity;

/// Primary Magic Envelope API.
///
/// Implementations must be thread-safe (`Send + Sync`); every call is
/// independent of every other.
#[async_trait::async_trait]
pub trait MagicEnvelopeApi<E: Entity>: Send + Sync {
    // =========================================================================
    // Outgoing
    // =========================================================================

    /// Encrypt the envelope's payload with fresh cipher params.
    ///
    /// The params are returned to the caller for out-of-band delivery to
    /// the recipient; they are never written into the envelope.
    ///
    /// # Errors
    /// * `EnvelopeError::ArgumentError` - The envelope is already encrypted
    /// * `EnvelopeError::Codec` - The payload could not be serialized
    fn encrypt(&self, envelope: &mut MagicEnvelope<E>) -> Result<CipherParams, EnvelopeError>;

    /// Sign the envelope with the sender's private key.
    ///
    /// # Errors
    /// * `EnvelopeError::Codec` - The payload could not be serialized
    /// * `EnvelopeError::Crypto` - Signing failed
    fn envelop(
        &self,
        envelope: MagicEnvelope<E>,
        key: &RsaKeyPair,
    ) -> Result<EnvelopeWireForm, EnvelopeError>;

    // =========================================================================
    // Incoming
    // =========================================================================

    /// Validate an envelope and recover its entity.
    ///
    /// `sender` overrides the identity carried in `key_id`. `cipher_params`
    /// must be supplied for encrypted payloads.
    async fn unenvelop(
        &self,
        wire: &EnvelopeWireForm,
        sender: Option<&str>,
        cipher_params: Option<&CipherParams>,
    ) -> Result<E, EnvelopeError>;

    /// Parse raw envelope XML, then [`MagicEnvelopeApi::unenvelop`] it.
    async fn unenvelop_xml(
        &self,
        xml: &str,
        sender: Option<&str>,
        cipher_params: Option<&CipherParams>,
    ) -> Result<E, EnvelopeError>;
}
