//! # Magic Envelope Service
//!
//! Application service layer that implements the `MagicEnvelopeApi` trait.
//!
//! ## Architecture
//!
//! This is the hexagonal "application service" that:
//! - Implements the inbound port (`MagicEnvelopeApi`)
//! - Resolves sender keys through the `KeyResolver` port
//! - Delegates payload encryption and serialization to the `CipherService`
//!   and `PayloadCodec` ports
//!
//! ## Validation Pipeline
//!
//! Incoming envelopes pass these stages in order; the first failure is the
//! result.
//!
//! 1. Structure (`InvalidEnvelope`)
//! 2. Signature (`InvalidSignature`, `SenderKeyNotFound`, `KeyResolution`)
//! 3. Encoding (`InvalidEncoding`)
//! 4. Algorithm (`InvalidAlgorithm`)
//! 5. Decryption, when cipher params are given (`Crypto`)
//! 6. Payload deserialization (`Codec`)
//!
//! The signature is checked before the declared encoding and algorithm, so
//! a tampered declaration surfaces as `InvalidSignature`.

use crate::adapters::{AesCbcCipherService, XmlEntityCodec};
use crate::domain::config::EnvelopeConfig;
use crate::domain::encoding;
use crate::domain::envelope::MagicEnvelope;
use crate::domain::errors::EnvelopeError;
use crate::domain::subject::envelope_subject;
use crate::domain::wire::{EnvelopeWireForm, ALGORITHM, DATA_TYPE, ENCODING};
use crate::ports::inbound::MagicEnvelopeApi;
use crate::ports::outbound::{CipherService, KeyResolver, PayloadCodec};
use shared_crypto::{CipherParams, RsaKeyPair, RsaSignature};
use shared_types::Entity;
use tracing::{debug, warn};

/// Magic Envelope Service.
///
/// Stateless apart from its ports and limits; share it behind an `Arc` to
/// serve concurrent requests.
pub struct MagicEnvelopeService<R, C, P>
where
    R: KeyResolver,
    C: CipherService,
    P: PayloadCodec,
{
    resolver: R,
    cipher: C,
    codec: P,
    config: EnvelopeConfig,
}

impl<R, E> MagicEnvelopeService<R, AesCbcCipherService, XmlEntityCodec<E>>
where
    R: KeyResolver,
    E: Entity,
{
    /// Service with the AES-256-CBC cipher and the XML payload codec.
    pub fn with_resolver(resolver: R) -> Self {
        Self::new(resolver, AesCbcCipherService, XmlEntityCodec::new())
    }
}

impl<R, C, P> MagicEnvelopeService<R, C, P>
where
    R: KeyResolver,
    C: CipherService,
    P: PayloadCodec,
{
    /// Create a new service with default limits.
    ///
    /// # Arguments
    /// * `resolver` - Sender public key lookup
    /// * `cipher` - Payload cipher
    /// * `codec` - Entity serialization
    pub fn new(resolver: R, cipher: C, codec: P) -> Self {
        Self {
            resolver,
            cipher,
            codec,
            config: EnvelopeConfig::default(),
        }
    }

    /// Replace the size limits.
    ///
    /// # Errors
    /// * `EnvelopeError::ArgumentError` - The config does not validate
    pub fn with_config(mut self, config: EnvelopeConfig) -> Result<Self, EnvelopeError> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    /// Active size limits.
    pub fn config(&self) -> &EnvelopeConfig {
        &self.config
    }

    /// The key resolver port.
    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    fn serialize(&self, entity: &P::Entity) -> Result<Vec<u8>, EnvelopeError> {
        Ok(self.codec.serialize(entity)?)
    }

    fn rejected(&self, err: EnvelopeError) -> EnvelopeError {
        warn!(kind = err.kind(), error = %err, "Rejected magic envelope");
        err
    }

    // =========================================================================
    // Validation stages
    // =========================================================================

    /// Stage 1: the envelope has something to verify, within limits.
    fn check_structure(&self, wire: &EnvelopeWireForm) -> Result<Vec<u8>, EnvelopeError> {
        wire.check_structure()?;

        let data = encoding::decode(&wire.data)
            .map_err(|e| EnvelopeError::InvalidEnvelope(format!("data is not base64url: {e}")))?;
        if data.len() > self.config.max_payload_bytes {
            return Err(EnvelopeError::InvalidEnvelope(format!(
                "payload of {} bytes exceeds the {}-byte limit",
                data.len(),
                self.config.max_payload_bytes
            )));
        }
        Ok(data)
    }

    /// Stage 2: the signature verifies under the sender's key.
    async fn verify_signature(
        &self,
        wire: &EnvelopeWireForm,
        data: &[u8],
        sender: &str,
    ) -> Result<(), EnvelopeError> {
        let subject = envelope_subject(data, &wire.data_type, &wire.encoding, &wire.algorithm);

        let key = self
            .resolver
            .resolve(sender)
            .await?
            .ok_or_else(|| EnvelopeError::SenderKeyNotFound(sender.to_string()))?;

        let signature =
            encoding::decode(&wire.signature).map_err(|_| EnvelopeError::InvalidSignature)?;
        key.verify(subject.as_bytes(), &RsaSignature::from_bytes(signature))
            .map_err(|_| EnvelopeError::InvalidSignature)
    }

    /// Stages 3 and 4: only the protocol's encoding and algorithm.
    fn check_declarations(wire: &EnvelopeWireForm) -> Result<(), EnvelopeError> {
        if wire.encoding != ENCODING {
            return Err(EnvelopeError::InvalidEncoding(wire.encoding.clone()));
        }
        if wire.algorithm != ALGORITHM {
            return Err(EnvelopeError::InvalidAlgorithm(wire.algorithm.clone()));
        }
        Ok(())
    }

    async fn run_pipeline(
        &self,
        wire: &EnvelopeWireForm,
        sender: Option<&str>,
        cipher_params: Option<&CipherParams>,
    ) -> Result<P::Entity, EnvelopeError> {
        let data = self.check_structure(wire)?;

        let sender = match sender {
            Some(sender) if sender.trim().is_empty() => {
                return Err(EnvelopeError::ArgumentError(
                    "sender override must not be empty".to_string(),
                ))
            }
            Some(sender) => sender.trim().to_string(),
            None => wire.sender()?,
        };
        self.verify_signature(wire, &data, &sender).await?;

        Self::check_declarations(wire)?;

        // Stage 5
        let plaintext = match cipher_params {
            Some(params) => self.cipher.decrypt(&data, params)?,
            None => data,
        };

        // Stage 6
        let entity = self.codec.deserialize(&plaintext)?;

        debug!(
            sender = %sender,
            entity = <P::Entity as Entity>::ENTITY_NAME,
            encrypted = cipher_params.is_some(),
            "Accepted magic envelope"
        );
        Ok(entity)
    }
}

#[async_trait::async_trait]
impl<R, C, P> MagicEnvelopeApi<P::Entity> for MagicEnvelopeService<R, C, P>
where
    R: KeyResolver,
    C: CipherService,
    P: PayloadCodec,
{
    fn encrypt(
        &self,
        envelope: &mut MagicEnvelope<P::Entity>,
    ) -> Result<CipherParams, EnvelopeError> {
        let params = self.cipher.generate_params();
        envelope.encrypt_with(
            |entity| self.serialize(entity),
            |plaintext| Ok(self.cipher.encrypt(plaintext, &params)?),
        )?;

        debug!(sender = envelope.sender(), "Encrypted magic envelope payload");
        Ok(params)
    }

    fn envelop(
        &self,
        mut envelope: MagicEnvelope<P::Entity>,
        key: &RsaKeyPair,
    ) -> Result<EnvelopeWireForm, EnvelopeError> {
        let key_id = encoding::encode(envelope.sender());
        let data = envelope.payload_data_or_init(|entity| self.serialize(entity))?;

        let subject = envelope_subject(data, DATA_TYPE, ENCODING, ALGORITHM);
        let signature = key.sign(subject.as_bytes())?;

        let wire = EnvelopeWireForm {
            data: encoding::encode(data),
            data_type: DATA_TYPE.to_string(),
            encoding: ENCODING.to_string(),
            algorithm: ALGORITHM.to_string(),
            signature: encoding::encode(signature.as_bytes()),
            key_id: Some(key_id),
        };

        debug!(
            sender = envelope.sender(),
            encrypted = envelope.is_encrypted(),
            "Built magic envelope"
        );
        Ok(wire)
    }

    async fn unenvelop(
        &self,
        wire: &EnvelopeWireForm,
        sender: Option<&str>,
        cipher_params: Option<&CipherParams>,
    ) -> Result<P::Entity, EnvelopeError> {
        self.run_pipeline(wire, sender, cipher_params)
            .await
            .map_err(|e| self.rejected(e))
    }

    async fn unenvelop_xml(
        &self,
        xml: &str,
        sender: Option<&str>,
        cipher_params: Option<&CipherParams>,
    ) -> Result<P::Entity, EnvelopeError> {
        if xml.len() > self.config.max_envelope_bytes {
            return Err(self.rejected(EnvelopeError::InvalidEnvelope(format!(
                "envelope of {} bytes exceeds the {}-byte limit",
                xml.len(),
                self.config.max_envelope_bytes
            ))));
        }
        let wire = EnvelopeWireForm::from_xml(xml).map_err(|e| self.rejected(e))?;
        self.unenvelop(&wire, sender, cipher_params).await
    }
}

// =============================================================================
// TESTS
// =============================================================================
