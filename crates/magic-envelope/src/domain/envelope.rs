//! # Magic Envelope
//!
//! An outgoing message: one entity plus the identity of the author who
//! signs it. The serialized payload is computed on first use and cached;
//! encryption replaces the cached bytes with ciphertext, once.

use crate::domain::errors::EnvelopeError;
use shared_types::Entity;

/// Outgoing envelope, consumed when it is signed.
#[derive(Debug, Clone)]
pub struct MagicEnvelope<E: Entity> {
    payload: E,
    sender: String,
    payload_data: Option<Vec<u8>>,
    encrypted: bool,
}

impl<E: Entity> MagicEnvelope<E> {
    /// Wrap `payload` for `sender`.
    ///
    /// # Errors
    ///
    /// `ArgumentError` for an empty sender or a payload that violates its
    /// own schema.
    pub fn new(payload: E, sender: impl Into<String>) -> Result<Self, EnvelopeError> {
        let sender = sender.into();
        if sender.trim().is_empty() {
            return Err(EnvelopeError::ArgumentError(
                "sender must not be empty".to_string(),
            ));
        }
        payload
            .validate()
            .map_err(|e| EnvelopeError::ArgumentError(format!("invalid payload: {e}")))?;

        Ok(Self {
            payload,
            sender,
            payload_data: None,
            encrypted: false,
        })
    }

    /// The wrapped entity.
    pub fn payload(&self) -> &E {
        &self.payload
    }

    /// Author identity.
    pub fn sender(&self) -> &str {
        &self.sender
    }

    /// Whether the cached payload bytes are ciphertext.
    pub fn is_encrypted(&self) -> bool {
        self.encrypted
    }

    /// Payload bytes, serializing the entity on first call.
    pub fn payload_data_or_init(
        &mut self,
        serialize: impl FnOnce(&E) -> Result<Vec<u8>, EnvelopeError>,
    ) -> Result<&[u8], EnvelopeError> {
        if self.payload_data.is_none() {
            self.payload_data = Some(serialize(&self.payload)?);
        }
        Ok(self.payload_data.as_deref().unwrap_or_default())
    }

    /// Replace the payload bytes with their encryption.
    ///
    /// # Errors
    ///
    /// `ArgumentError` if the envelope is already encrypted; otherwise
    /// whatever `serialize` or `encrypt` report.
    pub fn encrypt_with(
        &mut self,
        serialize: impl FnOnce(&E) -> Result<Vec<u8>, EnvelopeError>,
        encrypt: impl FnOnce(&[u8]) -> Result<Vec<u8>, EnvelopeError>,
    ) -> Result<(), EnvelopeError> {
        if self.encrypted {
            return Err(EnvelopeError::ArgumentError(
                "payload is already encrypted".to_string(),
            ));
        }
        let ciphertext = encrypt(self.payload_data_or_init(serialize)?)?;
        self.payload_data = Some(ciphertext);
        self.encrypted = true;
        Ok(())
    }
}
