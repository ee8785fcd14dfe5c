//! # Outbound Ports (Driven Ports / SPI)
//!
//! Traits that define dependencies the envelope engine needs.

use shared_crypto::{CipherParams, CryptoError, RsaPublicKey};
use shared_types::{Entity, EntityError};

pub use crate::domain::errors::KeyResolverError;

/// Looks up a sender's public key.
///
/// This is the engine's only suspension point; implementations may fetch
/// keys over the network.
#[async_trait::async_trait]
pub trait KeyResolver: Send + Sync {
    /// Resolve the public key for a federation identity.
    ///
    /// # Returns
    /// * `Ok(Some(key))` - The sender's key
    /// * `Ok(None)` - The sender is unknown
    ///
    /// # Errors
    /// * `KeyResolverError` - The lookup itself failed
    async fn resolve(&self, identity: &str) -> Result<Option<RsaPublicKey>, KeyResolverError>;
}

/// Symmetric payload cipher.
pub trait CipherService: Send + Sync {
    /// Fresh random key and IV.
    fn generate_params(&self) -> CipherParams;

    /// Encrypt payload bytes.
    fn encrypt(&self, plaintext: &[u8], params: &CipherParams) -> Result<Vec<u8>, CryptoError>;

    /// Decrypt payload bytes.
    fn decrypt(&self, ciphertext: &[u8], params: &CipherParams) -> Result<Vec<u8>, CryptoError>;
}

/// Converts entities to and from payload bytes.
pub trait PayloadCodec: Send + Sync {
    /// The entity type this codec produces.
    type Entity: Entity;

    /// Serialize an entity.
    fn serialize(&self, entity: &Self::Entity) -> Result<Vec<u8>, EntityError>;

    /// Deserialize payload bytes.
    fn deserialize(&self, bytes: &[u8]) -> Result<Self::Entity, EntityError>;
}
