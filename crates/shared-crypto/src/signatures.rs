//! # RSA-SHA256 Signatures
//!
//! RSASSA-PKCS1-v1_5 over a SHA-256 digest, the only signature scheme the
//! Magic Envelope protocol version allows.
//!
//! ## Properties
//!
//! - Deterministic: the same key and message always yield the same bytes
//! - Private keys read from PKCS#1 (`RSA PRIVATE KEY`) or PKCS#8 PEM
//! - Public keys read from SPKI (`PUBLIC KEY`) or PKCS#1 (`RSA PUBLIC KEY`) PEM

use crate::CryptoError;
use rsa::pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey, EncodeRsaPrivateKey, EncodeRsaPublicKey};
use rsa::pkcs1v15::{Signature, SigningKey, VerifyingKey};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePublicKey, LineEnding};
use rsa::signature::{SignatureEncoding, Signer, Verifier};
use rsa::traits::PublicKeyParts;
use sha2::Sha256;
use std::fmt;
use zeroize::Zeroizing;

/// Smallest modulus accepted for generated keys.
pub const MIN_KEY_BITS: usize = 2048;

/// RSA public key, with its RSA-SHA256 verifier built once.
#[derive(Clone)]
pub struct RsaPublicKey {
    key: rsa::RsaPublicKey,
    verifying_key: VerifyingKey<Sha256>,
}

impl RsaPublicKey {
    fn from_key(key: rsa::RsaPublicKey) -> Self {
        let verifying_key = VerifyingKey::<Sha256>::new(key.clone());
        Self { key, verifying_key }
    }

    /// Parse a PEM public key (SPKI or PKCS#1).
    pub fn from_pem(pem: &str) -> Result<Self, CryptoError> {
        let pem = pem.trim();
        rsa::RsaPublicKey::from_public_key_pem(pem)
            .or_else(|_| rsa::RsaPublicKey::from_pkcs1_pem(pem))
            .map(Self::from_key)
            .map_err(|e| CryptoError::InvalidPublicKey(e.to_string()))
    }

    /// Encode as SPKI PEM (`-----BEGIN PUBLIC KEY-----`).
    pub fn to_pem(&self) -> Result<String, CryptoError> {
        self.key
            .to_public_key_pem(LineEnding::LF)
            .map_err(|e| CryptoError::InvalidPublicKey(e.to_string()))
    }

    /// Encode as PKCS#1 PEM (`-----BEGIN RSA PUBLIC KEY-----`).
    pub fn to_pkcs1_pem(&self) -> Result<String, CryptoError> {
        self.key
            .to_pkcs1_pem(LineEnding::LF)
            .map_err(|e| CryptoError::InvalidPublicKey(e.to_string()))
    }

    /// Modulus size in bits.
    pub fn size_bits(&self) -> usize {
        self.key.size() * 8
    }

    /// Verify an RSA-SHA256 signature over `message`.
    pub fn verify(&self, message: &[u8], signature: &RsaSignature) -> Result<(), CryptoError> {
        let sig = Signature::try_from(signature.as_bytes())
            .map_err(|_| CryptoError::InvalidSignatureFormat)?;

        self.verifying_key
            .verify(message, &sig)
            .map_err(|_| CryptoError::SignatureVerificationFailed)
    }
}

impl PartialEq for RsaPublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for RsaPublicKey {}

impl fmt::Debug for RsaPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RsaPublicKey")
            .field("bits", &self.size_bits())
            .finish()
    }
}

/// Raw RSA signature bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RsaSignature(Vec<u8>);

impl RsaSignature {
    /// Create from bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Get raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consume into raw bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

/// RSA key pair used to sign outgoing envelopes.
#[derive(Clone)]
pub struct RsaKeyPair {
    private_key: rsa::RsaPrivateKey,
    signing_key: SigningKey<Sha256>,
}

impl RsaKeyPair {
    /// Generate a random key pair.
    ///
    /// # Errors
    ///
    /// `CryptoError::KeyGenerationFailed` for moduli below `MIN_KEY_BITS`.
    pub fn generate(bits: usize) -> Result<Self, CryptoError> {
        if bits < MIN_KEY_BITS {
            return Err(CryptoError::KeyGenerationFailed(format!(
                "{bits}-bit modulus is below the {MIN_KEY_BITS}-bit minimum"
            )));
        }
        let private_key = rsa::RsaPrivateKey::new(&mut rand::thread_rng(), bits)
            .map_err(|e| CryptoError::KeyGenerationFailed(e.to_string()))?;
        Ok(Self::from_key(private_key))
    }

    fn from_key(private_key: rsa::RsaPrivateKey) -> Self {
        let signing_key = SigningKey::<Sha256>::new(private_key.clone());
        Self {
            private_key,
            signing_key,
        }
    }

    /// Parse a PEM private key (PKCS#1 or PKCS#8).
    pub fn from_pem(pem: &str) -> Result<Self, CryptoError> {
        let pem = pem.trim();
        rsa::RsaPrivateKey::from_pkcs1_pem(pem)
            .or_else(|_| rsa::RsaPrivateKey::from_pkcs8_pem(pem))
            .map(Self::from_key)
            .map_err(|e| CryptoError::InvalidPrivateKey(e.to_string()))
    }

    /// Encode as PKCS#1 PEM. The buffer is wiped on drop.
    pub fn to_pem(&self) -> Result<Zeroizing<String>, CryptoError> {
        self.private_key
            .to_pkcs1_pem(LineEnding::LF)
            .map_err(|e| CryptoError::InvalidPrivateKey(e.to_string()))
    }

    /// Get public key.
    pub fn public_key(&self) -> RsaPublicKey {
        RsaPublicKey::from_key(self.private_key.to_public_key())
    }

    /// Sign a message with RSA-SHA256 (deterministic).
    pub fn sign(&self, message: &[u8]) -> Result<RsaSignature, CryptoError> {
        let signature = self
            .signing_key
            .try_sign(message)
            .map_err(|e| CryptoError::SigningFailed(e.to_string()))?;
        Ok(RsaSignature(signature.to_vec()))
    }
}

impl fmt::Debug for RsaKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RsaKeyPair")
            .field("bits", &(self.private_key.size() * 8))
            .finish_non_exhaustive()
    }
}
