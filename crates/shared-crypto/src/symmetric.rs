//! # Symmetric Encryption
//!
//! AES-256-CBC with PKCS#7 padding, the payload cipher used by encrypted
//! Magic Envelopes.
//!
//! ## Cipher Params
//!
//! A fresh random key/IV pair is generated per envelope and handed back to
//! the caller, who distributes it to the recipient out-of-band. The pair
//! serializes with base64 string fields.

use crate::CryptoError;
use aes::Aes256;
use cbc::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use serde_with::{base64::Base64, serde_as};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// AES-256 key length in bytes.
pub const KEY_LENGTH: usize = 32;

/// CBC initialization vector length in bytes.
pub const IV_LENGTH: usize = 16;

/// Key and IV for one encrypted payload.
#[serde_as]
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct CipherParams {
    /// 256-bit AES key.
    #[serde_as(as = "Base64")]
    pub key: Vec<u8>,
    /// 128-bit CBC IV.
    #[serde_as(as = "Base64")]
    pub iv: Vec<u8>,
}

impl CipherParams {
    /// Create from raw bytes, checking lengths.
    pub fn new(key: Vec<u8>, iv: Vec<u8>) -> Result<Self, CryptoError> {
        let params = Self { key, iv };
        params.validate()?;
        Ok(params)
    }

    /// Generate a random key/IV pair.
    pub fn generate() -> Self {
        let mut key = vec![0u8; KEY_LENGTH];
        let mut iv = vec![0u8; IV_LENGTH];
        let mut rng = rand::thread_rng();
        rng.fill_bytes(&mut key);
        rng.fill_bytes(&mut iv);
        Self { key, iv }
    }

    /// Check key and IV lengths.
    pub fn validate(&self) -> Result<(), CryptoError> {
        if self.key.len() != KEY_LENGTH {
            return Err(CryptoError::InvalidKeyLength {
                expected: KEY_LENGTH,
                actual: self.key.len(),
            });
        }
        if self.iv.len() != IV_LENGTH {
            return Err(CryptoError::InvalidIvLength {
                expected: IV_LENGTH,
                actual: self.iv.len(),
            });
        }
        Ok(())
    }
}

impl fmt::Debug for CipherParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CipherParams")
            .field("key", &"<redacted>")
            .field("iv", &"<redacted>")
            .finish()
    }
}

/// Encrypt plaintext with AES-256-CBC.
///
/// # Errors
///
/// Returns `CryptoError::InvalidKeyLength` / `InvalidIvLength` for
/// malformed params.
pub fn encrypt(params: &CipherParams, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
    params.validate()?;
    let cipher = Aes256CbcEnc::new_from_slices(&params.key, &params.iv)
        .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;

    Ok(cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext))
}

/// Decrypt AES-256-CBC ciphertext.
///
/// # Errors
///
/// Returns `CryptoError::DecryptionFailed` if padding does not check out,
/// which is what a wrong key or IV usually produces.
pub fn decrypt(params: &CipherParams, ciphertext: &[u8]) -> Result<Vec<u8>, CryptoError> {
    params.validate()?;
    let cipher = Aes256CbcDec::new_from_slices(&params.key, &params.iv)
        .map_err(|e| CryptoError::DecryptionFailed(e.to_string()))?;

    cipher
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|e| CryptoError::DecryptionFailed(e.to_string()))
}
