//! AES-256-CBC payload cipher.

use crate::ports::outbound::CipherService;
use shared_crypto::{symmetric, CipherParams, CryptoError};

/// `CipherService` backed by `shared_crypto::symmetric`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AesCbcCipherService;

impl CipherService for AesCbcCipherService {
    fn generate_params(&self) -> CipherParams {
        CipherParams::generate()
    }

    fn encrypt(&self, plaintext: &[u8], params: &CipherParams) -> Result<Vec<u8>, CryptoError> {
        symmetric::encrypt(params, plaintext)
    }

    fn decrypt(&self, ciphertext: &[u8], params: &CipherParams) -> Result<Vec<u8>, CryptoError> {
        symmetric::decrypt(params, ciphertext)
    }
}
