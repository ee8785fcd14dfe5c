//! # Base64url Encoding
//!
//! Every binary field on the wire (payload data, signature, key id) and every
//! part of the signing subject uses the URL-safe alphabet.
//!
//! - **Encode**: always padded with `=`, which is what existing
//!   correspondents produce and expect.
//! - **Decode**: padding optional, non-zero trailing bits tolerated, ASCII
//!   whitespace ignored (some writers wrap long data lines).

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, URL_SAFE};
use base64::engine::DecodePaddingMode;
use base64::{DecodeError, Engine as _};

const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Encode bytes as padded base64url.
pub fn encode(bytes: impl AsRef<[u8]>) -> String {
    URL_SAFE.encode(bytes)
}

/// Decode base64url text, padded or not.
pub fn decode(text: &str) -> Result<Vec<u8>, DecodeError> {
    if text.bytes().any(|b| b.is_ascii_whitespace()) {
        let compact: String = text.split_ascii_whitespace().collect();
        URL_SAFE_LENIENT.decode(compact)
    } else {
        URL_SAFE_LENIENT.decode(text)
    }
}
