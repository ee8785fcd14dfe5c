//! Test utilities for RSA signing.
//!
//! Fixed 2048-bit key pairs and a signature vector produced by an
//! independent implementation (OpenSSL), so suites can check byte-exact
//! interoperability instead of only self-consistency.
//! Enable with the `test-utils` feature flag.
//!
//! # Example
//!
//! ```rust,ignore
//! use shared_crypto::test_utils::alice_key_pair;
//!
//! let keypair = alice_key_pair();
//! let signature = keypair.sign(b"hello").unwrap();
//! assert!(keypair.public_key().verify(b"hello", &signature).is_ok());
//! ```

use crate::{RsaKeyPair, RsaPublicKey};

/// Federation identity the `alice` fixtures belong to.
pub const ALICE_ID: &str = "alice@pod.example";

/// Federation identity the `bob` fixtures belong to.
pub const BOB_ID: &str = "bob@pod.example";

/// PKCS#1 private key of alice.
pub const ALICE_PRIVATE_PEM: &str = include_str!("../testdata/alice_private.pem");

/// SPKI public key of alice.
pub const ALICE_PUBLIC_PEM: &str = include_str!("../testdata/alice_public.pem");

/// PKCS#1 public key of alice.
pub const ALICE_PUBLIC_PKCS1_PEM: &str = include_str!("../testdata/alice_public_pkcs1.pem");

/// PKCS#1 private key of bob.
pub const BOB_PRIVATE_PEM: &str = include_str!("../testdata/bob_private.pem");

/// SPKI public key of bob.
pub const BOB_PUBLIC_PEM: &str = include_str!("../testdata/bob_public.pem");

/// Signing subject of the `status_message` {guid: abc123, text: hello}
/// payload with the standard envelope constants.
pub const ALICE_STATUS_MESSAGE_SUBJECT: &str =
    include_str!("../testdata/alice_status_message.subject");

/// Base64url (padded) RSA-SHA256 signature of `ALICE_STATUS_MESSAGE_SUBJECT`
/// under alice's key.
pub const ALICE_STATUS_MESSAGE_SIGNATURE: &str =
    include_str!("../testdata/alice_status_message.sig");

/// Alice's key pair.
pub fn alice_key_pair() -> RsaKeyPair {
    RsaKeyPair::from_pem(ALICE_PRIVATE_PEM).expect("alice fixture key is valid")
}

/// Bob's key pair.
pub fn bob_key_pair() -> RsaKeyPair {
    RsaKeyPair::from_pem(BOB_PRIVATE_PEM).expect("bob fixture key is valid")
}

/// Alice's public key.
pub fn alice_public_key() -> RsaPublicKey {
    RsaPublicKey::from_pem(ALICE_PUBLIC_PEM).expect("alice fixture key is valid")
}

/// Bob's public key.
pub fn bob_public_key() -> RsaPublicKey {
    RsaPublicKey::from_pem(BOB_PUBLIC_PEM).expect("bob fixture key is valid")
}
