//! Fuzz target for the signing subject builder.
//!
//! ## Running
//!
//! ```bash
//! cd crates/magic-envelope
//! cargo +nightly fuzz run fuzz_subject
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;
use magic_envelope::domain::encoding;
use magic_envelope::signature_subject;

/// Fuzz input structure for subject building.
#[derive(Debug, arbitrary::Arbitrary)]
struct FuzzInput {
    /// Payload bytes
    data: Vec<u8>,
    /// Declared data type
    data_type: String,
    /// Declared encoding
    encoding: String,
    /// Declared algorithm
    algorithm: String,
}

fuzz_target!(|input: FuzzInput| {
    let parts: [&[u8]; 4] = [
        &input.data,
        input.data_type.as_bytes(),
        input.encoding.as_bytes(),
        input.algorithm.as_bytes(),
    ];
    let subject = signature_subject(&parts);

    // 1. Deterministic
    assert_eq!(subject, signature_subject(&parts));

    // 2. Splits back into exactly the original parts
    let decoded: Vec<Vec<u8>> = subject
        .split('.')
        .map(|part| encoding::decode(part).expect("subject parts are base64url"))
        .collect();
    assert_eq!(decoded.len(), parts.len());
    for (decoded, original) in decoded.iter().zip(parts) {
        assert_eq!(decoded.as_slice(), original);
    }
});
