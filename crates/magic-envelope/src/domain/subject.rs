//! # Signing Subject
//!
//! The byte string an envelope signature covers. Signing and verification
//! build it through the same function, so both sides agree on it exactly.
//!
//! ```text
//! subject = b64url(data) "." b64url(data_type) "." b64url(encoding) "." b64url(alg)
//! ```
//!
//! Each part is padded base64url. `.` is outside the base64url alphabet, so
//! the join is unambiguous.

use crate::domain::encoding;

/// Separator between encoded subject parts.
pub const SUBJECT_SEPARATOR: &str = ".";

/// Build a signing subject from arbitrary parts.
pub fn signature_subject(parts: &[&[u8]]) -> String {
    parts
        .iter()
        .map(encoding::encode)
        .collect::<Vec<_>>()
        .join(SUBJECT_SEPARATOR)
}

/// Build the subject for an envelope's payload bytes and declared metadata.
pub fn envelope_subject(data: &[u8], data_type: &str, encoding: &str, algorithm: &str) -> String {
    signature_subject(&[
        data,
        data_type.as_bytes(),
        encoding.as_bytes(),
        algorithm.as_bytes(),
    ])
}
