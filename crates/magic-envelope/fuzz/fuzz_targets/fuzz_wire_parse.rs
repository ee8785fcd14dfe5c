//! Fuzz target for envelope XML parsing.
//!
//! Feeds arbitrary documents to the wire-form parser. Whatever the input,
//! parsing must return `Ok` or `InvalidEnvelope`, never panic.
//!
//! ## Running
//!
//! ```bash
//! cd crates/magic-envelope
//! cargo +nightly fuzz run fuzz_wire_parse
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;
use magic_envelope::{EnvelopeError, EnvelopeWireForm};

fuzz_target!(|xml: &str| {
    match EnvelopeWireForm::from_xml(xml) {
        Ok(wire) => {
            // Whatever parses must survive its own structural checks and
            // sender decoding without panicking
            let _ = wire.check_structure();
            let _ = wire.sender();

            // Written back out, it must parse to the same fields
            if let Ok(written) = wire.to_xml() {
                let reparsed = EnvelopeWireForm::from_xml(&written);
                assert_eq!(reparsed.as_ref().ok(), Some(&wire));
            }
        }
        Err(err) => assert!(matches!(err, EnvelopeError::InvalidEnvelope(_))),
    }
});
