//! Envelope engine configuration and validation
//!
//! # Example
//!
//! ```ignore
//! use magic_envelope::domain::config::EnvelopeConfigBuilder;
//!
//! let config = EnvelopeConfigBuilder::new()
//!     .max_envelope_bytes(256 * 1024)
//!     .build()
//!     .expect("Valid config");
//! ```

use crate::domain::errors::EnvelopeError;
use serde::{Deserialize, Serialize};

/// Default limit on raw envelope XML: 1 MiB.
pub const DEFAULT_MAX_ENVELOPE_BYTES: usize = 1024 * 1024;

/// Default limit on decoded payload bytes: 512 KiB.
pub const DEFAULT_MAX_PAYLOAD_BYTES: usize = 512 * 1024;

/// Size limits applied to incoming envelopes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeConfig {
    /// Largest raw XML document accepted by `unenvelop_xml`
    pub max_envelope_bytes: usize,
    /// Largest decoded (pre-decryption) payload accepted
    pub max_payload_bytes: usize,
}

impl Default for EnvelopeConfig {
    fn default() -> Self {
        Self {
            max_envelope_bytes: DEFAULT_MAX_ENVELOPE_BYTES,
            max_payload_bytes: DEFAULT_MAX_PAYLOAD_BYTES,
        }
    }
}

impl EnvelopeConfig {
    /// Create a new configuration with validation
    pub fn new(max_envelope_bytes: usize, max_payload_bytes: usize) -> Result<Self, EnvelopeError> {
        let config = Self {
            max_envelope_bytes,
            max_payload_bytes,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject limits that would refuse every envelope
    pub fn validate(&self) -> Result<(), EnvelopeError> {
        if self.max_envelope_bytes == 0 {
            return Err(EnvelopeError::ArgumentError(
                "max_envelope_bytes cannot be 0".to_string(),
            ));
        }
        if self.max_payload_bytes == 0 {
            return Err(EnvelopeError::ArgumentError(
                "max_payload_bytes cannot be 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Builder-style method to set the raw XML limit
    pub fn with_max_envelope_bytes(mut self, bytes: usize) -> Self {
        self.max_envelope_bytes = bytes;
        self
    }

    /// Builder-style method to set the decoded payload limit
    pub fn with_max_payload_bytes(mut self, bytes: usize) -> Self {
        self.max_payload_bytes = bytes;
        self
    }
}

/// Builder for EnvelopeConfig with validation
#[derive(Default)]
pub struct EnvelopeConfigBuilder {
    max_envelope_bytes: Option<usize>,
    max_payload_bytes: Option<usize>,
}

impl EnvelopeConfigBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the raw XML limit
    pub fn max_envelope_bytes(mut self, bytes: usize) -> Self {
        self.max_envelope_bytes = Some(bytes);
        self
    }

    /// Set the decoded payload limit
    pub fn max_payload_bytes(mut self, bytes: usize) -> Self {
        self.max_payload_bytes = Some(bytes);
        self
    }

    /// Build the EnvelopeConfig, validating all parameters
    pub fn build(self) -> Result<EnvelopeConfig, EnvelopeError> {
        let config = self.build_unchecked();
        config.validate()?;
        Ok(config)
    }

    /// Build without validation (for testing)
    pub fn build_unchecked(self) -> EnvelopeConfig {
        let defaults = EnvelopeConfig::default();
        EnvelopeConfig {
            max_envelope_bytes: self.max_envelope_bytes.unwrap_or(defaults.max_envelope_bytes),
            max_payload_bytes: self.max_payload_bytes.unwrap_or(defaults.max_payload_bytes),
        }
    }
}
