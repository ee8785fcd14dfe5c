//! # Error Types
//!
//! Codec-level errors raised while building, packing or unpacking entities.
//! The envelope engine passes these through unchanged.

use thiserror::Error;

/// Errors that can occur while handling federation entities.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EntityError {
    /// The payload bytes are not well-formed XML (or not UTF-8 at all).
    #[error("Malformed XML payload: {0}")]
    MalformedXml(String),

    /// The payload root element does not name the expected entity.
    #[error("Unknown entity: expected <{expected}>, found <{found}>")]
    UnknownEntity { expected: String, found: String },

    /// A required property is absent or empty.
    #[error("Missing property '{property}' on {entity}")]
    MissingProperty { entity: String, property: String },

    /// A property value does not match its declared kind.
    #[error("Invalid value for {entity}.{property}: {reason}")]
    InvalidValue {
        entity: String,
        property: String,
        reason: String,
    },

    /// A property was set that the entity schema does not declare.
    #[error("Unknown property '{property}' on {entity}")]
    UnknownProperty { entity: String, property: String },

    /// Writing the XML payload failed.
    #[error("Serialization failed: {0}")]
    Serialization(String),
}

impl EntityError {
    pub(crate) fn missing(entity: &str, property: &str) -> Self {
        Self::MissingProperty {
            entity: entity.to_string(),
            property: property.to_string(),
        }
    }

    pub(crate) fn invalid(entity: &str, property: &str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            entity: entity.to_string(),
            property: property.to_string(),
            reason: reason.into(),
        }
    }
}
