//! Discovery document error types.

use thiserror::Error;

/// Errors reading or writing discovery documents.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// A required part of the document is missing
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// The document is complete but a value is unusable
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// The XML could not be read or written
    #[error("XML error: {0}")]
    Xml(String),

    /// The JRD JSON could not be read or written
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<quick_xml::Error> for DiscoveryError {
    fn from(err: quick_xml::Error) -> Self {
        Self::Xml(err.to_string())
    }
}
