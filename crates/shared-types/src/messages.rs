//! # Message Types
//!
//! Concrete federation messages. Only the status message ships here; other
//! message types implement `Entity` the same way in their own crates.

use crate::entities::{DefaultValue, Entity, Properties, PropertyDef};
use crate::errors::EntityError;

/// A public or limited status post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    /// Globally unique id of the post.
    pub guid: String,
    /// Post body.
    pub text: String,
    /// Whether the post is visible to everyone.
    pub public: bool,
}

const STATUS_MESSAGE_SCHEMA: &[PropertyDef] = &[
    PropertyDef::text("guid").required(),
    PropertyDef::text("text").required(),
    PropertyDef::boolean("public").with_default(DefaultValue::Boolean(false)),
];

impl StatusMessage {
    /// Create a validated, non-public status message.
    pub fn new(guid: impl Into<String>, text: impl Into<String>) -> Result<Self, EntityError> {
        let message = Self {
            guid: guid.into(),
            text: text.into(),
            public: false,
        };
        message.validate()?;
        Ok(message)
    }

    /// Builder-style method to set visibility.
    pub fn with_public(mut self, public: bool) -> Self {
        self.public = public;
        self
    }
}

impl Entity for StatusMessage {
    const ENTITY_NAME: &'static str = "status_message";

    fn schema() -> &'static [PropertyDef] {
        STATUS_MESSAGE_SCHEMA
    }

    fn to_properties(&self) -> Properties {
        Properties::new()
            .with("guid", self.guid.as_str())
            .with("text", self.text.as_str())
            .with("public", self.public)
    }

    fn from_properties(properties: &Properties) -> Result<Self, EntityError> {
        Ok(Self {
            guid: properties.text(Self::ENTITY_NAME, "guid")?,
            text: properties.text(Self::ENTITY_NAME, "text")?,
            public: properties.boolean(Self::ENTITY_NAME, "public")?,
        })
    }
}
