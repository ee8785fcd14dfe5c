//! # Entity Property System
//!
//! Every federation message type is a plain struct paired with a static
//! schema describing its properties.
//!
//! ## Building Blocks
//!
//! - **`PropertyDef`**: name, kind, required flag and optional default
//! - **`PropertyValue`**: a typed property value (text, boolean, integer)
//! - **`Properties`**: ordered name/value list exchanged with the codec
//! - **`Entity`**: the trait each message type implements by hand

use crate::errors::EntityError;
use rand::RngCore;
use std::fmt;

// =============================================================================
// PROPERTY SCHEMA
// =============================================================================

/// The declared kind of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    /// Free-form text.
    Text,
    /// `true` / `false`.
    Boolean,
    /// Signed 64-bit integer.
    Integer,
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyKind::Text => f.write_str("text"),
            PropertyKind::Boolean => f.write_str("boolean"),
            PropertyKind::Integer => f.write_str("integer"),
        }
    }
}

/// A default value that can live in a `static` schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultValue {
    Text(&'static str),
    Boolean(bool),
    Integer(i64),
}

impl DefaultValue {
    /// Materialize the default as an owned property value.
    pub fn to_value(self) -> PropertyValue {
        match self {
            DefaultValue::Text(text) => PropertyValue::Text(text.to_string()),
            DefaultValue::Boolean(flag) => PropertyValue::Boolean(flag),
            DefaultValue::Integer(number) => PropertyValue::Integer(number),
        }
    }
}

/// Declaration of a single entity property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyDef {
    /// XML element name of the property.
    pub name: &'static str,
    /// Declared kind.
    pub kind: PropertyKind,
    /// Whether the property must be present (and non-empty for text).
    pub required: bool,
    /// Value applied when the property is absent.
    pub default: Option<DefaultValue>,
}

impl PropertyDef {
    const fn new(name: &'static str, kind: PropertyKind) -> Self {
        Self {
            name,
            kind,
            required: false,
            default: None,
        }
    }

    /// Declare an optional text property.
    pub const fn text(name: &'static str) -> Self {
        Self::new(name, PropertyKind::Text)
    }

    /// Declare an optional boolean property.
    pub const fn boolean(name: &'static str) -> Self {
        Self::new(name, PropertyKind::Boolean)
    }

    /// Declare an optional integer property.
    pub const fn integer(name: &'static str) -> Self {
        Self::new(name, PropertyKind::Integer)
    }

    /// Mark the property as required.
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Attach a default value.
    pub const fn with_default(mut self, default: DefaultValue) -> Self {
        self.default = Some(default);
        self
    }
}

// =============================================================================
// PROPERTY VALUES
// =============================================================================

/// A typed property value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
    Text(String),
    Boolean(bool),
    Integer(i64),
}

impl PropertyValue {
    /// The kind of this value.
    pub fn kind(&self) -> PropertyKind {
        match self {
            PropertyValue::Text(_) => PropertyKind::Text,
            PropertyValue::Boolean(_) => PropertyKind::Boolean,
            PropertyValue::Integer(_) => PropertyKind::Integer,
        }
    }

    /// Render the value as XML element text.
    pub fn to_xml_text(&self) -> String {
        match self {
            PropertyValue::Text(text) => text.clone(),
            PropertyValue::Boolean(flag) => flag.to_string(),
            PropertyValue::Integer(number) => number.to_string(),
        }
    }

    /// Coerce raw element text into a value of the given kind.
    ///
    /// Returns `None` when the text cannot represent that kind.
    pub fn parse(kind: PropertyKind, raw: &str) -> Option<Self> {
        match kind {
            PropertyKind::Text => Some(PropertyValue::Text(raw.to_string())),
            PropertyKind::Boolean => parse_boolean(raw).map(PropertyValue::Boolean),
            PropertyKind::Integer => raw.trim().parse().ok().map(PropertyValue::Integer),
        }
    }
}

fn parse_boolean(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "t" | "yes" | "y" | "1" => Some(true),
        "false" | "f" | "no" | "n" | "0" => Some(false),
        _ => None,
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::Text(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::Text(value.to_string())
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Boolean(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        PropertyValue::Integer(value)
    }
}

// =============================================================================
// PROPERTY SETS
// =============================================================================

/// Ordered set of named property values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    entries: Vec<(String, PropertyValue)>,
}

impl Properties {
    /// Create an empty property set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: &str, value: impl Into<PropertyValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert or replace a value.
    pub fn insert(&mut self, name: &str, value: impl Into<PropertyValue>) {
        let value = value.into();
        match self.entries.iter_mut().find(|(key, _)| key == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name.to_string(), value)),
        }
    }

    /// Look up a value by name.
    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Iterate over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fetch a text property.
    pub fn text(&self, entity: &str, name: &str) -> Result<String, EntityError> {
        match self.get(name) {
            Some(PropertyValue::Text(text)) => Ok(text.clone()),
            Some(other) => Err(EntityError::invalid(
                entity,
                name,
                format!("expected text, found {}", other.kind()),
            )),
            None => Err(EntityError::missing(entity, name)),
        }
    }

    /// Fetch a boolean property.
    pub fn boolean(&self, entity: &str, name: &str) -> Result<bool, EntityError> {
        match self.get(name) {
            Some(PropertyValue::Boolean(flag)) => Ok(*flag),
            Some(other) => Err(EntityError::invalid(
                entity,
                name,
                format!("expected boolean, found {}", other.kind()),
            )),
            None => Err(EntityError::missing(entity, name)),
        }
    }

    /// Fetch an integer property.
    pub fn integer(&self, entity: &str, name: &str) -> Result<i64, EntityError> {
        match self.get(name) {
            Some(PropertyValue::Integer(number)) => Ok(*number),
            Some(other) => Err(EntityError::invalid(
                entity,
                name,
                format!("expected integer, found {}", other.kind()),
            )),
            None => Err(EntityError::missing(entity, name)),
        }
    }

    /// Check this set against a schema.
    ///
    /// Every entry must be declared with a matching kind, and every
    /// required property must be present (non-empty for text).
    pub fn validate(&self, entity: &str, schema: &[PropertyDef]) -> Result<(), EntityError> {
        for (name, value) in self.iter() {
            let def = schema.iter().find(|def| def.name == name).ok_or_else(|| {
                EntityError::UnknownProperty {
                    entity: entity.to_string(),
                    property: name.to_string(),
                }
            })?;
            if def.kind != value.kind() {
                return Err(EntityError::invalid(
                    entity,
                    name,
                    format!("expected {}, found {}", def.kind, value.kind()),
                ));
            }
        }

        for def in schema.iter().filter(|def| def.required) {
            match self.get(def.name) {
                None => return Err(EntityError::missing(entity, def.name)),
                Some(PropertyValue::Text(text)) if text.is_empty() => {
                    return Err(EntityError::missing(entity, def.name))
                }
                Some(_) => {}
            }
        }

        Ok(())
    }

    /// Build a validated set from raw element texts.
    ///
    /// Undeclared names are ignored so newer correspondents can add
    /// properties without breaking older readers. Absent properties take
    /// their schema default.
    pub fn from_raw(
        entity: &str,
        schema: &[PropertyDef],
        raw: &[(String, String)],
    ) -> Result<Self, EntityError> {
        let mut properties = Properties::new();

        for def in schema {
            let found = raw.iter().find(|(name, _)| name == def.name);
            match found {
                Some((_, text)) => {
                    let value = PropertyValue::parse(def.kind, text).ok_or_else(|| {
                        EntityError::invalid(entity, def.name, format!("not a {}", def.kind))
                    })?;
                    properties.insert(def.name, value);
                }
                None => {
                    if let Some(default) = def.default {
                        properties.insert(def.name, default.to_value());
                    }
                }
            }
        }

        properties.validate(entity, schema)?;
        Ok(properties)
    }
}

// =============================================================================
// ENTITY TRAIT
// =============================================================================

/// A typed federation message.
///
/// Implementations map their fields to and from a `Properties` set; the
/// payload codec handles XML. `from_properties` receives a set already
/// validated against `schema()`.
pub trait Entity: Sized + Clone + fmt::Debug + PartialEq + Send + Sync + 'static {
    /// XML root element name.
    const ENTITY_NAME: &'static str;

    /// Property declarations, in serialization order.
    fn schema() -> &'static [PropertyDef];

    /// Export the entity's fields.
    fn to_properties(&self) -> Properties;

    /// Rebuild the entity from a validated property set.
    fn from_properties(properties: &Properties) -> Result<Self, EntityError>;

    /// Validate the entity's current fields against its schema.
    fn validate(&self) -> Result<(), EntityError> {
        self.to_properties()
            .validate(Self::ENTITY_NAME, Self::schema())
    }
}

/// Generate a fresh entity guid: 16 random bytes, lowercase hex.
pub fn generate_guid() -> String {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
