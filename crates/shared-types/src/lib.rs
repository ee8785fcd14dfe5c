//! # Shared Types Crate
//!
//! Typed federation entities and the XML payload codec used by the
//! Magic Envelope engine.
//!
//! ## Design Principles
//!
//! - **Explicit Schemas**: Every entity declares its property list (name,
//!   kind, required flag, default) as a static `PropertyDef` slice.
//! - **Validated Construction**: Entities are checked against their schema
//!   both when built in code and when unpacked from XML.
//! - **Flat Payloads**: An entity serializes to a single XML element whose
//!   children are its properties, in schema order.

pub mod entities;
pub mod errors;
pub mod messages;
pub mod payload;

pub use entities::{
    generate_guid, DefaultValue, Entity, Properties, PropertyDef, PropertyKind, PropertyValue,
};
pub use errors::EntityError;
pub use messages::StatusMessage;
pub use payload::{pack, unpack};
