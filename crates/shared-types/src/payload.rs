//! # XML Payload Codec
//!
//! Packs an entity into the XML bytes carried by a Magic Envelope and
//! unpacks them again.
//!
//! ```text
//! <status_message>
//!   <guid>abc123</guid>
//!   <text>hello</text>
//!   <public>false</public>
//! </status_message>
//! ```
//!
//! Older correspondents wrap the entity as `<XML><post>…</post></XML>`;
//! the wrapper is accepted on read and never written.

use crate::entities::{Entity, Properties};
use crate::errors::EntityError;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

/// Root element of the legacy payload wrapper.
pub const LEGACY_ROOT: &str = "XML";

/// Second-level element of the legacy payload wrapper.
pub const LEGACY_POST: &str = "post";

// =============================================================================
// PACK
// =============================================================================

/// Serialize an entity to XML bytes.
///
/// # Errors
///
/// Schema violations surface as the matching `EntityError`; writer
/// failures as `EntityError::Serialization`.
pub fn pack<E: Entity>(entity: &E) -> Result<Vec<u8>, EntityError> {
    let properties = entity.to_properties();
    properties.validate(E::ENTITY_NAME, E::schema())?;

    let mut writer = Writer::new(Vec::new());
    writer
        .write_event(Event::Start(BytesStart::new(E::ENTITY_NAME)))
        .map_err(serialization)?;

    for def in E::schema() {
        if let Some(value) = properties.get(def.name) {
            writer
                .create_element(def.name)
                .write_text_content(BytesText::new(&value.to_xml_text()))
                .map_err(serialization)?;
        }
    }

    writer
        .write_event(Event::End(BytesEnd::new(E::ENTITY_NAME)))
        .map_err(serialization)?;

    Ok(writer.into_inner())
}

fn serialization(err: quick_xml::Error) -> EntityError {
    EntityError::Serialization(err.to_string())
}

// =============================================================================
// UNPACK
// =============================================================================

/// Deserialize XML bytes into an entity of type `E`.
///
/// # Errors
///
/// - `EntityError::MalformedXml` for non-UTF-8 or ill-formed input
/// - `EntityError::UnknownEntity` when the root does not name `E`
/// - property errors from schema validation
pub fn unpack<E: Entity>(bytes: &[u8]) -> Result<E, EntityError> {
    let xml = std::str::from_utf8(bytes).map_err(|e| malformed(e.to_string()))?;
    let mut reader = Reader::from_str(xml);

    let (mut root, mut self_closing) = next_start(&mut reader)?;
    if root == LEGACY_ROOT && !self_closing {
        let (post, _) = next_start(&mut reader)?;
        if post != LEGACY_POST {
            return Err(unknown::<E>(post));
        }
        (root, self_closing) = next_start(&mut reader)?;
        tracing::trace!(entity = %root, "Unwrapped legacy payload envelope");
    }

    if root != E::ENTITY_NAME {
        return Err(unknown::<E>(root));
    }

    let raw = if self_closing {
        Vec::new()
    } else {
        read_children(&mut reader)?
    };
    let properties = Properties::from_raw(E::ENTITY_NAME, E::schema(), &raw)?;
    E::from_properties(&properties)
}

fn unknown<E: Entity>(found: String) -> EntityError {
    EntityError::UnknownEntity {
        expected: E::ENTITY_NAME.to_string(),
        found,
    }
}

fn malformed(reason: impl Into<String>) -> EntityError {
    EntityError::MalformedXml(reason.into())
}

fn element_name(start: &BytesStart<'_>) -> Result<String, EntityError> {
    std::str::from_utf8(start.local_name().as_ref())
        .map(str::to_string)
        .map_err(|e| malformed(e.to_string()))
}

/// Advance to the next opening element and return its local name, and
/// whether it is self-closing.
fn next_start(reader: &mut Reader<&[u8]>) -> Result<(String, bool), EntityError> {
    loop {
        match reader.read_event().map_err(|e| malformed(e.to_string()))? {
            Event::Start(start) => return Ok((element_name(&start)?, false)),
            Event::Empty(start) => return Ok((element_name(&start)?, true)),
            Event::Decl(_) | Event::Comment(_) | Event::PI(_) | Event::DocType(_) => {}
            Event::Text(text) if text.iter().all(u8::is_ascii_whitespace) => {}
            Event::Text(_) | Event::CData(_) => {
                return Err(malformed("text outside of the root element"))
            }
            Event::End(_) => return Err(malformed("unexpected closing tag")),
            Event::Eof => return Err(malformed("no root element")),
        }
    }
}

/// Collect `(name, text)` pairs for each direct child of the current element.
fn read_children(reader: &mut Reader<&[u8]>) -> Result<Vec<(String, String)>, EntityError> {
    let mut children = Vec::new();

    loop {
        match reader.read_event().map_err(|e| malformed(e.to_string()))? {
            Event::Start(start) => {
                let name = element_name(&start)?;
                let text = read_text(reader)?;
                children.push((name, text));
            }
            Event::Empty(start) => children.push((element_name(&start)?, String::new())),
            Event::End(_) => return Ok(children),
            Event::Eof => return Err(malformed("unexpected end of document")),
            _ => {}
        }
    }
}

/// Read the text content of the current element up to its closing tag.
/// Nested elements are skipped.
fn read_text(reader: &mut Reader<&[u8]>) -> Result<String, EntityError> {
    let mut text = String::new();

    loop {
        match reader.read_event().map_err(|e| malformed(e.to_string()))? {
            Event::Text(content) => {
                let unescaped = content.unescape().map_err(|e| malformed(e.to_string()))?;
                text.push_str(&unescaped);
            }
            Event::CData(content) => {
                let raw = content.into_inner();
                text.push_str(std::str::from_utf8(&raw).map_err(|e| malformed(e.to_string()))?);
            }
            Event::Start(nested) => {
                reader
                    .read_to_end(nested.name())
                    .map_err(|e| malformed(e.to_string()))?;
            }
            Event::End(_) => return Ok(text),
            Event::Eof => return Err(malformed("unexpected end of document")),
            _ => {}
        }
    }
}
