//! # Envelope Wire Form
//!
//! The XML structure a Magic Envelope travels in:
//!
//! ```text
//! <me:env xmlns:me="http://salmon-protocol.org/ns/magic-env">
//!   <me:data type="application/xml">{b64url(payload)}</me:data>
//!   <me:encoding>base64url</me:encoding>
//!   <me:alg>RSA-SHA256</me:alg>
//!   <me:sig key_id="{b64url(sender)}">{b64url(signature)}</me:sig>
//! </me:env>
//! ```
//!
//! Elements are matched by resolved namespace and local name: any prefix
//! (or the default namespace) bound to `NAMESPACE` is accepted on read,
//! any other namespace is not. Values are kept exactly as found; deciding
//! whether they are acceptable is the validation pipeline's job.

use crate::domain::encoding;
use crate::domain::errors::EnvelopeError;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::{NsReader, Writer};

/// Magic Envelope XML namespace.
pub const NAMESPACE: &str = "http://salmon-protocol.org/ns/magic-env";

/// The only payload type this protocol version produces.
pub const DATA_TYPE: &str = "application/xml";

/// The only accepted data encoding.
pub const ENCODING: &str = "base64url";

/// The only accepted signature algorithm.
pub const ALGORITHM: &str = "RSA-SHA256";

const ROOT: &str = "env";

/// Parsed (or to-be-written) envelope fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvelopeWireForm {
    /// Base64url payload bytes (possibly ciphertext).
    pub data: String,
    /// `type` attribute of `me:data`.
    pub data_type: String,
    /// Text of `me:encoding`.
    pub encoding: String,
    /// Text of `me:alg`.
    pub algorithm: String,
    /// Base64url signature.
    pub signature: String,
    /// Base64url sender identity, the `key_id` attribute of `me:sig`.
    pub key_id: Option<String>,
}

impl EnvelopeWireForm {
    /// Check the fields the pipeline cannot do without.
    pub fn check_structure(&self) -> Result<(), EnvelopeError> {
        if self.data.trim().is_empty() {
            return Err(invalid("empty data"));
        }
        if self.signature.trim().is_empty() {
            return Err(invalid("empty signature"));
        }
        Ok(())
    }

    /// Sender identity carried in `key_id`.
    ///
    /// # Errors
    ///
    /// `InvalidEnvelope` when `key_id` is missing, not base64url, or not
    /// UTF-8 text.
    pub fn sender(&self) -> Result<String, EnvelopeError> {
        let key_id = self
            .key_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| invalid("signature has no key_id"))?;
        let bytes =
            encoding::decode(key_id).map_err(|e| invalid(format!("key_id is not base64url: {e}")))?;
        let sender =
            String::from_utf8(bytes).map_err(|_| invalid("key_id is not a UTF-8 identity"))?;
        if sender.is_empty() {
            return Err(invalid("key_id decodes to an empty identity"));
        }
        Ok(sender)
    }

    // =========================================================================
    // XML
    // =========================================================================

    /// Write the envelope as a standalone XML document.
    pub fn to_xml(&self) -> Result<String, EnvelopeError> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(write_failed)?;

        let mut root = BytesStart::new("me:env");
        root.push_attribute(("xmlns:me", NAMESPACE));
        writer.write_event(Event::Start(root)).map_err(write_failed)?;

        writer
            .create_element("me:data")
            .with_attribute(("type", self.data_type.as_str()))
            .write_text_content(BytesText::new(&self.data))
            .map_err(write_failed)?;
        writer
            .create_element("me:encoding")
            .write_text_content(BytesText::new(&self.encoding))
            .map_err(write_failed)?;
        writer
            .create_element("me:alg")
            .write_text_content(BytesText::new(&self.algorithm))
            .map_err(write_failed)?;

        let mut sig = BytesStart::new("me:sig");
        if let Some(key_id) = &self.key_id {
            sig.push_attribute(("key_id", key_id.as_str()));
        }
        writer.write_event(Event::Start(sig)).map_err(write_failed)?;
        writer
            .write_event(Event::Text(BytesText::new(&self.signature)))
            .map_err(write_failed)?;
        writer
            .write_event(Event::End(BytesEnd::new("me:sig")))
            .map_err(write_failed)?;

        writer
            .write_event(Event::End(BytesEnd::new("me:env")))
            .map_err(write_failed)?;

        String::from_utf8(writer.into_inner()).map_err(|e| write_failed(e.to_string()))
    }

    /// Parse an envelope document.
    ///
    /// # Errors
    ///
    /// `InvalidEnvelope` when the document is not well-formed XML, the root
    /// is not `env` in the envelope namespace, or any of the five fields is
    /// absent or repeated. Children in other namespaces are skipped.
    pub fn from_xml(xml: &str) -> Result<Self, EnvelopeError> {
        let mut reader = NsReader::from_str(xml);

        let (root_in_namespace, root) = next_root(&mut reader)?;
        let root_name = local_name(&root)?;
        if root_name != ROOT {
            return Err(invalid(format!(
                "root element is <{root_name}>, expected <{ROOT}>"
            )));
        }
        if !root_in_namespace {
            return Err(invalid(format!("<{ROOT}> is not in the {NAMESPACE} namespace")));
        }

        let mut fields = Fields::default();
        loop {
            let (namespace, event) = reader.read_resolved_event().map_err(malformed)?;
            let in_namespace = is_envelope_namespace(&namespace);
            match event {
                Event::Start(start) if !in_namespace => {
                    reader.read_to_end(start.name()).map_err(malformed)?;
                }
                Event::Empty(_) if !in_namespace => {}
                Event::Start(start) => {
                    let name = local_name(&start)?;
                    let attribute = field_attribute(&name, &start)?;
                    let text = read_text(&mut reader)?;
                    fields.set(&name, text, attribute)?;
                }
                Event::Empty(start) => {
                    let name = local_name(&start)?;
                    let attribute = field_attribute(&name, &start)?;
                    fields.set(&name, String::new(), attribute)?;
                }
                Event::End(_) => break,
                Event::Eof => return Err(invalid("unexpected end of document")),
                _ => {}
            }
        }

        fields.finish()
    }
}

// =============================================================================
// PARSING HELPERS
// =============================================================================

#[derive(Default)]
struct Fields {
    data: Option<(String, Option<String>)>,
    encoding: Option<String>,
    algorithm: Option<String>,
    signature: Option<(String, Option<String>)>,
}

impl Fields {
    fn set(&mut self, name: &str, text: String, attribute: Option<String>) -> Result<(), EnvelopeError> {
        let duplicate = match name {
            "data" => self.data.replace((text, attribute)).is_some(),
            "encoding" => self.encoding.replace(text).is_some(),
            "alg" => self.algorithm.replace(text).is_some(),
            "sig" => self.signature.replace((text, attribute)).is_some(),
            _ => false,
        };
        if duplicate {
            return Err(invalid(format!("repeated <{name}> element")));
        }
        Ok(())
    }

    fn finish(self) -> Result<EnvelopeWireForm, EnvelopeError> {
        let (data, data_type) = self.data.ok_or_else(|| invalid("missing <data>"))?;
        let data_type = data_type.ok_or_else(|| invalid("<data> has no type attribute"))?;
        let encoding = self.encoding.ok_or_else(|| invalid("missing <encoding>"))?;
        let algorithm = self.algorithm.ok_or_else(|| invalid("missing <alg>"))?;
        let (signature, key_id) = self.signature.ok_or_else(|| invalid("missing <sig>"))?;

        Ok(EnvelopeWireForm {
            data,
            data_type,
            encoding,
            algorithm,
            signature,
            key_id,
        })
    }
}

fn invalid(reason: impl Into<String>) -> EnvelopeError {
    EnvelopeError::InvalidEnvelope(reason.into())
}

fn malformed(err: quick_xml::Error) -> EnvelopeError {
    invalid(format!("malformed XML: {err}"))
}

fn write_failed(err: impl ToString) -> EnvelopeError {
    invalid(format!("failed to write envelope: {}", err.to_string()))
}

fn local_name(start: &BytesStart<'_>) -> Result<String, EnvelopeError> {
    std::str::from_utf8(start.local_name().as_ref())
        .map(str::to_string)
        .map_err(|_| invalid("element name is not UTF-8"))
}

/// The attribute each field element carries, if any.
fn field_attribute(name: &str, start: &BytesStart<'_>) -> Result<Option<String>, EnvelopeError> {
    let attribute = match name {
        "data" => "type",
        "sig" => "key_id",
        _ => return Ok(None),
    };
    let Some(attr) = start
        .try_get_attribute(attribute)
        .map_err(|e| invalid(format!("bad attributes on <{name}>: {e}")))?
    else {
        return Ok(None);
    };
    let value = attr.unescape_value().map_err(malformed)?;
    Ok(Some(value.into_owned()))
}

fn is_envelope_namespace(namespace: &ResolveResult<'_>) -> bool {
    matches!(namespace, ResolveResult::Bound(Namespace(ns)) if *ns == NAMESPACE.as_bytes())
}

/// The root element, and whether it is in the envelope namespace.
fn next_root<'a>(reader: &mut NsReader<&'a [u8]>) -> Result<(bool, BytesStart<'a>), EnvelopeError> {
    loop {
        let (namespace, event) = reader.read_resolved_event().map_err(malformed)?;
        match event {
            Event::Start(start) => return Ok((is_envelope_namespace(&namespace), start)),
            Event::Empty(_) => return Err(invalid("envelope root has no children")),
            Event::Decl(_) | Event::Comment(_) | Event::PI(_) | Event::DocType(_) => {}
            Event::Text(text) if text.iter().all(u8::is_ascii_whitespace) => {}
            Event::Eof => return Err(invalid("no root element")),
            _ => return Err(invalid("content outside of the root element")),
        }
    }
}

/// Text content of the current element; nested elements are skipped.
fn read_text(reader: &mut NsReader<&[u8]>) -> Result<String, EnvelopeError> {
    let mut text = String::new();
    loop {
        match reader.read_event().map_err(malformed)? {
            Event::Text(content) => text.push_str(&content.unescape().map_err(malformed)?),
            Event::CData(content) => {
                let raw = content.into_inner();
                text.push_str(
                    std::str::from_utf8(&raw).map_err(|_| invalid("CDATA is not UTF-8"))?,
                );
            }
            Event::Start(nested) => {
                reader.read_to_end(nested.name()).map_err(malformed)?;
            }
            Event::End(_) => return Ok(text),
            Event::Eof => return Err(invalid("unexpected end of document")),
            _ => {}
        }
    }
}
