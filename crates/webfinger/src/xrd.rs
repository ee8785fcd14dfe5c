//! # XRD Documents
//!
//! Extensible Resource Descriptor 1.0, the link-relation document behind
//! both WebFinger and host-meta. Written as XML, read from XML or from its
//! JSON rendition (JRD).
//!
//! ```text
//! <XRD xmlns="http://docs.oasis-open.org/ns/xri/xrd-1.0">
//!   <Subject>acct:alice@pod.example</Subject>
//!   <Alias>https://pod.example/people/0123</Alias>
//!   <Link rel="http://webfinger.net/rel/profile-page" type="text/html" href="..."/>
//! </XRD>
//! ```

use crate::errors::DiscoveryError;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// XRD 1.0 namespace.
pub const XRD_NAMESPACE: &str = "http://docs.oasis-open.org/ns/xri/xrd-1.0";

/// XML Schema instance namespace, for `xsi:nil` properties.
pub const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// One link relation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Relation type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rel: Option<String>,
    /// Media type of the target.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub link_type: Option<String>,
    /// Target URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    /// Target URL template.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
}

impl Link {
    /// Link with a relation and a target URL.
    pub fn href(rel: impl Into<String>, link_type: Option<&str>, href: impl Into<String>) -> Self {
        Self {
            rel: Some(rel.into()),
            link_type: link_type.map(str::to_string),
            href: Some(href.into()),
            template: None,
        }
    }

    /// Link with a relation and a URL template.
    pub fn template(rel: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            rel: Some(rel.into()),
            link_type: None,
            href: None,
            template: Some(template.into()),
        }
    }

    fn has_rel(&self, rel: &str) -> bool {
        self.rel.as_deref() == Some(rel)
    }
}

/// An XRD document.
///
/// `subject` and `links` are optional at this level; documents built on top
/// of XRD decide what they require.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct XrdDocument {
    /// Expiry timestamp, kept as written (`xsd:dateTime`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires: Option<String>,
    /// The resource the document describes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    /// Other URIs for the same resource.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    /// Property type to value; `None` is a nil property.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, Option<String>>,
    /// Link relations, in document order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<Link>>,
}

impl XrdDocument {
    /// First link with relation `rel`.
    pub fn link(&self, rel: &str) -> Option<&Link> {
        self.links.iter().flatten().find(|link| link.has_rel(rel))
    }

    /// Append a link, creating the link set if needed.
    pub fn push_link(&mut self, link: Link) {
        self.links.get_or_insert_with(Vec::new).push(link);
    }

    // =========================================================================
    // JRD
    // =========================================================================

    /// Render as JRD JSON.
    pub fn to_json(&self) -> Result<String, DiscoveryError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse JRD JSON.
    pub fn from_json(json: &str) -> Result<Self, DiscoveryError> {
        Ok(serde_json::from_str(json)?)
    }

    // =========================================================================
    // XML
    // =========================================================================

    /// Render as an XRD XML document.
    pub fn to_xml(&self) -> Result<String, DiscoveryError> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

        let mut root = BytesStart::new("XRD");
        root.push_attribute(("xmlns", XRD_NAMESPACE));
        if self.properties.values().any(Option::is_none) {
            root.push_attribute(("xmlns:xsi", XSI_NAMESPACE));
        }
        writer.write_event(Event::Start(root))?;

        if let Some(expires) = &self.expires {
            writer
                .create_element("Expires")
                .write_text_content(BytesText::new(expires))?;
        }
        if let Some(subject) = &self.subject {
            writer
                .create_element("Subject")
                .write_text_content(BytesText::new(subject))?;
        }
        for alias in &self.aliases {
            writer
                .create_element("Alias")
                .write_text_content(BytesText::new(alias))?;
        }
        for (property_type, value) in &self.properties {
            let element = writer
                .create_element("Property")
                .with_attribute(("type", property_type.as_str()));
            match value {
                Some(value) => element.write_text_content(BytesText::new(value))?,
                None => element.with_attribute(("xsi:nil", "true")).write_empty()?,
            };
        }
        for link in self.links.iter().flatten() {
            let attributes = [
                ("rel", &link.rel),
                ("type", &link.link_type),
                ("href", &link.href),
                ("template", &link.template),
            ];
            writer
                .create_element("Link")
                .with_attributes(attributes.iter().filter_map(|(name, value)| {
                    value.as_deref().map(|value| Attribute::from((*name, value)))
                }))
                .write_empty()?;
        }

        writer.write_event(Event::End(BytesEnd::new("XRD")))?;

        String::from_utf8(writer.into_inner()).map_err(|e| DiscoveryError::Xml(e.to_string()))
    }

    /// Parse an XRD XML document.
    ///
    /// # Errors
    ///
    /// `Xml` for ill-formed input, `InvalidDocument` when the root element
    /// is not `XRD`.
    pub fn from_xml(xml: &str) -> Result<Self, DiscoveryError> {
        let mut reader = Reader::from_str(xml);

        let root = next_root(&mut reader)?;
        let root_name = local_name(&root)?;
        if root_name != "XRD" {
            return Err(DiscoveryError::InvalidDocument(format!(
                "root element is <{root_name}>, expected <XRD>"
            )));
        }
        if matches!(root, RootEvent::Empty(_)) {
            return Ok(Self::default());
        }

        let mut document = Self::default();
        loop {
            match reader.read_event()? {
                Event::Start(start) => {
                    let name = local_name(&start)?;
                    match name.as_str() {
                        "Link" => {
                            let link = read_link(&start)?;
                            reader.read_to_end(start.name())?;
                            document.push_link(link);
                        }
                        _ => {
                            let nil = is_nil(&start)?;
                            let property_type = attribute(&start, "type")?;
                            let text = read_text(&mut reader)?;
                            document.set(&name, text, property_type, nil);
                        }
                    }
                }
                Event::Empty(start) => {
                    let name = local_name(&start)?;
                    if name == "Link" {
                        document.push_link(read_link(&start)?);
                    } else {
                        let nil = is_nil(&start)?;
                        let property_type = attribute(&start, "type")?;
                        document.set(&name, String::new(), property_type, nil);
                    }
                }
                Event::End(_) => break,
                Event::Eof => {
                    return Err(DiscoveryError::Xml("unexpected end of document".to_string()))
                }
                _ => {}
            }
        }

        Ok(document)
    }

    fn set(&mut self, element: &str, text: String, property_type: Option<String>, nil: bool) {
        match element {
            "Expires" => self.expires = Some(text),
            "Subject" => self.subject = Some(text),
            "Alias" => self.aliases.push(text),
            "Property" => {
                if let Some(property_type) = property_type {
                    self.properties
                        .insert(property_type, if nil { None } else { Some(text) });
                }
            }
            _ => {}
        }
    }
}

// =============================================================================
// PARSING HELPERS
// =============================================================================

enum RootEvent<'a> {
    Start(BytesStart<'a>),
    Empty(BytesStart<'a>),
}

impl<'a> std::ops::Deref for RootEvent<'a> {
    type Target = BytesStart<'a>;

    fn deref(&self) -> &Self::Target {
        match self {
            Self::Start(start) | Self::Empty(start) => start,
        }
    }
}

fn next_root<'a>(reader: &mut Reader<&'a [u8]>) -> Result<RootEvent<'a>, DiscoveryError> {
    loop {
        match reader.read_event()? {
            Event::Start(start) => return Ok(RootEvent::Start(start)),
            Event::Empty(start) => return Ok(RootEvent::Empty(start)),
            Event::Decl(_) | Event::Comment(_) | Event::PI(_) | Event::DocType(_) => {}
            Event::Text(text) if text.iter().all(u8::is_ascii_whitespace) => {}
            Event::Eof => return Err(DiscoveryError::Xml("no root element".to_string())),
            _ => {
                return Err(DiscoveryError::Xml(
                    "content outside of the root element".to_string(),
                ))
            }
        }
    }
}

fn local_name(start: &BytesStart<'_>) -> Result<String, DiscoveryError> {
    std::str::from_utf8(start.local_name().as_ref())
        .map(str::to_string)
        .map_err(|e| DiscoveryError::Xml(e.to_string()))
}

fn attribute(start: &BytesStart<'_>, name: &str) -> Result<Option<String>, DiscoveryError> {
    let Some(attr) = start
        .try_get_attribute(name)
        .map_err(|e| DiscoveryError::Xml(e.to_string()))?
    else {
        return Ok(None);
    };
    Ok(Some(attr.unescape_value()?.into_owned()))
}

fn is_nil(start: &BytesStart<'_>) -> Result<bool, DiscoveryError> {
    for attr in start.attributes() {
        let attr = attr.map_err(|e| DiscoveryError::Xml(e.to_string()))?;
        if attr.key.local_name().as_ref() == b"nil" {
            return Ok(attr.unescape_value()? == "true");
        }
    }
    Ok(false)
}

fn read_link(start: &BytesStart<'_>) -> Result<Link, DiscoveryError> {
    Ok(Link {
        rel: attribute(start, "rel")?,
        link_type: attribute(start, "type")?,
        href: attribute(start, "href")?,
        template: attribute(start, "template")?,
    })
}

fn read_text(reader: &mut Reader<&[u8]>) -> Result<String, DiscoveryError> {
    let mut text = String::new();
    loop {
        match reader.read_event()? {
            Event::Text(content) => text.push_str(&content.unescape()?),
            Event::CData(content) => {
                let raw = content.into_inner();
                text.push_str(
                    std::str::from_utf8(&raw).map_err(|e| DiscoveryError::Xml(e.to_string()))?,
                );
            }
            Event::Start(nested) => {
                reader.read_to_end(nested.name())?;
            }
            Event::End(_) => return Ok(text.trim().to_string()),
            Event::Eof => {
                return Err(DiscoveryError::Xml("unexpected end of document".to_string()))
            }
            _ => {}
        }
    }
}
