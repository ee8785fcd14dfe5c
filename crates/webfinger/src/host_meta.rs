//! # Host-Meta
//!
//! The per-server XRD at `/.well-known/host-meta`. Its single `lrdd` link
//! tells other servers where to ask for WebFinger documents.

use crate::errors::DiscoveryError;
use crate::xrd::{Link, XrdDocument};

/// Relation of the WebFinger template link.
pub const REL_LRDD: &str = "lrdd";

/// Placeholder replaced by the queried account URI.
pub const URI_PLACEHOLDER: &str = "{uri}";

/// A host-meta document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostMeta {
    webfinger_template_url: String,
}

impl HostMeta {
    /// Host-meta for a server reachable at `base_url`.
    ///
    /// # Errors
    ///
    /// `InvalidData` when `base_url` is not an http(s) URL.
    pub fn from_base_url(base_url: &str) -> Result<Self, DiscoveryError> {
        let base_url = base_url.trim().trim_end_matches('/');
        let host = base_url
            .strip_prefix("https://")
            .or_else(|| base_url.strip_prefix("http://"))
            .ok_or_else(|| DiscoveryError::InvalidData(format!("not an http(s) URL: {base_url}")))?;
        if host.is_empty() {
            return Err(DiscoveryError::InvalidData("base URL has no host".to_string()));
        }

        Ok(Self {
            webfinger_template_url: format!("{base_url}/webfinger?q={URI_PLACEHOLDER}"),
        })
    }

    /// The WebFinger URL template, containing `{uri}`.
    pub fn webfinger_template_url(&self) -> &str {
        &self.webfinger_template_url
    }

    /// The WebFinger URL for one account URI.
    pub fn webfinger_url(&self, uri: &str) -> String {
        self.webfinger_template_url.replace(URI_PLACEHOLDER, uri)
    }

    /// Render as XRD XML.
    pub fn to_xml(&self) -> Result<String, DiscoveryError> {
        let mut xrd = XrdDocument::default();
        xrd.push_link(Link {
            rel: Some(REL_LRDD.to_string()),
            link_type: Some("application/xrd+xml".to_string()),
            href: None,
            template: Some(self.webfinger_template_url.clone()),
        });
        xrd.to_xml()
    }

    /// Parse host-meta XML.
    ///
    /// # Errors
    ///
    /// `InvalidData` when there is no `lrdd` template containing `{uri}`.
    pub fn from_xml(xml: &str) -> Result<Self, DiscoveryError> {
        let xrd = XrdDocument::from_xml(xml)?;
        let template = xrd
            .link(REL_LRDD)
            .and_then(|link| link.template.clone())
            .ok_or_else(|| DiscoveryError::InvalidData("no lrdd template".to_string()))?;
        if !template.contains(URI_PLACEHOLDER) {
            return Err(DiscoveryError::InvalidData(format!(
                "lrdd template has no {URI_PLACEHOLDER}: {template}"
            )));
        }
        Ok(Self {
            webfinger_template_url: template,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_base_url() {
        let host_meta = HostMeta::from_base_url("https://pod.example/").unwrap();
        assert_eq!(
            host_meta.webfinger_template_url(),
            "https://pod.example/webfinger?q={uri}"
        );
        assert_eq!(
            host_meta.webfinger_url("acct:alice@pod.example"),
            "https://pod.example/webfinger?q=acct:alice@pod.example"
        );
    }

    #[test]
    fn test_from_base_url_rejects_non_http() {
        for url in ["", "pod.example", "ftp://pod.example", "https://"] {
            assert!(
                matches!(HostMeta::from_base_url(url), Err(DiscoveryError::InvalidData(_))),
                "accepted {url:?}"
            );
        }
    }

    #[test]
    fn test_xml_roundtrip() {
        let host_meta = HostMeta::from_base_url("https://pod.example").unwrap();
        let xml = host_meta.to_xml().unwrap();

        assert!(xml.contains(r#"<Link rel="lrdd" type="application/xrd+xml" template="https://pod.example/webfinger?q={uri}"/>"#));
        assert_eq!(HostMeta::from_xml(&xml).unwrap(), host_meta);
    }

    #[test]
    fn test_from_xml_without_placeholder() {
        let xml = r#"<XRD><Link rel="lrdd" template="https://pod.example/webfinger"/></XRD>"#;
        assert!(matches!(
            HostMeta::from_xml(xml),
            Err(DiscoveryError::InvalidData(_))
        ));
    }

    #[test]
    fn test_from_xml_without_lrdd() {
        let xml = r#"<XRD><Link rel="salmon" href="https://pod.example/receive"/></XRD>"#;
        assert!(matches!(
            HostMeta::from_xml(xml),
            Err(DiscoveryError::InvalidData(_))
        ));
    }
}
