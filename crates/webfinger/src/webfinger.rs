//! # WebFinger Document
//!
//! Maps an account URI to the endpoints other servers need to federate
//! with it. Two link relations are legacy: the embedded guid and the
//! embedded public key. Both are still written and read, since older
//! servers look for them, but nothing new should depend on them.

use crate::errors::DiscoveryError;
use crate::xrd::{Link, XrdDocument};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use shared_crypto::RsaPublicKey;
use tracing::{debug, warn};

/// hCard profile relation.
pub const REL_HCARD: &str = "http://microformats.org/profile/hcard";
/// Seed location relation.
pub const REL_SEED: &str = "http://joindiaspora.com/seed_location";
/// Legacy guid relation.
pub const REL_GUID: &str = "http://joindiaspora.com/guid";
/// Profile page relation.
pub const REL_PROFILE: &str = "http://webfinger.net/rel/profile-page";
/// Activity feed relation.
pub const REL_ATOM: &str = "http://schemas.google.com/g/2010#updates-from";
/// Salmon endpoint relation.
pub const REL_SALMON: &str = "salmon";
/// Remote follow template relation.
pub const REL_SUBSCRIBE: &str = "http://ostatus.org/schema/1.0/subscribe";
/// Legacy public key relation.
pub const REL_PUBLIC_KEY: &str = "diaspora-public-key";

const TYPE_HTML: &str = "text/html";
const TYPE_ATOM: &str = "application/atom+xml";
const TYPE_RSA: &str = "RSA";

/// A WebFinger document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WebFinger {
    /// `acct:` URI of the account, the document subject.
    pub acct_uri: String,
    /// Canonical profile URL, written as the alias.
    pub alias_url: Option<String>,
    /// hCard URL.
    pub hcard_url: Option<String>,
    /// Base URL of the account's home server.
    pub seed_url: Option<String>,
    /// Profile page URL.
    pub profile_url: Option<String>,
    /// Public activity feed URL.
    pub atom_url: Option<String>,
    /// Salmon endpoint URL.
    pub salmon_url: Option<String>,
    /// Remote follow URL template containing `{uri}`.
    pub subscribe_url: Option<String>,
    /// Legacy: account guid.
    pub guid: Option<String>,
    /// Legacy: PEM public key.
    pub public_key: Option<String>,
}

impl WebFinger {
    /// Document for `acct_uri` with no links yet.
    pub fn new(acct_uri: impl Into<String>) -> Self {
        Self {
            acct_uri: acct_uri.into(),
            ..Self::default()
        }
    }

    /// Parse the embedded legacy public key, if present.
    pub fn parsed_public_key(&self) -> Result<Option<RsaPublicKey>, DiscoveryError> {
        self.public_key
            .as_deref()
            .map(|pem| {
                RsaPublicKey::from_pem(pem).map_err(|e| DiscoveryError::InvalidData(e.to_string()))
            })
            .transpose()
    }

    // =========================================================================
    // WRITE
    // =========================================================================

    /// Build the underlying XRD, with or without the legacy links.
    pub fn to_xrd(&self, include_legacy: bool) -> XrdDocument {
        let mut xrd = XrdDocument {
            subject: Some(self.acct_uri.clone()),
            aliases: self.alias_url.iter().cloned().collect(),
            links: Some(Vec::new()),
            ..XrdDocument::default()
        };

        let mut add = |rel: &str, link_type: Option<&str>, href: &Option<String>| {
            if let Some(href) = href {
                xrd.push_link(Link::href(rel, link_type, href.clone()));
            }
        };
        add(REL_HCARD, Some(TYPE_HTML), &self.hcard_url);
        add(REL_SEED, Some(TYPE_HTML), &self.seed_url);
        if include_legacy {
            add(REL_GUID, Some(TYPE_HTML), &self.guid);
        }
        add(REL_PROFILE, Some(TYPE_HTML), &self.profile_url);
        add(REL_ATOM, Some(TYPE_ATOM), &self.atom_url);
        add(REL_SALMON, None, &self.salmon_url);

        if let Some(template) = &self.subscribe_url {
            xrd.push_link(Link::template(REL_SUBSCRIBE, template.clone()));
        }
        if include_legacy {
            if let Some(pem) = &self.public_key {
                xrd.push_link(Link::href(REL_PUBLIC_KEY, Some(TYPE_RSA), STANDARD.encode(pem)));
            }
        }
        xrd
    }

    /// XRD XML, legacy links included.
    pub fn to_xml(&self) -> Result<String, DiscoveryError> {
        self.to_xrd(true).to_xml()
    }

    /// JRD JSON, legacy links left out.
    pub fn to_json(&self) -> Result<String, DiscoveryError> {
        self.to_xrd(false).to_json()
    }

    // =========================================================================
    // READ
    // =========================================================================

    /// Parse an XRD XML document.
    pub fn from_xml(xml: &str) -> Result<Self, DiscoveryError> {
        Self::from_xrd(XrdDocument::from_xml(xml)?)
    }

    /// Parse a JRD JSON document.
    pub fn from_json(json: &str) -> Result<Self, DiscoveryError> {
        Self::from_xrd(XrdDocument::from_json(json)?)
    }

    /// Extract the WebFinger fields from an XRD.
    ///
    /// # Errors
    ///
    /// `InvalidDocument` when the subject or the link set is absent.
    pub fn from_xrd(xrd: XrdDocument) -> Result<Self, DiscoveryError> {
        let acct_uri = xrd
            .subject
            .clone()
            .filter(|subject| !subject.is_empty())
            .ok_or_else(|| DiscoveryError::InvalidDocument("no subject".to_string()))?;
        if xrd.links.is_none() {
            return Err(DiscoveryError::InvalidDocument(format!(
                "no links for {acct_uri}"
            )));
        }

        let href = |rel: &str| xrd.link(rel).and_then(|link| link.href.clone());

        let public_key = href(REL_PUBLIC_KEY).and_then(|encoded| {
            match STANDARD
                .decode(encoded.trim())
                .ok()
                .and_then(|bytes| String::from_utf8(bytes).ok())
            {
                Some(pem) => Some(pem),
                None => {
                    warn!(subject = %acct_uri, "Ignoring undecodable legacy public key");
                    None
                }
            }
        });

        let webfinger = Self {
            alias_url: xrd.aliases.first().cloned(),
            hcard_url: href(REL_HCARD),
            seed_url: href(REL_SEED),
            profile_url: href(REL_PROFILE),
            atom_url: href(REL_ATOM),
            salmon_url: href(REL_SALMON),
            subscribe_url: xrd
                .link(REL_SUBSCRIBE)
                .and_then(|link| link.template.clone()),
            guid: href(REL_GUID),
            public_key,
            acct_uri,
        };

        debug!(subject = %webfinger.acct_uri, "Parsed WebFinger document");
        Ok(webfinger)
    }
}
