//! # Shared Fixtures
//!
//! A simulated directory of published WebFinger documents, and a
//! `KeyResolver` that finds sender keys the way a pod does in production:
//! fetch the sender's WebFinger document and read its public key.

use magic_envelope::{KeyResolver, KeyResolverError};
use parking_lot::RwLock;
use shared_crypto::{RsaKeyPair, RsaPublicKey};
use shared_types::{generate_guid, StatusMessage};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use webfinger::{HostMeta, WebFinger};

/// Published WebFinger XML documents, keyed by `acct:` URI.
#[derive(Clone, Default)]
pub struct Directory {
    documents: Arc<RwLock<HashMap<String, String>>>,
    fetches: Arc<AtomicUsize>,
}

impl Directory {
    /// Empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish (or replace) a WebFinger document.
    pub fn publish(&self, webfinger: &WebFinger) {
        let xml = webfinger.to_xml().expect("fixture WebFinger serializes");
        self.documents.write().insert(webfinger.acct_uri.clone(), xml);
    }

    /// Publish a raw document, valid or not.
    pub fn publish_raw(&self, acct_uri: &str, xml: &str) {
        self.documents
            .write()
            .insert(acct_uri.to_string(), xml.to_string());
    }

    /// Serve the document for `acct_uri`.
    pub fn fetch(&self, acct_uri: &str) -> Option<String> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.documents.read().get(acct_uri).cloned()
    }

    /// Number of fetches served so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

/// Resolves sender keys from their WebFinger documents.
#[derive(Clone)]
pub struct WebFingerKeyResolver {
    directory: Directory,
}

impl WebFingerKeyResolver {
    /// Resolver reading from `directory`.
    pub fn new(directory: Directory) -> Self {
        Self { directory }
    }
}

#[async_trait::async_trait]
impl KeyResolver for WebFingerKeyResolver {
    async fn resolve(&self, identity: &str) -> Result<Option<RsaPublicKey>, KeyResolverError> {
        let acct_uri = format!("acct:{identity}");
        let Some(xml) = self.directory.fetch(&acct_uri) else {
            return Ok(None);
        };

        let webfinger = WebFinger::from_xml(&xml).map_err(|e| KeyResolverError::LookupFailed {
            identity: identity.to_string(),
            reason: e.to_string(),
        })?;
        webfinger
            .parsed_public_key()
            .map_err(|e| KeyResolverError::InvalidKey {
                identity: identity.to_string(),
                reason: e.to_string(),
            })
    }
}

/// Host-meta of the pod serving `host`.
pub fn host_meta(host: &str) -> HostMeta {
    HostMeta::from_base_url(&format!("https://{host}/")).expect("fixture host is valid")
}

/// WebFinger document of `identity` (`user@host`) publishing `key`.
pub fn webfinger_for(identity: &str, key: &RsaKeyPair) -> WebFinger {
    let (user, host) = identity.split_once('@').expect("identity has a host");
    let guid = generate_guid();

    WebFinger {
        acct_uri: format!("acct:{identity}"),
        alias_url: Some(format!("https://{host}/people/{guid}")),
        hcard_url: Some(format!("https://{host}/hcard/users/{guid}")),
        seed_url: Some(format!("https://{host}/")),
        profile_url: Some(format!("https://{host}/u/{user}")),
        atom_url: Some(format!("https://{host}/public/{user}.atom")),
        salmon_url: Some(format!("https://{host}/receive/users/{guid}")),
        subscribe_url: Some(format!("https://{host}/people?q={{uri}}")),
        guid: Some(guid),
        public_key: Some(key.public_key().to_pem().expect("fixture key encodes")),
    }
}

/// A fresh public status message.
pub fn status_message(text: &str) -> StatusMessage {
    StatusMessage::new(generate_guid(), text)
        .expect("fixture message is valid")
        .with_public(true)
}
