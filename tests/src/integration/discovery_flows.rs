//! # Discovery Flows
//!
//! How a pod learns enough about a remote account to verify its
//! envelopes: host-meta → WebFinger URL → WebFinger document → public key.
//!
//! ## Flows Tested:
//!
//! 1. **Host-meta**: published template resolves to the WebFinger URL
//! 2. **WebFinger XML**: legacy key survives publication and verifies
//!    a real envelope
//! 3. **WebFinger JRD**: modern form carries links but no legacy key
//! 4. **Broken documents**: each failure surfaces as the right error

#[cfg(test)]
mod tests {
    use super::super::support::{host_meta, status_message, webfinger_for, Directory, WebFingerKeyResolver};
    use federation_telemetry::init_test_logging;
    use magic_envelope::{
        AesCbcCipherService, EnvelopeError, KeyResolver, KeyResolverError, MagicEnvelope,
        MagicEnvelopeApi, MagicEnvelopeService, XmlEntityCodec,
    };
    use shared_crypto::test_utils::{alice_key_pair, alice_public_key, ALICE_ID};
    use shared_types::StatusMessage;
    use webfinger::webfinger::{REL_PUBLIC_KEY, REL_SALMON};
    use webfinger::{DiscoveryError, HostMeta, WebFinger, XrdDocument};

    type Pod =
        MagicEnvelopeService<WebFingerKeyResolver, AesCbcCipherService, XmlEntityCodec<StatusMessage>>;

    fn pod(directory: Directory) -> Pod {
        MagicEnvelopeService::with_resolver(WebFingerKeyResolver::new(directory))
    }

    // =============================================================================
    // HOST-META
    // =============================================================================

    /// Test: A remote pod's published host-meta leads to the account's
    /// WebFinger URL
    #[test]
    fn test_host_meta_to_webfinger_url() {
        let published = host_meta("pod.example").to_xml().unwrap();

        let discovered = HostMeta::from_xml(&published).unwrap();
        assert_eq!(
            discovered.webfinger_url(&format!("acct:{ALICE_ID}")),
            "https://pod.example/webfinger?q=acct:alice@pod.example"
        );
    }

    #[test]
    fn test_host_meta_without_lrdd_rejected() {
        let xrd = XrdDocument {
            subject: Some("https://pod.example".to_string()),
            ..XrdDocument::default()
        };
        assert!(matches!(
            HostMeta::from_xml(&xrd.to_xml().unwrap()),
            Err(DiscoveryError::InvalidData(_))
        ));
    }

    // =============================================================================
    // WEBFINGER
    // =============================================================================

    /// Test: Full discovery ending in a verified envelope
    #[tokio::test]
    async fn test_discovered_key_verifies_envelope() {
        init_test_logging();
        let directory = Directory::new();
        let alice = webfinger_for(ALICE_ID, &alice_key_pair());
        directory.publish(&alice);

        // Discovery by hand, the way a receiving pod does it
        let host = HostMeta::from_xml(&host_meta("pod.example").to_xml().unwrap()).unwrap();
        assert!(host.webfinger_url(&alice.acct_uri).ends_with(&alice.acct_uri));
        let document = directory.fetch(&alice.acct_uri).unwrap();
        let discovered = WebFinger::from_xml(&document).unwrap();

        assert_eq!(discovered, alice);
        assert_eq!(discovered.parsed_public_key().unwrap(), Some(alice_public_key()));

        // The same lookup drives envelope verification
        let sender = pod(Directory::new());
        let message = status_message("discovered");
        let wire = sender
            .envelop(MagicEnvelope::new(message.clone(), ALICE_ID).unwrap(), &alice_key_pair())
            .unwrap();

        let receiver = pod(directory);
        assert_eq!(receiver.unenvelop(&wire, None, None).await.unwrap(), message);
    }

    /// Test: The JRD form carries the salmon endpoint but not the legacy key
    #[test]
    fn test_jrd_omits_legacy_key() {
        let alice = webfinger_for(ALICE_ID, &alice_key_pair());
        let json = alice.to_json().unwrap();

        let xrd = XrdDocument::from_json(&json).unwrap();
        assert!(xrd.link(REL_SALMON).is_some());
        assert!(xrd.link(REL_PUBLIC_KEY).is_none());

        let parsed = WebFinger::from_json(&json).unwrap();
        assert_eq!(parsed.salmon_url, alice.salmon_url);
        assert_eq!(parsed.public_key, None);
        assert_eq!(parsed.guid, None);
    }

    #[test]
    fn test_jrd_from_other_implementation() {
        let json = r#"{
            "subject": "acct:carol@other.example",
            "aliases": ["https://other.example/users/carol"],
            "links": [
                {"rel": "salmon", "href": "https://other.example/salmon/carol"},
                {"rel": "http://ostatus.org/schema/1.0/subscribe",
                 "template": "https://other.example/follow?uri={uri}"},
                {"rel": "self", "type": "application/activity+json",
                 "href": "https://other.example/users/carol"}
            ]
        }"#;

        let carol = WebFinger::from_json(json).unwrap();
        assert_eq!(carol.acct_uri, "acct:carol@other.example");
        assert_eq!(carol.alias_url.as_deref(), Some("https://other.example/users/carol"));
        assert_eq!(carol.salmon_url.as_deref(), Some("https://other.example/salmon/carol"));
        assert_eq!(
            carol.subscribe_url.as_deref(),
            Some("https://other.example/follow?uri={uri}")
        );
    }

    #[test]
    fn test_incomplete_documents_rejected() {
        assert!(matches!(
            WebFinger::from_json(r#"{"links": []}"#),
            Err(DiscoveryError::InvalidDocument(_))
        ));
        assert!(matches!(
            WebFinger::from_json(r#"{"subject": "acct:carol@other.example"}"#),
            Err(DiscoveryError::InvalidDocument(_))
        ));
        assert!(matches!(
            WebFinger::from_json("{not json"),
            Err(DiscoveryError::Json(_))
        ));
    }

    // =============================================================================
    // KEY RESOLUTION
    // =============================================================================

    /// Test: A document whose key cannot be parsed is an invalid key, and
    /// the envelope is rejected with that cause
    #[tokio::test]
    async fn test_published_garbage_key() {
        let directory = Directory::new();
        let mut alice = webfinger_for(ALICE_ID, &alice_key_pair());
        alice.public_key = Some("-----BEGIN PUBLIC KEY-----\nAAAA\n-----END PUBLIC KEY-----".to_string());
        directory.publish(&alice);

        let resolver = WebFingerKeyResolver::new(directory.clone());
        assert!(matches!(
            resolver.resolve(ALICE_ID).await,
            Err(KeyResolverError::InvalidKey { .. })
        ));

        let sender = pod(Directory::new());
        let wire = sender
            .envelop(MagicEnvelope::new(status_message("hi"), ALICE_ID).unwrap(), &alice_key_pair())
            .unwrap();
        let receiver: Pod = MagicEnvelopeService::with_resolver(resolver);
        assert!(matches!(
            receiver.unenvelop(&wire, None, None).await,
            Err(EnvelopeError::KeyResolution(KeyResolverError::InvalidKey { .. }))
        ));
    }

    /// Test: A document without a key means the sender has no usable key
    #[tokio::test]
    async fn test_published_without_key() {
        let directory = Directory::new();
        let mut alice = webfinger_for(ALICE_ID, &alice_key_pair());
        alice.public_key = None;
        directory.publish(&alice);

        let resolver = WebFingerKeyResolver::new(directory);
        assert_eq!(resolver.resolve(ALICE_ID).await.unwrap(), None);
    }
}
