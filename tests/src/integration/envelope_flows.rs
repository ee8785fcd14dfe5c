//! # Envelope Delivery Flows
//!
//! Alice's pod builds envelopes; Bob's pod receives them as raw XML and
//! looks up Alice's key through her published WebFinger document.
//!
//! ## Flows Tested:
//!
//! 1. **Plain delivery**: sign → XML → parse → verify → entity
//! 2. **Encrypted delivery**: cipher params travel out-of-band as JSON
//! 3. **Rejections**: each validation stage rejects its own failure
//! 4. **Interoperability**: byte-exact signature against an independent
//!    RSA implementation

#[cfg(test)]
mod tests {
    use super::super::support::{status_message, webfinger_for, Directory, WebFingerKeyResolver};
    use federation_telemetry::init_test_logging;
    use magic_envelope::{
        AesCbcCipherService, EnvelopeError, EnvelopeWireForm, InMemoryKeyResolver, KeyResolverError,
        MagicEnvelope, MagicEnvelopeApi, MagicEnvelopeService, XmlEntityCodec,
    };
    use shared_crypto::test_utils::{
        alice_key_pair, alice_public_key, bob_key_pair, ALICE_ID, ALICE_STATUS_MESSAGE_SIGNATURE,
        BOB_ID,
    };
    use shared_crypto::CipherParams;
    use shared_types::{EntityError, StatusMessage};
    use std::sync::Arc;

    type Pod<R> = MagicEnvelopeService<R, AesCbcCipherService, XmlEntityCodec<StatusMessage>>;

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    /// Directory with Alice and Bob published.
    fn directory() -> Directory {
        let directory = Directory::new();
        directory.publish(&webfinger_for(ALICE_ID, &alice_key_pair()));
        directory.publish(&webfinger_for(BOB_ID, &bob_key_pair()));
        directory
    }

    /// A pod that resolves keys through `directory`.
    fn pod(directory: &Directory) -> Pod<WebFingerKeyResolver> {
        MagicEnvelopeService::with_resolver(WebFingerKeyResolver::new(directory.clone()))
    }

    /// Envelope XML of `message` from Alice.
    fn alice_sends(message: StatusMessage) -> String {
        let sender = pod(&Directory::new());
        let envelope = MagicEnvelope::new(message, ALICE_ID).unwrap();
        sender
            .envelop(envelope, &alice_key_pair())
            .unwrap()
            .to_xml()
            .unwrap()
    }

    // =============================================================================
    // DELIVERY
    // =============================================================================

    /// Test: A signed envelope survives delivery as XML
    #[tokio::test]
    async fn test_plain_delivery() {
        init_test_logging();
        let directory = directory();
        let message = status_message("Hello from alice");

        let xml = alice_sends(message.clone());
        let received = pod(&directory).unenvelop_xml(&xml, None, None).await.unwrap();

        assert_eq!(received, message);
        assert_eq!(directory.fetch_count(), 1);
    }

    /// Test: Encrypted payloads decrypt with params sent out-of-band
    #[tokio::test]
    async fn test_encrypted_delivery() {
        init_test_logging();
        let directory = directory();
        let sender = pod(&directory);
        let message = status_message("For bob only");

        let mut envelope = MagicEnvelope::new(message.clone(), ALICE_ID).unwrap();
        let params = sender.encrypt(&mut envelope).unwrap();
        let xml = sender
            .envelop(envelope, &alice_key_pair())
            .unwrap()
            .to_xml()
            .unwrap();
        assert!(!xml.contains("For bob only"));

        // Params cross the wire as JSON, separately from the envelope
        let params_json = serde_json::to_string(&params).unwrap();
        let received_params: CipherParams = serde_json::from_str(&params_json).unwrap();

        let received = pod(&directory)
            .unenvelop_xml(&xml, None, Some(&received_params))
            .await
            .unwrap();
        assert_eq!(received, message);

        assert!(matches!(
            pod(&directory).unenvelop_xml(&xml, None, None).await,
            Err(EnvelopeError::Codec(EntityError::MalformedXml(_)))
        ));
    }

    /// Test: Many envelopes from two senders verify concurrently on one pod
    #[tokio::test]
    async fn test_concurrent_delivery() {
        init_test_logging();
        let receiver = Arc::new(pod(&directory()));
        let sender = pod(&Directory::new());

        let mut handles = Vec::new();
        for i in 0..12 {
            let (identity, key) = if i % 2 == 0 {
                (ALICE_ID, alice_key_pair())
            } else {
                (BOB_ID, bob_key_pair())
            };
            let message = status_message(&format!("message {i}"));
            let envelope = MagicEnvelope::new(message.clone(), identity).unwrap();
            let xml = sender.envelop(envelope, &key).unwrap().to_xml().unwrap();

            let receiver = Arc::clone(&receiver);
            handles.push(tokio::spawn(async move {
                let received = receiver.unenvelop_xml(&xml, None, None).await;
                (received, message)
            }));
        }

        for handle in handles {
            let (received, message) = handle.await.unwrap();
            assert_eq!(received.unwrap(), message);
        }
    }

    // =============================================================================
    // INTEROPERABILITY
    // =============================================================================

    /// Test: The produced signature matches one made by an independent
    /// RSA implementation over the same subject
    #[tokio::test]
    async fn test_reference_signature() {
        let message = StatusMessage::new("abc123", "hello").unwrap();
        let xml = alice_sends(message.clone());

        assert!(xml.contains(&format!(
            r#"<me:sig key_id="YWxpY2VAcG9kLmV4YW1wbGU=">{ALICE_STATUS_MESSAGE_SIGNATURE}</me:sig>"#
        )));

        let keys = InMemoryKeyResolver::new().with_key(ALICE_ID, alice_public_key());
        let receiver: Pod<_> = MagicEnvelopeService::with_resolver(keys);
        assert_eq!(receiver.unenvelop_xml(&xml, None, None).await.unwrap(), message);
    }

    /// Test: A hand-written envelope from another implementation is accepted
    #[tokio::test]
    async fn test_foreign_envelope_accepted() {
        let data = "PHN0YXR1c19tZXNzYWdlPjxndWlkPmFiYzEyMzwvZ3VpZD48dGV4dD5oZWxsbzwvdGV4dD48cHVibGljPmZhbHNlPC9wdWJsaWM-PC9zdGF0dXNfbWVzc2FnZT4=";
        let xml = format!(
            r#"<?xml version='1.0' encoding='UTF-8'?>
<env xmlns="http://salmon-protocol.org/ns/magic-env">
  <data type="application/xml">{data}</data>
  <encoding>base64url</encoding>
  <alg>RSA-SHA256</alg>
  <sig key_id="YWxpY2VAcG9kLmV4YW1wbGU=">{ALICE_STATUS_MESSAGE_SIGNATURE}</sig>
</env>"#
        );

        let received = pod(&directory()).unenvelop_xml(&xml, None, None).await.unwrap();
        assert_eq!(received, StatusMessage::new("abc123", "hello").unwrap());
    }

    // =============================================================================
    // REJECTIONS
    // =============================================================================

    #[tokio::test]
    async fn test_unknown_sender_rejected() {
        init_test_logging();
        let xml = alice_sends(status_message("hi"));
        let empty = Directory::new();

        assert_eq!(
            pod(&empty).unenvelop_xml(&xml, None, None).await,
            Err(EnvelopeError::SenderKeyNotFound(ALICE_ID.to_string()))
        );
    }

    /// Test: A broken WebFinger document is a resolver failure, not a missing key
    #[tokio::test]
    async fn test_broken_directory_entry() {
        let directory = Directory::new();
        directory.publish_raw(&format!("acct:{ALICE_ID}"), "<XRD><Link rel=\"salmon\"/></XRD>");
        let xml = alice_sends(status_message("hi"));

        assert!(matches!(
            pod(&directory).unenvelop_xml(&xml, None, None).await,
            Err(EnvelopeError::KeyResolution(KeyResolverError::LookupFailed { .. }))
        ));
    }

    /// Test: An envelope claiming Alice but signed by Bob is rejected
    #[tokio::test]
    async fn test_impersonation_rejected() {
        let sender = pod(&Directory::new());
        let envelope = MagicEnvelope::new(status_message("I am alice"), ALICE_ID).unwrap();
        let xml = sender
            .envelop(envelope, &bob_key_pair())
            .unwrap()
            .to_xml()
            .unwrap();

        assert_eq!(
            pod(&directory()).unenvelop_xml(&xml, None, None).await,
            Err(EnvelopeError::InvalidSignature)
        );
    }

    /// Test: Rewriting any signed value in transit breaks the signature
    #[tokio::test]
    async fn test_tampering_in_transit() {
        let xml = alice_sends(StatusMessage::new("abc123", "hello").unwrap());
        let receiver = pod(&directory());

        let forged_data = magic_envelope::domain::encoding::encode(
            shared_types::pack(&StatusMessage::new("abc123", "goodbye").unwrap()).unwrap(),
        );
        let original_data = EnvelopeWireForm::from_xml(&xml).unwrap().data;

        let tampered = [
            xml.replace(&original_data, &forged_data),
            xml.replace("<me:alg>RSA-SHA256</me:alg>", "<me:alg>RSA-SHA1</me:alg>"),
            xml.replace("<me:encoding>base64url</me:encoding>", "<me:encoding>base64</me:encoding>"),
            xml.replace(r#"type="application/xml""#, r#"type="text/plain""#),
        ];
        for xml in tampered {
            assert_eq!(
                receiver.unenvelop_xml(&xml, None, None).await,
                Err(EnvelopeError::InvalidSignature)
            );
        }
    }

    /// Test: Re-attributing an envelope to another sender fails against
    /// that sender's key
    #[tokio::test]
    async fn test_reattributed_key_id() {
        let xml = alice_sends(status_message("hi")).replace(
            "YWxpY2VAcG9kLmV4YW1wbGU=",
            &magic_envelope::domain::encoding::encode(BOB_ID),
        );
        assert_eq!(
            pod(&directory()).unenvelop_xml(&xml, None, None).await,
            Err(EnvelopeError::InvalidSignature)
        );
    }

    #[tokio::test]
    async fn test_structural_rejections() {
        let receiver = pod(&directory());
        let xml = alice_sends(status_message("hi"));
        let without_key_id = xml.replace(r#" key_id="YWxpY2VAcG9kLmV4YW1wbGU=""#, "");

        let cases = [
            "not xml at all".to_string(),
            "<feed/>".to_string(),
            xml.replace("<me:alg>RSA-SHA256</me:alg>", ""),
            without_key_id.clone(),
        ];
        for case in &cases {
            assert!(
                matches!(
                    receiver.unenvelop_xml(case, None, None).await,
                    Err(EnvelopeError::InvalidEnvelope(_))
                ),
                "accepted {case}"
            );
        }

        // The same envelope is fine once the receiver names the sender
        assert!(receiver
            .unenvelop_xml(&without_key_id, Some(ALICE_ID), None)
            .await
            .is_ok());
    }
}
