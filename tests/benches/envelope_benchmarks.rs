//! # Federation Benchmarks
//!
//! | Operation | Dominant cost |
//! |-----------|---------------|
//! | Signing subject | base64url of the payload |
//! | Envelop | one RSA-2048 private-key operation |
//! | Unenvelop (XML) | XML parse + one RSA-2048 verify + payload codec |
//! | WebFinger parse | XRD read + PEM decode |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use magic_envelope::{
    envelope_subject, AesCbcCipherService, EnvelopeWireForm, InMemoryKeyResolver, MagicEnvelope,
    MagicEnvelopeApi, MagicEnvelopeService, XmlEntityCodec, ALGORITHM, DATA_TYPE, ENCODING,
};
use shared_crypto::test_utils::{alice_key_pair, alice_public_key, ALICE_ID};
use shared_types::StatusMessage;
use std::time::Duration;
use webfinger::WebFinger;

fn message(text_len: usize) -> StatusMessage {
    StatusMessage::new("abc123", "x".repeat(text_len)).expect("benchmark message is valid")
}

// ============================================================================
// Signing subject
// ============================================================================

fn bench_subject(c: &mut Criterion) {
    let mut group = c.benchmark_group("signing-subject");

    for size in [64usize, 4 * 1024, 64 * 1024] {
        let data = vec![b'a'; size];
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::new("envelope_subject", size), &data, |b, data| {
            b.iter(|| black_box(envelope_subject(data, DATA_TYPE, ENCODING, ALGORITHM)))
        });
    }

    group.finish();
}

// ============================================================================
// Envelop / unenvelop
// ============================================================================

fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("magic-envelope");
    group.measurement_time(Duration::from_secs(10));

    let key = alice_key_pair();
    let service: MagicEnvelopeService<_, AesCbcCipherService, XmlEntityCodec<StatusMessage>> =
        MagicEnvelopeService::with_resolver(
            InMemoryKeyResolver::new().with_key(ALICE_ID, alice_public_key()),
        );
    let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");

    for text_len in [16usize, 4 * 1024] {
        group.bench_with_input(BenchmarkId::new("envelop", text_len), &text_len, |b, &len| {
            b.iter(|| {
                let envelope = MagicEnvelope::new(message(len), ALICE_ID).expect("valid envelope");
                black_box(service.envelop(envelope, &key).expect("envelop"))
            })
        });

        let xml = service
            .envelop(MagicEnvelope::new(message(text_len), ALICE_ID).expect("valid envelope"), &key)
            .and_then(|wire| wire.to_xml())
            .expect("envelope XML");

        group.bench_with_input(BenchmarkId::new("parse_wire_form", text_len), &xml, |b, xml| {
            b.iter(|| black_box(EnvelopeWireForm::from_xml(xml).expect("parse")))
        });

        group.bench_with_input(BenchmarkId::new("unenvelop_xml", text_len), &xml, |b, xml| {
            b.iter(|| {
                runtime.block_on(async {
                    black_box(service.unenvelop_xml(xml, None, None).await.expect("unenvelop"))
                })
            })
        });
    }

    group.finish();
}

// ============================================================================
// Discovery
// ============================================================================

fn bench_webfinger(c: &mut Criterion) {
    let mut group = c.benchmark_group("webfinger");

    let mut document = WebFinger::new(format!("acct:{ALICE_ID}"));
    document.salmon_url = Some("https://pod.example/receive/users/abc123".to_string());
    document.guid = Some("abc123".to_string());
    document.public_key = Some(alice_public_key().to_pem().expect("PEM"));
    let xml = document.to_xml().expect("WebFinger XML");

    group.bench_function("parse_and_extract_key", |b| {
        b.iter(|| {
            let parsed = WebFinger::from_xml(black_box(&xml)).expect("parse");
            black_box(parsed.parsed_public_key().expect("key"))
        })
    });

    group.finish();
}

criterion_group!(benches, bench_subject, bench_envelope, bench_webfinger);

criterion_main!(benches);
