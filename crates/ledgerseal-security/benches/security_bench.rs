// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for canonical hashing, signing, verification, and
// audit logging in the ledgerseal-security crate.

use std::fs;

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use ledgerseal_core::config::LedgerConfig;
use ledgerseal_core::types::{PayloadMode, VerifyMode};
use ledgerseal_security::{AuditLog, Signer, Verifier, canonicalize, hash_bytes};

const LEDGER_JSON: &str = r#"{"merkle_root":"4f1a6c2b9e0d3f5a7c8b1e2d4f6a8c0b2d4e6f8a0c2e4f6a8b0d2f4a6c8e0b2d","algo":"sha256","timestamp":"2024-01-01T00:00:00Z","host":"bench"}"#;

/// Base directory with a ledger document and a provisioned keypair.
fn prepared_base() -> (tempfile::TempDir, LedgerConfig) {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = LedgerConfig::with_base_dir(dir.path());
    let paths = config.paths();
    fs::create_dir_all(&paths.logs_dir).expect("create logs dir");
    fs::write(&paths.ledger_json, LEDGER_JSON).expect("write ledger");
    Signer::new(&config)
        .sign(&PayloadMode::WholeDocument)
        .expect("initial sign");
    (dir, config)
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// SHA-256 hashing at sizes from a single ledger record up to 1 MiB.
fn bench_integrity_hash(c: &mut Criterion) {
    let sizes: &[(&str, usize)] = &[
        ("1 KiB", 1024),
        ("10 KiB", 10 * 1024),
        ("100 KiB", 100 * 1024),
        ("1 MiB", 1024 * 1024),
    ];

    let mut group = c.benchmark_group("integrity_hash_sha256");
    for &(label, size) in sizes {
        let data = vec![0xABu8; size];
        group.bench_function(label, |b| {
            b.iter(|| {
                let hex = hash_bytes(black_box(&data));
                black_box(hex);
            });
        });
    }
    group.finish();
}

/// Canonicalize a plain-text file that needs trimming.
fn bench_canonicalize_text(c: &mut Criterion) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("notes.txt");
    let line = "   ledger root entry with surrounding whitespace   \n";
    fs::write(&path, line.repeat(256)).expect("write text");

    c.bench_function("canonicalize (text, 13 KiB)", |b| {
        b.iter(|| {
            let descriptor = canonicalize(black_box(&path)).expect("canonicalize failed");
            black_box(descriptor);
        });
    });
}

/// Sign the ledger document and the explicit digest with an existing key.
fn bench_sign(c: &mut Criterion) {
    let (_dir, config) = prepared_base();
    let signer = Signer::new(&config);
    let digest = PayloadMode::ExplicitHash {
        digest: hash_bytes(LEDGER_JSON.as_bytes()),
    };

    let mut group = c.benchmark_group("sign");
    group.bench_function("whole-document", |b| {
        b.iter(|| {
            let outcome = signer
                .sign(black_box(&PayloadMode::WholeDocument))
                .expect("sign failed");
            black_box(outcome);
        });
    });
    group.bench_function("explicit-hash", |b| {
        b.iter(|| {
            let outcome = signer.sign(black_box(&digest)).expect("sign failed");
            black_box(outcome);
        });
    });
    group.finish();
}

/// Verify the on-disk signature against the ledger document.
fn bench_verify_document(c: &mut Criterion) {
    let (_dir, config) = prepared_base();
    let verifier = Verifier::new(&config);

    c.bench_function("verify whole-document", |b| {
        b.iter(|| {
            let outcome = verifier
                .verify(black_box(&VerifyMode::WholeDocument))
                .expect("verify failed");
            black_box(outcome);
        });
    });
}

/// Recording an audit entry to an in-memory SQLite database.
fn bench_audit_record(c: &mut Criterion) {
    c.bench_function("audit_record (in-memory SQLite)", |b| {
        let log = AuditLog::open_in_memory().expect("open in-memory audit log");

        b.iter(|| {
            log.record(
                black_box("sign"),
                black_box("abcdef1234567890abcdef1234567890abcdef1234567890abcdef1234567890"),
                black_box(true),
                black_box(Some("whole-document")),
            )
            .expect("record failed");
        });
    });
}

criterion_group!(
    benches,
    bench_integrity_hash,
    bench_canonicalize_text,
    bench_sign,
    bench_verify_document,
    bench_audit_record,
);
criterion_main!(benches);
