// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Verifier: checks detached signatures against the current public key.
//
// Mirrors the signer's two modes.  Structural problems (missing files, bad
// PEM, bad digest format) are reported as such; only a signature that fails
// the cryptographic check, or cannot be decoded at all, is
// `LedgerError::SignatureMismatch`.

use std::fs;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use ledgerseal_core::config::{LedgerConfig, LedgerPaths};
use ledgerseal_core::error::{LedgerError, Result};
use ledgerseal_core::types::{ContentKind, VerifyMode, VerifyOutcome};
use p256::PublicKey;
use p256::ecdsa::signature::hazmat::PrehashVerifier;
use p256::ecdsa::{Signature, VerifyingKey};
use p256::elliptic_curve::sec1::ToEncodedPoint;
use ring::signature::{ECDSA_P256_SHA256_ASN1, UnparsedPublicKey};
use tracing::{debug, info, instrument, warn};

use crate::audit::AuditLog;
use crate::canonical::canonical_bytes;
use crate::integrity::{hash_bytes, parse_digest};
use crate::keystore::KeyStore;

/// Verifies detached signatures with the key store's current public key.
///
/// Archived keys are never consulted: a signature made before the last
/// rotation no longer verifies.
pub struct Verifier<'a> {
    keystore: KeyStore,
    paths: LedgerPaths,
    audit: Option<&'a AuditLog>,
}

impl Verifier<'static> {
    pub fn new(config: &LedgerConfig) -> Self {
        Self {
            keystore: KeyStore::new(config),
            paths: config.paths(),
            audit: None,
        }
    }
}

impl<'a> Verifier<'a> {
    /// Record every verification attempt in `audit`.
    pub fn with_audit<'b>(self, audit: &'b AuditLog) -> Verifier<'b> {
        Verifier {
            keystore: self.keystore,
            paths: self.paths,
            audit: Some(audit),
        }
    }

    /// Verify according to `mode`. `Ok` means the signature is valid.
    #[instrument(skip(self))]
    pub fn verify(&self, mode: &VerifyMode) -> Result<VerifyOutcome> {
        let result = self.verify_inner(mode);

        match &result {
            Ok(_) => info!("signature verified"),
            Err(e) if e.is_signature_mismatch() => warn!("signature mismatch"),
            Err(e) => debug!(error = %e, "verification could not run"),
        }

        if let Some(audit) = self.audit {
            let subject = match (&result, mode) {
                (_, VerifyMode::ExplicitHash { digest, .. }) => digest.clone(),
                (Ok(outcome), VerifyMode::WholeDocument) => {
                    outcome.canonical_hash.clone().unwrap_or_default()
                }
                (Err(_), VerifyMode::WholeDocument) => String::new(),
            };
            let details = result.as_ref().err().map(ToString::to_string);
            if let Err(e) = audit.record("verify", &subject, result.is_ok(), details.as_deref()) {
                warn!(error = %e, "failed to record verify audit entry");
            }
        }

        result
    }

    fn verify_inner(&self, mode: &VerifyMode) -> Result<VerifyOutcome> {
        match mode {
            VerifyMode::ExplicitHash {
                digest,
                signature_b64,
            } => {
                let digest = parse_digest(digest)?;
                let public_key = self.keystore.load_public_key()?;
                let der = STANDARD
                    .decode(signature_b64.trim())
                    .map_err(|_| LedgerError::SignatureMismatch)?;
                verify_prehash(&public_key, &digest, &der)?;
                Ok(VerifyOutcome {
                    canonical_hash: None,
                })
            }
            VerifyMode::WholeDocument => {
                for required in [&self.paths.ledger_json, &self.paths.signature] {
                    if !required.exists() {
                        return Err(LedgerError::MissingFiles(required.clone()));
                    }
                }
                let public_key = self.keystore.load_public_key()?;

                let document = fs::read(&self.paths.ledger_json)?;
                let kind = ContentKind::from_path(&self.paths.ledger_json);
                let canonical_hash = hash_bytes(&canonical_bytes(kind, &document));
                let der = fs::read(&self.paths.signature)?;
                debug!(
                    document_len = document.len(),
                    %canonical_hash,
                    "verifying raw document bytes"
                );

                verify_document(&public_key, &document, &der)?;
                Ok(VerifyOutcome {
                    canonical_hash: Some(canonical_hash),
                })
            }
        }
    }
}

/// ECDSA P-256 / SHA-256 over the raw message.
fn verify_document(public_key: &PublicKey, message: &[u8], der: &[u8]) -> Result<()> {
    let point = public_key.to_encoded_point(false);
    UnparsedPublicKey::new(&ECDSA_P256_SHA256_ASN1, point.as_bytes())
        .verify(message, der)
        .map_err(|_| LedgerError::SignatureMismatch)
}

/// ECDSA P-256 over an already-computed digest.
fn verify_prehash(public_key: &PublicKey, digest: &[u8; 32], der: &[u8]) -> Result<()> {
    let signature = Signature::from_der(der).map_err(|_| LedgerError::SignatureMismatch)?;
    VerifyingKey::from(public_key)
        .verify_prehash(digest, &signature)
        .map_err(|_| LedgerError::SignatureMismatch)
}
