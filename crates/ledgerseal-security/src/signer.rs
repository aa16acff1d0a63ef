// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Signer: detached ECDSA P-256 signatures over the ledger document or over
// a caller-supplied SHA-256 digest.
//
// Whole-document mode signs the document's raw bytes (ECDSA with SHA-256,
// RFC 6979 nonces).  The canonical content hash is derived from the same
// bytes and reported, but it is not the signing input.
//
// Explicit-hash mode signs the 32 decoded digest bytes as a prehash; no
// second hashing pass is applied.  Both modes parse the private key once,
// with the same decoder.

use std::fs;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use ledgerseal_core::config::{LedgerConfig, LedgerPaths};
use ledgerseal_core::error::{LedgerError, Result};
use ledgerseal_core::types::{ContentKind, PayloadMode, SignOutcome};
use p256::SecretKey;
use p256::ecdsa::signature::Signer as _;
use p256::ecdsa::signature::hazmat::PrehashSigner;
use p256::ecdsa::{Signature, SigningKey};
use p256::pkcs8::DecodePrivateKey;
use tracing::{debug, info, instrument, warn};

use crate::audit::AuditLog;
use crate::canonical::canonical_bytes;
use crate::integrity::{hash_bytes, parse_digest};
use crate::keystore::KeyStore;

/// Produces detached signatures with the key store's current private key.
pub struct Signer<'a> {
    keystore: KeyStore,
    paths: LedgerPaths,
    audit: Option<&'a AuditLog>,
}

impl Signer<'static> {
    pub fn new(config: &LedgerConfig) -> Self {
        Self {
            keystore: KeyStore::new(config),
            paths: config.paths(),
            audit: None,
        }
    }
}

impl<'a> Signer<'a> {
    /// Record every signing attempt in `audit`.
    pub fn with_audit<'b>(self, audit: &'b AuditLog) -> Signer<'b> {
        Signer {
            keystore: self.keystore,
            paths: self.paths,
            audit: Some(audit),
        }
    }

    pub fn keystore(&self) -> &KeyStore {
        &self.keystore
    }

    /// Sign according to `mode` and write the DER signature to
    /// `logs/ledger_merkle.sig`, replacing any previous signature.
    ///
    /// A keypair is provisioned first if none exists.
    #[instrument(skip(self))]
    pub fn sign(&self, mode: &PayloadMode) -> Result<SignOutcome> {
        let result = self.sign_inner(mode);

        if let Some(audit) = self.audit {
            let subject = match (&result, mode) {
                (_, PayloadMode::ExplicitHash { digest }) => digest.clone(),
                (Ok(outcome), PayloadMode::WholeDocument) => {
                    outcome.canonical_hash.clone().unwrap_or_default()
                }
                (Err(_), PayloadMode::WholeDocument) => String::new(),
            };
            let details = match &result {
                Ok(_) => mode_label(mode).to_owned(),
                Err(e) => format!("{}: {e}", mode_label(mode)),
            };
            if let Err(e) = audit.record("sign", &subject, result.is_ok(), Some(&details)) {
                warn!(error = %e, "failed to record sign audit entry");
            }
        }

        result
    }

    fn sign_inner(&self, mode: &PayloadMode) -> Result<SignOutcome> {
        self.keystore.ensure_keypair(false)?;
        let signing_key = signing_key(&self.keystore.load_private_key_der()?)?;

        let (der_signature, canonical_hash) = match mode {
            PayloadMode::ExplicitHash { digest } => {
                let digest = parse_digest(digest)?;
                (sign_prehash(&signing_key, &digest)?, None)
            }
            PayloadMode::WholeDocument => {
                let doc_path = &self.paths.ledger_json;
                if !doc_path.exists() {
                    return Err(LedgerError::MissingFile(doc_path.clone()));
                }
                let document = fs::read(doc_path)?;
                let canonical_hash =
                    hash_bytes(&canonical_bytes(ContentKind::from_path(doc_path), &document));
                debug!(
                    document_len = document.len(),
                    %canonical_hash,
                    "signing raw document bytes"
                );
                (sign_document(&signing_key, &document)?, Some(canonical_hash))
            }
        };

        fs::create_dir_all(&self.paths.logs_dir)?;
        fs::write(&self.paths.signature, &der_signature)?;

        info!(
            mode = mode_label(mode),
            signature_len = der_signature.len(),
            path = %self.paths.signature.display(),
            "signature written"
        );

        Ok(SignOutcome {
            signature_b64: STANDARD.encode(&der_signature),
            signature_path: self.paths.signature.clone(),
            canonical_hash,
        })
    }
}

fn mode_label(mode: &PayloadMode) -> &'static str {
    match mode {
        PayloadMode::WholeDocument => "whole-document",
        PayloadMode::ExplicitHash { .. } => "explicit-hash",
    }
}

/// Parse a PKCS#8 P-256 private key.  The embedded public key is optional.
fn signing_key(pkcs8: &[u8]) -> Result<SigningKey> {
    let secret = SecretKey::from_pkcs8_der(pkcs8)
        .map_err(|e| LedgerError::KeyParseFailed(format!("private key: {e}")))?;
    Ok(SigningKey::from(&secret))
}

/// ECDSA P-256 / SHA-256 over `message`, ASN.1 DER signature.
fn sign_document(signing_key: &SigningKey, message: &[u8]) -> Result<Vec<u8>> {
    let signature: Signature = signing_key
        .try_sign(message)
        .map_err(|e| LedgerError::SigningFailed(format!("ECDSA sign failed: {e}")))?;

    Ok(signature.to_der().as_bytes().to_vec())
}

/// ECDSA P-256 over an already-computed 32-byte digest, DER signature.
fn sign_prehash(signing_key: &SigningKey, digest: &[u8; 32]) -> Result<Vec<u8>> {
    let signature: Signature = signing_key
        .sign_prehash(digest)
        .map_err(|e| LedgerError::SigningFailed(format!("ECDSA prehash sign failed: {e}")))?;

    Ok(signature.to_der().as_bytes().to_vec())
}
