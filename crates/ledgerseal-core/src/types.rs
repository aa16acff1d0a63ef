// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for Ledgerseal.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, Result};

/// The signed ledger-root document written by the external ledger script.
///
/// Read-only from Ledgerseal's point of view: it is loaded for display and
/// audit, but the signing paths always operate on the file's raw bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerRecord {
    /// Merkle root over the source data (hex or opaque digest string).
    pub merkle_root: String,
    /// Hash algorithm the script used, e.g. `"sha256"`.
    pub algo: String,
    /// ISO-8601 generation time.
    pub timestamp: String,
    /// Host the script ran on.
    pub host: String,
}

impl LedgerRecord {
    /// Load a ledger record from its JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(LedgerError::MissingFile(path.to_path_buf()));
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// The `timestamp` field parsed as RFC 3339, if it is well-formed.
    pub fn parsed_timestamp(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(&self.timestamp).ok()
    }
}

/// Coarse content classification, inferred from a file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentKind {
    /// Canonicalized by trimming and newline-terminating.
    PlainText,
    Json,
    Pem,
    /// Everything else, hashed as raw bytes.
    Binary,
}

impl ContentKind {
    /// MIME hint reported in a [`CanonicalDescriptor`].
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::PlainText => "text/plain",
            Self::Json => "application/json",
            Self::Pem => "application/x-pem-file",
            Self::Binary => "application/octet-stream",
        }
    }

    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "txt" | "text" => Self::PlainText,
            "json" => Self::Json,
            "pem" | "pub" => Self::Pem,
            _ => Self::Binary,
        }
    }

    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(Self::Binary)
    }

    pub fn is_plain_text(&self) -> bool {
        matches!(self, Self::PlainText)
    }
}

/// Deterministic description of a file's canonical form.
///
/// Recomputed on demand; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalDescriptor {
    pub source_file_name: String,
    pub original_byte_size: u64,
    pub canonical_byte_size: u64,
    pub mime_hint: String,
    /// Lowercase hex SHA-256 of the canonical bytes (64 chars).
    pub content_hash: String,
    /// Multibase-style identifier derived from `content_hash`.
    pub content_id: String,
    pub format_version_tag: String,
}

/// What the signer signs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadMode {
    /// The raw bytes of `logs/ledger_merkle.json`.
    WholeDocument,
    /// A caller-supplied SHA-256 digest (64 hex characters), signed as-is.
    ExplicitHash { digest: String },
}

/// What the verifier checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyMode {
    /// The raw ledger document against the on-disk signature file.
    WholeDocument,
    /// A caller-supplied digest against a base64 DER signature.
    ExplicitHash {
        digest: String,
        signature_b64: String,
    },
}

/// Result of a successful signing run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignOutcome {
    /// DER signature, standard base64.
    pub signature_b64: String,
    /// Where the DER signature was written.
    pub signature_path: PathBuf,
    /// Canonical content hash of the document (whole-document mode only).
    pub canonical_hash: Option<String>,
}

/// Result of a successful verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyOutcome {
    /// Canonical content hash of the document (whole-document mode only).
    /// Informational; not part of the cryptographic check.
    pub canonical_hash: Option<String>,
}

/// A keypair retired by rotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchivedKeyPair {
    /// Path-safe rotation timestamp (the directory suffix).
    pub rotated_at: String,
    pub dir: PathBuf,
}

/// Path-safe UTC timestamp used to name rotation archives.
///
/// ISO-8601 with `:` replaced by `-`, e.g. `2024-01-01T00-00-00Z`.
pub fn rotation_stamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H:%M:%SZ").to_string().replace(':', "-")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn content_kind_from_extension() {
        assert_eq!(ContentKind::from_extension("TXT"), ContentKind::PlainText);
        assert_eq!(ContentKind::from_extension("json"), ContentKind::Json);
        assert_eq!(ContentKind::from_extension("pub"), ContentKind::Pem);
        assert_eq!(ContentKind::from_extension("sig"), ContentKind::Binary);
        assert_eq!(
            ContentKind::from_path(Path::new("notes")),
            ContentKind::Binary
        );
        assert_eq!(ContentKind::Json.mime_type(), "application/json");
    }

    #[test]
    fn rotation_stamp_has_no_colons() {
        let at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(rotation_stamp(at), "2024-01-02T03-04-05Z");
    }

    #[test]
    fn load_ledger_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger_merkle.json");
        fs::write(
            &path,
            r#"{"merkle_root":"abc123","algo":"sha256","timestamp":"2024-01-01T00:00:00Z","host":"test"}"#,
        )
        .unwrap();

        let record = LedgerRecord::load(&path).unwrap();
        assert_eq!(record.merkle_root, "abc123");
        assert_eq!(record.algo, "sha256");
        assert_eq!(record.host, "test");
        assert!(record.parsed_timestamp().is_some());
    }

    #[test]
    fn load_missing_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        match LedgerRecord::load(&path) {
            Err(LedgerError::MissingFile(p)) => assert_eq!(p, path),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
