// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Canonicalization: deterministic bytes, content hash, and content id for a
// file.
//
// Plain-text files are trimmed and terminated with exactly one newline; every
// other file is hashed as-is.  The content id is a simplified multihash /
// multibase framing that appears verbatim in audit output, so its byte layout
// must not change:
//
//   "b" + lowercase(base64_no_pad(utf8("1220" + hex_sha256)))

use std::fs;
use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD_NO_PAD;
use ledgerseal_core::error::{LedgerError, Result};
use ledgerseal_core::types::{CanonicalDescriptor, ContentKind};
use tracing::{debug, instrument};

use crate::integrity::hash_bytes;

/// Version tag stamped on every descriptor.
pub const FORMAT_VERSION_TAG: &str = "ledgerseal-canon/1";

/// Multihash code for SHA-256 (0x12) with a 32-byte length (0x20), as hex.
const MULTIHASH_SHA256_PREFIX: &str = "1220";

/// Multibase marker prefixed onto the encoded id.
const MULTIBASE_MARKER: char = 'b';

/// Canonicalize the file at `path`.
///
/// Fails with `LedgerError::MissingFile` when the path does not exist.
/// Undecodable text is tolerated (lossy UTF-8).
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn canonicalize(path: impl AsRef<Path>) -> Result<CanonicalDescriptor> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(LedgerError::MissingFile(path.to_path_buf()));
    }

    let raw = fs::read(path)?;
    let kind = ContentKind::from_path(path);
    let canonical = canonical_bytes(kind, &raw);
    let content_hash = hash_bytes(&canonical);
    let content_id = content_id_for_hash(&content_hash);

    debug!(
        original_len = raw.len(),
        canonical_len = canonical.len(),
        %content_hash,
        "canonicalized"
    );

    Ok(CanonicalDescriptor {
        source_file_name: path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default(),
        original_byte_size: raw.len() as u64,
        canonical_byte_size: canonical.len() as u64,
        mime_hint: kind.mime_type().to_owned(),
        content_hash,
        content_id,
        format_version_tag: FORMAT_VERSION_TAG.to_owned(),
    })
}

/// The canonical byte form of `raw` for content of the given kind.
pub fn canonical_bytes(kind: ContentKind, raw: &[u8]) -> Vec<u8> {
    if !kind.is_plain_text() {
        return raw.to_vec();
    }
    let text = String::from_utf8_lossy(raw);
    let mut canonical = text.trim().to_owned().into_bytes();
    canonical.push(b'\n');
    canonical
}

/// Derive the self-describing content id from a hex SHA-256 digest.
pub fn content_id_for_hash(content_hash: &str) -> String {
    let framed = format!("{MULTIHASH_SHA256_PREFIX}{content_hash}");
    let encoded = STANDARD_NO_PAD.encode(framed.as_bytes());
    format!("{MULTIBASE_MARKER}{}", encoded.to_ascii_lowercase())
}
