// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Integrity primitives: SHA-256 hashing and digest validation.

use ledgerseal_core::error::{LedgerError, Result};
use sha2::{Digest, Sha256};

/// Length of a hex-encoded SHA-256 digest.
pub const DIGEST_HEX_LEN: usize = 64;

/// Compute the SHA-256 hash of `data` and return it as a lowercase hex string.
pub fn hash_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    hex::encode(result)
}

/// Decode a caller-supplied SHA-256 digest.
///
/// Accepts exactly 64 hex digits in either case. Anything else is
/// `LedgerError::InvalidHash` carrying the rejected input.
pub fn parse_digest(hex_str: &str) -> Result<[u8; 32]> {
    if hex_str.len() != DIGEST_HEX_LEN || !hex_str.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(LedgerError::InvalidHash(hex_str.to_owned()));
    }
    let mut digest = [0u8; 32];
    hex::decode_to_slice(hex_str, &mut digest)
        .map_err(|_| LedgerError::InvalidHash(hex_str.to_owned()))?;
    Ok(digest)
}
