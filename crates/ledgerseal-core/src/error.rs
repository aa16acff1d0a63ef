// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Ledgerseal.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for all Ledgerseal operations.
///
/// Structural failures (bad input, bad key files) and the cryptographic
/// failure [`LedgerError::SignatureMismatch`] are separate variants so that
/// callers can tell a usage error apart from an untrustworthy signature.
#[derive(Debug, Error)]
pub enum LedgerError {
    // -- Missing inputs --
    #[error("file not found: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("required file missing for verification: {}", .0.display())]
    MissingFiles(PathBuf),

    // -- Key material --
    #[error("malformed PEM in {}", .0.display())]
    InvalidPem(PathBuf),

    #[error("key material could not be parsed: {0}")]
    KeyParseFailed(String),

    #[error("key generation failed: {0}")]
    KeyGeneration(String),

    #[error("key store is locked by another process: {}", .0.display())]
    KeyStoreLocked(PathBuf),

    // -- Signing / verification --
    #[error("invalid hash: expected 64 hex characters, got {0:?}")]
    InvalidHash(String),

    #[error("signing failed: {0}")]
    SigningFailed(String),

    #[error("signature does not match")]
    SignatureMismatch,

    // -- External ledger script --
    #[error("ledger script failed (exit status {status:?}): {stderr}")]
    ExecutionFailed { status: Option<i32>, stderr: String },

    // -- Storage / persistence --
    #[error("database error: {0}")]
    Database(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl LedgerError {
    /// True for the one outcome that means "this signature is not trustworthy".
    pub fn is_signature_mismatch(&self) -> bool {
        matches!(self, Self::SignatureMismatch)
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, LedgerError>;
