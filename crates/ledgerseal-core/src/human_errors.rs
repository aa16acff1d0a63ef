// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages and process exit codes.
//
// Every error is sorted into one of three buckets an operator can act on:
// fix the input, fix the environment, or do not trust this signature.

use crate::error::LedgerError;

/// What the operator has to do about an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The caller passed something malformed (bad hash, bad base64).
    FixInput,
    /// Files are missing or corrupt, or the environment is misconfigured.
    FixEnvironment,
    /// The signature is cryptographically wrong. A trust/audit event.
    Untrusted,
    /// Anything else (I/O, database, serialization).
    Internal,
}

impl ErrorCategory {
    /// Process exit code for this category.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Internal => 1,
            Self::FixInput => 2,
            Self::FixEnvironment => 3,
            Self::Untrusted => 4,
        }
    }
}

/// A plain English error with an actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// One-line summary.
    pub message: String,
    /// What the operator should try next.
    pub suggestion: String,
    pub category: ErrorCategory,
    /// Output from an external collaborator, to be shown exactly as captured.
    pub detail: Option<String>,
}

impl HumanError {
    pub fn exit_code(&self) -> i32 {
        self.category.exit_code()
    }
}

/// Convert a `LedgerError` into a `HumanError`.
pub fn humanize_error(err: &LedgerError) -> HumanError {
    match err {
        LedgerError::MissingFile(path) => HumanError {
            message: format!("{} does not exist.", path.display()),
            suggestion: "Run `ledgerseal generate` first to produce the ledger document.".into(),
            category: ErrorCategory::FixEnvironment,
            detail: None,
        },

        LedgerError::MissingFiles(path) => HumanError {
            message: format!("Required file {} is missing.", path.display()),
            suggestion: "Make sure the ledger has been generated and signed, and that the public key is present.".into(),
            category: ErrorCategory::FixEnvironment,
            detail: None,
        },

        LedgerError::InvalidPem(path) => HumanError {
            message: format!("The key file {} is corrupt.", path.display()),
            suggestion: "Restore the key from a keys/archive-* directory, or run `ledgerseal rotate` to replace it.".into(),
            category: ErrorCategory::FixEnvironment,
            detail: None,
        },

        LedgerError::KeyParseFailed(detail) => HumanError {
            message: "The key file is well-framed but its key material is invalid.".into(),
            suggestion: format!("Regenerate the keypair with `ledgerseal rotate`. ({detail})"),
            category: ErrorCategory::FixEnvironment,
            detail: None,
        },

        LedgerError::KeyGeneration(detail) | LedgerError::SigningFailed(detail) => HumanError {
            message: "The cryptographic backend reported a failure.".into(),
            suggestion: format!("Try again; if it persists, report it. ({detail})"),
            category: ErrorCategory::Internal,
            detail: None,
        },

        LedgerError::KeyStoreLocked(path) => HumanError {
            message: "Another process is managing the keys right now.".into(),
            suggestion: format!(
                "Wait for it to finish. If no other process is running, remove {}.",
                path.display()
            ),
            category: ErrorCategory::FixEnvironment,
            detail: None,
        },

        LedgerError::InvalidHash(_) => HumanError {
            message: "The hash is not a SHA-256 digest.".into(),
            suggestion: "Pass exactly 64 hexadecimal characters.".into(),
            category: ErrorCategory::FixInput,
            detail: None,
        },

        LedgerError::SignatureMismatch => HumanError {
            message: "The signature does NOT match. Do not trust this ledger record.".into(),
            suggestion: "The document, the signature, or the key has changed since signing. Investigate before re-signing.".into(),
            category: ErrorCategory::Untrusted,
            detail: None,
        },

        LedgerError::ExecutionFailed { status, stderr } => HumanError {
            message: match status {
                Some(code) => format!("The ledger script failed with exit status {code}."),
                None => "The ledger script was terminated by a signal.".into(),
            },
            suggestion: "Fix the script using its error output below.".into(),
            category: ErrorCategory::FixEnvironment,
            detail: Some(stderr.clone()),
        },

        LedgerError::Database(_) => HumanError {
            message: "The audit database had a problem.".into(),
            suggestion: "Check that logs/audit.db is writable.".into(),
            category: ErrorCategory::Internal,
            detail: None,
        },

        LedgerError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::PermissionDenied {
                HumanError {
                    message: "Permission denied.".into(),
                    suggestion: "Check ownership of the base directory and its keys/ and logs/ folders.".into(),
                    category: ErrorCategory::FixEnvironment,
                    detail: None,
                }
            } else {
                HumanError {
                    message: "There was a problem reading or writing a file.".into(),
                    suggestion: format!("{io_err}"),
                    category: ErrorCategory::Internal,
                    detail: None,
                }
            }
        }

        LedgerError::Serialization(_) => HumanError {
            message: "The ledger document is not valid JSON.".into(),
            suggestion: "Regenerate it with `ledgerseal generate`.".into(),
            category: ErrorCategory::FixEnvironment,
            detail: None,
        },
    }
}
