// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

//! ledgerseal-security: signing and verification of ledger-root records.
//!
//! This crate owns everything that touches key material or produces
//! audit-relevant hashes: canonicalization, the P-256 keypair lifecycle on
//! disk, detached ECDSA signatures in whole-document and explicit-hash modes,
//! and the append-only audit trail.

pub mod audit;
pub mod canonical;
pub mod integrity;
pub mod keystore;
pub mod pem;
pub mod signer;
pub mod verifier;

// PUBLIC API: Re-export the components
pub use audit::AuditLog;
pub use canonical::canonicalize;
pub use integrity::{hash_bytes, parse_digest};
pub use keystore::KeyStore;
pub use signer::Signer;
pub use verifier::Verifier;
