// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Ledgerseal: Core types, configuration, and error definitions shared across
// all crates.

pub mod config;
pub mod error;
pub mod generator;
pub mod human_errors;
pub mod types;

pub use config::{LedgerConfig, LedgerPaths};
pub use error::LedgerError;
pub use generator::LedgerGenerator;
pub use types::*;
