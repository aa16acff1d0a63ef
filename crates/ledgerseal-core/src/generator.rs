// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Ledger generation: runs the external Merkle-root script and loads the
// record it writes.
//
// Contract with the script: exit 0 with `logs/ledger_merkle.json` written on
// success; any other exit status is a hard failure and its stderr is surfaced
// verbatim.  There is no retry.

use std::fs;
use std::path::PathBuf;
use std::process::Command;

use tracing::{debug, info, instrument, warn};

use crate::config::{ENV_BASE_DIR, LedgerConfig, LedgerPaths};
use crate::error::{LedgerError, Result};
use crate::types::LedgerRecord;

/// Invokes the configured ledger-generation script.
pub struct LedgerGenerator {
    script: PathBuf,
    paths: LedgerPaths,
}

impl LedgerGenerator {
    pub fn new(config: &LedgerConfig) -> Self {
        Self {
            script: config.script_path.clone(),
            paths: config.paths(),
        }
    }

    /// Run the script and return the record it produced.
    ///
    /// The script runs with the base directory as its working directory and
    /// `LEDGER_BASE_DIR` exported, so it can locate `logs/` itself.
    #[instrument(skip_all, fields(script = %self.script.display()))]
    pub fn run(&self) -> Result<LedgerRecord> {
        if !self.script.exists() {
            return Err(LedgerError::MissingFile(self.script.clone()));
        }
        fs::create_dir_all(&self.paths.logs_dir)?;

        let output = Command::new(&self.script)
            .current_dir(&self.paths.base_dir)
            .env(ENV_BASE_DIR, &self.paths.base_dir)
            .output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            warn!(status = ?output.status.code(), "ledger script failed");
            return Err(LedgerError::ExecutionFailed {
                status: output.status.code(),
                stderr,
            });
        }

        debug!(stdout_len = output.stdout.len(), "ledger script finished");
        let record = LedgerRecord::load(&self.paths.ledger_json)?;
        info!(merkle_root = %record.merkle_root, algo = %record.algo, "ledger generated");
        Ok(record)
    }
}
