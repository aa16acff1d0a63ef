// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Process configuration and on-disk layout.
//
// The configuration is read from the environment exactly once, at process
// start, and then passed by value into every component constructor.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Overrides the base directory under which `logs/` and `keys/` live.
pub const ENV_BASE_DIR: &str = "LEDGER_BASE_DIR";
/// Overrides the path of the external ledger-generation script.
pub const ENV_SCRIPT: &str = "LEDGER_SCRIPT";
/// When truthy, the next signing run rotates the keypair first.
pub const ENV_ROTATE_KEYS: &str = "LEDGER_ROTATE_KEYS";

const APP_DIR_NAME: &str = "ledgerseal";

/// Settings shared by every Ledgerseal component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Root directory for `logs/` and `keys/`.
    pub base_dir: PathBuf,
    /// Executable that writes `logs/ledger_merkle.json`.
    pub script_path: PathBuf,
    /// Rotate the keypair before the next signing run.
    pub rotate_keys: bool,
}

impl LedgerConfig {
    /// Build a configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable lookup.
    ///
    /// `from_env` delegates here; tests pass a closure over a map instead of
    /// mutating the real environment.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_dir = lookup(ENV_BASE_DIR)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| default_base_dir(&lookup));

        let script_path = lookup(ENV_SCRIPT)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| default_script_path(&base_dir));

        let rotate_keys = lookup(ENV_ROTATE_KEYS)
            .map(|v| is_truthy(&v))
            .unwrap_or(false);

        Self {
            base_dir,
            script_path,
            rotate_keys,
        }
    }

    /// Configuration rooted at `base_dir` with the default script location.
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        let base_dir = base_dir.into();
        let script_path = default_script_path(&base_dir);
        Self {
            base_dir,
            script_path,
            rotate_keys: false,
        }
    }

    /// Derive every file location from this configuration.
    pub fn paths(&self) -> LedgerPaths {
        LedgerPaths::new(&self.base_dir)
    }
}

/// Every file location Ledgerseal reads or writes, derived from the base dir.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerPaths {
    pub base_dir: PathBuf,
    pub logs_dir: PathBuf,
    pub keys_dir: PathBuf,
    /// `logs/ledger_merkle.json`
    pub ledger_json: PathBuf,
    /// `logs/ledger_merkle.sig`
    pub signature: PathBuf,
    /// `logs/audit.db`
    pub audit_db: PathBuf,
    /// `keys/ledger.pem`
    pub private_key: PathBuf,
    /// `keys/ledger.pub`
    pub public_key: PathBuf,
    /// `keys/.keystore.lock`
    pub keystore_lock: PathBuf,
}

impl LedgerPaths {
    pub const PRIVATE_KEY_FILE: &'static str = "ledger.pem";
    pub const PUBLIC_KEY_FILE: &'static str = "ledger.pub";
    pub const ARCHIVE_PREFIX: &'static str = "archive-";

    pub fn new(base_dir: &Path) -> Self {
        let logs_dir = base_dir.join("logs");
        let keys_dir = base_dir.join("keys");
        Self {
            base_dir: base_dir.to_path_buf(),
            ledger_json: logs_dir.join("ledger_merkle.json"),
            signature: logs_dir.join("ledger_merkle.sig"),
            audit_db: logs_dir.join("audit.db"),
            private_key: keys_dir.join(Self::PRIVATE_KEY_FILE),
            public_key: keys_dir.join(Self::PUBLIC_KEY_FILE),
            keystore_lock: keys_dir.join(".keystore.lock"),
            logs_dir,
            keys_dir,
        }
    }

    /// Archive directory for a keypair retired at `stamp`.
    ///
    /// `stamp` is expected to be path-safe already (see
    /// [`crate::types::rotation_stamp`]).
    pub fn archive_dir(&self, stamp: &str) -> PathBuf {
        self.keys_dir.join(format!("{}{stamp}", Self::ARCHIVE_PREFIX))
    }
}

fn default_base_dir<F>(lookup: &F) -> PathBuf
where
    F: Fn(&str) -> Option<String>,
{
    // XDG data dir, then home, then a last-resort temp location.
    if let Some(xdg) = lookup("XDG_DATA_HOME").filter(|v| !v.is_empty()) {
        return PathBuf::from(xdg).join(APP_DIR_NAME);
    }
    if let Some(home) = lookup("HOME").filter(|v| !v.is_empty()) {
        return PathBuf::from(home)
            .join(".local")
            .join("share")
            .join(APP_DIR_NAME);
    }
    PathBuf::from("/tmp").join(APP_DIR_NAME)
}

fn default_script_path(base_dir: &Path) -> PathBuf {
    base_dir.join("scripts").join("ledger_merkle.sh")
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes"
    )
}
