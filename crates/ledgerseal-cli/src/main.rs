// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

//! Ledgerseal CLI: generate, sign, and verify Merkle-root ledger records.
//!
//! Results go to stdout, logs go to stderr. Failures are printed as a plain
//! message plus a suggestion, and the process exits with the code of the
//! error's category (2 input, 3 environment, 4 untrusted, 1 internal).

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use ledgerseal_core::LedgerGenerator;
use ledgerseal_core::config::{ENV_BASE_DIR, LedgerConfig};
use ledgerseal_core::error::Result;
use ledgerseal_core::human_errors::humanize_error;
use ledgerseal_core::types::{LedgerRecord, PayloadMode, VerifyMode};
use ledgerseal_security::{AuditLog, KeyStore, Signer, Verifier, canonicalize};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Signed Merkle-root ledger records.
#[derive(Parser)]
#[command(name = "ledgerseal", version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Base directory holding `logs/` and `keys/` (overrides LEDGER_BASE_DIR).
    #[arg(long, global = true, value_name = "DIR")]
    base_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the ledger script and print the record it wrote.
    Generate,
    /// Sign the ledger document, or an explicit SHA-256 digest.
    Sign {
        /// 64-character hex digest to sign instead of the document.
        #[arg(long, value_name = "HEX")]
        hash: Option<String>,
    },
    /// Verify the ledger document, or an explicit digest and signature.
    Verify {
        /// 64-character hex digest that was signed.
        #[arg(long, value_name = "HEX", requires = "signature")]
        hash: Option<String>,
        /// Base64 DER signature over `--hash`.
        #[arg(long, value_name = "B64", requires = "hash")]
        signature: Option<String>,
    },
    /// Archive the current keypair and generate a new one.
    Rotate,
    /// Print the canonical descriptor of a file as JSON.
    Canonicalize { file: PathBuf },
    /// Print the current ledger record.
    Show,
    /// Print the most recent audit log entries.
    Audit {
        #[arg(long, default_value_t = 20)]
        limit: u32,
    },
    /// Print the SHA-256 fingerprint of the current public key.
    Fingerprint,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let config = load_config(cli.base_dir.as_deref());

    match run(cli.command, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let human = humanize_error(&err);
            eprintln!("error: {}", human.message);
            if !human.suggestion.is_empty() {
                eprintln!("  hint: {}", human.suggestion);
            }
            if let Some(detail) = &human.detail {
                eprint!("{detail}");
            }
            let code = u8::try_from(human.exit_code()).unwrap_or(1);
            ExitCode::from(code)
        }
    }
}

/// Environment configuration, with `--base-dir` taking the place of
/// `LEDGER_BASE_DIR` so the default script path follows it.
fn load_config(base_dir: Option<&std::path::Path>) -> LedgerConfig {
    match base_dir {
        Some(dir) => {
            let dir = dir.to_string_lossy().into_owned();
            LedgerConfig::from_lookup(|key| {
                if key == ENV_BASE_DIR {
                    Some(dir.clone())
                } else {
                    std::env::var(key).ok()
                }
            })
        }
        None => LedgerConfig::from_env(),
    }
}

fn run(command: Commands, config: &LedgerConfig) -> Result<()> {
    match command {
        Commands::Generate => generate(config),
        Commands::Sign { hash } => sign(config, hash),
        Commands::Verify { hash, signature } => verify(config, hash, signature),
        Commands::Rotate => rotate(config),
        Commands::Canonicalize { file } => {
            let descriptor = canonicalize(&file)?;
            println!("{}", serde_json::to_string_pretty(&descriptor)?);
            Ok(())
        }
        Commands::Show => {
            let record = LedgerRecord::load(&config.paths().ledger_json)?;
            if record.parsed_timestamp().is_none() {
                warn!(timestamp = %record.timestamp, "ledger timestamp is not RFC 3339");
            }
            println!("{}", serde_json::to_string_pretty(&record)?);
            Ok(())
        }
        Commands::Audit { limit } => audit(config, limit),
        Commands::Fingerprint => {
            println!("{}", KeyStore::new(config).public_key_fingerprint()?);
            Ok(())
        }
    }
}

/// The audit log, if it can be opened. Operations still run without it.
fn open_audit(config: &LedgerConfig) -> Option<AuditLog> {
    let path = config.paths().audit_db;
    match AuditLog::open(&path) {
        Ok(audit) => Some(audit),
        Err(e) => {
            warn!(error = %e, path = %path.display(), "audit log unavailable; not recording");
            None
        }
    }
}

fn record(
    audit: Option<&AuditLog>,
    action: &str,
    subject: &str,
    success: bool,
    details: Option<&str>,
) {
    let Some(audit) = audit else { return };
    if let Err(e) = audit.record(action, subject, success, details) {
        warn!(error = %e, action, "failed to record audit entry");
    }
}

fn generate(config: &LedgerConfig) -> Result<()> {
    let audit = open_audit(config);
    let result = LedgerGenerator::new(config).run();

    let (subject, details) = match &result {
        Ok(record) => (record.merkle_root.clone(), None),
        Err(e) => (String::new(), Some(e.to_string())),
    };
    record(audit.as_ref(), "generate", &subject, result.is_ok(), details.as_deref());

    let record = result?;
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}

fn sign(config: &LedgerConfig, hash: Option<String>) -> Result<()> {
    let audit = open_audit(config);

    if config.rotate_keys {
        info!("key rotation requested before signing");
        rotate_with_audit(config, audit.as_ref())?;
    }

    let mode = match hash {
        Some(digest) => PayloadMode::ExplicitHash { digest },
        None => PayloadMode::WholeDocument,
    };
    let signer = Signer::new(config);
    let outcome = match &audit {
        Some(audit) => signer.with_audit(audit).sign(&mode),
        None => signer.sign(&mode),
    }?;

    if let Some(canonical_hash) = &outcome.canonical_hash {
        info!(%canonical_hash, "document canonical hash");
    }
    println!("{}", outcome.signature_b64);
    Ok(())
}

fn verify(config: &LedgerConfig, hash: Option<String>, signature: Option<String>) -> Result<()> {
    let mode = match (hash, signature) {
        (Some(digest), Some(signature_b64)) => VerifyMode::ExplicitHash {
            digest,
            signature_b64,
        },
        // clap enforces that the two flags come together.
        _ => VerifyMode::WholeDocument,
    };

    let audit = open_audit(config);
    let verifier = Verifier::new(config);
    let outcome = match &audit {
        Some(audit) => verifier.with_audit(audit).verify(&mode),
        None => verifier.verify(&mode),
    }?;

    match outcome.canonical_hash {
        Some(canonical_hash) => println!("signature valid (canonical hash {canonical_hash})"),
        None => println!("signature valid"),
    }
    Ok(())
}

fn rotate(config: &LedgerConfig) -> Result<()> {
    let audit = open_audit(config);
    rotate_with_audit(config, audit.as_ref())
}

fn rotate_with_audit(config: &LedgerConfig, audit: Option<&AuditLog>) -> Result<()> {
    let keystore = KeyStore::new(config);
    let result = keystore
        .rotate()
        .and_then(|archived| Ok((archived, keystore.public_key_fingerprint()?)));

    let (subject, details) = match &result {
        Ok((Some(archived), fingerprint)) => (
            fingerprint.clone(),
            Some(format!("archived to {}", archived.dir.display())),
        ),
        Ok((None, fingerprint)) => (fingerprint.clone(), Some("initial keypair".to_owned())),
        Err(e) => (String::new(), Some(e.to_string())),
    };
    record(audit, "rotate", &subject, result.is_ok(), details.as_deref());

    let (archived, fingerprint) = result?;
    if let Some(archived) = archived {
        println!("archived previous keypair to {}", archived.dir.display());
    }
    println!("new public key fingerprint {fingerprint}");
    info!(archived = keystore.archives()?.len(), "rotation complete");
    Ok(())
}

fn audit(config: &LedgerConfig, limit: u32) -> Result<()> {
    let audit = AuditLog::open(&config.paths().audit_db)?;
    for entry in audit.recent_entries(limit)? {
        let status = if entry.success { "ok" } else { "FAILED" };
        let subject = if entry.subject_hash.is_empty() {
            "-"
        } else {
            entry.subject_hash.as_str()
        };
        match &entry.details {
            Some(details) => println!(
                "{} {} {:<8} {:<6} {} {}",
                entry.id, entry.timestamp, entry.action, status, subject, details
            ),
            None => println!(
                "{} {} {:<8} {:<6} {}",
                entry.id, entry.timestamp, entry.action, status, subject
            ),
        }
    }
    Ok(())
}
