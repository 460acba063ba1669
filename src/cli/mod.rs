//! CLI module — Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use clap::Parser;

use zeroize::Zeroizing;

use crate::config::Settings;
use crate::errors::{FerneyError, Result};
use crate::vault::{Vault, VaultPaths};

/// Environment variable consulted before prompting for the master password.
pub const MASTER_PASSWORD_ENV: &str = "FERNEY_MASTER_PASSWORD";

/// Ferney CLI: local encrypted password vault.
#[derive(Parser)]
#[command(name = "ferney", about = "Local encrypted password vault", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Vault directory (default: from .ferney.toml, else .ferney)
    #[arg(long, global = true)]
    pub vault_dir: Option<String>,

    /// Print debug diagnostics to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Create a new vault protected by a master password
    Init,

    /// Add a credential (missing fields are prompted)
    Add {
        /// Credential title, used for lookups (case-insensitive)
        #[arg(short, long)]
        title: Option<String>,
        /// Website or app the credential belongs to
        #[arg(short, long)]
        site: Option<String>,
        /// Username or login
        #[arg(short, long)]
        username: Option<String>,
        /// Free-form notes
        #[arg(short, long)]
        notes: Option<String>,
    },

    /// Show a credential with its decrypted password
    View {
        /// Credential title
        title: String,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// List stored credentials (passwords are not shown)
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Get the master password, trying in order:
/// 1. `FERNEY_MASTER_PASSWORD` env var (scripts, tests)
/// 2. Interactive prompt
///
/// Returns `Zeroizing<String>` so the password is wiped from memory on drop.
pub fn prompt_master_password() -> Result<Zeroizing<String>> {
    if let Ok(pw) = std::env::var(MASTER_PASSWORD_ENV) {
        if !pw.is_empty() {
            return Ok(Zeroizing::new(pw));
        }
    }

    let pw = dialoguer::Password::new()
        .with_prompt("Enter your master password")
        .interact()
        .map_err(|e| FerneyError::CommandFailed(format!("password prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Prompt for a new master password with confirmation (used during `init`).
///
/// Also respects `FERNEY_MASTER_PASSWORD` for scripted usage.
/// Enforces `min_len` characters.
pub fn prompt_new_master_password(min_len: usize) -> Result<Zeroizing<String>> {
    if let Ok(pw) = std::env::var(MASTER_PASSWORD_ENV) {
        if !pw.is_empty() {
            if pw.chars().count() < min_len {
                return Err(FerneyError::PasswordTooShort(min_len));
            }
            return Ok(Zeroizing::new(pw));
        }
    }

    loop {
        let password = dialoguer::Password::new()
            .with_prompt("Choose a master password")
            .with_confirmation(
                "Confirm master password",
                "Passwords do not match, try again",
            )
            .interact()
            .map_err(|e| FerneyError::CommandFailed(format!("password prompt: {e}")))?;

        if password.chars().count() < min_len.max(1) {
            output::warning(&format!(
                "Master password must be at least {} characters. Try again.",
                min_len.max(1)
            ));
            continue;
        }

        return Ok(Zeroizing::new(password));
    }
}

/// Load settings and resolve the vault artifact paths.
///
/// `--vault-dir` wins over `vault_dir` from `.ferney.toml`.
pub fn resolve_paths(cli: &Cli) -> Result<(Settings, VaultPaths)> {
    let cwd = std::env::current_dir()?;
    let settings = Settings::load(&cwd)?;
    let dir = match &cli.vault_dir {
        Some(dir) => cwd.join(dir),
        None => settings.vault_dir_path(&cwd),
    };
    let paths = VaultPaths::with_settings(dir, &settings);
    Ok((settings, paths))
}

/// Open the vault and unlock it with the master password.
///
/// A rejected password becomes `WrongMasterPassword` here so the
/// command stops before touching any credential.
pub fn open_unlocked(cli: &Cli) -> Result<Vault> {
    let (_, paths) = resolve_paths(cli)?;
    let mut vault = Vault::open(paths)?;

    let password = prompt_master_password()?;
    if !vault.unlock(&password)? {
        return Err(FerneyError::WrongMasterPassword);
    }
    Ok(vault)
}
