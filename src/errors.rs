use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// All errors that can occur in Ferney.
#[derive(Debug, Error)]
pub enum FerneyError {
    // --- Key errors ---
    #[error("Cannot read encryption key at {path}: {reason}")]
    KeyAccess { path: PathBuf, reason: String },

    #[error("Encryption key at {path} is invalid: {reason}")]
    InvalidKey { path: PathBuf, reason: String },

    #[error("Encryption key missing at {0} but vault data exists — refusing to generate a new key")]
    KeyMissing(PathBuf),

    // --- Crypto errors ---
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Authentication failed — data was tampered with, corrupted, or encrypted under a different key")]
    Authentication,

    #[error("Malformed ciphertext: {0}")]
    Format(String),

    // --- Vault errors ---
    #[error("Vault not initialized at {0} — run `ferney init` first")]
    VaultNotInitialized(PathBuf),

    #[error("Vault already exists at {0}")]
    VaultAlreadyExists(PathBuf),

    #[error("Vault is locked — unlock it with the master password first")]
    VaultLocked,

    #[error("No password stored for '{0}'")]
    RecordNotFound(String),

    #[error("A credential titled '{0}' already exists")]
    DuplicateTitle(String),

    #[error("Invalid credential store format: {0}")]
    InvalidStoreFormat(String),

    // --- Storage errors ---
    #[error("Permission denied accessing {0}")]
    Permission(PathBuf),

    #[error("File not found: {0}")]
    FileMissing(PathBuf),

    #[error("File already exists: {0}")]
    FileExists(PathBuf),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    Config(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("Wrong master password")]
    WrongMasterPassword,

    #[error("Password too short — must be at least {0} characters")]
    PasswordTooShort(usize),
}

impl FerneyError {
    /// Classify an I/O error against the artifact it touched.
    ///
    /// Missing files and permission problems get their own variants so the
    /// caller can tell "run init" apart from "fix your file modes".
    pub fn from_io(path: &Path, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => FerneyError::FileMissing(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => FerneyError::Permission(path.to_path_buf()),
            _ => FerneyError::Io(err),
        }
    }

    /// Process exit code for this error.
    ///
    /// `1` means the user can fix it by retrying or running another command;
    /// `2` means the vault or its environment is misconfigured or damaged.
    pub fn exit_code(&self) -> i32 {
        match self {
            FerneyError::KeyAccess { .. }
            | FerneyError::InvalidKey { .. }
            | FerneyError::KeyMissing(_)
            | FerneyError::Authentication
            | FerneyError::Format(_)
            | FerneyError::InvalidStoreFormat(_)
            | FerneyError::EncryptionFailed(_)
            | FerneyError::Permission(_)
            | FerneyError::Config(_) => 2,
            _ => 1,
        }
    }
}

/// Convenience type alias for Ferney results.
pub type Result<T> = std::result::Result<T, FerneyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_io_distinguishes_missing_and_denied() {
        let path = Path::new("/tmp/whatever");

        let missing = FerneyError::from_io(path, io::Error::from(io::ErrorKind::NotFound));
        assert!(matches!(missing, FerneyError::FileMissing(_)));

        let denied = FerneyError::from_io(path, io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(matches!(denied, FerneyError::Permission(_)));

        let other = FerneyError::from_io(path, io::Error::from(io::ErrorKind::Interrupted));
        assert!(matches!(other, FerneyError::Io(_)));
    }

    #[test]
    fn missing_and_denied_have_distinct_messages_and_codes() {
        let path = PathBuf::from("vault/bin.txt");
        let missing = FerneyError::FileMissing(path.clone());
        let denied = FerneyError::Permission(path);

        assert_ne!(missing.to_string(), denied.to_string());
        assert_eq!(missing.exit_code(), 1);
        assert_eq!(denied.exit_code(), 2);
    }

    #[test]
    fn integrity_failures_are_fatal() {
        assert_eq!(FerneyError::Authentication.exit_code(), 2);
        assert_eq!(FerneyError::Format("short".into()).exit_code(), 2);
        assert_eq!(FerneyError::RecordNotFound("Email".into()).exit_code(), 1);
    }
}
