//! On-disk lifecycle of the vault key.
//!
//! The key file holds exactly `KEY_LEN` raw bytes and nothing else.
//! It is generated once, restricted to its owner, and reloaded on every
//! run.
//!
//! Two processes racing through a first run can both generate a key;
//! the loser's `create_new` fails. There is no locking beyond that.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use zeroize::Zeroize;

use crate::errors::{FerneyError, Result};
use crate::fsutil;

use super::keys::{VaultKey, KEY_LEN};

/// Owns the path of the key artifact.
#[derive(Debug, Clone)]
pub struct KeyStore {
    path: PathBuf,
}

impl KeyStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `true` if a key artifact is present (valid or not).
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load the existing key, or generate and persist a new one.
    pub fn load_or_create(&self) -> Result<VaultKey> {
        if self.exists() {
            self.load()
        } else {
            self.create()
        }
    }

    /// Read the key artifact. Never creates one.
    ///
    /// A missing file is `FileMissing`; any other read failure is
    /// `KeyAccess`; a file of the wrong size is `InvalidKey`.
    pub fn load(&self) -> Result<VaultKey> {
        let mut data = fs::read(&self.path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => FerneyError::FileMissing(self.path.clone()),
            _ => FerneyError::KeyAccess {
                path: self.path.clone(),
                reason: e.to_string(),
            },
        })?;

        let key = VaultKey::from_slice(&data);
        let len = data.len();
        data.zeroize();

        let key = key.ok_or_else(|| FerneyError::InvalidKey {
            path: self.path.clone(),
            reason: format!("expected {KEY_LEN} bytes, got {len}"),
        })?;

        tracing::debug!(path = %self.path.display(), "loaded vault key");
        Ok(key)
    }

    /// Generate a new key and write it to a file that must not exist yet.
    ///
    /// Permissions are tightened right after the write so the key is
    /// never left readable by other users.
    pub fn create(&self) -> Result<VaultKey> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fsutil::ensure_dir(parent)?;
            }
        }

        let key = VaultKey::generate();

        let mut file = fsutil::create_private(&self.path)?;
        file.write_all(key.as_bytes())
            .and_then(|()| file.sync_all())
            .map_err(|e| FerneyError::from_io(&self.path, e))?;
        drop(file);
        fsutil::restrict_to_owner(&self.path)?;

        tracing::info!(path = %self.path.display(), "generated new vault key");
        Ok(key)
    }
}
