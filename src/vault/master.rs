//! Master password record.
//!
//! The master password is stored as a single ciphertext blob under the
//! vault key: the raw `nonce || ciphertext || tag` bytes from `Cipher`,
//! with no text encoding. It is written once at init and never changed.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use crate::crypto::Cipher;
use crate::errors::{FerneyError, Result};
use crate::fsutil;

/// The encrypted master password as stored on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MasterPasswordRecord {
    ciphertext: Vec<u8>,
}

impl MasterPasswordRecord {
    pub fn from_bytes(ciphertext: Vec<u8>) -> Self {
        Self { ciphertext }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.ciphertext
    }
}

/// Creates and checks the master password record.
#[derive(Debug, Clone)]
pub struct MasterAuth {
    path: PathBuf,
}

impl MasterAuth {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Encrypt `password` and persist it as the vault's master record.
    ///
    /// Fails with `VaultAlreadyExists` if a record is already present.
    pub fn initialize(&self, cipher: &Cipher, password: &str) -> Result<MasterPasswordRecord> {
        if self.exists() {
            return Err(FerneyError::VaultAlreadyExists(self.path.clone()));
        }

        let record = MasterPasswordRecord::from_bytes(cipher.encrypt(password.as_bytes())?);

        let mut file = fsutil::create_private(&self.path)?;
        let written = file
            .write_all(record.as_bytes())
            .and_then(|()| file.sync_all())
            .map_err(|e| FerneyError::from_io(&self.path, e));
        drop(file);
        if let Err(e) = written.and_then(|()| fsutil::restrict_to_owner(&self.path)) {
            fsutil::discard(&self.path);
            return Err(e);
        }

        tracing::info!(path = %self.path.display(), "stored master password record");
        Ok(record)
    }

    /// Read the stored record.
    ///
    /// A missing record means the vault was never initialized.
    pub fn load(&self) -> Result<MasterPasswordRecord> {
        let data = fs::read(&self.path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => FerneyError::VaultNotInitialized(self.path.clone()),
            _ => FerneyError::from_io(&self.path, e),
        })?;
        Ok(MasterPasswordRecord::from_bytes(data))
    }

    /// Check `candidate` against the stored master password.
    ///
    /// `Ok(false)` is a wrong password. A record that cannot be
    /// decrypted is an error, never `false`.
    pub fn verify(&self, cipher: &Cipher, candidate: &str) -> Result<bool> {
        let record = self.load()?;
        let stored = Zeroizing::new(cipher.decrypt(record.as_bytes())?);

        let matches: bool = stored.as_slice().ct_eq(candidate.as_bytes()).into();
        tracing::debug!(matches, "verified master password");
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::VaultKey;
    use tempfile::TempDir;

    fn setup() -> (TempDir, MasterAuth, Cipher) {
        let dir = TempDir::new().unwrap();
        let auth = MasterAuth::new(dir.path().join("bin.txt"));
        let cipher = Cipher::new(VaultKey::new([0x11; 32]));
        (dir, auth, cipher)
    }

    #[test]
    fn verify_accepts_only_exact_password() {
        let (_dir, auth, cipher) = setup();
        auth.initialize(&cipher, "S3cret").unwrap();

        assert!(auth.verify(&cipher, "S3cret").unwrap());
        assert!(!auth.verify(&cipher, "wrong").unwrap());
        assert!(!auth.verify(&cipher, "s3cret").unwrap());
        assert!(!auth.verify(&cipher, "S3cret ").unwrap());
        assert!(!auth.verify(&cipher, "").unwrap());
    }

    #[test]
    fn stored_blob_is_not_plaintext() {
        let (_dir, auth, cipher) = setup();
        let record = auth.initialize(&cipher, "S3cret").unwrap();

        let on_disk = fs::read(auth.path()).unwrap();
        assert_eq!(on_disk, record.as_bytes());
        assert!(!on_disk.windows(6).any(|w| w == b"S3cret"));
    }

    #[test]
    fn initialize_twice_fails() {
        let (_dir, auth, cipher) = setup();
        auth.initialize(&cipher, "first").unwrap();
        assert!(matches!(
            auth.initialize(&cipher, "second"),
            Err(FerneyError::VaultAlreadyExists(_))
        ));
        assert!(auth.verify(&cipher, "first").unwrap());
    }

    #[test]
    fn missing_record_is_not_initialized() {
        let (_dir, auth, cipher) = setup();
        assert!(matches!(
            auth.verify(&cipher, "anything"),
            Err(FerneyError::VaultNotInitialized(_))
        ));
    }

    #[test]
    fn corrupted_record_is_an_error_not_false() {
        let (_dir, auth, cipher) = setup();
        auth.initialize(&cipher, "S3cret").unwrap();

        let mut blob = fs::read(auth.path()).unwrap();
        let last = blob.len() - 1;
        blob[last] ^= 0x01;
        fs::write(auth.path(), &blob).unwrap();

        assert!(matches!(
            auth.verify(&cipher, "S3cret"),
            Err(FerneyError::Authentication)
        ));
    }

    #[test]
    fn truncated_record_is_format_error() {
        let (_dir, auth, cipher) = setup();
        fs::write(auth.path(), b"short").unwrap();
        assert!(matches!(
            auth.verify(&cipher, "S3cret"),
            Err(FerneyError::Format(_))
        ));
    }

    #[test]
    fn different_key_is_an_error() {
        let (_dir, auth, cipher) = setup();
        auth.initialize(&cipher, "S3cret").unwrap();

        let other = Cipher::new(VaultKey::new([0x22; 32]));
        assert!(matches!(
            auth.verify(&other, "S3cret"),
            Err(FerneyError::Authentication)
        ));
    }
}
