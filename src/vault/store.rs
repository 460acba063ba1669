//! High-level vault operations used by CLI commands.
//!
//! `Vault` is the per-run context: it owns the `Cipher` built from the
//! vault key and hands it explicitly to `MasterAuth` and to every
//! credential operation. Credential operations are refused until
//! `unlock` has accepted the master password.
//!
//! Nothing here locks files. Running two processes against the same
//! vault at once is undefined: the last append wins.

use std::path::{Path, PathBuf};

use zeroize::{Zeroize, Zeroizing};

use crate::config::Settings;
use crate::crypto::{Cipher, KeyStore};
use crate::errors::{FerneyError, Result};
use crate::fsutil;

use super::credential::{
    normalize_title, CredentialRecord, CredentialSummary, NewCredential, RevealedCredential,
};
use super::master::MasterAuth;
use super::table::CredentialStore;

/// Locations of the three vault artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultPaths {
    pub dir: PathBuf,
    pub key: PathBuf,
    pub master: PathBuf,
    pub store: PathBuf,
}

impl VaultPaths {
    /// Artifact paths inside `dir` using the default file names.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_settings(dir, &Settings::default())
    }

    /// Artifact paths inside `dir` using the file names from `settings`.
    pub fn with_settings(dir: impl Into<PathBuf>, settings: &Settings) -> Self {
        let dir = dir.into();
        Self {
            key: dir.join(&settings.key_file),
            master: dir.join(&settings.master_file),
            store: dir.join(&settings.store_file),
            dir,
        }
    }
}

/// What is on disk for a vault directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VaultState {
    /// Neither a master record nor a credential table exists.
    Uninitialized,
    /// Key, master record, and credential table all exist.
    Initialized,
    /// Some artifacts exist and some don't.
    Partial,
}

/// The vault handle. Build one with `Vault::init` or `Vault::open`.
pub struct Vault {
    paths: VaultPaths,
    cipher: Cipher,
    master: MasterAuth,
    credentials: CredentialStore,
    unlocked: bool,
}

impl Vault {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Inspect which artifacts exist without reading any of them.
    pub fn state(paths: &VaultPaths) -> VaultState {
        let key = paths.key.exists();
        let master = paths.master.exists();
        let store = paths.store.exists();

        match (key, master, store) {
            (_, false, false) => VaultState::Uninitialized,
            (true, true, true) => VaultState::Initialized,
            _ => VaultState::Partial,
        }
    }

    /// Create a brand-new vault protected by `master_password`.
    ///
    /// Loads the key if an orphan key file is present (no records can
    /// depend on it yet), otherwise generates one. Then writes an empty
    /// credential table and the encrypted master record.
    ///
    /// If a later step fails, the table and any key generated here are
    /// removed again, so the directory stays `Uninitialized` and `init`
    /// can be retried.
    ///
    /// The returned vault is still locked.
    pub fn init(paths: VaultPaths, master_password: &str) -> Result<Self> {
        let master = MasterAuth::new(&paths.master);
        let credentials = CredentialStore::new(&paths.store);

        if master.exists() || credentials.exists() {
            return Err(FerneyError::VaultAlreadyExists(paths.dir.clone()));
        }

        fsutil::ensure_dir(&paths.dir)?;

        let keystore = KeyStore::new(&paths.key);
        let generated_key = !keystore.exists();
        let cipher = Cipher::new(keystore.load_or_create()?);

        let roll_back_key = || {
            if generated_key {
                fsutil::discard(&paths.key);
            }
        };

        if let Err(e) = credentials.create() {
            roll_back_key();
            return Err(e);
        }
        if let Err(e) = master.initialize(&cipher, master_password) {
            fsutil::discard(&paths.store);
            roll_back_key();
            return Err(e);
        }

        tracing::info!(dir = %paths.dir.display(), "initialized vault");
        Ok(Self {
            paths,
            cipher,
            master,
            credentials,
            unlocked: false,
        })
    }

    /// Open an existing vault.
    ///
    /// Refuses to generate a key when vault data already exists, since
    /// a fresh key could never decrypt it.
    pub fn open(paths: VaultPaths) -> Result<Self> {
        let keystore = KeyStore::new(&paths.key);
        let master = MasterAuth::new(&paths.master);
        let credentials = CredentialStore::new(&paths.store);

        if !master.exists() && !credentials.exists() {
            return Err(FerneyError::VaultNotInitialized(paths.dir.clone()));
        }
        if !keystore.exists() {
            return Err(FerneyError::KeyMissing(paths.key.clone()));
        }

        let cipher = Cipher::new(keystore.load()?);

        tracing::debug!(dir = %paths.dir.display(), "opened vault");
        Ok(Self {
            paths,
            cipher,
            master,
            credentials,
            unlocked: false,
        })
    }

    // ------------------------------------------------------------------
    // Master password gate
    // ------------------------------------------------------------------

    /// Check the master password and unlock the vault on a match.
    ///
    /// A wrong password returns `Ok(false)` and leaves the vault locked.
    pub fn unlock(&mut self, master_password: &str) -> Result<bool> {
        let ok = self.master.verify(&self.cipher, master_password)?;
        self.unlocked = ok;
        if ok {
            tracing::debug!("vault unlocked");
        } else {
            tracing::warn!("master password rejected");
        }
        Ok(ok)
    }

    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }

    fn ensure_unlocked(&self) -> Result<()> {
        if self.unlocked {
            Ok(())
        } else {
            Err(FerneyError::VaultLocked)
        }
    }

    // ------------------------------------------------------------------
    // Credential operations
    // ------------------------------------------------------------------

    /// Encrypt the password of `new` and append it to the table.
    ///
    /// The title is normalized first. A title that is already taken is
    /// rejected with `DuplicateTitle`.
    pub fn add_credential(&self, new: NewCredential) -> Result<CredentialRecord> {
        self.ensure_unlocked()?;

        let title = normalize_title(&new.title);
        if title.is_empty() {
            return Err(FerneyError::CommandFailed(
                "credential title cannot be empty".into(),
            ));
        }
        if self.credentials.find_by_title(&title)?.is_some() {
            return Err(FerneyError::DuplicateTitle(title));
        }

        let encrypted_password = self.cipher.encrypt_to_text(new.password.as_bytes())?;

        let record = CredentialRecord {
            title,
            site: new.site,
            username: new.username,
            encrypted_password,
            notes: new.notes,
        };
        self.credentials.append(&record)?;

        tracing::info!(title = %record.title, "added credential");
        Ok(record)
    }

    /// Look up a credential by title and decrypt its password.
    ///
    /// `Ok(None)` when no credential has that title. A password that
    /// fails to decrypt is an error, never shown as-is.
    pub fn view_credential(&self, title: &str) -> Result<Option<RevealedCredential>> {
        self.ensure_unlocked()?;

        let Some(record) = self.credentials.find_by_title(title)? else {
            tracing::debug!(title, "no credential with this title");
            return Ok(None);
        };

        let plaintext = self.cipher.decrypt_from_text(&record.encrypted_password)?;
        let password = String::from_utf8(plaintext).map_err(|e| {
            let mut bad_bytes = e.into_bytes();
            bad_bytes.zeroize();
            FerneyError::Format("decrypted password is not valid UTF-8".into())
        })?;

        Ok(Some(RevealedCredential {
            title: record.title,
            site: record.site,
            username: record.username,
            password: Zeroizing::new(password),
            notes: record.notes,
        }))
    }

    /// Titles, sites, and usernames of every credential, in insertion order.
    pub fn list_credentials(&self) -> Result<Vec<CredentialSummary>> {
        self.ensure_unlocked()?;
        Ok(self
            .credentials
            .records()?
            .iter()
            .map(CredentialSummary::from)
            .collect())
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn paths(&self) -> &VaultPaths {
        &self.paths
    }

    pub fn dir(&self) -> &Path {
        &self.paths.dir
    }

    /// The cipher bound to this vault's key.
    pub fn cipher(&self) -> &Cipher {
        &self.cipher
    }

    pub fn credential_store(&self) -> &CredentialStore {
        &self.credentials
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn new_credential(title: &str, password: &str) -> NewCredential {
        NewCredential {
            title: title.into(),
            site: "example.com".into(),
            username: "bob".into(),
            password: Zeroizing::new(password.into()),
            notes: String::new(),
        }
    }

    fn unlocked_vault() -> (TempDir, Vault) {
        let dir = TempDir::new().unwrap();
        let mut vault = Vault::init(VaultPaths::new(dir.path().join("v")), "pw").unwrap();
        assert!(vault.unlock("pw").unwrap());
        (dir, vault)
    }

    #[test]
    fn state_tracks_artifacts() {
        let dir = TempDir::new().unwrap();
        let paths = VaultPaths::new(dir.path().join("v"));
        assert_eq!(Vault::state(&paths), VaultState::Uninitialized);

        Vault::init(paths.clone(), "pw").unwrap();
        assert_eq!(Vault::state(&paths), VaultState::Initialized);

        std::fs::remove_file(&paths.store).unwrap();
        assert_eq!(Vault::state(&paths), VaultState::Partial);
    }

    #[test]
    fn locked_vault_refuses_credential_operations() {
        let dir = TempDir::new().unwrap();
        let vault = Vault::init(VaultPaths::new(dir.path()), "pw").unwrap();

        assert!(!vault.is_unlocked());
        assert!(matches!(
            vault.add_credential(new_credential("Email", "x")),
            Err(FerneyError::VaultLocked)
        ));
        assert!(matches!(
            vault.view_credential("Email"),
            Err(FerneyError::VaultLocked)
        ));
        assert!(matches!(
            vault.list_credentials(),
            Err(FerneyError::VaultLocked)
        ));
    }

    #[test]
    fn wrong_password_relocks() {
        let (_dir, mut vault) = unlocked_vault();
        assert!(!vault.unlock("nope").unwrap());
        assert!(!vault.is_unlocked());
    }

    #[test]
    fn duplicate_title_is_rejected_case_insensitively() {
        let (_dir, vault) = unlocked_vault();
        vault.add_credential(new_credential("Email", "a")).unwrap();

        assert!(matches!(
            vault.add_credential(new_credential("EMAIL", "b")),
            Err(FerneyError::DuplicateTitle(t)) if t == "Email"
        ));
    }

    #[test]
    fn blank_title_is_rejected() {
        let (_dir, vault) = unlocked_vault();
        assert!(matches!(
            vault.add_credential(new_credential("   ", "a")),
            Err(FerneyError::CommandFailed(_))
        ));
    }

    #[test]
    fn add_stores_normalized_title_and_ciphertext() {
        let (_dir, vault) = unlocked_vault();
        let record = vault.add_credential(new_credential("bank", "1234")).unwrap();

        assert_eq!(record.title, "Bank");
        assert_ne!(record.encrypted_password, "1234");
    }

    #[test]
    fn tampered_password_field_surfaces_error() {
        let (_dir, vault) = unlocked_vault();
        let record = vault.add_credential(new_credential("Bank", "1234")).unwrap();

        let table = std::fs::read_to_string(&vault.paths().store).unwrap();
        let mut forged = record.encrypted_password.clone();
        forged.replace_range(0..4, if forged.starts_with("AAAA") { "BBBB" } else { "AAAA" });
        std::fs::write(
            &vault.paths().store,
            table.replace(&record.encrypted_password, &forged),
        )
        .unwrap();

        assert!(matches!(
            vault.view_credential("bank"),
            Err(FerneyError::Authentication)
        ));
    }

    #[test]
    fn list_is_in_insertion_order_without_passwords() {
        let (_dir, vault) = unlocked_vault();
        vault.add_credential(new_credential("zoo", "1")).unwrap();
        vault.add_credential(new_credential("apple", "2")).unwrap();

        let titles: Vec<String> = vault
            .list_credentials()
            .unwrap()
            .into_iter()
            .map(|s| s.title)
            .collect();
        assert_eq!(titles, vec!["Zoo", "Apple"]);
    }
}
