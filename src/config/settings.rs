use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{FerneyError, Result};

/// Project-level configuration, loaded from `.ferney.toml`.
///
/// Every field has a sensible default so Ferney works out-of-the-box
/// without any config file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Directory (relative to project root) holding the vault artifacts.
    #[serde(default = "default_vault_dir")]
    pub vault_dir: String,

    /// File name of the raw key artifact.
    #[serde(default = "default_key_file")]
    pub key_file: String,

    /// File name of the encrypted master password record.
    #[serde(default = "default_master_file")]
    pub master_file: String,

    /// File name of the credential table.
    #[serde(default = "default_store_file")]
    pub store_file: String,

    /// Shortest master password `init` accepts.
    #[serde(default = "default_min_password_length")]
    pub min_password_length: usize,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_vault_dir() -> String {
    ".ferney".to_string()
}

fn default_key_file() -> String {
    "ferney_key.key".to_string()
}

fn default_master_file() -> String {
    "bin.txt".to_string()
}

fn default_store_file() -> String {
    "password manager.csv".to_string()
}

fn default_min_password_length() -> usize {
    1
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            vault_dir: default_vault_dir(),
            key_file: default_key_file(),
            master_file: default_master_file(),
            store_file: default_store_file(),
            min_password_length: default_min_password_length(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the project root.
    const FILE_NAME: &'static str = ".ferney.toml";

    /// Load settings from `<project_dir>/.ferney.toml`.
    ///
    /// If the file does not exist, sensible defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(project_dir: &Path) -> Result<Self> {
        let config_path = project_dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)
            .map_err(|e| FerneyError::from_io(&config_path, e))?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            FerneyError::Config(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        settings.validate()?;
        Ok(settings)
    }

    /// Full path of the vault directory under `project_dir`.
    pub fn vault_dir_path(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.vault_dir)
    }

    fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("key_file", &self.key_file),
            ("master_file", &self.master_file),
            ("store_file", &self.store_file),
        ] {
            if value.is_empty() || value.contains(['/', '\\']) {
                return Err(FerneyError::Config(format!(
                    "{field} must be a plain file name, got '{value}'"
                )));
            }
        }
        if self.key_file == self.master_file
            || self.key_file == self.store_file
            || self.master_file == self.store_file
        {
            return Err(FerneyError::Config(
                "key_file, master_file and store_file must all differ".into(),
            ));
        }
        Ok(())
    }
}

// ── Tests ────────────────────────────────────────────────────────────
