//! Vault module — master password gate and credential storage.
//!
//! This module provides:
//! - `CredentialRecord` and title normalization (`credential`)
//! - The CSV-backed `CredentialStore` (`table`)
//! - `MasterAuth` for the encrypted master password record (`master`)
//! - The `Vault` context tying key, cipher, and stores together (`store`)

pub mod credential;
pub mod master;
pub mod store;
pub mod table;

// Re-export the most commonly used items.
pub use credential::{
    normalize_title, CredentialRecord, CredentialSummary, NewCredential, RevealedCredential,
    FIELD_NAMES,
};
pub use master::{MasterAuth, MasterPasswordRecord};
pub use store::{Vault, VaultPaths, VaultState};
pub use table::CredentialStore;
