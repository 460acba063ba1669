//! Credential types stored in and read back from the vault.
//!
//! Only the password is ever encrypted. Title, site, username, and notes
//! are kept in clear so lookups never touch the cipher.

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

/// Column names of the credential table, in on-disk order.
pub const FIELD_NAMES: [&str; 5] = ["Title", "Website/App", "Username", "Password", "Notes"];

/// One row of the credential table.
///
/// `encrypted_password` is base64 ciphertext produced by the vault's
/// `Cipher`; the store never sees the plaintext.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    #[serde(rename = "Title")]
    pub title: String,

    #[serde(rename = "Website/App")]
    pub site: String,

    #[serde(rename = "Username")]
    pub username: String,

    #[serde(rename = "Password")]
    pub encrypted_password: String,

    #[serde(rename = "Notes")]
    pub notes: String,
}

impl CredentialRecord {
    /// Returns `true` if this record's title normalizes to `normalized`.
    pub fn has_title(&self, normalized: &str) -> bool {
        normalize_title(&self.title) == normalized
    }
}

/// A credential as typed by the user, before encryption.
pub struct NewCredential {
    pub title: String,
    pub site: String,
    pub username: String,
    pub password: Zeroizing<String>,
    pub notes: String,
}

/// A credential with its password decrypted for display.
pub struct RevealedCredential {
    pub title: String,
    pub site: String,
    pub username: String,
    pub password: Zeroizing<String>,
    pub notes: String,
}

/// Non-secret view of a credential, used for listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CredentialSummary {
    pub title: String,
    pub site: String,
    pub username: String,
}

impl From<&CredentialRecord> for CredentialSummary {
    fn from(record: &CredentialRecord) -> Self {
        Self {
            title: record.title.clone(),
            site: record.site.clone(),
            username: record.username.clone(),
        }
    }
}

/// Canonical form of a credential title.
///
/// Surrounding whitespace is dropped, the first character is uppercased
/// and the rest lowercased, so "email", "EMAIL" and " Email " all become
/// "Email".
///
/// The first character goes through `char::to_uppercase`, not Unicode
/// titlecase, so "ßx" becomes "SSx" rather than "Ssx". Stored titles and
/// queries are normalized the same way, so lookups are unaffected.
pub fn normalize_title(title: &str) -> String {
    let mut chars = title.trim().chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
