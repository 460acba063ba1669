//! AES-256-GCM authenticated encryption.
//!
//! Each call to `encrypt` generates a fresh random 12-byte nonce and
//! prepends it to the ciphertext.  `decrypt` splits the nonce back out
//! before decrypting.
//!
//! Layout of the returned byte buffer:
//!   [ 12-byte nonce | ciphertext + 16-byte auth tag ]
//!
//! No version byte or key identifier is embedded: a blob only opens
//! under the exact key that produced it.

use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{AeadCore, Aes256Gcm, Nonce};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::errors::{FerneyError, Result};

use super::keys::VaultKey;

/// Size of the AES-256-GCM nonce in bytes.
const NONCE_LEN: usize = 12;

/// Size of the GCM authentication tag in bytes.
const TAG_LEN: usize = 16;

/// Encrypt `plaintext` with a 32-byte `key`.
///
/// Returns the nonce prepended to the ciphertext (nonce || ciphertext).
pub fn encrypt(key: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
    let cipher = Aes256Gcm::new_from_slice(key)
        .map_err(|e| FerneyError::EncryptionFailed(format!("invalid key length: {e}")))?;

    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

    let ciphertext = cipher
        .encrypt(&nonce, plaintext)
        .map_err(|e| FerneyError::EncryptionFailed(format!("encryption error: {e}")))?;

    let mut output = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    output.extend_from_slice(&nonce);
    output.extend_from_slice(&ciphertext);
    Ok(output)
}

/// Decrypt data that was produced by `encrypt`.
///
/// A buffer too short to hold a nonce and a tag is a `Format` error;
/// anything that fails tag verification is an `Authentication` error.
pub fn decrypt(key: &[u8], ciphertext_with_nonce: &[u8]) -> Result<Vec<u8>> {
    if ciphertext_with_nonce.len() < NONCE_LEN + TAG_LEN {
        return Err(FerneyError::Format(format!(
            "expected at least {} bytes, got {}",
            NONCE_LEN + TAG_LEN,
            ciphertext_with_nonce.len()
        )));
    }

    let (nonce_bytes, ciphertext) = ciphertext_with_nonce.split_at(NONCE_LEN);
    let nonce = Nonce::from_slice(nonce_bytes);

    let cipher = Aes256Gcm::new_from_slice(key)
        .map_err(|e| FerneyError::EncryptionFailed(format!("invalid key length: {e}")))?;

    cipher
        .decrypt(nonce, ciphertext)
        .map_err(|_| FerneyError::Authentication)
}

/// Authenticated encryption bound to one vault key.
///
/// Built once per run from the key the `KeyStore` hands back, then
/// passed by reference to everything that seals or opens secrets.
pub struct Cipher {
    key: VaultKey,
}

impl Cipher {
    pub fn new(key: VaultKey) -> Self {
        Self { key }
    }

    /// Encrypt bytes; every call uses a fresh nonce.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        encrypt(self.key.as_bytes(), plaintext)
    }

    pub fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>> {
        decrypt(self.key.as_bytes(), ciphertext)
    }

    /// Encrypt and base64-encode, for fields stored in a text table.
    pub fn encrypt_to_text(&self, plaintext: &[u8]) -> Result<String> {
        Ok(BASE64.encode(self.encrypt(plaintext)?))
    }

    /// Inverse of `encrypt_to_text`. Undecodable text is a `Format` error.
    pub fn decrypt_from_text(&self, encoded: &str) -> Result<Vec<u8>> {
        let raw = BASE64
            .decode(encoded.trim())
            .map_err(|e| FerneyError::Format(format!("invalid base64: {e}")))?;
        self.decrypt(&raw)
    }
}

impl std::fmt::Debug for Cipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cipher").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cipher() -> Cipher {
        Cipher::new(VaultKey::new([0x5Au8; 32]))
    }

    #[test]
    fn text_roundtrip() {
        let c = cipher();
        let encoded = c.encrypt_to_text(b"p@ss").unwrap();
        assert!(encoded.is_ascii());
        assert_eq!(c.decrypt_from_text(&encoded).unwrap(), b"p@ss");
    }

    #[test]
    fn text_decode_failure_is_format_error() {
        let result = cipher().decrypt_from_text("not*base64!");
        assert!(matches!(result, Err(FerneyError::Format(_))));
    }

    #[test]
    fn empty_plaintext_roundtrips() {
        let c = cipher();
        let ct = c.encrypt(b"").unwrap();
        assert_eq!(ct.len(), NONCE_LEN + TAG_LEN);
        assert!(c.decrypt(&ct).unwrap().is_empty());
    }

    #[test]
    fn short_buffer_is_format_error_not_authentication() {
        let result = cipher().decrypt(&[0u8; NONCE_LEN + TAG_LEN - 1]);
        assert!(matches!(result, Err(FerneyError::Format(_))));
    }

    #[test]
    fn zeroed_blob_of_valid_length_fails_authentication() {
        let result = cipher().decrypt(&[0u8; NONCE_LEN + TAG_LEN + 4]);
        assert!(matches!(result, Err(FerneyError::Authentication)));
    }
}
