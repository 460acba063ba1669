//! Cryptographic primitives for Ferney.
//!
//! This module provides:
//! - The 32-byte vault key and its generation (`keys`)
//! - On-disk key lifecycle: load, create, restrict (`keystore`)
//! - AES-256-GCM authenticated encryption behind a `Cipher` (`encryption`)

pub mod encryption;
pub mod keys;
pub mod keystore;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{Cipher, KeyStore, VaultKey};
pub use encryption::{decrypt, encrypt, Cipher};
pub use keys::{VaultKey, KEY_LEN};
pub use keystore::KeyStore;
