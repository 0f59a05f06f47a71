//! Key material: passphrase-derived AES-256 key plus associated data.
//!
//! Design notes:
//! - The raw passphrase is never stored; it is run through a one-way
//!   digest fixed at construction time, which also normalizes arbitrary
//!   passphrase lengths to the 32-byte cipher key size.
//! - Associated data is kept as raw bytes, not hashed. It must be
//!   byte-identical on the encrypt and decrypt side of a pair.
//! - One `KeyMaterial` per logical identity; immutable after
//!   construction and safe to share across concurrent operations.

use std::path::Path;

use sha2::{Digest, Sha256, Sha512};
use zeroize::Zeroize;

use crate::config::{self, ConfigError};
use crate::constants::KEY_LEN;

/// Digest strategy mapping a passphrase to the 32-byte cipher key.
/// Fixed at construction, not reassignable afterwards. Both sides of a
/// pair must use the same strategy.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum KeyDigest {
    #[default]
    Sha256,
    /// SHA-512, truncated to the first 32 bytes.
    Sha512,
    Blake3,
}

impl KeyDigest {
    pub(crate) fn digest_key(self, seed: &str) -> [u8; KEY_LEN] {
        let mut key = [0u8; KEY_LEN];
        match self {
            KeyDigest::Sha256 => key.copy_from_slice(&Sha256::digest(seed.as_bytes())),
            KeyDigest::Sha512 => key.copy_from_slice(&Sha512::digest(seed.as_bytes())[..KEY_LEN]),
            KeyDigest::Blake3 => key = *blake3::hash(seed.as_bytes()).as_bytes(),
        }
        key
    }
}

/// Derived symmetric key and associated-data bytes. Key bytes are wiped
/// on drop.
pub struct KeyMaterial {
    key: [u8; KEY_LEN],
    associated_data: Vec<u8>,
}

impl KeyMaterial {
    /// Derive from an explicit passphrase and associated-data string
    /// using the default SHA-256 digest.
    pub fn new(key_seed: &str, associated_data: &str) -> Self {
        Self::with_digest(key_seed, associated_data, KeyDigest::default())
    }

    /// Derive with an explicit digest strategy.
    pub fn with_digest(key_seed: &str, associated_data: &str, digest: KeyDigest) -> Self {
        Self {
            key: digest.digest_key(key_seed),
            associated_data: associated_data.as_bytes().to_vec(),
        }
    }

    /// Resolve each field from the explicit value first, then from the
    /// `[encrypt]` section of `config_path`. The file is only read when
    /// at least one field is missing; with both fields explicit an
    /// absent or broken config file is irrelevant.
    pub fn from_config(
        key_seed: Option<&str>,
        associated_data: Option<&str>,
        config_path: &Path,
        digest: KeyDigest,
    ) -> Result<Self, ConfigError> {
        let section = match (key_seed, associated_data) {
            (Some(_), Some(_)) => Default::default(),
            _ => config::load_encrypt_section(config_path)?,
        };

        let seed = key_seed
            .or(section.key.as_deref())
            .ok_or(ConfigError::MissingField { field: "key" })?;
        let aad = associated_data
            .or(section.associated_data.as_deref())
            .ok_or(ConfigError::MissingField {
                field: "associated_data",
            })?;

        Ok(Self::with_digest(seed, aad, digest))
    }

    pub(crate) fn key(&self) -> &[u8; KEY_LEN] {
        &self.key
    }

    pub fn associated_data(&self) -> &[u8] {
        &self.associated_data
    }
}

impl Drop for KeyMaterial {
    fn drop(&mut self) {
        self.key.zeroize();
    }
}

impl std::fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("key", &"[REDACTED]")
            .field("associated_data", &self.associated_data)
            .finish()
    }
}
