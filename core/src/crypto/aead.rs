//! Single-shot AEAD codec for in-memory messages.
//!
//! Design notes:
//! - AES-256-GCM with a 32-byte key and a fresh random 12-byte nonce
//!   per encryption. Nonce reuse under one key is catastrophic; the
//!   nonce therefore never comes from the caller.
//! - Associated data is authenticated, not encrypted, and must be
//!   passed back in on decryption.
//! - Decrypt is all-or-nothing: tag verification gates release of the
//!   plaintext, no partial output on failure.

use aes_gcm::aead::{Aead, KeyInit, Payload};
use aes_gcm::{Aes256Gcm, Nonce};
use rand::rngs::OsRng;
use rand::RngCore;
use tracing::warn;

use crate::constants::{NONCE_LEN, TAG_LEN};
use crate::crypto::material::KeyMaterial;
use crate::crypto::types::CryptoError;

/// One encrypt call's output, consumed by exactly one decrypt call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AeadResult {
    pub nonce: [u8; NONCE_LEN],
    pub ciphertext: Vec<u8>,
    pub tag: [u8; TAG_LEN],
}

/// In-memory AEAD codec owning its key material.
pub struct AeadCodec {
    material: KeyMaterial,
}

impl AeadCodec {
    pub fn new(material: KeyMaterial) -> Self {
        Self { material }
    }

    pub fn material(&self) -> &KeyMaterial {
        &self.material
    }

    /// Seal `plaintext` under a fresh random nonce.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<AeadResult, CryptoError> {
        let cipher = Aes256Gcm::new(self.material.key().into());

        let mut nonce = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce);

        let mut ciphertext = cipher
            .encrypt(
                Nonce::from_slice(&nonce),
                Payload {
                    msg: plaintext,
                    aad: self.material.associated_data(),
                },
            )
            .map_err(|_| CryptoError::MessageTooLong)?;

        // aes-gcm appends the tag to the ciphertext; split it back out.
        let tag_bytes = ciphertext.split_off(ciphertext.len() - TAG_LEN);
        let mut tag = [0u8; TAG_LEN];
        tag.copy_from_slice(&tag_bytes);

        Ok(AeadResult {
            nonce,
            ciphertext,
            tag,
        })
    }

    /// Open a (nonce, ciphertext, tag) triple. Returns the plaintext
    /// only if the tag verifies over ciphertext and associated data.
    pub fn decrypt(
        &self,
        nonce: &[u8; NONCE_LEN],
        ciphertext: &[u8],
        tag: &[u8; TAG_LEN],
    ) -> Result<Vec<u8>, CryptoError> {
        let cipher = Aes256Gcm::new(self.material.key().into());

        let mut wire = Vec::with_capacity(ciphertext.len() + TAG_LEN);
        wire.extend_from_slice(ciphertext);
        wire.extend_from_slice(tag);

        cipher
            .decrypt(
                Nonce::from_slice(nonce),
                Payload {
                    msg: &wire,
                    aad: self.material.associated_data(),
                },
            )
            .map_err(|_| {
                warn!(component = "aead", "AEAD tag mismatch, plaintext withheld");
                CryptoError::TagMismatch
            })
    }
}
