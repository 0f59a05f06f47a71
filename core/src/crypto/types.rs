use thiserror::Error;

use crate::constants::MAX_PLAINTEXT_LEN;

#[derive(Debug, Error)]
pub enum CryptoError {
    /// AEAD tag mismatch: ciphertext, nonce, tag, key or associated data
    /// differ from what encryption produced. No plaintext is released.
    #[error("AEAD tag mismatch")]
    TagMismatch,

    /// Plaintext exceeds the GCM single-message bound.
    #[error("plaintext exceeds the AES-GCM limit of {MAX_PLAINTEXT_LEN} bytes")]
    MessageTooLong,
}
