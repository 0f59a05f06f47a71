use std::io;

use thiserror::Error;

use crate::config::ConfigError;
use crate::crypto::CryptoError;
use crate::header::HeaderError;
use crate::transport::FormatError;

/// Unified error covering I/O, header, crypto, transport and config failures.
/// - `From<T>` impls enable `?` across the whole pipeline.
/// - Every variant is fatal for the current operation; nothing here is
///   retried internally (a retry needs fresh input and a fresh nonce).
#[derive(Debug, Error)]
pub enum EnvelopeError {
    /// I/O error from an underlying stream, propagated unchanged.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Key/associated-data material unavailable at construction.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Container header rejected (unsupported version, truncation).
    #[error("header error: {0}")]
    Header(#[from] HeaderError),

    /// Cryptographic failure (tag mismatch, length limit).
    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),

    /// Malformed text transport encoding.
    #[error("transport format error: {0}")]
    Format(#[from] FormatError),

    /// Generic high-level validation with a descriptive message.
    #[error("validation error: {0}")]
    Validation(String),
}
