//! envelope-core
//!
//! Versioned AEAD container format built on AES-256-GCM.
//!
//! Two entry points share one key and one wire-compatible cipher:
//! - [`AeadCodec`] seals small in-memory messages into a
//!   (nonce, ciphertext, tag) triple, optionally base64-armored by
//!   [`transport`] for text channels.
//! - [`stream`] encrypts/decrypts arbitrarily large byte streams in
//!   bounded chunks to/from a 36-byte-header binary container, with a
//!   blocking and a cooperative (tokio) driver over the same format.

#![forbid(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod types;

// Key material and configuration fallback
pub mod config;

// Cipher layer
pub mod crypto;

// Container wire format
pub mod header;

// Text transport for in-memory triples
pub mod transport;

// Streaming container (blocking + async drivers)
pub mod stream;

pub use config::{ConfigError, EncryptSection};
pub use crypto::{AeadCodec, AeadResult, CryptoError, KeyDigest, KeyMaterial};
pub use header::{ContainerHeader, HeaderError};
pub use stream::{decrypt_file, decrypt_stream, encrypt_file, encrypt_stream};
pub use transport::FormatError;
pub use types::EnvelopeError;
