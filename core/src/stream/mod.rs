//! Streaming container: chunked encrypt/decrypt of large byte streams.
//!
//! Two interchangeable drivers over one on-disk format: the blocking
//! functions here block their thread on each chunk I/O call, the
//! [`aio`] variants suspend at the same chunk boundaries instead.
//! Chunks are produced and consumed strictly in sequence either way;
//! the container bytes do not depend on the driver.
//!
//! Seekability requirements:
//! - encrypt: the *output* must seek backwards to patch the tag.
//! - decrypt: the *input* must seek backwards for the second pass of
//!   verify-then-decrypt.

pub mod decrypt;
pub mod encrypt;

#[cfg(feature = "async")]
pub mod aio;

pub use decrypt::{decrypt_file, decrypt_stream};
pub use encrypt::{encrypt_file, encrypt_stream};
