pub mod aead;
pub mod material;
pub mod types;

pub(crate) mod gcm;

pub use aead::{AeadCodec, AeadResult};
pub use material::{KeyDigest, KeyMaterial};
pub use types::CryptoError;
