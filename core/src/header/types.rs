//! Container header struct.
//!
//! Fixed 36-byte prefix of every streaming container, little-endian:
//!
//! | offset | size | field   |
//! |--------|------|---------|
//! | 0      | 8    | version |
//! | 8      | 12   | nonce   |
//! | 20     | 16   | tag     |
//!
//! The tag field is written twice: first as 16 zero bytes while the
//! body streams out, then patched in place once the cipher finalizes.
//! A container whose tag is still the placeholder is an incomplete
//! artifact and will fail authentication like any other corruption.

use thiserror::Error;

use crate::constants::{FORMAT_VERSION, HEADER_LEN, NONCE_LEN, TAG_LEN};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerHeader {
    pub version: u64,
    pub nonce: [u8; NONCE_LEN],
    pub tag: [u8; TAG_LEN],
}

impl ContainerHeader {
    pub const LEN: usize = HEADER_LEN;

    /// Fresh header for an encrypt pass: current version, caller's
    /// nonce, zero placeholder tag.
    pub fn new(nonce: [u8; NONCE_LEN]) -> Self {
        Self {
            version: FORMAT_VERSION,
            nonce,
            tag: [0u8; TAG_LEN],
        }
    }
}

#[derive(Debug, Error)]
pub enum HeaderError {
    /// Container declares a version this build does not speak. Formats
    /// are never silently coerced in either direction.
    #[error("unsupported container version: expected {expected}, found {found}")]
    UnsupportedVersion { expected: u64, found: u64 },

    /// Input ended before a full 36-byte header could be read.
    #[error("container header truncated: have {have} bytes, need {need}")]
    Truncated { have: usize, need: usize },
}
