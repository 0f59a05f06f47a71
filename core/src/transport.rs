//! Text transport encoding for AEAD triples.
//!
//! Each of nonce, ciphertext and tag is base64-encoded independently
//! and the three parts are joined with `\\n` — a delimiter the base64
//! alphabet cannot produce, so splitting is unambiguous. The transform
//! is pure and invertible: `decode(encode(x)) == x`.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use thiserror::Error;

use crate::constants::{NONCE_LEN, TAG_LEN};
use crate::crypto::AeadResult;

/// Literal two-backslash-plus-`n` delimiter between the three parts.
pub const TRIPLE_DELIMITER: &str = "\\\\n";

#[derive(Debug, Error)]
pub enum FormatError {
    /// Wrong number of delimited parts (must be exactly 3).
    #[error("expected 3 delimited parts, found {found}")]
    PartCount { found: usize },

    /// A part is not valid base64.
    #[error("invalid base64 in {field}: {source}")]
    Base64 {
        field: &'static str,
        source: base64::DecodeError,
    },

    /// A fixed-size field decoded to the wrong length.
    #[error("{field} must be {expected} bytes, got {actual}")]
    FieldLength {
        field: &'static str,
        expected: usize,
        actual: usize,
    },
}

/// Encode a triple as `b64(nonce) \\n b64(ciphertext) \\n b64(tag)`.
pub fn encode(result: &AeadResult) -> String {
    [
        STANDARD.encode(result.nonce),
        STANDARD.encode(&result.ciphertext),
        STANDARD.encode(result.tag),
    ]
    .join(TRIPLE_DELIMITER)
}

/// Invert [`encode`]. Fails on wrong part count, invalid base64, or
/// wrong nonce/tag lengths; never partially succeeds.
pub fn decode(text: &str) -> Result<AeadResult, FormatError> {
    let parts: Vec<&str> = text.split(TRIPLE_DELIMITER).collect();
    if parts.len() != 3 {
        return Err(FormatError::PartCount { found: parts.len() });
    }

    let nonce_bytes = decode_part(parts[0], "nonce")?;
    let ciphertext = decode_part(parts[1], "ciphertext")?;
    let tag_bytes = decode_part(parts[2], "tag")?;

    Ok(AeadResult {
        nonce: fixed::<NONCE_LEN>(nonce_bytes, "nonce")?,
        ciphertext,
        tag: fixed::<TAG_LEN>(tag_bytes, "tag")?,
    })
}

fn decode_part(part: &str, field: &'static str) -> Result<Vec<u8>, FormatError> {
    STANDARD
        .decode(part)
        .map_err(|source| FormatError::Base64 { field, source })
}

fn fixed<const N: usize>(bytes: Vec<u8>, field: &'static str) -> Result<[u8; N], FormatError> {
    <[u8; N]>::try_from(bytes.as_slice()).map_err(|_| FormatError::FieldLength {
        field,
        expected: N,
        actual: bytes.len(),
    })
}
