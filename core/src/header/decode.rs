//! Header deserialization and the version gate.
//!
//! The version check happens here, before any body byte is touched;
//! decrypt never proceeds past an unsupported header.

use byteorder::{ByteOrder, LittleEndian};
use tracing::error;

use crate::constants::{FORMAT_VERSION, NONCE_LEN, TAG_LEN};
use crate::header::types::{ContainerHeader, HeaderError};

/// Deserialize a 36-byte little-endian header, rejecting truncated
/// buffers and unsupported versions.
#[inline]
pub fn decode_header_le(buf: &[u8]) -> Result<ContainerHeader, HeaderError> {
    if buf.len() < ContainerHeader::LEN {
        return Err(HeaderError::Truncated {
            have: buf.len(),
            need: ContainerHeader::LEN,
        });
    }

    let version = LittleEndian::read_u64(&buf[0..8]);
    if version != FORMAT_VERSION {
        error!(
            component = "header",
            expected = FORMAT_VERSION,
            found = version,
            "unsupported container version"
        );
        return Err(HeaderError::UnsupportedVersion {
            expected: FORMAT_VERSION,
            found: version,
        });
    }

    let mut nonce = [0u8; NONCE_LEN];
    nonce.copy_from_slice(&buf[8..8 + NONCE_LEN]);
    let mut tag = [0u8; TAG_LEN];
    tag.copy_from_slice(&buf[8 + NONCE_LEN..ContainerHeader::LEN]);

    Ok(ContainerHeader {
        version,
        nonce,
        tag,
    })
}
