//! Header serialization.
//!
//! Field order and offsets must match `types.rs` exactly; the encrypt
//! pass later patches the tag bytes at their fixed offset, so any
//! layout drift corrupts every container.

use byteorder::{ByteOrder, LittleEndian};

use crate::constants::NONCE_LEN;
use crate::header::types::ContainerHeader;

/// Serialize a header into its fixed 36-byte little-endian form.
#[inline]
pub fn encode_header_le(h: &ContainerHeader) -> [u8; ContainerHeader::LEN] {
    let mut out = [0u8; ContainerHeader::LEN];
    LittleEndian::write_u64(&mut out[0..8], h.version); // 0..8   version
    out[8..8 + NONCE_LEN].copy_from_slice(&h.nonce); // 8..20  nonce
    out[8 + NONCE_LEN..].copy_from_slice(&h.tag); // 20..36 tag
    out
}
