//! Blocking streaming decrypt, hardened verify-then-decrypt.
//!
//! Two passes over the body:
//! 1. Stream the ciphertext through the tag accumulator only and check
//!    the computed tag against the header tag. No plaintext exists yet.
//! 2. Only on success, seek back to the body start and stream
//!    keystream-decrypted plaintext to the output in order.
//!
//! The single-pass alternative would write plaintext before the tag
//! verifies and could not retract it on failure; here an authentication
//! failure leaves the output sink untouched, at the cost of requiring a
//! seekable input. Memory stays bounded by the chunk size either way.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::Path;

use tracing::warn;

use crate::constants::BODY_OFFSET;
use crate::crypto::gcm::{GcmKeystream, GcmTagVerifier};
use crate::crypto::KeyMaterial;
use crate::header::{decode_header_le, ContainerHeader, HeaderError};
use crate::types::EnvelopeError;

/// Decrypt a container from `input` (positioned at offset 0) onto
/// `output`. Returns the plaintext byte count. Nothing is written
/// unless the whole body authenticates.
pub fn decrypt_stream<R, W>(
    material: &KeyMaterial,
    input: &mut R,
    output: &mut W,
    chunk_size: usize,
) -> Result<u64, EnvelopeError>
where
    R: Read + Seek,
    W: Write,
{
    if chunk_size == 0 {
        return Err(EnvelopeError::Validation(
            "chunk size must be non-zero".into(),
        ));
    }

    let header = read_header(input)?;

    // Pass 1: authenticate the full body before producing any plaintext.
    let mut verifier = GcmTagVerifier::new(
        material.key(),
        &header.nonce,
        material.associated_data(),
        header.tag,
    );
    let mut buf = vec![0u8; chunk_size];
    let mut total = 0u64;
    loop {
        let n = input.read(&mut buf)?;
        if n == 0 {
            break;
        }
        verifier.absorb_chunk(&buf[..n])?;
        total += n as u64;
    }
    verifier.finalize().map_err(|e| {
        warn!(
            component = "container",
            "authentication failed, no plaintext written"
        );
        e
    })?;

    // Pass 2: tag verified, decrypt for real.
    input.seek(SeekFrom::Start(BODY_OFFSET))?;
    let mut keystream = GcmKeystream::new(material.key(), &header.nonce);
    loop {
        let n = input.read(&mut buf)?;
        if n == 0 {
            break;
        }
        keystream.apply(&mut buf[..n]);
        output.write_all(&buf[..n])?;
    }
    output.flush()?;

    Ok(total)
}

/// File-path convenience wrapper around [`decrypt_stream`].
pub fn decrypt_file<P, Q>(
    material: &KeyMaterial,
    input_path: P,
    output_path: Q,
    chunk_size: usize,
) -> Result<u64, EnvelopeError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let mut input = BufReader::new(File::open(input_path)?);
    let mut output = BufWriter::new(File::create(output_path)?);
    decrypt_stream(material, &mut input, &mut output, chunk_size)
}

/// Read the fixed-size header, reporting how many bytes were actually
/// present when the input is too short.
fn read_header<R: Read>(input: &mut R) -> Result<ContainerHeader, EnvelopeError> {
    let mut buf = [0u8; ContainerHeader::LEN];
    let mut have = 0usize;
    while have < buf.len() {
        let n = input.read(&mut buf[have..])?;
        if n == 0 {
            break;
        }
        have += n;
    }
    if have < buf.len() {
        return Err(HeaderError::Truncated {
            have,
            need: ContainerHeader::LEN,
        }
        .into());
    }
    Ok(decode_header_le(&buf)?)
}
