//! Blocking streaming encrypt.
//!
//! Two-pass write protocol:
//! 1. Header goes out first with a 16-byte zero placeholder tag, since
//!    the real tag only exists after the last chunk.
//! 2. Ciphertext chunks stream out in order.
//! 3. The cipher finalizes and the output seeks back to the tag offset
//!    to overwrite the placeholder.
//!
//! A container is only valid once step 3 completes; any failure before
//! that leaves a zero tag, which decrypt treats as corrupt.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::Path;

use rand::rngs::OsRng;
use rand::RngCore;

use crate::constants::{NONCE_LEN, TAG_OFFSET};
use crate::crypto::gcm::GcmEncryptor;
use crate::crypto::KeyMaterial;
use crate::header::{encode_header_le, ContainerHeader};
use crate::types::EnvelopeError;

/// Encrypt `input` into a versioned container on `output`, reading in
/// chunks of `chunk_size` bytes. Returns the plaintext byte count.
pub fn encrypt_stream<R, W>(
    material: &KeyMaterial,
    input: &mut R,
    output: &mut W,
    chunk_size: usize,
) -> Result<u64, EnvelopeError>
where
    R: Read,
    W: Write + Seek,
{
    let mut nonce = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce);
    encrypt_stream_with_nonce(material, input, output, chunk_size, nonce)
}

/// Deterministic entry point: same nonce + same input = byte-identical
/// container. Crate-internal so callers cannot reuse nonces.
pub(crate) fn encrypt_stream_with_nonce<R, W>(
    material: &KeyMaterial,
    input: &mut R,
    output: &mut W,
    chunk_size: usize,
    nonce: [u8; NONCE_LEN],
) -> Result<u64, EnvelopeError>
where
    R: Read,
    W: Write + Seek,
{
    if chunk_size == 0 {
        return Err(EnvelopeError::Validation(
            "chunk size must be non-zero".into(),
        ));
    }

    let header = ContainerHeader::new(nonce);
    output.write_all(&encode_header_le(&header))?;

    let mut engine = GcmEncryptor::new(material.key(), &nonce, material.associated_data());
    let mut buf = vec![0u8; chunk_size];
    let mut total = 0u64;

    loop {
        let n = input.read(&mut buf)?;
        if n == 0 {
            break;
        }
        engine.encrypt_chunk(&mut buf[..n])?;
        output.write_all(&buf[..n])?;
        total += n as u64;
    }

    let tag = engine.finalize();
    output.seek(SeekFrom::Start(TAG_OFFSET))?;
    output.write_all(&tag)?;
    output.flush()?;

    Ok(total)
}

/// File-path convenience wrapper around [`encrypt_stream`].
pub fn encrypt_file<P, Q>(
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
    encrypt_stream(material, &mut input, &mut output, chunk_size)
}
