//! Cooperative (tokio) streaming variant.
//!
//! Same container format, same cipher engine, same chunk ordering as
//! the blocking driver; only the I/O calls differ. Suspension happens
//! exclusively at chunk-boundary reads/writes and the tag-patch seek —
//! never mid-chunk or mid-cipher-update, so a task switch can never
//! reorder or interleave container bytes.

use std::io::SeekFrom;
use std::path::Path;

use rand::rngs::OsRng;
use rand::RngCore;
use tokio::fs::File;
use tokio::io::{
    AsyncRead, AsyncReadExt, AsyncSeek, AsyncSeekExt, AsyncWrite, AsyncWriteExt, BufReader,
    BufWriter,
};
use tracing::warn;

use crate::constants::{BODY_OFFSET, NONCE_LEN, TAG_OFFSET};
use crate::crypto::gcm::{GcmEncryptor, GcmKeystream, GcmTagVerifier};
use crate::crypto::KeyMaterial;
use crate::header::{decode_header_le, encode_header_le, ContainerHeader, HeaderError};
use crate::types::EnvelopeError;

/// Cooperative counterpart of [`crate::stream::encrypt_stream`].
pub async fn encrypt_stream<R, W>(
    material: &KeyMaterial,
    input: &mut R,
    output: &mut W,
    chunk_size: usize,
) -> Result<u64, EnvelopeError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + AsyncSeek + Unpin,
{
    let mut nonce = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce);
    encrypt_stream_with_nonce(material, input, output, chunk_size, nonce).await
}

pub(crate) async fn encrypt_stream_with_nonce<R, W>(
    material: &KeyMaterial,
    input: &mut R,
    output: &mut W,
    chunk_size: usize,
    nonce: [u8; NONCE_LEN],
) -> Result<u64, EnvelopeError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + AsyncSeek + Unpin,
{
    if chunk_size == 0 {
        return Err(EnvelopeError::Validation(
            "chunk size must be non-zero".into(),
        ));
    }

    let header = ContainerHeader::new(nonce);
    output.write_all(&encode_header_le(&header)).await?;

    let mut engine = GcmEncryptor::new(material.key(), &nonce, material.associated_data());
    let mut buf = vec![0u8; chunk_size];
    let mut total = 0u64;

    loop {
        let n = input.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        engine.encrypt_chunk(&mut buf[..n])?;
        output.write_all(&buf[..n]).await?;
        total += n as u64;
    }

    let tag = engine.finalize();
    // Settle pending writes before repositioning for the tag patch.
    output.flush().await?;
    output.seek(SeekFrom::Start(TAG_OFFSET)).await?;
    output.write_all(&tag).await?;
    output.flush().await?;

    Ok(total)
}

/// Cooperative counterpart of [`crate::stream::decrypt_stream`]:
/// verify-then-decrypt, nothing written unless the body authenticates.
pub async fn decrypt_stream<R, W>(
    material: &KeyMaterial,
    input: &mut R,
    output: &mut W,
    chunk_size: usize,
) -> Result<u64, EnvelopeError>
where
    R: AsyncRead + AsyncSeek + Unpin,
    W: AsyncWrite + Unpin,
{
    if chunk_size == 0 {
        return Err(EnvelopeError::Validation(
            "chunk size must be non-zero".into(),
        ));
    }

    let header = read_header(input).await?;

    let mut verifier = GcmTagVerifier::new(
        material.key(),
        &header.nonce,
        material.associated_data(),
        header.tag,
    );
    let mut buf = vec![0u8; chunk_size];
    let mut total = 0u64;
    loop {
        let n = input.read(&mut buf).await?;
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

    input.seek(SeekFrom::Start(BODY_OFFSET)).await?;
    let mut keystream = GcmKeystream::new(material.key(), &header.nonce);
    loop {
        let n = input.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        keystream.apply(&mut buf[..n]);
        output.write_all(&buf[..n]).await?;
    }
    output.flush().await?;

    Ok(total)
}

/// File-path convenience wrapper around [`encrypt_stream`].
pub async fn encrypt_file<P, Q>(
    material: &KeyMaterial,
    input_path: P,
    output_path: Q,
    chunk_size: usize,
) -> Result<u64, EnvelopeError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let mut input = BufReader::new(File::open(input_path).await?);
    let mut output = BufWriter::new(File::create(output_path).await?);
    encrypt_stream(material, &mut input, &mut output, chunk_size).await
}

/// File-path convenience wrapper around [`decrypt_stream`].
pub async fn decrypt_file<P, Q>(
    material: &KeyMaterial,
    input_path: P,
    output_path: Q,
    chunk_size: usize,
) -> Result<u64, EnvelopeError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let mut input = BufReader::new(File::open(input_path).await?);
    let mut output = BufWriter::new(File::create(output_path).await?);
    decrypt_stream(material, &mut input, &mut output, chunk_size).await
}

async fn read_header<R: AsyncRead + Unpin>(input: &mut R) -> Result<ContainerHeader, EnvelopeError> {
    let mut buf = [0u8; ContainerHeader::LEN];
    let mut have = 0usize;
    while have < buf.len() {
        let n = input.read(&mut buf[have..]).await?;
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
