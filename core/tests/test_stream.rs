use std::io::Cursor;

use envelope_core::constants::{DEFAULT_CHUNK_SIZE, HEADER_LEN, NONCE_LEN, TAG_LEN, TAG_OFFSET};
use envelope_core::{
    decrypt_file, decrypt_stream, encrypt_file, encrypt_stream, AeadCodec, CryptoError,
    EnvelopeError, HeaderError, KeyMaterial,
};

fn material() -> KeyMaterial {
    KeyMaterial::new("1234", "associated data")
}

fn patterned(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 253) as u8).collect()
}

fn encrypt_to_vec(material: &KeyMaterial, plaintext: &[u8], chunk_size: usize) -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    let written = encrypt_stream(
        material,
        &mut Cursor::new(plaintext.to_vec()),
        &mut out,
        chunk_size,
    )
    .unwrap();
    assert_eq!(written, plaintext.len() as u64);
    out.into_inner()
}

fn decrypt_to_vec(
    material: &KeyMaterial,
    container: &[u8],
    chunk_size: usize,
) -> Result<Vec<u8>, EnvelopeError> {
    let mut out = Vec::new();
    decrypt_stream(
        material,
        &mut Cursor::new(container.to_vec()),
        &mut out,
        chunk_size,
    )?;
    Ok(out)
}

#[test]
fn roundtrip_boundary_lengths_and_chunk_sizes() {
    let material = material();
    for chunk_size in [1usize, 7, DEFAULT_CHUNK_SIZE] {
        for len in [
            0usize,
            1,
            chunk_size.saturating_sub(1),
            chunk_size,
            chunk_size + 1,
            10 * chunk_size,
        ] {
            let plaintext = patterned(len);
            let container = encrypt_to_vec(&material, &plaintext, chunk_size);
            assert_eq!(container.len(), HEADER_LEN + len);

            let opened = decrypt_to_vec(&material, &container, chunk_size).unwrap();
            assert_eq!(opened, plaintext, "chunk={chunk_size} len={len}");
        }
    }
}

#[test]
fn chunk_size_need_not_match_between_sides() {
    let material = material();
    let plaintext = patterned(3 * DEFAULT_CHUNK_SIZE + 11);
    let container = encrypt_to_vec(&material, &plaintext, 510);
    let opened = decrypt_to_vec(&material, &container, DEFAULT_CHUNK_SIZE).unwrap();
    assert_eq!(opened, plaintext);
}

#[test]
fn tampered_body_fails_and_writes_nothing() {
    let material = material();
    let plaintext = patterned(2 * DEFAULT_CHUNK_SIZE);
    let mut container = encrypt_to_vec(&material, &plaintext, DEFAULT_CHUNK_SIZE);

    // Flip one ciphertext bit deep in the body.
    let victim = HEADER_LEN + DEFAULT_CHUNK_SIZE + 3;
    container[victim] ^= 0x04;

    let mut out = Vec::new();
    let err = decrypt_stream(
        &material,
        &mut Cursor::new(container),
        &mut out,
        DEFAULT_CHUNK_SIZE,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        EnvelopeError::Crypto(CryptoError::TagMismatch)
    ));
    // Verify-then-decrypt: the sink must be completely untouched.
    assert!(out.is_empty());
}

#[test]
fn tampered_tag_fails_and_writes_nothing() {
    let material = material();
    let mut container = encrypt_to_vec(&material, &patterned(100), 32);
    container[TAG_OFFSET as usize] ^= 0xFF;

    let mut out = Vec::new();
    let err = decrypt_stream(&material, &mut Cursor::new(container), &mut out, 32).unwrap_err();
    assert!(matches!(
        err,
        EnvelopeError::Crypto(CryptoError::TagMismatch)
    ));
    assert!(out.is_empty());
}

#[test]
fn zero_tag_container_is_corrupt() {
    // Simulate a crash between body write and tag patch: the header
    // still carries the 16-byte placeholder.
    let material = material();
    let mut container = encrypt_to_vec(&material, &patterned(513), 64);
    container[TAG_OFFSET as usize..HEADER_LEN].copy_from_slice(&[0u8; TAG_LEN]);

    assert!(matches!(
        decrypt_to_vec(&material, &container, 64),
        Err(EnvelopeError::Crypto(CryptoError::TagMismatch))
    ));
}

#[test]
fn foreign_version_is_rejected_before_body() {
    let material = material();
    let mut container = encrypt_to_vec(&material, &patterned(256), 64);
    container[0] = 2; // version u64 LE -> 2

    match decrypt_to_vec(&material, &container, 64) {
        Err(EnvelopeError::Header(HeaderError::UnsupportedVersion { expected, found })) => {
            assert_eq!(expected, 1);
            assert_eq!(found, 2);
        }
        other => panic!("expected version rejection, got {other:?}"),
    }
}

#[test]
fn truncated_container_is_rejected() {
    let material = material();
    let container = encrypt_to_vec(&material, &[], 64);
    assert!(matches!(
        decrypt_to_vec(&material, &container[..HEADER_LEN - 5], 64),
        Err(EnvelopeError::Header(HeaderError::Truncated { have: 31, .. }))
    ));
}

#[test]
fn wrong_passphrase_fails_authentication() {
    let container = encrypt_to_vec(&material(), &patterned(1000), 128);
    let other = KeyMaterial::new("12345", "associated data");
    assert!(matches!(
        decrypt_to_vec(&other, &container, 128),
        Err(EnvelopeError::Crypto(CryptoError::TagMismatch))
    ));
}

#[test]
fn container_triple_opens_through_aead_codec() {
    // The container body is one GCM message: its (nonce, body, tag)
    // triple must open through the single-shot codec unchanged.
    let plaintext = patterned(4097);
    let container = encrypt_to_vec(&material(), &plaintext, 100);

    let mut nonce = [0u8; NONCE_LEN];
    nonce.copy_from_slice(&container[8..8 + NONCE_LEN]);
    let mut tag = [0u8; TAG_LEN];
    tag.copy_from_slice(&container[TAG_OFFSET as usize..HEADER_LEN]);
    let body = &container[HEADER_LEN..];

    let codec = AeadCodec::new(material());
    let opened = codec.decrypt(&nonce, body, &tag).unwrap();
    assert_eq!(opened, plaintext);
}

#[test]
fn aead_codec_triple_opens_as_container() {
    // And the reverse: wrap a codec triple in a hand-built header and
    // stream-decrypt it.
    let codec = AeadCodec::new(material());
    let plaintext = patterned(777);
    let sealed = codec.encrypt(&plaintext).unwrap();

    let mut container = Vec::with_capacity(HEADER_LEN + sealed.ciphertext.len());
    container.extend_from_slice(&1u64.to_le_bytes());
    container.extend_from_slice(&sealed.nonce);
    container.extend_from_slice(&sealed.tag);
    container.extend_from_slice(&sealed.ciphertext);

    let opened = decrypt_to_vec(&material(), &container, 50).unwrap();
    assert_eq!(opened, plaintext);
}

#[test]
fn two_encryptions_differ_in_nonce_and_body() {
    let material = material();
    let plaintext = patterned(300);
    let a = encrypt_to_vec(&material, &plaintext, 64);
    let b = encrypt_to_vec(&material, &plaintext, 64);
    assert_ne!(a[8..8 + NONCE_LEN], b[8..8 + NONCE_LEN]);
    assert_ne!(a[HEADER_LEN..], b[HEADER_LEN..]);
}

#[test]
fn concurrent_operations_share_key_material() {
    let material = material();
    std::thread::scope(|scope| {
        for worker in 0..4usize {
            let material = &material;
            scope.spawn(move || {
                let plaintext = patterned(worker * 1000 + 37);
                let container = encrypt_to_vec(material, &plaintext, 256);
                let opened = decrypt_to_vec(material, &container, 256).unwrap();
                assert_eq!(opened, plaintext);
            });
        }
    });
}

#[test]
fn zero_chunk_size_is_rejected() {
    let material = material();
    let mut out = Cursor::new(Vec::new());
    assert!(matches!(
        encrypt_stream(&material, &mut Cursor::new(vec![1u8]), &mut out, 0),
        Err(EnvelopeError::Validation(_))
    ));
}

#[test]
fn file_roundtrip_with_default_chunk_size() {
    let dir = tempfile::tempdir().unwrap();
    let origin = dir.path().join("origin.bin");
    let sealed = dir.path().join("origin.bin.enc");
    let opened = dir.path().join("decrypted.bin");

    let plaintext = patterned(10 * DEFAULT_CHUNK_SIZE + 123);
    std::fs::write(&origin, &plaintext).unwrap();

    let material = material();
    encrypt_file(&material, &origin, &sealed, DEFAULT_CHUNK_SIZE).unwrap();
    decrypt_file(&material, &sealed, &opened, DEFAULT_CHUNK_SIZE).unwrap();

    assert_eq!(std::fs::read(&opened).unwrap(), plaintext);
    assert_eq!(
        std::fs::metadata(&sealed).unwrap().len(),
        (HEADER_LEN + plaintext.len()) as u64
    );
}
