//! Incremental AES-256-GCM engine for the streaming container.
//!
//! Design notes:
//! - The container carries a single GCM instance spanning every chunk,
//!   so the one-shot `aes-gcm` API cannot drive it. The engine is
//!   assembled from the same component crates that `aes-gcm` is built
//!   from: `aes` for the block cipher, `ctr` (32-bit big-endian
//!   counter) for the keystream and `ghash` for the tag.
//! - With the fixed 96-bit nonce, J0 = nonce || 0x00000001; the tag
//!   mask is E_K(J0) and the data keystream starts at the next counter
//!   block, nonce || 0x00000002.
//! - Tag = GHASH(aad padded, ciphertext padded, len(aad) || len(ct))XOR
//!   mask, bit lengths big-endian per the GCM spec. Partial trailing
//!   blocks are held in a 16-byte residue until filled or finalized.
//! - Tag comparison is constant-time and fails closed.
//!
//! Three drivers share the tag accumulator:
//! - [`GcmEncryptor`]: keystream + absorb, for the encrypt pass.
//! - [`GcmTagVerifier`]: absorb only, for the decrypt verify pass.
//! - [`GcmKeystream`]: keystream only, for the decrypt output pass that
//!   runs after the tag has already verified.

use aes::cipher::{BlockEncrypt, KeyInit, KeyIvInit, StreamCipher};
use aes::{Aes256, Block};
use ctr::Ctr32BE;
use ghash::universal_hash::UniversalHash;
use ghash::GHash;
use subtle::ConstantTimeEq;

use crate::constants::{KEY_LEN, MAX_PLAINTEXT_LEN, NONCE_LEN, TAG_LEN};
use crate::crypto::types::CryptoError;

const BLOCK_LEN: usize = 16;

/// Initial counter block for position `ctr` (1 for the tag mask, 2 for
/// the first data block).
fn counter_block(nonce: &[u8; NONCE_LEN], ctr: u32) -> Block {
    let mut block = Block::default();
    block[..NONCE_LEN].copy_from_slice(nonce);
    block[NONCE_LEN..].copy_from_slice(&ctr.to_be_bytes());
    block
}

/// GHASH accumulator plus the precomputed tag mask.
struct TagAccumulator {
    ghash: GHash,
    tag_mask: Block,
    residue: [u8; BLOCK_LEN],
    residue_len: usize,
    aad_len: u64,
    msg_len: u64,
}

impl TagAccumulator {
    fn new(key: &[u8; KEY_LEN], nonce: &[u8; NONCE_LEN], aad: &[u8]) -> Self {
        let cipher = Aes256::new(key.into());

        // GHASH key H = E_K(0^128).
        let mut h = Block::default();
        cipher.encrypt_block(&mut h);

        let mut tag_mask = counter_block(nonce, 1);
        cipher.encrypt_block(&mut tag_mask);

        let mut ghash = GHash::new(&h);
        ghash.update_padded(aad);

        Self {
            ghash,
            tag_mask,
            residue: [0u8; BLOCK_LEN],
            residue_len: 0,
            aad_len: aad.len() as u64,
            msg_len: 0,
        }
    }

    /// Absorb ciphertext bytes, enforcing the GCM message bound.
    fn absorb(&mut self, mut ct: &[u8]) -> Result<(), CryptoError> {
        let total = self.msg_len.checked_add(ct.len() as u64);
        match total {
            Some(n) if n <= MAX_PLAINTEXT_LEN => self.msg_len = n,
            _ => return Err(CryptoError::MessageTooLong),
        }

        if self.residue_len > 0 {
            let take = (BLOCK_LEN - self.residue_len).min(ct.len());
            self.residue[self.residue_len..self.residue_len + take].copy_from_slice(&ct[..take]);
            self.residue_len += take;
            ct = &ct[take..];
            if self.residue_len == BLOCK_LEN {
                self.ghash.update(&[Block::clone_from_slice(&self.residue)]);
                self.residue_len = 0;
            }
        }

        let mut blocks = ct.chunks_exact(BLOCK_LEN);
        for block in &mut blocks {
            self.ghash.update(&[Block::clone_from_slice(block)]);
        }

        let rem = blocks.remainder();
        if !rem.is_empty() {
            self.residue[..rem.len()].copy_from_slice(rem);
            self.residue_len = rem.len();
        }

        Ok(())
    }

    fn finalize(mut self) -> [u8; TAG_LEN] {
        // Zero-pad the trailing partial ciphertext block.
        if self.residue_len > 0 {
            let mut last = Block::default();
            last[..self.residue_len].copy_from_slice(&self.residue[..self.residue_len]);
            self.ghash.update(&[last]);
        }

        // Length block: bit lengths, big-endian.
        let mut lens = Block::default();
        lens[..8].copy_from_slice(&(self.aad_len * 8).to_be_bytes());
        lens[8..].copy_from_slice(&(self.msg_len * 8).to_be_bytes());
        self.ghash.update(&[lens]);

        let digest = self.ghash.finalize();
        let mut tag = [0u8; TAG_LEN];
        tag.copy_from_slice(&digest);
        for (t, m) in tag.iter_mut().zip(self.tag_mask.iter()) {
            *t ^= m;
        }
        tag
    }
}

/// CTR keystream positioned at the first data block.
pub(crate) struct GcmKeystream {
    inner: Ctr32BE<Aes256>,
}

impl GcmKeystream {
    pub(crate) fn new(key: &[u8; KEY_LEN], nonce: &[u8; NONCE_LEN]) -> Self {
        let iv = counter_block(nonce, 2);
        Self {
            inner: Ctr32BE::new(key.into(), &iv),
        }
    }

    /// XOR the keystream into `buf` in place. Safe to call with
    /// arbitrary chunk lengths; the keystream position carries over.
    pub(crate) fn apply(&mut self, buf: &mut [u8]) {
        self.inner.apply_keystream(buf);
    }
}

/// Chunked encryption: plaintext in, ciphertext out, tag at the end.
pub(crate) struct GcmEncryptor {
    keystream: GcmKeystream,
    tag: TagAccumulator,
}

impl GcmEncryptor {
    pub(crate) fn new(key: &[u8; KEY_LEN], nonce: &[u8; NONCE_LEN], aad: &[u8]) -> Self {
        Self {
            keystream: GcmKeystream::new(key, nonce),
            tag: TagAccumulator::new(key, nonce, aad),
        }
    }

    /// Encrypt one chunk in place, preserving chunk order.
    pub(crate) fn encrypt_chunk(&mut self, buf: &mut [u8]) -> Result<(), CryptoError> {
        self.keystream.apply(buf);
        self.tag.absorb(buf)
    }

    pub(crate) fn finalize(self) -> [u8; TAG_LEN] {
        self.tag.finalize()
    }
}

/// Chunked tag verification over ciphertext, without producing any
/// plaintext. Used as the first decrypt pass so that nothing
/// unauthenticated ever reaches the output sink.
pub(crate) struct GcmTagVerifier {
    tag: TagAccumulator,
    expected: [u8; TAG_LEN],
}

impl GcmTagVerifier {
    pub(crate) fn new(
        key: &[u8; KEY_LEN],
        nonce: &[u8; NONCE_LEN],
        aad: &[u8],
        expected: [u8; TAG_LEN],
    ) -> Self {
        Self {
            tag: TagAccumulator::new(key, nonce, aad),
            expected,
        }
    }

    pub(crate) fn absorb_chunk(&mut self, ct: &[u8]) -> Result<(), CryptoError> {
        self.tag.absorb(ct)
    }

    /// Constant-time comparison against the expected tag.
    pub(crate) fn finalize(self) -> Result<(), CryptoError> {
        let expected = self.expected;
        let computed = self.tag.finalize();
        if computed.ct_eq(&expected).into() {
            Ok(())
        } else {
            Err(CryptoError::TagMismatch)
        }
    }
}
