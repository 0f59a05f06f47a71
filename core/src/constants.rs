/// Container format version this build reads and writes.
/// Any other value in a header is rejected, never coerced.
pub const FORMAT_VERSION: u64 = 1;

/// AES-256 key length (bytes).
pub const KEY_LEN: usize = 32;

/// Standard 96-bit GCM nonce length (bytes).
pub const NONCE_LEN: usize = 12;

/// Fixed AEAD tag length (bytes).
pub const TAG_LEN: usize = 16;

/// Fixed container header length: version (8) + nonce (12) + tag (16).
pub const HEADER_LEN: usize = 8 + NONCE_LEN + TAG_LEN;

/// Byte offset of the tag field inside the header.
/// The encrypt pass seeks back here to patch the placeholder.
pub const TAG_OFFSET: u64 = (8 + NONCE_LEN) as u64;

/// Byte offset of the first ciphertext byte.
pub const BODY_OFFSET: u64 = HEADER_LEN as u64;

/// Default streaming chunk size (8 KiB).
pub const DEFAULT_CHUNK_SIZE: usize = 8 * 1024;

/// Maximum plaintext per container: the GCM single-message bound of
/// 2^39 - 256 bits. One GCM instance spans the whole stream, so the
/// per-message limit is the per-container limit.
pub const MAX_PLAINTEXT_LEN: u64 = (1u64 << 36) - 32;
