//! Hashing, HMAC and encoding primitives.
//!
//! Every function here is pure. HMAC accepts keys of any length; the
//! signing schemes decide which keys are fed in.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use digest::Digest;
use hmac::{Hmac, KeyInit, Mac};
use sha1::Sha1;
use sha2::Sha256;

type HmacSha1 = Hmac<Sha1>;
type HmacSha256 = Hmac<Sha256>;

/// Hex SHA-256 of the empty byte sequence.
pub const EMPTY_PAYLOAD_SHA256: &str =
    "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

/// Compute the SHA-1 digest of `data`.
#[must_use]
pub fn sha1(data: &[u8]) -> [u8; 20] {
    let mut out = [0u8; 20];
    out.copy_from_slice(&Sha1::digest(data));
    out
}

/// Compute the SHA-256 digest of `data`.
#[must_use]
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut out = [0u8; 32];
    out.copy_from_slice(&Sha256::digest(data));
    out
}

/// Compute HMAC-SHA1 and return the raw bytes.
#[must_use]
pub fn hmac_sha1(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha1::new_from_slice(key).expect("HMAC can accept keys of any length");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

/// Compute HMAC-SHA256 and return the raw bytes.
#[must_use]
pub fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can accept keys of any length");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

/// Encode bytes as lowercase hex.
#[must_use]
pub fn hex_encode(data: impl AsRef<[u8]>) -> String {
    hex::encode(data)
}

/// Encode bytes as standard, padded base64.
#[must_use]
pub fn base64_encode(data: impl AsRef<[u8]>) -> String {
    BASE64.encode(data)
}

/// Compute the SHA-256 hash of the given payload and return it as a hex string.
///
/// This is the value of the `x-amz-content-sha256` header.
///
/// # Examples
///
/// ```
/// use s3sign_auth::crypto::hash_payload;
///
/// assert_eq!(
///     hash_payload(b""),
///     "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
/// );
/// ```
#[must_use]
pub fn hash_payload(payload: &[u8]) -> String {
    hex::encode(Sha256::digest(payload))
}

/// Incremental SHA-256 over a payload delivered in chunks.
///
/// Produces the same digest as [`hash_payload`] over the concatenated
/// chunks, without holding the whole payload in memory.
///
/// ```
/// use s3sign_auth::crypto::{PayloadHasher, hash_payload};
///
/// let mut hasher = PayloadHasher::new();
/// hasher.update(b"hello ");
/// hasher.update(b"world");
/// assert_eq!(hasher.finalize(), hash_payload(b"hello world"));
/// ```
#[derive(Clone, Default)]
pub struct PayloadHasher {
    inner: Sha256,
    len: u64,
}

impl PayloadHasher {
    /// Start a new hash.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the next chunk.
    pub fn update(&mut self, chunk: impl AsRef<[u8]>) {
        let chunk = chunk.as_ref();
        self.len += chunk.len() as u64;
        Digest::update(&mut self.inner, chunk);
    }

    /// Number of bytes hashed so far.
    #[must_use]
    pub fn len(&self) -> u64 {
        self.len
    }

    /// Whether nothing has been hashed yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Finish and return the lowercase hex digest.
    #[must_use]
    pub fn finalize(self) -> String {
        hex::encode(self.inner.finalize())
    }
}

impl std::fmt::Debug for PayloadHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PayloadHasher")
            .field("len", &self.len)
            .finish_non_exhaustive()
    }
}

impl std::io::Write for PayloadHasher {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
