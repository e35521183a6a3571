//! manager::crypto
//!
//! Sealed-box encryption of secret values.
//!
//! # Design
//!
//! GitHub expects secret values encrypted with libsodium's
//! `crypto_box_seal`: a fresh X25519 key pair is generated per message,
//! the value is boxed (XSalsa20-Poly1305) to the recipient's public key
//! with a nonce derived from both public keys, and the ephemeral public
//! key is prepended to the output. Only the holder of the recipient's
//! private key can open it, and the sender stays anonymous.
//!
//! The public key arrives as standard base64 and the ciphertext is
//! returned the same way.
//!
//! # Example
//!
//! ```
//! use ghsecrets::manager::crypto::seal;
//!
//! let key = "hBT5WZEj8ZoOv6TYJsfWq7MxTEQopZO5/IT3ZCVQPzs="; // base64 of 32 bytes
//! let sealed = seal(key, b"hunter2").unwrap();
//! assert_ne!(sealed, seal(key, b"hunter2").unwrap());
//! ```

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use crypto_box::aead::OsRng;
use crypto_box::PublicKey;
use thiserror::Error;
use tracing::trace;

/// Curve25519 public key size in bytes.
pub const KEY_SIZE: usize = 32;

/// Bytes a sealed box adds to the plaintext (ephemeral key + MAC).
pub const SEAL_OVERHEAD: usize = KEY_SIZE + 16;

/// Errors from sealing a value.
///
/// All of these are caused by malformed key material; none produce output.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SealError {
    /// The public key is not valid base64.
    #[error("public key is not valid base64: {0}")]
    InvalidBase64(String),

    /// The decoded public key has the wrong length.
    #[error("public key must be {KEY_SIZE} bytes, got {0}")]
    InvalidKeyLength(usize),

    /// The sealing primitive itself failed.
    #[error("sealing failed")]
    SealFailed,
}

/// Decode a base64 public key into a recipient key.
fn decode_key(public_key: &str) -> Result<PublicKey, SealError> {
    let bytes = STANDARD
        .decode(public_key.trim())
        .map_err(|e| SealError::InvalidBase64(e.to_string()))?;
    let bytes: [u8; KEY_SIZE] = bytes
        .try_into()
        .map_err(|b: Vec<u8>| SealError::InvalidKeyLength(b.len()))?;
    Ok(PublicKey::from(bytes))
}

/// Seal `plaintext` to the base64 `public_key` and return base64 ciphertext.
///
/// Each call uses a fresh ephemeral key pair, so sealing the same value
/// twice never gives the same output.
///
/// # Errors
///
/// Returns [`SealError`] if the key is not base64 or not 32 bytes.
pub fn seal(public_key: &str, plaintext: &[u8]) -> Result<String, SealError> {
    let recipient = decode_key(public_key)?;
    let sealed = recipient
        .seal(&mut OsRng, plaintext)
        .map_err(|_| SealError::SealFailed)?;

    trace!(
        plaintext_len = plaintext.len(),
        ciphertext_len = sealed.len(),
        "sealed secret value"
    );

    Ok(STANDARD.encode(sealed))
}
