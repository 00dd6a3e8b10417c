//! Symmetric envelope encryption for webhook payloads.
//!
//! The shared secret is stretched to a 32-byte AES-256-GCM key with
//! SHA-256, and each message carries its own random 12-byte nonce.
//! Wire format: hex-encoded `nonce(12) || ciphertext+tag`, sent as the
//! raw HTTP body.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::Aes256Gcm;
use rand::RngCore;
use sha2::{Digest, Sha256};
use thiserror::Error;

const NONCE_LEN: usize = 12;

/// Envelope encryption errors.
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("Encryption failed: {0}")]
    Encryption(String),
    #[error("Decryption failed: {0}")]
    Decryption(String),
    #[error("Hex decode error: {0}")]
    HexDecode(String),
    #[error("Ciphertext too short: {0} bytes")]
    TooShort(usize),
    #[error("UTF-8 conversion error: {0}")]
    Utf8Error(String),
}

/// Derive the AES-256 key from the shared secret text.
fn derive_key(secret: &str) -> [u8; 32] {
    Sha256::digest(secret.as_bytes()).into()
}

/// Encrypt a payload with the shared secret.
///
/// Returns hex-encoded `nonce(12) || ciphertext+tag`.
pub fn encrypt(secret: &str, plaintext: &str) -> Result<String, CryptoError> {
    let key = derive_key(secret);
    let cipher = Aes256Gcm::new(&key.into());

    let mut nonce_bytes = [0u8; NONCE_LEN];
    rand::rngs::OsRng.fill_bytes(&mut nonce_bytes);

    let ciphertext = cipher
        .encrypt((&nonce_bytes).into(), plaintext.as_bytes())
        .map_err(|e| CryptoError::Encryption(e.to_string()))?;

    let mut framed = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    framed.extend_from_slice(&nonce_bytes);
    framed.extend_from_slice(&ciphertext);

    Ok(hex::encode(framed))
}

/// Decrypt a hex-encoded payload with the shared secret.
///
/// Any failure (malformed hex, truncated input, wrong secret, tag
/// mismatch) is an error value; the receiver maps it to 401.
pub fn decrypt(secret: &str, data: &str) -> Result<String, CryptoError> {
    let framed = hex::decode(data).map_err(|e| CryptoError::HexDecode(e.to_string()))?;

    if framed.len() < NONCE_LEN {
        return Err(CryptoError::TooShort(framed.len()));
    }

    let nonce: [u8; NONCE_LEN] = framed[..NONCE_LEN]
        .try_into()
        .map_err(|_| CryptoError::TooShort(framed.len()))?;
    let ciphertext = &framed[NONCE_LEN..];

    let key = derive_key(secret);
    let cipher = Aes256Gcm::new(&key.into());

    let plaintext = cipher
        .decrypt((&nonce).into(), ciphertext)
        .map_err(|e| CryptoError::Decryption(e.to_string()))?;

    String::from_utf8(plaintext).map_err(|e| CryptoError::Utf8Error(e.to_string()))
}
