// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Sealed-box encryption for request payloads.
//!
//! Payloads are sealed to the company's X25519 public key with an anonymous
//! sealed box (`crypto_box::seal`): any caller can encrypt, no sender secret
//! is involved, and only the holder of the matching private key - kept
//! off-platform - can decrypt. The service therefore stores ciphertext it
//! can never read, even with full database access.
//!
//! This module owns the protocol (what gets sealed, keyed by what); the
//! primitive itself comes from the vetted `crypto_box` implementation.

use base64ct::{Base64, Encoding};
use crypto_box::{aead::OsRng, PublicKey, SecretKey};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// X25519 public key length in bytes.
pub const PUBLIC_KEY_BYTES: usize = 32;

/// Number of digest bytes rendered into a fingerprint.
const FINGERPRINT_BYTES: usize = 8;

/// Errors from sealed-box operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CryptoError {
    #[error("public key is not valid base64")]
    KeyEncoding,
    #[error("public key must be exactly 32 bytes")]
    KeyLength,
    #[error("sealed-box encryption failed")]
    Seal,
    #[error("sealed-box decryption failed")]
    Open,
}

/// Decode a base64 X25519 public key.
pub fn parse_public_key(encoded: &str) -> Result<PublicKey, CryptoError> {
    let bytes = Base64::decode_vec(encoded).map_err(|_| CryptoError::KeyEncoding)?;
    let bytes: [u8; PUBLIC_KEY_BYTES] = bytes.try_into().map_err(|_| CryptoError::KeyLength)?;
    Ok(PublicKey::from(bytes))
}

/// Encode a public key as base64 for storage and transport.
pub fn encode_public_key(public_key: &PublicKey) -> String {
    Base64::encode_string(public_key.as_bytes())
}

/// Seal a plaintext to the recipient's public key, returning a base64 blob.
///
/// The ciphertext reveals nothing about the sender; a fresh ephemeral key is
/// used per call, so sealing the same plaintext twice yields different blobs.
pub fn seal(plaintext: &[u8], recipient: &PublicKey) -> Result<String, CryptoError> {
    let ciphertext = recipient
        .seal(&mut OsRng, plaintext)
        .map_err(|_| CryptoError::Seal)?;
    Ok(Base64::encode_string(&ciphertext))
}

/// Open a sealed blob with the recipient's secret key.
///
/// This is the private-key holder's counterpart to [`seal`]; the server
/// never holds a secret key, so in production this runs only in the
/// reviewer's off-platform tooling.
pub fn open(blob: &str, secret: &SecretKey) -> Result<Vec<u8>, CryptoError> {
    let ciphertext = Base64::decode_vec(blob).map_err(|_| CryptoError::Open)?;
    secret.unseal(&ciphertext).map_err(|_| CryptoError::Open)
}

/// Short hex digest of a public key for human verification and audit.
///
/// Deterministic for a given key; distinct keys collide only with
/// negligible probability (64-bit prefix of SHA-256).
pub fn fingerprint(public_key: &PublicKey) -> String {
    let digest = Sha256::digest(public_key.as_bytes());
    digest
        .iter()
        .take(FINGERPRINT_BYTES)
        .map(|b| format!("{b:02x}"))
        .collect()
}

/// Generate a fresh X25519 keypair (setup tooling and tests).
pub fn generate_keypair() -> (PublicKey, SecretKey) {
    let secret = SecretKey::generate(&mut OsRng);
    (secret.public_key(), secret)
}
