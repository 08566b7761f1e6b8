//! # Digital Signatures
//!
//! Signing and verification for both ledger key types.
//!
//! The two algorithms disagree on what they sign:
//!
//! - **secp256k1** signs `SHA-512-half(message)` with RFC 6979 nonces and
//!   emits a DER-encoded signature with a low S value. Anything else is
//!   malleable and rejected by validators.
//! - **ed25519** signs the full message and emits 64 raw bytes.
//!
//! Verification picks the algorithm from the public key's first byte, so a
//! caller never passes a key type alongside a key.
//!
//! ## Strictness
//!
//! Verification uses `secp256k1`'s normal (low-S only) check and
//! `ed25519-dalek`'s strict check. We never accept a signature a validator
//! would refuse.

use ed25519_dalek::{Signature as Ed25519Signature, Signer, SigningKey as Ed25519SigningKey, VerifyingKey};
use secp256k1::ecdsa::Signature as EcdsaSignature;
use secp256k1::{Message, PublicKey as Secp256k1PublicKey, SecretKey as Secp256k1SecretKey};
use thiserror::Error;

use super::hash::sha512_half;
use super::keys::{KeyType, SecretKey};
use super::SECP256K1;
use crate::config::ED25519_PUBLIC_KEY_PREFIX;

/// Errors during signature operations.
///
/// Verification failures are not errors: [`verify`] just says no.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("invalid secret key")]
    InvalidSecretKey,
}

/// Sign `message` with a secret key of the given type.
///
/// Both algorithms are deterministic: the same key and message always give
/// the same signature bytes.
///
/// # Example
///
/// ```
/// use ripple_sign_serialize::crypto::keys::{KeyType, SigningKey};
/// use ripple_sign_serialize::crypto::signatures::{sign, verify};
///
/// let key = SigningKey::from_seed_text(KeyType::Ed25519, "masterpassphrase").unwrap();
/// let signature = sign(KeyType::Ed25519, key.secret_key(), b"hello").unwrap();
///
/// assert!(verify(key.public_key().as_bytes(), b"hello", &signature));
/// ```
pub fn sign(key_type: KeyType, secret: &SecretKey, message: &[u8]) -> Result<Vec<u8>, SignatureError> {
    match key_type {
        KeyType::Secp256k1 => {
            let secret = Secp256k1SecretKey::from_slice(secret.as_bytes())
                .map_err(|_| SignatureError::InvalidSecretKey)?;
            let digest = Message::from_digest(sha512_half(message));
            Ok(SECP256K1
                .sign_ecdsa(&digest, &secret)
                .serialize_der()
                .to_vec())
        }
        KeyType::Ed25519 => {
            let signing = Ed25519SigningKey::from_bytes(secret.as_bytes());
            Ok(signing.sign(message).to_bytes().to_vec())
        }
    }
}

/// Verify `signature` over `message` against a serialized public key.
///
/// Returns `false` for a malformed key, a malformed signature, or a
/// signature that simply does not match. Callers get no hint which.
pub fn verify(public_key: &[u8], message: &[u8], signature: &[u8]) -> bool {
    match KeyType::from_public_key(public_key) {
        Some(KeyType::Secp256k1) => verify_secp256k1(public_key, message, signature),
        Some(KeyType::Ed25519) => verify_ed25519(public_key, message, signature),
        None => false,
    }
}

fn verify_secp256k1(public_key: &[u8], message: &[u8], signature: &[u8]) -> bool {
    let Ok(key) = Secp256k1PublicKey::from_slice(public_key) else {
        return false;
    };
    let Ok(sig) = EcdsaSignature::from_der(signature) else {
        return false;
    };
    let digest = Message::from_digest(sha512_half(message));
    SECP256K1.verify_ecdsa(&digest, &sig, &key).is_ok()
}

fn verify_ed25519(public_key: &[u8], message: &[u8], signature: &[u8]) -> bool {
    let Some((&ED25519_PUBLIC_KEY_PREFIX, point)) = public_key.split_first() else {
        return false;
    };
    let Ok(point) = <[u8; 32]>::try_from(point) else {
        return false;
    };
    let Ok(key) = VerifyingKey::from_bytes(&point) else {
        return false;
    };
    let Ok(sig) = Ed25519Signature::from_slice(signature) else {
        return false;
    };
    key.verify_strict(message, &sig).is_ok()
}
