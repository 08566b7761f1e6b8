//! # Cryptographic Primitives
//!
//! Every key, hash and signature the tool produces flows through here.
//!
//! - **secp256k1** and **ed25519** for signatures, the two key types the
//!   ledger accepts.
//! - **SHA-512-half** for signing hashes and key derivation.
//! - **RIPEMD-160 over SHA-256** for account IDs.
//! - **Base58check** over the ledger alphabet for human-readable tokens.
//! - **RFC 1751** words for the printable form of a seed.
//!
//! Everything here is a thin, typed wrapper around audited implementations.

use once_cell::sync::Lazy;
use secp256k1::{All, Secp256k1};

pub mod hash;
pub mod keys;
pub mod rfc1751;
pub mod signatures;
pub mod tokens;

/// Shared secp256k1 context. Building one is expensive, so every signing
/// and derivation call reuses this.
pub(crate) static SECP256K1: Lazy<Secp256k1<All>> = Lazy::new(Secp256k1::new);

pub use hash::{sha512_half, Hash256};
pub use keys::{KeyError, KeyType, PublicKey, SecretKey, Seed, SigningKey};
pub use signatures::{sign, verify, SignatureError};
pub use tokens::{AccountId, TokenType};
