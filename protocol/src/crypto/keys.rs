//! # Key Management
//!
//! Seeds, key types and the deterministic key derivation behind every
//! signing key the tool handles.
//!
//! A [`SigningKey`] is nothing more than a key type and a 16-byte seed.
//! The public and secret keys are derived from those two values when the
//! key is constructed, and there is no way to set them independently. A
//! key file can go stale, but a `SigningKey` never disagrees with its
//! own seed.
//!
//! ## Derivation
//!
//! - **secp256k1**: the ledger's "family generator" scheme. A root secret
//!   is the first valid scalar in `SHA-512-half(seed || seq)`. Account key
//!   zero adds a tweak derived from the root public key.
//! - **ed25519**: the secret key is `SHA-512-half(seed)`; the public key is
//!   the Ed25519 point prefixed with `0xED`.
//!
//! Both yield 33-byte public keys and 32-byte secret keys.
//!
//! ## Security considerations
//!
//! - Seeds and secret keys are zeroized on drop.
//! - Random seeds come from `OsRng`.
//! - `Debug` output never includes secret material.

use std::fmt;
use std::str::FromStr;

use ed25519_dalek::SigningKey as Ed25519SigningKey;
use rand::rngs::OsRng;
use rand::RngCore;
use secp256k1::{PublicKey as Secp256k1PublicKey, Scalar, SecretKey as Secp256k1SecretKey};
use thiserror::Error;
use zeroize::Zeroize;

use super::hash::{sha512_half, sha512_half_multi};
use super::rfc1751;
use super::signatures::{self, SignatureError};
use super::tokens::{decode_token_exact, encode_token, AccountId, TokenType};
use super::SECP256K1;
use crate::config::{
    ACCOUNT_ID_LENGTH, ED25519_PUBLIC_KEY_PREFIX, PUBLIC_KEY_LENGTH, SECRET_KEY_LENGTH, SEED_LENGTH,
};

/// Errors that can occur while building or using a key.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyError {
    #[error("Invalid key type: \"{0}\"")]
    InvalidKeyType(String),

    #[error("Unable to parse seed: {0}")]
    SeedParse(String),

    #[error("key derivation failed: {0}")]
    Derivation(String),
}

// ---------------------------------------------------------------------------
// KeyType
// ---------------------------------------------------------------------------

/// The two signature algorithms the ledger supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyType {
    #[default]
    Secp256k1,
    Ed25519,
}

impl KeyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyType::Secp256k1 => "secp256k1",
            KeyType::Ed25519 => "ed25519",
        }
    }

    /// Infer the key type from a serialized public key's leading byte.
    pub fn from_public_key(public_key: &[u8]) -> Option<Self> {
        if public_key.len() != PUBLIC_KEY_LENGTH {
            return None;
        }
        match public_key[0] {
            ED25519_PUBLIC_KEY_PREFIX => Some(KeyType::Ed25519),
            0x02 | 0x03 => Some(KeyType::Secp256k1),
            _ => None,
        }
    }
}

impl FromStr for KeyType {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "secp256k1" => Ok(KeyType::Secp256k1),
            "ed25519" => Ok(KeyType::Ed25519),
            other => Err(KeyError::InvalidKeyType(other.to_string())),
        }
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Seed
// ---------------------------------------------------------------------------

/// The 16 secret bytes every key pair is derived from.
#[derive(Clone, PartialEq, Eq)]
pub struct Seed([u8; SEED_LENGTH]);

impl Seed {
    pub fn from_bytes(bytes: [u8; SEED_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Draw a fresh seed from the OS RNG.
    pub fn random() -> Self {
        let mut bytes = [0u8; SEED_LENGTH];
        OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Expand a passphrase: the first 16 bytes of `SHA-512(passphrase)`.
    ///
    /// Anyone who guesses the passphrase owns the account. "masterpassphrase"
    /// is the genesis account of every test network, for example.
    pub fn from_passphrase(passphrase: &str) -> Self {
        let mut digest = sha512_half(passphrase.as_bytes());
        let mut bytes = [0u8; SEED_LENGTH];
        bytes.copy_from_slice(&digest[..SEED_LENGTH]);
        digest.zeroize();
        Self(bytes)
    }

    /// Parse a base58 family seed (`s...`).
    pub fn from_base58(text: &str) -> Option<Self> {
        decode_token_exact::<SEED_LENGTH>(TokenType::FamilySeed, text).map(Self)
    }

    /// Parse exactly 32 hex digits.
    pub fn from_hex(text: &str) -> Option<Self> {
        if text.len() != SEED_LENGTH * 2 {
            return None;
        }
        let bytes = hex::decode(text).ok()?;
        bytes.try_into().ok().map(Self)
    }

    /// Parse the twelve-word RFC 1751 form written to `master_key`.
    pub fn from_rfc1751(text: &str) -> Option<Self> {
        let mut key = rfc1751::decode_key(text).ok()?;
        key.reverse();
        Some(Self(key))
    }

    /// Interpret user-supplied seed text the way the ledger does.
    ///
    /// In order: reject empty text and anything that is really an address
    /// or key, then try hex, base58 seed, RFC 1751 words, and finally fall
    /// back to treating the text as a passphrase.
    pub fn parse_generic(text: &str) -> Result<Self, KeyError> {
        if text.is_empty() || looks_like_key_or_account(text) {
            return Err(KeyError::SeedParse(text.to_string()));
        }

        Ok(Self::from_hex(text)
            .or_else(|| Self::from_base58(text))
            .or_else(|| Self::from_rfc1751(text))
            .unwrap_or_else(|| Self::from_passphrase(text)))
    }

    pub fn as_bytes(&self) -> &[u8; SEED_LENGTH] {
        &self.0
    }

    /// Base58 family seed form.
    pub fn to_base58(&self) -> String {
        encode_token(TokenType::FamilySeed, &self.0)
    }

    /// Upper-case hex form.
    pub fn to_hex(&self) -> String {
        hex::encode_upper(self.0)
    }

    /// RFC 1751 form of the byte-reversed seed.
    pub fn to_rfc1751(&self) -> String {
        let mut reversed = self.0;
        reversed.reverse();
        let words = rfc1751::encode_key(&reversed);
        reversed.zeroize();
        words
    }
}

impl Drop for Seed {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Seed(<redacted>)")
    }
}

/// Addresses and keys are valid base58 too; never mistake one for a seed.
fn looks_like_key_or_account(text: &str) -> bool {
    decode_token_exact::<ACCOUNT_ID_LENGTH>(TokenType::AccountId, text).is_some()
        || decode_token_exact::<PUBLIC_KEY_LENGTH>(TokenType::NodePublic, text).is_some()
        || decode_token_exact::<PUBLIC_KEY_LENGTH>(TokenType::AccountPublic, text).is_some()
        || decode_token_exact::<SECRET_KEY_LENGTH>(TokenType::NodePrivate, text).is_some()
        || decode_token_exact::<SECRET_KEY_LENGTH>(TokenType::AccountSecret, text).is_some()
}

// ---------------------------------------------------------------------------
// Key pair derivation
// ---------------------------------------------------------------------------

/// A serialized public key: 33 bytes for both key types.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey([u8; PUBLIC_KEY_LENGTH]);

impl PublicKey {
    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LENGTH] {
        &self.0
    }

    /// Base58 account public key (`a...`).
    pub fn to_base58(&self) -> String {
        encode_token(TokenType::AccountPublic, &self.0)
    }

    pub fn to_hex(&self) -> String {
        hex::encode_upper(self.0)
    }

    pub fn account_id(&self) -> AccountId {
        AccountId::from_public_key(&self.0)
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.to_hex())
    }
}

/// A 32-byte secret key, zeroized on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretKey([u8; SECRET_KEY_LENGTH]);

impl SecretKey {
    pub fn as_bytes(&self) -> &[u8; SECRET_KEY_LENGTH] {
        &self.0
    }

    /// Base58 account secret (`p...`).
    pub fn to_base58(&self) -> String {
        encode_token(TokenType::AccountSecret, &self.0)
    }

    pub fn to_hex(&self) -> String {
        hex::encode_upper(self.0)
    }
}

impl Drop for SecretKey {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(<redacted>)")
    }
}

/// Derive the (public, secret) key pair for `seed` under `key_type`.
pub fn derive_key_pair(
    key_type: KeyType,
    seed: &Seed,
) -> Result<(PublicKey, SecretKey), KeyError> {
    match key_type {
        KeyType::Secp256k1 => derive_secp256k1(seed),
        KeyType::Ed25519 => Ok(derive_ed25519(seed)),
    }
}

fn derive_ed25519(seed: &Seed) -> (PublicKey, SecretKey) {
    let secret = sha512_half(seed.as_bytes());
    let verifying = Ed25519SigningKey::from_bytes(&secret).verifying_key();

    let mut public = [0u8; PUBLIC_KEY_LENGTH];
    public[0] = ED25519_PUBLIC_KEY_PREFIX;
    public[1..].copy_from_slice(verifying.as_bytes());
    (PublicKey(public), SecretKey(secret))
}

fn derive_secp256k1(seed: &Seed) -> Result<(PublicKey, SecretKey), KeyError> {
    let root = first_valid_scalar(&[&seed.as_bytes()[..]]);
    let root_public = Secp256k1PublicKey::from_secret_key(&SECP256K1, &root).serialize();

    // Account key zero of the family.
    let account_index = 0u32.to_be_bytes();
    let tweak = first_valid_scalar(&[&root_public[..], &account_index[..]]);

    let secret = root
        .add_tweak(&Scalar::from(tweak))
        .map_err(|e| KeyError::Derivation(e.to_string()))?;
    let public = Secp256k1PublicKey::from_secret_key(&SECP256K1, &secret).serialize();

    Ok((PublicKey(public), SecretKey(secret.secret_bytes())))
}

/// Hash `parts || seq` for seq = 0, 1, ... until the digest is a valid
/// secp256k1 scalar. The odds of needing a second round are about 2^-128.
fn first_valid_scalar(parts: &[&[u8]]) -> Secp256k1SecretKey {
    let mut seq: u32 = 0;
    loop {
        let seq_bytes = seq.to_be_bytes();
        let mut input: Vec<&[u8]> = parts.to_vec();
        input.push(&seq_bytes);

        let mut digest = sha512_half_multi(&input);
        let candidate = Secp256k1SecretKey::from_slice(&digest);
        digest.zeroize();
        if let Ok(scalar) = candidate {
            return scalar;
        }
        seq = seq.wrapping_add(1);
    }
}

// ---------------------------------------------------------------------------
// SigningKey
// ---------------------------------------------------------------------------

/// A signing key: key type, seed, and the key pair derived from them.
///
/// All fields are read-only after construction.
///
/// # Examples
///
/// ```
/// use ripple_sign_serialize::crypto::keys::{KeyType, SigningKey};
///
/// let key = SigningKey::from_seed_text(KeyType::Secp256k1, "masterpassphrase").unwrap();
/// assert_eq!(key.account_id().to_base58(), "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh");
/// ```
#[derive(Clone)]
pub struct SigningKey {
    key_type: KeyType,
    seed: Seed,
    public_key: PublicKey,
    secret_key: SecretKey,
}

impl SigningKey {
    /// Build a key from an explicit key type and seed.
    pub fn new(key_type: KeyType, seed: Seed) -> Result<Self, KeyError> {
        let (public_key, secret_key) = derive_key_pair(key_type, &seed)?;
        Ok(Self {
            key_type,
            seed,
            public_key,
            secret_key,
        })
    }

    /// Build a key from a fresh random seed.
    pub fn generate(key_type: KeyType) -> Result<Self, KeyError> {
        Self::new(key_type, Seed::random())
    }

    /// Build a key from seed text: a hex, base58 or RFC 1751 seed, or a
    /// passphrase.
    pub fn from_seed_text(key_type: KeyType, text: &str) -> Result<Self, KeyError> {
        Self::new(key_type, Seed::parse_generic(text)?)
    }

    /// Build a key from optional inputs: the default key type when none is
    /// given, and a random seed when no seed text is given.
    pub fn from_options(key_type: Option<KeyType>, seed_text: Option<&str>) -> Result<Self, KeyError> {
        let key_type = key_type.unwrap_or_default();
        match seed_text {
            Some(text) => Self::from_seed_text(key_type, text),
            None => Self::generate(key_type),
        }
    }

    pub fn key_type(&self) -> KeyType {
        self.key_type
    }

    pub fn seed(&self) -> &Seed {
        &self.seed
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    pub fn secret_key(&self) -> &SecretKey {
        &self.secret_key
    }

    pub fn account_id(&self) -> AccountId {
        self.public_key.account_id()
    }

    /// Sign `message` with the algorithm implied by the key type.
    pub fn sign(&self, message: &[u8]) -> Result<Vec<u8>, SignatureError> {
        signatures::sign(self.key_type, &self.secret_key, message)
    }
}

impl PartialEq for SigningKey {
    fn eq(&self, other: &Self) -> bool {
        self.key_type == other.key_type && self.seed == other.seed
    }
}

impl Eq for SigningKey {}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SigningKey(type={}, account={})",
            self.key_type,
            self.account_id()
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const PASSPHRASE: &str = "masterpassphrase";
    const MASTER_SEED: &str = "snoPBrXtMeMyMHUVTgbuqAfg1SUTb";
    const MASTER_SEED_HEX: &str = "DEDCE9CE67B451D852FD4E846FCDE31C";
    const MASTER_KEY: &str = "I IRE BOND BOW TRIO LAID SEAT GOAL HEN IBIS IBIS DARE";

    #[test]
    fn passphrase_expands_to_known_seed() {
        let seed = Seed::from_passphrase(PASSPHRASE);
        assert_eq!(seed.to_hex(), MASTER_SEED_HEX);
        assert_eq!(seed.to_base58(), MASTER_SEED);
        assert_eq!(seed.to_rfc1751(), MASTER_KEY);
    }

    #[test]
    fn secp256k1_golden_vector() {
        let key = SigningKey::from_seed_text(KeyType::Secp256k1, PASSPHRASE).unwrap();
        assert_eq!(
            key.public_key().to_base58(),
            "aBQG8RQAzjs1eTKFEAQXr2gS4utcDiEC9wmi7pfUPTi27VCahwgw"
        );
        assert_eq!(
            key.public_key().to_hex(),
            "0330E7FC9D56BB25D6893BA3F317AE5BCF33B3291BD63DB32654A313222F7FD020"
        );
        assert_eq!(
            key.secret_key().to_base58(),
            "p9JfM6HHi64m6mvB6v5k7G2b1cXzGmYiCNJf6GHPKvFTWdeRVjh"
        );
        assert_eq!(key.account_id().to_base58(), "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh");
    }

    #[test]
    fn ed25519_golden_vector() {
        let key = SigningKey::from_seed_text(KeyType::Ed25519, PASSPHRASE).unwrap();
        assert_eq!(
            key.public_key().to_base58(),
            "aKGheSBjmCsKJVuLNKRAKpZXT6wpk2FCuEZAXJupXgdAxX5THCqR"
        );
        assert_eq!(
            key.public_key().to_hex(),
            "EDAAC3F98BB94F451804EF5993C847DAAA4E6154F455635659D88AA5C80F156303"
        );
        assert_eq!(
            key.secret_key().to_hex(),
            "93D09224D09221B8845E7A9772E0D6259CD01029C557CD95978CC674E0192B25"
        );
        assert_eq!(key.account_id().to_base58(), "rGWrZyQqhTp9Xu7G5Pkayo7bXjH4k4QYpf");
    }

    #[test]
    fn every_seed_spelling_yields_the_same_key() {
        for kt in [KeyType::Secp256k1, KeyType::Ed25519] {
            let reference = SigningKey::new(kt, Seed::from_passphrase(PASSPHRASE)).unwrap();
            for text in [PASSPHRASE, MASTER_SEED, MASTER_SEED_HEX, MASTER_KEY] {
                let key = SigningKey::from_seed_text(kt, text).unwrap();
                assert_eq!(key.public_key(), reference.public_key(), "seed text {text}");
            }
        }
    }

    #[test]
    fn derivation_is_deterministic() {
        let a = SigningKey::new(KeyType::Secp256k1, Seed::from_bytes([9u8; 16])).unwrap();
        let b = SigningKey::new(KeyType::Secp256k1, Seed::from_bytes([9u8; 16])).unwrap();
        assert_eq!(a.public_key(), b.public_key());
        assert_eq!(a.secret_key(), b.secret_key());
    }

    #[test]
    fn derivation_depends_on_seed_and_type() {
        let seed = Seed::from_bytes([9u8; 16]);
        let secp = SigningKey::new(KeyType::Secp256k1, seed.clone()).unwrap();
        let ed = SigningKey::new(KeyType::Ed25519, seed).unwrap();
        let other = SigningKey::new(KeyType::Secp256k1, Seed::from_bytes([10u8; 16])).unwrap();
        assert_ne!(secp.public_key(), ed.public_key());
        assert_ne!(secp.public_key(), other.public_key());
    }

    #[test]
    fn random_keys_have_expected_shape() {
        for kt in [KeyType::Secp256k1, KeyType::Ed25519] {
            let key = SigningKey::generate(kt).unwrap();
            assert_eq!(key.key_type(), kt);
            assert_eq!(key.public_key().to_base58().len(), 52);
            assert_eq!(KeyType::from_public_key(key.public_key().as_bytes()), Some(kt));
        }
    }

    #[test]
    fn empty_seed_text_is_rejected() {
        let err = SigningKey::from_seed_text(KeyType::Ed25519, "").unwrap_err();
        assert_eq!(err, KeyError::SeedParse(String::new()));
        assert_eq!(err.to_string(), "Unable to parse seed: ");
    }

    #[test]
    fn addresses_and_keys_are_not_seeds() {
        let key = SigningKey::from_seed_text(KeyType::Secp256k1, PASSPHRASE).unwrap();
        for text in [
            key.account_id().to_base58(),
            key.public_key().to_base58(),
            key.secret_key().to_base58(),
        ] {
            assert!(matches!(Seed::parse_generic(&text), Err(KeyError::SeedParse(_))));
        }
    }

    #[test]
    fn key_type_parsing() {
        assert_eq!("secp256k1".parse::<KeyType>(), Ok(KeyType::Secp256k1));
        assert_eq!("ed25519".parse::<KeyType>(), Ok(KeyType::Ed25519));
        assert_eq!(
            "NSA special".parse::<KeyType>(),
            Err(KeyError::InvalidKeyType("NSA special".to_string()))
        );
        assert_eq!(KeyType::default(), KeyType::Secp256k1);
    }

    #[test]
    fn from_options_applies_defaults() {
        let key = SigningKey::from_options(None, Some(PASSPHRASE)).unwrap();
        assert_eq!(key.key_type(), KeyType::Secp256k1);
        assert_eq!(key.account_id().to_base58(), "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh");

        let random = SigningKey::from_options(Some(KeyType::Ed25519), None).unwrap();
        assert_eq!(random.key_type(), KeyType::Ed25519);
    }

    #[test]
    fn debug_output_hides_secrets() {
        let key = SigningKey::from_seed_text(KeyType::Secp256k1, PASSPHRASE).unwrap();
        let dbg = format!("{:?} {:?} {:?}", key, key.seed(), key.secret_key());
        assert!(!dbg.contains(MASTER_SEED_HEX));
        assert!(!dbg.contains(&key.secret_key().to_hex()));
    }
}
