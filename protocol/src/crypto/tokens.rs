//! Base58check tokens and account IDs.
//!
//! Human-readable keys, seeds and addresses are base58check strings over
//! the ledger alphabet, each tagged with a one-byte token type. The type
//! byte is what makes seeds start with `s`, addresses with `r` and account
//! public keys with `a`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use super::hash::hash160;
use crate::config::{
    ACCOUNT_ID_LENGTH, TOKEN_ACCOUNT_ID, TOKEN_ACCOUNT_PUBLIC, TOKEN_ACCOUNT_SECRET,
    TOKEN_FAMILY_SEED, TOKEN_NODE_PRIVATE, TOKEN_NODE_PUBLIC,
};

/// The kinds of base58check token the tool reads or writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenType {
    AccountId,
    NodePublic,
    NodePrivate,
    FamilySeed,
    AccountSecret,
    AccountPublic,
}

impl TokenType {
    /// The version byte prepended to the payload.
    pub fn version(self) -> u8 {
        match self {
            TokenType::AccountId => TOKEN_ACCOUNT_ID,
            TokenType::NodePublic => TOKEN_NODE_PUBLIC,
            TokenType::NodePrivate => TOKEN_NODE_PRIVATE,
            TokenType::FamilySeed => TOKEN_FAMILY_SEED,
            TokenType::AccountSecret => TOKEN_ACCOUNT_SECRET,
            TokenType::AccountPublic => TOKEN_ACCOUNT_PUBLIC,
        }
    }
}

/// Encode `payload` as a base58check token of the given type.
pub fn encode_token(token: TokenType, payload: &[u8]) -> String {
    bs58::encode(payload)
        .with_alphabet(bs58::Alphabet::RIPPLE)
        .with_check_version(token.version())
        .into_string()
}

/// Decode a base58check token, returning the payload without its type byte.
///
/// `None` covers every failure: bad characters, bad checksum, wrong type.
pub fn decode_token(token: TokenType, text: &str) -> Option<Vec<u8>> {
    let decoded = bs58::decode(text)
        .with_alphabet(bs58::Alphabet::RIPPLE)
        .with_check(None)
        .into_vec()
        .ok()?;
    let (&version, payload) = decoded.split_first()?;
    (version == token.version()).then(|| payload.to_vec())
}

/// Decode a token whose payload must be exactly `N` bytes long.
pub fn decode_token_exact<const N: usize>(token: TokenType, text: &str) -> Option<[u8; N]> {
    decode_token(token, text)?.try_into().ok()
}

/// Errors from parsing an account address.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccountIdError {
    #[error("invalid account address: {0}")]
    InvalidAddress(String),
}

/// A 20-byte account identifier, `RIPEMD-160(SHA-256(public key))`.
///
/// Ordering is plain byte order, which is also the order signer entries
/// must appear in.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct AccountId([u8; ACCOUNT_ID_LENGTH]);

impl AccountId {
    pub fn from_bytes(bytes: [u8; ACCOUNT_ID_LENGTH]) -> Self {
        Self(bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        bytes.try_into().ok().map(Self)
    }

    /// Derive the account ID of a serialized public key.
    pub fn from_public_key(public_key: &[u8]) -> Self {
        Self(hash160(public_key))
    }

    pub fn as_bytes(&self) -> &[u8; ACCOUNT_ID_LENGTH] {
        &self.0
    }

    /// Base58 `r...` form.
    pub fn to_base58(&self) -> String {
        encode_token(TokenType::AccountId, &self.0)
    }
}

impl FromStr for AccountId {
    type Err = AccountIdError;

    /// Accepts the base58 address form, or 40 hex digits.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(bytes) = decode_token_exact::<ACCOUNT_ID_LENGTH>(TokenType::AccountId, s) {
            return Ok(Self(bytes));
        }
        if s.len() == ACCOUNT_ID_LENGTH * 2 {
            if let Ok(bytes) = hex::decode(s) {
                if let Some(id) = Self::from_slice(&bytes) {
                    return Ok(id);
                }
            }
        }
        Err(AccountIdError::InvalidAddress(s.to_string()))
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base58())
    }
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountId({})", self.to_base58())
    }
}

impl Serialize for AccountId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_base58())
    }
}

impl<'de> Deserialize<'de> for AccountId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GENESIS_ACCOUNT: &str = "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh";
    const GENESIS_ACCOUNT_HEX: &str = "B5F762798A53D543A014CAF8B297CFF8F2F937E8";

    #[test]
    fn account_zero_is_rrrr() {
        // The all-zero account ID is the well-known "ACCOUNT_ZERO".
        let zero = AccountId::default();
        assert_eq!(zero.to_base58(), "rrrrrrrrrrrrrrrrrrrrrhoLvTp");
    }

    #[test]
    fn account_roundtrip_through_base58() {
        let id: AccountId = GENESIS_ACCOUNT.parse().unwrap();
        assert_eq!(hex::encode_upper(id.as_bytes()), GENESIS_ACCOUNT_HEX);
        assert_eq!(id.to_string(), GENESIS_ACCOUNT);
    }

    #[test]
    fn account_accepts_hex() {
        let id: AccountId = GENESIS_ACCOUNT_HEX.parse().unwrap();
        assert_eq!(id.to_base58(), GENESIS_ACCOUNT);
    }

    #[test]
    fn account_rejects_bad_checksum() {
        // Last character altered.
        assert!("rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTj".parse::<AccountId>().is_err());
        assert!("not an address".parse::<AccountId>().is_err());
    }

    #[test]
    fn token_type_mismatch_is_rejected() {
        let seed_token = encode_token(TokenType::FamilySeed, &[7u8; 16]);
        assert!(seed_token.starts_with('s'));
        assert!(decode_token(TokenType::AccountId, &seed_token).is_none());
        assert_eq!(
            decode_token(TokenType::FamilySeed, &seed_token).unwrap(),
            vec![7u8; 16]
        );
    }

    #[test]
    fn decode_token_exact_checks_length() {
        let token = encode_token(TokenType::AccountId, &[1u8; 20]);
        assert!(decode_token_exact::<20>(TokenType::AccountId, &token).is_some());
        assert!(decode_token_exact::<16>(TokenType::AccountId, &token).is_none());
    }
}
