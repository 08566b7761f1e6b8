//! Signing data, signing hashes and the two ways of signing.
//!
//! A single signature covers `STX\0` followed by the canonical encoding
//! without non-signing fields. Each multi-signature covers `SMT\0`, the same
//! encoding, and the signer's 20-byte account as a suffix, so signers never
//! sign each other's entries.

use thiserror::Error;

use crate::codec::fields::{ACCOUNT, FEE, SEQUENCE, SIGNER, SIGNERS, SIGNING_PUB_KEY, TRANSACTION_TYPE, TXN_SIGNATURE};
use crate::codec::{to_binary, to_signing_binary, CodecError, FieldId, FieldValue};
use crate::config::{HASH_PREFIX_TRANSACTION_ID, HASH_PREFIX_TX_MULTI_SIGN, HASH_PREFIX_TX_SIGN};
use crate::crypto::hash::sha512_half_multi;
use crate::crypto::{sha512_half, AccountId, Hash256, SignatureError, SigningKey};
use crate::object::{ArrayEntry, StObject};

/// Errors from signing or checking signatures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignError {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Signature(#[from] SignatureError),

    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    #[error("transaction is not signed")]
    Unsigned,

    #[error("signature does not verify against SigningPubKey")]
    BadSignature,

    #[error("transaction carries both TxnSignature and Signers")]
    MixedSignatures,

    #[error("Signers must not be empty")]
    EmptySigners,

    #[error("malformed signer entry: {0}")]
    MalformedSigner(&'static str),

    #[error("Signers are not in strictly ascending account order at {0}")]
    UnsortedSigners(AccountId),

    #[error("signer {0} is the transaction's own account")]
    SignerIsAccount(AccountId),

    #[error("signature of signer {0} does not verify")]
    BadSignerSignature(AccountId),
}

/// Which signature a signing hash is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SigningMode {
    Single,
    /// One signer of a multi-signed transaction.
    Multi(AccountId),
}

/// The bytes a signature covers.
pub fn signing_data(tx: &StObject, mode: SigningMode) -> Result<Vec<u8>, CodecError> {
    let body = to_signing_binary(tx)?;
    let mut data = Vec::with_capacity(4 + body.len() + 20);
    match mode {
        SigningMode::Single => {
            data.extend_from_slice(&HASH_PREFIX_TX_SIGN.to_be_bytes());
            data.extend_from_slice(&body);
        }
        SigningMode::Multi(signer) => {
            data.extend_from_slice(&HASH_PREFIX_TX_MULTI_SIGN.to_be_bytes());
            data.extend_from_slice(&body);
            data.extend_from_slice(signer.as_bytes());
        }
    }
    Ok(data)
}

/// SHA-512-half of [`signing_data`]. This is what secp256k1 keys sign.
pub fn signing_hash(tx: &StObject, mode: SigningMode) -> Result<Hash256, CodecError> {
    Ok(sha512_half(&signing_data(tx, mode)?))
}

/// The transaction ID: SHA-512-half over `TXN\0` and the full encoding,
/// signatures included.
pub fn transaction_id(tx: &StObject) -> Result<Hash256, CodecError> {
    let prefix = HASH_PREFIX_TRANSACTION_ID.to_be_bytes();
    Ok(sha512_half_multi(&[&prefix[..], &to_binary(tx)?[..]]))
}

/// Fields every transaction must carry before it can be signed.
const REQUIRED_FIELDS: [(FieldId, &str); 4] = [
    (TRANSACTION_TYPE, "TransactionType"),
    (ACCOUNT, "Account"),
    (SEQUENCE, "Sequence"),
    (FEE, "Fee"),
];

/// The first required field `tx` lacks.
pub(crate) fn missing_required_field(tx: &StObject) -> Option<&'static str> {
    REQUIRED_FIELDS
        .iter()
        .find(|(id, _)| !tx.contains(*id))
        .map(|(_, name)| *name)
}

fn check_required_fields(tx: &StObject) -> Result<(), SignError> {
    match missing_required_field(tx) {
        Some(name) => Err(SignError::MissingField(name)),
        None => Ok(()),
    }
}

/// Sign `tx` in place with a single signature.
///
/// Any signer list is removed and any earlier signature is overwritten.
pub fn single_sign(tx: &mut StObject, key: &SigningKey) -> Result<(), SignError> {
    check_required_fields(tx)?;
    tx.remove(SIGNERS);
    tx.remove(TXN_SIGNATURE);
    tx.insert(SIGNING_PUB_KEY, FieldValue::Blob(key.public_key().as_bytes().to_vec()));

    let signature = key.sign(&signing_data(tx, SigningMode::Single)?)?;
    tx.insert(TXN_SIGNATURE, FieldValue::Blob(signature));
    Ok(())
}

/// Add `key`'s signature to the signer list of `tx`.
///
/// `SigningPubKey` is set to empty and any single signature is removed. The
/// new entry goes where its account belongs in ascending order, replacing
/// an entry for the same account. A signer that is the transaction's own
/// `Account` is still added; [`verify_signatures`] rejects it.
///
/// [`verify_signatures`]: super::verify_signatures
pub fn multi_sign(tx: &mut StObject, key: &SigningKey) -> Result<(), SignError> {
    check_required_fields(tx)?;
    let signer = key.account_id();

    tx.insert(SIGNING_PUB_KEY, FieldValue::Blob(Vec::new()));
    tx.remove(TXN_SIGNATURE);

    let signature = key.sign(&signing_data(tx, SigningMode::Multi(signer))?)?;

    let mut entry = StObject::new();
    entry.insert(ACCOUNT, FieldValue::AccountId(signer));
    entry.insert(SIGNING_PUB_KEY, FieldValue::Blob(key.public_key().as_bytes().to_vec()));
    entry.insert(TXN_SIGNATURE, FieldValue::Blob(signature));
    let entry = ArrayEntry {
        field: SIGNER,
        object: entry,
    };

    let mut signers = match tx.remove(SIGNERS) {
        Some(FieldValue::Array(entries)) => entries,
        _ => Vec::new(),
    };
    let mut position = signers.len();
    for (i, existing) in signers.iter().enumerate() {
        let account = existing
            .object
            .get_account(ACCOUNT)
            .ok_or(SignError::MalformedSigner("Account"))?;
        if account >= signer {
            position = i;
            break;
        }
    }
    let replaces = signers
        .get(position)
        .and_then(|e| e.object.get_account(ACCOUNT))
        == Some(signer);
    if replaces {
        signers[position] = entry;
    } else {
        signers.insert(position, entry);
    }
    tx.insert(SIGNERS, FieldValue::Array(signers));
    Ok(())
}
