//! Operations behind each command of the command-line tool.
//!
//! Every function takes the raw text a user supplied and returns either the
//! text-ready result or a [`ToolError`]. Reading input, guarding files and
//! printing are the caller's job.

use serde_json::Value;
use thiserror::Error;

use crate::codec::fields::HASH_MEMBER;
use crate::codec::{parse_binary, to_binary, CodecError};
use crate::crypto::{KeyError, KeyType, SigningKey};
use crate::keyfile::{KeyFileError, KeyFileRecord};
use crate::object::{parse_json_str, to_json, FieldError, StObject};
use crate::transaction::{multi_sign, single_sign, transaction_id, SignError};

/// Any failure of a tool operation.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Field(#[from] FieldError),

    #[error(transparent)]
    Sign(#[from] SignError),

    #[error(transparent)]
    Key(#[from] KeyError),

    #[error(transparent)]
    KeyFile(#[from] KeyFileError),
}

/// JSON transaction text to upper-case hex of its canonical encoding.
pub fn serialize_from_json(text: &str) -> Result<String, ToolError> {
    let tx = parse_json_str(text.trim())?;
    Ok(hex::encode_upper(to_binary(&tx)?))
}

/// Hex of a canonical encoding to its JSON form.
pub fn deserialize_to_json(text: &str) -> Result<Value, ToolError> {
    let bytes = hex::decode(text.trim()).map_err(|_| CodecError::InvalidHex)?;
    Ok(to_json(&parse_binary(&bytes)?))
}

/// A transaction given as hex binary, or failing that, as JSON.
pub fn make_transaction(text: &str) -> Result<StObject, ToolError> {
    let text = text.trim();
    match hex::decode(text) {
        Ok(bytes) if !bytes.is_empty() => Ok(parse_binary(&bytes)?),
        _ => Ok(parse_json_str(text)?),
    }
}

/// JSON of a signed transaction with its ID in the `hash` member.
pub fn signed_json(tx: &StObject) -> Result<Value, ToolError> {
    let id = transaction_id(tx)?;
    let mut json = to_json(tx);
    if let Value::Object(map) = &mut json {
        map.insert(HASH_MEMBER.to_string(), Value::from(hex::encode_upper(id)));
    }
    Ok(json)
}

/// Sign a transaction with a single signature.
pub fn sign_single(text: &str, key: &SigningKey) -> Result<Value, ToolError> {
    let mut tx = make_transaction(text)?;
    single_sign(&mut tx, key)?;
    signed_json(&tx)
}

/// Add one signer to a transaction's signer list.
pub fn sign_multi(text: &str, key: &SigningKey) -> Result<Value, ToolError> {
    let mut tx = make_transaction(text)?;
    multi_sign(&mut tx, key)?;
    signed_json(&tx)
}

/// A new key from an optional key type name and optional seed text.
///
/// No seed text means a random seed. No key type means secp256k1.
pub fn create_key(key_type: Option<&str>, seed_text: Option<&str>) -> Result<SigningKey, ToolError> {
    let key_type = key_type.map(str::parse::<KeyType>).transpose()?;
    Ok(SigningKey::from_options(key_type, seed_text)?)
}

/// The record a repaired key file holds: every member derived afresh.
pub fn repair_key_file(key: &SigningKey) -> KeyFileRecord {
    KeyFileRecord::from_key(key)
}
