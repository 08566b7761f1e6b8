//! JSON mapping for objects.
//!
//! Member names map 1:1 onto the field table. Values take the ledger's
//! JSON conventions:
//!
//! | Type                 | JSON                                        |
//! |----------------------|---------------------------------------------|
//! | UInt8/16/32          | number (named codes render as names)       |
//! | UInt64               | 16 upper-case hex digits                    |
//! | Hash128/160/256, Blob| upper-case hex                              |
//! | AccountID            | `r...` address                              |
//! | Amount               | drops string, or `{currency,issuer,value}`  |
//! | STObject             | object                                      |
//! | STArray              | `[{"<Inner>": {...}}, ...]`                 |
//! | PathSet              | list of lists of steps                      |
//! | Vector256            | list of hex strings                         |
//!
//! Absent fields are omitted, never `null`.

use serde_json::{Map, Value};
use thiserror::Error;

use super::{ArrayEntry, StObject};
use crate::codec::fields::{self, Field, HASH_MEMBER};
use crate::codec::{Amount, CodecError, FieldValue, PathSet, TypeCode};
use crate::crypto::AccountId;
use crate::transaction::types::{LedgerEntryType, TransactionResult, TransactionType};

/// Errors mapping JSON onto fields.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FieldError {
    #[error("invalid JSON: {0}")]
    InvalidJson(String),

    #[error("expected a JSON object")]
    NotAnObject,

    #[error("unknown field '{0}'")]
    UnknownField(String),

    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    #[error("invalid value for field '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

impl FieldError {
    fn invalid(field: &Field, reason: impl Into<String>) -> Self {
        FieldError::InvalidValue {
            field: field.name,
            reason: reason.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Object -> JSON
// ---------------------------------------------------------------------------

/// Render an object as JSON.
pub fn to_json(obj: &StObject) -> Value {
    Value::Object(object_to_map(obj))
}

fn object_to_map(obj: &StObject) -> Map<String, Value> {
    obj.iter()
        .filter_map(|(id, value)| fields::by_id(*id).map(|f| (f.name.to_string(), value_to_json(f, value))))
        .collect()
}

fn value_to_json(field: &Field, value: &FieldValue) -> Value {
    match value {
        FieldValue::UInt8(v) => {
            if field.name == "TransactionResult" {
                if let Some(r) = TransactionResult::from_code(*v) {
                    return Value::from(r.name());
                }
            }
            Value::from(*v)
        }
        FieldValue::UInt16(v) => {
            let name = match field.name {
                "TransactionType" => TransactionType::from_code(*v).map(TransactionType::name),
                "LedgerEntryType" => LedgerEntryType::from_code(*v).map(LedgerEntryType::name),
                _ => None,
            };
            name.map(Value::from).unwrap_or_else(|| Value::from(*v))
        }
        FieldValue::UInt32(v) => Value::from(*v),
        FieldValue::UInt64(v) => Value::from(format!("{v:016X}")),
        FieldValue::Hash128(h) => Value::from(hex::encode_upper(h)),
        FieldValue::Hash160(h) => Value::from(hex::encode_upper(h)),
        FieldValue::Hash256(h) => Value::from(hex::encode_upper(h)),
        FieldValue::Amount(a) => a.to_json(),
        FieldValue::Blob(b) => Value::from(hex::encode_upper(b)),
        FieldValue::AccountId(a) => Value::from(a.to_base58()),
        FieldValue::Object(obj) => to_json(obj),
        FieldValue::Array(entries) => Value::Array(entries.iter().map(entry_to_json).collect()),
        FieldValue::PathSet(paths) => paths.to_json(),
        FieldValue::Vector256(hashes) => {
            Value::Array(hashes.iter().map(|h| Value::from(hex::encode_upper(h))).collect())
        }
    }
}

fn entry_to_json(entry: &ArrayEntry) -> Value {
    let mut map = Map::new();
    if let Some(field) = fields::by_id(entry.field) {
        map.insert(field.name.to_string(), to_json(&entry.object));
    }
    Value::Object(map)
}

// ---------------------------------------------------------------------------
// JSON -> Object
// ---------------------------------------------------------------------------

/// Parse JSON text into an object.
pub fn parse_json_str(text: &str) -> Result<StObject, FieldError> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| FieldError::InvalidJson(e.to_string()))?;
    parse_json(&value)
}

/// Map a JSON object onto fields.
///
/// A top-level `hash` member is ignored: it is the transaction ID of signed
/// output, computed rather than serialized.
pub fn parse_json(json: &Value) -> Result<StObject, FieldError> {
    let map = json.as_object().ok_or(FieldError::NotAnObject)?;
    map_to_object(map, true)
}

fn map_to_object(map: &Map<String, Value>, top_level: bool) -> Result<StObject, FieldError> {
    let mut obj = StObject::new();
    for (name, value) in map {
        if top_level && name == HASH_MEMBER {
            continue;
        }
        let field = fields::by_name(name).ok_or_else(|| FieldError::UnknownField(name.clone()))?;
        obj.insert(field.id, value_from_json(field, value)?);
    }
    Ok(obj)
}

fn value_from_json(field: &'static Field, json: &Value) -> Result<FieldValue, FieldError> {
    let codec = |e: CodecError| FieldError::invalid(field, e.to_string());

    Ok(match field.type_code() {
        TypeCode::UInt8 => {
            let named = (field.name == "TransactionResult")
                .then(|| json.as_str().and_then(|s| s.parse::<TransactionResult>().ok()))
                .flatten();
            match named {
                Some(r) => FieldValue::UInt8(r.code()),
                None => FieldValue::UInt8(unsigned(field, json)?),
            }
        }
        TypeCode::UInt16 => {
            let named = json.as_str().and_then(|s| match field.name {
                "TransactionType" => s.parse::<TransactionType>().ok().map(TransactionType::code),
                "LedgerEntryType" => s.parse::<LedgerEntryType>().ok().map(LedgerEntryType::code),
                _ => None,
            });
            match named {
                Some(code) => FieldValue::UInt16(code),
                None => FieldValue::UInt16(unsigned(field, json)?),
            }
        }
        TypeCode::UInt32 => FieldValue::UInt32(unsigned(field, json)?),
        TypeCode::UInt64 => FieldValue::UInt64(uint64(field, json)?),
        TypeCode::Hash128 => FieldValue::Hash128(fixed_hex(field, json)?),
        TypeCode::Hash160 => FieldValue::Hash160(fixed_hex(field, json)?),
        TypeCode::Hash256 => FieldValue::Hash256(fixed_hex(field, json)?),
        TypeCode::Amount => FieldValue::Amount(Amount::from_json(json).map_err(codec)?),
        TypeCode::Blob => FieldValue::Blob(hex_string(field, json)?),
        TypeCode::AccountId => {
            let text = json
                .as_str()
                .ok_or_else(|| FieldError::invalid(field, "expected an address string"))?;
            let id: AccountId = text
                .parse()
                .map_err(|_| FieldError::invalid(field, format!("bad address {text}")))?;
            FieldValue::AccountId(id)
        }
        TypeCode::Object => {
            let map = json
                .as_object()
                .ok_or_else(|| FieldError::invalid(field, "expected an object"))?;
            FieldValue::Object(map_to_object(map, false)?)
        }
        TypeCode::Array => FieldValue::Array(array_from_json(field, json)?),
        TypeCode::PathSet => FieldValue::PathSet(PathSet::from_json(json).map_err(codec)?),
        TypeCode::Vector256 => {
            let items = json
                .as_array()
                .ok_or_else(|| FieldError::invalid(field, "expected a list of hashes"))?;
            FieldValue::Vector256(
                items
                    .iter()
                    .map(|item| fixed_hex(field, item))
                    .collect::<Result<_, _>>()?,
            )
        }
    })
}

fn array_from_json(field: &'static Field, json: &Value) -> Result<Vec<ArrayEntry>, FieldError> {
    let items = json
        .as_array()
        .ok_or_else(|| FieldError::invalid(field, "expected a list"))?;
    items
        .iter()
        .map(|item| {
            let wrapper = item
                .as_object()
                .filter(|m| m.len() == 1)
                .ok_or_else(|| FieldError::invalid(field, "elements must be single-member objects"))?;
            let (name, inner) = wrapper
                .iter()
                .next()
                .ok_or_else(|| FieldError::invalid(field, "empty element"))?;
            let inner_field =
                fields::by_name(name).ok_or_else(|| FieldError::UnknownField(name.clone()))?;
            if inner_field.type_code() != TypeCode::Object {
                return Err(FieldError::invalid(field, format!("{name} is not an object field")));
            }
            let map = inner
                .as_object()
                .ok_or_else(|| FieldError::invalid(inner_field, "expected an object"))?;
            Ok(ArrayEntry {
                field: inner_field.id,
                object: map_to_object(map, false)?,
            })
        })
        .collect()
}

/// A number, or a decimal string, that fits in `T`.
fn unsigned<T: TryFrom<u64>>(field: &Field, json: &Value) -> Result<T, FieldError> {
    let wide = match json {
        Value::Number(n) => n.as_u64(),
        Value::String(s) if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => s.parse().ok(),
        _ => None,
    }
    .ok_or_else(|| FieldError::invalid(field, format!("expected an unsigned integer, got {json}")))?;
    T::try_from(wide).map_err(|_| FieldError::invalid(field, format!("{wide} is out of range")))
}

/// Hex string of up to 16 digits, or a plain number.
fn uint64(field: &Field, json: &Value) -> Result<u64, FieldError> {
    match json {
        Value::String(s) if (1..=16).contains(&s.len()) => {
            u64::from_str_radix(s, 16).map_err(|_| FieldError::invalid(field, format!("bad hex {s}")))
        }
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| FieldError::invalid(field, format!("{n} is out of range"))),
        other => Err(FieldError::invalid(field, format!("expected a hex string, got {other}"))),
    }
}

fn hex_string(field: &Field, json: &Value) -> Result<Vec<u8>, FieldError> {
    let text = json
        .as_str()
        .ok_or_else(|| FieldError::invalid(field, "expected a hex string"))?;
    hex::decode(text).map_err(|_| FieldError::invalid(field, format!("bad hex {text}")))
}

fn fixed_hex<const N: usize>(field: &Field, json: &Value) -> Result<[u8; N], FieldError> {
    let bytes = hex_string(field, json)?;
    let len = bytes.len();
    bytes
        .try_into()
        .map_err(|_| FieldError::invalid(field, format!("expected {N} bytes, got {len}")))
}
