//! # Field Codec & Canonical Serializer
//!
//! Turns typed field values into the ledger's canonical binary form and
//! back.
//!
//! ```text
//! types.rs      : TypeCode and FieldId, the canonical sort key
//! fields.rs     : the fixed table of named fields
//! binary.rs     : integers, field headers, length prefixes
//! amount.rs     : native and issued amounts, currency codes
//! path.rs       : payment path sets
//! value.rs      : FieldValue, one variant per type code
//! serializer.rs : whole objects: to_binary / parse_binary
//! ```
//!
//! Every decode either consumes exactly the bytes of what it read or fails.
//! There are no partial results.

use thiserror::Error;

pub mod amount;
pub mod binary;
pub mod fields;
pub mod path;
pub mod serializer;
pub mod types;
pub mod value;

pub use amount::{Amount, Currency, IssuedValue};
pub use fields::Field;
pub use path::{PathSet, PathStep};
pub use serializer::{parse_binary, to_binary, to_signing_binary};
pub use types::{FieldId, TypeCode};
pub use value::FieldValue;

/// Errors from encoding or decoding binary data.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("unexpected end of input: needed {needed} bytes, {available} left")]
    Truncated { needed: usize, available: usize },

    #[error("unknown type code {0}")]
    UnknownType(u16),

    #[error("unknown field {type_code}:{field_code}")]
    UnknownField { type_code: u16, field_code: u16 },

    #[error("field header is not in canonical form")]
    NonCanonicalHeader,

    #[error("invalid length prefix byte {0:#04x}")]
    InvalidLengthPrefix(u8),

    #[error("length {0} exceeds the largest encodable length")]
    LengthTooLarge(usize),

    #[error("invalid length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("invalid currency: {0}")]
    InvalidCurrency(String),

    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("field {field} holds a value of the wrong type, expected {expected}")]
    TypeMismatch {
        field: &'static str,
        expected: TypeCode,
    },

    #[error("duplicate field {0}")]
    DuplicateField(&'static str),

    #[error("field {0} is out of canonical order")]
    OutOfOrder(&'static str),

    #[error("end marker outside of a nested object or array")]
    UnexpectedEndMarker,

    #[error("nested object or array is missing its end marker")]
    MissingEndMarker,

    #[error("objects and arrays nested deeper than {max} levels")]
    TooDeep { max: usize },

    #[error("array element {0} is not an object")]
    NotAnObject(&'static str),

    #[error("input is not valid hex")]
    InvalidHex,

    #[error("malformed field {field}: {source}")]
    MalformedField {
        field: &'static str,
        #[source]
        source: Box<CodecError>,
    },
}

impl CodecError {
    /// Attach the name of the field being decoded, once.
    pub(crate) fn in_field(self, field: &'static str) -> Self {
        match self {
            already @ CodecError::MalformedField { .. } => already,
            other => CodecError::MalformedField {
                field,
                source: Box::new(other),
            },
        }
    }
}
