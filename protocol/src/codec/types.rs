//! Type codes and field identifiers.
//!
//! A field is named on the wire by its `(type code, field code)` pair, and
//! the same pair fixes its position in canonical order.

use std::cmp::Ordering;
use std::fmt;

/// The serialized types the codec understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u16)]
pub enum TypeCode {
    UInt16 = 1,
    UInt32 = 2,
    UInt64 = 3,
    Hash128 = 4,
    Hash256 = 5,
    Amount = 6,
    Blob = 7,
    AccountId = 8,
    Object = 14,
    Array = 15,
    UInt8 = 16,
    Hash160 = 17,
    PathSet = 18,
    Vector256 = 19,
}

impl TypeCode {
    pub fn code(self) -> u16 {
        self as u16
    }

    pub fn from_code(code: u16) -> Option<Self> {
        Some(match code {
            1 => Self::UInt16,
            2 => Self::UInt32,
            3 => Self::UInt64,
            4 => Self::Hash128,
            5 => Self::Hash256,
            6 => Self::Amount,
            7 => Self::Blob,
            8 => Self::AccountId,
            14 => Self::Object,
            15 => Self::Array,
            16 => Self::UInt8,
            17 => Self::Hash160,
            18 => Self::PathSet,
            19 => Self::Vector256,
            _ => return None,
        })
    }

    /// Whether the payload carries a variable-length prefix.
    pub fn is_vl_encoded(self) -> bool {
        matches!(self, Self::Blob | Self::AccountId | Self::Vector256)
    }
}

impl fmt::Display for TypeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::UInt16 => "UInt16",
            Self::UInt32 => "UInt32",
            Self::UInt64 => "UInt64",
            Self::Hash128 => "Hash128",
            Self::Hash256 => "Hash256",
            Self::Amount => "Amount",
            Self::Blob => "Blob",
            Self::AccountId => "AccountID",
            Self::Object => "STObject",
            Self::Array => "STArray",
            Self::UInt8 => "UInt8",
            Self::Hash160 => "Hash160",
            Self::PathSet => "PathSet",
            Self::Vector256 => "Vector256",
        };
        f.write_str(name)
    }
}

/// A field identifier: `(type code, field code)`.
///
/// Ordering is ascending by type code, then field code. This is the
/// canonical order every object is serialized in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldId {
    pub type_code: TypeCode,
    pub field_code: u16,
}

impl FieldId {
    pub const fn new(type_code: TypeCode, field_code: u16) -> Self {
        Self {
            type_code,
            field_code,
        }
    }

    /// The sort key the ledger uses: `(type << 16) | field`.
    pub fn sort_key(&self) -> u32 {
        (u32::from(self.type_code.code()) << 16) | u32::from(self.field_code)
    }
}

impl Ord for FieldId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl PartialOrd for FieldId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.type_code, self.field_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_is_type_then_field() {
        let a = FieldId::new(TypeCode::UInt16, 200);
        let b = FieldId::new(TypeCode::UInt32, 1);
        let c = FieldId::new(TypeCode::UInt32, 2);
        let d = FieldId::new(TypeCode::UInt8, 1);
        let mut ids = vec![d, c, b, a];
        ids.sort();
        assert_eq!(ids, vec![a, b, c, d]);
    }

    #[test]
    fn type_codes_roundtrip() {
        for code in 0..32u16 {
            if let Some(tc) = TypeCode::from_code(code) {
                assert_eq!(tc.code(), code);
            }
        }
        assert_eq!(TypeCode::from_code(9), None);
        assert_eq!(TypeCode::from_code(10001), None);
    }
}
