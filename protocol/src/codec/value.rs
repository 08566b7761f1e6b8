//! Field values: one variant per type code.

use super::amount::Amount;
use super::binary::{BinaryReader, BinaryWriter};
use super::path::PathSet;
use super::serializer::{read_array, read_object, write_array, write_object};
use super::types::TypeCode;
use super::CodecError;
use crate::config::ACCOUNT_ID_LENGTH;
use crate::crypto::AccountId;
use crate::object::{ArrayEntry, StObject};

/// A typed field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    UInt8(u8),
    UInt16(u16),
    UInt32(u32),
    UInt64(u64),
    Hash128([u8; 16]),
    Hash160([u8; 20]),
    Hash256([u8; 32]),
    Amount(Amount),
    Blob(Vec<u8>),
    AccountId(AccountId),
    Object(StObject),
    Array(Vec<ArrayEntry>),
    PathSet(PathSet),
    Vector256(Vec<[u8; 32]>),
}

impl FieldValue {
    pub fn type_code(&self) -> TypeCode {
        match self {
            Self::UInt8(_) => TypeCode::UInt8,
            Self::UInt16(_) => TypeCode::UInt16,
            Self::UInt32(_) => TypeCode::UInt32,
            Self::UInt64(_) => TypeCode::UInt64,
            Self::Hash128(_) => TypeCode::Hash128,
            Self::Hash160(_) => TypeCode::Hash160,
            Self::Hash256(_) => TypeCode::Hash256,
            Self::Amount(_) => TypeCode::Amount,
            Self::Blob(_) => TypeCode::Blob,
            Self::AccountId(_) => TypeCode::AccountId,
            Self::Object(_) => TypeCode::Object,
            Self::Array(_) => TypeCode::Array,
            Self::PathSet(_) => TypeCode::PathSet,
            Self::Vector256(_) => TypeCode::Vector256,
        }
    }

    /// Write the payload. The caller has already written the header.
    pub fn encode(&self, w: &mut BinaryWriter) -> Result<(), CodecError> {
        match self {
            Self::UInt8(v) => w.write_u8(*v),
            Self::UInt16(v) => w.write_u16(*v),
            Self::UInt32(v) => w.write_u32(*v),
            Self::UInt64(v) => w.write_u64(*v),
            Self::Hash128(h) => w.write_bytes(h),
            Self::Hash160(h) => w.write_bytes(h),
            Self::Hash256(h) => w.write_bytes(h),
            Self::Amount(a) => a.encode(w)?,
            Self::Blob(b) => w.write_vl(b)?,
            Self::AccountId(id) => w.write_vl(id.as_bytes())?,
            Self::Object(obj) => write_object(w, obj)?,
            Self::Array(entries) => write_array(w, entries)?,
            Self::PathSet(paths) => paths.encode(w)?,
            Self::Vector256(hashes) => {
                w.write_vl_length(hashes.len() * 32)?;
                for h in hashes {
                    w.write_bytes(h);
                }
            }
        }
        Ok(())
    }

    /// Read a payload of the given type, consuming exactly its bytes.
    pub fn decode(r: &mut BinaryReader<'_>, type_code: TypeCode) -> Result<Self, CodecError> {
        Self::decode_at(r, type_code, 1)
    }

    /// [`FieldValue::decode`] for a value nested `depth` levels below the
    /// top-level object.
    pub(crate) fn decode_at(
        r: &mut BinaryReader<'_>,
        type_code: TypeCode,
        depth: usize,
    ) -> Result<Self, CodecError> {
        Ok(match type_code {
            TypeCode::UInt8 => Self::UInt8(r.read_u8()?),
            TypeCode::UInt16 => Self::UInt16(r.read_u16()?),
            TypeCode::UInt32 => Self::UInt32(r.read_u32()?),
            TypeCode::UInt64 => Self::UInt64(r.read_u64()?),
            TypeCode::Hash128 => Self::Hash128(r.read_array()?),
            TypeCode::Hash160 => Self::Hash160(r.read_array()?),
            TypeCode::Hash256 => Self::Hash256(r.read_array()?),
            TypeCode::Amount => Self::Amount(Amount::decode(r)?),
            TypeCode::Blob => Self::Blob(r.read_vl()?.to_vec()),
            TypeCode::AccountId => {
                let bytes = r.read_vl()?;
                let id = AccountId::from_slice(bytes).ok_or(CodecError::InvalidLength {
                    expected: ACCOUNT_ID_LENGTH,
                    actual: bytes.len(),
                })?;
                Self::AccountId(id)
            }
            TypeCode::Object => Self::Object(read_object(r, depth)?),
            TypeCode::Array => Self::Array(read_array(r, depth)?),
            TypeCode::PathSet => Self::PathSet(PathSet::decode(r)?),
            TypeCode::Vector256 => {
                let bytes = r.read_vl()?;
                if bytes.len() % 32 != 0 {
                    return Err(CodecError::InvalidLength {
                        expected: bytes.len() / 32 * 32,
                        actual: bytes.len(),
                    });
                }
                let hashes = bytes
                    .chunks_exact(32)
                    .map(|chunk| {
                        let mut h = [0u8; 32];
                        h.copy_from_slice(chunk);
                        h
                    })
                    .collect();
                Self::Vector256(hashes)
            }
        })
    }
}
