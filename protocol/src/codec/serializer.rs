//! Whole-object serialization.
//!
//! An object is its fields in ascending [`FieldId`] order, each a header
//! followed by a payload. A nested object ends with the object end marker
//! and an array ends with the array end marker. The top-level object has
//! no marker: it ends where the input ends.

use super::binary::{BinaryReader, BinaryWriter};
use super::fields::{self, Field, ARRAY_END_MARKER, OBJECT_END_MARKER};
use super::types::{FieldId, TypeCode};
use super::value::FieldValue;
use super::CodecError;
use crate::config::MAX_NESTING_DEPTH;
use crate::object::{ArrayEntry, StObject};

/// Canonical binary encoding of a top-level object.
pub fn to_binary(obj: &StObject) -> Result<Vec<u8>, CodecError> {
    let mut w = BinaryWriter::with_capacity(256);
    write_fields(&mut w, obj, true)?;
    Ok(w.into_bytes())
}

/// Canonical encoding with non-signing fields (signatures, signer lists)
/// left out. This is what gets signed.
pub fn to_signing_binary(obj: &StObject) -> Result<Vec<u8>, CodecError> {
    let mut w = BinaryWriter::with_capacity(256);
    write_fields(&mut w, obj, false)?;
    Ok(w.into_bytes())
}

/// Parse a complete top-level object. Trailing bytes, truncation and
/// unknown fields are all errors.
pub fn parse_binary(bytes: &[u8]) -> Result<StObject, CodecError> {
    let mut r = BinaryReader::new(bytes);
    read_object(&mut r, 0)
}

fn field_for(id: FieldId) -> Result<&'static Field, CodecError> {
    fields::by_id(id).ok_or(CodecError::UnknownField {
        type_code: id.type_code.code(),
        field_code: id.field_code,
    })
}

pub(crate) fn write_fields(
    w: &mut BinaryWriter,
    obj: &StObject,
    include_non_signing: bool,
) -> Result<(), CodecError> {
    for (id, value) in obj.iter() {
        let field = field_for(*id)?;
        if !include_non_signing && !field.signing {
            continue;
        }
        if value.type_code() != field.type_code() {
            return Err(CodecError::TypeMismatch {
                field: field.name,
                expected: field.type_code(),
            });
        }
        w.write_field_header(*id);
        value.encode(w)?;
    }
    Ok(())
}

/// Nested object: all fields, then the end marker.
pub(crate) fn write_object(w: &mut BinaryWriter, obj: &StObject) -> Result<(), CodecError> {
    write_fields(w, obj, true)?;
    w.write_field_header(OBJECT_END_MARKER);
    Ok(())
}

pub(crate) fn write_array(w: &mut BinaryWriter, entries: &[ArrayEntry]) -> Result<(), CodecError> {
    for entry in entries {
        let field = field_for(entry.field)?;
        if field.type_code() != TypeCode::Object {
            return Err(CodecError::NotAnObject(field.name));
        }
        w.write_field_header(entry.field);
        write_object(w, &entry.object)?;
    }
    w.write_field_header(ARRAY_END_MARKER);
    Ok(())
}

enum Header {
    ObjectEnd,
    ArrayEnd,
    Field(&'static Field),
}

fn read_header(r: &mut BinaryReader<'_>) -> Result<Header, CodecError> {
    let (type_code, field_code) = r.read_field_header()?;
    let tc = TypeCode::from_code(type_code).ok_or(CodecError::UnknownType(type_code))?;
    let id = FieldId::new(tc, field_code);
    if id == OBJECT_END_MARKER {
        return Ok(Header::ObjectEnd);
    }
    if id == ARRAY_END_MARKER {
        return Ok(Header::ArrayEnd);
    }
    field_for(id).map(Header::Field)
}

/// Read fields until the input ends (depth 0, the top level) or the object
/// end marker (any deeper object).
pub(crate) fn read_object(r: &mut BinaryReader<'_>, depth: usize) -> Result<StObject, CodecError> {
    check_depth(depth)?;
    let nested = depth > 0;
    let mut obj = StObject::new();
    let mut last: Option<FieldId> = None;
    loop {
        if r.is_empty() {
            return if nested {
                Err(CodecError::MissingEndMarker)
            } else {
                Ok(obj)
            };
        }
        let field = match read_header(r)? {
            Header::ObjectEnd if nested => return Ok(obj),
            Header::ObjectEnd | Header::ArrayEnd => return Err(CodecError::UnexpectedEndMarker),
            Header::Field(field) => field,
        };
        match last {
            Some(prev) if prev == field.id => return Err(CodecError::DuplicateField(field.name)),
            Some(prev) if prev > field.id => return Err(CodecError::OutOfOrder(field.name)),
            _ => {}
        }
        let value = FieldValue::decode_at(r, field.type_code(), depth + 1)
            .map_err(|e| e.in_field(field.name))?;
        obj.insert(field.id, value);
        last = Some(field.id);
    }
}

/// Read array elements until the array end marker. Elements sit one level
/// below the array.
pub(crate) fn read_array(r: &mut BinaryReader<'_>, depth: usize) -> Result<Vec<ArrayEntry>, CodecError> {
    check_depth(depth)?;
    let mut entries = Vec::new();
    loop {
        if r.is_empty() {
            return Err(CodecError::MissingEndMarker);
        }
        let field = match read_header(r)? {
            Header::ArrayEnd => return Ok(entries),
            Header::ObjectEnd => return Err(CodecError::UnexpectedEndMarker),
            Header::Field(field) => field,
        };
        if field.type_code() != TypeCode::Object {
            return Err(CodecError::NotAnObject(field.name));
        }
        let object = read_object(r, depth + 1).map_err(|e| e.in_field(field.name))?;
        entries.push(ArrayEntry {
            field: field.id,
            object,
        });
    }
}

fn check_depth(depth: usize) -> Result<(), CodecError> {
    if depth > MAX_NESTING_DEPTH {
        Err(CodecError::TooDeep {
            max: MAX_NESTING_DEPTH,
        })
    } else {
        Ok(())
    }
}
