//! Byte-level reading and writing: integers, field headers and
//! variable-length prefixes.
//!
//! ## Field headers
//!
//! ```text
//! type < 16,  field < 16   ->  [type << 4 | field]
//! type < 16,  field >= 16  ->  [type << 4, field]
//! type >= 16, field < 16   ->  [field, type]
//! type >= 16, field >= 16  ->  [0, type, field]
//! ```
//!
//! ## Length prefixes
//!
//! ```text
//! 0      ..= 192     ->  [len]
//! 193    ..= 12480   ->  [193 + (l >> 8), l & 0xFF]                   l = len - 193
//! 12481  ..= 918744  ->  [241 + (l >> 16), (l >> 8) & 0xFF, l & 0xFF]  l = len - 12481
//! ```

use super::types::FieldId;
use super::CodecError;
use crate::config::{VL_TIER_ONE_MAX, VL_TIER_THREE_MAX, VL_TIER_TWO_MAX};

/// Append-only output buffer.
#[derive(Debug, Default, Clone)]
pub struct BinaryWriter {
    buf: Vec<u8>,
}

impl BinaryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    pub fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    pub fn write_u16(&mut self, v: u16) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    pub fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    pub fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub fn write_field_header(&mut self, id: FieldId) {
        // Field codes above 255 are never serialized; the table holds none.
        let t = id.type_code.code() as u8;
        let f = id.field_code as u8;
        match (t < 16, f < 16) {
            (true, true) => self.write_u8((t << 4) | f),
            (true, false) => {
                self.write_u8(t << 4);
                self.write_u8(f);
            }
            (false, true) => {
                self.write_u8(f);
                self.write_u8(t);
            }
            (false, false) => {
                self.write_u8(0);
                self.write_u8(t);
                self.write_u8(f);
            }
        }
    }

    pub fn write_vl_length(&mut self, len: usize) -> Result<(), CodecError> {
        if len <= VL_TIER_ONE_MAX {
            self.write_u8(len as u8);
        } else if len <= VL_TIER_TWO_MAX {
            let l = len - (VL_TIER_ONE_MAX + 1);
            self.write_u8(193 + (l >> 8) as u8);
            self.write_u8((l & 0xFF) as u8);
        } else if len <= VL_TIER_THREE_MAX {
            let l = len - (VL_TIER_TWO_MAX + 1);
            self.write_u8(241 + (l >> 16) as u8);
            self.write_u8(((l >> 8) & 0xFF) as u8);
            self.write_u8((l & 0xFF) as u8);
        } else {
            return Err(CodecError::LengthTooLarge(len));
        }
        Ok(())
    }

    /// Length prefix followed by the bytes.
    pub fn write_vl(&mut self, bytes: &[u8]) -> Result<(), CodecError> {
        self.write_vl_length(bytes.len())?;
        self.write_bytes(bytes);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

/// Cursor over an input buffer. Every read either consumes exactly what it
/// asked for or fails with [`CodecError::Truncated`].
#[derive(Debug, Clone)]
pub struct BinaryReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> BinaryReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], CodecError> {
        if n > self.remaining() {
            return Err(CodecError::Truncated {
                needed: n,
                available: self.remaining(),
            });
        }
        let out = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], CodecError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8, CodecError> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16, CodecError> {
        self.read_array().map(u16::from_be_bytes)
    }

    pub fn read_u32(&mut self) -> Result<u32, CodecError> {
        self.read_array().map(u32::from_be_bytes)
    }

    pub fn read_u64(&mut self) -> Result<u64, CodecError> {
        self.read_array().map(u64::from_be_bytes)
    }

    /// Read a field header, returning raw `(type code, field code)`.
    ///
    /// Headers that spend an extra byte on a code that would have fit in
    /// four bits are not canonical and rejected.
    pub fn read_field_header(&mut self) -> Result<(u16, u16), CodecError> {
        let first = self.read_u8()?;
        let mut type_code = u16::from(first >> 4);
        let mut field_code = u16::from(first & 0x0F);

        if type_code == 0 {
            type_code = u16::from(self.read_u8()?);
            if type_code < 16 {
                return Err(CodecError::NonCanonicalHeader);
            }
        }
        if field_code == 0 {
            field_code = u16::from(self.read_u8()?);
            if field_code < 16 {
                return Err(CodecError::NonCanonicalHeader);
            }
        }
        Ok((type_code, field_code))
    }

    pub fn read_vl_length(&mut self) -> Result<usize, CodecError> {
        let b1 = usize::from(self.read_u8()?);
        let len = match b1 {
            0..=192 => b1,
            193..=240 => {
                let b2 = usize::from(self.read_u8()?);
                VL_TIER_ONE_MAX + 1 + (b1 - 193) * 256 + b2
            }
            241..=254 => {
                let b2 = usize::from(self.read_u8()?);
                let b3 = usize::from(self.read_u8()?);
                VL_TIER_TWO_MAX + 1 + (b1 - 241) * 65_536 + b2 * 256 + b3
            }
            _ => return Err(CodecError::InvalidLengthPrefix(b1 as u8)),
        };
        Ok(len)
    }

    /// Read a length prefix and then that many bytes.
    pub fn read_vl(&mut self) -> Result<&'a [u8], CodecError> {
        let len = self.read_vl_length()?;
        self.read_bytes(len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::types::TypeCode;

    fn header(t: TypeCode, f: u16) -> Vec<u8> {
        let mut w = BinaryWriter::new();
        w.write_field_header(FieldId::new(t, f));
        w.into_bytes()
    }

    fn vl(len: usize) -> Vec<u8> {
        let mut w = BinaryWriter::new();
        w.write_vl_length(len).unwrap();
        w.into_bytes()
    }

    #[test]
    fn header_widths() {
        assert_eq!(header(TypeCode::UInt16, 2), vec![0x12]);
        assert_eq!(header(TypeCode::UInt32, 27), vec![0x20, 0x1B]);
        assert_eq!(header(TypeCode::UInt8, 3), vec![0x03, 0x10]);
        assert_eq!(header(TypeCode::UInt8, 16), vec![0x00, 0x10, 0x10]);
    }

    #[test]
    fn headers_read_back() {
        for (t, f) in [
            (TypeCode::UInt16, 2),
            (TypeCode::UInt32, 27),
            (TypeCode::UInt8, 3),
            (TypeCode::Vector256, 200),
        ] {
            let bytes = header(t, f);
            let mut r = BinaryReader::new(&bytes);
            assert_eq!(r.read_field_header().unwrap(), (t.code(), f));
            assert!(r.is_empty());
        }
    }

    #[test]
    fn padded_header_is_rejected() {
        // Type 2 written long-form.
        let mut r = BinaryReader::new(&[0x04, 0x02]);
        assert_eq!(r.read_field_header(), Err(CodecError::NonCanonicalHeader));
    }

    #[test]
    fn vl_tier_boundaries() {
        assert_eq!(vl(0), vec![0]);
        assert_eq!(vl(192), vec![192]);
        assert_eq!(vl(193), vec![193, 0]);
        assert_eq!(vl(12_480), vec![240, 255]);
        assert_eq!(vl(12_481), vec![241, 0, 0]);
        assert_eq!(vl(918_744), vec![254, 212, 23]);
    }

    #[test]
    fn vl_lengths_read_back() {
        for len in [0, 1, 192, 193, 500, 12_480, 12_481, 100_000, 918_744] {
            let bytes = vl(len);
            assert_eq!(BinaryReader::new(&bytes).read_vl_length().unwrap(), len);
        }
    }

    #[test]
    fn vl_over_limit_is_rejected() {
        let mut w = BinaryWriter::new();
        assert_eq!(
            w.write_vl_length(918_745),
            Err(CodecError::LengthTooLarge(918_745))
        );
        let mut r = BinaryReader::new(&[255]);
        assert_eq!(r.read_vl_length(), Err(CodecError::InvalidLengthPrefix(255)));
    }

    #[test]
    fn reads_past_end_fail() {
        let mut r = BinaryReader::new(&[1, 2, 3]);
        assert!(r.read_u32().is_err());
        // A failed read consumes nothing.
        assert_eq!(r.remaining(), 3);

        let mut r = BinaryReader::new(&[5, 1, 2]);
        assert!(matches!(r.read_vl(), Err(CodecError::Truncated { .. })));
    }
}
