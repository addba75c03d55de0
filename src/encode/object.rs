//
// Copyright 2020 bplist Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

//! # Per-type object body encoders.
//!
//! One function per `ObjectFormat`, mirroring the decomposition of the
//! teacher's decode-side `nom` parsers in `crate::decode::parser::object`,
//! but writing bytes instead of consuming them. Every function returns the
//! complete encoding of one object: marker byte, optional extended-length
//! `Int` object, and body.

use crate::document::ObjectFormat;
use crate::error::{Error, Result};
use crate::value::{Date, Uid, Value};
use crate::width;

/// Encodes the marker byte (and, if `length >= 15`, the extended-length `Int`
/// object that follows it) for a container/variable-length object format.
fn first_byte(format: ObjectFormat, length: usize) -> Result<Vec<u8>> {
    if length < 15 {
        Ok(vec![format.tag_bits() | (length as u8)])
    } else {
        let mut bytes = vec![format.tag_bits() | 0x0F];
        bytes.extend(int_object(length as i64)?);
        Ok(bytes)
    }
}

/// Encodes a complete `Int` object (marker + body), used both for standalone
/// integer values and for extended-length prefixes.
pub fn int_object(value: i64) -> Result<Vec<u8>> {
    let exponent = width::minimum_int_exponent(value);
    let byte_width = 1usize << exponent;
    let mut bytes = vec![ObjectFormat::Int.tag_bits() | (exponent as u8)];
    // `value as u64` keeps the two's complement bit pattern; `pack_be` truncates
    // to the low `byte_width` bytes of it, which is exactly the narrower encoding.
    bytes.extend(width::pack_be(value as u64, byte_width));
    Ok(bytes)
}

/// Encodes the `Null` singleton.
pub fn null() -> Vec<u8> {
    vec![ObjectFormat::Null.tag_bits()]
}

/// Encodes the `False`/`True` singletons.
pub fn boolean(value: bool) -> Vec<u8> {
    vec![ObjectFormat::Boolean.tag_bits() | (value as u8)]
}

/// Encodes the `Fill` singleton.
pub fn fill() -> Vec<u8> {
    vec![ObjectFormat::Fill.tag_bits()]
}

/// Encodes a `Real` object, choosing 4 or 8 bytes depending on whether the
/// value round-trips losslessly through single precision.
pub fn real(value: f64) -> Vec<u8> {
    let exponent = width::minimum_real_exponent(value);
    let mut bytes = vec![ObjectFormat::Real.tag_bits() | (exponent as u8)];
    if exponent == 2 {
        bytes.extend((value as f32).to_be_bytes());
    } else {
        bytes.extend(value.to_be_bytes());
    }
    bytes
}

/// Encodes a `Date` object. Always 8 bytes wide (exponent 3), per the wire format.
pub fn date(date: &Date) -> Vec<u8> {
    let mut bytes = vec![ObjectFormat::Date.tag_bits() | 3];
    bytes.extend(date.absolute_time().to_be_bytes());
    bytes
}

/// Encodes a `Data` object.
pub fn data(bytes: &[u8]) -> Result<Vec<u8>> {
    let mut out = first_byte(ObjectFormat::Data, bytes.len())?;
    out.extend_from_slice(bytes);
    Ok(out)
}

/// Encodes an `AsciiString` object, failing if any character is outside the 7-bit range.
pub fn ascii_string(value: &str) -> Result<Vec<u8>> {
    if !value.is_ascii() {
        return Err(Error::AsciiRangeError);
    }
    let mut out = first_byte(ObjectFormat::AsciiString, value.len())?;
    out.extend_from_slice(value.as_bytes());
    Ok(out)
}

/// Encodes a `UnicodeString` object as UTF-16 big-endian code units.
pub fn unicode_string(value: &str) -> Result<Vec<u8>> {
    let units: Vec<u16> = value.encode_utf16().collect();
    let mut out = first_byte(ObjectFormat::Utf16String, units.len())?;
    for unit in units {
        out.extend_from_slice(&unit.to_be_bytes());
    }
    Ok(out)
}

/// Encodes a `Uid` object. The object-length nibble holds `width - 1`, so widths
/// run 1 through 8 rather than 1/2/4/8 as with `Int`.
pub fn uid(uid: &Uid) -> Vec<u8> {
    let width = width::minimum_unsigned_width(uid.0, 8).unwrap_or(8).max(1);
    let mut bytes = vec![ObjectFormat::Uid.tag_bits() | ((width - 1) as u8)];
    bytes.extend(width::pack_be(uid.0, width));
    bytes
}

/// Encodes an array body from its already-resolved element references.
pub fn array(references: &[usize], reference_size: usize) -> Result<Vec<u8>> {
    let mut out = first_byte(ObjectFormat::Array, references.len())?;
    for &r in references {
        out.extend(width::pack_be(r as u64, reference_size));
    }
    Ok(out)
}

/// Encodes a dictionary body from its already-resolved key/value references:
/// all key references first, then all value references, per the wire format.
pub fn dict(pairs: &[(usize, usize)], reference_size: usize) -> Result<Vec<u8>> {
    let mut out = first_byte(ObjectFormat::Dictionary, pairs.len())?;
    for &(k, _) in pairs {
        out.extend(width::pack_be(k as u64, reference_size));
    }
    for &(_, v) in pairs {
        out.extend(width::pack_be(v as u64, reference_size));
    }
    Ok(out)
}

/// Encodes any non-container `Value` leaf.
pub fn leaf(value: &Value) -> Result<Vec<u8>> {
    match value {
        Value::Null => Ok(null()),
        Value::False => Ok(boolean(false)),
        Value::True => Ok(boolean(true)),
        Value::Fill => Ok(fill()),
        Value::Int(i) => int_object(*i),
        Value::Real(f) => Ok(real(f.into_inner())),
        Value::Date(d) => Ok(date(d)),
        Value::Data(bytes) => data(bytes),
        Value::AsciiString(s) => ascii_string(s),
        Value::UnicodeString(s) => unicode_string(s),
        Value::Uid(u) => Ok(uid(u)),
        Value::Array(_) | Value::Dict(_) =>
            unreachable!("containers are encoded via the flattened pool, not `leaf`"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null() {
        assert_eq!(null(), vec![0x00]);
    }

    #[test]
    fn test_boolean() {
        assert_eq!(boolean(false), vec![0x08]);
        assert_eq!(boolean(true), vec![0x09]);
    }

    #[test]
    fn test_fill() {
        assert_eq!(fill(), vec![0x0F]);
    }

    #[test]
    fn test_int_small() {
        assert_eq!(int_object(5).unwrap(), vec![0x10, 0x05]);
    }

    #[test]
    fn test_int_negative() {
        assert_eq!(int_object(-1).unwrap(), vec![0x10, 0xFF]);
    }

    #[test]
    fn test_int_wide() {
        let encoded = int_object(1_000_000).unwrap();
        assert_eq!(encoded[0], 0x12);
        assert_eq!(encoded.len(), 5);
    }

    #[test]
    fn test_real_single_precision() {
        let encoded = real(2.5);
        assert_eq!(encoded[0], 0x22);
        assert_eq!(encoded.len(), 5);
    }

    #[test]
    fn test_real_double_precision() {
        let encoded = real(0.1);
        assert_eq!(encoded[0], 0x23);
        assert_eq!(encoded.len(), 9);
    }

    #[test]
    fn test_date_epoch() {
        let encoded = date(&Date::from_absolute_time(0.0));
        assert_eq!(encoded, vec![0x33, 0, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_ascii_string_rejects_non_ascii() {
        assert_eq!(ascii_string("héllo"), Err(Error::AsciiRangeError));
    }

    #[test]
    fn test_ascii_string_short() {
        assert_eq!(ascii_string("Hi").unwrap(), vec![0x52, b'H', b'i']);
    }

    #[test]
    fn test_unicode_string() {
        let encoded = unicode_string("Hi").unwrap();
        assert_eq!(encoded, vec![0x62, 0x00, b'H', 0x00, b'i']);
    }

    #[test]
    fn test_uid_small() {
        assert_eq!(uid(&Uid(0)), vec![0x80, 0x00]);
    }

    #[test]
    fn test_array_extended_length() {
        let references: Vec<usize> = (0 .. 16).collect();
        let encoded = array(&references, 1).unwrap();
        assert_eq!(encoded[0], 0xAF);
        assert_eq!(encoded[1], 0x10); // Int marker, width 1.
        assert_eq!(encoded[2], 16);
    }
}
