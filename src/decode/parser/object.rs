//
// Copyright 2020 bplist Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

use ascii::{AsciiStr, AsAsciiStrError};
use nom::{
    IResult,
    branch::alt,
    bytes::complete::take,
    combinator::{map, map_res, verify},
    multi::many_m_n,
    number::complete::{be_u16, be_f32, be_f64},
    sequence::tuple,
};

use std::convert::TryFrom;
use std::string::FromUtf16Error;

use crate::document::ObjectFormat;
use crate::decode::parser::utils::{be_u64_n, be_usize_n};
use crate::error::Error;

/// Returns a parser which consumes a marker conforming to the specified format.
/// On success, the parser yields both the validated format and the encoded value.
pub fn marker(
    format: ObjectFormat
) -> impl Fn(&[u8]) -> IResult<&[u8], (ObjectFormat, u8)> {
    move |input: &[u8]| {
        map(
            verify(take(1usize), move |b: &[u8]| -> bool {
                (b[0] & format.tag_mask()) == format.tag_bits()
            }),
            move |b: &[u8]| -> (ObjectFormat, u8) {
                (format, b[0] & format.value_mask())
            }
        )(input)
    }
}

/// Parses a marker byte and returns both the object format and encoded value.
pub fn any_marker(input: &[u8]) -> IResult<&[u8], (ObjectFormat, u8)> {
    alt((
        marker(ObjectFormat::Null),
        marker(ObjectFormat::Boolean),
        marker(ObjectFormat::Fill),
        marker(ObjectFormat::Int),
        marker(ObjectFormat::Real),
        marker(ObjectFormat::Date),
        marker(ObjectFormat::Data),
        marker(ObjectFormat::AsciiString),
        marker(ObjectFormat::Utf16String),
        marker(ObjectFormat::Uid),
        marker(ObjectFormat::Array),
        marker(ObjectFormat::Dictionary),
    ))(input)
}

/// Parses the `null` singleton. Distinguished from `fill` only by its value nibble.
pub fn null(input: &[u8]) -> IResult<&[u8], ()> {
    map(marker(ObjectFormat::Null), |_| ())(input)
}

/// Parses a boolean object with an encoded value bit.
pub fn boolean(input: &[u8]) -> IResult<&[u8], bool> {
    map(
        marker(ObjectFormat::Boolean),
        |(_, value)| value == 1
    )(input)
}

/// Parses a fill object, which is represented as a unit type.
pub fn fill(input: &[u8]) -> IResult<&[u8], ()> {
    map(
        marker(ObjectFormat::Fill),
        |_| ()
    )(input)
}

/// Parses a signed integer object of any supported width (1, 2, 4 or 8 bytes),
/// sign-extending narrower widths the same way the format's source material does.
pub fn int(input: &[u8]) -> IResult<&[u8], i64> {
    // The marker nibble is 4 bits wide (0-15), but only 0-3 name a real width
    // (1/2/4/8 bytes); a foreign/corrupt marker with a wider exponent must
    // fail the parse here rather than reach `be_u64_n`'s width assertion.
    let (input, (_, exponent)) = verify(
        marker(ObjectFormat::Int),
        |&(_, exponent)| exponent <= 3,
    )(input)?;
    let byte_width = 1usize << exponent;
    map(be_u64_n(byte_width), move |bits| sign_extend(bits, byte_width))(input)
}

fn sign_extend(bits: u64, byte_width: usize) -> i64 {
    if byte_width >= 8 {
        bits as i64
    } else {
        let shift = 64 - 8 * byte_width;
        ((bits << shift) as i64) >> shift
    }
}

/// Parses a floating point object of either supported width (4 or 8 bytes).
pub fn real(input: &[u8]) -> IResult<&[u8], f64> {
    let (input, (_, exponent)) = marker(ObjectFormat::Real)(input)?;
    if exponent == 2 {
        map(be_f32, |value| value as f64)(input)
    } else {
        be_f64(input)
    }
}

/// Parses a 64-bit double-precision CFAbsoluteTime date value.
pub fn date(input: &[u8]) -> IResult<&[u8], f64> {
    map(
        tuple((
            marker(ObjectFormat::Date),
            be_f64,
        )),
        |(_, value)| value
    )(input)
}

/// Returns a parser for the length of an object payload.
///
/// If the encoded value is:
///   `0b0000_0000 ..= 0b0000_1110`:
///     No additional input is consumed and the encoded value directly
///     represents the payload count.
///   `0b0000_1111`:
///     An `Int` object follows, interpreted as an unsigned value.
fn payload_count(
    encoded_value: u8,
) -> impl Fn(&[u8]) -> IResult<&[u8], usize> {
    assert!((encoded_value & 0b1111_0000) == 0, "encoded length must be a 4-bit value");
    move |input: &[u8]| {
        if encoded_value == 0b0000_1111 {
            map_res(int, |value| usize::try_from(value))(input)
        } else {
            Ok((input, encoded_value as usize))
        }
    }
}

/// Parses a variable-length data object and returns the corresponding slice of the input.
pub fn data(input: &[u8]) -> IResult<&[u8], &[u8]> {
    let (input, (_, encoded_value)) = marker(ObjectFormat::Data)(input)?;
    let (input, data_length) = payload_count(encoded_value)(input)?;
    take(data_length)(input)
}

/// Parses a variable-length ASCII string object and returns a borrowed string slice.
pub fn ascii_string(input: &[u8]) -> IResult<&[u8], &str> {
    let (input, (_, encoded_value)) = marker(ObjectFormat::AsciiString)(input)?;
    let (input, char_count) = payload_count(encoded_value)(input)?;
    map_res(
        take(char_count),
        |bytes| -> Result<&str, AsAsciiStrError> {
            AsciiStr::from_ascii(bytes).map(|value| value.as_str())
        }
    )(input)
}

/// Parses a variable-length UTF-16 string object and returns an owned string.
pub fn utf16_string(input: &[u8]) -> IResult<&[u8], String> {
    let (input, (_, encoded_value)) = marker(ObjectFormat::Utf16String)(input)?;
    let (input, char_count) = payload_count(encoded_value)(input)?;
    map_res(
        many_m_n(
            char_count,
            char_count,
            be_u16
        ), |code_points| -> Result<String, FromUtf16Error> {
            String::from_utf16(&code_points)
        }
    )(input)
}

/// Parses a variable-length uid object and returns its value, up to 8 bytes wide.
pub fn uid(input: &[u8]) -> IResult<&[u8], u64> {
    let (input, (_, encoded_value)) = marker(ObjectFormat::Uid)(input)?;
    let byte_width = (encoded_value as usize) + 1;
    map_res(take(byte_width), move |bytes: &[u8]| -> Result<u64, Error> {
        if byte_width > 8 {
            Err(Error::NumericOverflow)
        } else {
            Ok(bytes.iter().fold(0u64, |acc, b| (acc << 8) + *b as u64))
        }
    })(input)
}

/// Returns a parser for an array with the specified-width object references.
pub fn array(
    object_reference_size: usize
) -> impl Fn(&[u8]) -> IResult<&[u8], Vec<usize>> {
    assert!(object_reference_size <= 8, "object references must be up to 8 bytes long");
    move |input: &[u8]| {
        let (input, (_, encoded_value)) = marker(ObjectFormat::Array)(input)?;
        let (input, array_length) = payload_count(encoded_value)(input)?;
        many_m_n(
            array_length,
            array_length,
            be_usize_n(object_reference_size)
        )(input)
    }
}

/// Returns a parser for a dictionary with the specified-width key and value references.
///
/// The wire format stores all key references followed by all value references;
/// this parser interleaves them back into (key, value) pairs.
pub fn dictionary(
    object_reference_size: usize
) -> impl Fn(&[u8]) -> IResult<&[u8], Vec<(usize, usize)>> {
    assert!(object_reference_size <= 8, "object references must be up to 8 bytes long");
    move |input: &[u8]| {
        let (input, (_, encoded_value)) = marker(ObjectFormat::Dictionary)(input)?;
        let (input, entry_count) = payload_count(encoded_value)(input)?;

        map(
            tuple((
                many_m_n(entry_count, entry_count, be_usize_n(object_reference_size)),
                many_m_n(entry_count, entry_count, be_usize_n(object_reference_size)),
            )), |(
                mut keys,
                mut values
            )| {
                keys.drain(..)
                    .zip(values.drain(..))
                    .collect::<Vec<(usize, usize)>>()
            }
        )(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_any_marker_valid() {
        let test_markers: &[u8] = &[
            0b0000_0000, // Null
            0b0000_1000, // Boolean (false)
            0b0000_1001, // Boolean (true)
            0b0000_1111, // Fill
            0b0001_0000, // Int, width 1
            0b0001_0001, // Int, width 2
            0b0010_0010, // Real, single precision
            0b0011_0011, // Date
            0b0100_0000, // Data (length 0)
            0b0101_0000, // ASCII String (length 0)
            0b0110_0000, // UTF16 String (length 0)
            0b1000_0000, // UID (length 1)
            0b1010_0000, // Array (length 0)
            0b1101_0000, // Dictionary (length 0)
        ];
        for &byte in test_markers {
            assert!(any_marker(&[byte]).is_ok());
        }
    }

    #[test]
    fn test_int_single_byte() {
        let (input, value) = int(&[0x10, 0x05]).unwrap();
        assert_eq!(input.len(), 0);
        assert_eq!(value, 5);
    }

    #[test]
    fn test_int_negative_single_byte() {
        let (input, value) = int(&[0x10, 0xFF]).unwrap();
        assert_eq!(input.len(), 0);
        assert_eq!(value, -1);
    }

    #[test]
    fn test_int_rejects_exponent_above_three() {
        // 0x14 is a marker with exponent 4, implying a (nonexistent) 16-byte
        // integer width; this must fail the parse, not panic.
        assert!(int(&[0x14, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]).is_err());
    }

    #[test]
    fn test_int_eight_bytes() {
        let (input, value) = int(&[0x13, 0, 0, 0, 0, 0, 0, 0, 42]).unwrap();
        assert_eq!(input.len(), 0);
        assert_eq!(value, 42);
    }

    #[test]
    fn test_real_single_precision() {
        let (input, value) = real(&[0x22, 0x40, 0x20, 0x00, 0x00]).unwrap();
        assert_eq!(input.len(), 0);
        assert_eq!(value, 2.5);
    }

    #[test]
    fn test_ascii_string() {
        let (input, value) = ascii_string(&[0x52, b'H', b'i']).unwrap();
        assert_eq!(input.len(), 0);
        assert_eq!(value, "Hi");
    }

    #[test]
    fn test_dictionary_pairs() {
        let (input, value) = dictionary(1)(&[0xD2, 0x02, 0x03, 0x04, 0x05]).unwrap();
        assert_eq!(input.len(), 0);
        assert_eq!(value, vec![(2, 4), (3, 5)]);
    }
}
