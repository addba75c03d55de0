//
// Copyright 2020 bplist Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

//! # The read driver.
//!
//! Parses a bplist00 document's header, trailer and offset table, decodes
//! every object in the object table into a `FlatObject` (`crate::pool`), and
//! resolves the flattened pool back into a `Value` tree rooted at the
//! trailer's root object index.

pub mod parser;

use std::io::Read as IoRead;

use ordered_float::OrderedFloat;

use crate::document::{Header, Trailer, HEADER_SIZE, HEADER_VERSION_00, TRAILER_SIZE};
use crate::document::ObjectFormat;
use crate::error::{Error, Result};
use crate::pool::{self, FlatObject};
use crate::value::{Date, Uid, Value};

/// Deserializes a complete `Value` tree from a byte slice containing a
/// bplist00 document.
pub fn from_slice(input: &[u8]) -> Result<Value> {
    let header = parse_header(input)?;
    if header.version != HEADER_VERSION_00 {
        return Err(Error::UnsupportedVersion);
    }

    let trailer = parse_trailer(input)?;
    let offset_table = parse_offset_table(input, &trailer)?;

    if trailer.root_object >= offset_table.len() {
        return Err(Error::InvalidRootObject);
    }

    let mut flat = Vec::with_capacity(offset_table.len());
    for &offset in &offset_table {
        flat.push(decode_object_at(input, offset, trailer.object_reference_size)?);
    }

    pool::unflatten(&flat, trailer.root_object)
}

/// Deserializes a complete `Value` tree from anything implementing `std::io::Read`.
///
/// The entire reader is buffered before parsing, since the wire format is
/// addressed by absolute byte offset from the start of the document.
pub fn from_reader<R: IoRead>(mut reader: R) -> Result<Value> {
    let mut buffer = Vec::new();
    reader.read_to_end(&mut buffer).map_err(|_| Error::Eof)?;
    from_slice(&buffer)
}

fn parse_header(input: &[u8]) -> Result<Header> {
    if input.len() < HEADER_SIZE {
        return Err(Error::MissingOrInvalidHeader);
    }
    parser::document::header(input)
        .map(|(_, header)| header)
        .map_err(|_| Error::MissingOrInvalidHeader)
}

fn parse_trailer(input: &[u8]) -> Result<Trailer> {
    if input.len() < TRAILER_SIZE {
        return Err(Error::MissingOrInvalidTrailer);
    }
    let trailer_start = input.len() - TRAILER_SIZE;
    parser::document::trailer(&input[trailer_start ..])
        .map(|(_, trailer)| trailer)
        .map_err(|_| Error::MissingOrInvalidTrailer)
}

fn parse_offset_table(input: &[u8], trailer: &Trailer) -> Result<Vec<usize>> {
    let start = trailer.offset_table_offset;
    let end = input.len().saturating_sub(TRAILER_SIZE);
    if start > end || start > input.len() {
        return Err(Error::MissingOrInvalidOffsetTable);
    }
    parser::document::offset_table(trailer.number_of_objects, trailer.offset_table_entry_size)(&input[start ..])
        .map(|(_, table)| table)
        .map_err(|_| Error::MissingOrInvalidOffsetTable)
}

/// Decodes the single object at `offset` into a `FlatObject`, dispatching on
/// its marker byte. The remaining input after the parsed object is discarded:
/// each object's length is self-describing, so trailing bytes belong to
/// whatever object comes next in the table.
fn decode_object_at(input: &[u8], offset: usize, reference_size: usize) -> Result<FlatObject> {
    if offset >= input.len() {
        return Err(Error::InvalidOffsetToObject);
    }
    let slice = &input[offset ..];
    let (format, _) = parser::object::any_marker(slice)
        .map(|(_, marker)| marker)
        .map_err(|_| Error::InvalidOrUnsupportedObjectFormat)?;

    match format {
        ObjectFormat::Null =>
            parser::object::null(slice)
                .map(|_| FlatObject::Leaf(Value::Null))
                .map_err(|_| Error::InvalidSingleton),
        ObjectFormat::Boolean =>
            parser::object::boolean(slice)
                .map(|(_, value)| FlatObject::Leaf(if value { Value::True } else { Value::False }))
                .map_err(|_| Error::InvalidSingleton),
        ObjectFormat::Fill =>
            parser::object::fill(slice)
                .map(|_| FlatObject::Leaf(Value::Fill))
                .map_err(|_| Error::InvalidSingleton),
        ObjectFormat::Int =>
            parser::object::int(slice)
                .map(|(_, value)| FlatObject::Leaf(Value::Int(value)))
                .map_err(|_| Error::InvalidOrUnsupportedObjectFormat),
        ObjectFormat::Real =>
            parser::object::real(slice)
                .map(|(_, value)| FlatObject::Leaf(Value::Real(OrderedFloat(value))))
                .map_err(|_| Error::InvalidOrUnsupportedObjectFormat),
        ObjectFormat::Date =>
            parser::object::date(slice)
                .map(|(_, value)| FlatObject::Leaf(Value::Date(Date::from_absolute_time(value))))
                .map_err(|_| Error::InvalidOrUnsupportedObjectFormat),
        ObjectFormat::Data =>
            parser::object::data(slice)
                .map(|(_, bytes)| FlatObject::Leaf(Value::Data(bytes.to_vec())))
                .map_err(|_| Error::InvalidOrUnsupportedObjectFormat),
        ObjectFormat::AsciiString =>
            parser::object::ascii_string(slice)
                .map(|(_, value)| FlatObject::Leaf(Value::AsciiString(value.to_string())))
                .map_err(|_| Error::InvalidOrUnsupportedObjectFormat),
        ObjectFormat::Utf16String =>
            parser::object::utf16_string(slice)
                .map(|(_, value)| FlatObject::Leaf(Value::UnicodeString(value)))
                .map_err(|_| Error::InvalidUtf16),
        ObjectFormat::Uid =>
            parser::object::uid(slice)
                .map(|(_, value)| FlatObject::Leaf(Value::Uid(Uid(value))))
                .map_err(|_| Error::InvalidOrUnsupportedObjectFormat),
        ObjectFormat::Array =>
            parser::object::array(reference_size)(slice)
                .map(|(_, references)| FlatObject::Array(references))
                .map_err(|_| Error::InvalidObjectReference),
        ObjectFormat::Dictionary =>
            parser::object::dictionary(reference_size)(slice)
                .map(|(_, pairs)| FlatObject::Dict(pairs))
                .map_err(|_| Error::InvalidObjectReference),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode;

    #[test]
    fn test_roundtrip_scalar() {
        let document = encode::to_vec(&Value::Int(42)).unwrap();
        assert_eq!(from_slice(&document).unwrap(), Value::Int(42));
    }

    #[test]
    fn test_roundtrip_string() {
        let value = Value::string("hello");
        let document = encode::to_vec(&value).unwrap();
        assert_eq!(from_slice(&document).unwrap(), value);
    }

    #[test]
    fn test_roundtrip_array() {
        let value = Value::Array(vec![Value::Int(1), Value::True, Value::string("x")]);
        let document = encode::to_vec(&value).unwrap();
        assert_eq!(from_slice(&document).unwrap(), value);
    }

    #[test]
    fn test_rejects_truncated_header() {
        assert_eq!(from_slice(&[0x62, 0x70]), Err(Error::MissingOrInvalidHeader));
    }

    #[test]
    fn test_rejects_bad_magic() {
        let mut document = encode::to_vec(&Value::Null).unwrap();
        document[0] = b'x';
        assert_eq!(from_slice(&document), Err(Error::MissingOrInvalidHeader));
    }
}
