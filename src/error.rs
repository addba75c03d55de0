//
// Copyright 2020 bplist Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

use std;
use std::fmt::{self, Display};

use serde::{de, ser};

pub type Result<T> = std::result::Result<T, Error>;

/// Binary property list serialization and deserialization error.
#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    /// Constructed from serialization and deserialization errors raised by the serde bridge.
    Message(String),
    /// The bplist magic number and version marker is missing or invalid.
    MissingOrInvalidHeader,
    /// The version number in the header is not one of the versions supported by this library.
    UnsupportedVersion,
    /// The trailer with the metadata necessary to interpret the offset table and object table is missing or invalid.
    MissingOrInvalidTrailer,
    /// The offset table used to determine the location of objects in the object table is missing or invalid.
    MissingOrInvalidOffsetTable,
    /// Encountered a reference to an object not in the offset table.
    InvalidObjectReference,
    /// Encountered an offset to an object not within the object table's byte range.
    InvalidOffsetToObject,
    /// Encountered a marker byte for an object format not supported by this library.
    InvalidOrUnsupportedObjectFormat,
    /// Encountered a T=0 marker byte whose object-length nibble is not one of the four defined singletons.
    InvalidSingleton,
    /// The root object index in the trailer is not a valid index into the offset table.
    InvalidRootObject,
    /// An `AsciiString` value contains a character outside the 7-bit ASCII range.
    AsciiRangeError,
    /// A decoded `UnicodeString` body is not valid UTF-16.
    InvalidUtf16,
    /// A length, width or numeric value did not fit the range required by the wire format.
    NumericOverflow,
    /// The object pool grew to 65536 or more entries, which cannot be addressed by a 2-byte reference.
    PoolOverflow,
    /// Binary property lists are directed acyclic graphs; a decoded container referenced itself, directly or transitively.
    CycleDetected,
    /// Prematurely reached the end of the input.
    Eof,
}

impl ser::Error for Error {
    fn custom<T: Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }
}

impl de::Error for Error {
    fn custom<T: Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }
}

impl Display for Error {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Message(msg) =>
                formatter.write_str(msg),
            Error::MissingOrInvalidHeader =>
                formatter.write_str("missing or invalid bplist header"),
            Error::UnsupportedVersion =>
                formatter.write_str("document is not a version (0,0) bplist"),
            Error::MissingOrInvalidTrailer =>
                formatter.write_str("missing or invalid bplist trailer"),
            Error::MissingOrInvalidOffsetTable =>
                formatter.write_str("missing or invalid bplist offset table"),
            Error::InvalidObjectReference =>
                formatter.write_str("invalid reference to object not in offset table"),
            Error::InvalidOffsetToObject =>
                formatter.write_str("invalid offset to element in object table"),
            Error::InvalidOrUnsupportedObjectFormat =>
                formatter.write_str("invalid or unsupported object format encountered"),
            Error::InvalidSingleton =>
                formatter.write_str("invalid singleton nibble for a boolean/null/fill marker"),
            Error::InvalidRootObject =>
                formatter.write_str("invalid root object in document metadata"),
            Error::AsciiRangeError =>
                formatter.write_str("ascii string contains a character outside the 7-bit range"),
            Error::InvalidUtf16 =>
                formatter.write_str("string body is not valid utf-16"),
            Error::NumericOverflow =>
                formatter.write_str("value does not fit in the range required by the wire format"),
            Error::PoolOverflow =>
                formatter.write_str("object pool exceeds 65535 entries"),
            Error::CycleDetected =>
                formatter.write_str("cycle detected"),
            Error::Eof =>
                formatter.write_str("unexpected end of input"),
        }
    }
}

impl std::error::Error for Error {}
