//
// Copyright 2020 bplist Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

//! # The bplist value model.
//!
//! The bplist format version 00 supports the following object kinds:
//!
//! 1. Null and Fill singletons.
//! 2. Boolean.
//! 3. Integers, up to 64 bits long.
//! 4. Real, single- and double-precision.
//! 5. Date.
//! 6. Data.
//! 7. ASCII and UTF-16 strings.
//! 8. Uid.
//! 9. Array.
//! 10. Dictionary.
//!
//! Each variant of `Value` corresponds to exactly one wire-format type marker;
//! in particular `AsciiString` and `UnicodeString` are kept distinct, as are
//! `Null`/`False`/`True`/`Fill`, because deduplication during encoding is
//! variant-aware: an `Int(1)` and a `True` must never collide even where a
//! looser language would consider them equal.
//!
//! # References
//!
//! 1. https://github.com/opensource-apple/CF/blob/master/ForFoundationOnly.h
//! 2. https://opensource.apple.com/source/CF/CF-855.17/CFBinaryPList.c

use ordered_float::OrderedFloat;
use std::collections::BTreeMap;

/// A date, represented as a double-precision offset, in seconds, from the
/// Core Data epoch (1 January 2001, 00:00:00 UTC), matching `CFAbsoluteTime`.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct Date(pub OrderedFloat<f64>);

impl Date {
    /// Builds a date from a CFAbsoluteTime offset.
    pub fn from_absolute_time(seconds: f64) -> Self {
        Date(OrderedFloat(seconds))
    }

    /// Returns the CFAbsoluteTime offset, in seconds, from the Core Data epoch.
    pub fn absolute_time(&self) -> f64 {
        self.0.into_inner()
    }

    /// Number of seconds between the Unix epoch and the Core Data epoch.
    pub const EPOCH_ADJUSTMENT: f64 = 978_307_200.0;

    /// Builds a date from a Unix timestamp (seconds since 1 January 1970).
    pub fn from_unix_timestamp(seconds: f64) -> Self {
        Date::from_absolute_time(seconds - Self::EPOCH_ADJUSTMENT)
    }

    /// Returns the Unix timestamp (seconds since 1 January 1970) for this date.
    pub fn unix_timestamp(&self) -> f64 {
        self.absolute_time() + Self::EPOCH_ADJUSTMENT
    }
}

/// A UID, as used by `NSKeyedArchiver` to reference another object by index.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct Uid(pub u64);

/// Any value which can be encoded in a binary property list.
///
/// Equality, ordering and hashing are derived structurally and are
/// variant-aware: two values of different variants are never equal even if
/// their payloads compare equal numerically (e.g. `Value::Int(1)` is distinct
/// from `Value::True`). Reals and dates wrap `OrderedFloat` so the type can
/// implement `Eq`/`Ord`/`Hash`, which `Value::Dict` needs for its `BTreeMap`.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum Value {
    /// The `null` singleton.
    Null,
    /// The `false` singleton.
    False,
    /// The `true` singleton.
    True,
    /// The `fill` singleton, an opaque padding value.
    Fill,
    /// A signed integer value, up to 64 bits wide.
    Int(i64),
    /// A floating-point value.
    Real(OrderedFloat<f64>),
    /// A date.
    Date(Date),
    /// Arbitrary opaque bytes.
    Data(Vec<u8>),
    /// A 7-bit ASCII string.
    AsciiString(String),
    /// A UTF-16 string, encoded as a UTF-16 big-endian code unit sequence on the wire.
    UnicodeString(String),
    /// A UID value.
    Uid(Uid),
    /// An array of values.
    Array(Vec<Value>),
    /// A mapping of values to values.
    Dict(BTreeMap<Value, Value>),
}

impl Value {
    /// Builds a string value, choosing the `AsciiString` variant when every
    /// character is 7-bit clean and `UnicodeString` otherwise. This mirrors the
    /// Python original's dispatch on `str` versus `unicode`, but as an explicit
    /// constructor rather than an implicit type coercion.
    pub fn string(s: impl Into<String>) -> Self {
        let s = s.into();
        if s.chars().all(|c| (c as u32) <= 0x7F) {
            Value::AsciiString(s)
        } else {
            Value::UnicodeString(s)
        }
    }

    /// Returns the contained string, for either string variant.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::AsciiString(s) | Value::UnicodeString(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Returns the contained boolean, for `True`/`False`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::True => Some(true),
            Value::False => Some(false),
            _ => None,
        }
    }

    /// Returns the contained array, if this is an `Array`.
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the contained dictionary, if this is a `Dict`.
    pub fn as_dict(&self) -> Option<&BTreeMap<Value, Value>> {
        match self {
            Value::Dict(v) => Some(v),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        if b { Value::True } else { Value::False }
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Real(OrderedFloat(f))
    }
}

impl From<Vec<u8>> for Value {
    fn from(data: Vec<u8>) -> Self {
        Value::Data(data)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::string(s)
    }
}

impl<'a> From<&'a str> for Value {
    fn from(s: &'a str) -> Self {
        Value::string(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(values: Vec<Value>) -> Self {
        Value::Array(values)
    }
}

impl From<Date> for Value {
    fn from(d: Date) -> Self {
        Value::Date(d)
    }
}

impl From<Uid> for Value {
    fn from(u: Uid) -> Self {
        Value::Uid(u)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_picks_ascii_variant() {
        assert_eq!(Value::string("Hello"), Value::AsciiString("Hello".to_string()));
    }

    #[test]
    fn test_string_picks_unicode_variant() {
        assert_eq!(Value::string("héllo"), Value::UnicodeString("héllo".to_string()));
    }

    #[test]
    fn test_date_epoch_conversion() {
        let date = Date::from_unix_timestamp(978_307_200.0);
        assert_eq!(date.absolute_time(), 0.0);
    }

    #[test]
    fn test_variant_aware_equality() {
        assert_ne!(Value::Int(1), Value::True);
        assert_ne!(Value::AsciiString("x".into()), Value::UnicodeString("x".into()));
    }
}
