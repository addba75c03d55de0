//
// Copyright 2020 bplist Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

//! # The serde bridge.
//!
//! Lets any `T: Serialize`/`Deserialize` round-trip through a [`Value`](crate::Value),
//! the way `serde_json::Value` and `toml::Value` do for their own formats.
//! `Date` and `Uid` ride along as magic-named pseudo-structs
//! (`$__bplist_private_*`) since serde has no native representation for
//! either; see `date` and `uid`.

mod date;
mod de;
mod ser;
mod uid;
mod value_de;
mod value_ser;

use std::io::{Read, Write};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;

pub use de::from_value;
pub use ser::to_value;

/// Serializes `value` to a newly allocated bplist00 document, going through
/// [`to_value`] first.
pub fn to_vec<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    let value = to_value(value)?;
    crate::encode::to_vec(&value)
}

/// Serializes `value` as a bplist00 document to `writer`, going through
/// [`to_value`] first.
pub fn to_writer<W: Write, T: Serialize + ?Sized>(writer: &mut W, value: &T) -> Result<()> {
    let value = to_value(value)?;
    crate::encode::to_writer(writer, &value)
}

/// Deserializes `T` from a bplist00 document, going through [`Value`](crate::Value)
/// and [`from_value`].
pub fn from_slice<T: DeserializeOwned>(input: &[u8]) -> Result<T> {
    let value = crate::decode::from_slice(input)?;
    from_value(&value)
}

/// Deserializes `T` from anything implementing `std::io::Read`, going
/// through [`Value`](crate::Value) and [`from_value`].
pub fn from_reader<R: Read, T: DeserializeOwned>(reader: R) -> Result<T> {
    let value = crate::decode::from_reader(reader)?;
    from_value(&value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_through_document() {
        let bytes = to_vec(&vec![1u8, 2, 3]).unwrap();
        let back: Vec<u8> = from_slice(&bytes).unwrap();
        assert_eq!(back, vec![1, 2, 3]);
    }
}
