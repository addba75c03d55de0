//
// Copyright 2020 bplist Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

//! # The write driver.
//!
//! Turns a `Value` into a complete bplist00 document: collect and flatten the
//! object pool (`crate::pool`), serialize each object in pool order while
//! recording its offset, then emit the offset table and trailer describing
//! how to find them again.

mod object;

use std::io::Write;

use crate::document::{Trailer, HEADER_MAGIC_NUMBER, HEADER_VERSION_00, TRAILER_SIZE};
use crate::error::Result;
use crate::pool::{self, FlatObject};
use crate::value::Value;
use crate::width;

/// Serializes `value` to a newly allocated buffer.
pub fn to_vec(value: &Value) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    to_writer(&mut buffer, value)?;
    Ok(buffer)
}

/// Serializes `value` as a bplist00 document to `writer`.
pub fn to_writer<W: Write>(writer: &mut W, value: &Value) -> Result<()> {
    let pool = pool::collect(value);
    let flat = pool::flatten(&pool)?;

    // Per the format's actual width rule, this is keyed on the object
    // *count*, not the largest index: 256 objects (indices 0..255, which
    // would fit in a single byte) still force 2-byte references.
    let reference_size = width::minimum_unsigned_width(flat.len() as u64, 2)?;

    let mut document = Vec::new();
    document.extend_from_slice(HEADER_MAGIC_NUMBER);
    document.push(HEADER_VERSION_00.0);
    document.push(HEADER_VERSION_00.1);

    let mut offset_table = Vec::with_capacity(flat.len());
    for object in &flat {
        offset_table.push(document.len());
        document.extend(encode_object(object, reference_size)?);
    }

    let offset_table_offset = document.len();
    let offset_size = offset_table.iter()
        .copied()
        .max()
        .map(|max| width::minimum_unsigned_width(max as u64, 4))
        .transpose()?
        .unwrap_or(1);

    for &offset in &offset_table {
        document.extend(encode_offset(offset as u64, offset_size));
    }

    let trailer = Trailer {
        sort_version: 0,
        offset_table_entry_size: offset_size,
        object_reference_size: reference_size,
        number_of_objects: flat.len(),
        root_object: 0,
        offset_table_offset,
    };
    document.extend(encode_trailer(&trailer));

    writer.write_all(&document).map_err(|_| crate::error::Error::Eof)?;
    Ok(())
}

fn encode_object(object: &FlatObject, reference_size: usize) -> Result<Vec<u8>> {
    match object {
        FlatObject::Leaf(value) => object::leaf(value),
        FlatObject::Array(indices) => object::array(indices, reference_size),
        FlatObject::Dict(pairs) => object::dict(pairs, reference_size),
    }
}

/// Encodes one offset table entry. The 3-byte case uses the packed layout
/// from `crate::width::pack_offset_3` rather than a plain big-endian
/// truncation, matching the format's historical quirk.
fn encode_offset(offset: u64, offset_size: usize) -> Vec<u8> {
    if offset_size == 3 {
        width::pack_offset_3(offset).to_vec()
    } else {
        width::pack_be(offset, offset_size)
    }
}

fn encode_trailer(trailer: &Trailer) -> Vec<u8> {
    let mut bytes = vec![0u8; 5];
    bytes.push(trailer.sort_version);
    bytes.push(trailer.offset_table_entry_size as u8);
    bytes.push(trailer.object_reference_size as u8);
    bytes.extend(width::pack_be(trailer.number_of_objects as u64, 8));
    bytes.extend(width::pack_be(trailer.root_object as u64, 8));
    bytes.extend(width::pack_be(trailer.offset_table_offset as u64, 8));
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{HEADER_MAGIC_NUMBER, HEADER_SIZE};

    #[test]
    fn test_header_written() {
        let document = to_vec(&Value::Null).unwrap();
        assert_eq!(&document[0 .. 6], HEADER_MAGIC_NUMBER);
        assert_eq!(&document[6 .. HEADER_SIZE], &[0x30, 0x30]);
    }

    #[test]
    fn test_trailer_length() {
        let document = to_vec(&Value::Int(42)).unwrap();
        assert_eq!(document.len() >= TRAILER_SIZE, true);
    }

    #[test]
    fn test_single_root_reference_size() {
        let document = to_vec(&Value::string("hi")).unwrap();
        let trailer_start = document.len() - TRAILER_SIZE;
        let object_reference_size = document[trailer_start + 7];
        assert_eq!(object_reference_size, 1);
    }

    #[test]
    fn test_reference_size_widens_at_exactly_256_objects() {
        // 255 distinct ints + their containing array = 256 pool entries,
        // every index fits in one byte, but the format keys reference_size
        // off the object count rather than the largest index.
        let elements = (0 .. 255).map(Value::Int).collect();
        let document = to_vec(&Value::Array(elements)).unwrap();
        let trailer_start = document.len() - TRAILER_SIZE;
        let object_reference_size = document[trailer_start + 7];
        assert_eq!(object_reference_size, 2);
    }
}
