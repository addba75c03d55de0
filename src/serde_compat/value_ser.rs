//
// Copyright 2020 bplist Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

use serde::ser::{self, Serialize};

use crate::value::Value;

/// Serializes a `Value` into any serde data format.
///
/// Each variant maps onto the serde data model in the obvious way, with
/// `Date` and `Uid` going through their own `Serialize` impls (`$__bplist_private_*`
/// pseudo-structs) since serde has no native representation for either.
impl ser::Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: ser::Serializer,
    {
        match self {
            Value::Null | Value::Fill => serializer.serialize_unit(),
            Value::False => serializer.serialize_bool(false),
            Value::True => serializer.serialize_bool(true),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Real(f) => serializer.serialize_f64(f.into_inner()),
            Value::Date(d) => d.serialize(serializer),
            Value::Data(bytes) => serializer.serialize_bytes(bytes),
            Value::AsciiString(s) | Value::UnicodeString(s) => serializer.serialize_str(s),
            Value::Uid(u) => u.serialize(serializer),
            Value::Array(elements) => {
                use serde::ser::SerializeSeq;
                let mut seq = serializer.serialize_seq(Some(elements.len()))?;
                for element in elements {
                    seq.serialize_element(element)?;
                }
                seq.end()
            }
            Value::Dict(entries) => {
                use serde::ser::SerializeMap;
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serde_compat::to_value;

    #[test]
    fn test_array_serializes_to_itself() {
        let value = Value::Array(vec![Value::Int(1), Value::True]);
        assert_eq!(to_value(&value).unwrap(), value);
    }

    #[test]
    fn test_native_vec_serializes_to_array() {
        let value = to_value(&vec![1i64, 2, 3]).unwrap();
        assert_eq!(value, Value::Array(vec![Value::Int(1), Value::Int(2), Value::Int(3)]));
    }
}
