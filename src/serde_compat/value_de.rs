//
// Copyright 2020 bplist Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

use serde::de;
use ordered_float::OrderedFloat;

use std::collections::BTreeMap;
use std::convert::TryFrom;
use std::fmt;

use crate::serde_compat::{date, uid};
use crate::value::Value;

/// Deserializes a `Value` from any serde data format.
///
/// This is implemented generically, so substantially any serde format can
/// deserialize into `Value`. The `Date` and `Uid` pseudo-structs are the
/// exception: a map whose first key is one of their magic field names is
/// recognized and folded into the corresponding variant rather than kept as
/// a `Dict`.
impl<'de> de::Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Value, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        struct ValueVisitor;

        impl<'de> de::Visitor<'de> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("any value representable in a binary property list")
            }

            #[inline]
            fn visit_unit<E>(self) -> Result<Value, E> {
                Ok(Value::Null)
            }

            #[inline]
            fn visit_bool<E>(self, value: bool) -> Result<Value, E> {
                Ok(if value { Value::True } else { Value::False })
            }

            #[inline]
            fn visit_i64<E>(self, value: i64) -> Result<Value, E> {
                Ok(Value::Int(value))
            }

            #[inline]
            fn visit_u64<E>(self, value: u64) -> Result<Value, E>
            where
                E: de::Error,
            {
                i64::try_from(value)
                    .map(Value::Int)
                    .map_err(|_| de::Error::custom("u64 value out of range for a bplist integer"))
            }

            #[inline]
            fn visit_f64<E>(self, value: f64) -> Result<Value, E> {
                Ok(Value::Real(OrderedFloat(value)))
            }

            #[inline]
            fn visit_str<E>(self, value: &str) -> Result<Value, E> {
                Ok(Value::string(value))
            }

            #[inline]
            fn visit_string<E>(self, value: String) -> Result<Value, E> {
                Ok(Value::string(value))
            }

            #[inline]
            fn visit_bytes<E>(self, value: &[u8]) -> Result<Value, E> {
                Ok(Value::Data(value.into()))
            }

            #[inline]
            fn visit_byte_buf<E>(self, value: Vec<u8>) -> Result<Value, E> {
                Ok(Value::Data(value))
            }

            #[inline]
            fn visit_none<E>(self) -> Result<Value, E> {
                Ok(Value::Null)
            }

            #[inline]
            fn visit_some<D>(self, deserializer: D) -> Result<Value, D::Error>
            where
                D: de::Deserializer<'de>,
            {
                de::Deserialize::deserialize(deserializer)
            }

            fn visit_seq<V>(self, mut visitor: V) -> Result<Value, V::Error>
            where
                V: de::SeqAccess<'de>,
            {
                let mut elements = Vec::new();
                while let Some(element) = visitor.next_element()? {
                    elements.push(element);
                }
                Ok(Value::Array(elements))
            }

            fn visit_map<V>(self, mut visitor: V) -> Result<Value, V::Error>
            where
                V: de::MapAccess<'de>,
            {
                let mut map = BTreeMap::<Value, Value>::new();
                let mut key = visitor.next_key::<Value>()?;

                // A map whose first key is one of the magic field names represents
                // a Date or Uid pseudo-struct rather than a genuine dictionary.
                if let Some(ref k) = key {
                    if let Some(field) = k.as_str() {
                        if field == date::STRUCT_FIELD {
                            let value: date::DateFromF64 = visitor.next_value()?;
                            return Ok(Value::Date(value.value));
                        } else if field == uid::STRUCT_FIELD {
                            let value: uid::UidFromU64 = visitor.next_value()?;
                            return Ok(Value::Uid(value.value));
                        }
                    }
                }

                while let Some(k) = key {
                    if map.contains_key(&k) {
                        return Err(de::Error::custom(format!("duplicate key: `{:?}`", k)));
                    }
                    let v = visitor.next_value()?;
                    map.insert(k, v);
                    key = visitor.next_key()?;
                }

                Ok(Value::Dict(map))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serde_compat::from_value;

    #[test]
    fn test_round_trips_dict() {
        let mut map = BTreeMap::new();
        map.insert(Value::string("a"), Value::Int(1));
        let value = Value::Dict(map);
        let back: Value = from_value(&value).unwrap();
        assert_eq!(back, value);
    }
}
