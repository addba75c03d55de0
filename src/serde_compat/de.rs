//
// Copyright 2020 bplist Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

//! A `serde::Deserializer` that reads out of a [`Value`] rather than bytes,
//! the mirror image of `ser::Serializer`. `Date` and `Uid` unwrap their
//! magic-named pseudo-struct (see `crate::serde_compat::date`/`uid`) when the
//! target type asks for one by name; every other scalar forwards straight to
//! the matching `visit_*` call.

use ordered_float::OrderedFloat;
use serde::de::{self, DeserializeSeed, IntoDeserializer};
use serde::forward_to_deserialize_any;

use std::collections::{btree_map, BTreeMap};

use crate::error::{Error, Result};
use crate::serde_compat::{date, uid};
use crate::value::Value;

/// Deserializes any `T: Deserialize` out of a [`Value`].
pub fn from_value<T>(value: &Value) -> Result<T>
where
    T: de::DeserializeOwned,
{
    T::deserialize(ValueDeserializer::new(value))
}

/// Borrows a `Value` and drives a `serde::de::Visitor` over its contents.
#[derive(Clone, Copy)]
pub struct ValueDeserializer<'a> {
    value: &'a Value,
}

impl<'a> ValueDeserializer<'a> {
    pub fn new(value: &'a Value) -> Self {
        ValueDeserializer { value }
    }
}

impl<'de, 'a> de::Deserializer<'de> for ValueDeserializer<'a> {
    type Error = Error;

    /// Dispatches on the `Value` variant with no hint from the target type.
    ///
    /// `Date` and `Uid` are surfaced as a one-entry map under their magic
    /// field name, exactly as `ser::Serializer` produces them, so that a
    /// generic visitor (in particular `Value`'s own `Deserialize` impl) can
    /// round-trip them without narrowing into a plain number.
    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Null | Value::Fill => visitor.visit_unit(),
            Value::False => visitor.visit_bool(false),
            Value::True => visitor.visit_bool(true),
            Value::Int(i) => visitor.visit_i64(*i),
            Value::Real(f) => visitor.visit_f64(f.into_inner()),
            Value::Date(d) => visitor.visit_map(SingleFieldMap::new(
                date::STRUCT_FIELD,
                Value::Real(OrderedFloat(d.absolute_time())),
            )),
            Value::Data(bytes) => visitor.visit_bytes(bytes),
            Value::AsciiString(s) | Value::UnicodeString(s) => visitor.visit_str(s),
            Value::Uid(u) => visitor.visit_map(SingleFieldMap::new(uid::STRUCT_FIELD, Value::Uid(*u))),
            Value::Array(items) => visitor.visit_seq(SeqDeserializer::new(items)),
            Value::Dict(entries) => visitor.visit_map(MapDeserializer::new(entries)),
        }
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Null => visitor.visit_none(),
            _ => visitor.visit_some(self),
        }
    }

    /// Recognizes the `Date`/`Uid` magic struct names and unwraps the
    /// underlying scalar directly, bypassing `deserialize_any`'s map framing
    /// so `DateFromF64`/`UidFromU64` see the plain `f64`/`u64` they expect.
    fn deserialize_struct<V>(
        self,
        name: &'static str,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        if name == date::STRUCT_NAME {
            return match self.value {
                Value::Date(d) => visitor.visit_map(SingleFieldMap::new(
                    date::STRUCT_FIELD,
                    Value::Real(OrderedFloat(d.absolute_time())),
                )),
                other => Err(Error::Message(format!("expected a date, found {:?}", other))),
            };
        }
        if name == uid::STRUCT_NAME {
            return match self.value {
                Value::Uid(u) => {
                    visitor.visit_map(SingleFieldMap::new(uid::STRUCT_FIELD, Value::Uid(*u)))
                }
                other => Err(Error::Message(format!("expected a uid, found {:?}", other))),
            };
        }
        self.deserialize_any(visitor)
    }

    /// `u64` is requested explicitly by `UidFromU64`; read straight through
    /// without re-wrapping in the magic map `deserialize_any` uses.
    fn deserialize_u64<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Uid(u) => visitor.visit_u64(u.0),
            Value::Int(i) => visitor.visit_u64(*i as u64),
            _ => self.deserialize_any(visitor),
        }
    }

    /// `f64` is requested explicitly by `DateFromF64`; see `deserialize_u64`.
    fn deserialize_f64<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Real(f) => visitor.visit_f64(f.into_inner()),
            _ => self.deserialize_any(visitor),
        }
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 u8 u16 u32 f32 char str string
        bytes byte_buf unit unit_struct newtype_struct seq tuple
        tuple_struct map enum identifier ignored_any
    }
}

/// `serde::de::SeqAccess` over an `Array`'s elements.
struct SeqDeserializer<'a> {
    iter: std::slice::Iter<'a, Value>,
}

impl<'a> SeqDeserializer<'a> {
    fn new(items: &'a [Value]) -> Self {
        SeqDeserializer { iter: items.iter() }
    }
}

impl<'de, 'a> de::SeqAccess<'de> for SeqDeserializer<'a> {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some(value) => seed.deserialize(ValueDeserializer::new(value)).map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        let (lower, upper) = self.iter.size_hint();
        upper.or(Some(lower))
    }
}

/// `serde::de::MapAccess` over a `Dict`'s entries.
struct MapDeserializer<'a> {
    iter: btree_map::Iter<'a, Value, Value>,
    value: Option<&'a Value>,
}

impl<'a> MapDeserializer<'a> {
    fn new(entries: &'a BTreeMap<Value, Value>) -> Self {
        MapDeserializer { iter: entries.iter(), value: None }
    }
}

impl<'de, 'a> de::MapAccess<'de> for MapDeserializer<'a> {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some((key, value)) => {
                self.value = Some(value);
                seed.deserialize(ValueDeserializer::new(key)).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: DeserializeSeed<'de>,
    {
        let value = self.value.take().ok_or_else(|| {
            Error::Message("next_value_seed called before next_key_seed".to_string())
        })?;
        seed.deserialize(ValueDeserializer::new(value))
    }
}

/// A one-entry `MapAccess` used to bridge `Date`/`Uid`'s magic field name
/// into the wrapped scalar, mirroring `ser::SerializeStruct` in reverse.
struct SingleFieldMap {
    field: &'static str,
    value: Option<Value>,
    done: bool,
}

impl SingleFieldMap {
    fn new(field: &'static str, value: Value) -> Self {
        SingleFieldMap { field, value: Some(value), done: false }
    }
}

impl<'de> de::MapAccess<'de> for SingleFieldMap {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: DeserializeSeed<'de>,
    {
        if self.done {
            return Ok(None);
        }
        self.done = true;
        seed.deserialize(self.field.into_deserializer()).map(Some)
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: DeserializeSeed<'de>,
    {
        let value = self
            .value
            .take()
            .ok_or_else(|| Error::Message("magic field value already consumed".to_string()))?;
        seed.deserialize(ValueDeserializer::new(&value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Uid;

    #[test]
    fn test_from_value_scalar() {
        let value: i64 = from_value(&Value::Int(5)).unwrap();
        assert_eq!(value, 5);
    }

    #[test]
    fn test_from_value_array() {
        let value: Vec<i64> = from_value(&Value::Array(vec![Value::Int(1), Value::Int(2)])).unwrap();
        assert_eq!(value, vec![1, 2]);
    }

    #[test]
    fn test_from_value_uid() {
        let value: Uid = from_value(&Value::Uid(Uid(7))).unwrap();
        assert_eq!(value, Uid(7));
    }

    #[test]
    fn test_from_value_identity() {
        let original = Value::Array(vec![Value::Int(1), Value::string("x"), Value::Uid(Uid(3))]);
        let back: Value = from_value(&original).unwrap();
        assert_eq!(back, original);
    }
}
