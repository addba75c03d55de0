//
// Copyright 2020 bplist Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

//! A `serde::Serializer` whose output is a `Value` rather than bytes,
//! following the same `to_value` pattern as `serde_json` and `toml`.

use serde::ser::{self, Serialize};

use std::collections::BTreeMap;

use crate::error::Error;
use crate::value::{Date, Uid, Value};

/// Serializes any `T: Serialize` into a `Value`.
pub fn to_value<T: Serialize + ?Sized>(value: &T) -> Result<Value, Error> {
    value.serialize(Serializer)
}

pub struct Serializer;

impl ser::Serializer for Serializer {
    type Ok = Value;
    type Error = Error;

    type SerializeSeq = SerializeVec;
    type SerializeTuple = SerializeVec;
    type SerializeTupleStruct = SerializeVec;
    type SerializeTupleVariant = SerializeTupleVariant;
    type SerializeMap = SerializeMap;
    type SerializeStruct = SerializeStruct;
    type SerializeStructVariant = SerializeStructVariant;

    fn serialize_bool(self, v: bool) -> Result<Value, Error> {
        Ok(Value::from(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Value, Error> { self.serialize_i64(v as i64) }
    fn serialize_i16(self, v: i16) -> Result<Value, Error> { self.serialize_i64(v as i64) }
    fn serialize_i32(self, v: i32) -> Result<Value, Error> { self.serialize_i64(v as i64) }
    fn serialize_i64(self, v: i64) -> Result<Value, Error> { Ok(Value::Int(v)) }

    fn serialize_u8(self, v: u8) -> Result<Value, Error> { self.serialize_i64(v as i64) }
    fn serialize_u16(self, v: u16) -> Result<Value, Error> { self.serialize_i64(v as i64) }
    fn serialize_u32(self, v: u32) -> Result<Value, Error> { self.serialize_i64(v as i64) }
    fn serialize_u64(self, v: u64) -> Result<Value, Error> {
        if v <= i64::max_value() as u64 {
            self.serialize_i64(v as i64)
        } else {
            Err(Error::NumericOverflow)
        }
    }

    fn serialize_f32(self, v: f32) -> Result<Value, Error> { self.serialize_f64(v as f64) }
    fn serialize_f64(self, v: f64) -> Result<Value, Error> { Ok(Value::from(v)) }

    fn serialize_char(self, v: char) -> Result<Value, Error> {
        let mut buffer = [0u8; 4];
        Ok(Value::string(v.encode_utf8(&mut buffer) as &str))
    }

    fn serialize_str(self, v: &str) -> Result<Value, Error> {
        Ok(Value::string(v))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Value, Error> {
        Ok(Value::Data(v.to_vec()))
    }

    fn serialize_none(self) -> Result<Value, Error> {
        Ok(Value::Null)
    }

    fn serialize_some<T>(self, value: &T) -> Result<Value, Error>
    where
        T: Serialize + ?Sized,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Value, Error> {
        Ok(Value::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Value, Error> {
        Ok(Value::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
    ) -> Result<Value, Error> {
        Ok(Value::string(variant))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<Value, Error>
    where
        T: Serialize + ?Sized,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Value, Error>
    where
        T: Serialize + ?Sized,
    {
        let mut map = BTreeMap::new();
        map.insert(Value::string(variant), value.serialize(self)?);
        Ok(Value::Dict(map))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeVec, Error> {
        Ok(SerializeVec { elements: Vec::with_capacity(len.unwrap_or(0)) })
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeVec, Error> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<SerializeVec, Error> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeTupleVariant, Error> {
        Ok(SerializeTupleVariant {
            variant,
            elements: Vec::with_capacity(len),
        })
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<SerializeMap, Error> {
        Ok(SerializeMap { map: BTreeMap::new(), next_key: None })
    }

    fn serialize_struct(self, name: &'static str, _len: usize) -> Result<SerializeStruct, Error> {
        Ok(SerializeStruct { name, map: BTreeMap::new() })
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<SerializeStructVariant, Error> {
        Ok(SerializeStructVariant { variant, map: BTreeMap::new() })
    }
}

pub struct SerializeVec {
    elements: Vec<Value>,
}

impl ser::SerializeSeq for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<(), Error>
    where
        T: Serialize + ?Sized,
    {
        self.elements.push(to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value, Error> {
        Ok(Value::Array(self.elements))
    }
}

impl ser::SerializeTuple for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<(), Error>
    where
        T: Serialize + ?Sized,
    {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value, Error> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleStruct for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<(), Error>
    where
        T: Serialize + ?Sized,
    {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value, Error> {
        ser::SerializeSeq::end(self)
    }
}

pub struct SerializeTupleVariant {
    variant: &'static str,
    elements: Vec<Value>,
}

impl ser::SerializeTupleVariant for SerializeTupleVariant {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<(), Error>
    where
        T: Serialize + ?Sized,
    {
        self.elements.push(to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value, Error> {
        let mut map = BTreeMap::new();
        map.insert(Value::string(self.variant), Value::Array(self.elements));
        Ok(Value::Dict(map))
    }
}

pub struct SerializeMap {
    map: BTreeMap<Value, Value>,
    next_key: Option<Value>,
}

impl ser::SerializeMap for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<(), Error>
    where
        T: Serialize + ?Sized,
    {
        self.next_key = Some(to_value(key)?);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<(), Error>
    where
        T: Serialize + ?Sized,
    {
        let key = self.next_key.take().ok_or_else(|| Error::Message(
            "serialize_value called before serialize_key".to_string()
        ))?;
        self.map.insert(key, to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value, Error> {
        Ok(Value::Dict(self.map))
    }
}

pub struct SerializeStruct {
    name: &'static str,
    map: BTreeMap<Value, Value>,
}

impl ser::SerializeStruct for SerializeStruct {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<(), Error>
    where
        T: Serialize + ?Sized,
    {
        self.map.insert(Value::string(key), to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value, Error> {
        // The `Date`/`Uid` pseudo-structs carry exactly one field under a
        // magic name; fold those back into their native variant instead of
        // leaving them as a one-entry dictionary.
        if self.name == crate::serde_compat::date::STRUCT_NAME {
            if let Some(Value::Real(f)) = self.map.get(&Value::string(crate::serde_compat::date::STRUCT_FIELD)) {
                return Ok(Value::Date(Date::from_absolute_time(f.into_inner())));
            }
        }
        if self.name == crate::serde_compat::uid::STRUCT_NAME {
            if let Some(Value::Int(i)) = self.map.get(&Value::string(crate::serde_compat::uid::STRUCT_FIELD)) {
                return Ok(Value::Uid(Uid(*i as u64)));
            }
        }
        Ok(Value::Dict(self.map))
    }
}

pub struct SerializeStructVariant {
    variant: &'static str,
    map: BTreeMap<Value, Value>,
}

impl ser::SerializeStructVariant for SerializeStructVariant {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<(), Error>
    where
        T: Serialize + ?Sized,
    {
        self.map.insert(Value::string(key), to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value, Error> {
        let mut outer = BTreeMap::new();
        outer.insert(Value::string(self.variant), Value::Dict(self.map));
        Ok(Value::Dict(outer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_seq_produces_array() {
        let value = to_value(&vec![1i32, 2, 3]).unwrap();
        assert_eq!(value, Value::Array(vec![Value::Int(1), Value::Int(2), Value::Int(3)]));
    }

    #[test]
    fn test_serialize_option_none_is_null() {
        let value = to_value(&Option::<i32>::None).unwrap();
        assert_eq!(value, Value::Null);
    }

    #[test]
    fn test_serialize_u64_overflow() {
        assert_eq!(to_value(&u64::max_value()), Err(Error::NumericOverflow));
    }
}
