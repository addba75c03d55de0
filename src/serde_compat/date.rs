//
// Copyright 2020 bplist Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

//! Serde does not provide a Date or Time type.
//! As such, the bplist `Date` type is mapped onto a pseudo-structure with a
//! special name and field, similar to the way the TOML crate represents its
//! own `Datetime`.

use serde::{de, ser};

use std::fmt;

use crate::value::Date;

/// Name of the Date pseudo-structure.
pub const STRUCT_NAME: &str = "$__bplist_private_Date";

/// Name of the field in the pseudo-structure.
pub const STRUCT_FIELD: &str = "$__bplist_private_Date_absolute_time";

impl ser::Serialize for Date {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: ser::Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct(STRUCT_NAME, 1)?;
        state.serialize_field(STRUCT_FIELD, &self.absolute_time())?;
        state.end()
    }
}

/// Custom deserializer for the Date pseudo-structure.
impl<'de> de::Deserialize<'de> for Date {
    fn deserialize<D>(deserializer: D) -> Result<Date, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        struct DateVisitor;

        impl<'de> de::Visitor<'de> for DateVisitor {
            type Value = Date;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a date")
            }

            fn visit_map<V>(self, mut visitor: V) -> Result<Date, V::Error>
            where
                V: de::MapAccess<'de>,
            {
                let key = visitor.next_key::<DateKey>()?;
                if key.is_none() {
                    return Err(de::Error::custom("date key not found"));
                }
                let date_from_f64: DateFromF64 = visitor.next_value()?;
                Ok(date_from_f64.value)
            }
        }

        deserializer.deserialize_struct(STRUCT_NAME, &[STRUCT_FIELD], DateVisitor)
    }
}

struct DateKey;

impl<'de> de::Deserialize<'de> for DateKey {
    fn deserialize<D>(deserializer: D) -> Result<DateKey, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        struct FieldVisitor;

        impl<'de> de::Visitor<'de> for FieldVisitor {
            type Value = ();

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a valid date field")
            }

            fn visit_str<E>(self, s: &str) -> Result<(), E>
            where
                E: de::Error,
            {
                if s == STRUCT_FIELD {
                    Ok(())
                } else {
                    Err(de::Error::custom("expected field with custom name"))
                }
            }
        }

        deserializer.deserialize_identifier(FieldVisitor)?;
        Ok(DateKey)
    }
}

pub struct DateFromF64 {
    pub value: Date,
}

impl<'de> de::Deserialize<'de> for DateFromF64 {
    fn deserialize<D>(deserializer: D) -> Result<DateFromF64, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        struct Visitor;

        impl<'de> de::Visitor<'de> for Visitor {
            type Value = DateFromF64;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("absolute time offset from the core data epoch")
            }

            fn visit_f64<E>(self, v: f64) -> Result<DateFromF64, E> {
                Ok(DateFromF64 { value: Date::from_absolute_time(v) })
            }
        }

        deserializer.deserialize_f64(Visitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;
    use crate::serde_compat::{from_value, to_value};

    #[test]
    fn test_date_roundtrips_through_value() {
        let date = Date::from_absolute_time(12345.5);
        let value = to_value(&date).unwrap();
        assert_eq!(value, Value::Date(date));
        let back: Date = from_value(&value).unwrap();
        assert_eq!(back, date);
    }
}
