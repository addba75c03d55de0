//
// Copyright 2020 bplist Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

//! Serde does not provide a data type analogous to a UID. As such, the
//! bplist `Uid` type is mapped onto a pseudo-structure with a special name
//! and field, mirroring `crate::serde_compat::date`.

use serde::{de, ser};

use std::fmt;

use crate::value::Uid;

/// Name of the Uid pseudo-structure.
pub const STRUCT_NAME: &str = "$__bplist_private_Uid";

/// Name of the field in the pseudo-structure.
pub const STRUCT_FIELD: &str = "$__bplist_private_Uid_value";

impl ser::Serialize for Uid {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: ser::Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct(STRUCT_NAME, 1)?;
        state.serialize_field(STRUCT_FIELD, &self.0)?;
        state.end()
    }
}

/// Custom deserializer for the Uid pseudo-structure.
impl<'de> de::Deserialize<'de> for Uid {
    fn deserialize<D>(deserializer: D) -> Result<Uid, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        struct UidVisitor;

        impl<'de> de::Visitor<'de> for UidVisitor {
            type Value = Uid;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a UID")
            }

            fn visit_map<V>(self, mut visitor: V) -> Result<Uid, V::Error>
            where
                V: de::MapAccess<'de>,
            {
                let key = visitor.next_key::<UidKey>()?;
                if key.is_none() {
                    return Err(de::Error::custom("uid key not found"));
                }
                let uid_from_u64: UidFromU64 = visitor.next_value()?;
                Ok(uid_from_u64.value)
            }
        }

        deserializer.deserialize_struct(STRUCT_NAME, &[STRUCT_FIELD], UidVisitor)
    }
}

struct UidKey;

impl<'de> de::Deserialize<'de> for UidKey {
    fn deserialize<D>(deserializer: D) -> Result<UidKey, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        struct FieldVisitor;

        impl<'de> de::Visitor<'de> for FieldVisitor {
            type Value = ();

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a valid uid field")
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
        Ok(UidKey)
    }
}

pub struct UidFromU64 {
    pub value: Uid,
}

impl<'de> de::Deserialize<'de> for UidFromU64 {
    fn deserialize<D>(deserializer: D) -> Result<UidFromU64, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        struct Visitor;

        impl<'de> de::Visitor<'de> for Visitor {
            type Value = UidFromU64;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a uid value")
            }

            fn visit_u64<E>(self, v: u64) -> Result<UidFromU64, E> {
                Ok(UidFromU64 { value: Uid(v) })
            }
        }

        deserializer.deserialize_u64(Visitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;
    use crate::serde_compat::{from_value, to_value};

    #[test]
    fn test_uid_roundtrips_through_value() {
        let uid = Uid(7);
        let value = to_value(&uid).unwrap();
        assert_eq!(value, Value::Uid(uid));
        let back: Uid = from_value(&value).unwrap();
        assert_eq!(back, uid);
    }
}
