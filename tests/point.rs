//! Round-trips a user struct through the serde bridge, and separately checks
//! that the same document reads back as a plain `Value::Dict` through the
//! core (non-serde) API.

use serde::{Deserialize, Serialize};

use std::collections::BTreeMap;

use bplist00::Value;

#[derive(Eq, PartialEq, Serialize, Deserialize, Debug)]
struct Point {
    x: u64,
    y: u64,
}

fn point_document() -> Vec<u8> {
    bplist00::serde_compat::to_vec(&Point { x: 1, y: 20 }).unwrap()
}

#[test]
fn test_roundtrip_point() {
    let document = point_document();
    let decoded: Point = bplist00::serde_compat::from_slice(&document).unwrap();
    assert_eq!(decoded, Point { x: 1, y: 20 });
}

#[test]
fn test_decode_point_as_value() {
    let document = point_document();
    let decoded = bplist00::from_slice(&document).unwrap();

    let mut expected = BTreeMap::new();
    expected.insert(Value::string("x"), Value::Int(1));
    expected.insert(Value::string("y"), Value::Int(20));

    assert_eq!(decoded, Value::Dict(expected));
}
