//! Round-trips a plain `Vec<u8>` through the full write/read pipeline via the
//! serde bridge, exercising encode -> decode -> `Value` -> `Vec<u8>`.

#[test]
fn test_roundtrip_integer_list() {
    let original = vec![1u8, 2, 3, 4, 5];
    let document = bplist00::serde_compat::to_vec(&original).unwrap();
    let decoded: Vec<u8> = bplist00::serde_compat::from_slice(&document).unwrap();
    assert_eq!(decoded, original);
}

#[test]
fn test_integer_list_as_value() {
    let original = vec![1u8, 2, 3, 4, 5];
    let document = bplist00::serde_compat::to_vec(&original).unwrap();
    let decoded = bplist00::from_slice(&document).unwrap();
    assert_eq!(
        decoded,
        bplist00::Value::Array(vec![
            bplist00::Value::Int(1),
            bplist00::Value::Int(2),
            bplist00::Value::Int(3),
            bplist00::Value::Int(4),
            bplist00::Value::Int(5),
        ])
    );
}
