//! A cyclic object table is not producible by the encoder (`Value` is an
//! owned tree) but is a valid-looking, corrupt/adversarial bplist00 document:
//! an array whose sole reference points back at itself. This builds that
//! document by hand to exercise the decoder's cycle rejection.

fn cyclic_document() -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"bplist00");

    // Object 0: a one-element array referencing itself.
    let object_offset = bytes.len();
    bytes.push(0xA1);
    bytes.push(0x00);

    let table_offset = bytes.len();
    bytes.push(object_offset as u8);

    bytes.extend_from_slice(&[0u8; 5]); // unused
    bytes.push(0); // sort_version
    bytes.push(1); // offset_table_entry_size
    bytes.push(1); // object_reference_size
    bytes.extend_from_slice(&1u64.to_be_bytes()); // number_of_objects
    bytes.extend_from_slice(&0u64.to_be_bytes()); // root_object
    bytes.extend_from_slice(&(table_offset as u64).to_be_bytes()); // offset_table_offset

    bytes
}

#[test]
fn test_decode_rejects_cyclic_document() {
    let document = cyclic_document();
    assert_eq!(bplist00::from_slice(&document), Err(bplist00::Error::CycleDetected));
}
