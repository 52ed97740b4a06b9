use crate::StringTable;

#[test]
fn intern_deduplicates() {
    let mut table = StringTable::new();

    let a = table.intern("hello");
    let b = table.intern("hello");
    let c = table.intern("world");

    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(table.len(), 2);
}

#[test]
fn intern_marks_unused_slot_used() {
    let mut table = StringTable::new();
    table.push("lazy", false);
    assert_eq!(table.count(), 0);

    assert_eq!(table.intern("lazy"), 0);
    assert_eq!(table.count(), 1);
}

#[test]
fn count_stops_at_last_used() {
    let mut table = StringTable::new();
    table.push("a", false);
    table.push("b", true);
    table.push("c", false);

    assert_eq!(table.len(), 3);
    assert_eq!(table.count(), 2);
}

#[test]
fn empty_table_has_zero_count() {
    let table = StringTable::new();
    assert!(table.is_empty());
    assert_eq!(table.count(), 0);
}

#[test]
fn values_are_bytes() {
    let mut table = StringTable::new();
    let index = table.push([b'o', 0xf9], true);

    assert_eq!(table.get(index).unwrap().value, [b'o', 0xf9]);
    assert_eq!(table.intern(b"o\xf9"), index);
}

#[test]
fn json_accepts_text_and_byte_arrays() {
    let table: StringTable =
        serde_json::from_str(r#"[{ "value": "hi" }, { "value": [99, 233], "used": false }]"#)
            .unwrap();

    assert_eq!(table.get(0).unwrap().value, b"hi");
    assert_eq!(table.get(1).unwrap().value, [99, 233]);
    assert!(!table.get(1).unwrap().used);

    let json = serde_json::to_string(&table).unwrap();
    assert_eq!(json, r#"[{"value":"hi","used":true},{"value":[99,233],"used":false}]"#);
}
