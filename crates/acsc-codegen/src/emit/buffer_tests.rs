use std::fs;

use super::{CodeBuffer, EmitError, PAGE_SIZE};

#[test]
fn appends_little_endian() {
    let mut buf = CodeBuffer::new();
    buf.append_u8(1);
    buf.append_i16(-2);
    buf.append_i32(0x0102_0304);
    buf.append_cstr("ab");
    buf.append_str("c");

    assert_eq!(
        buf.to_vec(),
        [1, 0xfe, 0xff, 4, 3, 2, 1, b'a', b'b', 0, b'c']
    );
    assert_eq!(buf.tell(), 11);
    assert_eq!(buf.len(), 11);
}

#[test]
fn seek_overwrites_without_truncating() {
    let mut buf = CodeBuffer::new();
    buf.append_zeros(8);

    buf.seek(2);
    buf.append_i32(-1);
    assert_eq!(buf.tell(), 6);
    assert_eq!(buf.to_vec(), [0, 0, 0xff, 0xff, 0xff, 0xff, 0, 0]);

    buf.seek_end();
    assert_eq!(buf.tell(), 8);
    buf.append_u8(9);
    assert_eq!(buf.len(), 9);
}

#[test]
fn overwrite_can_extend_past_the_end() {
    let mut buf = CodeBuffer::new();
    buf.append_bytes(&[1, 2, 3]);
    buf.seek(2);
    buf.append_bytes(&[7, 8, 9]);

    assert_eq!(buf.to_vec(), [1, 2, 7, 8, 9]);
}

#[test]
fn writes_span_pages() {
    let mut buf = CodeBuffer::new();
    buf.append_bytes(&vec![7u8; PAGE_SIZE - 2]);
    buf.append_i32(0x1122_3344);

    assert_eq!(buf.len(), PAGE_SIZE + 2);
    assert_eq!(buf.tell(), PAGE_SIZE + 2);
    assert_eq!(buf.to_vec()[PAGE_SIZE - 2..], [0x44, 0x33, 0x22, 0x11]);

    // patch across the page boundary
    buf.seek(PAGE_SIZE - 1);
    buf.append_i16(-1);
    assert_eq!(buf.tell(), PAGE_SIZE + 1);
    assert_eq!(buf.len(), PAGE_SIZE + 2);
    assert_eq!(buf.to_vec()[PAGE_SIZE - 2..], [0x44, 0xff, 0xff, 0x11]);

    buf.seek_end();
    assert_eq!(buf.tell(), PAGE_SIZE + 2);
}

#[test]
fn seek_to_end_of_full_page() {
    let mut buf = CodeBuffer::new();
    buf.append_bytes(&vec![1u8; PAGE_SIZE]);

    buf.seek(0);
    buf.seek(PAGE_SIZE);
    assert_eq!(buf.tell(), PAGE_SIZE);

    buf.append_u8(2);
    assert_eq!(buf.len(), PAGE_SIZE + 1);
    assert_eq!(buf.to_vec()[PAGE_SIZE], 2);
}

#[test]
fn seek_into_later_page() {
    let mut buf = CodeBuffer::new();
    buf.append_zeros(PAGE_SIZE * 2 + 4);

    buf.seek(PAGE_SIZE + 1);
    buf.append_u8(5);
    buf.seek_end();

    let bytes = buf.to_vec();
    assert_eq!(bytes.len(), PAGE_SIZE * 2 + 4);
    assert_eq!(bytes[PAGE_SIZE + 1], 5);
    assert_eq!(bytes.iter().filter(|&&b| b != 0).count(), 1);
}

#[test]
#[should_panic(expected = "past end of buffer")]
fn seek_past_end_panics() {
    let mut buf = CodeBuffer::new();
    buf.append_zeros(4);
    buf.seek(5);
}

#[test]
fn flush_creates_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.o");

    let mut buf = CodeBuffer::new();
    buf.append_str("ACSe");
    buf.append_i32(8);
    buf.flush_to_file(&path).unwrap();

    assert_eq!(fs::read(&path).unwrap(), buf.to_vec());
}

#[test]
fn flush_replaces_previous_object() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.o");
    fs::write(&path, b"ACSE\x08\0\0\0 previous build output").unwrap();

    let mut buf = CodeBuffer::new();
    buf.append_str("ACSe");
    buf.append_i32(8);
    buf.flush_to_file(&path).unwrap();

    assert_eq!(fs::read(&path).unwrap(), b"ACSe\x08\0\0\0");
}

#[test]
fn flush_refuses_foreign_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("map.wad");
    fs::write(&path, b"PWAD\0\0\0\0").unwrap();

    let mut buf = CodeBuffer::new();
    buf.append_str("ACSe");
    let err = buf.flush_to_file(&path).unwrap_err();

    assert!(matches!(&err, EmitError::UnknownFileOverwrite(p) if *p == path));
    assert_eq!(fs::read(&path).unwrap(), b"PWAD\0\0\0\0");
}

#[test]
fn flush_refuses_empty_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.o");
    fs::write(&path, b"").unwrap();

    let err = CodeBuffer::new().flush_to_file(&path).unwrap_err();
    assert!(matches!(err, EmitError::UnknownFileOverwrite(_)));
}

#[test]
fn flush_reports_io_errors() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("out.o");

    let err = CodeBuffer::new().flush_to_file(&path).unwrap_err();
    let EmitError::Io { path: reported, .. } = &err else {
        panic!("expected io error, got {err:?}");
    };
    assert_eq!(*reported, path);
    assert!(err.to_string().starts_with("failed to write object file"));
}
