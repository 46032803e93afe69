use std::fs;
use std::path::PathBuf;

use oleander::diagnostics::LoadError;
use oleander::loader::load_source;
use oleander::signature::signature_length;
use tempfile::{tempdir, TempDir};

fn fixture(dir: &TempDir, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, bytes).expect("write fixture");
    path
}

#[test]
fn recognizes_known_signatures() {
    let cases: &[(&[u8], usize)] = &[
        (&[0xEF, 0xBB, 0xBF, b'a', b'b'], 3),       // UTF-8
        (&[0xFE, 0xFF, b'a', b'b', b'c'], 2),       // UTF-16 BE
        (&[0xFF, 0xFE, b'a', 0x01, b'c'], 2),       // UTF-16 LE
        (&[0x00, 0x00, 0xFE, 0xFF, b'a'], 4),       // UTF-32 BE
        (&[0xFF, 0xFE, 0x00, 0x00, b'a'], 4),       // UTF-32 LE over UTF-16 LE
        (&[0x2B, 0x2F, 0x76, 0x38, b'a'], 4),       // UTF-7
        (&[0x2B, 0x2F, 0x76, 0x39, b'a'], 4),       // UTF-7
        (&[0x2B, 0x2F, 0x76, 0x2B, b'a'], 4),       // UTF-7
        (&[0x2B, 0x2F, 0x76, 0x2F, b'a'], 4),       // UTF-7
        (&[0xF7, 0x64, 0x4C, b'a', b'b'], 3),       // UTF-1
        (&[0xDD, 0x73, 0x66, 0x73, b'a'], 4),       // UTF-EBCDIC
        (&[0x0E, 0xFE, 0xFF, b'a', b'b'], 3),       // SCSU
        (&[0xFB, 0xEE, 0x28, b'a', b'b'], 3),       // BOCU-1
        (&[0xFB, 0xEE, 0x28, 0xFF, b'a'], 4),       // BOCU-1, long form
        (&[0x84, 0x31, 0x95, 0x33, b'a'], 4),       // GB-18030
    ];
    for (bytes, expected) in cases {
        assert_eq!(signature_length(bytes), *expected, "bytes {bytes:?}");
    }
}

#[test]
fn reports_zero_for_unrecognized_or_short_input() {
    assert_eq!(signature_length(b"say 1"), 0);
    assert_eq!(signature_length(&[]), 0);
    assert_eq!(signature_length(&[0xEF, 0xBB]), 0);
    assert_eq!(signature_length(&[0xFF]), 0);
}

#[test]
fn strips_signature_from_files_larger_than_the_window() {
    let dir = tempdir().expect("create temp dir");
    let mut contents = vec![0xEF, 0xBB, 0xBF];
    contents.extend_from_slice(b"x = 1\n");
    let path = fixture(&dir, "marked.ol", &contents);

    let source = load_source(&path).expect("load marked file");
    // Content shifts left by the signature length; the reported length keeps
    // the on-disk size and the tail of the buffer stays zeroed.
    assert_eq!(source.len(), contents.len());
    assert_eq!(&source.bytes()[..6], b"x = 1\n");
    assert_eq!(&source.bytes()[6..], &[0, 0, 0, 0]);
    assert_eq!(source.text(), "x = 1\n");
}

#[test]
fn strips_signature_right_above_the_window_boundary() {
    let dir = tempdir().expect("create temp dir");
    let path = fixture(&dir, "six.ol", &[0xEF, 0xBB, 0xBF, b'a', b'b', b'c']);

    let source = load_source(&path).expect("load six-byte file");
    assert_eq!(source.len(), 6);
    assert_eq!(&source.bytes()[..3], b"abc");
    assert_eq!(&source.bytes()[3..], &[0, 0, 0, 0]);
    assert_eq!(source.text(), "abc");
}

#[test]
fn keeps_signature_in_files_at_most_window_sized() {
    let dir = tempdir().expect("create temp dir");
    let contents = [0xEF, 0xBB, 0xBF, b'1', b'\n'];
    let path = fixture(&dir, "tiny.ol", &contents);

    let source = load_source(&path).expect("load tiny file");
    assert_eq!(source.len(), 5);
    assert_eq!(&source.bytes()[..5], &contents);
    assert_eq!(source.bytes()[5], 0);
}

#[test]
fn loads_unmarked_files_verbatim() {
    let dir = tempdir().expect("create temp dir");
    let path = fixture(&dir, "plain.ol", b"say 40 + 2\n");

    let source = load_source(&path).expect("load plain file");
    assert_eq!(source.len(), 11);
    assert_eq!(&source.bytes()[..11], b"say 40 + 2\n");
    assert_eq!(source.bytes()[11], 0);
    assert_eq!(source.text(), "say 40 + 2\n");
}

#[test]
fn empty_file_loads_as_empty_source() {
    let dir = tempdir().expect("create temp dir");
    let path = fixture(&dir, "empty.ol", b"");

    let source = load_source(&path).expect("load empty file");
    assert!(source.is_empty());
    assert_eq!(source.len(), 0);
    assert_eq!(source.bytes(), &[0]);
    assert_eq!(source.text(), "");
}

#[test]
fn missing_file_reports_an_open_error() {
    let dir = tempdir().expect("create temp dir");
    let err = load_source(&dir.path().join("absent.ol")).expect_err("load should fail");
    assert!(matches!(err, LoadError::Open(_)));
}
