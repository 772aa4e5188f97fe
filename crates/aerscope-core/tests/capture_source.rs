use std::fs;
use std::path::Path;

use aerscope_core::{CaptureFileSource, ChunkSource, SourceError};
use tempfile::TempDir;

#[test]
fn capture_source_reads_whole_file_in_chunks() {
    let temp = TempDir::new().expect("tempdir");
    let path = temp.path().join("input.aers");
    let bytes: Vec<u8> = (0..10_000u32).map(|n| n as u8).collect();
    fs::write(&path, &bytes).expect("write capture");

    let mut source = CaptureFileSource::open(&path).expect("open capture");
    let mut read_back = Vec::new();
    let mut chunks = 0;
    while let Some(chunk) = source.next_chunk().expect("next chunk") {
        assert!(!chunk.is_empty());
        read_back.extend_from_slice(&chunk);
        chunks += 1;
    }

    assert_eq!(read_back, bytes);
    assert!(chunks > 1, "10k bytes should span multiple chunks");
}

#[test]
fn empty_capture_yields_no_chunks() {
    let temp = TempDir::new().expect("tempdir");
    let path = temp.path().join("empty.aers");
    fs::write(&path, []).expect("write capture");

    let mut source = CaptureFileSource::open(&path).expect("open capture");
    assert!(source.next_chunk().expect("next chunk").is_none());
}

#[test]
fn missing_capture_is_an_io_error() {
    let err = match CaptureFileSource::open(Path::new("/nonexistent/capture.aers")) {
        Ok(_) => panic!("expected missing file to be rejected"),
        Err(err) => err,
    };
    assert!(matches!(err, SourceError::Io(_)));
}
