// In: src/bridge/tests.rs

//! End-to-end tests for the bridge: real files on disk, full configurations,
//! and the output-path asymmetry between compression and decompression.

use std::fs;

use crate::bridge::run_pipeline;
use crate::config::{PipelineConfig, SinkSpec, SourceSpec};
use crate::error::CasepipeError;

fn file_to_file(dir: &std::path::Path, input: &[u8], out_name: &str) -> PipelineConfig {
    let in_path = dir.join("in.txt");
    fs::write(&in_path, input).unwrap();
    PipelineConfig::new(
        SourceSpec::File(in_path),
        SinkSpec::File(dir.join(out_name)),
    )
}

/// The canonical scenario: file in, file out, no codec stages.
#[test]
fn test_file_to_file_uppercase() {
    let dir = tempfile::tempdir().unwrap();
    let config = file_to_file(dir.path(), b"hello world", "out.txt");

    let report = run_pipeline(&config).unwrap();

    assert_eq!(fs::read(dir.path().join("out.txt")).unwrap(), b"HELLO WORLD");
    assert_eq!(report.bytes_read, 11);
    assert_eq!(report.bytes_written, 11);
}

#[test]
fn test_compress_appends_suffix_to_the_file_sink() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = file_to_file(dir.path(), b"abc", "out.txt");
    config.compress = true;

    run_pipeline(&config).unwrap();

    // The configured name is untouched; the suffixed one carries the frame.
    assert!(!dir.path().join("out.txt").exists());
    let compressed = fs::read(dir.path().join("out.txt.zst")).unwrap();
    assert_eq!(
        zstd::stream::decode_all(&compressed[..]).unwrap(),
        b"ABC".to_vec()
    );
}

#[test]
fn test_uncompress_does_not_rename_the_file_sink() {
    let dir = tempfile::tempdir().unwrap();
    let compressed = zstd::stream::encode_all(&b"name test"[..], 3).unwrap();
    let mut config = file_to_file(dir.path(), &compressed, "plain.out");
    config.decompress = true;

    run_pipeline(&config).unwrap();

    assert_eq!(
        fs::read(dir.path().join("plain.out")).unwrap(),
        b"NAME TEST"
    );
}

#[test]
fn test_empty_file_produces_empty_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = file_to_file(dir.path(), b"", "out.txt");

    let report = run_pipeline(&config).unwrap();

    assert_eq!(fs::read(dir.path().join("out.txt")).unwrap(), b"");
    assert_eq!(report.bytes_written, 0);
}

#[test]
fn test_missing_input_file_is_an_io_error_naming_the_path() {
    let dir = tempfile::tempdir().unwrap();
    let config = PipelineConfig::new(
        SourceSpec::File(dir.path().join("does-not-exist.txt")),
        SinkSpec::File(dir.path().join("out.txt")),
    );

    let result = run_pipeline(&config);
    match result {
        Err(CasepipeError::Io(e)) => {
            assert!(e.to_string().contains("does-not-exist.txt"));
        }
        other => panic!("expected an I/O error, got {:?}", other),
    }
    // The sink is opened after the source, so nothing was created.
    assert!(!dir.path().join("out.txt").exists());
}

#[test]
fn test_malformed_input_leaves_an_empty_output_file() {
    // Partial output on failure is accepted, but a codec error on the very
    // first chunk must not let any bytes through.
    let dir = tempfile::tempdir().unwrap();
    let mut config = file_to_file(dir.path(), &[0xBA, 0xD0, 0xCA, 0xFE], "out.txt");
    config.decompress = true;

    let result = run_pipeline(&config);
    assert!(matches!(result, Err(CasepipeError::Stage { .. })));
    assert_eq!(fs::read(dir.path().join("out.txt")).unwrap(), b"");
}

#[test]
fn test_large_input_streams_through_bounded_memory_paths() {
    // 4 MiB of compressible text: far larger than one chunk, small enough
    // for CI. Exercises the chunk loop and the finish cascade together.
    let dir = tempfile::tempdir().unwrap();
    let line = b"the quick brown fox jumps over the lazy dog\n".repeat(100_000);
    let mut config = file_to_file(dir.path(), &line, "big.txt");
    config.compress = true;

    let report = run_pipeline(&config).unwrap();
    assert_eq!(report.bytes_read, line.len() as u64);

    let compressed = fs::read(dir.path().join("big.txt.zst")).unwrap();
    assert_eq!(report.bytes_written, compressed.len() as u64);

    let decoded = zstd::stream::decode_all(&compressed[..]).unwrap();
    assert_eq!(decoded.len(), line.len());
    assert!(decoded.iter().all(|&b| !b.is_ascii_lowercase()));
}

#[test]
fn test_sink_paths_are_resolved_relative_to_the_config() {
    // A PathBuf sink in a subdirectory that exists is honored as-is.
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("files")).unwrap();
    let config = file_to_file(dir.path(), b"nested", &format!("files{}out.txt", std::path::MAIN_SEPARATOR));

    run_pipeline(&config).unwrap();
    assert_eq!(
        fs::read(dir.path().join("files").join("out.txt")).unwrap(),
        b"NESTED"
    );
}
