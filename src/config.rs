// In: src/config.rs

//! The single source of truth for all casepipe run configuration.
//!
//! This module defines the unified `PipelineConfig` struct, which is designed
//! to be created once at the application boundary (the CLI, or a test) and
//! then passed down through the system read-only. Centralizing the settings
//! here keeps the planner and executor free of flag handling, and makes the
//! effective output path a pure function of the configuration instead of a
//! mutable global.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Where output lands when neither `--out` nor an explicit sink is given.
pub const DEFAULT_OUTPUT_FILE: &str = "out.txt";

/// Extension appended to file sinks when compression is enabled.
pub const COMPRESSED_SUFFIX: &str = "zst";

//==================================================================================
// I. Core Configuration Enums & Structs
//==================================================================================

/// The byte-producing end of a pipeline run.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SourceSpec {
    /// Read from the process's standard input stream.
    Stdin,
    /// Read from a named file (opened read-only, buffered).
    File(PathBuf),
}

/// The byte-consuming end of a pipeline run.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SinkSpec {
    /// Write to the process's standard output stream.
    Stdout,
    /// Write to a named file (created or truncated).
    File(PathBuf),
}

/// Defines the trade-off between compression speed and output size.
///
/// This is the primary input when mapping the `Compress` stage onto a concrete
/// zstd level, letting the user guide the outcome without knowing the levels.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CompressionProfile {
    /// Prioritizes speed over size.
    Fast,

    /// A balance between speed and size. This is the recommended default.
    #[default]
    Balanced,

    /// Prioritizes the smallest possible output at the cost of CPU time.
    HighCompression,
}

//==================================================================================
// II. The Unified PipelineConfig
//==================================================================================

/// The single, unified configuration for one pipeline run.
/// Immutable once constructed; the run owns it exclusively.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct PipelineConfig {
    /// Exactly one input source.
    pub source: SourceSpec,

    /// Exactly one output sink. File sinks may still be renamed by
    /// `resolve_output_path` when compression is enabled.
    pub sink: SinkSpec,

    /// Prepend a `Decompress` stage before the transform.
    #[serde(default)]
    pub decompress: bool,

    /// Append a `Compress` stage after the transform.
    #[serde(default)]
    pub compress: bool,

    /// The profile guiding compression/speed trade-offs.
    #[serde(default)]
    pub profile: CompressionProfile,
}

impl PipelineConfig {
    /// A plain transform-only configuration between the given endpoints.
    pub fn new(source: SourceSpec, sink: SinkSpec) -> Self {
        Self {
            source,
            sink,
            decompress: false,
            compress: false,
            profile: CompressionProfile::default(),
        }
    }
}

//==================================================================================
// III. Output Path Resolution
//==================================================================================

/// Computes the effective output path for a configuration, or `None` for a
/// stdout sink.
///
/// When compression is enabled and the sink is a file, the compressed suffix
/// is appended to the configured name (`out.txt` becomes `out.txt.zst`).
/// Decompression never alters the output name; the asymmetry is deliberate.
pub fn resolve_output_path(config: &PipelineConfig) -> Option<PathBuf> {
    match &config.sink {
        SinkSpec::Stdout => None,
        SinkSpec::File(path) => {
            if config.compress {
                Some(append_suffix(path, COMPRESSED_SUFFIX))
            } else {
                Some(path.clone())
            }
        }
    }
}

/// Appends `.suffix` to the file name, keeping the existing extension
/// (`out.txt` -> `out.txt.zst`, never `out.zst`).
fn append_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".");
    name.push(suffix);
    path.with_file_name(name)
}

//==================================================================================
// Unit Tests
//==================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn file_config(out: &str) -> PipelineConfig {
        PipelineConfig::new(
            SourceSpec::File(PathBuf::from("in.txt")),
            SinkSpec::File(PathBuf::from(out)),
        )
    }

    #[test]
    fn test_plain_file_sink_is_unchanged() {
        let config = file_config("out.txt");
        assert_eq!(
            resolve_output_path(&config),
            Some(PathBuf::from("out.txt"))
        );
    }

    #[test]
    fn test_compress_appends_suffix_without_replacing_extension() {
        let mut config = file_config("files/out.txt");
        config.compress = true;
        assert_eq!(
            resolve_output_path(&config),
            Some(PathBuf::from("files/out.txt.zst"))
        );
    }

    #[test]
    fn test_decompress_never_renames() {
        let mut config = file_config("out.txt");
        config.decompress = true;
        assert_eq!(
            resolve_output_path(&config),
            Some(PathBuf::from("out.txt"))
        );
    }

    #[test]
    fn test_stdout_sink_has_no_path() {
        let mut config = PipelineConfig::new(SourceSpec::Stdin, SinkSpec::Stdout);
        config.compress = true;
        assert_eq!(resolve_output_path(&config), None);
    }

    #[test]
    fn test_config_roundtrips_through_json() {
        let mut config = file_config("out.txt");
        config.compress = true;
        config.profile = CompressionProfile::HighCompression;

        let json = serde_json::to_string(&config).unwrap();
        let back: PipelineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }
}
