// In: src/bridge/io.rs

//! Marshals source and sink descriptors into the engine's `Read`/`Write`
//! seams. File endpoints are buffered; stdio endpoints are locked for the
//! duration of the run (the run owns them exclusively).

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::config::{resolve_output_path, PipelineConfig, SourceSpec};
use crate::error::CasepipeError;

/// Decorates an I/O error with the path it concerns; the bare OS message
/// ("No such file or directory") is useless without it.
fn at_path(path: &Path, e: io::Error) -> CasepipeError {
    CasepipeError::Io(io::Error::new(
        e.kind(),
        format!("{}: {}", path.display(), e),
    ))
}

/// Opens the configured byte source.
pub fn open_source(spec: &SourceSpec) -> Result<Box<dyn Read>, CasepipeError> {
    match spec {
        SourceSpec::Stdin => Ok(Box::new(io::stdin().lock())),
        SourceSpec::File(path) => {
            let file = File::open(path).map_err(|e| at_path(path, e))?;
            Ok(Box::new(BufReader::new(file)))
        }
    }
}

/// Opens the configured byte sink, resolving the effective output path
/// (compressed-suffix handling included) from the whole configuration.
pub fn open_sink(config: &PipelineConfig) -> Result<Box<dyn Write>, CasepipeError> {
    match resolve_output_path(config) {
        None => Ok(Box::new(io::stdout().lock())),
        Some(path) => {
            let file = File::create(&path).map_err(|e| at_path(&path, e))?;
            Ok(Box::new(BufWriter::new(file)))
        }
    }
}
