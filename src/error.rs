// In: src/error.rs

//! This module defines the single, unified error type for the entire casepipe
//! library. It uses the `thiserror` crate to provide ergonomic, context-aware
//! error handling.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CasepipeError {
    // =========================================================================
    // === High-Level, Semantic Errors (Specific to our library's logic)
    // =========================================================================
    /// Bad, missing, or conflicting configuration. The CLI prints usage text
    /// in addition to the message when it sees this variant.
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Internal logic error (this is a bug): {0}")]
    Internal(String),

    // =========================================================================
    // === External Error Wrappers (Using #[from] for automatic conversion)
    // =========================================================================
    /// An error originating from the underlying I/O subsystem (e.g., file not
    /// found, broken pipe, write failure).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An error from the Serde JSON library, raised when serializing a stage
    /// plan for logging.
    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    // =========================================================================
    // === Low-Level Pipeline/Kernel Errors
    // =========================================================================
    /// Malformed or truncated compressed input, or an encoder failure.
    #[error("Codec error: {0}")]
    Codec(String),

    #[error("Pipeline execution failed at stage '{stage}': {source}")]
    Stage {
        stage: &'static str,
        #[source]
        source: Box<CasepipeError>,
    },
}

impl CasepipeError {
    /// Wraps an error with the name of the pipeline stage that raised it.
    pub(crate) fn in_stage(stage: &'static str, source: CasepipeError) -> Self {
        CasepipeError::Stage {
            stage,
            source: Box::new(source),
        }
    }

    /// True for errors that should be accompanied by usage output.
    pub fn is_config(&self) -> bool {
        matches!(self, CasepipeError::Config(_))
    }
}
