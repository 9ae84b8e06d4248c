// In: src/pipeline/models.rs

//! Strongly-typed descriptions of a pipeline run.
//!
//! `StageKind` and `StagePlan` are the contract between the planner and the
//! executor: the planner emits a validated, ordered plan, and the executor is
//! driven directly by it. Because the plan is a plain serde value it can be
//! logged as a single inspectable JSON document instead of being emergent
//! from a chain of stream reassignments.

use serde::{Deserialize, Serialize};

use crate::error::CasepipeError;

// A const for the plan version, ensuring consistency.
pub const PLAN_VERSION: u32 = 1;

//==================================================================================
// 1. Stage Descriptors
//==================================================================================

/// One stage of the pipeline, tagged with any parameters it needs.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum StageKind {
    /// Streaming zstd decompression of the input.
    Decompress,
    /// The mandatory text transform: Unicode default uppercase mapping.
    Uppercase,
    /// Streaming zstd compression of the output at the given level.
    Compress { level: i32 },
}

impl StageKind {
    /// Stable stage name used for logging and error attribution.
    pub fn name(&self) -> &'static str {
        match self {
            StageKind::Decompress => "decompress",
            StageKind::Uppercase => "uppercase",
            StageKind::Compress { .. } => "compress",
        }
    }
}

//==================================================================================
// 2. The Stage Plan
//==================================================================================

/// An ordered, validated list of stages for one run.
///
/// Invariants: exactly one `Uppercase` stage is present; `Decompress` (if
/// present) is first; `Compress` (if present) is last.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct StagePlan {
    pub plan_version: u32,
    pub stages: Vec<StageKind>,
}

impl StagePlan {
    /// Checks the structural invariants above. The planner can only emit
    /// well-formed plans; this guards hand-built ones.
    pub fn validate(&self) -> Result<(), CasepipeError> {
        let transforms = self
            .stages
            .iter()
            .filter(|s| matches!(s, StageKind::Uppercase))
            .count();
        if transforms != 1 {
            return Err(CasepipeError::Config(format!(
                "plan must contain exactly one transform stage, found {}",
                transforms
            )));
        }

        let last = self.stages.len() - 1;
        for (idx, stage) in self.stages.iter().enumerate() {
            match stage {
                StageKind::Decompress if idx != 0 => {
                    return Err(CasepipeError::Config(
                        "decompress stage must precede the transform".into(),
                    ));
                }
                StageKind::Compress { .. } if idx != last => {
                    return Err(CasepipeError::Config(
                        "compress stage must follow the transform".into(),
                    ));
                }
                StageKind::Compress { level } if !(1..=22).contains(level) => {
                    return Err(CasepipeError::Config(format!(
                        "unsupported zstd level {}, expected 1..=22",
                        level
                    )));
                }
                _ => {}
            }
        }
        Ok(())
    }
}

//==================================================================================
// 3. Run Outcome
//==================================================================================

/// Byte totals for one completed run. Produced exactly once, only after the
/// sink has accepted and flushed every byte.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    pub bytes_read: u64,
    pub bytes_written: u64,
}

//==================================================================================
// Unit Tests
//==================================================================================
