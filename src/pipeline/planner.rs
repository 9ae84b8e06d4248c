// In: src/pipeline/planner.rs

//! The deterministic stage planner for casepipe.
//!
//! The planner turns an immutable `PipelineConfig` into the single valid
//! `StagePlan` for that configuration. Ordering is fixed by the pipeline
//! invariant (decompress, transform, compress) rather than discovered at
//! runtime, so the executor never has to reason about stage order itself.

use crate::config::{CompressionProfile, PipelineConfig};
use crate::error::CasepipeError;
use crate::pipeline::models::{StageKind, StagePlan, PLAN_VERSION};

/// Maps the user-facing profile onto a concrete zstd level.
fn zstd_level_for(profile: CompressionProfile) -> i32 {
    match profile {
        CompressionProfile::Fast => 1,
        CompressionProfile::Balanced => 3,
        CompressionProfile::HighCompression => 19,
    }
}

/// Builds the ordered stage plan for `config`.
///
/// The transform stage is always present; `Decompress` and `Compress` are
/// included when the corresponding toggles are set. The emitted plan is
/// validated before being returned.
pub fn build_plan(config: &PipelineConfig) -> Result<StagePlan, CasepipeError> {
    let mut stages = Vec::with_capacity(3);

    if config.decompress {
        stages.push(StageKind::Decompress);
    }

    stages.push(StageKind::Uppercase);

    if config.compress {
        stages.push(StageKind::Compress {
            level: zstd_level_for(config.profile),
        });
    }

    let plan = StagePlan {
        plan_version: PLAN_VERSION,
        stages,
    };
    plan.validate()?;

    log::debug!("planned stages: {:?}", plan.stages);
    Ok(plan)
}

//==================================================================================
// Unit Tests
//==================================================================================
