// In: src/pipeline/executor.rs

//! The pipeline executor.
//!
//! `run_plan` is the engine behind every casepipe invocation: it instantiates
//! one stage object per plan entry and drives a single chunk-at-a-time loop
//! from the source to the sink. The loop is pull-push synchronous, so a slow
//! sink blocks the write and thereby pauses further reads; memory stays
//! bounded regardless of input size.
//!
//! Completion is reported exactly once, and only after the sink has accepted
//! the finish cascade and the final flush. Any stage or sink error aborts the
//! run immediately; there are no retries.

use std::io::{ErrorKind, Read, Write};

use crate::error::CasepipeError;
use crate::kernels::upper::UppercaseStage;
use crate::kernels::zstd::{ZstdCompressStage, ZstdDecompressStage};
use crate::pipeline::models::{RunReport, StageKind, StagePlan};
use crate::pipeline::traits::Stage;

/// Size of the read buffer. This bounds the unit of streaming granularity,
/// not the input: arbitrarily large inputs flow through in 64 KiB chunks.
pub(crate) const CHUNK_SIZE: usize = 64 * 1024;

/// Materializes the stage object for one plan entry.
fn instantiate(kind: &StageKind) -> Result<Box<dyn Stage>, CasepipeError> {
    match kind {
        StageKind::Decompress => Ok(Box::new(ZstdDecompressStage::new()?)),
        StageKind::Uppercase => Ok(Box::new(UppercaseStage::new())),
        StageKind::Compress { level } => Ok(Box::new(ZstdCompressStage::new(*level)?)),
    }
}

/// Executes `plan` over `source`, writing the result to `sink`.
///
/// Chunks are observed by stage *n + 1* only after stage *n*, and the report
/// is produced only after the sink has flushed the last byte.
pub fn run_plan(
    source: &mut dyn Read,
    plan: &StagePlan,
    sink: &mut dyn Write,
) -> Result<RunReport, CasepipeError> {
    plan.validate()?;

    let mut stages = plan
        .stages
        .iter()
        .map(instantiate)
        .collect::<Result<Vec<_>, _>>()?;

    let mut report = RunReport::default();
    let mut buf = vec![0u8; CHUNK_SIZE];

    loop {
        let n = match source.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        report.bytes_read += n as u64;

        let mut chunk = buf[..n].to_vec();
        for stage in stages.iter_mut() {
            chunk = stage
                .process(&chunk)
                .map_err(|e| CasepipeError::in_stage(stage.name(), e))?;
        }

        if !chunk.is_empty() {
            sink.write_all(&chunk)?;
            report.bytes_written += chunk.len() as u64;
        }
    }

    // Finish cascade: each stage's tail must flow through every stage
    // downstream of it before that stage is finished in turn.
    for first in 0..stages.len() {
        let (finishing, downstream) = stages[first..]
            .split_first_mut()
            .expect("plan validation guarantees at least one stage");

        let mut tail = finishing
            .finish()
            .map_err(|e| CasepipeError::in_stage(finishing.name(), e))?;

        for stage in downstream.iter_mut() {
            tail = stage
                .process(&tail)
                .map_err(|e| CasepipeError::in_stage(stage.name(), e))?;
        }

        if !tail.is_empty() {
            sink.write_all(&tail)?;
            report.bytes_written += tail.len() as u64;
        }
    }

    // The run is complete only once the sink has taken the final flush; the
    // source running dry is not completion.
    sink.flush()?;

    log::debug!(
        "run complete: {} bytes in, {} bytes out",
        report.bytes_read,
        report.bytes_written
    );
    Ok(report)
}
