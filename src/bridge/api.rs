// In: src/bridge/api.rs

//! The high-level entry point: one configuration in, one run outcome out.

use crate::bridge::io;
use crate::config::PipelineConfig;
use crate::error::CasepipeError;
use crate::pipeline::models::RunReport;
use crate::pipeline::{executor, planner};

/// Plans and executes a single pipeline run for `config`.
///
/// Returns `Ok` exactly once, only after the sink has accepted and flushed
/// every byte. Any configuration, I/O, or codec failure aborts the run and
/// becomes the outcome; partial output files are not removed.
pub fn run_pipeline(config: &PipelineConfig) -> Result<RunReport, CasepipeError> {
    let plan = planner::build_plan(config)?;
    log::debug!("stage plan: {}", serde_json::to_string(&plan)?);

    let mut source = io::open_source(&config.source)?;
    let mut sink = io::open_sink(config)?;

    let report = executor::run_plan(source.as_mut(), &plan, sink.as_mut())?;
    log::info!(
        "pipeline complete: {} bytes in, {} bytes out",
        report.bytes_read,
        report.bytes_written
    );
    Ok(report)
}
