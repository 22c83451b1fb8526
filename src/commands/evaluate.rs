//! `lmseval evaluate` command.

use std::path::Path;

use crate::cli::{InputArgs, ReportFormat};
use crate::config::EvalConfig;
use crate::context::ServiceContext;
use crate::evaluate::{EvaluationReport, Evaluator};

use super::inputs::{emit, load_artifacts, load_registry};

/// Execute the `evaluate` command.
///
/// Loads tasks and artifacts, grades every instance that has artifacts,
/// and writes the report. The load status and a summary go to stderr.
///
/// # Errors
///
/// Returns an error string if the timezone is unknown, an input cannot be
/// read, or the report cannot be written.
pub fn run_with_context(
    ctx: &ServiceContext,
    inputs: &InputArgs,
    timezone: Option<&str>,
    format: ReportFormat,
    output: Option<&Path>,
) -> Result<(), String> {
    let config = EvalConfig::resolve(timezone).map_err(|e| e.to_string())?;
    let report = evaluate(ctx, inputs, config)?;
    emit(ctx, output, &render_report(&report, format)?)?;
    eprintln!("{}", report.summary());
    Ok(())
}

/// Loads inputs and grades them.
///
/// # Errors
///
/// Returns an error string if the task file or an artifact directory cannot be read.
pub fn evaluate(
    ctx: &ServiceContext,
    inputs: &InputArgs,
    config: EvalConfig,
) -> Result<EvaluationReport, String> {
    let (registry, load_issues) = load_registry(ctx, &inputs.tasks)?;
    let artifacts = load_artifacts(ctx, &registry, inputs)?;
    let evaluator = Evaluator::new(&registry, config);
    eprintln!("{}", evaluator.status(&artifacts));
    Ok(evaluator.evaluate(&artifacts).with_load_issues(load_issues))
}

/// Serializes a report.
///
/// # Errors
///
/// Returns an error string if serialization fails.
pub fn render_report(report: &EvaluationReport, format: ReportFormat) -> Result<String, String> {
    match format {
        ReportFormat::Yaml => serde_yaml::to_string(report).map_err(|e| e.to_string()),
        ReportFormat::Json => serde_json::to_string_pretty(report).map_err(|e| e.to_string()),
    }
}
