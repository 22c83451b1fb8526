//! `lmseval status` command.

use crate::cli::InputArgs;
use crate::config::EvalConfig;
use crate::context::ServiceContext;
use crate::evaluate::{Evaluator, Status};

use super::inputs::{load_artifacts, load_registry};

/// Execute the `status` command.
///
/// Prints how many tasks, instances, network logs, and outputs were found.
///
/// # Errors
///
/// Returns an error string if the task file or an artifact directory cannot be read.
pub fn run_with_context(ctx: &ServiceContext, inputs: &InputArgs) -> Result<(), String> {
    println!("{}", status(ctx, inputs)?);
    Ok(())
}

/// Collects load counts without grading.
///
/// # Errors
///
/// Returns an error string if the task file or an artifact directory cannot be read.
pub fn status(ctx: &ServiceContext, inputs: &InputArgs) -> Result<Status, String> {
    let (registry, _) = load_registry(ctx, &inputs.tasks)?;
    let artifacts = load_artifacts(ctx, &registry, inputs)?;
    Ok(Evaluator::new(&registry, EvalConfig::default()).status(&artifacts))
}
