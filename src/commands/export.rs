//! `lmseval export` command.

use std::path::Path;

use tracing::warn;

use crate::context::ServiceContext;
use crate::export::{render, Credentials, ExportOptions, ExportTarget};

use super::inputs::{emit, load_task_definitions};

/// Execute the `export` command.
///
/// # Errors
///
/// Returns an error string if the task file cannot be read or the task
/// list cannot be written.
pub fn run_with_context(
    ctx: &ServiceContext,
    tasks: &Path,
    target: ExportTarget,
    options: &ExportOptions,
    output: Option<&Path>,
) -> Result<(), String> {
    let definitions = load_task_definitions(ctx, tasks)?;
    if target == ExportTarget::WebVoyager && options.credentials.is_none() {
        warn!("no --username/--password given; tasks will not include login instructions");
    }
    let rendered = render(target, &definitions, options).map_err(|e| e.to_string())?;
    emit(ctx, output, &rendered)
}

/// Pairs the optional login flags.
#[must_use]
pub fn credentials(username: Option<&str>, password: Option<&str>) -> Option<Credentials> {
    match (username, password) {
        (Some(username), Some(password)) => {
            Some(Credentials { username: username.to_string(), password: password.to_string() })
        }
        _ => None,
    }
}
