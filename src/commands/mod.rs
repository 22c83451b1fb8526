//! Command dispatch and handlers.

pub mod evaluate;
pub mod export;
pub mod status;

mod inputs;

use crate::cli::Command;
use crate::context::ServiceContext;
use crate::export::ExportOptions;

/// Dispatch a parsed command to its handler against the local filesystem.
///
/// # Errors
///
/// Returns an error string if the selected command handler fails.
pub fn dispatch(command: &Command) -> Result<(), String> {
    dispatch_with_context(command, &ServiceContext::live())
}

/// Dispatch a command with the given service context.
///
/// # Errors
///
/// Returns an error string if the selected command handler fails.
pub fn dispatch_with_context(command: &Command, ctx: &ServiceContext) -> Result<(), String> {
    match command {
        Command::Evaluate { inputs, timezone, format, output } => {
            evaluate::run_with_context(ctx, inputs, timezone.as_deref(), *format, output.as_deref())
        }
        Command::Status { inputs } => status::run_with_context(ctx, inputs),
        Command::Export { tasks, target, base_url, username, password, output } => {
            let options = ExportOptions {
                base_url: base_url.clone(),
                credentials: export::credentials(username.as_deref(), password.as_deref()),
            };
            export::run_with_context(ctx, tasks, (*target).into(), &options, output.as_deref())
        }
    }
}
