//! Core library entry for the `lmseval` CLI.
//!
//! Scores web-agent runs against Canvas benchmark tasks. Side-effect tasks
//! are graded by matching captured API calls against expected calls;
//! Information Seeking tasks by extracting and comparing the agent's answer.

pub mod adapters;
pub mod answer;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod evaluate;
pub mod export;
pub mod matcher;
pub mod ports;
pub mod query;
pub mod task;
pub mod telemetry;
pub mod trace;

use clap::Parser;

pub use error::EvalError;

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution fails.
pub fn run<I, T>(args: I) -> std::result::Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = cli::Cli::try_parse_from(args).map_err(|err| err.to_string())?;
    telemetry::init_tracing(cli.log_json, cli.log_level);
    commands::dispatch(&cli.command)
}
