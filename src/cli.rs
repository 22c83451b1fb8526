//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::Level;

use crate::export::{ExportTarget, DEFAULT_BASE_URL};

/// Top-level CLI parser for `lmseval`.
#[derive(Debug, Parser)]
#[command(name = "lmseval", version, about = "Score web-agent runs against Canvas benchmark tasks")]
pub struct Cli {
    /// Write logs as JSON lines.
    #[arg(long, global = true)]
    pub log_json: bool,
    /// Log level used when `RUST_LOG` is unset.
    #[arg(long, global = true, default_value_t = Level::INFO)]
    pub log_level: Level,
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Grade agent artifacts and print the report.
    Evaluate {
        /// Inputs to grade.
        #[command(flatten)]
        inputs: InputArgs,
        /// IANA zone agent date-times are read in.
        #[arg(long)]
        timezone: Option<String>,
        /// Report format.
        #[arg(long, value_enum, default_value_t = ReportFormat::Yaml)]
        format: ReportFormat,
        /// Write the report to this file instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show how many tasks and artifacts were found.
    Status {
        /// Inputs to inspect.
        #[command(flatten)]
        inputs: InputArgs,
    },
    /// Write a task list for an agent executor.
    Export {
        /// Task definitions file.
        #[arg(short, long)]
        tasks: PathBuf,
        /// Executor to write for.
        #[arg(long, value_enum)]
        target: Target,
        /// Canvas URL the executor starts from.
        #[arg(long, default_value = DEFAULT_BASE_URL)]
        base_url: String,
        /// Shared Canvas login.
        #[arg(long, requires = "password")]
        username: Option<String>,
        /// Shared Canvas password.
        #[arg(long, requires = "username")]
        password: Option<String>,
        /// Write the task list to this file instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Task definitions plus the artifact directories to load.
#[derive(Debug, Clone, Args)]
pub struct InputArgs {
    /// Task definitions file (`tasks.json`).
    #[arg(short, long)]
    pub tasks: PathBuf,
    /// Directory of WebVoyager network logs.
    #[arg(long)]
    pub wv_network_logs: Option<PathBuf>,
    /// Directory of WebVoyager run folders holding `interact_messages.json`.
    #[arg(long)]
    pub wv_interact_messages: Option<PathBuf>,
    /// Directory of execution event logs.
    #[arg(long)]
    pub event_logs: Option<PathBuf>,
}

/// Serialization of the evaluation report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// YAML document.
    Yaml,
    /// Pretty-printed JSON.
    Json,
}

/// Executor selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Target {
    /// WebVoyager JSON lines.
    Webvoyager,
    /// OdoBotNL JSON array.
    Odobotnl,
}

impl From<Target> for ExportTarget {
    fn from(target: Target) -> Self {
        match target {
            Target::Webvoyager => Self::WebVoyager,
            Target::Odobotnl => Self::OdoBotNl,
        }
    }
}
