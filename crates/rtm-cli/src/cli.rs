//! CLI argument definitions for the RTM to Todoist converter.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use rtm_cli::config::DEFAULT_SCHEMA_OUTPUT;
use rtm_cli::logging::LogFormat;
use tracing::level_filters::LevelFilter;

#[derive(Parser)]
#[command(
    name = "rtm2todoist",
    version,
    about = "Convert Remember The Milk exports into Todoist import CSV files",
    long_about = "Convert a Remember The Milk JSON export into a CSV file for Todoist's\n\
                  template importer.\n\n\
                  Completed, trashed and orphaned tasks are dropped; subtasks are\n\
                  indented under their parents and notes follow their task."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow task and note content in trace-level logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,

    /// Config file (default: rtm2todoist.toml when present).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Convert an export into a Todoist CSV and a trace of used records.
    Convert(ConvertArgs),

    /// Write the type skeleton of an export as JSON.
    Schema(SchemaArgs),

    /// Show the lists of an export with task counts.
    Lists(ListsArgs),
}

#[derive(Parser)]
pub struct ConvertArgs {
    /// Export JSON file (default: newest rememberthemilk_export* in the data directory).
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,

    /// Todoist template CSV whose first line gives the output columns.
    #[arg(long = "template", alias = "csv", value_name = "PATH")]
    pub template: Option<PathBuf>,

    /// JSON object mapping template headers to dotted source paths.
    #[arg(long = "map", value_name = "PATH")]
    pub mapping: Option<PathBuf>,

    /// Dotted path to the task array inside the export (e.g. `tasks`).
    #[arg(long = "rows-path", value_name = "PATH")]
    pub rows_path: Option<String>,

    /// Keep only rows matching this predicate, e.g. `listName == "Work"`.
    #[arg(long = "rows-filter", value_name = "EXPR")]
    pub rows_filter: Option<String>,

    /// CSV output path (default: ./data/output.csv, suffixed with the list name).
    #[arg(long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Trace output path (default: ./data/used_records.json, suffixed with the list name).
    #[arg(long = "output-json", value_name = "PATH")]
    pub output_json: Option<PathBuf>,

    /// Directory searched for exports when INPUT is missing.
    #[arg(long = "data-dir", value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Zone for dates and times: local, utc or an offset like +02:00.
    #[arg(long = "date-basis", value_name = "ZONE")]
    pub date_basis: Option<String>,

    /// Run every stage and report without writing output files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Parser)]
pub struct SchemaArgs {
    /// Export JSON file (default: newest export in the data directory).
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,

    /// Schema output path.
    #[arg(value_name = "OUTPUT", default_value = DEFAULT_SCHEMA_OUTPUT)]
    pub output: PathBuf,

    /// Directory searched for exports when INPUT is missing.
    #[arg(long = "data-dir", value_name = "DIR")]
    pub data_dir: Option<PathBuf>,
}

#[derive(Parser)]
pub struct ListsArgs {
    /// Export JSON file (default: newest export in the data directory).
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,

    /// Dotted path to the task array inside the export.
    #[arg(long = "rows-path", value_name = "PATH")]
    pub rows_path: Option<String>,

    /// Directory searched for exports when INPUT is missing.
    #[arg(long = "data-dir", value_name = "DIR")]
    pub data_dir: Option<PathBuf>,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

impl From<LogLevelArg> for LevelFilter {
    fn from(level: LogLevelArg) -> Self {
        match level {
            LogLevelArg::Error => Self::ERROR,
            LogLevelArg::Warn => Self::WARN,
            LogLevelArg::Info => Self::INFO,
            LogLevelArg::Debug => Self::DEBUG,
            LogLevelArg::Trace => Self::TRACE,
        }
    }
}

impl From<LogFormatArg> for LogFormat {
    fn from(format: LogFormatArg) -> Self {
        match format {
            LogFormatArg::Pretty => Self::Pretty,
            LogFormatArg::Compact => Self::Compact,
            LogFormatArg::Json => Self::Json,
        }
    }
}
