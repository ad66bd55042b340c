//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "weave",
    version,
    about = "Weave product listings into a narrative document",
    long_about = "Weave product listings into a narrative document.\n\n\
                  Each item is placed after the section it matches best, every\n\
                  section gets at most a fixed number of items, and items that\n\
                  fit nowhere are collected in a trailing block."
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

    /// Configuration file (default: ./weave.toml when present).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Merge items into a document and write the rendered output.
    Merge(MergeArgs),

    /// Print the item-by-section score matrix without assigning.
    Score(InputArgs),
}

#[derive(Args)]
pub struct InputArgs {
    /// Narrative document (Markdown, or JSON with a `sections` list).
    #[arg(value_name = "DOCUMENT")]
    pub document: PathBuf,

    /// Item files (JSON or CSV), concatenated in the given order.
    #[arg(value_name = "ITEMS", required = true)]
    pub items: Vec<PathBuf>,

    /// Prefix for item URLs that start with `/`.
    #[arg(long = "base-url", value_name = "URL")]
    pub base_url: Option<String>,
}

#[derive(Args)]
pub struct MergeArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Maximum items placed after one section.
    #[arg(long = "capacity", value_name = "N")]
    pub capacity: Option<usize>,

    /// Maximum items shown in the trailing block.
    #[arg(long = "fallback-cap", value_name = "N")]
    pub fallback_cap: Option<usize>,

    /// Directory for the rendered output.
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Directory for the publish-ready copy.
    #[arg(long = "publish-dir", value_name = "DIR", conflicts_with = "no_publish")]
    pub publish_dir: Option<PathBuf>,

    /// Do not write the publish-ready copy.
    #[arg(long = "no-publish")]
    pub no_publish: bool,

    /// Output format to render.
    #[arg(long = "format", value_enum, default_value = "html")]
    pub format: OutputFormatArg,

    /// Merge and report without writing output files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormatArg {
    Html,
    Json,
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
