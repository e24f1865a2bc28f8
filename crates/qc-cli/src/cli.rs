//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use qc_report::ReportVariant;

#[derive(Parser)]
#[command(
    name = "qc-report",
    version,
    about = "Lay out laboratory QC reports into pages",
    long_about = "Lay out laboratory quality-control reports into pages.\n\n\
                  Reads a report source document, paginates its table and writes \
                  the page plans as JSON Lines for a drawing backend."
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
}

#[derive(Subcommand)]
pub enum Command {
    /// Lay out a report source document.
    Render(RenderArgs),

    /// List the built-in layout profiles.
    Profiles,

    /// Print a built-in profile as JSON, ready to edit and pass to --profile.
    Profile(ProfileArgs),
}

#[derive(Parser)]
pub struct RenderArgs {
    /// Report source JSON document.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Report variant of the document.
    #[arg(long = "variant", value_parser = parse_variant)]
    pub variant: ReportVariant,

    /// Where to write the page plans ("-" for stdout, default: <INPUT>.pages.jsonl).
    #[arg(long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Layout profile JSON replacing the built-in profile of the variant.
    #[arg(long = "profile", value_name = "JSON")]
    pub profile: Option<PathBuf>,

    /// Lay out and summarize without writing page plans.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Parser)]
pub struct ProfileArgs {
    /// Report variant whose profile to print.
    #[arg(value_name = "VARIANT", value_parser = parse_variant)]
    pub variant: ReportVariant,

    /// Print the two-month CV profile with its ratio column.
    #[arg(long = "with-ratio")]
    pub with_ratio: bool,
}

fn parse_variant(value: &str) -> Result<ReportVariant, String> {
    value.parse()
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
