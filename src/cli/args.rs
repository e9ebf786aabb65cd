//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    batch::BatchArgs, calc::CalcArgs, completions::CompletionsArgs, config::ConfigCommands,
    styles::StylesArgs,
};

#[derive(Parser)]
#[command(name = "curtain")]
#[command(author, version, about = "Curtain sizing calculator")]
#[command(long_about = "Computes curtain production sizes and order quantities from measured window dimensions.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output (debug logging on stderr)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Extra config file, applied over user and project config
    #[arg(long, global = true, env = "CURTAIN_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compute production size and order quantity for one window
    Calc(CalcArgs),

    /// Size every window listed in a CSV order sheet
    Batch(BatchArgs),

    /// Show pleat-style divisors and window-type formulas
    Styles(StylesArgs),

    /// View or modify configuration
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Use the configured default, else human-readable text
    #[default]
    Auto,
    /// Human-readable text
    Text,
    /// JSON format (for programming)
    Json,
    /// YAML format
    Yaml,
    /// CSV format (for spreadsheets)
    Csv,
    /// Tab-separated values (for piping)
    Tsv,
    /// Markdown tables
    Md,
}

impl OutputFormat {
    /// Replace `Auto` with the configured default format, falling back to text
    pub fn resolve(self, configured: Option<&str>) -> OutputFormat {
        if self != OutputFormat::Auto {
            return self;
        }
        configured
            .and_then(|name| OutputFormat::from_str(name, true).ok())
            .filter(|format| *format != OutputFormat::Auto)
            .unwrap_or(OutputFormat::Text)
    }
}
