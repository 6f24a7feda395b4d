//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::core::Config;

use crate::cli::commands::{
    assess::AssessArgs, completions::CompletionsArgs, config::ConfigCommands, init::InitArgs,
    project::ProjectCommands, report::ReportArgs, score::ScoreArgs, section::SectionCommands,
    span::SpanCommands,
};

#[derive(Parser)]
#[command(name = "tsa")]
#[command(author, version, about = "Tunnel structural safety assessment")]
#[command(
    long_about = "Score tunnel lining inspections, roll them up into a length-weighted safety grade, and keep inspection projects in a local workspace."
)]
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

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Workspace root (default: auto-detect by finding .tsa/)
    #[arg(long, global = true)]
    pub workspace: Option<PathBuf>,

    /// Merged configuration, filled in once after parsing
    #[arg(skip)]
    pub config: Config,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new workspace
    Init(InitArgs),

    /// Inspection project management
    #[command(subcommand)]
    Project(ProjectCommands),

    /// Structural section management
    #[command(subcommand)]
    Section(SectionCommands),

    /// Span inspection data
    #[command(subcommand)]
    Span(SpanCommands),

    /// Assess a project: rescore every span and compute the final grade
    Assess(AssessArgs),

    /// Generate a markdown assessment report
    Report(ReportArgs),

    /// Score one set of inspection inputs without touching the store
    Score(ScoreArgs),

    /// Show configuration
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Automatically detect based on context (yaml for show, tsv for list)
    #[default]
    Auto,
    /// YAML format (full fidelity)
    Yaml,
    /// Aligned columns for the terminal
    Tsv,
    /// JSON format (for programming)
    Json,
    /// CSV format (for spreadsheets)
    Csv,
    /// Markdown tables
    Md,
}
