//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    categories::CategoriesArgs, check::CheckArgs, completions::CompletionsArgs, parts::PartsArgs,
    revise::ReviseArgs, serve::ServeArgs, show::ShowArgs, sources::SourcesArgs,
    update::UpdateArgs,
};

#[derive(Parser)]
#[command(name = "partmaster")]
#[command(author, version, about = "Partmaster KiCad HTTP library")]
#[command(long_about = "Serve a directory of partmaster CSV files as a KiCad HTTP library, and inspect or edit parts from the command line.")]
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

    /// Directory holding the partmaster CSV files (default: from config, else .)
    #[arg(long, global = true, env = "PARTMASTER_DIR")]
    pub dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the KiCad HTTP library API
    Serve(ServeArgs),

    /// List part categories
    #[clap(alias = "cats")]
    Categories(CategoriesArgs),

    /// List the parts of one category
    Parts(PartsArgs),

    /// Show a part the way KiCad sees it
    Show(ShowArgs),

    /// List every source of a part, best priority first
    Sources(SourcesArgs),

    /// Update a part's description and sources
    Update(UpdateArgs),

    /// Start a new revision of a part
    Revise(ReviseArgs),

    /// Report rows whose IPN is malformed
    Check(CheckArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    /// Automatically detect based on context (yaml for show, table for lists)
    #[default]
    Auto,
    /// YAML format (full fidelity)
    Yaml,
    /// Tab-separated values (for piping)
    Tsv,
    /// JSON format, as served over HTTP
    Json,
    /// Just IDs, one per line
    Id,
}
