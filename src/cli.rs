use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Terminal,
    Json,
}

#[derive(Parser, Debug)]
#[command(
    name = "mcp-census",
    version,
    about = "Tool inventory and scan-result aggregation for MCP server repositories",
    long_about = "mcp-census detects tool definitions in MCP server codebases via source-pattern matching and aggregates external vulnerability-scanner outputs into per-repository reports with a summary table."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Detect MCP tool definitions in a repository
    Detect {
        /// Path to the repository to scan
        repo_path: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Terminal)]
        format: OutputFormat,
    },

    /// Merge scanner outputs for a repository and regenerate the summary table
    Aggregate {
        /// Organization that owns the repository
        org_name: String,

        /// Repository name
        repo_name: String,

        /// Directory holding scanner result files
        results_dir: PathBuf,
    },
}
