use clap::Parser;
use mcp_census::cli::{Cli, Command};
use mcp_census::handlers::{handle_aggregate, handle_detect};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    // Usage errors exit 1; --help and --version exit 0.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code: u8 = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            return ExitCode::from(code);
        }
    };

    match cli.command {
        Command::Detect { repo_path, format } => handle_detect(&repo_path, format),
        Command::Aggregate {
            org_name,
            repo_name,
            results_dir,
        } => handle_aggregate(&org_name, &repo_name, &results_dir),
    }
}
