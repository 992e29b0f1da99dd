//! Subcommand handlers.

use crate::aggregator::ResultAggregator;
use crate::cli::OutputFormat;
use crate::detector::ToolDetector;
use crate::reporter::{json::JsonReporter, terminal::TerminalReporter, Reporter};
use std::fs;
use std::path::Path;
use std::process::ExitCode;
use tracing::{debug, info};

/// Summary report written to the working directory after aggregation.
pub const SUMMARY_FILE: &str = "SCAN_RESULTS.md";

/// Handle `detect`: run the detector and print the inventory.
pub fn handle_detect(repo_path: &Path, format: OutputFormat) -> ExitCode {
    info!(path = %repo_path.display(), "Detecting MCP tools");

    let inventory = match ToolDetector::new(repo_path).detect() {
        Ok(inventory) => inventory,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    debug!(tools = inventory.len(), "Detection completed");

    let output = match format {
        OutputFormat::Terminal => TerminalReporter::new().report(&inventory),
        OutputFormat::Json => JsonReporter::new().report(&inventory),
    };
    println!("{}", output);

    ExitCode::SUCCESS
}

/// Handle `aggregate`: aggregate, save, then regenerate the summary table.
pub fn handle_aggregate(org_name: &str, repo_name: &str, results_dir: &Path) -> ExitCode {
    info!(
        org = org_name,
        repo = repo_name,
        dir = %results_dir.display(),
        "Aggregating scanner results"
    );

    let aggregator = ResultAggregator::new();

    let results = match aggregator.aggregate(org_name, repo_name, results_dir) {
        Ok(results) => results,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = aggregator.save(org_name, repo_name, &results, results_dir) {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    let summary = match aggregator.summary(results_dir) {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = fs::write(SUMMARY_FILE, summary) {
        eprintln!("Failed to write {}: {}", SUMMARY_FILE, e);
        return ExitCode::FAILURE;
    }
    println!("Generated {} with vulnerability summary", SUMMARY_FILE);

    ExitCode::SUCCESS
}
