//! Scanner-result aggregation.
//!
//! Merges per-scanner violation files into one per-repository file and
//! regenerates the Markdown summary table over all known repositories.
//! Violation records are opaque JSON; only `severity` and `fixed_version`
//! are interpreted.

mod severity;
mod summary;

pub use severity::{
    count_fixable, severity_rank, status_emoji, worst_severity, Severity, SeverityCounts,
};

use crate::error::{CensusError, Result};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Mapping from scanner name to that scanner's violation records.
pub type ScannerMap = BTreeMap<String, Vec<Value>>;

/// Scanners whose temporary output files are looked for by default.
pub const DEFAULT_SCANNERS: &[&str] = &[
    "bandit",
    "npm-audit",
    "osv-scanner",
    "pip-audit",
    "semgrep",
    "trivy",
];

/// The known-scanner set: which `{scanner}-violations.json` temp files are
/// merged and cleaned up. Injected so callers control the set.
#[derive(Debug, Clone)]
pub struct ScannerRegistry {
    scanners: Vec<String>,
}

impl ScannerRegistry {
    pub fn new<I, S>(scanners: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            scanners: scanners.into_iter().map(Into::into).collect(),
        }
    }

    pub fn names(&self) -> &[String] {
        &self.scanners
    }

    /// Temporary result file written by one scanner run.
    pub fn temp_file_name(scanner: &str) -> String {
        format!("{scanner}-violations.json")
    }

    pub fn temp_file_names(&self) -> Vec<String> {
        self.scanners
            .iter()
            .map(|s| Self::temp_file_name(s))
            .collect()
    }
}

impl Default for ScannerRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_SCANNERS.iter().copied())
    }
}

/// Aggregates scanner results for repositories in a results directory.
pub struct ResultAggregator {
    registry: ScannerRegistry,
}

impl ResultAggregator {
    pub fn new() -> Self {
        Self {
            registry: ScannerRegistry::default(),
        }
    }

    pub fn with_registry(registry: ScannerRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ScannerRegistry {
        &self.registry
    }

    /// File holding a repository's aggregated results.
    pub fn violations_file_name(org_name: &str, repo_name: &str) -> String {
        format!("{org_name}-{repo_name}-violations.json")
    }

    /// Merge pending scanner temp files over the existing per-repository
    /// mapping. Re-merging a scanner's file overwrites its prior entry.
    /// Missing files are absent contributions; a malformed existing file
    /// is a fatal parse error.
    pub fn aggregate(
        &self,
        org_name: &str,
        repo_name: &str,
        results_dir: &Path,
    ) -> Result<ScannerMap> {
        let mut aggregated = ScannerMap::new();

        let per_repo = results_dir.join(Self::violations_file_name(org_name, repo_name));
        if per_repo.exists() {
            aggregated = read_scanner_map(&per_repo)?;
        }

        for scanner in self.registry.names() {
            let temp = results_dir.join(ScannerRegistry::temp_file_name(scanner));
            if temp.exists() {
                let scanner_data = read_scanner_map(&temp)?;
                for (name, violations) in scanner_data {
                    debug!(scanner = %name, count = violations.len(), "merging scanner results");
                    aggregated.insert(name, violations);
                }
            }
        }

        Ok(aggregated)
    }

    /// Write the merged mapping to the per-repository file and delete the
    /// consumed temp files.
    pub fn save(
        &self,
        org_name: &str,
        repo_name: &str,
        results: &ScannerMap,
        results_dir: &Path,
    ) -> Result<()> {
        fs::create_dir_all(results_dir).map_err(|e| CensusError::WriteError {
            path: results_dir.display().to_string(),
            source: e,
        })?;

        let violations_file = results_dir.join(Self::violations_file_name(org_name, repo_name));
        let json = serde_json::to_string_pretty(results)?;
        fs::write(&violations_file, json).map_err(|e| CensusError::WriteError {
            path: violations_file.display().to_string(),
            source: e,
        })?;
        println!("Saved results to {}", violations_file.display());

        for scanner in self.registry.names() {
            let temp = results_dir.join(ScannerRegistry::temp_file_name(scanner));
            if temp.exists() {
                fs::remove_file(&temp).map_err(|e| CensusError::WriteError {
                    path: temp.display().to_string(),
                    source: e,
                })?;
                println!("Removed temporary scanner file: {}", temp.display());
            }
        }

        Ok(())
    }

    /// Build the Markdown summary table over every per-repository file.
    pub fn summary(&self, results_dir: &Path) -> Result<String> {
        summary::generate(results_dir, &self.registry)
    }
}

impl Default for ResultAggregator {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn read_scanner_map(path: &Path) -> Result<ScannerMap> {
    let content = fs::read_to_string(path).map_err(|e| CensusError::ReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    serde_json::from_str(&content).map_err(|e| CensusError::ParseError {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn write_json(dir: &Path, name: &str, value: &Value) {
        fs::write(dir.join(name), serde_json::to_string_pretty(value).unwrap()).unwrap();
    }

    fn aggregator() -> ResultAggregator {
        ResultAggregator::with_registry(ScannerRegistry::new(["trivy", "semgrep"]))
    }

    #[test]
    fn test_aggregate_empty_directory() {
        let dir = TempDir::new().unwrap();
        let results = aggregator().aggregate("acme", "widget", dir.path()).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_aggregate_merges_temp_files() {
        let dir = TempDir::new().unwrap();
        write_json(
            dir.path(),
            "trivy-violations.json",
            &json!({ "trivy": [{ "severity": "HIGH" }] }),
        );
        write_json(
            dir.path(),
            "semgrep-violations.json",
            &json!({ "semgrep": [{ "severity": "LOW" }, { "severity": "MEDIUM" }] }),
        );

        let results = aggregator().aggregate("acme", "widget", dir.path()).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results["trivy"].len(), 1);
        assert_eq!(results["semgrep"].len(), 2);
    }

    #[test]
    fn test_aggregate_overwrites_prior_scanner_entry() {
        let dir = TempDir::new().unwrap();
        write_json(
            dir.path(),
            "acme-widget-violations.json",
            &json!({ "trivy": [{ "severity": "LOW" }, { "severity": "LOW" }] }),
        );
        write_json(
            dir.path(),
            "trivy-violations.json",
            &json!({ "trivy": [{ "severity": "CRITICAL" }] }),
        );

        let results = aggregator().aggregate("acme", "widget", dir.path()).unwrap();
        assert_eq!(results["trivy"].len(), 1);
        assert_eq!(results["trivy"][0]["severity"], "CRITICAL");
    }

    #[test]
    fn test_aggregate_keeps_unrelated_scanner_entries() {
        let dir = TempDir::new().unwrap();
        write_json(
            dir.path(),
            "acme-widget-violations.json",
            &json!({ "semgrep": [{ "severity": "MEDIUM" }] }),
        );
        write_json(
            dir.path(),
            "trivy-violations.json",
            &json!({ "trivy": [{ "severity": "HIGH" }] }),
        );

        let results = aggregator().aggregate("acme", "widget", dir.path()).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results["semgrep"][0]["severity"], "MEDIUM");
    }

    #[test]
    fn test_aggregate_ignores_unregistered_scanner_temp_files() {
        let dir = TempDir::new().unwrap();
        write_json(
            dir.path(),
            "grype-violations.json",
            &json!({ "grype": [{ "severity": "HIGH" }] }),
        );

        let results = aggregator().aggregate("acme", "widget", dir.path()).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_aggregate_corrupt_per_repo_file_is_fatal() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("acme-widget-violations.json"), "{ corrupt").unwrap();

        let result = aggregator().aggregate("acme", "widget", dir.path());
        assert!(matches!(result, Err(CensusError::ParseError { .. })));
    }

    #[test]
    fn test_save_writes_and_cleans_temp_files() {
        let dir = TempDir::new().unwrap();
        write_json(
            dir.path(),
            "trivy-violations.json",
            &json!({ "trivy": [{ "severity": "HIGH" }] }),
        );

        let agg = aggregator();
        let results = agg.aggregate("acme", "widget", dir.path()).unwrap();
        agg.save("acme", "widget", &results, dir.path()).unwrap();

        assert!(dir.path().join("acme-widget-violations.json").exists());
        assert!(!dir.path().join("trivy-violations.json").exists());
    }

    #[test]
    fn test_save_creates_results_directory() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("results");

        let agg = aggregator();
        agg.save("acme", "widget", &ScannerMap::new(), &nested).unwrap();
        assert!(nested.join("acme-widget-violations.json").exists());
    }

    #[test]
    fn test_save_then_aggregate_round_trip() {
        let dir = TempDir::new().unwrap();
        write_json(
            dir.path(),
            "trivy-violations.json",
            &json!({ "trivy": [{ "severity": "HIGH", "fixed_version": "1.2.3" }] }),
        );

        let agg = aggregator();
        let results = agg.aggregate("acme", "widget", dir.path()).unwrap();
        agg.save("acme", "widget", &results, dir.path()).unwrap();

        // No temp files left, so a second aggregate reconstructs exactly
        // the saved mapping.
        let reread = agg.aggregate("acme", "widget", dir.path()).unwrap();
        assert_eq!(reread, results);
    }

    #[test]
    fn test_registry_temp_file_names() {
        let registry = ScannerRegistry::new(["trivy", "osv-scanner"]);
        assert_eq!(
            registry.temp_file_names(),
            vec!["trivy-violations.json", "osv-scanner-violations.json"]
        );
    }

    #[test]
    fn test_default_registry_is_non_empty() {
        assert!(!ScannerRegistry::default().names().is_empty());
    }
}
