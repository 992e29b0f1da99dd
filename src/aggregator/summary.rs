//! Markdown summary-table generation over per-repository violation files.

use super::severity::{count_fixable, severity_rank, status_emoji, worst_severity, SeverityCounts};
use super::{read_scanner_map, ScannerMap, ScannerRegistry};
use crate::error::{CensusError, Result};
use std::fs;
use std::path::Path;
use tracing::debug;

const VIOLATIONS_SUFFIX: &str = "-violations.json";

struct SummaryRow {
    org_repo: String,
    file_name: String,
    total: usize,
    counts: SeverityCounts,
    fixable: usize,
    scanners: String,
    status: &'static str,
    severity_rank: usize,
}

/// Sorted, comma-joined scanner names, or `None` when empty.
fn scanners_used(scanners: &ScannerMap) -> String {
    if scanners.is_empty() {
        "None".to_string()
    } else {
        scanners.keys().cloned().collect::<Vec<_>>().join(", ")
    }
}

pub(crate) fn generate(results_dir: &Path, registry: &ScannerRegistry) -> Result<String> {
    let temp_names = registry.temp_file_names();
    let mut rows = Vec::new();

    let entries = fs::read_dir(results_dir).map_err(|e| CensusError::ReadError {
        path: results_dir.display().to_string(),
        source: e,
    })?;

    for entry in entries.filter_map(|e| e.ok()) {
        let file_name = entry.file_name().to_string_lossy().into_owned();
        let Some(prefix) = file_name.strip_suffix(VIOLATIONS_SUFFIX) else {
            continue;
        };
        // Temp scanner files and names without an org segment are not
        // per-repository files.
        if temp_names.contains(&file_name) || !prefix.contains('-') {
            continue;
        }

        // org-repo-violations.json -> org/repo
        let stem = &file_name[..file_name.len() - ".json".len()];
        let base = stem.replace("-violations", "");
        let Some((org_name, repo_name)) = base.split_once('-') else {
            continue;
        };
        let org_repo = format!("{org_name}/{repo_name}");

        let scanners = read_scanner_map(&entry.path())?;
        let worst = worst_severity(scanners.values().flatten());

        debug!(repo = %org_repo, worst = %worst, "summarizing repository");

        rows.push(SummaryRow {
            total: scanners.values().map(Vec::len).sum(),
            counts: SeverityCounts::from_violations(scanners.values().flatten()),
            fixable: count_fixable(scanners.values().flatten()),
            scanners: scanners_used(&scanners),
            status: status_emoji(&worst),
            severity_rank: severity_rank(&worst),
            org_repo,
            file_name,
        });
    }

    // Sort key mirrors (-severity rank, org/repo).
    rows.sort_by(|a, b| {
        (-(a.severity_rank as i64), &a.org_repo).cmp(&(-(b.severity_rank as i64), &b.org_repo))
    });

    let mut lines = vec![
        "# Vulnerability Scan Results".to_string(),
        String::new(),
        "| Project | Results | Total | Critical | High | Medium | Low | Fixable | Scanners | Status |"
            .to_string(),
        "|---------|---------|-------|----------|------|--------|-----|---------|----------|--------|"
            .to_string(),
    ];

    for row in &rows {
        let repo_link = format!("[{}](https://github.com/{})", row.org_repo, row.org_repo);
        let results_link = format!("[\u{1F4CB}](results/{})", row.file_name);
        lines.push(format!(
            "| {} | {} | {} | {} | {} | {} | {} | {} | {} | {} |",
            repo_link,
            results_link,
            row.total,
            row.counts.critical,
            row.counts.high,
            row.counts.medium,
            row.counts.low,
            row.fixable,
            row.scanners,
            row.status,
        ));
    }

    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn registry() -> ScannerRegistry {
        ScannerRegistry::new(["trivy", "osv-scanner"])
    }

    fn write_json(dir: &Path, name: &str, value: &serde_json::Value) {
        fs::write(dir.join(name), serde_json::to_string(value).unwrap()).unwrap();
    }

    #[test]
    fn test_empty_directory_produces_header_only() {
        let dir = TempDir::new().unwrap();
        let table = generate(dir.path(), &registry()).unwrap();

        assert!(table.starts_with("# Vulnerability Scan Results"));
        assert!(table.contains("| Project | Results |"));
        assert_eq!(table.lines().count(), 4);
    }

    #[test]
    fn test_row_contents() {
        let dir = TempDir::new().unwrap();
        write_json(
            dir.path(),
            "acme-widget-violations.json",
            &json!({
                "trivy": [
                    { "severity": "CRITICAL", "fixed_version": "2.0" },
                    { "severity": "LOW" },
                ],
                "semgrep": [
                    { "severity": "HIGH" },
                ],
            }),
        );

        let table = generate(dir.path(), &registry()).unwrap();
        let row = table
            .lines()
            .find(|l| l.contains("acme/widget"))
            .expect("row for acme/widget");

        assert!(row.contains("[acme/widget](https://github.com/acme/widget)"));
        assert!(row.contains("[\u{1F4CB}](results/acme-widget-violations.json)"));
        assert!(row.contains("| 3 | 1 | 1 | 0 | 1 | 1 |"));
        assert!(row.contains("semgrep, trivy"));
        assert!(row.contains("\u{1F534}"));
    }

    #[test]
    fn test_no_findings_row() {
        let dir = TempDir::new().unwrap();
        write_json(dir.path(), "acme-clean-violations.json", &json!({}));

        let table = generate(dir.path(), &registry()).unwrap();
        let row = table
            .lines()
            .find(|l| l.contains("acme/clean"))
            .expect("row for acme/clean");

        assert!(row.contains("| 0 | 0 | 0 | 0 | 0 | 0 | None |"));
        assert!(row.contains("\u{1F7E2}"));
    }

    #[test]
    fn test_best_rows_sort_first() {
        let dir = TempDir::new().unwrap();
        write_json(dir.path(), "aorg-clean-violations.json", &json!({}));
        write_json(
            dir.path(),
            "borg-bad-violations.json",
            &json!({ "trivy": [{ "severity": "CRITICAL" }] }),
        );

        let table = generate(dir.path(), &registry()).unwrap();
        let clean_pos = table.find("aorg/clean").unwrap();
        let bad_pos = table.find("borg/bad").unwrap();
        assert!(
            clean_pos < bad_pos,
            "no-findings repository should appear before the CRITICAL one"
        );
    }

    #[test]
    fn test_alphabetical_tiebreak_within_same_rank() {
        let dir = TempDir::new().unwrap();
        write_json(
            dir.path(),
            "zorg-one-violations.json",
            &json!({ "trivy": [{ "severity": "HIGH" }] }),
        );
        write_json(
            dir.path(),
            "aorg-two-violations.json",
            &json!({ "trivy": [{ "severity": "HIGH" }] }),
        );

        let table = generate(dir.path(), &registry()).unwrap();
        let a_pos = table.find("aorg/two").unwrap();
        let z_pos = table.find("zorg/one").unwrap();
        assert!(a_pos < z_pos);
    }

    #[test]
    fn test_temp_scanner_files_are_excluded() {
        let dir = TempDir::new().unwrap();
        // osv-scanner-violations.json has the org-repo shape but is a
        // registered temp file.
        write_json(
            dir.path(),
            "osv-scanner-violations.json",
            &json!({ "osv-scanner": [{ "severity": "HIGH" }] }),
        );
        write_json(dir.path(), "trivy-violations.json", &json!({ "trivy": [] }));

        let table = generate(dir.path(), &registry()).unwrap();
        assert_eq!(table.lines().count(), 4, "no repository rows expected");
    }

    #[test]
    fn test_non_violation_files_are_ignored() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("README.md"), "# notes").unwrap();
        fs::write(dir.path().join("violations.json"), "{}").unwrap();

        let table = generate(dir.path(), &registry()).unwrap();
        assert_eq!(table.lines().count(), 4);
    }

    #[test]
    fn test_corrupt_per_repo_file_propagates() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("acme-widget-violations.json"), "not json").unwrap();

        let result = generate(dir.path(), &registry());
        assert!(matches!(result, Err(CensusError::ParseError { .. })));
    }

    #[test]
    fn test_missing_results_directory_is_an_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing");
        let result = generate(&missing, &registry());
        assert!(matches!(result, Err(CensusError::ReadError { .. })));
    }
}
