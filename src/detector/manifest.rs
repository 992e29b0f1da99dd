//! Dependency-manifest inspection, used as a fallback when no tool
//! pattern matched anywhere in a repository.

use crate::error::{CensusError, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Python dependency manifests checked for an MCP reference by substring.
const PYTHON_DEP_FILES: &[&str] = &["requirements.txt", "pyproject.toml", "Pipfile"];

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PackageManifest {
    #[serde(default)]
    dependencies: HashMap<String, serde_json::Value>,
    #[serde(default)]
    dev_dependencies: HashMap<String, serde_json::Value>,
}

/// Returns true when any dependency manifest references the MCP ecosystem.
///
/// Plain-text manifests are substring-checked as raw text. `package.json`
/// is parsed and its dependency keys are name-checked; a malformed or
/// unreadable `package.json` counts as no reference.
pub fn references_mcp(repo_path: &Path) -> Result<bool> {
    for dep_file in PYTHON_DEP_FILES {
        let path = repo_path.join(dep_file);
        if path.exists() {
            let bytes = fs::read(&path).map_err(|e| CensusError::ReadError {
                path: path.display().to_string(),
                source: e,
            })?;
            let content = String::from_utf8_lossy(&bytes);
            if content.contains("mcp") || content.contains("fastmcp") {
                debug!(manifest = *dep_file, "MCP reference found");
                return Ok(true);
            }
        }
    }

    let package_json = repo_path.join("package.json");
    if package_json.exists() {
        if let Ok(content) = fs::read_to_string(&package_json) {
            if let Ok(manifest) = serde_json::from_str::<PackageManifest>(&content) {
                let referenced = manifest
                    .dependencies
                    .keys()
                    .chain(manifest.dev_dependencies.keys())
                    .any(|dep| dep.contains("modelcontextprotocol") || dep.contains("mcp"));
                if referenced {
                    debug!("MCP reference found in package.json");
                    return Ok(true);
                }
            }
        }
    }

    Ok(false)
}
