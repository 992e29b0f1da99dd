//! MCP tool detection.
//!
//! Walks a repository's file tree and applies per-language source patterns
//! to find tool definitions in MCP server implementations. Supports Python
//! (FastMCP, official SDK decorators) and TypeScript.

mod language;
mod manifest;
mod patterns;

pub use language::SourceLanguage;

use crate::error::{CensusError, Result};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use walkdir::WalkDir;

/// Description attached to the synthetic record emitted when a repository
/// looks like an MCP server but no tool pattern matched.
const UNDETECTED_DESCRIPTION: &str = "MCP server with undetected tools";

/// A detected MCP tool.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct McpTool {
    pub name: String,
    pub file_path: String,
    pub description: String,
    pub line_number: usize,
}

impl McpTool {
    pub fn new(
        name: impl Into<String>,
        file_path: impl Into<String>,
        description: impl Into<String>,
        line_number: usize,
    ) -> Self {
        Self {
            name: name.into(),
            file_path: file_path.into(),
            description: description.into(),
            line_number,
        }
    }
}

impl std::fmt::Display for McpTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}:{})", self.name, self.file_path, self.line_number)
    }
}

/// The outcome of one detection pass: tools in detection order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ToolInventory {
    pub tools: Vec<McpTool>,
}

impl ToolInventory {
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Group tools by source file. Within a file, tools keep detection
    /// order; keys are sorted.
    pub fn by_file(&self) -> BTreeMap<&str, Vec<&McpTool>> {
        let mut by_file: BTreeMap<&str, Vec<&McpTool>> = BTreeMap::new();
        for tool in &self.tools {
            by_file.entry(tool.file_path.as_str()).or_default().push(tool);
        }
        by_file
    }
}

/// Detects MCP tools from repository code.
pub struct ToolDetector {
    repo_path: PathBuf,
}

impl ToolDetector {
    pub fn new(repo_path: impl Into<PathBuf>) -> Self {
        Self {
            repo_path: repo_path.into(),
        }
    }

    /// Detect all tools in the repository.
    ///
    /// Per-file read failures skip that file; a missing or non-directory
    /// repository path is an error.
    pub fn detect(&self) -> Result<ToolInventory> {
        if !self.repo_path.exists() {
            return Err(CensusError::FileNotFound(
                self.repo_path.display().to_string(),
            ));
        }
        if !self.repo_path.is_dir() {
            return Err(CensusError::NotADirectory(
                self.repo_path.display().to_string(),
            ));
        }

        let mut tools = Vec::new();
        for language in SourceLanguage::ALL {
            for path in self.source_files(language) {
                self.detect_in_file(&path, language, &mut tools);
            }
        }

        // A repository that depends on the MCP ecosystem but matched no
        // pattern still gets a single placeholder record.
        if tools.is_empty() && manifest::references_mcp(&self.repo_path)? {
            debug!("no tool patterns matched, emitting placeholder record");
            tools.push(McpTool::new(
                "unknown",
                self.repo_path.display().to_string(),
                UNDETECTED_DESCRIPTION,
                0,
            ));
        }

        debug!(tools = tools.len(), "detection pass completed");
        Ok(ToolInventory { tools })
    }

    fn source_files(&self, language: SourceLanguage) -> Vec<PathBuf> {
        WalkDir::new(&self.repo_path)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_file() && language.matches(e.path()))
            .map(|e| e.into_path())
            .collect()
    }

    fn detect_in_file(&self, path: &Path, language: SourceLanguage, tools: &mut Vec<McpTool>) {
        let content = match fs::read(path) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) => {
                trace!(path = %path.display(), error = %e, "skipping unreadable file");
                return;
            }
        };

        let relative = self.relative_path(path);
        match language {
            SourceLanguage::Python => detect_python_tools(&content, &relative, tools),
            SourceLanguage::TypeScript => detect_typescript_tools(&content, &relative, tools),
        }
    }

    fn relative_path(&self, path: &Path) -> String {
        path.strip_prefix(&self.repo_path)
            .unwrap_or(path)
            .display()
            .to_string()
    }
}

/// Detect tools in a repository in one call.
pub fn detect_tools_in_repo(repo_path: impl Into<PathBuf>) -> Result<ToolInventory> {
    ToolDetector::new(repo_path).detect()
}

fn detect_python_tools(content: &str, file_path: &str, tools: &mut Vec<McpTool>) {
    // First line of each docstring directly after a def signature, keyed
    // by function name.
    let mut docstrings: HashMap<&str, &str> = HashMap::new();
    for caps in patterns::python_docstring_pattern().captures_iter(content) {
        if let (Some(func), Some(doc)) = (caps.get(1), caps.get(2)) {
            let first_line = doc.as_str().trim().lines().next().unwrap_or("");
            docstrings.insert(func.as_str(), first_line);
        }
    }

    for pattern in patterns::python_tool_patterns() {
        for caps in pattern.captures_iter(content) {
            let Some(func) = caps.get(2) else { continue };
            // Explicit name= in the decorator wins over the function name.
            let name = caps.get(1).map_or(func.as_str(), |m| m.as_str());
            let line_number = line_number_at(content, caps.get(0).map_or(0, |m| m.start()));
            let description = docstrings.get(func.as_str()).copied().unwrap_or("");

            trace!(tool = name, file = file_path, line = line_number, "python tool matched");
            tools.push(McpTool::new(name, file_path, description, line_number));
        }
    }
}

fn detect_typescript_tools(content: &str, file_path: &str, tools: &mut Vec<McpTool>) {
    for pattern in patterns::typescript_tool_patterns() {
        for caps in pattern.captures_iter(content) {
            let Some(name) = caps.get(1) else { continue };
            let line_number = line_number_at(content, caps.get(0).map_or(0, |m| m.start()));
            let description = patterns::typescript_description_pattern(name.as_str())
                .and_then(|re| re.captures(content))
                .and_then(|c| c.get(1))
                .map(|m| m.as_str().to_string())
                .unwrap_or_default();

            trace!(tool = name.as_str(), file = file_path, line = line_number, "typescript tool matched");
            tools.push(McpTool::new(name.as_str(), file_path, description, line_number));
        }
    }
}

/// 1-indexed line of a byte offset: 1 plus the newlines preceding it.
fn line_number_at(content: &str, offset: usize) -> usize {
    content[..offset].matches('\n').count() + 1
}
