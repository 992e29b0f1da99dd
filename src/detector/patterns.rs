//! Source-pattern rule sets for tool detection.
//!
//! Detection is heuristic by design: regexes over raw text, matching the
//! decorator and registration idioms of common MCP server implementations
//! without parsing the source.

use regex::Regex;
use std::sync::LazyLock;

static PYTHON_TOOL_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        // @mcp.tool() or @server.tool(), with an optional explicit name=
        Regex::new(
            r#"(?m)@(?:mcp|server)\.tool\(\s*(?:name=["']([^"']+)["'])?\s*\)\s*(?:async\s+)?def\s+(\w+)"#,
        )
        .expect("mcp.tool decorator regex"),
        // bare @tool() decorator (fastmcp style)
        Regex::new(r#"(?m)@tool\(\s*(?:name=["']([^"']+)["'])?\s*\)\s*(?:async\s+)?def\s+(\w+)"#)
            .expect("tool decorator regex"),
    ]
});

// Triple-quoted docstring directly after a def signature; group 1 is the
// function name, group 2 the docstring body.
static PYTHON_DOCSTRING_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?ms)def\s+(\w+)\s*\([^)]*\)\s*(?:->.*?)?\s*:\s*"""([^"]+)""""#)
        .expect("docstring regex")
});

static TYPESCRIPT_TOOL_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        // @Tool({ ... }) decorator
        Regex::new(r#"(?m)@Tool\(\{[^}]*\}\)\s*(?:async\s+)?(?:function\s+)?(\w+)"#)
            .expect("Tool decorator regex"),
        // server.setRequestHandler(ListToolsRequestSchema, ...) responses
        // naming tools via a name: field
        Regex::new(
            r#"(?ms)setRequestHandler\s*\(\s*ListToolsRequestSchema[^)]*\)\s*.*?name:\s*["']([^"']+)["']"#,
        )
        .expect("list-tools handler regex"),
    ]
});

pub fn python_tool_patterns() -> &'static [Regex] {
    &PYTHON_TOOL_PATTERNS
}

pub fn python_docstring_pattern() -> &'static Regex {
    &PYTHON_DOCSTRING_PATTERN
}

pub fn typescript_tool_patterns() -> &'static [Regex] {
    &TYPESCRIPT_TOOL_PATTERNS
}

/// Targeted search for a `description:` field inside the decorator
/// invocation that produced `tool_name`. Compile failure degrades to no
/// description.
pub fn typescript_description_pattern(tool_name: &str) -> Option<Regex> {
    Regex::new(&format!(
        r#"@Tool\(\{{[^}}]*description:\s*["']([^"']+)["'][^}}]*\}}\)\s*(?:async\s+)?(?:function\s+)?{}"#,
        regex::escape(tool_name)
    ))
    .ok()
}
