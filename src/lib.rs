//! mcp-census: tool inventory and scan-result aggregation for MCP server
//! repositories.
//!
//! Two independent components:
//! - `detector`: pattern-based detection of tool definitions in Python and
//!   TypeScript MCP server sources.
//! - `aggregator`: merge of per-scanner violation files into per-repository
//!   results plus a Markdown summary table.

pub mod aggregator;
pub mod cli;
pub mod detector;
pub mod error;
pub mod handlers;
pub mod reporter;

pub use aggregator::{ResultAggregator, ScannerMap, ScannerRegistry};
pub use cli::{Cli, Command, OutputFormat};
pub use detector::{detect_tools_in_repo, McpTool, SourceLanguage, ToolDetector, ToolInventory};
pub use error::{CensusError, Result};
pub use reporter::{json::JsonReporter, terminal::TerminalReporter, Reporter};
