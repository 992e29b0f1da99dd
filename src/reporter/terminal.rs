use crate::detector::{McpTool, ToolInventory};
use crate::reporter::Reporter;
use colored::Colorize;

pub struct TerminalReporter;

impl TerminalReporter {
    pub fn new() -> Self {
        Self
    }

    fn format_tool(&self, tool: &McpTool) -> String {
        let mut line = format!(
            "  {} {}",
            tool.name.green().bold(),
            format!("(line {})", tool.line_number).dimmed()
        );
        if !tool.description.is_empty() {
            line.push_str(&format!("  {}", tool.description));
        }
        line.push('\n');
        line
    }
}

impl Default for TerminalReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter for TerminalReporter {
    fn report(&self, inventory: &ToolInventory) -> String {
        if inventory.is_empty() {
            return format!("{}", "No MCP tools detected.".yellow());
        }

        let mut output = format!(
            "Detected {} MCP tool{}\n\n",
            inventory.len().to_string().bold(),
            if inventory.len() == 1 { "" } else { "s" }
        );

        for (file, tools) in inventory.by_file() {
            output.push_str(&format!("{}\n", file.cyan()));
            for tool in tools {
                output.push_str(&self.format_tool(tool));
            }
            output.push('\n');
        }

        output.trim_end().to_string()
    }
}
