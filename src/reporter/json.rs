use crate::detector::ToolInventory;
use crate::reporter::Reporter;

pub struct JsonReporter;

impl JsonReporter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter for JsonReporter {
    fn report(&self, inventory: &ToolInventory) -> String {
        serde_json::to_string_pretty(inventory)
            .unwrap_or_else(|e| format!(r#"{{"error": "Failed to serialize inventory: {}"}}"#, e))
    }
}
