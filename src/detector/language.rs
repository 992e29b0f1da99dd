use std::path::Path;

/// Source languages with built-in tool detection rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceLanguage {
    Python,
    TypeScript,
}

impl SourceLanguage {
    /// Detection processes Python files first, then TypeScript.
    pub const ALL: [SourceLanguage; 2] = [SourceLanguage::Python, SourceLanguage::TypeScript];

    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            SourceLanguage::Python => &["py"],
            SourceLanguage::TypeScript => &["ts", "tsx"],
        }
    }

    pub fn matches(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions().contains(&ext))
    }
}
