use serde::{Deserialize, Serialize};

/// The visible text of one record element, split into trimmed non-empty lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawBlock {
    lines: Vec<String>,
}

impl RawBlock {
    pub fn new(lines: Vec<String>) -> Self {
        Self { lines }
    }

    pub fn from_text(text: &str) -> Self {
        let lines = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect();
        Self { lines }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Line following the first line equal to `marker`.
    pub fn value_after(&self, marker: &str) -> Option<&str> {
        let idx = self.lines.iter().position(|l| l == marker)?;
        self.lines.get(idx + 1).map(String::as_str)
    }

    pub fn has_line(&self, marker: &str) -> bool {
        self.lines.iter().any(|l| l == marker)
    }
}
