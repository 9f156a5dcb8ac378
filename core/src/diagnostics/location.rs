use std::fmt;

use serde::{Deserialize, Serialize};

/// Where a wrapped call was made from. Line and column are one-based.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    pub file: String,
    pub line: u32,
    pub column: u32,
}

impl SourceLocation {
    /// `None` when line or column is zero.
    pub fn new(file: impl Into<String>, line: u32, column: u32) -> Option<Self> {
        if line == 0 || column == 0 {
            return None;
        }
        Some(Self {
            file: file.into(),
            line,
            column,
        })
    }
}

impl From<&std::panic::Location<'_>> for SourceLocation {
    fn from(loc: &std::panic::Location<'_>) -> Self {
        Self {
            file: loc.file().to_string(),
            line: loc.line(),
            column: loc.column(),
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}
