//! Common location type shared between the graph and violation modules.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Location of a declaration in the analyzed project.
///
/// - `file`: Workspace-relative path (required)
/// - `line`: 1-indexed line number (required)
///
/// Ordering is by `(file, line)` for deterministic output.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Location {
    /// File path (workspace-relative).
    pub file: String,
    /// Line number (1-indexed).
    pub line: u32,
}

impl Location {
    /// Create a new location.
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Location {
            file: file.into(),
            line,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_file_colon_line() {
        let loc = Location::new("tests/conftest.py", 12);
        assert_eq!(loc.to_string(), "tests/conftest.py:12");
    }

    #[test]
    fn ordering_is_by_file_then_line() {
        let a = Location::new("a.py", 99);
        let b = Location::new("b.py", 1);
        let b2 = Location::new("b.py", 2);
        assert!(a < b);
        assert!(b < b2);
    }

    #[test]
    fn serializes_to_plain_object() {
        let loc = Location::new("conftest.py", 4);
        let json = serde_json::to_string(&loc).unwrap();
        assert_eq!(json, r#"{"file":"conftest.py","line":4}"#);
    }
}
