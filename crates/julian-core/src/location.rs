//! Source location tracking for error reporting.

use std::fmt;

/// The script file and line a callable, constructor or exception originates from.
///
/// Either part may be unknown: engine-synthesized callables have no file, and
/// exceptions raised before the first statement executes have no line.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct SourceLocation {
    /// Script file name.
    pub file: Option<String>,
    /// Line number (1-indexed).
    pub line: Option<u32>,
}

impl SourceLocation {
    /// Create a location with both file and line.
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Self {
            file: Some(file.into()),
            line: Some(line),
        }
    }

    /// A location with neither file nor line.
    pub fn unknown() -> Self {
        Self::default()
    }

    /// Whether nothing is known about this location.
    pub fn is_unknown(&self) -> bool {
        self.file.is_none() && self.line.is_none()
    }
}

impl fmt::Debug for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.file, self.line) {
            (Some(file), Some(line)) => write!(f, "{file}, {line}"),
            (Some(file), None) => write!(f, "{file}"),
            (None, Some(line)) => write!(f, "<unknown>, {line}"),
            (None, None) => write!(f, "<unknown>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats() {
        assert_eq!(SourceLocation::new("main.jul", 12).to_string(), "main.jul, 12");
        assert_eq!(SourceLocation::unknown().to_string(), "<unknown>");
        assert!(SourceLocation::unknown().is_unknown());
    }
}
