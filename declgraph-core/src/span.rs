//! Source positions.
//!
//! Every token, value and error carries a [`Position`] so diagnostics can
//! name the originating file and line without a side table.

use std::fmt;
use std::sync::Arc;

/// A `(file, line)` pair. Lines are 1-based by convention, but the parser
/// starts counting from whatever line the caller hands it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Position {
    file: Arc<str>,
    line: u32,
}

impl Position {
    /// Create a position in `file` at `line`.
    pub fn new(file: impl Into<Arc<str>>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }

    /// Name of the originating file.
    #[inline]
    pub fn file(&self) -> &str {
        &self.file
    }

    /// Line number.
    #[inline]
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Same file, different line. Shares the file name allocation.
    #[inline]
    pub(crate) fn at_line(&self, line: u32) -> Self {
        Self {
            file: Arc::clone(&self.file),
            line,
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new("<input>", 1)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.file, self.line)
    }
}
