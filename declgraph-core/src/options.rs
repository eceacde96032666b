//! Parser configuration.

use std::sync::Arc;

/// Default bound on node-stack and expression nesting.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Options for constructing a [`Parser`](crate::Parser).
///
/// ```
/// use declgraph_core::{Parser, ParserOptions};
///
/// let options = ParserOptions::new("window.dg").start_line(10).max_depth(32);
/// let parser = Parser::with_options("{}", options);
/// assert_eq!(parser.position().line(), 10);
/// ```
#[derive(Debug, Clone)]
pub struct ParserOptions {
    pub file: Arc<str>,
    pub start_line: u32,
    pub max_depth: usize,
}

impl ParserOptions {
    pub fn new(file: impl Into<Arc<str>>) -> Self {
        Self {
            file: file.into(),
            ..Self::default()
        }
    }

    /// Line number reported for the first line of input.
    pub fn start_line(mut self, line: u32) -> Self {
        self.start_line = line;
        self
    }

    /// Maximum nesting of objects, arrays, version blocks and
    /// parenthesized sub-expressions.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            file: Arc::from("<input>"),
            start_line: 1,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}
