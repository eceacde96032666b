//! declgraph Core Parser
//!
//! Pull parser for declgraph, a declarative object-graph notation: JSON-like
//! objects, arrays and dictionaries with typed and named object headers,
//! version blocks, property bindings and infix expressions.
//! Emits structural events without building a tree.
//!
//! ```text
//! Window => main {
//!     title: "Settings",
//!     width: base * 2 + 10,
//!     visible: @model.open,
//!     tags: [primary, modal],
//!     version(mobile) { width: 320 }
//! }
//! ```
//!
//! # Architecture
//!
//! - **cursor.rs** - Character reader with lookahead and line tracking
//! - **lexer.rs** - Tokens, longest-match operator table, comment skipping
//! - **number.rs** / **string.rs** - Literal interpreters
//! - **expr.rs** - Expression parser producing RPN and canonical text
//! - **parser.rs** - Event-driven structural parser over an explicit stack
//! - **value.rs** - Value, ValueKind, Operator, typed conversion
//! - **span.rs** / **error.rs** / **options.rs** - Positions, errors, configuration

mod cursor;
mod expr;
mod number;

pub mod error;
pub mod event;
pub mod lexer;
pub mod options;
pub mod parser;
pub mod span;
pub mod string;
pub mod value;

pub use error::{Error, ErrorKind, Result};
pub use event::Event;
pub use options::{ParserOptions, DEFAULT_MAX_DEPTH};
pub use parser::Parser;
pub use span::Position;
pub use value::{FromValue, Operator, Value, ValueKind};
