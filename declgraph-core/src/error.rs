//! The single error type reported by every stage of the parser.
//!
//! Lexing, parsing and value conversion all fail with [`Error`]; the
//! [`ErrorKind`] tells them apart. Nothing is recovered internally: the
//! first error ends the event sequence.

use crate::span::Position;

/// Which stage produced an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ErrorKind {
    /// Invalid character, unterminated string or comment, bad escape,
    /// malformed numeric literal.
    Lexical = 0,
    /// Token does not fit the grammar, unexpected end of input,
    /// mismatched closing bracket.
    Syntax,
    /// A decoded value was requested as an incompatible type.
    ValueConversion,
}

impl ErrorKind {
    /// Short label used in rendered messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::Lexical => "lexical",
            Self::Syntax => "syntax",
            Self::ValueConversion => "value conversion",
        }
    }
}

/// A positioned error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{position}: {} error: {message}", kind.label())]
pub struct Error {
    pub kind: ErrorKind,
    pub position: Position,
    pub message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, position: Position, message: impl Into<String>) -> Self {
        Self {
            kind,
            position,
            message: message.into(),
        }
    }

    pub fn lexical(position: Position, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Lexical, position, message)
    }

    pub fn syntax(position: Position, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Syntax, position, message)
    }

    pub fn conversion(position: Position, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ValueConversion, position, message)
    }

    /// Line the error was reported at.
    #[inline]
    pub fn line(&self) -> u32 {
        self.position.line()
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
