//! Decoded values and expression operators.
//!
//! A [`Value`] pairs a closed [`ValueKind`] with the exact source text it was
//! decoded from, so consumers can both compute with the payload and show the
//! literal as written. Expressions are flat RPN sequences of values; a
//! downstream evaluator needs a single operand stack and nothing else.

use std::fmt;

use crate::error::{Error, Result};
use crate::span::Position;

/// Operator codes appearing in expression RPN sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `a ? b : c`
    Conditional,
    OrOr,
    AndAnd,
    BitOr,
    BitXor,
    BitAnd,
    Equal,
    NotEqual,
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
    /// `!<>=`: true when either side is NaN.
    Unordered,
    /// `!<>`
    UnorderedOrEqual,
    /// `<>`
    LessOrGreater,
    /// `<>=`: true unless either side is NaN.
    LessGreaterOrEqual,
    /// `!>`
    UnorderedLessOrEqual,
    /// `!>=`
    UnorderedOrLess,
    /// `!<`
    UnorderedGreaterOrEqual,
    /// `!<=`
    UnorderedOrGreater,
    ShiftLeft,
    ShiftRight,
    /// `>>>`
    UnsignedShiftRight,
    Add,
    Subtract,
    /// `~`
    Concat,
    Multiply,
    Divide,
    Modulo,
    /// Unary `-`
    Negate,
    /// Unary `+`
    Plus,
    /// Unary `!`
    Not,
}

impl Operator {
    /// Source spelling. The conditional renders as `?`; its `:` is implied.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Conditional => "?",
            Self::OrOr => "||",
            Self::AndAnd => "&&",
            Self::BitOr => "|",
            Self::BitXor => "^",
            Self::BitAnd => "&",
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::Less => "<",
            Self::LessOrEqual => "<=",
            Self::Greater => ">",
            Self::GreaterOrEqual => ">=",
            Self::Unordered => "!<>=",
            Self::UnorderedOrEqual => "!<>",
            Self::LessOrGreater => "<>",
            Self::LessGreaterOrEqual => "<>=",
            Self::UnorderedLessOrEqual => "!>",
            Self::UnorderedOrLess => "!>=",
            Self::UnorderedGreaterOrEqual => "!<",
            Self::UnorderedOrGreater => "!<=",
            Self::ShiftLeft => "<<",
            Self::ShiftRight => ">>",
            Self::UnsignedShiftRight => ">>>",
            Self::Add | Self::Plus => "+",
            Self::Subtract | Self::Negate => "-",
            Self::Concat => "~",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Modulo => "%",
            Self::Not => "!",
        }
    }

    /// Descriptive name, e.g. `unorderedOrEqual`.
    pub fn name(self) -> &'static str {
        match self {
            Self::Conditional => "conditional",
            Self::OrOr => "logicalOr",
            Self::AndAnd => "logicalAnd",
            Self::BitOr => "bitwiseOr",
            Self::BitXor => "bitwiseXor",
            Self::BitAnd => "bitwiseAnd",
            Self::Equal => "equal",
            Self::NotEqual => "notEqual",
            Self::Less => "less",
            Self::LessOrEqual => "lessOrEqual",
            Self::Greater => "greater",
            Self::GreaterOrEqual => "greaterOrEqual",
            Self::Unordered => "unordered",
            Self::UnorderedOrEqual => "unorderedOrEqual",
            Self::LessOrGreater => "lessOrGreater",
            Self::LessGreaterOrEqual => "lessGreaterOrEqual",
            Self::UnorderedLessOrEqual => "unorderedLessOrEqual",
            Self::UnorderedOrLess => "unorderedOrLess",
            Self::UnorderedGreaterOrEqual => "unorderedGreaterOrEqual",
            Self::UnorderedOrGreater => "unorderedOrGreater",
            Self::ShiftLeft => "shiftLeft",
            Self::ShiftRight => "shiftRight",
            Self::UnsignedShiftRight => "unsignedShiftRight",
            Self::Add => "add",
            Self::Subtract => "subtract",
            Self::Concat => "concat",
            Self::Multiply => "multiply",
            Self::Divide => "divide",
            Self::Modulo => "modulo",
            Self::Negate => "negate",
            Self::Plus => "plus",
            Self::Not => "not",
        }
    }

    /// Binding strength; higher binds tighter.
    pub fn precedence(self) -> u8 {
        match self {
            Self::Conditional => 1,
            Self::OrOr => 2,
            Self::AndAnd => 3,
            Self::BitOr => 4,
            Self::BitXor => 5,
            Self::BitAnd => 6,
            Self::Equal
            | Self::NotEqual
            | Self::Less
            | Self::LessOrEqual
            | Self::Greater
            | Self::GreaterOrEqual
            | Self::Unordered
            | Self::UnorderedOrEqual
            | Self::LessOrGreater
            | Self::LessGreaterOrEqual
            | Self::UnorderedLessOrEqual
            | Self::UnorderedOrLess
            | Self::UnorderedGreaterOrEqual
            | Self::UnorderedOrGreater => 7,
            Self::ShiftLeft | Self::ShiftRight | Self::UnsignedShiftRight => 8,
            Self::Add | Self::Subtract | Self::Concat => 9,
            Self::Multiply | Self::Divide | Self::Modulo => 10,
            Self::Negate | Self::Plus | Self::Not => 11,
        }
    }

    /// Number of operands popped by an RPN evaluator.
    pub fn arity(self) -> usize {
        match self {
            Self::Conditional => 3,
            Self::Negate | Self::Plus | Self::Not => 1,
            _ => 2,
        }
    }

    #[inline]
    pub fn is_unary(self) -> bool {
        self.arity() == 1
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Payload of a [`Value`].
#[derive(Debug, Clone, PartialEq)]
pub enum ValueKind {
    /// Integer literal. Suffixes (`u`, `L`) do not change the kind.
    Integer(i128),
    /// Float literal (decimal or hex).
    Float(f64),
    /// String or character literal, escapes decoded.
    String(String),
    True,
    False,
    Null,
    /// Bare identifier or dotted path.
    Identifier(String),
    /// `@path`
    Binding(String),
    /// `@@path`
    DoubleBinding(String),
    /// Operator node inside an expression.
    Operator(Operator),
    /// RPN sequence of operands and operators.
    Expression(Vec<Value>),
}

/// A decoded value with its source text and position.
#[derive(Debug, Clone, PartialEq)]
pub struct Value {
    kind: ValueKind,
    text: String,
    position: Position,
}

impl Value {
    pub fn new(kind: ValueKind, text: impl Into<String>, position: Position) -> Self {
        Self {
            kind,
            text: text.into(),
            position,
        }
    }

    #[inline]
    pub fn kind(&self) -> &ValueKind {
        &self.kind
    }

    #[inline]
    pub fn into_kind(self) -> ValueKind {
        self.kind
    }

    /// Literal source text, or canonical text for expressions.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[inline]
    pub fn position(&self) -> &Position {
        &self.position
    }

    pub(crate) fn set_kind(&mut self, kind: ValueKind) {
        self.kind = kind;
    }

    pub(crate) fn set_text(&mut self, text: String) {
        self.text = text;
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self.kind, ValueKind::Null)
    }

    #[inline]
    pub fn is_expression(&self) -> bool {
        matches!(self.kind, ValueKind::Expression(_))
    }

    #[inline]
    pub fn is_binding(&self) -> bool {
        matches!(self.kind, ValueKind::Binding(_) | ValueKind::DoubleBinding(_))
    }

    /// Literal constants: numbers, strings, booleans and null.
    pub fn is_literal(&self) -> bool {
        matches!(
            self.kind,
            ValueKind::Integer(_)
                | ValueKind::Float(_)
                | ValueKind::String(_)
                | ValueKind::True
                | ValueKind::False
                | ValueKind::Null
        )
    }

    /// Identifier name, if this is a bare identifier.
    pub fn as_identifier(&self) -> Option<&str> {
        match &self.kind {
            ValueKind::Identifier(name) => Some(name),
            _ => None,
        }
    }

    /// Dotted path of a single or double binding.
    pub fn as_path(&self) -> Option<&str> {
        match &self.kind {
            ValueKind::Binding(path) | ValueKind::DoubleBinding(path) => Some(path),
            _ => None,
        }
    }

    /// RPN terms of an expression.
    pub fn terms(&self) -> Option<&[Value]> {
        match &self.kind {
            ValueKind::Expression(terms) => Some(terms),
            _ => None,
        }
    }

    /// Decode into `T`, failing with a value conversion error when the
    /// literal's kind or magnitude does not fit.
    pub fn get<T: FromValue>(&self) -> Result<T> {
        T::from_value(self)
    }

    fn describe(&self) -> &'static str {
        match self.kind {
            ValueKind::Integer(_) => "integer literal",
            ValueKind::Float(_) => "float literal",
            ValueKind::String(_) => "string literal",
            ValueKind::True | ValueKind::False => "boolean literal",
            ValueKind::Null => "null",
            ValueKind::Identifier(_) => "identifier",
            ValueKind::Binding(_) => "binding",
            ValueKind::DoubleBinding(_) => "double binding",
            ValueKind::Operator(_) => "operator",
            ValueKind::Expression(_) => "expression",
        }
    }

    fn mismatch(&self, target: &str) -> Error {
        Error::conversion(
            self.position.clone(),
            format!("cannot read {} `{}` as {}", self.describe(), self.text, target),
        )
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Types a [`Value`] can be decoded into.
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> Result<Self>;
}

impl FromValue for bool {
    fn from_value(value: &Value) -> Result<Self> {
        match value.kind {
            ValueKind::True => Ok(true),
            ValueKind::False => Ok(false),
            _ => Err(value.mismatch("bool")),
        }
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> Result<Self> {
        match &value.kind {
            ValueKind::String(s) => Ok(s.clone()),
            _ => Err(value.mismatch("string")),
        }
    }
}

impl FromValue for f64 {
    fn from_value(value: &Value) -> Result<Self> {
        match value.kind {
            ValueKind::Float(f) => Ok(f),
            ValueKind::Integer(i) => Ok(i as f64),
            _ => Err(value.mismatch("f64")),
        }
    }
}

impl FromValue for f32 {
    fn from_value(value: &Value) -> Result<Self> {
        let wide = match value.kind {
            ValueKind::Float(f) => f,
            ValueKind::Integer(i) => i as f64,
            _ => return Err(value.mismatch("f32")),
        };
        let narrow = wide as f32;
        if narrow.is_infinite() && wide.is_finite() {
            return Err(Error::conversion(
                value.position.clone(),
                format!("float literal `{}` is out of range for f32", value.text),
            ));
        }
        Ok(narrow)
    }
}

macro_rules! integer_from_value {
    ($($ty:ty),*) => {$(
        impl FromValue for $ty {
            fn from_value(value: &Value) -> Result<Self> {
                match value.kind {
                    ValueKind::Integer(i) => <$ty>::try_from(i).map_err(|_| {
                        Error::conversion(
                            value.position.clone(),
                            format!(
                                "integer literal `{}` does not fit in {}",
                                value.text,
                                stringify!($ty)
                            ),
                        )
                    }),
                    _ => Err(value.mismatch(stringify!($ty))),
                }
            }
        }
    )*};
}

integer_from_value!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
