//! Lexer: characters in, tokens out.
//!
//! Whitespace and comments are skipped before every token. Punctuation and
//! operators are matched longest-first against a static spelling table, so
//! `!<>=` wins over `!<` followed by `>=`. Literals are handed to the
//! numeric and string interpreters.
//!
//! Two tokens of lookahead are available through [`Lexer::peek`] and
//! [`Lexer::peek_second`]; the structural parser needs both to tell a typed
//! object header (`Type {`, `Type =>`) from a plain identifier value.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use phf::phf_map;
use unicode_xid::UnicodeXID;

use crate::cursor::Cursor;
use crate::error::{Error, Result};
use crate::number::scan_number;
use crate::span::Position;
use crate::string::{scan_char, scan_raw_string, scan_string};
use crate::value::{Operator, Value, ValueKind};

/// Token payloads.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    LParen,
    RParen,
    Comma,
    Colon,
    /// `@`
    At,
    /// `@@`
    AtAt,
    /// `=>`
    Arrow,
    Operator(Operator),
    Identifier(String),
    Literal(Value),
    End,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LBrace => f.write_str("`{`"),
            Self::RBrace => f.write_str("`}`"),
            Self::LBracket => f.write_str("`[`"),
            Self::RBracket => f.write_str("`]`"),
            Self::LParen => f.write_str("`(`"),
            Self::RParen => f.write_str("`)`"),
            Self::Comma => f.write_str("`,`"),
            Self::Colon => f.write_str("`:`"),
            Self::At => f.write_str("`@`"),
            Self::AtAt => f.write_str("`@@`"),
            Self::Arrow => f.write_str("`=>`"),
            Self::Operator(op) => write!(f, "`{}`", op.symbol()),
            Self::Identifier(name) => write!(f, "identifier `{}`", name),
            Self::Literal(value) => write!(f, "literal `{}`", value.text()),
            Self::End => f.write_str("end of input"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub position: Position,
}

/// Punctuation and operator spellings. Values are copied into tokens.
#[derive(Debug, Clone, Copy)]
enum Symbol {
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    LParen,
    RParen,
    Comma,
    Colon,
    At,
    AtAt,
    Arrow,
    Op(Operator),
}

impl Symbol {
    fn into_kind(self) -> TokenKind {
        match self {
            Self::LBrace => TokenKind::LBrace,
            Self::RBrace => TokenKind::RBrace,
            Self::LBracket => TokenKind::LBracket,
            Self::RBracket => TokenKind::RBracket,
            Self::LParen => TokenKind::LParen,
            Self::RParen => TokenKind::RParen,
            Self::Comma => TokenKind::Comma,
            Self::Colon => TokenKind::Colon,
            Self::At => TokenKind::At,
            Self::AtAt => TokenKind::AtAt,
            Self::Arrow => TokenKind::Arrow,
            Self::Op(op) => TokenKind::Operator(op),
        }
    }
}

/// Longest spelling in `SYMBOLS`.
const MAX_SYMBOL_LEN: usize = 4;

static SYMBOLS: phf::Map<&'static str, Symbol> = phf_map! {
    "{" => Symbol::LBrace,
    "}" => Symbol::RBrace,
    "[" => Symbol::LBracket,
    "]" => Symbol::RBracket,
    "(" => Symbol::LParen,
    ")" => Symbol::RParen,
    "," => Symbol::Comma,
    ":" => Symbol::Colon,
    "@" => Symbol::At,
    "@@" => Symbol::AtAt,
    "=>" => Symbol::Arrow,
    "?" => Symbol::Op(Operator::Conditional),
    "||" => Symbol::Op(Operator::OrOr),
    "&&" => Symbol::Op(Operator::AndAnd),
    "|" => Symbol::Op(Operator::BitOr),
    "^" => Symbol::Op(Operator::BitXor),
    "&" => Symbol::Op(Operator::BitAnd),
    "==" => Symbol::Op(Operator::Equal),
    "!=" => Symbol::Op(Operator::NotEqual),
    "<" => Symbol::Op(Operator::Less),
    "<=" => Symbol::Op(Operator::LessOrEqual),
    ">" => Symbol::Op(Operator::Greater),
    ">=" => Symbol::Op(Operator::GreaterOrEqual),
    "!<>=" => Symbol::Op(Operator::Unordered),
    "!<>" => Symbol::Op(Operator::UnorderedOrEqual),
    "<>" => Symbol::Op(Operator::LessOrGreater),
    "<>=" => Symbol::Op(Operator::LessGreaterOrEqual),
    "!>" => Symbol::Op(Operator::UnorderedLessOrEqual),
    "!>=" => Symbol::Op(Operator::UnorderedOrLess),
    "!<" => Symbol::Op(Operator::UnorderedGreaterOrEqual),
    "!<=" => Symbol::Op(Operator::UnorderedOrGreater),
    "<<" => Symbol::Op(Operator::ShiftLeft),
    ">>" => Symbol::Op(Operator::ShiftRight),
    ">>>" => Symbol::Op(Operator::UnsignedShiftRight),
    "+" => Symbol::Op(Operator::Add),
    "-" => Symbol::Op(Operator::Subtract),
    "~" => Symbol::Op(Operator::Concat),
    "*" => Symbol::Op(Operator::Multiply),
    "/" => Symbol::Op(Operator::Divide),
    "%" => Symbol::Op(Operator::Modulo),
    "!" => Symbol::Op(Operator::Not),
};

static KEYWORDS: phf::Map<&'static str, ValueKind> = phf_map! {
    "true" => ValueKind::True,
    "false" => ValueKind::False,
    "null" => ValueKind::Null,
};

#[inline]
fn is_ident_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

#[inline]
fn is_ident_continue(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || ch == '.'
}

#[derive(Debug)]
pub struct Lexer<'a> {
    cursor: Cursor<'a>,
    origin: Position,
    lookahead: VecDeque<Token>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str, file: Arc<str>, line: u32) -> Self {
        Self {
            cursor: Cursor::new(input, line),
            origin: Position::new(file, line),
            lookahead: VecDeque::with_capacity(2),
        }
    }

    /// Position of the next unconsumed token (or of the cursor if nothing
    /// has been peeked yet).
    pub fn position(&self) -> Position {
        match self.lookahead.front() {
            Some(token) => token.position.clone(),
            None => self.origin.at_line(self.cursor.line()),
        }
    }

    /// Next token, without consuming it.
    pub fn peek(&mut self) -> Result<&Token> {
        self.fill(1)?;
        Ok(&self.lookahead[0])
    }

    /// The token after the next one, without consuming either.
    pub fn peek_second(&mut self) -> Result<&Token> {
        self.fill(2)?;
        Ok(&self.lookahead[1])
    }

    pub fn next_token(&mut self) -> Result<Token> {
        self.fill(1)?;
        match self.lookahead.pop_front() {
            Some(token) => Ok(token),
            None => Ok(self.end_token()),
        }
    }

    /// Consume the next token if it has the given (payload-free) kind.
    pub fn eat(&mut self, kind: &TokenKind) -> Result<bool> {
        if &self.peek()?.kind == kind {
            self.next_token()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Consume a token of the given kind or fail with a syntax error.
    pub fn expect(&mut self, kind: &TokenKind) -> Result<Token> {
        let token = self.next_token()?;
        if &token.kind == kind {
            Ok(token)
        } else {
            Err(Error::syntax(
                token.position,
                format!("expected {}, found {}", kind, token.kind),
            ))
        }
    }

    /// Consume an identifier token and return its name.
    pub fn expect_identifier(&mut self, what: &str) -> Result<(String, Position)> {
        let token = self.next_token()?;
        match token.kind {
            TokenKind::Identifier(name) => Ok((name, token.position)),
            other => Err(Error::syntax(
                token.position,
                format!("expected {}, found {}", what, other),
            )),
        }
    }

    fn fill(&mut self, n: usize) -> Result<()> {
        while self.lookahead.len() < n {
            let token = self.lex()?;
            self.lookahead.push_back(token);
        }
        Ok(())
    }

    fn end_token(&self) -> Token {
        Token {
            kind: TokenKind::End,
            position: self.origin.at_line(self.cursor.line()),
        }
    }

    fn skip_trivia(&mut self) -> Result<()> {
        loop {
            match (self.cursor.peek(), self.cursor.peek_nth(1)) {
                (Some(ch), _) if ch.is_whitespace() => {
                    self.cursor.advance();
                }
                (Some('/'), Some('/')) => self.cursor.skip_line(),
                (Some('/'), Some('*')) => {
                    let start = self.origin.at_line(self.cursor.line());
                    self.cursor.advance();
                    self.cursor.advance();
                    if !self.cursor.skip_block_comment() {
                        return Err(Error::lexical(start, "unterminated block comment"));
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn lex(&mut self) -> Result<Token> {
        self.skip_trivia()?;
        let position = self.origin.at_line(self.cursor.line());

        let ch = match self.cursor.peek() {
            Some(ch) => ch,
            None => return Ok(self.end_token()),
        };

        let kind = match ch {
            '"' => TokenKind::Literal(scan_string(&mut self.cursor, &position)?),
            '`' => TokenKind::Literal(scan_raw_string(&mut self.cursor, &position)?),
            '\'' => TokenKind::Literal(scan_char(&mut self.cursor, &position)?),
            'r' if self.cursor.peek_nth(1) == Some('"') => {
                TokenKind::Literal(scan_raw_string(&mut self.cursor, &position)?)
            }
            '0'..='9' => TokenKind::Literal(scan_number(&mut self.cursor, &position)?),
            '.' if matches!(self.cursor.peek_nth(1), Some('0'..='9')) => {
                TokenKind::Literal(scan_number(&mut self.cursor, &position)?)
            }
            c if is_ident_start(c) => self.identifier(&position),
            _ => self.symbol(ch, &position)?,
        };

        Ok(Token { kind, position })
    }

    fn identifier(&mut self, position: &Position) -> TokenKind {
        let start = self.cursor.offset();
        while matches!(self.cursor.peek(), Some(ch) if is_ident_continue(ch)) {
            self.cursor.advance();
        }
        let name = self.cursor.slice(start, self.cursor.offset());

        match KEYWORDS.get(name) {
            Some(kind) => TokenKind::Literal(Value::new(kind.clone(), name, position.clone())),
            None => TokenKind::Identifier(name.to_string()),
        }
    }

    fn symbol(&mut self, first: char, position: &Position) -> Result<TokenKind> {
        let mut spelling = String::with_capacity(MAX_SYMBOL_LEN);
        for n in 0..MAX_SYMBOL_LEN {
            match self.cursor.peek_nth(n) {
                Some(ch) if ch.is_ascii_punctuation() => spelling.push(ch),
                _ => break,
            }
        }

        for len in (1..=spelling.len()).rev() {
            if let Some(symbol) = SYMBOLS.get(&spelling[..len]) {
                for _ in 0..len {
                    self.cursor.advance();
                }
                return Ok(symbol.into_kind());
            }
        }

        let message = match first {
            '=' => "unexpected `=`; use `==` for comparison".to_string(),
            c if c.is_xid_start() => format!("identifiers must be ASCII, found `{}`", c),
            c => format!("invalid character `{}`", c.escape_debug()),
        };
        Err(Error::lexical(position.clone(), message))
    }
}
