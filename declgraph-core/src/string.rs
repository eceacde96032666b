//! String and character literal interpreter.
//!
//! Four forms:
//! - `"..."` with escapes
//! - `` `...` `` raw, no escapes
//! - `r"..."` raw, no escapes
//! - `'c'` character literal, exactly one character or escape
//!
//! The decoded string and the untouched source text are both kept on the
//! resulting [`Value`].

use phf::phf_map;

use crate::cursor::Cursor;
use crate::error::{Error, Result};
use crate::span::Position;
use crate::value::{Value, ValueKind};

/// Named entities accepted by `\&name;`.
pub static ENTITIES: phf::Map<&'static str, char> = phf_map! {
    "quot" => '"',
    "amp" => '&',
    "lt" => '<',
    "gt" => '>',
};

/// Scan a `"` string. The cursor must be on the opening quote.
pub(crate) fn scan_string(cursor: &mut Cursor<'_>, position: &Position) -> Result<Value> {
    let start = cursor.offset();
    cursor.advance();

    let mut decoded = String::new();
    loop {
        match cursor.advance() {
            Some('"') => break,
            Some('\\') => decoded.push(escape(cursor, position)?),
            Some(ch) => decoded.push(ch),
            None => return Err(unterminated(position, "string literal")),
        }
    }

    let text = cursor.slice(start, cursor.offset());
    Ok(Value::new(ValueKind::String(decoded), text, position.clone()))
}

/// Scan a raw string delimited by `` ` `` or `r"`. The cursor must be on the
/// backtick or on the `r`.
pub(crate) fn scan_raw_string(cursor: &mut Cursor<'_>, position: &Position) -> Result<Value> {
    let start = cursor.offset();
    let close = match cursor.advance() {
        Some('r') => {
            cursor.advance();
            '"'
        }
        _ => '`',
    };

    let body_start = cursor.offset();
    loop {
        match cursor.peek() {
            Some(ch) if ch == close => break,
            Some(_) => {
                cursor.advance();
            }
            None => return Err(unterminated(position, "raw string literal")),
        }
    }
    let body = cursor.slice(body_start, cursor.offset()).to_string();
    cursor.advance();

    let text = cursor.slice(start, cursor.offset());
    Ok(Value::new(ValueKind::String(body), text, position.clone()))
}

/// Scan a `'c'` character literal. Decodes to a one-character string.
pub(crate) fn scan_char(cursor: &mut Cursor<'_>, position: &Position) -> Result<Value> {
    let start = cursor.offset();
    cursor.advance();

    let ch = match cursor.advance() {
        Some('\'') => {
            return Err(Error::lexical(position.clone(), "empty character literal"));
        }
        Some('\\') => escape(cursor, position)?,
        Some(ch) => ch,
        None => return Err(unterminated(position, "character literal")),
    };

    match cursor.advance() {
        Some('\'') => {}
        Some(_) => {
            return Err(Error::lexical(
                position.clone(),
                "character literal must contain exactly one character",
            ));
        }
        None => return Err(unterminated(position, "character literal")),
    }

    let text = cursor.slice(start, cursor.offset());
    Ok(Value::new(ValueKind::String(ch.to_string()), text, position.clone()))
}

fn unterminated(position: &Position, what: &str) -> Error {
    Error::lexical(position.clone(), format!("unterminated {}", what))
}

/// Decode one escape sequence; the backslash is already consumed.
fn escape(cursor: &mut Cursor<'_>, position: &Position) -> Result<char> {
    let here = position.at_line(cursor.line());
    let ch = match cursor.advance() {
        Some(ch) => ch,
        None => return Err(Error::lexical(here, "unterminated escape sequence")),
    };

    match ch {
        '\'' | '"' | '\\' | '?' => Ok(ch),
        'a' => Ok('\x07'),
        'b' => Ok('\x08'),
        'f' => Ok('\x0C'),
        'n' => Ok('\n'),
        'r' => Ok('\r'),
        't' => Ok('\t'),
        'v' => Ok('\x0B'),
        '0'..='7' => {
            let mut code = ch as u32 - '0' as u32;
            for _ in 0..2 {
                match cursor.peek() {
                    Some(d @ '0'..='7') => {
                        cursor.advance();
                        code = code * 8 + (d as u32 - '0' as u32);
                    }
                    _ => break,
                }
            }
            code_point(code, here)
        }
        'x' => hex_escape(cursor, 2, here),
        'u' => hex_escape(cursor, 4, here),
        'U' => hex_escape(cursor, 8, here),
        '&' => entity(cursor, here),
        other => Err(Error::lexical(
            here,
            format!("unknown escape sequence `\\{}`", other),
        )),
    }
}

fn hex_escape(cursor: &mut Cursor<'_>, len: usize, here: Position) -> Result<char> {
    let mut code: u32 = 0;
    for _ in 0..len {
        match cursor.peek().and_then(|ch| ch.to_digit(16)) {
            Some(digit) => {
                cursor.advance();
                code = code * 16 + digit;
            }
            None => {
                return Err(Error::lexical(
                    here,
                    format!("escape sequence needs exactly {} hex digits", len),
                ));
            }
        }
    }
    code_point(code, here)
}

fn code_point(code: u32, here: Position) -> Result<char> {
    char::from_u32(code)
        .ok_or_else(|| Error::lexical(here, format!("invalid code point U+{:X}", code)))
}

/// `\&name;`
fn entity(cursor: &mut Cursor<'_>, here: Position) -> Result<char> {
    let start = cursor.offset();
    while matches!(cursor.peek(), Some(ch) if ch.is_ascii_alphanumeric()) {
        cursor.advance();
    }
    let name = cursor.slice(start, cursor.offset());

    if !cursor.eat(';') {
        return Err(Error::lexical(
            here,
            format!("named entity `{}` must end with `;`", name),
        ));
    }

    ENTITIES
        .get(name)
        .copied()
        .ok_or_else(|| Error::lexical(here, format!("unknown named entity `&{};`", name)))
}
