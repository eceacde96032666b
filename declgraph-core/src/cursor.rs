//! Character cursor over the input buffer.
//!
//! The cursor hands out one `char` at a time with small fixed lookahead and
//! keeps the line counter in sync. Comment bodies are skipped in bulk with
//! `memchr` rather than character by character.

use memchr::{memchr, memchr_iter, memmem};

#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    src: &'a str,
    pos: usize,
    line: u32,
}

impl<'a> Cursor<'a> {
    pub fn new(src: &'a str, line: u32) -> Self {
        Self { src, pos: 0, line }
    }

    /// Next character without consuming it; `None` at end of input.
    #[inline]
    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Character `n` places ahead of the next one (`peek_nth(0) == peek()`).
    #[inline]
    pub fn peek_nth(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    /// Consume and return the next character.
    #[inline]
    pub fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
        }
        Some(ch)
    }

    /// Consume the next character if it equals `expected`.
    #[inline]
    pub fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    #[inline]
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Byte offset of the next character.
    #[inline]
    pub fn offset(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    /// Source text between two byte offsets previously returned by `offset`.
    #[inline]
    pub fn slice(&self, start: usize, end: usize) -> &'a str {
        &self.src[start..end]
    }

    #[inline]
    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    /// Skip to the next newline (left unconsumed) or end of input.
    pub fn skip_line(&mut self) {
        let rest = self.rest().as_bytes();
        self.pos += memchr(b'\n', rest).unwrap_or(rest.len());
    }

    /// Skip past the next `*/`. Returns `false` (with the cursor at end of
    /// input) if there is none.
    pub fn skip_block_comment(&mut self) -> bool {
        let rest = self.rest().as_bytes();
        match memmem::find(rest, b"*/") {
            Some(idx) => {
                self.line += memchr_iter(b'\n', &rest[..idx]).count() as u32;
                self.pos += idx + 2;
                true
            }
            None => {
                self.line += memchr_iter(b'\n', rest).count() as u32;
                self.pos = self.src.len();
                false
            }
        }
    }
}
