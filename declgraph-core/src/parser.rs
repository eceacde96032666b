//! Structural pull parser.
//!
//! The grammar is driven by an explicit stack of `Node` frames instead of
//! recursive functions, so control returns to the caller after every event.
//! Each call to [`Parser::advance`] looks at the current event and the top of
//! the stack, consumes just enough tokens to reach the next event, and stops.
//!
//! ```text
//! Ready ──────────► StartObject ──► Property ──► Value ─┐
//!                        ▲  │           ▲        StartObject
//!                        │  ▼           │        StartArray ──► Value / Key
//!                    EndObject ◄────────┴── completed item ◄──┘
//! ```
//!
//! A closed frame stays on the stack while its `End*` event is current so the
//! accessors still describe it. It is popped, together with the `Property`
//! frame that owned it, on the following advance.

use std::sync::Arc;

use log::{debug, trace};

use crate::error::{Error, Result};
use crate::event::Event;
use crate::expr::parse_expression;
use crate::lexer::{Lexer, TokenKind};
use crate::options::ParserOptions;
use crate::span::Position;
use crate::value::{Value, ValueKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeKind {
    Object,
    VersionBlock,
    /// Object property, or dictionary key.
    Property,
    Array,
    Dictionary,
}

impl NodeKind {
    fn is_container(self) -> bool {
        self != Self::Property
    }
}

/// One stack frame.
///
/// `name` holds the object name, version id, or property/key name depending
/// on `kind`. `type_name` is only set for typed objects.
#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    name: String,
    type_name: String,
    position: Position,
}

/// Pull parser over one source buffer.
///
/// ```
/// use declgraph_core::{Event, Parser};
///
/// let mut parser = Parser::new("Window => main { title: \"Hi\" }", "main.dg", 1);
/// assert_eq!(parser.advance().unwrap(), Event::StartObject);
/// assert_eq!(parser.object_type(), "Window");
/// assert_eq!(parser.object_name(), "main");
/// assert_eq!(parser.advance().unwrap(), Event::Property);
/// assert_eq!(parser.property_name(), Some("title"));
/// assert_eq!(parser.advance().unwrap(), Event::Value);
/// assert_eq!(parser.value().unwrap().get::<String>().unwrap(), "Hi");
/// ```
#[derive(Debug)]
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    options: ParserOptions,
    event: Event,
    /// Position of the token that produced the current event.
    position: Position,
    stack: Vec<Node>,
    /// Open objects, arrays and version blocks.
    containers: usize,
    /// Open `{` not yet matched by `}`.
    brace_depth: usize,
    value: Option<Value>,
    failed: Option<Error>,
    exhausted: bool,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str, file: impl Into<Arc<str>>, line: u32) -> Self {
        Self::with_options(input, ParserOptions::new(file).start_line(line))
    }

    pub fn with_options(input: &'a str, options: ParserOptions) -> Self {
        debug!(
            "parser created for {} ({} bytes, first line {}, max depth {})",
            options.file,
            input.len(),
            options.start_line,
            options.max_depth
        );
        Self {
            lexer: Lexer::new(input, options.file.clone(), options.start_line),
            position: Position::new(options.file.clone(), options.start_line),
            options,
            event: Event::Ready,
            stack: Vec::new(),
            containers: 0,
            brace_depth: 0,
            value: None,
            failed: None,
            exhausted: false,
        }
    }

    /// Move to the next event.
    ///
    /// `End` is returned again on every call after the input is exhausted.
    /// After an error the parser is dead: every further call returns the
    /// same error.
    pub fn advance(&mut self) -> Result<Event> {
        if let Some(err) = &self.failed {
            return Err(err.clone());
        }

        let previous = self.event;
        match self.step() {
            Ok(event) => {
                self.event = event;
                trace!(
                    "{} -> {} at {} (depth {})",
                    previous,
                    event,
                    self.position,
                    self.containers
                );
                Ok(event)
            }
            Err(err) => {
                debug!("parse failed after {}: {}", previous, err);
                self.value = None;
                self.failed = Some(err.clone());
                Err(err)
            }
        }
    }

    #[inline]
    pub fn event(&self) -> Event {
        self.event
    }

    /// Name of the nearest enclosing object, empty for anonymous objects.
    pub fn object_name(&self) -> &str {
        self.nearest(NodeKind::Object).map_or("", |node| &node.name)
    }

    /// Type of the nearest enclosing object, empty for untyped objects.
    pub fn object_type(&self) -> &str {
        self.nearest(NodeKind::Object)
            .map_or("", |node| &node.type_name)
    }

    /// Id of the nearest enclosing version block.
    pub fn version_id(&self) -> Option<&str> {
        self.nearest(NodeKind::VersionBlock)
            .map(|node| node.name.as_str())
    }

    /// Name of the nearest enclosing property, or the current dictionary key.
    pub fn property_name(&self) -> Option<&str> {
        self.nearest(NodeKind::Property)
            .map(|node| node.name.as_str())
    }

    /// The value of the current `Value` event.
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    pub fn take_value(&mut self) -> Option<Value> {
        self.value.take()
    }

    /// Where the current event was found. Before the first event this is the
    /// first line of input.
    pub fn position(&self) -> &Position {
        &self.position
    }

    /// Number of open objects, arrays and version blocks, including one that
    /// is being closed by the current `End*` event.
    pub fn depth(&self) -> usize {
        self.containers
    }

    fn nearest(&self, kind: NodeKind) -> Option<&Node> {
        self.stack.iter().rev().find(|node| node.kind == kind)
    }

    fn top_kind(&self) -> Option<NodeKind> {
        self.stack.last().map(|node| node.kind)
    }

    // ========== Stack ==========

    fn push(&mut self, kind: NodeKind, name: String, type_name: String, position: Position) -> Result<()> {
        if kind.is_container() {
            if self.containers >= self.options.max_depth {
                return Err(Error::syntax(
                    position,
                    format!("nesting deeper than {} levels", self.options.max_depth),
                ));
            }
            self.containers += 1;
        }
        self.stack.push(Node {
            kind,
            name,
            type_name,
            position,
        });
        Ok(())
    }

    fn pop(&mut self) -> Option<Node> {
        let node = self.stack.pop()?;
        if node.kind.is_container() {
            self.containers -= 1;
        }
        Some(node)
    }

    fn emit(&mut self, event: Event, position: Position) -> Result<Event> {
        self.position = position;
        Ok(event)
    }

    fn emit_value(&mut self, value: Value) -> Result<Event> {
        let position = value.position().clone();
        self.value = Some(value);
        self.emit(Event::Value, position)
    }

    // ========== Transitions ==========

    fn step(&mut self) -> Result<Event> {
        self.value = None;
        match self.event {
            Event::Ready => self.top_level(),
            Event::StartObject | Event::StartVersionBlock => self.member(),
            Event::Property | Event::Key => self.parse_value(),
            Event::StartArray => self.first_element(),
            Event::Value | Event::EndObject | Event::EndVersionBlock | Event::EndArray => {
                self.after_item()
            }
            Event::End => Ok(Event::End),
        }
    }

    fn top_level(&mut self) -> Result<Event> {
        match self.lexer.peek()?.kind {
            TokenKind::End => {
                let token = self.lexer.next_token()?;
                self.emit(Event::End, token.position)
            }
            TokenKind::LBrace => {
                let token = self.lexer.next_token()?;
                self.open_object(String::new(), String::new(), token.position)
            }
            TokenKind::Identifier(_) => match self.lexer.peek_second()?.kind {
                TokenKind::LBrace | TokenKind::Arrow => self.typed_object(),
                // `name: value, ...` with no enclosing braces. Treated as the
                // body of an anonymous object that ends with the input.
                TokenKind::Colon => {
                    let position = self.lexer.position();
                    debug!("unbraced top-level object at {}", position);
                    self.push(NodeKind::Object, String::new(), String::new(), position.clone())?;
                    self.emit(Event::StartObject, position)
                }
                _ => Err(self.unexpected("`{` or `=>` after the type name")),
            },
            _ => Err(self.unexpected("`{`, a type name, or end of input")),
        }
    }

    /// Inside an object or version block: a property, a version block, or
    /// the closing brace.
    fn member(&mut self) -> Result<Event> {
        let token = self.lexer.next_token()?;
        match token.kind {
            TokenKind::RBrace => self.close_brace(token.position),
            TokenKind::End if self.brace_depth == 0 => self.emit(Event::EndObject, token.position),
            TokenKind::Identifier(name) => {
                if name == "version" && self.lexer.peek()?.kind == TokenKind::LParen {
                    self.version_block(token.position)
                } else {
                    self.property(name, token.position)
                }
            }
            TokenKind::Literal(value) => match value.kind() {
                ValueKind::String(name) => {
                    let name = name.clone();
                    self.property(name, token.position)
                }
                _ => Err(Error::syntax(
                    token.position,
                    format!("expected property name or `}}`, found literal `{}`", value.text()),
                )),
            },
            TokenKind::End => Err(self.unclosed(token.position)),
            other => Err(Error::syntax(
                token.position,
                format!("expected property name or `}}`, found {}", other),
            )),
        }
    }

    fn property(&mut self, name: String, position: Position) -> Result<Event> {
        self.lexer.expect(&TokenKind::Colon)?;
        self.push(NodeKind::Property, name, String::new(), position.clone())?;
        self.emit(Event::Property, position)
    }

    /// `version ( id ) {` with `version` already consumed.
    fn version_block(&mut self, position: Position) -> Result<Event> {
        self.lexer.expect(&TokenKind::LParen)?;
        let (id, _) = self.lexer.expect_identifier("version id")?;
        self.lexer.expect(&TokenKind::RParen)?;
        self.lexer.expect(&TokenKind::LBrace)?;

        self.push(NodeKind::VersionBlock, id, String::new(), position.clone())?;
        self.brace_depth += 1;
        self.emit(Event::StartVersionBlock, position)
    }

    fn close_brace(&mut self, position: Position) -> Result<Event> {
        if self.brace_depth == 0 {
            return Err(Error::syntax(position, "unmatched `}`"));
        }
        self.brace_depth -= 1;
        match self.top_kind() {
            Some(NodeKind::VersionBlock) => self.emit(Event::EndVersionBlock, position),
            _ => self.emit(Event::EndObject, position),
        }
    }

    /// The value after `name:`, `key:`, `[` or `,` in an array.
    fn parse_value(&mut self) -> Result<Event> {
        match self.lexer.peek()?.kind {
            TokenKind::LBrace => {
                let token = self.lexer.next_token()?;
                self.open_object(String::new(), String::new(), token.position)
            }
            TokenKind::LBracket => {
                let token = self.lexer.next_token()?;
                self.push(NodeKind::Array, String::new(), String::new(), token.position.clone())?;
                self.emit(Event::StartArray, token.position)
            }
            TokenKind::Identifier(_) => match self.lexer.peek_second()?.kind {
                TokenKind::LBrace | TokenKind::Arrow => self.typed_object(),
                _ => self.expression(),
            },
            TokenKind::At => {
                let token = self.lexer.next_token()?;
                self.binding(token.position)
            }
            TokenKind::AtAt => {
                let token = self.lexer.next_token()?;
                let (path, _) = self.lexer.expect_identifier("binding path after `@@`")?;
                let text = format!("@@{}", path);
                self.emit_value(Value::new(ValueKind::DoubleBinding(path), text, token.position))
            }
            _ => self.expression(),
        }
    }

    /// `Type {` or `Type => Name {`
    fn typed_object(&mut self) -> Result<Event> {
        let (type_name, position) = self.lexer.expect_identifier("type name")?;
        let name = if self.lexer.eat(&TokenKind::Arrow)? {
            self.lexer.expect_identifier("object name after `=>`")?.0
        } else {
            String::new()
        };
        self.lexer.expect(&TokenKind::LBrace)?;
        self.open_object(name, type_name, position)
    }

    fn open_object(&mut self, name: String, type_name: String, position: Position) -> Result<Event> {
        self.push(NodeKind::Object, name, type_name, position.clone())?;
        self.brace_depth += 1;
        self.emit(Event::StartObject, position)
    }

    /// `@path` or `@{ expression }` with the `@` consumed.
    ///
    /// An expression binding is always an expression value, even with a
    /// single term, so `@{ x }` stays distinct from a plain `x`.
    fn binding(&mut self, position: Position) -> Result<Event> {
        if self.lexer.eat(&TokenKind::LBrace)? {
            let value = parse_expression(&mut self.lexer, self.options.max_depth)?;
            self.lexer.expect(&TokenKind::RBrace)?;
            let value = if value.is_expression() {
                value
            } else {
                let text = value.text().to_string();
                let start = value.position().clone();
                Value::new(ValueKind::Expression(vec![value]), text, start)
            };
            return self.emit_value(value);
        }

        let (path, _) = self.lexer.expect_identifier("binding path after `@`")?;
        let text = format!("@{}", path);
        self.emit_value(Value::new(ValueKind::Binding(path), text, position))
    }

    fn expression(&mut self) -> Result<Event> {
        let value = parse_expression(&mut self.lexer, self.options.max_depth)?;
        self.emit_value(value)
    }

    /// Right after `[`. A `key:` here turns the array into a dictionary.
    fn first_element(&mut self) -> Result<Event> {
        let keyed = match self.lexer.peek()?.kind {
            TokenKind::RBracket => {
                let token = self.lexer.next_token()?;
                return self.emit(Event::EndArray, token.position);
            }
            TokenKind::Identifier(_) | TokenKind::Literal(_) => {
                self.lexer.peek_second()?.kind == TokenKind::Colon
            }
            _ => false,
        };

        if !keyed {
            return self.parse_value();
        }
        if let Some(node) = self.stack.last_mut() {
            node.kind = NodeKind::Dictionary;
            debug!("array at {} reclassified as dictionary", node.position);
        }
        self.key()
    }

    fn key(&mut self) -> Result<Event> {
        let token = self.lexer.next_token()?;
        let name = match token.kind {
            TokenKind::Identifier(name) => name,
            // Numeric and keyword keys are named by their source text.
            TokenKind::Literal(value) => match value.kind() {
                ValueKind::String(name) => name.clone(),
                _ => value.text().to_string(),
            },
            other => {
                return Err(Error::syntax(
                    token.position,
                    format!("expected dictionary key, found {}", other),
                ))
            }
        };
        self.lexer.expect(&TokenKind::Colon)?;
        self.push(NodeKind::Property, name, String::new(), token.position.clone())?;
        self.emit(Event::Key, token.position)
    }

    /// After a value or a closed structure: pop what completed, then look
    /// at the enclosing container.
    fn after_item(&mut self) -> Result<Event> {
        let mut after_block = false;
        if self.event.is_end() {
            after_block = matches!(self.pop(), Some(node) if node.kind == NodeKind::VersionBlock);
        }
        if self.top_kind() == Some(NodeKind::Property) {
            self.pop();
        }

        match self.top_kind() {
            None => self.finish(),
            Some(NodeKind::Array) | Some(NodeKind::Dictionary) => self.next_element(),
            Some(_) => self.next_member(after_block),
        }
    }

    fn finish(&mut self) -> Result<Event> {
        let token = self.lexer.next_token()?;
        match token.kind {
            TokenKind::End => self.emit(Event::End, token.position),
            other => Err(Error::syntax(
                token.position,
                format!("unexpected {} after the top-level object", other),
            )),
        }
    }

    fn next_element(&mut self) -> Result<Event> {
        let token = self.lexer.next_token()?;
        match token.kind {
            TokenKind::Comma => {
                if self.lexer.peek()?.kind == TokenKind::RBracket {
                    let token = self.lexer.next_token()?;
                    return self.emit(Event::EndArray, token.position);
                }
                match self.top_kind() {
                    Some(NodeKind::Dictionary) => self.key(),
                    _ => self.parse_value(),
                }
            }
            TokenKind::RBracket => self.emit(Event::EndArray, token.position),
            other => Err(Error::syntax(
                token.position,
                format!("expected `,` or `]`, found {}", other),
            )),
        }
    }

    /// Members are separated by commas, except that a version block needs
    /// none after its closing brace.
    fn next_member(&mut self, after_block: bool) -> Result<Event> {
        if !self.lexer.eat(&TokenKind::Comma)? && !after_block {
            let token = self.lexer.peek()?;
            if !matches!(token.kind, TokenKind::RBrace | TokenKind::End) {
                return Err(Error::syntax(
                    token.position.clone(),
                    format!("expected `,` or `}}`, found {}", token.kind),
                ));
            }
        }
        self.member()
    }

    // ========== Errors ==========

    /// Error for the next token, which is not consumed.
    fn unexpected(&mut self, expected: &str) -> Error {
        match self.lexer.peek() {
            Ok(token) => Error::syntax(
                token.position.clone(),
                format!("expected {}, found {}", expected, token.kind),
            ),
            Err(err) => err,
        }
    }

    fn unclosed(&self, position: Position) -> Error {
        let (what, line) = match self.stack.iter().rev().find(|node| node.kind.is_container()) {
            Some(node) if node.kind == NodeKind::VersionBlock => ("version block", node.position.line()),
            Some(node) => ("object", node.position.line()),
            None => ("object", position.line()),
        };
        Error::syntax(
            position,
            format!("expected `}}` before end of input to close the {} opened at line {}", what, line),
        )
    }
}

impl Iterator for Parser<'_> {
    type Item = Result<Event>;

    /// Yields every event up to and including `End`, or the first error.
    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        let result = self.advance();
        if matches!(result, Ok(Event::End) | Err(_)) {
            self.exhausted = true;
        }
        Some(result)
    }
}
