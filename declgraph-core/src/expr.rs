//! Expression parser.
//!
//! Recursive descent over the lexer's tokens, one loop per precedence level:
//!
//! ```text
//! ternary   ?:                     (lowest, right-associative)
//! ||  &&  |  ^  &
//! relational / equality            == != < <= > >= and the unordered family
//! shift     << >> >>>
//! additive  + - ~
//! multiplicative * / %
//! unary     + - !
//! primary   literal | identifier | ( expression )
//! ```
//!
//! Output is an RPN sequence: operands in source order, each operator right
//! after its operands. Alongside it the parser renders canonical text with
//! single spaces around binary operators and explicit parentheses.
//!
//! A unary operator applied directly to a literal is folded into the literal
//! (`-93` is one integer term). A parenthesized operand is never folded, so
//! `-(5)` stays `5 negate`.

use crate::error::{Error, Result};
use crate::lexer::{Lexer, TokenKind};
use crate::span::Position;
use crate::value::{Operator, Value, ValueKind};

/// Canonical text of a parsed operand, and whether it is a bare literal
/// that a unary prefix may fold into.
struct Operand {
    text: String,
    foldable: bool,
}

impl Operand {
    fn literal(text: String) -> Self {
        Self { text, foldable: true }
    }

    fn compound(text: String) -> Self {
        Self {
            text,
            foldable: false,
        }
    }
}

struct ExpressionParser<'l, 'a> {
    lexer: &'l mut Lexer<'a>,
    terms: Vec<Value>,
    depth: usize,
    max_depth: usize,
}

/// Parse one expression from `lexer`.
///
/// Returns the bare operand when no operator node was needed, otherwise an
/// [`ValueKind::Expression`] whose text is the canonical rendering.
pub(crate) fn parse_expression(lexer: &mut Lexer<'_>, max_depth: usize) -> Result<Value> {
    let position = lexer.peek()?.position.clone();
    let mut parser = ExpressionParser {
        lexer,
        terms: Vec::new(),
        depth: 0,
        max_depth,
    };
    let operand = parser.ternary()?;

    let mut terms = parser.terms;
    if terms.len() == 1 {
        if let Some(single) = terms.pop() {
            return Ok(single);
        }
    }
    Ok(Value::new(ValueKind::Expression(terms), operand.text, position))
}

impl ExpressionParser<'_, '_> {
    fn enter(&mut self, position: &Position) -> Result<()> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(Error::syntax(
                position.clone(),
                format!("expression nested deeper than {} levels", self.max_depth),
            ));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn push_operator(&mut self, op: Operator, position: Position) {
        self.terms
            .push(Value::new(ValueKind::Operator(op), op.symbol(), position));
    }

    fn ternary(&mut self) -> Result<Operand> {
        let condition = self.binary(Operator::OrOr.precedence())?;

        let position = match &self.lexer.peek()?.kind {
            TokenKind::Operator(Operator::Conditional) => self.lexer.next_token()?.position,
            _ => return Ok(condition),
        };

        self.enter(&position)?;
        let branches = self.branches();
        self.leave();
        let (then, otherwise) = branches?;

        self.push_operator(Operator::Conditional, position);
        Ok(Operand::compound(format!(
            "{} ? {} : {}",
            condition.text, then.text, otherwise.text
        )))
    }

    fn branches(&mut self) -> Result<(Operand, Operand)> {
        let then = self.ternary()?;
        self.lexer.expect(&TokenKind::Colon)?;
        let otherwise = self.ternary()?;
        Ok((then, otherwise))
    }

    /// Binary operators at `level` and above, left-associative.
    fn binary(&mut self, level: u8) -> Result<Operand> {
        if level > Operator::Multiply.precedence() {
            return self.unary();
        }

        let mut left = self.binary(level + 1)?;
        loop {
            let op = match &self.lexer.peek()?.kind {
                TokenKind::Operator(op) if op.precedence() == level && !op.is_unary() => *op,
                _ => return Ok(left),
            };
            let position = self.lexer.next_token()?.position;
            let right = self.binary(level + 1)?;
            self.push_operator(op, position);
            left = Operand::compound(format!("{} {} {}", left.text, op.symbol(), right.text));
        }
    }

    fn unary(&mut self) -> Result<Operand> {
        let op = match &self.lexer.peek()?.kind {
            TokenKind::Operator(Operator::Subtract) => Operator::Negate,
            TokenKind::Operator(Operator::Add) => Operator::Plus,
            TokenKind::Operator(Operator::Not) => Operator::Not,
            _ => return self.primary(),
        };
        let position = self.lexer.next_token()?.position;

        self.enter(&position)?;
        let operand = self.unary();
        self.leave();
        let operand = operand?;

        let text = format!("{}{}", op.symbol(), operand.text);
        if operand.foldable && self.fold(op, &text) {
            return Ok(Operand::literal(text));
        }
        self.push_operator(op, position);
        Ok(Operand::compound(text))
    }

    /// Apply `op` to the literal on top of the term list in place.
    fn fold(&mut self, op: Operator, text: &str) -> bool {
        let last = match self.terms.last_mut() {
            Some(last) => last,
            None => return false,
        };
        let folded = match (op, last.kind()) {
            (Operator::Negate, ValueKind::Integer(v)) => ValueKind::Integer(-v),
            (Operator::Negate, ValueKind::Float(f)) => ValueKind::Float(-f),
            (Operator::Plus, ValueKind::Integer(v)) => ValueKind::Integer(*v),
            (Operator::Plus, ValueKind::Float(f)) => ValueKind::Float(*f),
            (Operator::Not, ValueKind::True) => ValueKind::False,
            (Operator::Not, ValueKind::False) => ValueKind::True,
            _ => return false,
        };
        last.set_kind(folded);
        last.set_text(text.to_string());
        true
    }

    fn primary(&mut self) -> Result<Operand> {
        let token = self.lexer.next_token()?;
        match token.kind {
            TokenKind::Literal(value) => {
                let text = value.text().to_string();
                self.terms.push(value);
                Ok(Operand::literal(text))
            }
            TokenKind::Identifier(name) => {
                self.terms.push(Value::new(
                    ValueKind::Identifier(name.clone()),
                    name.as_str(),
                    token.position,
                ));
                Ok(Operand::compound(name))
            }
            TokenKind::LParen => {
                self.enter(&token.position)?;
                let inner = self.ternary();
                self.leave();
                let inner = inner?;
                self.lexer.expect(&TokenKind::RParen)?;
                Ok(Operand::compound(format!("({})", inner.text)))
            }
            other => Err(Error::syntax(
                token.position,
                format!("expected a value, found {}", other),
            )),
        }
    }
}
