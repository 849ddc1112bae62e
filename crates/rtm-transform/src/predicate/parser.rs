//! Recursive-descent parser for row predicates.
//!
//! ```text
//! expr       := and_expr (("||" | "or") and_expr)*
//! and_expr   := unary (("&&" | "and") unary)*
//! unary      := ("!" | "not") unary | primary
//! primary    := "(" expr ")" | "exists" "(" operand ")" | operand (op operand)?
//! ```

use serde_json::Value;

use super::ast::{Operand, Predicate, Scope};
use super::error::{PredicateError, PredicateResult};
use super::lexer::{Lexer, Token, TokenKind};

/// Deepest nesting of groups, negations and chained operators accepted.
pub const MAX_DEPTH: usize = 128;

/// Parser entry point.
pub struct PredicateParser {
    tokens: Vec<Token>,
    position: usize,
    depth: usize,
}

impl PredicateParser {
    /// Parse a predicate expression.
    pub fn parse(input: &str) -> PredicateResult<Predicate> {
        let tokens = Lexer::new(input).tokenize()?;
        if tokens.is_empty() {
            return Err(PredicateError::Empty);
        }
        let mut parser = Self {
            tokens,
            position: 0,
            depth: 0,
        };
        let predicate = parser.parse_or()?;
        if let Some(token) = parser.peek() {
            return Err(unexpected(token, "end of predicate"));
        }
        Ok(predicate)
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.position).cloned();
        if token.is_some() {
            self.position += 1;
        }
        token
    }

    fn check(&self, kind: &TokenKind) -> bool {
        self.peek().is_some_and(|t| &t.kind == kind)
    }

    fn expect(&mut self, kind: &TokenKind, expected: &'static str) -> PredicateResult<()> {
        match self.next() {
            Some(token) if &token.kind == kind => Ok(()),
            Some(token) => Err(unexpected(&token, expected)),
            None => Err(PredicateError::UnexpectedEnd { expected }),
        }
    }

    fn enter(&mut self) -> PredicateResult<()> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(PredicateError::TooDeep { limit: MAX_DEPTH });
        }
        Ok(())
    }

    // Each chained operator nests the tree built so far one level deeper.
    fn parse_or(&mut self) -> PredicateResult<Predicate> {
        let depth = self.depth;
        let mut left = self.parse_and()?;
        while self.check(&TokenKind::Or) {
            self.position += 1;
            self.enter()?;
            let right = self.parse_and()?;
            left = Predicate::Or(Box::new(left), Box::new(right));
        }
        self.depth = depth;
        Ok(left)
    }

    fn parse_and(&mut self) -> PredicateResult<Predicate> {
        let depth = self.depth;
        let mut left = self.parse_unary()?;
        while self.check(&TokenKind::And) {
            self.position += 1;
            self.enter()?;
            let right = self.parse_unary()?;
            left = Predicate::And(Box::new(left), Box::new(right));
        }
        self.depth = depth;
        Ok(left)
    }

    fn parse_unary(&mut self) -> PredicateResult<Predicate> {
        if self.check(&TokenKind::Not) {
            self.position += 1;
            self.enter()?;
            let inner = self.parse_unary()?;
            self.depth -= 1;
            return Ok(Predicate::Not(Box::new(inner)));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> PredicateResult<Predicate> {
        if self.check(&TokenKind::LParen) {
            self.position += 1;
            self.enter()?;
            let inner = self.parse_or()?;
            self.expect(&TokenKind::RParen, "')'")?;
            self.depth -= 1;
            return Ok(inner);
        }
        if self.check(&TokenKind::Exists) {
            self.position += 1;
            self.expect(&TokenKind::LParen, "'(' after exists")?;
            let operand = self.parse_operand()?;
            self.expect(&TokenKind::RParen, "')'")?;
            return Ok(Predicate::Exists(operand));
        }

        let left = self.parse_operand()?;
        if let Some(Token {
            kind: TokenKind::Compare(op),
            ..
        }) = self.peek()
        {
            let op = *op;
            self.position += 1;
            let right = self.parse_operand()?;
            return Ok(Predicate::Compare { left, op, right });
        }
        Ok(Predicate::Truthy(left))
    }

    fn parse_operand(&mut self) -> PredicateResult<Operand> {
        const EXPECTED: &str = "a value or path";
        let Some(token) = self.next() else {
            return Err(PredicateError::UnexpectedEnd { expected: EXPECTED });
        };
        let operand = match token.kind {
            TokenKind::Str(text) => Operand::Literal(Value::String(text)),
            TokenKind::Number(n) => Operand::Literal(number_value(n)),
            TokenKind::True => Operand::Literal(Value::Bool(true)),
            TokenKind::False => Operand::Literal(Value::Bool(false)),
            TokenKind::Null => Operand::Literal(Value::Null),
            TokenKind::Ident(name) => path_operand(&name),
            _ => return Err(unexpected(&token, EXPECTED)),
        };
        Ok(operand)
    }
}

fn path_operand(name: &str) -> Operand {
    if name == "list" || name == "listName" {
        return Operand::ListName;
    }
    let scoped = |prefix: &str| -> Option<String> {
        if name == prefix {
            Some(String::new())
        } else {
            name.strip_prefix(prefix)
                .and_then(|rest| rest.strip_prefix('.'))
                .map(str::to_string)
        }
    };
    if let Some(path) = scoped("row") {
        return Operand::Path {
            scope: Scope::Row,
            path,
        };
    }
    if let Some(path) = scoped("data") {
        return Operand::Path {
            scope: Scope::Document,
            path,
        };
    }
    Operand::Path {
        scope: Scope::Row,
        path: name.to_string(),
    }
}

/// Integral literals become JSON integers so they compare equal to
/// integer fields.
fn number_value(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < 9.0e15 {
        Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n).map_or(Value::Null, Value::Number)
    }
}

fn unexpected(token: &Token, expected: &'static str) -> PredicateError {
    PredicateError::UnexpectedToken {
        found: token.kind.describe(),
        expected,
        position: token.position,
    }
}
