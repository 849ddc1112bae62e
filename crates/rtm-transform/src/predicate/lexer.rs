//! Tokenizer for row predicates.

use super::ast::CompareOp;
use super::error::{PredicateError, PredicateResult};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TokenKind {
    LParen,
    RParen,
    And,
    Or,
    Not,
    Compare(CompareOp),
    Exists,
    Str(String),
    Number(f64),
    True,
    False,
    Null,
    Ident(String),
}

impl TokenKind {
    pub(crate) fn describe(&self) -> String {
        match self {
            Self::LParen => "(".to_string(),
            Self::RParen => ")".to_string(),
            Self::And => "and".to_string(),
            Self::Or => "or".to_string(),
            Self::Not => "not".to_string(),
            Self::Compare(op) => op.symbol().to_string(),
            Self::Exists => "exists".to_string(),
            Self::Str(text) => format!("\"{text}\""),
            Self::Number(n) => n.to_string(),
            Self::True => "true".to_string(),
            Self::False => "false".to_string(),
            Self::Null => "null".to_string(),
            Self::Ident(name) => name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    pub position: usize,
}

pub(crate) struct Lexer<'a> {
    input: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
}

impl<'a> Lexer<'a> {
    pub(crate) fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
        }
    }

    pub(crate) fn tokenize(mut self) -> PredicateResult<Vec<Token>> {
        let mut tokens = Vec::new();
        while let Some(&(position, ch)) = self.chars.peek() {
            if ch.is_whitespace() {
                self.chars.next();
                continue;
            }
            let kind = match ch {
                '(' => self.single(TokenKind::LParen),
                ')' => self.single(TokenKind::RParen),
                '&' => self.pair('&', TokenKind::And, position)?,
                '|' => self.pair('|', TokenKind::Or, position)?,
                '=' => self.pair('=', TokenKind::Compare(CompareOp::Eq), position)?,
                '!' => {
                    self.chars.next();
                    if self.eat('=') {
                        TokenKind::Compare(CompareOp::Ne)
                    } else {
                        TokenKind::Not
                    }
                }
                '<' => {
                    self.chars.next();
                    if self.eat('=') {
                        TokenKind::Compare(CompareOp::Le)
                    } else {
                        TokenKind::Compare(CompareOp::Lt)
                    }
                }
                '>' => {
                    self.chars.next();
                    if self.eat('=') {
                        TokenKind::Compare(CompareOp::Ge)
                    } else {
                        TokenKind::Compare(CompareOp::Gt)
                    }
                }
                '"' | '\'' => self.string(ch, position)?,
                '-' | '0'..='9' => self.number(position)?,
                c if is_ident_start(c) => self.word(),
                other => {
                    return Err(PredicateError::UnexpectedChar {
                        ch: other,
                        position,
                    });
                }
            };
            tokens.push(Token { kind, position });
        }
        Ok(tokens)
    }

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.chars.next();
        kind
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.chars.peek().is_some_and(|&(_, c)| c == expected) {
            self.chars.next();
            true
        } else {
            false
        }
    }

    fn pair(&mut self, ch: char, kind: TokenKind, position: usize) -> PredicateResult<TokenKind> {
        self.chars.next();
        if self.eat(ch) {
            Ok(kind)
        } else {
            Err(PredicateError::UnexpectedChar { ch, position })
        }
    }

    fn string(&mut self, quote: char, position: usize) -> PredicateResult<TokenKind> {
        self.chars.next();
        let mut text = String::new();
        loop {
            match self.chars.next() {
                None => return Err(PredicateError::UnterminatedString { position }),
                Some((_, c)) if c == quote => return Ok(TokenKind::Str(text)),
                Some((_, '\\')) => match self.chars.next() {
                    Some((_, escaped)) => text.push(escaped),
                    None => return Err(PredicateError::UnterminatedString { position }),
                },
                Some((_, c)) => text.push(c),
            }
        }
    }

    fn number(&mut self, position: usize) -> PredicateResult<TokenKind> {
        let mut end = position;
        if let Some(&(i, '-')) = self.chars.peek() {
            end = i + 1;
            self.chars.next();
        }
        while let Some(&(i, c)) = self.chars.peek() {
            if c.is_ascii_digit() || c == '.' {
                end = i + c.len_utf8();
                self.chars.next();
            } else {
                break;
            }
        }
        let text = &self.input[position..end];
        text.parse::<f64>()
            .map(TokenKind::Number)
            .map_err(|_| PredicateError::InvalidNumber {
                text: text.to_string(),
                position,
            })
    }

    fn word(&mut self) -> TokenKind {
        let mut word = String::new();
        while let Some(&(_, c)) = self.chars.peek() {
            if is_ident_start(c) || c.is_ascii_digit() || c == '.' {
                word.push(c);
                self.chars.next();
            } else {
                break;
            }
        }
        match word.as_str() {
            "and" => TokenKind::And,
            "or" => TokenKind::Or,
            "not" => TokenKind::Not,
            "contains" => TokenKind::Compare(CompareOp::Contains),
            "exists" => TokenKind::Exists,
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "null" => TokenKind::Null,
            _ => TokenKind::Ident(word),
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        Lexer::new(input)
            .tokenize()
            .expect("tokenize")
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_operators_and_words() {
        assert_eq!(
            kinds("row.a >= -2 && not list contains 'x'"),
            vec![
                TokenKind::Ident("row.a".to_string()),
                TokenKind::Compare(CompareOp::Ge),
                TokenKind::Number(-2.0),
                TokenKind::And,
                TokenKind::Not,
                TokenKind::Ident("list".to_string()),
                TokenKind::Compare(CompareOp::Contains),
                TokenKind::Str("x".to_string()),
            ]
        );
    }

    #[test]
    fn test_escaped_quotes() {
        assert_eq!(kinds(r#""say \"hi\"""#), vec![TokenKind::Str("say \"hi\"".to_string())]);
    }

    #[test]
    fn test_lexer_errors() {
        assert_eq!(
            Lexer::new("a = 1").tokenize(),
            Err(PredicateError::UnexpectedChar { ch: '=', position: 2 })
        );
        assert_eq!(
            Lexer::new("'open").tokenize(),
            Err(PredicateError::UnterminatedString { position: 0 })
        );
        assert!(matches!(
            Lexer::new("1.2.3").tokenize(),
            Err(PredicateError::InvalidNumber { .. })
        ));
        assert!(matches!(
            Lexer::new("a # b").tokenize(),
            Err(PredicateError::UnexpectedChar { ch: '#', .. })
        ));
    }
}
