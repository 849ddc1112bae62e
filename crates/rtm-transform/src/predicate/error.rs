//! Error types for predicate parsing.

use thiserror::Error;

/// Errors raised while parsing a row predicate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredicateError {
    #[error("empty predicate")]
    Empty,

    #[error("unexpected character '{ch}' at position {position}")]
    UnexpectedChar { ch: char, position: usize },

    #[error("unterminated string starting at position {position}")]
    UnterminatedString { position: usize },

    #[error("invalid number '{text}' at position {position}")]
    InvalidNumber { text: String, position: usize },

    #[error("unexpected '{found}' at position {position}, expected {expected}")]
    UnexpectedToken {
        found: String,
        expected: &'static str,
        position: usize,
    },

    #[error("unexpected end of predicate, expected {expected}")]
    UnexpectedEnd { expected: &'static str },

    #[error("predicate nests deeper than {limit} levels")]
    TooDeep { limit: usize },
}

pub type PredicateResult<T> = std::result::Result<T, PredicateError>;
