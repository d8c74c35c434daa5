//! Expression syntax errors.

/// A malformed predicate. Offsets are byte positions in the input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("empty expression")]
    Empty,

    #[error("unexpected character '{ch}' at offset {pos}")]
    UnexpectedChar { ch: char, pos: usize },

    #[error("unknown operator '{op}' at offset {pos}")]
    UnknownOperator { op: String, pos: usize },

    #[error("unterminated string literal starting at offset {pos}")]
    UnterminatedString { pos: usize },

    #[error("invalid keyword '{word}' at offset {pos}")]
    InvalidKeyword { word: String, pos: usize },

    #[error("invalid value '{word}' at offset {pos} (text values must be quoted)")]
    InvalidValue { word: String, pos: usize },

    #[error("unbalanced parenthesis at offset {pos}")]
    UnbalancedParen { pos: usize },

    #[error("expected {expected} at offset {pos}, found '{found}'")]
    Unexpected {
        expected: &'static str,
        found: String,
        pos: usize,
    },

    #[error("expected {expected} at end of expression")]
    UnexpectedEnd { expected: &'static str },
}
