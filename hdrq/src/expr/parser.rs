//! Recursive-descent parser for predicate expressions.
//!
//! ```text
//! expr       := or_expr
//! or_expr    := and_expr (OR and_expr)*
//! and_expr   := comparison (AND comparison)*
//! comparison := '(' expr ')' | keyword operator value
//! ```

use crate::value::Literal;

use super::ast::{BoolOp, Comparison, Expr};
use super::error::ParseError;
use super::lexer::{tokenize, Token, TokenKind};

/// Parse a predicate string into an expression tree.
///
/// The whole input must be consumed; anything left over after a complete
/// expression is an error.
pub fn parse(input: &str) -> Result<Expr, ParseError> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(ParseError::Empty);
    }

    let mut parser = Parser { tokens: &tokens, pos: 0 };
    let expr = parser.parse_or()?;

    match parser.peek() {
        None => Ok(expr),
        Some(Token { kind: TokenKind::RParen, pos }) => Err(ParseError::UnbalancedParen { pos: *pos }),
        Some(token) => Err(ParseError::Unexpected {
            expected: "AND, OR or end of expression",
            found: token.kind.to_string(),
            pos: token.pos,
        }),
    }
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(token)
    }

    /// Consume the next token if it is the given connective.
    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.peek().is_some_and(|t| &t.kind == kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn parse_or(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_and()?;
        while self.eat(&TokenKind::Or) {
            let right = self.parse_and()?;
            left = Expr::Boolean {
                op: BoolOp::Or,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_primary()?;
        while self.eat(&TokenKind::And) {
            let right = self.parse_primary()?;
            left = Expr::Boolean {
                op: BoolOp::And,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let token = self.next().ok_or(ParseError::UnexpectedEnd {
            expected: "keyword or '('",
        })?;

        match &token.kind {
            TokenKind::LParen => {
                let inner = self.parse_or()?;
                match self.next() {
                    Some(Token { kind: TokenKind::RParen, .. }) => Ok(inner),
                    None => Err(ParseError::UnbalancedParen { pos: token.pos }),
                    Some(other) => Err(ParseError::Unexpected {
                        expected: "')'",
                        found: other.kind.to_string(),
                        pos: other.pos,
                    }),
                }
            }
            TokenKind::RParen => Err(ParseError::UnbalancedParen { pos: token.pos }),
            TokenKind::Word(word) => self.parse_comparison(word, token.pos),
            other => Err(ParseError::Unexpected {
                expected: "keyword or '('",
                found: other.to_string(),
                pos: token.pos,
            }),
        }
    }

    fn parse_comparison(&mut self, keyword: &str, keyword_pos: usize) -> Result<Expr, ParseError> {
        if !is_keyword(keyword) {
            return Err(ParseError::InvalidKeyword {
                word: keyword.to_string(),
                pos: keyword_pos,
            });
        }

        let op = match self.next() {
            Some(Token { kind: TokenKind::Op(op), .. }) => *op,
            Some(other) => {
                return Err(ParseError::Unexpected {
                    expected: "comparison operator",
                    found: other.kind.to_string(),
                    pos: other.pos,
                })
            }
            None => return Err(ParseError::UnexpectedEnd { expected: "comparison operator" }),
        };

        let literal = match self.next() {
            Some(Token { kind: TokenKind::Str(s), .. }) => Literal::Text(s.clone()),
            Some(Token { kind: TokenKind::Word(w), pos }) => {
                let value = parse_number(w).ok_or_else(|| ParseError::InvalidValue {
                    word: w.clone(),
                    pos: *pos,
                })?;
                Literal::Float(value)
            }
            Some(other) => {
                return Err(ParseError::Unexpected {
                    expected: "value",
                    found: other.kind.to_string(),
                    pos: other.pos,
                })
            }
            None => return Err(ParseError::UnexpectedEnd { expected: "value" }),
        };

        Ok(Expr::Comparison(Comparison {
            keyword: keyword.to_string(),
            op,
            literal,
        }))
    }
}

/// `[A-Za-z0-9_-]+`
fn is_keyword(word: &str) -> bool {
    !word.is_empty()
        && word
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Integer or decimal with an optional sign. No exponents, no `inf`/`nan`.
fn parse_number(word: &str) -> Option<f64> {
    let digits = word.strip_prefix(['+', '-']).unwrap_or(word);

    let mut seen_digit = false;
    let mut seen_dot = false;
    for c in digits.chars() {
        match c {
            '0'..='9' => seen_digit = true,
            '.' if !seen_dot => seen_dot = true,
            _ => return None,
        }
    }
    if !seen_digit {
        return None;
    }

    word.parse().ok()
}
