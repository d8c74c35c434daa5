//! Tokenizer for predicate expressions.

use std::fmt;

use super::ast::CompareOp;
use super::error::ParseError;

/// Token kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    LParen,
    RParen,
    And,
    Or,
    Op(CompareOp),
    /// Bare word: a keyword or a number, decided by the parser
    Word(String),
    /// Quoted string, quotes stripped
    Str(String),
}

/// A token and its byte offset in the input.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub pos: usize,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::LParen => write!(f, "("),
            TokenKind::RParen => write!(f, ")"),
            TokenKind::And => write!(f, "AND"),
            TokenKind::Or => write!(f, "OR"),
            TokenKind::Op(op) => write!(f, "{}", op),
            TokenKind::Word(w) => write!(f, "{}", w),
            TokenKind::Str(s) => write!(f, "'{}'", s),
        }
    }
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '+')
}

fn is_op_char(c: char) -> bool {
    matches!(c, '=' | '<' | '>' | '!')
}

/// Split an expression into tokens.
pub fn tokenize(input: &str) -> Result<Vec<Token>, ParseError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(pos, c)) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        match c {
            '(' => {
                chars.next();
                tokens.push(Token { kind: TokenKind::LParen, pos });
            }
            ')' => {
                chars.next();
                tokens.push(Token { kind: TokenKind::RParen, pos });
            }
            '\'' | '"' => {
                chars.next();
                let start = pos + 1;
                let mut end = None;
                for (i, ch) in chars.by_ref() {
                    if ch == c {
                        end = Some(i);
                        break;
                    }
                }
                let end = end.ok_or(ParseError::UnterminatedString { pos })?;
                tokens.push(Token {
                    kind: TokenKind::Str(input[start..end].to_string()),
                    pos,
                });
            }
            c if is_op_char(c) => {
                let mut end = pos;
                while let Some(&(i, ch)) = chars.peek() {
                    if !is_op_char(ch) {
                        break;
                    }
                    end = i + ch.len_utf8();
                    chars.next();
                }
                let symbol = &input[pos..end];
                let op = CompareOp::from_symbol(symbol).ok_or_else(|| ParseError::UnknownOperator {
                    op: symbol.to_string(),
                    pos,
                })?;
                tokens.push(Token { kind: TokenKind::Op(op), pos });
            }
            c if is_word_char(c) => {
                let mut end = pos;
                while let Some(&(i, ch)) = chars.peek() {
                    if !is_word_char(ch) {
                        break;
                    }
                    end = i + ch.len_utf8();
                    chars.next();
                }
                let word = &input[pos..end];
                let kind = if word.eq_ignore_ascii_case("and") {
                    TokenKind::And
                } else if word.eq_ignore_ascii_case("or") {
                    TokenKind::Or
                } else {
                    TokenKind::Word(word.to_string())
                };
                tokens.push(Token { kind, pos });
            }
            ch => return Err(ParseError::UnexpectedChar { ch, pos }),
        }
    }

    Ok(tokens)
}
