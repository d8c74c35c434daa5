//! Expression tree.

use std::fmt;

use crate::value::{format_float, Literal};

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// `=` equals (numeric or textual)
    Eq,
    /// `<` less than
    Lt,
    /// `<=` less or equal
    Lte,
    /// `>` greater than
    Gt,
    /// `>=` greater or equal
    Gte,
}

impl CompareOp {
    /// Look up an operator by its source text.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "=" => Some(CompareOp::Eq),
            "<" => Some(CompareOp::Lt),
            "<=" => Some(CompareOp::Lte),
            ">" => Some(CompareOp::Gt),
            ">=" => Some(CompareOp::Gte),
            _ => None,
        }
    }

    /// True for `<`, `<=`, `>` and `>=`.
    pub fn is_ordering(self) -> bool {
        !matches!(self, CompareOp::Eq)
    }
}

/// Boolean connectives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolOp {
    And,
    Or,
}

/// `keyword <op> literal`
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub keyword: String,
    pub op: CompareOp,
    pub literal: Literal,
}

/// A parsed predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Comparison(Comparison),
    Boolean {
        op: BoolOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

impl Expr {
    pub fn compare(keyword: impl Into<String>, op: CompareOp, literal: impl Into<Literal>) -> Self {
        Expr::Comparison(Comparison {
            keyword: keyword.into(),
            op,
            literal: literal.into(),
        })
    }

    pub fn and(left: Expr, right: Expr) -> Self {
        Expr::Boolean {
            op: BoolOp::And,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn or(left: Expr, right: Expr) -> Self {
        Expr::Boolean {
            op: BoolOp::Or,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Keywords referenced by this expression, in first-use order.
    pub fn keywords(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_keywords(&mut out);
        out
    }

    fn collect_keywords<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Expr::Comparison(c) => {
                if !out.contains(&c.keyword.as_str()) {
                    out.push(&c.keyword);
                }
            }
            Expr::Boolean { left, right, .. } => {
                left.collect_keywords(out);
                right.collect_keywords(out);
            }
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompareOp::Eq => write!(f, "="),
            CompareOp::Lt => write!(f, "<"),
            CompareOp::Lte => write!(f, "<="),
            CompareOp::Gt => write!(f, ">"),
            CompareOp::Gte => write!(f, ">="),
        }
    }
}

impl fmt::Display for BoolOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoolOp::And => write!(f, "AND"),
            BoolOp::Or => write!(f, "OR"),
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ", self.keyword, self.op)?;
        match &self.literal {
            Literal::Float(v) => write!(f, "{}", format_float(*v)),
            // No escapes in the grammar: pick the quote the text doesn't use
            Literal::Text(s) if s.contains('\'') => write!(f, "\"{}\"", s),
            Literal::Text(s) => write!(f, "'{}'", s),
        }
    }
}

/// Canonical form: every boolean node parenthesized.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Comparison(c) => write!(f, "{}", c),
            Expr::Boolean { op, left, right } => write!(f, "({} {} {})", left, op, right),
        }
    }
}
