//! Predicate expressions over header values.
//!
//! # Syntax Overview
//!
//! - **Comparison**: `KEYWORD <op> value` with `<op>` one of `=`, `<`, `<=`, `>`, `>=`
//! - **Values**: bare numbers (`1014`, `-2.5`) or quoted strings (`'SCI'`, `"ELECTRONS/S"`)
//! - **Connectives**: `AND`, `OR` (any case); `AND` binds tighter than `OR`
//! - **Grouping**: parentheses, nested to any depth
//!
//! ```text
//! BUNIT='ELECTRONS' AND (TIME-OBS < 10 OR TIME-OBS > 100)
//! ```
//!
//! Evaluation never fails: a missing keyword, an ordering comparison against
//! text, or any other type mismatch simply evaluates to `false`.

mod ast;
mod error;
mod eval;
mod lexer;
mod parser;

pub use ast::{BoolOp, CompareOp, Comparison, Expr};
pub use error::ParseError;
pub use eval::evaluate;
pub use parser::parse;
