//! Expression evaluation against an attribute store.

use crate::store::AttributeStore;
use crate::value::Literal;

use super::ast::{BoolOp, CompareOp, Comparison, Expr};

/// Evaluate `expr` against one header.
///
/// Total: missing keywords and type mismatches make the comparison false
/// instead of failing.
pub fn evaluate<S: AttributeStore + ?Sized>(expr: &Expr, store: &S) -> bool {
    match expr {
        Expr::Comparison(cmp) => compare(cmp, store),
        Expr::Boolean { op, left, right } => {
            let lhs = evaluate(left, store);
            let rhs = evaluate(right, store);
            match op {
                BoolOp::And => lhs && rhs,
                BoolOp::Or => lhs || rhs,
            }
        }
    }
}

impl Expr {
    /// See [`evaluate`].
    pub fn evaluate<S: AttributeStore + ?Sized>(&self, store: &S) -> bool {
        evaluate(self, store)
    }
}

fn compare<S: AttributeStore + ?Sized>(cmp: &Comparison, store: &S) -> bool {
    let Some(value) = store.get(&cmp.keyword) else {
        return false;
    };

    if !cmp.op.is_ordering() {
        return match (&value, &cmp.literal) {
            (Literal::Float(a), Literal::Float(b)) => a == b,
            // Either side textual: compare printed forms
            _ => value.to_text() == cmp.literal.to_text(),
        };
    }

    // Ordering is only defined between numbers
    let (Some(lhs), Some(rhs)) = (value.as_float(), cmp.literal.as_float()) else {
        return false;
    };
    match cmp.op {
        CompareOp::Lt => lhs < rhs,
        CompareOp::Lte => lhs <= rhs,
        CompareOp::Gt => lhs > rhs,
        CompareOp::Gte => lhs >= rhs,
        CompareOp::Eq => lhs == rhs,
    }
}
