//! Header values.

use std::fmt;

use serde::{Serialize, Serializer};

/// A typed header value or expression literal.
///
/// Headers only distinguish numbers from text. Integers, reals and
/// exponent-free decimals all become `Float`.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Float(f64),
    Text(String),
}

impl Literal {
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Literal::Float(v) => Some(*v),
            Literal::Text(_) => None,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Literal::Text(_))
    }

    /// Textual form used for text comparisons and text columns.
    pub fn to_text(&self) -> String {
        match self {
            Literal::Float(v) => format_float(*v),
            Literal::Text(s) => s.clone(),
        }
    }
}

impl From<f64> for Literal {
    fn from(value: f64) -> Self {
        Literal::Float(value)
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Literal::Text(value.to_string())
    }
}

impl From<String> for Literal {
    fn from(value: String) -> Self {
        Literal::Text(value)
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Float(v) => f.write_str(&format_float(*v)),
            Literal::Text(s) => f.write_str(s),
        }
    }
}

impl Serialize for Literal {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Literal::Float(v) if v.is_finite() => serializer.serialize_f64(*v),
            Literal::Float(v) => serializer.serialize_str(&format_float(*v)),
            Literal::Text(s) => serializer.serialize_str(s),
        }
    }
}

/// Print a float the way numeric header values read back: plain decimal
/// digits (never an exponent), integral values keep a trailing `.0`.
pub fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{}.0", value)
    } else {
        format!("{}", value)
    }
}
