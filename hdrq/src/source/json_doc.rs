//! JSON header documents.

use serde_json::{Map, Value};

use crate::store::Header;
use crate::value::Literal;

/// A top-level object is a single header; an array holds one header per
/// extension.
pub(super) fn parse(contents: &str) -> Result<Vec<Header>, String> {
    let value: Value = serde_json::from_str(contents).map_err(|e| format!("invalid JSON: {}", e))?;

    match value {
        Value::Object(map) => Ok(vec![header(map)?]),
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| match item {
                Value::Object(map) => header(map),
                _ => Err(format!("extension {} is not an object", i)),
            })
            .collect(),
        _ => Err("expected an object or an array of objects".to_string()),
    }
}

fn header(map: Map<String, Value>) -> Result<Header, String> {
    let mut header = Header::new();
    for (key, value) in map {
        match value {
            Value::Array(items) => {
                for item in items {
                    if let Some(literal) = scalar(&key, item)? {
                        header.push(key.clone(), literal);
                    }
                }
            }
            value => {
                if let Some(literal) = scalar(&key, value)? {
                    header.push(key, literal);
                }
            }
        }
    }
    Ok(header)
}

fn scalar(key: &str, value: Value) -> Result<Option<Literal>, String> {
    match value {
        Value::Null => Ok(None),
        Value::Bool(b) => Ok(Some(Literal::from(if b { "T" } else { "F" }))),
        Value::Number(n) => n
            .as_f64()
            .map(|v| Some(Literal::Float(v)))
            .ok_or_else(|| format!("{}: number out of range", key)),
        Value::String(s) => Ok(Some(Literal::Text(s))),
        Value::Array(_) | Value::Object(_) => Err(format!("{}: nested values are not supported", key)),
    }
}
