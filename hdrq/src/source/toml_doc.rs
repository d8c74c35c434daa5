//! TOML header documents.

use toml::{Table, Value};

use crate::store::Header;
use crate::value::Literal;

const EXTENSION_KEY: &str = "extension";

/// Top-level keys form a single header; an `[[extension]]` array of tables
/// holds one header per extension.
pub(super) fn parse(contents: &str) -> Result<Vec<Header>, String> {
    let mut table: Table = toml::from_str(contents).map_err(|e| format!("invalid TOML: {}", e))?;

    match table.remove(EXTENSION_KEY) {
        Some(Value::Array(items)) => {
            if let Some(key) = table.keys().next() {
                return Err(format!("top-level key '{}' alongside [[extension]]", key));
            }
            items
                .into_iter()
                .enumerate()
                .map(|(i, item)| match item {
                    Value::Table(t) => header(t),
                    _ => Err(format!("extension {} is not a table", i)),
                })
                .collect()
        }
        Some(_) => Err(format!("'{}' must be an array of tables", EXTENSION_KEY)),
        None => Ok(vec![header(table)?]),
    }
}

fn header(table: Table) -> Result<Header, String> {
    let mut header = Header::new();
    for (key, value) in table {
        match value {
            Value::Array(items) => {
                for item in items {
                    header.push(key.clone(), scalar(&key, item)?);
                }
            }
            value => {
                let literal = scalar(&key, value)?;
                header.push(key, literal);
            }
        }
    }
    Ok(header)
}

fn scalar(key: &str, value: Value) -> Result<Literal, String> {
    match value {
        Value::String(s) => Ok(Literal::Text(s)),
        Value::Integer(i) => Ok(Literal::Float(i as f64)),
        Value::Float(f) => Ok(Literal::Float(f)),
        Value::Boolean(b) => Ok(Literal::from(if b { "T" } else { "F" })),
        Value::Datetime(dt) => Ok(Literal::Text(dt.to_string())),
        Value::Array(_) | Value::Table(_) => Err(format!("{}: nested values are not supported", key)),
    }
}
