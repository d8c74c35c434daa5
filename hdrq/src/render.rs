//! Text renderings of a result table.

use std::fmt;
use std::str::FromStr;

use serde_json::{Map, Value};

use crate::aggregate::{ColumnType, ResultTable};
use crate::{Error, Result};

/// Identity column headings.
pub const SOURCE_COLUMN: &str = "Filename";
pub const EXTENSION_COLUMN: &str = "Ext";

/// Output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Aligned columns under a dashed rule
    #[default]
    Table,
    /// Tab-separated values, one row per line
    Tsv,
    /// JSON array of row objects; masked cells are null
    Json,
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "tsv" => Ok(Self::Tsv),
            "json" => Ok(Self::Json),
            other => Err(Error::Config(format!(
                "unknown output format '{}' (expected table, tsv or json)",
                other
            ))),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Table => write!(f, "table"),
            Self::Tsv => write!(f, "tsv"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Rendering options.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Shown for masked cells in table and tsv output
    pub placeholder: String,
    /// Emit the column header line (table and tsv)
    pub header: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            placeholder: "--".to_string(),
            header: true,
        }
    }
}

/// Render `table` in `format`. The result ends with a newline unless empty.
pub fn render(table: &ResultTable, format: OutputFormat, opts: &RenderOptions) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(render_table(table, opts)),
        OutputFormat::Tsv => Ok(render_tsv(table, opts)),
        OutputFormat::Json => render_json(table),
    }
}

/// Cell text for every row, identity columns first.
fn text_grid(table: &ResultTable, placeholder: &str) -> Vec<Vec<String>> {
    table
        .rows()
        .iter()
        .map(|row| {
            let mut line = Vec::with_capacity(table.columns().len() + 2);
            line.push(row.source().to_string());
            line.push(row.extension().to_string());
            for idx in 0..table.columns().len() {
                line.push(match row.cell(idx) {
                    Some(value) => value.to_text(),
                    None => placeholder.to_string(),
                });
            }
            line
        })
        .collect()
}

fn headings(table: &ResultTable) -> Vec<String> {
    let mut names = vec![SOURCE_COLUMN.to_string(), EXTENSION_COLUMN.to_string()];
    names.extend(table.columns().iter().map(|c| c.name.clone()));
    names
}

fn render_table(table: &ResultTable, opts: &RenderOptions) -> String {
    let headings = headings(table);
    let grid = text_grid(table, &opts.placeholder);

    let mut widths: Vec<usize> = headings.iter().map(|h| h.chars().count()).collect();
    for line in &grid {
        for (w, cell) in widths.iter_mut().zip(line) {
            *w = (*w).max(cell.chars().count());
        }
    }

    // Numbers right-aligned: the extension column and Float columns
    let right: Vec<bool> = [false, true]
        .into_iter()
        .chain(table.columns().iter().map(|c| c.kind == ColumnType::Float))
        .collect();

    let format_line = |cells: &[String]| -> String {
        let parts: Vec<String> = cells
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                if right[i] {
                    format!("{:>width$}", cell, width = widths[i])
                } else {
                    format!("{:<width$}", cell, width = widths[i])
                }
            })
            .collect();
        parts.join(" ").trim_end().to_string()
    };

    let mut out = String::new();
    if opts.header {
        out.push_str(&format_line(&headings));
        out.push('\n');
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        out.push_str(&rule.join(" "));
        out.push('\n');
    }
    for line in &grid {
        out.push_str(&format_line(line));
        out.push('\n');
    }
    out
}

fn render_tsv(table: &ResultTable, opts: &RenderOptions) -> String {
    let mut out = String::new();
    if opts.header {
        out.push_str(&headings(table).join("\t"));
        out.push('\n');
    }
    for line in text_grid(table, &opts.placeholder) {
        out.push_str(&line.join("\t"));
        out.push('\n');
    }
    out
}

fn render_json(table: &ResultTable) -> Result<String> {
    let mut rows = Vec::with_capacity(table.len());
    for row in table.rows() {
        let mut obj = Map::new();
        obj.insert(SOURCE_COLUMN.to_string(), Value::from(row.source()));
        obj.insert(EXTENSION_COLUMN.to_string(), Value::from(row.extension()));
        for (idx, column) in table.columns().iter().enumerate() {
            let value = match row.cell(idx) {
                Some(literal) => serde_json::to_value(literal)?,
                None => Value::Null,
            };
            obj.insert(column.name.clone(), value);
        }
        rows.push(Value::Object(obj));
    }

    let mut out = serde_json::to_string_pretty(&rows)?;
    out.push('\n');
    Ok(out)
}
