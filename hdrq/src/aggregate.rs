//! Sparse result tables.
//!
//! Every header contributes a different set of keywords. The aggregator
//! collects one attribute map per (source, extension) and, once all
//! records are in, lays them out as a rectangular table: one column per
//! keyword seen anywhere, masked cells where a record lacked the keyword.
//!
//! Column types are settled once at finalization. A keyword is numeric
//! only if every value observed for it was numeric; a single text value
//! turns the whole column to text, and the numeric values in it are
//! rendered in their printed form.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::value::{format_float, Literal};
use crate::{Error, Result};

/// Row identity: source identifier and extension index.
///
/// Orders by source text, then numerically by extension.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RowKey {
    pub source: String,
    pub extension: usize,
}

impl RowKey {
    pub fn new(source: impl Into<String>, extension: usize) -> Self {
        Self {
            source: source.into(),
            extension,
        }
    }
}

/// Physical type of a result column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Float,
    Text,
}

impl ColumnType {
    fn of(value: &Literal) -> Self {
        match value {
            Literal::Float(_) => ColumnType::Float,
            Literal::Text(_) => ColumnType::Text,
        }
    }

    /// Text absorbs Float.
    fn merge(self, other: ColumnType) -> ColumnType {
        if self == ColumnType::Text || other == ColumnType::Text {
            ColumnType::Text
        } else {
            ColumnType::Float
        }
    }
}

/// A named, typed column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    pub name: String,
    pub kind: ColumnType,
}

/// One finalized row. `None` cells are masked.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    key: RowKey,
    cells: Vec<Option<Literal>>,
}

impl Row {
    pub fn key(&self) -> &RowKey {
        &self.key
    }

    pub fn source(&self) -> &str {
        &self.key.source
    }

    pub fn extension(&self) -> usize {
        self.key.extension
    }

    pub fn cells(&self) -> &[Option<Literal>] {
        &self.cells
    }

    /// Cell by column index; `None` when masked or out of range.
    pub fn cell(&self, column: usize) -> Option<&Literal> {
        self.cells.get(column).and_then(Option::as_ref)
    }

    pub fn is_masked(&self, column: usize) -> bool {
        self.cell(column).is_none()
    }
}

/// The finalized, immutable result of a query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultTable {
    columns: Vec<Column>,
    rows: Vec<Row>,
}

impl ResultTable {
    /// Data columns (the identity columns are implicit).
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Rows sorted by [`RowKey`].
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Values of one column, top to bottom. `None` when the column does
    /// not exist.
    pub fn column_values(&self, name: &str) -> Option<Vec<Option<&Literal>>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|r| r.cell(idx)).collect())
    }

    pub fn get(&self, row: usize, column: &str) -> Option<&Literal> {
        let idx = self.column_index(column)?;
        self.rows.get(row)?.cell(idx)
    }
}

/// Collects per-record attribute maps and builds a [`ResultTable`].
///
/// Not internally synchronised: concurrent producers share it behind a
/// mutex. Insertion order never matters since rows are sorted once in
/// [`ResultAggregator::finalize`].
#[derive(Debug, Default)]
pub struct ResultAggregator {
    rows: Vec<(RowKey, Vec<(String, Literal)>)>,
    keys: HashSet<RowKey>,
    kinds: HashMap<String, ColumnType>,
}

impl ResultAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows collected so far.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Record the attributes selected from one record.
    ///
    /// An empty attribute map contributes nothing: no all-masked rows.
    /// Returns [`Error::DuplicateRow`] if `key` was already recorded.
    /// A keyword repeated within one call keeps its first value.
    pub fn add_row<I, K, V>(&mut self, key: RowKey, attributes: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Literal>,
    {
        let mut values: Vec<(String, Literal)> = Vec::new();
        for (name, value) in attributes {
            let name = name.into();
            if !values.iter().any(|(n, _)| *n == name) {
                values.push((name, value.into()));
            }
        }

        if values.is_empty() {
            return Ok(());
        }

        if !self.keys.insert(key.clone()) {
            return Err(Error::DuplicateRow {
                source_id: key.source,
                extension: key.extension,
            });
        }

        for (name, value) in &values {
            let kind = ColumnType::of(value);
            self.kinds
                .entry(name.clone())
                .and_modify(|k| *k = k.merge(kind))
                .or_insert(kind);
        }

        self.rows.push((key, values));
        Ok(())
    }

    /// Build the table with columns in name order.
    pub fn finalize(self) -> ResultTable {
        self.finalize_with(|_| 0)
    }

    /// Build the table, ordering columns by `rank` and then by name.
    pub fn finalize_with<F>(self, rank: F) -> ResultTable
    where
        F: Fn(&str) -> usize,
    {
        let mut columns: Vec<Column> = self
            .kinds
            .into_iter()
            .map(|(name, kind)| Column { name, kind })
            .collect();
        columns.sort_by(|a, b| {
            rank(&a.name)
                .cmp(&rank(&b.name))
                .then_with(|| a.name.cmp(&b.name))
        });

        let index: HashMap<&str, usize> = columns
            .iter()
            .enumerate()
            .map(|(i, c)| (c.name.as_str(), i))
            .collect();

        let mut rows: Vec<Row> = self
            .rows
            .into_iter()
            .map(|(key, values)| {
                let mut cells: Vec<Option<Literal>> = vec![None; columns.len()];
                for (name, value) in values {
                    let Some(&idx) = index.get(name.as_str()) else {
                        continue;
                    };
                    let value = match (columns[idx].kind, value) {
                        (ColumnType::Text, Literal::Float(v)) => Literal::Text(format_float(v)),
                        (_, value) => value,
                    };
                    cells[idx] = Some(value);
                }
                Row { key, cells }
            })
            .collect();

        rows.sort_by(|a, b| a.key.cmp(&b.key));

        ResultTable { columns, rows }
    }
}
