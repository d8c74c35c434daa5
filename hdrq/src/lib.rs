//! hdrq: header keyword selection and predicate queries
//!
//! Selects keyword values from the extension headers of a set of data
//! products, keeping only the extensions that satisfy a predicate, and
//! lays the result out as a sparse table.

pub mod aggregate;
pub mod config;
pub mod error;
pub mod expr;
pub mod query;
pub mod render;
pub mod select;
pub mod source;
pub mod store;
pub mod value;
pub mod wildcard;

pub use aggregate::{Column, ColumnType, ResultAggregator, ResultTable, Row, RowKey};
pub use config::Config;
pub use error::{Error, Result};
pub use expr::{evaluate, parse, CompareOp, Expr, ParseError};
pub use query::{ExtensionKeys, SelectOutcome, SelectRequest, Selector, SkippedSource};
pub use render::{render, OutputFormat, RenderOptions};
pub use select::{ExtensionSelection, KeywordSelection};
pub use source::{expand_sources, DocumentReader, HeaderReader};
pub use store::{AttributeStore, Header};
pub use value::Literal;
pub use wildcard::{match_keys, WildcardMatcher};
