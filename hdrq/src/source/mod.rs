//! Header sources.
//!
//! A source is a file holding the headers of one data product, one header
//! per extension. Sources are read as *header documents*: plain key/value
//! files, chosen by file extension.
//!
//! ```json
//! [
//!   {"SIMPLE": true, "NAXIS": 0, "FILENAME": "iczgs3y5q_flt.fits"},
//!   {"XTENSION": "IMAGE", "BUNIT": "ELECTRONS", "EXPTIME": 652.937744}
//! ]
//! ```
//!
//! ```toml
//! [[extension]]
//! NAXIS = 0
//! COMMENT = ["free text", "more free text"]
//!
//! [[extension]]
//! BUNIT = "ELECTRONS"
//! ```
//!
//! Numbers become `Float`, strings `Text`, booleans `T`/`F`. An array
//! value repeats the card once per element. Nulls are dropped.

mod discover;
mod json_doc;
mod toml_doc;

use std::path::Path;

use crate::store::Header;
use crate::{Error, Result};

pub use discover::expand_sources;

/// Reads every extension header of a source.
pub trait HeaderReader: Send + Sync {
    fn read(&self, path: &Path) -> Result<Vec<Header>>;
}

/// Supported header document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Toml,
}

impl DocumentFormat {
    /// Pick a format from the file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(Self::Json),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }

    /// Decode a document into its extension headers.
    pub fn parse(self, source_id: &str, contents: &str) -> Result<Vec<Header>> {
        let parsed = match self {
            Self::Json => json_doc::parse(contents),
            Self::Toml => toml_doc::parse(contents),
        };
        parsed.map_err(|reason| Error::unavailable(source_id, reason))
    }
}

/// [`HeaderReader`] for JSON and TOML header documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentReader;

impl HeaderReader for DocumentReader {
    fn read(&self, path: &Path) -> Result<Vec<Header>> {
        let source_id = path.display().to_string();
        let format = DocumentFormat::from_path(path)
            .ok_or_else(|| Error::unavailable(&source_id, "unsupported file type"))?;
        let contents =
            std::fs::read_to_string(path).map_err(|e| Error::unavailable(&source_id, e))?;
        format.parse(&source_id, &contents)
    }
}
