//! Keyword and extension selection.

use std::str::FromStr;

use crate::store::AttributeStore;
use crate::value::Literal;
use crate::wildcard::{is_pattern, WildcardMatcher};
use crate::{Error, Result};

/// The requested keywords, in request order.
///
/// Parsed from a comma-separated list such as `"DATE-OBS, NAXIS*"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordSelection {
    keywords: Vec<String>,
}

impl KeywordSelection {
    pub fn parse(input: &str) -> Result<Self> {
        let keywords: Vec<String> = input
            .split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string)
            .collect();

        if keywords.is_empty() {
            return Err(Error::InvalidKeywords(format!(
                "no keywords in '{}'",
                input
            )));
        }

        Ok(Self { keywords })
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Pull the requested keys out of `store`.
    ///
    /// Plain keywords are looked up exactly; wildcard keywords go through
    /// `matcher`. A key matched by several requests appears once.
    pub fn extract<S: AttributeStore + ?Sized>(
        &self,
        store: &S,
        matcher: &WildcardMatcher,
    ) -> Vec<(String, Literal)> {
        let mut selected: Vec<(String, Literal)> = Vec::new();
        let mut push = |key: &str, value: Literal| {
            if !selected.iter().any(|(k, _)| k == key) {
                selected.push((key.to_string(), value));
            }
        };

        for keyword in &self.keywords {
            if is_pattern(keyword) {
                let keys = store.keys();
                for key in matcher.match_keys(keyword, keys.iter().copied()) {
                    if let Some(value) = store.get(key) {
                        push(key, value);
                    }
                }
            } else if let Some(value) = store.get(keyword) {
                push(keyword, value);
            }
        }

        selected
    }

    /// Column rank: position of the first request that would select `key`.
    ///
    /// Keys no request selects rank last.
    pub fn rank(&self, key: &str) -> usize {
        let lowered = key.to_lowercase();
        self.keywords
            .iter()
            .position(|k| {
                if is_pattern(k) {
                    crate::wildcard::pattern_matches(&k.to_lowercase(), &lowered)
                } else {
                    k == key
                }
            })
            .unwrap_or(self.keywords.len())
    }
}

impl FromStr for KeywordSelection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Which extensions of each source to visit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ExtensionSelection {
    /// Every extension the source has
    #[default]
    All,
    /// Listed indices, in the order given; out-of-range indices are skipped
    Only(Vec<usize>),
}

impl ExtensionSelection {
    /// Parse `"0,1,2"`. An empty string selects all extensions.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(Self::All);
        }

        let mut indices = Vec::new();
        for part in input.split(',') {
            let part = part.trim();
            let index: usize = part.parse().map_err(|_| {
                Error::InvalidExtension(format!("'{}' is not an extension number", part))
            })?;
            if !indices.contains(&index) {
                indices.push(index);
            }
        }

        Ok(Self::Only(indices))
    }

    /// Indices to visit in a source with `count` extensions.
    pub fn indices(&self, count: usize) -> Vec<usize> {
        match self {
            Self::All => (0..count).collect(),
            Self::Only(indices) => indices.iter().copied().filter(|&i| i < count).collect(),
        }
    }
}

impl From<Vec<usize>> for ExtensionSelection {
    fn from(indices: Vec<usize>) -> Self {
        if indices.is_empty() {
            Self::All
        } else {
            Self::Only(indices)
        }
    }
}

impl FromStr for ExtensionSelection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
