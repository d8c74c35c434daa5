//! Keyword wildcard matching.
//!
//! `*` matches any run of characters (including none). Matching ignores
//! case, so `naxis*` finds `NAXIS1` and `NAXIS2`.

use std::collections::BTreeSet;

/// Free-text keys that are never wildcard candidates.
pub const DEFAULT_RESERVED_KEYS: &[&str] = &["COMMENT", "HISTORY"];

/// Matches keyword patterns against the keys of a header.
#[derive(Debug, Clone)]
pub struct WildcardMatcher {
    reserved: Vec<String>,
}

impl Default for WildcardMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_RESERVED_KEYS.iter().copied())
    }
}

impl WildcardMatcher {
    /// Create a matcher that skips the given reserved keys.
    pub fn new<I, S>(reserved: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            reserved: reserved.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_reserved(&self, key: &str) -> bool {
        self.reserved.iter().any(|r| r == key)
    }

    /// Keys matching `pattern`, with reserved keys removed first.
    pub fn match_keys<'k, I>(&self, pattern: &str, keys: I) -> BTreeSet<&'k str>
    where
        I: IntoIterator<Item = &'k str>,
    {
        let pattern = pattern.to_lowercase();
        keys.into_iter()
            .filter(|key| !self.is_reserved(key))
            .filter(|key| pattern_matches(&pattern, &key.to_lowercase()))
            .collect()
    }
}

/// Match `pattern` against `keys` with the default reserved keys.
pub fn match_keys<'k, I>(pattern: &str, keys: I) -> BTreeSet<&'k str>
where
    I: IntoIterator<Item = &'k str>,
{
    WildcardMatcher::default().match_keys(pattern, keys)
}

/// Whether a keyword request contains a wildcard.
pub fn is_pattern(keyword: &str) -> bool {
    keyword.contains('*')
}

/// Case-sensitive glob match where `*` is the only special character.
pub fn pattern_matches(pattern: &str, text: &str) -> bool {
    let parts: Vec<&str> = pattern.split('*').collect();

    if parts.len() == 1 {
        return pattern == text;
    }

    // First part anchors the start
    if !text.starts_with(parts[0]) {
        return false;
    }
    let mut pos = parts[0].len();

    // Middle parts must appear in order
    for part in &parts[1..parts.len() - 1] {
        if part.is_empty() {
            continue;
        }
        match text[pos..].find(part) {
            Some(found) => pos += found + part.len(),
            None => return false,
        }
    }

    // Last part anchors the end
    text[pos..].ends_with(parts[parts.len() - 1])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_excludes_reserved_and_folds_case() {
        let keys = ["FILENAME", "FILETYPE", "COMMENT"];
        let matched = match_keys("FILE*", keys);
        assert_eq!(matched, BTreeSet::from(["FILENAME", "FILETYPE"]));

        let matched = match_keys("file*", keys);
        assert_eq!(matched, BTreeSet::from(["FILENAME", "FILETYPE"]));
    }

    #[test]
    fn test_reserved_excluded_even_when_pattern_names_them() {
        let keys = ["COMMENT", "HISTORY", "NAXIS"];
        assert!(match_keys("*", keys).contains("NAXIS"));
        assert!(!match_keys("*", keys).contains("COMMENT"));
        assert!(match_keys("HIST*", keys).is_empty());
    }

    #[test]
    fn test_custom_reserved_keys() {
        let matcher = WildcardMatcher::new(["CHECKSUM"]);
        let keys = ["CHECKSUM", "COMMENT", "DATASUM"];
        let matched = matcher.match_keys("*SUM", keys);
        assert_eq!(matched, BTreeSet::from(["DATASUM"]));
        assert!(matcher.match_keys("COMM*", keys).contains("COMMENT"));
    }

    #[test]
    fn test_star_matches_empty() {
        let keys = ["NAXIS", "NAXIS1", "NAXIS2", "BITPIX"];
        assert_eq!(
            match_keys("NAXIS*", keys),
            BTreeSet::from(["NAXIS", "NAXIS1", "NAXIS2"])
        );
    }

    #[test]
    fn test_no_wildcard_is_exact() {
        let keys = ["NAXIS", "NAXIS1"];
        assert_eq!(match_keys("naxis", keys), BTreeSet::from(["NAXIS"]));
    }

    #[test]
    fn test_pattern_matches() {
        assert!(pattern_matches("date-*", "date-obs"));
        assert!(pattern_matches("*-obs", "time-obs"));
        assert!(pattern_matches("*xis*", "naxis1"));
        assert!(pattern_matches("n*s*1", "naxis1"));
        assert!(pattern_matches("*", ""));
        assert!(!pattern_matches("a*a", "a"));
        assert!(!pattern_matches("date-*", "time-obs"));
        assert!(!pattern_matches("exact", "not exact"));
    }
}
