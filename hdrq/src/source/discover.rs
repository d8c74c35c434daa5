//! Source discovery.
//!
//! Each source argument may hold several comma-separated entries. An entry
//! is one of:
//!
//! - a plain path, kept as-is (even if missing, so the failure is reported
//!   per source later)
//! - a glob over file names (`data/icz*_flt.json`), expanded against the
//!   directory part; wildcards are allowed in the last component only
//! - `@list.txt`, a file with one entry per line (`#` starts a comment)

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::{Error, Result};

/// Nested `@list` files deeper than this are rejected.
const MAX_LIST_DEPTH: usize = 8;

/// Expand source arguments into a de-duplicated list of paths.
///
/// Paths keep the order in which they were first named; glob matches
/// within one entry are sorted by name.
pub fn expand_sources<S: AsRef<str>>(specs: &[S]) -> Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    for spec in specs {
        expand_spec(spec.as_ref(), 0, &mut out)?;
    }

    let mut unique: Vec<PathBuf> = Vec::with_capacity(out.len());
    for path in out {
        if !unique.contains(&path) {
            unique.push(path);
        }
    }
    Ok(unique)
}

fn expand_spec(spec: &str, depth: usize, out: &mut Vec<PathBuf>) -> Result<()> {
    for entry in spec.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        if let Some(list) = entry.strip_prefix('@') {
            expand_list(Path::new(list), depth, out)?;
        } else if is_glob(entry) {
            out.extend(expand_glob(entry)?);
        } else {
            out.push(PathBuf::from(entry));
        }
    }
    Ok(())
}

fn expand_list(list: &Path, depth: usize, out: &mut Vec<PathBuf>) -> Result<()> {
    if depth >= MAX_LIST_DEPTH {
        return Err(Error::InvalidPath(list.to_path_buf()));
    }

    let contents = std::fs::read_to_string(list)?;
    for line in contents.lines() {
        let line = line.split('#').next().unwrap_or("").trim();
        if !line.is_empty() {
            expand_spec(line, depth + 1, out)?;
        }
    }
    Ok(())
}

fn is_glob(entry: &str) -> bool {
    entry.contains(['*', '?', '['])
}

fn expand_glob(pattern: &str) -> Result<Vec<PathBuf>> {
    let path = Path::new(pattern);
    let name_pattern = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| Error::InvalidPath(path.to_path_buf()))?;
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty());

    if dir.is_some_and(|d| is_glob(&d.to_string_lossy())) {
        return Err(Error::InvalidPath(path.to_path_buf()));
    }

    // A missing directory matches nothing, like a glob with no hits
    let read_dir = match std::fs::read_dir(dir.unwrap_or_else(|| Path::new("."))) {
        Ok(read_dir) => read_dir,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!(pattern, "glob directory does not exist");
            return Ok(Vec::new());
        }
        Err(e) => return Err(e.into()),
    };
    let mut matches = Vec::new();
    for entry in read_dir {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            continue;
        };
        if glob_match::glob_match(name_pattern, name) {
            matches.push(match dir {
                Some(d) => d.join(name),
                None => PathBuf::from(name),
            });
        }
    }

    matches.sort();
    Ok(matches)
}
