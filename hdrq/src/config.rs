//! Configuration for hselect.
//!
//! Config file resolution order:
//! 1. Explicit path passed to Config::load_from()
//! 2. HSELECT_CONFIG environment variable
//! 3. Default: <user config dir>/hselect/config.toml
//!
//! A missing file means defaults. Command-line flags override file values.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::wildcard::{WildcardMatcher, DEFAULT_RESERVED_KEYS};
use crate::{Error, Result};

/// hselect configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Text shown in place of masked cells.
    #[serde(default = "default_placeholder")]
    pub placeholder: String,

    /// Worker threads used to scan sources (1 = sequential).
    #[serde(default = "default_jobs")]
    pub jobs: usize,

    /// Keys never returned by wildcard keyword requests.
    #[serde(default = "default_reserved_keys")]
    pub reserved_keys: Vec<String>,

    /// Default output format: table, tsv or json.
    #[serde(default = "default_format")]
    pub format: String,

    /// Print the column header line in table and tsv output.
    #[serde(default = "default_header")]
    pub header: bool,

    /// Log filter used when RUST_LOG is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_placeholder() -> String {
    "--".to_string()
}

fn default_jobs() -> usize {
    1
}

fn default_reserved_keys() -> Vec<String> {
    DEFAULT_RESERVED_KEYS.iter().map(|k| k.to_string()).collect()
}

fn default_format() -> String {
    "table".to_string()
}

fn default_header() -> bool {
    true
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            placeholder: default_placeholder(),
            jobs: default_jobs(),
            reserved_keys: default_reserved_keys(),
            format: default_format(),
            header: default_header(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load config from the default location, or defaults if there is none.
    pub fn load() -> Result<Self> {
        match resolve_config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load config from a specific file; a missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.jobs == 0 {
            return Err(Error::Config("jobs must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Wildcard matcher honouring `reserved_keys`.
    pub fn matcher(&self) -> WildcardMatcher {
        WildcardMatcher::new(self.reserved_keys.iter().cloned())
    }
}

/// Resolve the config file path using the standard resolution order.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("HSELECT_CONFIG") {
        return Some(PathBuf::from(path));
    }

    ProjectDirs::from("", "", "hselect").map(|dirs| dirs.config_dir().join("config.toml"))
}
