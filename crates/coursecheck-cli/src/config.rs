//! Optional TOML configuration
//!
//! Looked up as `coursecheck.toml` in the working directory unless
//! `--config` names a file. Command-line flags override file values.
//!
//! ```toml
//! [check]
//! parallel = true
//!
//! [parser]
//! full_numeral_table = false
//!
//! [output]
//! format = "text"
//! quiet = false
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

/// Default config file name
pub const CONFIG_FILE: &str = "coursecheck.toml";

/// Report output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub check: CheckSection,
    pub parser: ParserSection,
    pub output: OutputSection,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CheckSection {
    /// Run the conflict scans on the rayon pool
    pub parallel: bool,
}

impl Default for CheckSection {
    fn default() -> Self {
        Self { parallel: true }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParserSection {
    /// Resolve 六..十 class counts in art cells
    pub full_numeral_table: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputSection {
    pub format: OutputFormat,
    pub quiet: bool,
}

impl Config {
    /// Parse a config from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).context("invalid configuration")
    }

    /// Load the explicit config file, or `coursecheck.toml` from `dir` if present
    pub fn load(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::read(path);
        }

        let default_path = dir.join(CONFIG_FILE);
        if default_path.is_file() {
            return Self::read(&default_path);
        }

        debug!("no config file, using defaults");
        Ok(Self::default())
    }

    fn read(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        let config = Self::from_toml_str(&text)
            .with_context(|| format!("in config file: {}", path.display()))?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }
}
