//! CLI configuration from `rollgraph.toml`
//!
//! Every key is optional. Command-line flags take precedence over the file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default config file name, looked up in the working directory
pub const CONFIG_FILE: &str = "rollgraph.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Topology file used when `--topology` is not given
    pub topology: Option<PathBuf>,
    /// Entrypoints used when `--entrypoint` is not given
    pub entrypoints: Vec<String>,
    /// DOT output path used when `--dot` is not given
    pub dot_output: Option<PathBuf>,
    /// `tracing` filter directive, e.g. `rollgraph=debug`
    pub log_filter: Option<String>,
}

impl Config {
    /// Load the config file at `path`, or defaults if it does not exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config TOML")
    }

    /// Topology path from the command line, falling back to the config file
    pub fn topology_path(&self, flag: Option<PathBuf>) -> Result<PathBuf> {
        flag.or_else(|| self.topology.clone())
            .context("No topology given: pass --topology or set `topology` in rollgraph.toml")
    }

    /// Entrypoints from the command line, falling back to the config file
    pub fn entrypoints(&self, flags: Vec<String>) -> Vec<String> {
        if flags.is_empty() {
            self.entrypoints.clone()
        } else {
            flags
        }
    }

    pub fn dot_output(&self, flag: Option<PathBuf>) -> Option<PathBuf> {
        flag.or_else(|| self.dot_output.clone())
    }
}
