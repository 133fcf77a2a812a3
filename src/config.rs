// 🔧 Configuration - defaults, JSON file, environment overrides
// Every field has a default so an empty `{}` file is a valid config

use crate::catalog::CharacterDatabase;
use crate::divination::HexagramTable;
use crate::engine::NamingEngine;
use crate::selector::{DEFAULT_BATCH_SIZE, DEFAULT_MAX_ATTEMPTS};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingConfig {
    /// Address the HTTP server binds to
    pub bind_addr: String,

    /// Character database file (CSV or .json); built-in table when None
    pub characters_path: Option<PathBuf>,

    /// Hexagram table file (JSON); built-in table when None
    pub hexagrams_path: Option<PathBuf>,

    /// Directory served under /static
    pub static_dir: PathBuf,

    /// Duplicate drafts tolerated per batch
    pub max_attempts: usize,

    /// Names per request
    pub batch_size: usize,

    /// Fixed seed for reproducible output; entropy when None
    pub seed: Option<u64>,
}

impl Default for NamingConfig {
    fn default() -> Self {
        NamingConfig {
            bind_addr: "0.0.0.0:3001".to_string(),
            characters_path: None,
            hexagrams_path: None,
            static_dir: PathBuf::from("web"),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            batch_size: DEFAULT_BATCH_SIZE,
            seed: None,
        }
    }
}

impl NamingConfig {
    /// Load config from JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        serde_json::from_str(&content).context("Failed to parse config JSON")
    }

    /// Defaults, then the optional file, then BAZI_* environment variables
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        config.apply_env(|key| env::var(key).ok())
    }

    /// Overlay values from a variable lookup (the process environment in `load`)
    pub fn apply_env<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = lookup("BAZI_BIND_ADDR") {
            self.bind_addr = addr;
        }
        if let Some(path) = lookup("BAZI_CHARACTERS") {
            self.characters_path = Some(PathBuf::from(path));
        }
        if let Some(path) = lookup("BAZI_HEXAGRAMS") {
            self.hexagrams_path = Some(PathBuf::from(path));
        }
        if let Some(dir) = lookup("BAZI_STATIC_DIR") {
            self.static_dir = PathBuf::from(dir);
        }
        if let Some(value) = lookup("BAZI_MAX_ATTEMPTS") {
            self.max_attempts = value
                .parse()
                .with_context(|| format!("BAZI_MAX_ATTEMPTS is not a number: {:?}", value))?;
        }
        if let Some(value) = lookup("BAZI_SEED") {
            self.seed = Some(
                value
                    .parse()
                    .with_context(|| format!("BAZI_SEED is not a number: {:?}", value))?,
            );
        }
        Ok(self)
    }

    /// Load the configured data and build the engine
    pub fn build_engine(&self) -> Result<NamingEngine> {
        let characters = match &self.characters_path {
            Some(path) => CharacterDatabase::from_path(path)?,
            None => CharacterDatabase::builtin()?,
        };
        let hexagrams = match &self.hexagrams_path {
            Some(path) => HexagramTable::from_path(path)?,
            None => HexagramTable::builtin()?,
        };

        tracing::info!(
            characters = characters.len(),
            hexagrams = hexagrams.len(),
            "loaded naming data"
        );

        Ok(NamingEngine::new(characters, hexagrams)
            .with_batch_size(self.batch_size)
            .with_max_attempts(self.max_attempts))
    }
}
