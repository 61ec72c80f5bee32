//! Analyzer configuration
//!
//! Configuration is optional and read from `benchview.toml`, resolved either
//! from an explicit `--config` path or from the data directory. A missing
//! file yields defaults; a present-but-invalid file is an error so that
//! pricing typos surface instead of silently zeroing cost columns.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{BenchError, Result};

/// Default fallback encoding for files that are not valid UTF-8.
/// The original result dumps were produced on Korean Windows machines.
pub const DEFAULT_FALLBACK_ENCODING: &str = "cp949";

/// Per-model token pricing in USD per million tokens
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelPricing {
    /// Input (prompt) cost per million tokens
    pub input_per_mtok: f64,
    /// Output (completion) cost per million tokens
    pub output_per_mtok: f64,
}

impl ModelPricing {
    /// Estimated cost in USD for a token total
    pub fn cost(&self, input_tokens: u64, output_tokens: u64) -> f64 {
        (input_tokens as f64 * self.input_per_mtok + output_tokens as f64 * self.output_per_mtok)
            / 1_000_000.0
    }
}

/// Analyzer configuration loaded from `benchview.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Fallback encoding label tried when UTF-8 decoding fails
    pub fallback_encoding: Option<String>,

    /// Pricing table keyed by normalized model display name
    pub pricing: BTreeMap<String, ModelPricing>,
}

impl Config {
    /// Load configuration from an explicit path.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| BenchError::InvalidConfig {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        toml::from_str(&contents).map_err(|e| BenchError::InvalidConfig {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Resolve configuration: explicit path wins, else `benchview.toml` in
    /// the data directory, else defaults.
    pub fn resolve(explicit: Option<&Path>, data_dir: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let candidate = data_dir.join("benchview.toml");
        if candidate.is_file() {
            return Self::load(&candidate);
        }
        Ok(Self::default())
    }

    /// The fallback encoding label to use for non-UTF-8 files
    pub fn fallback_encoding(&self) -> &str {
        self.fallback_encoding
            .as_deref()
            .unwrap_or(DEFAULT_FALLBACK_ENCODING)
    }

    /// Look up pricing for a normalized model name
    pub fn pricing_for(&self, model: &str) -> Option<&ModelPricing> {
        self.pricing.get(model)
    }
}
