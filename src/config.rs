// ⚙️ Settings - environment-driven configuration for the CLI and the server

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::classifier::{Classifier, DEFAULT_PRIMARY_CUTOFF};
use crate::error::ensure_unit_interval;
use crate::registry::TaxonomyRegistry;

pub const ENV_THRESHOLD: &str = "SKILL_TAGGER_THRESHOLD";
pub const ENV_PRIMARY_CUTOFF: &str = "SKILL_TAGGER_PRIMARY_CUTOFF";
pub const ENV_TAXONOMY: &str = "SKILL_TAGGER_TAXONOMY";
pub const ENV_BIND: &str = "SKILL_TAGGER_BIND";
pub const ENV_RUST_LOG: &str = "RUST_LOG";

/// Runtime settings. Every field has a default, nothing is required.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Default threshold passed to `classify`
    pub threshold: f64,

    /// Score at or above which a match is primary
    pub primary_cutoff: f64,

    /// Taxonomy file (.md or .json); None = built-in taxonomy
    pub taxonomy_path: Option<PathBuf>,

    /// Address the API server binds to
    pub bind_addr: String,

    /// Default log filter when RUST_LOG is not set
    pub rust_log: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            threshold: 0.0,
            primary_cutoff: DEFAULT_PRIMARY_CUTOFF,
            taxonomy_path: None,
            bind_addr: "0.0.0.0:3000".to_string(),
            rust_log: "info".to_string(),
        }
    }
}

impl Settings {
    /// Read settings from the process environment, loading `.env` first if present
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // missing .env is fine
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Settings::default();
        let value = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let threshold = match value(ENV_THRESHOLD) {
            Some(raw) => parse_unit(ENV_THRESHOLD, &raw)?,
            None => defaults.threshold,
        };

        let primary_cutoff = match value(ENV_PRIMARY_CUTOFF) {
            Some(raw) => parse_unit(ENV_PRIMARY_CUTOFF, &raw)?,
            None => defaults.primary_cutoff,
        };

        Ok(Settings {
            threshold,
            primary_cutoff,
            taxonomy_path: value(ENV_TAXONOMY).map(PathBuf::from),
            bind_addr: value(ENV_BIND).unwrap_or(defaults.bind_addr),
            rust_log: value(ENV_RUST_LOG).unwrap_or(defaults.rust_log),
        })
    }

    /// Registry from the configured taxonomy file, or the built-in one
    pub fn load_registry(&self) -> Result<TaxonomyRegistry> {
        match &self.taxonomy_path {
            Some(path) => TaxonomyRegistry::from_file(path),
            None => Ok(TaxonomyRegistry::with_defaults().context("Built-in taxonomy is invalid")?),
        }
    }

    pub fn classifier(&self) -> Result<Classifier> {
        Ok(Classifier::new(self.primary_cutoff)?)
    }
}

fn parse_unit(key: &str, raw: &str) -> Result<f64> {
    let value: f64 = raw
        .parse()
        .with_context(|| format!("{} must be a number, got '{}'", key, raw))?;
    ensure_unit_interval(key, value)?;
    Ok(value)
}
