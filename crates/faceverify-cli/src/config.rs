use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Scoring function used by `verify`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    /// Negated Euclidean distance.
    Euclidean,
    /// Cosine similarity.
    Cosine,
}

impl std::str::FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "euclidean" => Ok(Metric::Euclidean),
            "cosine" => Ok(Metric::Cosine),
            other => Err(format!("unknown metric: {other}")),
        }
    }
}

/// Evaluation settings: defaults, then a TOML file, then `FACEVERIFY_*`
/// environment variables. CLI flags are applied on top by `main`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Number of thresholds in a ROC sweep.
    pub roc_points: usize,
    /// Scoring function for feature datasets.
    pub metric: Metric,
    /// Score model rows on the rayon pool.
    pub parallel: bool,
    /// Decimal places in text output.
    pub precision: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            roc_points: 100,
            metric: Metric::Euclidean,
            parallel: false,
            precision: 4,
        }
    }
}

impl Config {
    /// Load from `path` (or `FACEVERIFY_CONFIG`, if set), then apply env overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var("FACEVERIFY_CONFIG").ok().map(PathBuf::from));

        let base = match path {
            Some(p) => Self::from_file(&p)?,
            None => Self::default(),
        };
        Ok(base.with_env())
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Config = toml::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        tracing::debug!(path = %path.display(), ?config, "loaded config file");
        Ok(config)
    }

    /// Override fields from `FACEVERIFY_*` variables. Unparseable values are ignored.
    pub fn with_env(self) -> Self {
        self.with_vars(|key| std::env::var(key).ok())
    }

    fn with_vars(self, var: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            roc_points: parse_var(&var, "FACEVERIFY_ROC_POINTS").unwrap_or(self.roc_points),
            metric: parse_var(&var, "FACEVERIFY_METRIC").unwrap_or(self.metric),
            parallel: var("FACEVERIFY_PARALLEL")
                .map(|v| v != "0")
                .unwrap_or(self.parallel),
            precision: parse_var(&var, "FACEVERIFY_PRECISION").unwrap_or(self.precision),
        }
    }
}

fn parse_var<T: std::str::FromStr>(var: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = var(key)?;
    match raw.parse() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!(key, value = %raw, "ignoring unparseable environment override");
            None
        }
    }
}
