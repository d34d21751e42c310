//! Generator configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::batch::{BatchConfig, DEFAULT_MIN_TOTAL, DEFAULT_PER_FAMILY_QUOTA};
use crate::model::QuestionFamily;
use crate::sink::OutputFormat;

/// Top-level capymorph configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapymorphConfig {
    /// Word bank path. Unset means "next to the binary, else ./wordbank.txt".
    #[serde(default)]
    pub wordbank: Option<PathBuf>,
    /// Round-robin passes over the families.
    #[serde(default = "default_quota")]
    pub per_family_quota: usize,
    /// Minimum batch size.
    #[serde(default = "default_min_total")]
    pub min_total: usize,
    /// Family that absorbs any shortfall.
    #[serde(default = "default_top_up_family")]
    pub top_up_family: QuestionFamily,
    /// Fixed seed for reproducible runs.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Where generated questions are written.
    #[serde(default = "default_output")]
    pub output: PathBuf,
    /// Output file layout.
    #[serde(default)]
    pub format: OutputFormat,
}

fn default_quota() -> usize {
    DEFAULT_PER_FAMILY_QUOTA
}
fn default_min_total() -> usize {
    DEFAULT_MIN_TOTAL
}
fn default_top_up_family() -> QuestionFamily {
    QuestionFamily::InflectionVsDerivation
}
fn default_output() -> PathBuf {
    PathBuf::from("./capymorph-questions.json")
}

impl Default for CapymorphConfig {
    fn default() -> Self {
        Self {
            wordbank: None,
            per_family_quota: default_quota(),
            min_total: default_min_total(),
            top_up_family: default_top_up_family(),
            seed: None,
            output: default_output(),
            format: OutputFormat::default(),
        }
    }
}

impl CapymorphConfig {
    pub fn batch_config(&self) -> BatchConfig {
        BatchConfig {
            per_family_quota: self.per_family_quota,
            min_total: self.min_total,
            top_up_family: self.top_up_family,
            ..BatchConfig::default()
        }
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `capymorph.toml` in the current directory
/// 2. `~/.config/capymorph/config.toml`
///
/// Environment variable overrides: `CAPYMORPH_WORDBANK`, `CAPYMORPH_SEED`,
/// `CAPYMORPH_OUTPUT`.
pub fn load_config() -> Result<CapymorphConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<CapymorphConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("capymorph.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<CapymorphConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => CapymorphConfig::default(),
    };

    apply_env_overrides(config, |key| std::env::var(key).ok())
}

/// Apply `CAPYMORPH_*` overrides read through `lookup`.
pub fn apply_env_overrides<F>(mut config: CapymorphConfig, lookup: F) -> Result<CapymorphConfig>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(path) = lookup("CAPYMORPH_WORDBANK") {
        config.wordbank = Some(PathBuf::from(path));
    }
    if let Some(seed) = lookup("CAPYMORPH_SEED") {
        let seed = seed
            .trim()
            .parse::<u64>()
            .with_context(|| format!("CAPYMORPH_SEED is not a number: '{seed}'"))?;
        config.seed = Some(seed);
    }
    if let Some(output) = lookup("CAPYMORPH_OUTPUT") {
        config.output = PathBuf::from(output);
    }
    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("capymorph"))
}
