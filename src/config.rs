//! Paths and threshold overrides.
//!
//! Locations are resolved in order:
//! 1. Environment variable (`FIELDOPS_DB_PATH`, `FIELDOPS_MATCH_CONFIG`)
//! 2. Platform data/config directory (`dirs`)
//! 3. Current directory
//!
//! CHANGELOG:
//! - 10/16/2026 - Added match.json threshold overrides
//! - 10/16/2026 - Initial implementation

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::adapters::{customers, jobs};
use crate::matching::MatchOptions;

/// Default socket path for the match daemon (tilde is expanded).
pub const DEFAULT_SOCKET: &str = "~/.fieldops-match/daemon.sock";

/// Default SQLite database path.
pub fn default_db_path() -> PathBuf {
    if let Ok(path) = std::env::var("FIELDOPS_DB_PATH") {
        return PathBuf::from(path);
    }

    dirs::data_dir()
        .map(|dir| dir.join("fieldops").join("fieldops.db"))
        .unwrap_or_else(|| PathBuf::from("fieldops.db"))
}

/// Default threshold override file.
pub fn default_config_path() -> PathBuf {
    if let Ok(path) = std::env::var("FIELDOPS_MATCH_CONFIG") {
        return PathBuf::from(path);
    }

    dirs::config_dir()
        .map(|dir| dir.join("fieldops").join("match.json"))
        .unwrap_or_else(|| PathBuf::from("match.json"))
}

/// Expand `~` in a socket path.
pub fn expand_socket_path(socket: &str) -> String {
    shellexpand::tilde(socket).to_string()
}

/// Which engine entry point a threshold feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Single best match, used for automatic linking.
    Best,
    /// Ranked list for manual review.
    Review,
}

/// Optional overrides for one domain's thresholds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ThresholdOverrides {
    #[serde(default)]
    pub best_match: Option<f64>,
    #[serde(default)]
    pub review: Option<f64>,
}

/// Contents of `match.json`.
///
/// ```json
/// {"jobs": {"best_match": 0.8, "review": 0.7},
///  "customers": {"best_match": 0.85, "review": 0.75}}
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchConfig {
    #[serde(default)]
    pub jobs: ThresholdOverrides,
    #[serde(default)]
    pub customers: ThresholdOverrides,
}

impl MatchConfig {
    /// Load overrides from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read match config: {:?}", path.as_ref()))?;
        Self::from_json(&content)
            .with_context(|| format!("Invalid match config: {:?}", path.as_ref()))
    }

    /// Load from the default path; a missing file means built-in defaults.
    pub fn load_default() -> Result<Self> {
        let path = default_config_path();
        if !path.exists() {
            tracing::debug!(?path, "no match config, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let config: MatchConfig =
            serde_json::from_str(content).context("Failed to parse match config JSON")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let all = [
            ("jobs.best_match", self.jobs.best_match),
            ("jobs.review", self.jobs.review),
            ("customers.best_match", self.customers.best_match),
            ("customers.review", self.customers.review),
        ];
        for (name, value) in all {
            if let Some(v) = value {
                if !(0.0..=1.0).contains(&v) {
                    bail!("{} must be between 0 and 1, got {}", name, v);
                }
            }
        }
        Ok(())
    }

    /// Options for submission-to-job matching.
    pub fn job_options(&self, mode: MatchMode) -> MatchOptions {
        match mode {
            MatchMode::Best => MatchOptions::new(
                self.jobs.best_match.unwrap_or(jobs::BEST_MATCH_MIN_SCORE),
            ),
            MatchMode::Review => {
                MatchOptions::new(self.jobs.review.unwrap_or(jobs::REVIEW_MIN_SCORE))
            }
        }
    }

    /// Options for job-to-customer matching.
    pub fn customer_options(&self, mode: MatchMode) -> MatchOptions {
        match mode {
            MatchMode::Best => MatchOptions::new(
                self.customers
                    .best_match
                    .unwrap_or(customers::BEST_MATCH_MIN_SCORE),
            ),
            MatchMode::Review => MatchOptions::new(
                self.customers.review.unwrap_or(customers::REVIEW_MIN_SCORE),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_adapter_constants() {
        let config = MatchConfig::default();
        assert_eq!(config.job_options(MatchMode::Best).min_score, 0.8);
        assert_eq!(config.job_options(MatchMode::Review).min_score, 0.7);
        assert_eq!(config.customer_options(MatchMode::Best).min_score, 0.85);
        assert_eq!(config.customer_options(MatchMode::Review).min_score, 0.75);
        assert!(!config.job_options(MatchMode::Best).exact_match_only);
    }

    #[test]
    fn test_partial_override() {
        let config = MatchConfig::from_json(r#"{"customers": {"best_match": 0.9}}"#).unwrap();
        assert_eq!(config.customer_options(MatchMode::Best).min_score, 0.9);
        assert_eq!(config.customer_options(MatchMode::Review).min_score, 0.75);
        assert_eq!(config.job_options(MatchMode::Best).min_score, 0.8);
    }

    #[test]
    fn test_out_of_range_rejected() {
        assert!(MatchConfig::from_json(r#"{"jobs": {"review": 1.5}}"#).is_err());
        assert!(MatchConfig::from_json("not json").is_err());
    }

    #[test]
    fn test_expand_socket_path() {
        let expanded = expand_socket_path("/tmp/fieldops.sock");
        assert_eq!(expanded, "/tmp/fieldops.sock");
    }
}
