//! Configuration management for trend analysis
//!
//! This module handles loading and validating configuration from environment
//! variables and TOML files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::analytics::error::AnalysisError;
use crate::analytics::interval::Interval;
use crate::error::Error;

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Entity trend detection configuration
    pub analysis: AnalysisConfig,

    /// Keyword extraction configuration
    pub keywords: KeywordConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Entity trend detection configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Entity types considered for trends
    pub entity_types: Vec<String>,

    /// Significance threshold a group must reach
    pub min_significance: f64,

    /// Minimum mentions before a group is scored
    pub min_mentions: usize,

    /// Maximum trends returned per run
    pub max_trends: usize,

    /// Minimum co-occurrence rate for related entities
    pub cooccurrence_threshold: f64,

    /// Maximum related entities attached to a trend
    pub max_related_entities: usize,

    /// Days between a trend's start date and the analysis time
    pub lookback_days: i64,

    /// Minimum buckets before frequency patterns are computed
    pub min_data_points: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            entity_types: ["PERSON", "ORG", "GPE", "EVENT"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            min_significance: 1.5,
            min_mentions: 2,
            max_trends: 20,
            cooccurrence_threshold: 0.3,
            max_related_entities: 5,
            lookback_days: 7,
            min_data_points: 3,
        }
    }
}

/// Keyword extraction configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordConfig {
    /// Keywords kept per period
    pub top_n: usize,

    /// Bucket granularity for keyword series
    pub interval: Interval,

    /// Periods needed before growth is measured
    pub min_periods: usize,
}

impl Default for KeywordConfig {
    fn default() -> Self {
        Self {
            top_n: 50,
            interval: Interval::Day,
            min_periods: 2,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            format: String::from("text"),
        }
    }
}

/// Upper bound for `lookback_days` (100 years)
const MAX_LOOKBACK_DAYS: i64 = 36_500;

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.trim().parse::<T>().ok())
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Unset or unparsable variables keep their defaults.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let entity_types = std::env::var("TRENDLENS_ENTITY_TYPES")
            .ok()
            .map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect::<Vec<_>>()
            })
            .filter(|types| !types.is_empty())
            .unwrap_or(defaults.analysis.entity_types);

        let interval = std::env::var("TRENDLENS_KEYWORD_INTERVAL")
            .map(|v| Interval::parse(&v))
            .unwrap_or(defaults.keywords.interval);

        let config = Self {
            analysis: AnalysisConfig {
                entity_types,
                min_significance: env_parse("TRENDLENS_MIN_SIGNIFICANCE")
                    .unwrap_or(defaults.analysis.min_significance),
                min_mentions: env_parse("TRENDLENS_MIN_MENTIONS")
                    .unwrap_or(defaults.analysis.min_mentions),
                max_trends: env_parse("TRENDLENS_MAX_TRENDS")
                    .unwrap_or(defaults.analysis.max_trends),
                cooccurrence_threshold: env_parse("TRENDLENS_COOCCURRENCE_THRESHOLD")
                    .unwrap_or(defaults.analysis.cooccurrence_threshold),
                max_related_entities: env_parse("TRENDLENS_MAX_RELATED_ENTITIES")
                    .unwrap_or(defaults.analysis.max_related_entities),
                lookback_days: env_parse("TRENDLENS_LOOKBACK_DAYS")
                    .unwrap_or(defaults.analysis.lookback_days),
                min_data_points: env_parse("TRENDLENS_MIN_DATA_POINTS")
                    .unwrap_or(defaults.analysis.min_data_points),
            },
            keywords: KeywordConfig {
                top_n: env_parse("TRENDLENS_KEYWORD_TOP_N").unwrap_or(defaults.keywords.top_n),
                interval,
                min_periods: env_parse("TRENDLENS_KEYWORD_MIN_PERIODS")
                    .unwrap_or(defaults.keywords.min_periods),
            },
            logging: LoggingConfig {
                level: std::env::var("TRENDLENS_LOG_LEVEL").unwrap_or(defaults.logging.level),
                format: std::env::var("TRENDLENS_LOG_FORMAT").unwrap_or(defaults.logging.format),
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config file: {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// Out-of-range thresholds are reported as
    /// [`AnalysisError::InvalidThreshold`], everything else as a config error.
    pub fn validate(&self) -> crate::error::Result<()> {
        let analysis = &self.analysis;

        if analysis.entity_types.is_empty() {
            return Err(Error::config("entity_types must not be empty"));
        }

        if !analysis.min_significance.is_finite() || analysis.min_significance < 0.0 {
            return Err(AnalysisError::InvalidThreshold {
                name: "min_significance",
                value: analysis.min_significance,
            }
            .into());
        }

        if analysis.min_mentions == 0 {
            return Err(Error::config("min_mentions must be greater than 0"));
        }

        if analysis.max_trends == 0 {
            return Err(Error::config("max_trends must be greater than 0"));
        }

        if !(0.0..=1.0).contains(&analysis.cooccurrence_threshold) {
            return Err(AnalysisError::InvalidThreshold {
                name: "cooccurrence_threshold",
                value: analysis.cooccurrence_threshold,
            }
            .into());
        }

        if !(0..=MAX_LOOKBACK_DAYS).contains(&analysis.lookback_days) {
            return Err(Error::config(format!(
                "lookback_days must be between 0 and {MAX_LOOKBACK_DAYS}"
            )));
        }

        if self.keywords.top_n == 0 {
            return Err(Error::config("keyword top_n must be greater than 0"));
        }

        if self.keywords.min_periods < 2 {
            return Err(Error::config("keyword min_periods must be at least 2"));
        }

        if !matches!(self.logging.format.as_str(), "text" | "json") {
            return Err(Error::config("log format must be 'text' or 'json'"));
        }

        Ok(())
    }
}
