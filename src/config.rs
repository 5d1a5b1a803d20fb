//! # Configuration
//!
//! Application configuration loading and management.
//!
//! # Configuration Sources
//!
//! Configuration is loaded in the following order (later sources override earlier):
//! 1. Default values
//! 2. Configuration file (if exists)
//! 3. Environment variables (prefixed with `PREQUAL_`)
//!
//! # Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `PREQUAL_CONFIG_FILE` | Configuration file path | `prequal.toml` |
//! | `PREQUAL_LOG_LEVEL` | Log level | `info` |
//! | `PREQUAL_LOG_FORMAT` | Log format (json/pretty) | `json` |
//! | `PREQUAL_MIN_APPROVAL_PROBABILITY` | Partner probability floor | `50` |
//! | `PREQUAL_MAX_PARTNERS` | Partners returned per request | `5` |
//! | `PREQUAL_PROBE_TIMEOUT_MS` | Eligibility probe timeout | `5000` |
//! | `PREQUAL_SCORER` | Scorer (rule_based/ml_model) | `rule_based` |
//! | `PREQUAL_CACHE_TTL_SECS` | Result cache TTL | `3600` |
//! | `PREQUAL_CACHE_CAPACITY` | Result cache capacity | `100` |
//!
//! Simulated partners are declared as `[[partners]]` tables in the file.
//!
//! # Examples
//!
//! ```
//! use financing_prequal::config::AppConfig;
//!
//! let config: AppConfig = toml::from_str(r#"
//!     [prequal]
//!     max_partners = 3
//!
//!     [[partners]]
//!     partner_id = "lendfast"
//!     partner_name = "LendFast"
//! "#).unwrap();
//!
//! assert!(config.validate().is_ok());
//! assert_eq!(config.prequal.max_partners, 3);
//! assert_eq!(config.cache.capacity, 100);
//! ```

use crate::application::services::{CreditModel, CreditScorer, MlScorer, ResultCache, RuleBasedScorer};
use crate::application::use_cases::{OrchestratorConfig, PreQualificationCache, PreQualifyOptions};
use crate::domain::entities::MAX_RECOMMENDED_PARTNERS;
use crate::infrastructure::partners::SimulatedPartnerConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Prefix shared by every environment override.
pub const ENV_PREFIX: &str = "PREQUAL_";

// ============================================================================
// Configuration Errors
// ============================================================================

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse configuration.
    #[error("failed to parse config: {0}")]
    Parse(String),

    /// Invalid configuration value.
    #[error("invalid config value for {field}: {message}")]
    InvalidValue {
        /// Field name.
        field: String,
        /// Error message.
        message: String,
    },
}

impl ConfigError {
    fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }
}

// ============================================================================
// Logging Configuration
// ============================================================================

/// Log format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON format (structured logging).
    #[default]
    Json,
    /// Pretty format (human-readable).
    Pretty,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format.
    #[serde(default)]
    pub format: LogFormat,

    /// Include target (module path) in logs.
    #[serde(default = "default_true")]
    pub include_target: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::Json,
            include_target: true,
        }
    }
}

// ============================================================================
// Pre-Qualification Configuration
// ============================================================================

/// Scoring strategy injected into the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ScorerKind {
    /// Deterministic bucket scoring.
    #[default]
    RuleBased,
    /// Model-backed scoring with rule-based fallback.
    MlModel,
}

impl FromStr for ScorerKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "rule_based" => Ok(Self::RuleBased),
            "ml_model" => Ok(Self::MlModel),
            other => Err(ConfigError::invalid(
                "prequal.scorer",
                format!("unknown scorer '{other}', must be rule_based or ml_model"),
            )),
        }
    }
}

impl ScorerKind {
    /// Builds the configured scorer.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when `ml_model` is selected
    /// without a model.
    pub fn build(
        self,
        model: Option<Arc<dyn CreditModel>>,
    ) -> Result<Arc<dyn CreditScorer>, ConfigError> {
        match (self, model) {
            (Self::RuleBased, _) => Ok(Arc::new(RuleBasedScorer::new())),
            (Self::MlModel, Some(model)) => Ok(Arc::new(MlScorer::new(model))),
            (Self::MlModel, None) => Err(ConfigError::invalid(
                "prequal.scorer",
                "ml_model selected but no credit model is available",
            )),
        }
    }
}

/// Orchestrator defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrequalConfig {
    /// Partners below this probability are dropped.
    #[serde(default = "default_min_approval_probability")]
    pub min_approval_probability: u8,

    /// Most partners returned per request.
    #[serde(default = "default_max_partners")]
    pub max_partners: usize,

    /// Upper bound for any eligibility probe, in milliseconds.
    #[serde(default = "default_probe_timeout")]
    pub probe_timeout_ms: u64,

    /// Scoring strategy.
    #[serde(default)]
    pub scorer: ScorerKind,
}

impl Default for PrequalConfig {
    fn default() -> Self {
        Self {
            min_approval_probability: default_min_approval_probability(),
            max_partners: default_max_partners(),
            probe_timeout_ms: default_probe_timeout(),
            scorer: ScorerKind::RuleBased,
        }
    }
}

/// Result cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Seconds a result stays fresh.
    #[serde(default = "default_cache_ttl")]
    pub ttl_secs: u64,

    /// Most results held.
    #[serde(default = "default_cache_capacity")]
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_cache_ttl(),
            capacity: default_cache_capacity(),
        }
    }
}

impl CacheConfig {
    /// TTL as a duration.
    #[must_use]
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    /// Builds an empty cache with these settings.
    #[must_use]
    pub fn build(&self) -> PreQualificationCache {
        ResultCache::new(self.capacity, self.ttl())
    }
}

// ============================================================================
// Application Configuration
// ============================================================================

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Logging configuration.
    #[serde(default)]
    pub log: LogConfig,

    /// Orchestrator defaults.
    #[serde(default)]
    pub prequal: PrequalConfig,

    /// Result cache configuration.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Simulated partners registered at startup.
    #[serde(default)]
    pub partners: Vec<SimulatedPartnerConfig>,
}

impl AppConfig {
    /// Loads configuration from environment variables and optional config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or an
    /// override does not parse.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let config_path = std::env::var(format!("{ENV_PREFIX}CONFIG_FILE"))
            .unwrap_or_else(|_| "prequal.toml".to_string());

        if Path::new(&config_path).exists() {
            config = Self::from_file(&config_path)?;
        }

        config.apply_env_overrides()?;

        Ok(config)
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Applies `PREQUAL_*` environment variable overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if a numeric or enum override
    /// does not parse.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    /// Applies overrides from an arbitrary lookup keyed by full variable name.
    ///
    /// # Errors
    ///
    /// See [`apply_env_overrides`](Self::apply_env_overrides).
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        let get = |suffix: &str| lookup(&format!("{ENV_PREFIX}{suffix}"));

        // Logging configuration
        if let Some(level) = get("LOG_LEVEL") {
            self.log.level = level;
        }
        if let Some(format) = get("LOG_FORMAT") {
            self.log.format = match format.to_lowercase().as_str() {
                "pretty" => LogFormat::Pretty,
                _ => LogFormat::Json,
            };
        }

        // Orchestrator configuration
        if let Some(value) = get("MIN_APPROVAL_PROBABILITY") {
            self.prequal.min_approval_probability =
                parse_override("prequal.min_approval_probability", &value)?;
        }
        if let Some(value) = get("MAX_PARTNERS") {
            self.prequal.max_partners = parse_override("prequal.max_partners", &value)?;
        }
        if let Some(value) = get("PROBE_TIMEOUT_MS") {
            self.prequal.probe_timeout_ms = parse_override("prequal.probe_timeout_ms", &value)?;
        }
        if let Some(value) = get("SCORER") {
            self.prequal.scorer = value.parse()?;
        }

        // Cache configuration
        if let Some(value) = get("CACHE_TTL_SECS") {
            self.cache.ttl_secs = parse_override("cache.ttl_secs", &value)?;
        }
        if let Some(value) = get("CACHE_CAPACITY") {
            self.cache.capacity = parse_override("cache.capacity", &value)?;
        }

        Ok(())
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log.level.to_lowercase().as_str()) {
            return Err(ConfigError::invalid(
                "log.level",
                format!(
                    "invalid log level '{}', must be one of: {:?}",
                    self.log.level, valid_levels
                ),
            ));
        }

        if self.prequal.min_approval_probability > 100 {
            return Err(ConfigError::invalid(
                "prequal.min_approval_probability",
                format!("must be 0-100, got {}", self.prequal.min_approval_probability),
            ));
        }
        if self.prequal.max_partners == 0 {
            return Err(ConfigError::invalid("prequal.max_partners", "must be at least 1"));
        }
        if self.prequal.probe_timeout_ms == 0 {
            return Err(ConfigError::invalid("prequal.probe_timeout_ms", "must be positive"));
        }
        if self.cache.ttl_secs == 0 {
            return Err(ConfigError::invalid("cache.ttl_secs", "must be positive"));
        }
        if self.cache.capacity == 0 {
            return Err(ConfigError::invalid("cache.capacity", "must be at least 1"));
        }

        let mut seen = HashSet::new();
        for (index, partner) in self.partners.iter().enumerate() {
            let field = format!("partners[{index}]");
            partner
                .validate()
                .map_err(|message| ConfigError::invalid(field.clone(), message))?;
            if !seen.insert(partner.partner_id()) {
                return Err(ConfigError::invalid(
                    field,
                    format!("duplicate partner_id '{}'", partner.partner_id()),
                ));
            }
        }

        Ok(())
    }

    /// Per-call defaults derived from `[prequal]`.
    #[must_use]
    pub fn default_options(&self) -> PreQualifyOptions {
        PreQualifyOptions::default()
            .with_min_approval_probability(self.prequal.min_approval_probability)
            .with_max_partners(self.prequal.max_partners)
    }

    /// Orchestrator configuration derived from `[prequal]`.
    #[must_use]
    pub fn orchestrator_config(&self) -> OrchestratorConfig {
        OrchestratorConfig::with_timeout(self.prequal.probe_timeout_ms)
            .with_default_options(self.default_options())
    }
}

fn parse_override<T: FromStr>(field: &str, value: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::invalid(field, format!("'{value}': {e}")))
}

// ============================================================================
// Default Value Functions
// ============================================================================

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_min_approval_probability() -> u8 {
    50
}

fn default_max_partners() -> usize {
    MAX_RECOMMENDED_PARTNERS
}

fn default_probe_timeout() -> u64 {
    5000
}

fn default_cache_ttl() -> u64 {
    3600
}

fn default_cache_capacity() -> usize {
    100
}
