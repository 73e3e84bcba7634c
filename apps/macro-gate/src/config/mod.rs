//! Configuration module for the macro gate.
//!
//! Loads YAML configuration with environment variable interpolation and
//! validates it before anything is served.
//!
//! # Usage
//!
//! ```rust,ignore
//! use macro_gate::config::load_config;
//!
//! // MACRO_GATE_CONFIG, else config.yaml, else built-in defaults
//! let config = load_config(None)?;
//! let policy = config.policy.to_policy()?;
//! ```

mod api;
mod build_info;
mod observability;
mod policy;
mod server;

use std::io::ErrorKind;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::macro_policy::PolicyError;

pub use api::{ApiConfig, parse_key_list};
pub use build_info::BuildInfo;
pub use observability::{LOG_FORMATS, LoggingConfig, ObservabilityConfig};
pub use policy::{ConfidenceOverrides, PolicySettings, StateOverrides};
pub use server::ServerConfig;

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "MACRO_GATE_CONFIG";

/// Config file used when [`CONFIG_PATH_ENV`] is unset.
pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse YAML configuration.
    #[error("Failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// Configuration validation failed.
    #[error("Config validation failed: {0}")]
    ValidationError(String),

    /// Policy table is invalid.
    #[error("Invalid policy: {0}")]
    Policy(#[from] PolicyError),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// API keys and rate limiting.
    #[serde(default)]
    pub api: ApiConfig,
    /// Macro policy table.
    #[serde(default)]
    pub policy: PolicySettings,
    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
    /// Build metadata.
    #[serde(default)]
    pub build: BuildInfo,
}

// ============================================
// Configuration Loading
// ============================================

/// Path of the config file: `MACRO_GATE_CONFIG`, else `config.yaml`.
#[must_use]
pub fn config_path() -> String {
    std::env::var(CONFIG_PATH_ENV)
        .ok()
        .filter(|p| !p.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string())
}

/// Load configuration from a YAML file with environment variable interpolation.
///
/// A missing file yields the built-in defaults.
///
/// # Arguments
///
/// * `path` - Optional path to the config file. Defaults to [`config_path`].
///
/// # Errors
///
/// Returns a `ConfigError` if the file exists but cannot be read, parsed, or validated.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let path = path.map_or_else(config_path, str::to_string);

    match std::fs::read_to_string(&path) {
        Ok(contents) => load_config_from_string(&contents),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::warn!(path = %path, "Config file not found, using defaults");
            let config = Config::default();
            validate_config(&config)?;
            Ok(config)
        }
        Err(source) => Err(ConfigError::ReadError { path, source }),
    }
}

/// Load configuration from a YAML string (useful for testing).
///
/// # Errors
///
/// Returns a `ConfigError` if the YAML cannot be parsed or validated.
pub fn load_config_from_string(yaml: &str) -> Result<Config, ConfigError> {
    let interpolated = interpolate_env_vars(yaml);
    let config: Config = if interpolated.trim().is_empty() {
        Config::default()
    } else {
        serde_yaml_bw::from_str(&interpolated)?
    };
    validate_config(&config)?;
    Ok(config)
}

/// Interpolate environment variables in a string.
///
/// Supports both `${VAR}` and `${VAR:-default}` syntax. Unset or empty
/// variables without a default become the empty string.
#[allow(clippy::expect_used)] // Regex is compile-time constant; expect() is safe here
fn interpolate_env_vars(input: &str) -> String {
    use std::sync::OnceLock;

    static ENV_VAR_REGEX: OnceLock<regex::Regex> = OnceLock::new();

    let re = ENV_VAR_REGEX.get_or_init(|| {
        regex::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
            .expect("env var regex is valid")
    });

    re.replace_all(input, |cap: &regex::Captures<'_>| {
        let default_value = cap.get(2).map_or("", |m| m.as_str());
        match cap.get(1).map(|m| std::env::var(m.as_str())) {
            Some(Ok(v)) if !v.is_empty() => v,
            _ => default_value.to_string(),
        }
    })
    .into_owned()
}

/// Validate configuration values.
fn validate_config(config: &Config) -> Result<(), ConfigError> {
    config.policy.to_policy()?;

    if config.api.requests_per_minute == 0 {
        return Err(ConfigError::ValidationError(
            "api.requests_per_minute must be positive".to_string(),
        ));
    }

    let format = config.observability.logging.format.as_str();
    if !LOG_FORMATS.contains(&format) {
        return Err(ConfigError::ValidationError(format!(
            "observability.logging.format must be one of: {LOG_FORMATS:?}"
        )));
    }

    Ok(())
}
