//! TOML Configuration File Support
//!
//! Centralized configuration loading for cabin-assist, backed by a TOML file
//! at `~/.config/cabin-assist/config.toml`.
//!
//! # Configuration Priority
//!
//! Configuration values are loaded with the following priority (highest first):
//! 1. CLI arguments (applied by the caller through [`ConfigOverrides`])
//! 2. Environment variables
//! 3. TOML configuration file
//! 4. Default values
//!
//! # XDG Base Directory Compliance
//!
//! - `$XDG_CONFIG_HOME/cabin-assist/config.toml` (typically `~/.config/cabin-assist/config.toml`)
//!
//! # Example Configuration
//!
//! ```toml
//! [api]
//! base_url = "http://localhost:8000"
//! request_timeout_ms = 120000
//! connect_timeout_ms = 5000
//!
//! [chat]
//! greeting = "Hello! I'm your airline assistant. How can I help you today?"
//!
//! [feedback]
//! thanks_delay_ms = 3000
//!
//! [startup]
//! health_check = true
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::backend::{BackendConfig, DEFAULT_BASE_URL};
use crate::feedback::DEFAULT_THANKS_DELAY;
use crate::transcript::DEFAULT_GREETING;

/// Environment variable names
pub mod env {
    /// Assistant service base URL
    pub const API_URL: &str = "CABIN_API_URL";
    /// Whole-request timeout in milliseconds
    pub const REQUEST_TIMEOUT_MS: &str = "CABIN_REQUEST_TIMEOUT_MS";
    /// Connect timeout in milliseconds
    pub const CONNECT_TIMEOUT_MS: &str = "CABIN_CONNECT_TIMEOUT_MS";
    /// Seeded assistant greeting
    pub const GREETING: &str = "CABIN_GREETING";
    /// Thank-you card display time in milliseconds
    pub const THANKS_DELAY_MS: &str = "CABIN_THANKS_DELAY_MS";
    /// Whether to probe `/health` on start
    pub const HEALTH_CHECK: &str = "CABIN_HEALTH_CHECK";

    /// Every variable read by the loader
    pub const ALL: [&str; 6] = [
        API_URL,
        REQUEST_TIMEOUT_MS,
        CONNECT_TIMEOUT_MS,
        GREETING,
        THANKS_DELAY_MS,
        HEALTH_CHECK,
    ];
}

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

// =============================================================================
// Configuration Source Tracking
// =============================================================================

/// Tracks where a configuration value came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Value from command-line argument
    Cli,
    /// Value from environment variable
    Env,
    /// Value from TOML configuration file
    File,
    /// Default value
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => write!(f, "CLI"),
            Self::Env => write!(f, "environment"),
            Self::File => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

// =============================================================================
// TOML Configuration Structures
// =============================================================================

/// `[api]` section
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiToml {
    /// Base URL of the assistant service
    pub base_url: Option<String>,

    /// Whole-request timeout in milliseconds
    pub request_timeout_ms: Option<u64>,

    /// Connect timeout in milliseconds
    pub connect_timeout_ms: Option<u64>,
}

/// `[chat]` section
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatToml {
    /// Greeting seeded into every fresh transcript
    pub greeting: Option<String>,
}

/// `[feedback]` section
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackToml {
    /// How long the thank-you card stays up, in milliseconds
    pub thanks_delay_ms: Option<u64>,
}

/// `[startup]` section
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StartupToml {
    /// Probe `/health` when the surface starts
    pub health_check: Option<bool>,
}

/// Top-level TOML configuration structure
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CabinToml {
    /// Assistant service section
    pub api: ApiToml,

    /// Chat section
    pub chat: ChatToml,

    /// Feedback survey section
    pub feedback: FeedbackToml,

    /// Startup section
    pub startup: StartupToml,
}

// =============================================================================
// Main Configuration Struct
// =============================================================================

/// Resolved configuration
///
/// Use [`load_config`] to build one with proper priority handling, then
/// [`ConfigOverrides::apply`] for CLI flags and [`CabinConfig::validate`].
#[derive(Clone, Debug)]
pub struct CabinConfig {
    /// Base URL of the assistant service
    pub base_url: String,

    /// Whole-request timeout
    pub request_timeout: Duration,

    /// Connect timeout
    pub connect_timeout: Duration,

    /// Greeting seeded into every fresh transcript
    pub greeting: String,

    /// How long the thank-you card stays up
    pub thanks_delay: Duration,

    /// Probe `/health` on start
    pub health_check_on_start: bool,

    /// Path to the config file that was loaded (if any)
    pub config_file_path: Option<PathBuf>,

    source: ConfigSource,
}

impl Default for CabinConfig {
    fn default() -> Self {
        let backend = BackendConfig::default();
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: backend.request_timeout,
            connect_timeout: backend.connect_timeout,
            greeting: DEFAULT_GREETING.to_string(),
            thanks_delay: DEFAULT_THANKS_DELAY,
            health_check_on_start: true,
            config_file_path: None,
            source: ConfigSource::Default,
        }
    }
}

impl CabinConfig {
    /// Create a new configuration with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the highest-priority layer that contributed a value
    #[must_use]
    pub fn source(&self) -> ConfigSource {
        self.source
    }

    /// Set the configuration source
    pub fn set_source(&mut self, source: ConfigSource) {
        self.source = source;
    }

    /// Backend client settings
    #[must_use]
    pub fn backend(&self) -> BackendConfig {
        BackendConfig::new(self.base_url.clone())
            .with_request_timeout(self.request_timeout)
            .with_connect_timeout(self.connect_timeout)
    }

    /// Reject values the rest of the system cannot work with
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] naming the offending value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigError::ValidationError(format!(
                "api.base_url must start with http:// or https:// (got {:?})",
                self.base_url
            )));
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::ValidationError(
                "api.request_timeout_ms must be greater than zero".to_string(),
            ));
        }
        if self.connect_timeout.is_zero() {
            return Err(ConfigError::ValidationError(
                "api.connect_timeout_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Configuration Loading
// =============================================================================

/// Get the default configuration file path
///
/// Returns `$XDG_CONFIG_HOME/cabin-assist/config.toml` or
/// `~/.config/cabin-assist/config.toml` if `XDG_CONFIG_HOME` is not set.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("cabin-assist").join("config.toml"))
}

/// Load configuration from all sources with proper priority
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be parsed.
/// A missing config file is not an error (defaults are used).
pub fn load_config() -> Result<CabinConfig, ConfigError> {
    load_config_from_path(default_config_path())
}

/// Load configuration from a specific path
///
/// # Arguments
///
/// * `path` - Optional path to the configuration file. If `None`, only defaults
///   and environment variables are used.
///
/// # Errors
///
/// Returns an error if the specified config file cannot be read or parsed.
pub fn load_config_from_path(path: Option<PathBuf>) -> Result<CabinConfig, ConfigError> {
    load_config_with_env(path, |key| std::env::var(key).ok())
}

/// Load configuration with an explicit environment lookup
///
/// # Errors
///
/// Returns an error if the specified config file cannot be read or parsed.
pub fn load_config_with_env<F>(path: Option<PathBuf>, lookup: F) -> Result<CabinConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = CabinConfig::default();

    if let Some(ref config_path) = path {
        if config_path.exists() {
            let toml_config = read_toml(config_path)?;
            apply_toml_config(&mut config, &toml_config);
            config.config_file_path = Some(config_path.clone());
            config.source = ConfigSource::File;

            tracing::info!(
                path = %config_path.display(),
                "Loaded configuration from file"
            );
        } else {
            tracing::debug!(
                path = %config_path.display(),
                "Config file not found, using defaults"
            );
        }
    }

    apply_env_config(&mut config, lookup);

    Ok(config)
}

fn read_toml(path: &Path) -> Result<CabinToml, ConfigError> {
    let toml_content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(toml::from_str(&toml_content)?)
}

/// Apply TOML configuration values to the config struct
fn apply_toml_config(config: &mut CabinConfig, toml: &CabinToml) {
    if let Some(ref url) = toml.api.base_url {
        config.base_url = url.clone();
    }
    if let Some(ms) = toml.api.request_timeout_ms {
        config.request_timeout = Duration::from_millis(ms);
    }
    if let Some(ms) = toml.api.connect_timeout_ms {
        config.connect_timeout = Duration::from_millis(ms);
    }
    if let Some(ref greeting) = toml.chat.greeting {
        config.greeting = greeting.clone();
    }
    if let Some(ms) = toml.feedback.thanks_delay_ms {
        config.thanks_delay = Duration::from_millis(ms);
    }
    if let Some(enabled) = toml.startup.health_check {
        config.health_check_on_start = enabled;
    }
}

/// Apply environment variable overrides to the config
///
/// Unparseable numeric values are ignored with a warning.
fn apply_env_config<F>(config: &mut CabinConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(env::API_URL) {
        config.base_url = url;
        config.source = ConfigSource::Env;
    }
    if let Some(ms) = parse_env_millis(&lookup, env::REQUEST_TIMEOUT_MS) {
        config.request_timeout = ms;
        config.source = ConfigSource::Env;
    }
    if let Some(ms) = parse_env_millis(&lookup, env::CONNECT_TIMEOUT_MS) {
        config.connect_timeout = ms;
        config.source = ConfigSource::Env;
    }
    if let Some(greeting) = lookup(env::GREETING) {
        config.greeting = greeting;
        config.source = ConfigSource::Env;
    }
    if let Some(ms) = parse_env_millis(&lookup, env::THANKS_DELAY_MS) {
        config.thanks_delay = ms;
        config.source = ConfigSource::Env;
    }
    if let Some(enabled) = lookup(env::HEALTH_CHECK) {
        config.health_check_on_start = enabled != "0" && enabled.to_lowercase() != "false";
        config.source = ConfigSource::Env;
    }
}

fn parse_env_millis<F>(lookup: &F, key: &str) -> Option<Duration>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse::<u64>() {
        Ok(ms) => Some(Duration::from_millis(ms)),
        Err(e) => {
            tracing::warn!(var = key, value = %raw, error = %e, "Ignoring invalid environment value");
            None
        }
    }
}

// =============================================================================
// CLI Override Support
// =============================================================================

/// Builder for applying CLI overrides to configuration
///
/// Use this after [`load_config`] to apply command-line argument overrides.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    /// Base URL override
    pub base_url: Option<String>,

    /// Thank-you delay override (milliseconds)
    pub thanks_delay_ms: Option<u64>,

    /// Health check on start override
    pub health_check: Option<bool>,
}

impl ConfigOverrides {
    /// Create a new empty set of overrides
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set base URL override
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set thank-you delay override
    #[must_use]
    pub fn with_thanks_delay_ms(mut self, ms: u64) -> Self {
        self.thanks_delay_ms = Some(ms);
        self
    }

    /// Set health check override
    #[must_use]
    pub fn with_health_check(mut self, enabled: bool) -> Self {
        self.health_check = Some(enabled);
        self
    }

    /// Whether any override is set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.base_url.is_none() && self.thanks_delay_ms.is_none() && self.health_check.is_none()
    }

    /// Apply overrides to a configuration
    pub fn apply(&self, config: &mut CabinConfig) {
        if !self.is_empty() {
            config.source = ConfigSource::Cli;
        }

        if let Some(ref url) = self.base_url {
            config.base_url = url.clone();
        }

        if let Some(ms) = self.thanks_delay_ms {
            config.thanks_delay = Duration::from_millis(ms);
        }

        if let Some(enabled) = self.health_check {
            config.health_check_on_start = enabled;
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
