//! Configuration models for didact.
//!
//! All I^R (resolvable ignorance) is parameterized here.
//! The user resolves these unknowns at runtime via config file.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Top-level configuration for didact.
///
/// I^R resolved: All configurable parameters are explicit, and every field
/// has a default so a missing config file still yields a working setup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Generation endpoint configuration
    #[serde(default)]
    pub model: ModelConfig,

    /// Retry policy for generation calls
    #[serde(default)]
    pub retry: RetryConfig,

    /// Session defaults for the interactive loop
    #[serde(default)]
    pub session: SessionConfig,
}

/// Generation endpoint configuration.
///
/// K_i: The endpoint must be OpenAI-compatible (chat completions API).
/// The default points at Gemini's OpenAI-compatibility endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// API key (can also be set via the `api_key_env` env var)
    #[serde(default)]
    pub api_key: Option<String>,

    /// Environment variable name for the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Base URL for the API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model ID (e.g. "gemini-2.0-flash")
    #[serde(default = "default_model_id")]
    pub id: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Maximum tokens per completion
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// Optional system prompt prepended to every request
    #[serde(default)]
    pub system_prompt: Option<String>,
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta/openai".to_string()
}

fn default_model_id() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_timeout() -> u64 {
    60
}

fn default_max_tokens() -> u32 {
    4096
}

fn default_temperature() -> f64 {
    0.7
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_key_env: default_api_key_env(),
            base_url: default_base_url(),
            id: default_model_id(),
            timeout_secs: default_timeout(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            system_prompt: None,
        }
    }
}

/// Retry policy configuration.
///
/// I^B bounded: the retry budget caps how long one call can stall.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum generation attempts per call
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Base backoff delay in milliseconds; attempt k waits base * (k + 1)
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
}

fn default_max_attempts() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    1000
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
        }
    }
}

impl RetryConfig {
    /// Base backoff delay as a Duration.
    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }
}

/// Defaults for the interactive session command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Default subject when none is given on the command line
    #[serde(default = "default_subject")]
    pub subject: String,

    /// Default learner level
    #[serde(default = "default_level")]
    pub level: String,
}

fn default_subject() -> String {
    "Python Programming".to_string()
}

fn default_level() -> String {
    "beginner".to_string()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            subject: default_subject(),
            level: default_level(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// B_i(file exists) → Result
    /// B_i(file is valid TOML) → Result
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_owned(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_owned(),
            source: e,
        })
    }

    /// Load from a file if it exists, otherwise fall back to defaults.
    pub fn from_file_or_default(path: &std::path::Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Resolve the API key from config or environment.
    ///
    /// B_i(api key available) → Result
    pub fn resolve_api_key(&self) -> Result<String, ConfigError> {
        // First check explicit api_key in config
        if let Some(key) = &self.model.api_key {
            return Ok(expand_env_vars(key));
        }

        // Then check environment variable
        std::env::var(&self.model.api_key_env).map_err(|_| ConfigError::MissingApiKey {
            env_var: self.model.api_key_env.clone(),
        })
    }
}

/// Expand environment variables in a string.
///
/// Supports ${VAR_NAME} syntax.
/// If the variable is not set, the placeholder is left unchanged.
pub fn expand_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    let re = regex::Regex::new(r"\$\{([^}]+)\}").unwrap();

    for cap in re.captures_iter(s) {
        let var_name = &cap[1];
        if let Ok(value) = std::env::var(var_name) {
            result = result.replace(&cap[0], &value);
        }
    }

    result
}

/// Configuration errors.
///
/// Epistemic origin:
/// - B_i falsified: File not found, parse error
/// - I^B materialized: Missing required values
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Missing API key: set {env_var} env var or api_key in config")]
    MissingApiKey { env_var: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_toml_yields_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.retry.base_delay_ms, 1000);
        assert_eq!(config.model.api_key_env, "GEMINI_API_KEY");
        assert_eq!(config.model.id, "gemini-2.0-flash");
    }

    #[test]
    fn partial_toml_overrides_only_named_fields() {
        let config: Config = toml::from_str(
            r#"
            [model]
            id = "gemini-2.5-pro"
            timeout_secs = 30

            [retry]
            max_attempts = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.model.id, "gemini-2.5-pro");
        assert_eq!(config.model.timeout_secs, 30);
        assert_eq!(config.retry.max_attempts, 5);
        // untouched field keeps its default
        assert_eq!(config.retry.base_delay_ms, 1000);
    }

    #[test]
    fn from_file_reads_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[model]\nid = \"test-model\"").unwrap();
        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.model.id, "test-model");
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config =
            Config::from_file_or_default(std::path::Path::new("/nonexistent/didact.toml")).unwrap();
        assert_eq!(config.retry.max_attempts, 3);
    }

    #[test]
    fn explicit_api_key_wins_over_env() {
        let mut config = Config::default();
        config.model.api_key = Some("sk-explicit".to_string());
        assert_eq!(config.resolve_api_key().unwrap(), "sk-explicit");
    }

    #[test]
    fn missing_api_key_is_reported_with_env_var_name() {
        let mut config = Config::default();
        config.model.api_key_env = "DIDACT_TEST_KEY_THAT_IS_NOT_SET".to_string();
        let err = config.resolve_api_key().unwrap_err();
        assert!(err.to_string().contains("DIDACT_TEST_KEY_THAT_IS_NOT_SET"));
    }
}
