//! Configuration loading and validation for Slugline.
//!
//! Loads configuration from `~/.slugline/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.slugline/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Completion provider settings
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Agent loop settings
    #[serde(default)]
    pub agent: AgentConfig,

    /// Gateway configuration
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Named writing-voice system prompts, selectable per request
    #[serde(default)]
    pub voices: HashMap<String, String>,
}

/// Settings for the LLM provider backing both agent phases.
#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Provider kind. Only "anthropic" is supported.
    #[serde(default = "default_provider_kind")]
    pub kind: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// API base URL override (for proxies)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

fn default_provider_kind() -> String {
    "anthropic".into()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: default_provider_kind(),
            api_key: None,
            base_url: None,
        }
    }
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("kind", &self.kind)
            .field("api_key", &redact(&self.api_key))
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Agent loop settings: the iteration cap and the two phase profiles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Hard cap on execution loop iterations
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,

    /// Planning phase model profile
    #[serde(default = "PhaseConfig::plan_defaults")]
    pub plan: PhaseConfig,

    /// Execution phase model profile
    #[serde(default = "PhaseConfig::execute_defaults")]
    pub execute: PhaseConfig,
}

fn default_max_iterations() -> u32 {
    20
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            plan: PhaseConfig::plan_defaults(),
            execute: PhaseConfig::execute_defaults(),
        }
    }
}

/// Model profile for one agent phase.
///
/// Planning and execution each get their own model, temperature, and token
/// budget; the planning defaults run cooler and shorter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseConfig {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl PhaseConfig {
    pub fn plan_defaults() -> Self {
        Self {
            model: default_model(),
            temperature: 0.2,
            max_tokens: 2048,
        }
    }

    pub fn execute_defaults() -> Self {
        Self {
            model: default_model(),
            temperature: 0.7,
            max_tokens: 4096,
        }
    }
}

fn default_model() -> String {
    "claude-sonnet-4-5".into()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,
}

fn default_port() -> u16 {
    7787
}
fn default_host() -> String {
    "127.0.0.1".into()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.slugline/config.toml),
    /// or from `SLUGLINE_CONFIG` if set.
    ///
    /// Also checks environment variables for the API key:
    /// - `SLUGLINE_API_KEY` (highest priority)
    /// - `ANTHROPIC_API_KEY`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = match std::env::var("SLUGLINE_CONFIG") {
            Ok(path) => PathBuf::from(path),
            Err(_) => Self::config_dir().join("config.toml"),
        };
        let mut config = Self::load_from(&config_path)?;

        // Environment variable overrides (highest priority)
        if let Some(key) = std::env::var("SLUGLINE_API_KEY")
            .ok()
            .or_else(|| std::env::var("ANTHROPIC_API_KEY").ok())
        {
            config.provider.api_key = Some(key);
        }

        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".slugline")
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        for (phase, cfg) in [("plan", &self.agent.plan), ("execute", &self.agent.execute)] {
            if cfg.temperature < 0.0 || cfg.temperature > 2.0 {
                return Err(ConfigError::ValidationError(format!(
                    "agent.{phase}.temperature must be between 0.0 and 2.0"
                )));
            }
            if cfg.model.is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "agent.{phase}.model must not be empty"
                )));
            }
        }

        if self.agent.max_iterations == 0 {
            return Err(ConfigError::ValidationError(
                "agent.max_iterations must be at least 1".into(),
            ));
        }

        Ok(())
    }

    /// Check if an API key is available (from config or environment).
    pub fn has_api_key(&self) -> bool {
        self.provider.api_key.is_some()
    }

    /// Generate a default config TOML string (for `init` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.provider.kind, "anthropic");
        assert_eq!(config.agent.max_iterations, 20);
        assert_eq!(config.gateway.port, 7787);
    }

    #[test]
    fn phase_defaults_differ() {
        let config = AppConfig::default();
        assert!(config.agent.plan.temperature < config.agent.execute.temperature);
        assert!(config.agent.plan.max_tokens < config.agent.execute.max_tokens);
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.provider.kind, config.provider.kind);
        assert_eq!(parsed.gateway.port, config.gateway.port);
        assert_eq!(parsed.agent.plan.model, config.agent.plan.model);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r#"
[provider]
api_key = "sk-ant-test"

[agent.execute]
model = "claude-opus-4-1"
temperature = 0.9
max_tokens = 8192
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.provider.api_key.as_deref(), Some("sk-ant-test"));
        assert_eq!(config.agent.execute.model, "claude-opus-4-1");
        assert_eq!(config.agent.plan.model, default_model());
        assert_eq!(config.agent.max_iterations, 20);
    }

    #[test]
    fn voices_parse_as_map() {
        let toml_str = r#"
[voices]
noir = "Write terse, hard-boiled dialogue."
sitcom = "Write fast, joke-dense dialogue."
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.voices.len(), 2);
        assert!(config.voices["noir"].contains("hard-boiled"));
    }

    #[test]
    fn invalid_temperature_rejected() {
        let mut config = AppConfig::default();
        config.agent.execute.temperature = 5.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_iterations_rejected() {
        let mut config = AppConfig::default();
        config.agent.max_iterations = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let result = AppConfig::load_from(Path::new("/nonexistent/config.toml"));
        assert!(result.is_ok());
        assert_eq!(result.unwrap().gateway.port, 7787);
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let config = ProviderConfig {
            kind: "anthropic".into(),
            api_key: Some("sk-ant-secret".into()),
            base_url: None,
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-ant-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn default_toml_generation() {
        let toml_str = AppConfig::default_toml();
        assert!(toml_str.contains("anthropic"));
        assert!(toml_str.contains("7787"));
    }
}
