//! Configuration loading from waypoint.toml.

use policy::Policy;
use serde::Deserialize;
use std::path::Path;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Backend configuration.
    #[serde(default)]
    pub backend: BackendConfig,

    /// Guard policy rules.
    #[serde(flatten)]
    pub policy: Policy,

    /// Loop limits.
    #[serde(default)]
    pub limits: Limits,
}

/// Backend provider configuration.
#[derive(Debug, Deserialize)]
pub struct BackendConfig {
    /// Provider name (currently only "openai" supported).
    #[serde(default = "default_provider")]
    #[allow(dead_code)]
    pub provider: String,

    /// Model to use.
    #[serde(default = "default_model")]
    pub model: String,

    /// API key; falls back to the OPENAI_API_KEY environment variable.
    pub api_key: Option<String>,

    /// Base URL for an OpenAI-compatible server.
    pub base_url: Option<String>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            api_key: None,
            base_url: None,
        }
    }
}

/// Loop limits.
#[derive(Debug, Deserialize)]
pub struct Limits {
    /// Step budget for the revision loop.
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_steps: default_max_steps(),
        }
    }
}

fn default_provider() -> String {
    "openai".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_max_steps() -> usize {
    engine::DEFAULT_MAX_STEPS
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML string.
    pub fn parse(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Resolve the API key from config or environment.
    pub fn api_key(&self) -> Result<String, ConfigError> {
        if let Some(key) = &self.backend.api_key {
            return Ok(key.clone());
        }
        std::env::var("OPENAI_API_KEY").map_err(|_| ConfigError::MissingApiKey)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("no API key configured: set backend.api_key or OPENAI_API_KEY")]
    MissingApiKey,
}
