//! Configuration management for Swarmchat
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{Result, SwarmchatError};
use crate::extractor::BlockSelection;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Main configuration structure for Swarmchat
///
/// Holds the gateway settings and the interactive chat behavior.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Remote gateway configuration
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Interactive chat configuration
    #[serde(default)]
    pub chat: ChatConfig,
}

/// Remote gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Model to request from the gateway
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature (0.0 to 2.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Optional API base URL (useful for tests and local mocks)
    ///
    /// When set, this base is used to build the streaming endpoint, which
    /// allows tests to point the gateway at a mock server.
    #[serde(default)]
    pub api_base: Option<String>,

    /// Environment variable holding the gateway credential
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            temperature: default_temperature(),
            api_base: None,
            api_key_env: default_api_key_env(),
        }
    }
}

/// Interactive chat configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Pause between agent hand-off phase labels, in milliseconds
    ///
    /// Zero disables the pause without changing anything downstream.
    #[serde(default = "default_handoff_interval_ms")]
    pub handoff_interval_ms: u64,

    /// Which fenced json block to use when a response has several:
    /// "first" or "last"
    #[serde(default = "default_block_selection")]
    pub block_selection: String,
}

fn default_handoff_interval_ms() -> u64 {
    800
}

fn default_block_selection() -> String {
    "last".to_string()
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            handoff_interval_ms: default_handoff_interval_ms(),
            block_selection: default_block_selection(),
        }
    }
}

impl ChatConfig {
    /// Hand-off pause as a [`Duration`]
    pub fn handoff_interval(&self) -> Duration {
        Duration::from_millis(self.handoff_interval_ms)
    }

    /// Parsed block selection policy
    ///
    /// Falls back to the default when the configured string is invalid;
    /// `validate` rejects such configs up front.
    pub fn selection(&self) -> BlockSelection {
        BlockSelection::parse_str(&self.block_selection).unwrap_or_default()
    }
}

impl Config {
    /// Load configuration from a file, with environment overrides
    ///
    /// A missing file is not an error: defaults are used so the client
    /// runs with nothing but the credential in the environment.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Errors
    ///
    /// Returns error if an existing file cannot be read or parsed
    pub fn load(path: &str) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| SwarmchatError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| SwarmchatError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(model) = std::env::var("SWARMCHAT_MODEL") {
            self.gateway.model = model;
        }

        if let Ok(api_base) = std::env::var("SWARMCHAT_API_BASE") {
            self.gateway.api_base = Some(api_base);
        }

        if let Ok(interval) = std::env::var("SWARMCHAT_HANDOFF_INTERVAL_MS") {
            if let Ok(value) = interval.parse() {
                self.chat.handoff_interval_ms = value;
            } else {
                tracing::warn!("Invalid SWARMCHAT_HANDOFF_INTERVAL_MS: {}", interval);
            }
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns [`SwarmchatError::Config`] for out-of-range or malformed
    /// values
    pub fn validate(&self) -> Result<()> {
        if self.gateway.model.is_empty() {
            return Err(SwarmchatError::Config("gateway.model cannot be empty".to_string()).into());
        }

        if !(0.0..=2.0).contains(&self.gateway.temperature) {
            return Err(SwarmchatError::Config(
                "gateway.temperature must be between 0.0 and 2.0".to_string(),
            )
            .into());
        }

        if self.gateway.api_key_env.is_empty() {
            return Err(
                SwarmchatError::Config("gateway.api_key_env cannot be empty".to_string()).into(),
            );
        }

        if BlockSelection::parse_str(&self.chat.block_selection).is_err() {
            return Err(SwarmchatError::Config(format!(
                "chat.block_selection must be 'first' or 'last', got '{}'",
                self.chat.block_selection
            ))
            .into());
        }

        Ok(())
    }
}
