//! Configuration management for Recall.
//!
//! This module handles loading and merging configuration from multiple
//! sources:
//! - Environment variables
//! - Command-line flags
//! - Config files (recall.yaml)
//!
//! The resulting [`AppConfig`] holds the two process-lifetime collaborator
//! configurations (search backend, model backend). It is built once at
//! startup and never mutated afterwards, which makes it safe to share
//! across concurrent pipeline invocations.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{AppError, AppResult};

/// Default search backend endpoint.
pub const DEFAULT_SEARCH_ENDPOINT: &str = "http://localhost:8000";

/// Default model provider.
pub const DEFAULT_PROVIDER: &str = "openai";

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "gpt-4.1";

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Search backend base URL
    pub search_endpoint: String,

    /// Bearer credential for the search backend
    pub search_api_key: Option<String>,

    /// Model provider (e.g., "openai")
    pub provider: String,

    /// Model identifier
    pub model: String,

    /// Optional custom model backend URL
    pub model_endpoint: Option<String>,

    /// API key for the model provider
    pub model_api_key: Option<String>,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,
}

/// Full configuration file structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ConfigFile {
    search: Option<SearchFileConfig>,
    llm: Option<LlmFileConfig>,
    logging: Option<LoggingFileConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SearchFileConfig {
    endpoint: Option<String>,
    #[serde(rename = "apiKeyEnv")]
    api_key_env: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LlmFileConfig {
    provider: Option<String>,
    model: Option<String>,
    endpoint: Option<String>,
    #[serde(rename = "apiKeyEnv")]
    api_key_env: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingFileConfig {
    level: Option<String>,
    color: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_file: None,
            search_endpoint: DEFAULT_SEARCH_ENDPOINT.to_string(),
            search_api_key: None,
            provider: DEFAULT_PROVIDER.to_string(),
            model: DEFAULT_MODEL.to_string(),
            model_endpoint: None,
            model_api_key: None,
            log_level: None,
            verbose: false,
            no_color: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables and defaults.
    ///
    /// Environment variables:
    /// - `RECALL_CONFIG`: Path to config file (default: ./recall.yaml)
    /// - `RECALL_SEARCH_URL`: Search backend base URL
    /// - `RECALL_SEARCH_API_KEY`: Search backend credential
    /// - `RECALL_PROVIDER`: Model provider
    /// - `RECALL_MODEL`: Model identifier
    /// - `RECALL_MODEL_URL`: Custom model backend URL
    /// - `RECALL_MODEL_API_KEY` / `OPENAI_API_KEY`: Model credential
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    ///
    /// Environment variables take precedence over the config file.
    pub fn load() -> AppResult<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an explicit config file path.
    ///
    /// An explicit path (e.g. from a CLI flag) takes precedence over the
    /// `RECALL_CONFIG` environment variable.
    pub fn load_from(config_file: Option<PathBuf>) -> AppResult<Self> {
        let mut config = Self::default();

        config.config_file = config_file;
        if config.config_file.is_none() {
            if let Ok(path) = std::env::var("RECALL_CONFIG") {
                config.config_file = Some(PathBuf::from(path));
            }
        }

        // Merge the YAML config file if one exists
        let config_path = config
            .config_file
            .clone()
            .unwrap_or_else(|| PathBuf::from("recall.yaml"));

        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
        }

        // Environment variables override YAML config
        if let Ok(endpoint) = std::env::var("RECALL_SEARCH_URL") {
            config.search_endpoint = endpoint;
        }

        if let Ok(key) = std::env::var("RECALL_SEARCH_API_KEY") {
            config.search_api_key = Some(key);
        }

        if let Ok(provider) = std::env::var("RECALL_PROVIDER") {
            config.provider = provider;
        }

        if let Ok(model) = std::env::var("RECALL_MODEL") {
            config.model = model;
        }

        if let Ok(endpoint) = std::env::var("RECALL_MODEL_URL") {
            config.model_endpoint = Some(endpoint);
        }

        if let Ok(key) = std::env::var("RECALL_MODEL_API_KEY") {
            config.model_api_key = Some(key);
        } else if config.model_api_key.is_none() {
            config.model_api_key = std::env::var("OPENAI_API_KEY").ok();
        }

        config.log_level = std::env::var("RUST_LOG").ok().or(config.log_level);

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge a YAML configuration file into this config.
    ///
    /// Credentials are never stored in the file itself; the file names the
    /// environment variable that holds them (`apiKeyEnv`).
    fn merge_yaml(&self, path: &PathBuf) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        let mut result = self.clone();

        if let Some(search) = config_file.search {
            if let Some(endpoint) = search.endpoint {
                result.search_endpoint = endpoint;
            }
            if let Some(env_var) = search.api_key_env {
                if let Ok(key) = std::env::var(&env_var) {
                    result.search_api_key = Some(key);
                }
            }
        }

        if let Some(llm) = config_file.llm {
            if let Some(provider) = llm.provider {
                result.provider = provider;
            }
            if let Some(model) = llm.model {
                result.model = model;
            }
            if let Some(endpoint) = llm.endpoint {
                result.model_endpoint = Some(endpoint);
            }
            if let Some(env_var) = llm.api_key_env {
                if let Ok(key) = std::env::var(&env_var) {
                    result.model_api_key = Some(key);
                }
            }
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// CLI flags take precedence over environment variables and the
    /// config file.
    pub fn with_overrides(
        mut self,
        provider: Option<String>,
        model: Option<String>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(provider) = provider {
            self.provider = provider;
        }

        if let Some(model) = model {
            self.model = model;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Validate configuration for the active provider.
    pub fn validate(&self) -> AppResult<()> {
        let known_providers = ["openai"];

        if !known_providers.contains(&self.provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown provider: {}. Supported: {}",
                self.provider,
                known_providers.join(", ")
            )));
        }

        if self.search_endpoint.trim().is_empty() {
            return Err(AppError::Config(
                "Search endpoint must not be empty".to_string(),
            ));
        }

        if self.model_api_key.is_none() {
            return Err(AppError::Config(
                "Model API key not found. Set RECALL_MODEL_API_KEY or OPENAI_API_KEY".to_string(),
            ));
        }

        Ok(())
    }
}
