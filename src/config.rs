use serde::Deserialize;
use std::env;
use thiserror::Error;

/// Default base URL of the hosted generation service.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
/// Model used for every generation call unless overridden.
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable was not provided.
    #[error("Missing environment variable: {0}")]
    MissingVariable(String),
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

/// Runtime configuration for the Meetprep server.
///
/// Built once at process start and passed by reference to the client constructors, which copy
/// what they need; nothing mutates it afterwards.
#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    /// Bearer credential for the external generation service.
    pub openai_api_key: String,
    /// Base URL of the external API (files + chat completions live beneath it).
    pub openai_base_url: String,
    /// Model identifier used for every generation request.
    pub model: String,
    /// Optional override for the HTTP server port.
    pub server_port: Option<u16>,
}

impl Config {
    /// Load configuration from environment variables, performing validation along the way.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup. Blank values count as absent.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let required =
            |key: &str| optional(key).ok_or_else(|| ConfigError::MissingVariable(key.to_string()));

        Ok(Self {
            openai_api_key: required("OPENAI_API_KEY")?,
            openai_base_url: optional("OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: optional("MEETPREP_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            server_port: optional("SERVER_PORT")
                .map(|value| {
                    value
                        .parse()
                        .map_err(|_| ConfigError::InvalidValue("SERVER_PORT".into()))
                })
                .transpose()?,
        })
    }

    /// Apply a `.env` file when present, then read the environment.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let config = Self::from_env()?;
        tracing::debug!(
            base_url = %config.openai_base_url,
            model = %config.model,
            server_port = ?config.server_port,
            has_api_key = !config.openai_api_key.is_empty(),
            "Loaded configuration"
        );
        Ok(config)
    }
}
