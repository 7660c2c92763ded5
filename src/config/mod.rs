//! Server configuration.
//!
//! Configuration is read once at startup from environment variables (with
//! `.env` support via dotenvy in `main`). The upstream credential is
//! optional on purpose: a gateway without a key still serves, and rejects
//! each session with an error frame instead of failing to boot.

use std::env;
use thiserror::Error;

use crate::core::live::DEFAULT_GEMINI_MODEL;

/// Default bind host
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default bind port
pub const DEFAULT_PORT: u16 = 3000;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable holds an unparseable value
    #[error("Invalid value for {var}: {message}")]
    InvalidVar { var: &'static str, message: String },
}

/// Server configuration, sourced from the environment.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind host (`HOST`)
    pub host: String,

    /// Bind port (`PORT`)
    pub port: u16,

    /// Google API key for the Gemini Live API (`GOOGLE_API_KEY`).
    /// Empty values are treated as unset.
    pub google_api_key: Option<String>,

    /// Gemini model used for every session (`GEMINI_MODEL`)
    pub gemini_model: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            google_api_key: None,
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables, falling back to
    /// defaults for everything except the credential.
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());

        let port = match env::var("PORT") {
            Ok(value) => value.parse().map_err(|e| ConfigError::InvalidVar {
                var: "PORT",
                message: format!("{e}"),
            })?,
            Err(_) => DEFAULT_PORT,
        };

        let google_api_key = env::var("GOOGLE_API_KEY")
            .ok()
            .filter(|key| !key.is_empty());

        let gemini_model =
            env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.to_string());

        Ok(Self {
            host,
            port,
            google_api_key,
            gemini_model,
        })
    }

    /// Bind address string for the listener.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert!(config.google_api_key.is_none());
        assert_eq!(config.gemini_model, DEFAULT_GEMINI_MODEL);
    }

    #[test]
    fn test_address_formatting() {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            ..Default::default()
        };
        assert_eq!(config.address(), "127.0.0.1:8080");
    }
}
