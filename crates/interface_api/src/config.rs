//! Client configuration

use std::path::PathBuf;

use serde::Deserialize;

use crate::error::ApiError;

/// Client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Backend base URL including the `/api` prefix
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Log level
    pub log_level: String,
    /// Where the session is kept between runs; `None` keeps it in memory
    #[serde(default)]
    pub session_file: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api".to_string(),
            timeout_secs: 30,
            log_level: "info".to_string(),
            session_file: None,
        }
    }
}

impl ClientConfig {
    /// Loads configuration from `CLAIMS_*` environment variables over the defaults
    pub fn from_env() -> Result<Self, ApiError> {
        let defaults = Self::default();
        let config = config::Config::builder()
            .set_default("base_url", defaults.base_url)?
            .set_default("timeout_secs", defaults.timeout_secs)?
            .set_default("log_level", defaults.log_level)?
            .add_source(config::Environment::with_prefix("CLAIMS"))
            .build()?
            .try_deserialize()?;
        Ok(config)
    }

    /// Configuration pointing at another backend
    pub fn for_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:8080/api");
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.log_level, "info");
        assert!(config.session_file.is_none());
    }

    #[test]
    fn test_for_base_url_keeps_other_defaults() {
        let config = ClientConfig::for_base_url("http://127.0.0.1:9000/api");
        assert_eq!(config.base_url, "http://127.0.0.1:9000/api");
        assert_eq!(config.timeout_secs, 30);
    }
}
