//! Probe configuration.
//!
//! Every field has a default matching the classic probe run against a local
//! server, so an empty file (or no file) gives the stock behaviour.
//!
//! # Examples
//!
//! ```rust
//! use mcp_probe_core::config::ProbeConfig;
//! use std::time::Duration;
//!
//! let config = ProbeConfig::default();
//! assert_eq!(config.base_url.as_str(), "http://localhost:8000/");
//! assert_eq!(config.timeout, Duration::from_secs(30));
//!
//! let url = config.messages_url("deadbeef").unwrap();
//! assert_eq!(url.as_str(), "http://localhost:8000/messages/?session_id=deadbeef");
//! ```

use crate::error::{ConfigError, McpResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Base URL used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

const HEALTH_PATH: &str = "health";
const SSE_PATH: &str = "sse";
const MESSAGES_PATH: &str = "messages/";

/// Settings for one probe run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Server root; endpoint paths are joined onto it
    pub base_url: Url,

    /// Ceiling for each HTTP operation, including streamed bodies
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,

    /// Pause between the health check and the SSE connect
    #[serde(with = "humantime_serde")]
    pub settle_delay: Duration,

    /// `clientInfo.name` sent with `initialize`
    pub client_name: String,

    /// `clientInfo.version` sent with `initialize`
    pub client_version: String,

    /// How many tools to print before summarising the rest
    pub tool_preview_limit: usize,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout: Duration::from_secs(30),
            settle_delay: Duration::from_secs(2),
            client_name: "test-client".to_string(),
            client_version: "1.0.0".to_string(),
            tool_preview_limit: 5,
        }
    }
}

fn default_base_url() -> Url {
    Url::parse(DEFAULT_BASE_URL).unwrap_or_else(|_| unreachable!("default base URL is valid"))
}

impl ProbeConfig {
    /// Configuration pointed at a different server.
    pub fn with_base_url(base_url: impl AsRef<str>) -> McpResult<Self> {
        let config = Self {
            base_url: parse_base_url(base_url.as_ref())?,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Set the settle delay.
    pub fn settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    /// Set the HTTP timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> McpResult<()> {
        if !matches!(self.base_url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidValue {
                parameter: "base_url".to_string(),
                value: self.base_url.to_string(),
                reason: "Only http and https URLs are supported".to_string(),
            }
            .into());
        }

        if self.base_url.cannot_be_a_base() {
            return Err(ConfigError::InvalidValue {
                parameter: "base_url".to_string(),
                value: self.base_url.to_string(),
                reason: "URL cannot be used as a base".to_string(),
            }
            .into());
        }

        if self.timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                parameter: "timeout".to_string(),
                value: format!("{:?}", self.timeout),
                reason: "Timeout must be greater than zero".to_string(),
            }
            .into());
        }

        Ok(())
    }

    /// Load configuration from a file.
    ///
    /// Supports JSON, YAML, and TOML formats based on file extension.
    pub fn from_file(path: impl AsRef<Path>) -> McpResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|_e| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let invalid = |reason: String| ConfigError::InvalidFormat {
            path: path.display().to_string(),
            reason,
        };

        let mut config: Self = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::from_str(&content).map_err(|e| invalid(e.to_string()))?,
            Some("yaml") | Some("yml") => {
                serde_yaml::from_str(&content).map_err(|e| invalid(e.to_string()))?
            }
            Some("toml") => toml::from_str(&content).map_err(|e| invalid(e.to_string()))?,
            _ => {
                return Err(
                    invalid("Unsupported file format. Use .json, .yaml, or .toml".to_string())
                        .into(),
                )
            }
        };

        config.base_url = with_trailing_slash(config.base_url);
        config.validate()?;
        Ok(config)
    }

    /// `GET` target for the liveness check.
    pub fn health_url(&self) -> McpResult<Url> {
        Ok(self.base_url.join(HEALTH_PATH)?)
    }

    /// `GET` target for the event stream.
    pub fn sse_url(&self) -> McpResult<Url> {
        Ok(self.base_url.join(SSE_PATH)?)
    }

    /// `POST` target for JSON-RPC messages bound to `session_id`.
    pub fn messages_url(&self, session_id: &str) -> McpResult<Url> {
        let mut url = self.base_url.join(MESSAGES_PATH)?;
        url.query_pairs_mut().append_pair("session_id", session_id);
        Ok(url)
    }
}

fn parse_base_url(raw: &str) -> McpResult<Url> {
    let url = Url::parse(raw).map_err(|e| ConfigError::InvalidValue {
        parameter: "base_url".to_string(),
        value: raw.to_string(),
        reason: format!("Invalid URL: {}", e),
    })?;
    Ok(with_trailing_slash(url))
}

// `Url::join` replaces the last path segment unless the base ends in '/'.
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_endpoints() {
        let config = ProbeConfig::default();
        assert_eq!(config.health_url().unwrap().as_str(), "http://localhost:8000/health");
        assert_eq!(config.sse_url().unwrap().as_str(), "http://localhost:8000/sse");
        assert_eq!(
            config.messages_url("abc123").unwrap().as_str(),
            "http://localhost:8000/messages/?session_id=abc123"
        );
    }

    #[test]
    fn test_base_url_with_path_prefix() {
        let config = ProbeConfig::with_base_url("http://127.0.0.1:9000/mcp").unwrap();
        assert_eq!(config.sse_url().unwrap().as_str(), "http://127.0.0.1:9000/mcp/sse");
    }

    #[test]
    fn test_rejects_bad_urls() {
        assert!(ProbeConfig::with_base_url("not a url").is_err());
        assert!(ProbeConfig::with_base_url("ftp://localhost:8000").is_err());
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let config = ProbeConfig::default().timeout(Duration::ZERO);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
base_url = "http://localhost:9100"
timeout = "5s"
settle_delay = "250ms"
"#
        )
        .unwrap();

        let config = ProbeConfig::from_file(file.path()).unwrap();
        assert_eq!(config.base_url.as_str(), "http://localhost:9100/");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.settle_delay, Duration::from_millis(250));
        assert_eq!(config.client_name, "test-client");
        assert_eq!(config.tool_preview_limit, 5);
    }

    #[test]
    fn test_from_yaml_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "client_name: probe-ci\ntool_preview_limit: 10").unwrap();

        let config = ProbeConfig::from_file(file.path()).unwrap();
        assert_eq!(config.client_name, "probe-ci");
        assert_eq!(config.tool_preview_limit, 10);
        assert_eq!(config.base_url.as_str(), "http://localhost:8000/");
    }

    #[test]
    fn test_unsupported_extension() {
        let file = tempfile::Builder::new().suffix(".ini").tempfile().unwrap();
        let err = ProbeConfig::from_file(file.path()).unwrap_err();
        assert_eq!(err.category(), "config");
    }

    #[test]
    fn test_missing_file() {
        let err = ProbeConfig::from_file("/definitely/not/here.toml").unwrap_err();
        assert!(err.to_string().contains("not found"));
    }
}
