//! Error types for probe operations.
//!
//! The probe converts almost every failure into a pass/fail sentinel at the
//! call site, so these types mostly travel a short distance: from the HTTP
//! layer to the stage that prints them. They still carry enough structure to
//! tell a refused connection from a timeout.

use std::time::Duration;
use thiserror::Error;

/// The main error type for all probe operations.
///
/// # Examples
///
/// ```rust
/// use mcp_probe_core::error::{McpError, TransportError};
///
/// let error = McpError::Transport(TransportError::ConnectionFailed {
///     endpoint: "/sse".to_string(),
///     reason: "connection refused".to_string(),
/// });
///
/// println!("Error: {}", error);
/// ```
#[derive(Error, Debug)]
pub enum McpError {
    /// Transport-related errors (connection, request, stream reads)
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Timeout errors for operations that exceed the client ceiling
    #[error("Operation timed out after {duration_ms}ms: {operation}")]
    Timeout {
        /// The operation that timed out
        operation: String,
        /// The timeout duration in milliseconds
        duration_ms: u64,
    },

    /// Configuration errors (invalid config files, bad URLs, etc.)
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        /// The underlying serde_json error
        source: serde_json::Error,
    },
}

/// Errors raised while talking to the server under test.
#[derive(Error, Debug, Clone)]
#[allow(missing_docs)]
pub enum TransportError {
    /// Could not reach the server at all
    #[error("Failed to connect to {endpoint}: {reason}")]
    ConnectionFailed { endpoint: String, reason: String },

    /// Request was sent but failed before a response arrived
    #[error("Request to {endpoint} failed: {reason}")]
    RequestFailed { endpoint: String, reason: String },

    /// Response body could not be read
    #[error("Failed to read response from {endpoint}: {reason}")]
    ReadFailed { endpoint: String, reason: String },

    /// HTTP-level error
    #[error("HTTP error: {status_code} - {reason}")]
    HttpError { status_code: u16, reason: String },

    /// The event stream broke off or carried an unreadable line
    #[error("SSE error: {reason}")]
    SseError { reason: String },
}

/// Configuration-related errors.
#[derive(Error, Debug, Clone)]
#[allow(missing_docs)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    /// Configuration file has invalid format
    #[error("Invalid configuration format in {path}: {reason}")]
    InvalidFormat { path: String, reason: String },

    /// Configuration parameter has invalid value
    #[error("Invalid value for parameter '{parameter}': {value} - {reason}")]
    InvalidValue {
        parameter: String,
        value: String,
        reason: String,
    },
}

/// Convenience type alias for Results using McpError.
pub type McpResult<T> = Result<T, McpError>;

impl McpError {
    /// Create a new timeout error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mcp_probe_core::error::McpError;
    /// use std::time::Duration;
    ///
    /// let error = McpError::timeout("GET /health", Duration::from_secs(30));
    /// assert_eq!(error.category(), "timeout");
    /// ```
    pub fn timeout(operation: impl Into<String>, duration: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration_ms: duration.as_millis() as u64,
        }
    }

    /// Build an error from a failed `reqwest` call against `endpoint`.
    ///
    /// The timeout is passed in because `reqwest` does not report which
    /// ceiling fired.
    pub fn from_request(endpoint: &str, err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            McpError::timeout(endpoint, timeout)
        } else if err.is_connect() {
            McpError::Transport(TransportError::ConnectionFailed {
                endpoint: endpoint.to_string(),
                reason: err.to_string(),
            })
        } else if err.is_body() || err.is_decode() {
            McpError::Transport(TransportError::ReadFailed {
                endpoint: endpoint.to_string(),
                reason: err.to_string(),
            })
        } else if let Some(status) = err.status() {
            McpError::Transport(TransportError::HttpError {
                status_code: status.as_u16(),
                reason: err.to_string(),
            })
        } else {
            McpError::Transport(TransportError::RequestFailed {
                endpoint: endpoint.to_string(),
                reason: err.to_string(),
            })
        }
    }

    /// Get the error category for this error.
    pub fn category(&self) -> &'static str {
        match self {
            McpError::Transport(_) => "transport",
            McpError::Timeout { .. } => "timeout",
            McpError::Config(_) => "config",
            McpError::Serialization { .. } => "serialization",
        }
    }
}

impl From<url::ParseError> for McpError {
    fn from(err: url::ParseError) -> Self {
        McpError::Config(ConfigError::InvalidValue {
            parameter: "url".to_string(),
            value: err.to_string(),
            reason: "Invalid URL format".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = McpError::timeout("GET /sse", Duration::from_secs(30));
        assert_eq!(error.to_string(), "Operation timed out after 30000ms: GET /sse");
    }

    #[test]
    fn test_error_categories() {
        let timeout = McpError::timeout("test", Duration::from_secs(30));
        assert_eq!(timeout.category(), "timeout");

        let transport_error = McpError::Transport(TransportError::ConnectionFailed {
            endpoint: "/health".to_string(),
            reason: "connection refused".to_string(),
        });
        assert_eq!(transport_error.category(), "transport");
        assert_eq!(
            transport_error.to_string(),
            "Transport error: Failed to connect to /health: connection refused"
        );

        let stream_error = McpError::from(TransportError::SseError {
            reason: "Max line length exceeded".to_string(),
        });
        assert_eq!(stream_error.category(), "transport");
        assert_eq!(
            stream_error.to_string(),
            "Transport error: SSE error: Max line length exceeded"
        );
    }

    #[test]
    fn test_url_parse_error_is_config() {
        let err: McpError = url::Url::parse("not a url").unwrap_err().into();
        assert_eq!(err.category(), "config");
    }
}
