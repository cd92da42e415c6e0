//! HTTP plumbing shared by the probe stages.
//!
//! - [`build_http_client`]: one `reqwest::Client` per run, carrying the
//!   configured timeout
//! - [`sse`]: reading a session id out of the `/sse` event stream

pub mod sse;

pub use sse::{response_lines, scan_for_session, LineVerdict, SessionScan, MAX_LINE_BYTES};

use crate::config::ProbeConfig;
use crate::error::{McpResult, TransportError};
use reqwest::Client;

/// Build the HTTP client used for every request in a run.
pub fn build_http_client(config: &ProbeConfig) -> McpResult<Client> {
    Client::builder()
        .timeout(config.timeout)
        .user_agent(concat!("mcp-probe/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| {
            TransportError::RequestFailed {
                endpoint: config.base_url.to_string(),
                reason: format!("Failed to build HTTP client: {}", e),
            }
            .into()
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_build_client_with_custom_timeout() {
        let config = ProbeConfig::default().timeout(Duration::from_millis(250));
        assert!(build_http_client(&config).is_ok());
    }
}
