//! Parameters for the MCP `initialize` request.
//!
//! # Examples
//!
//! ```rust
//! use mcp_probe_core::messages::InitializeRequest;
//!
//! let request = InitializeRequest::probe_default("test-client", "1.0.0");
//! assert_eq!(request.protocol_version.as_str(), "2024-11-05");
//! ```

use super::{
    Capabilities, Implementation, ProtocolVersion, RootsCapabilities, SamplingCapabilities,
};
use serde::{Deserialize, Serialize};

/// Client-to-server initialization request parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitializeRequest {
    /// Protocol version requested by the client
    #[serde(rename = "protocolVersion")]
    pub protocol_version: ProtocolVersion,

    /// Capabilities offered by the client
    pub capabilities: Capabilities,

    /// Information about the client implementation
    #[serde(rename = "clientInfo")]
    pub client_info: Implementation,
}

impl InitializeRequest {
    /// Create a new initialization request.
    pub fn new(
        protocol_version: ProtocolVersion,
        capabilities: Capabilities,
        client_info: Implementation,
    ) -> Self {
        Self {
            protocol_version,
            capabilities,
            client_info,
        }
    }

    /// The request the probe sends: protocol `2024-11-05`, roots with
    /// change notifications, and an empty sampling capability.
    pub fn probe_default(
        client_name: impl Into<String>,
        client_version: impl Into<String>,
    ) -> Self {
        let capabilities = Capabilities {
            roots: Some(RootsCapabilities {
                list_changed: Some(true),
            }),
            sampling: Some(SamplingCapabilities {}),
        };

        Self::new(
            ProtocolVersion::V2024_11_05,
            capabilities,
            Implementation::new(client_name, client_version),
        )
    }
}
