//! MCP message types used by the probe.
//!
//! Only the slice of the protocol the probe actually sends or inspects is
//! modelled here:
//!
//! - **Core Messages**: the JSON-RPC 2.0 request envelope and its id
//! - **Initialization**: the `initialize` request parameters
//! - **Tools**: reading tool descriptors out of a `tools/list` reply
//!
//! # Examples
//!
//! ```rust
//! use mcp_probe_core::messages::{InitializeRequest, JsonRpcRequest};
//!
//! let init = InitializeRequest::probe_default("test-client", "1.0.0");
//! let request = JsonRpcRequest::with_random_id(
//!     "initialize",
//!     serde_json::to_value(init).unwrap(),
//! );
//! assert_eq!(request.method, "initialize");
//! ```

pub mod core;
pub mod initialization;
pub mod tools;

pub use core::*;
pub use initialization::*;
pub use tools::{ToolSummary, ToolsListing};

use serde::{Deserialize, Serialize};

/// MCP protocol version identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProtocolVersion {
    /// Legacy HTTP+SSE protocol revision, the one `/sse` servers speak
    #[serde(rename = "2024-11-05")]
    V2024_11_05,
}

impl ProtocolVersion {
    /// Get the string representation of the protocol version.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::V2024_11_05 => "2024-11-05",
        }
    }
}

impl Default for ProtocolVersion {
    fn default() -> Self {
        Self::V2024_11_05
    }
}

impl std::fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Client capabilities declared during initialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Capabilities {
    /// Client capability: can provide root directories for server operations
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roots: Option<RootsCapabilities>,

    /// Client capability: can handle sampling requests from server
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sampling: Option<SamplingCapabilities>,
}

/// Sampling-related capabilities (client-side).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SamplingCapabilities {}

/// Roots-related capabilities (client-side).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RootsCapabilities {
    /// Whether the client notifies the server when its roots change
    #[serde(rename = "listChanged", skip_serializing_if = "Option::is_none")]
    pub list_changed: Option<bool>,
}

/// Implementation information for client or server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Implementation {
    /// Name of the implementation (e.g., "test-client")
    pub name: String,

    /// Version of the implementation (e.g., "1.0.0")
    pub version: String,
}

impl Implementation {
    /// Create a new implementation info structure.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_protocol_version_serialization() {
        let value = serde_json::to_value(ProtocolVersion::V2024_11_05).unwrap();
        assert_eq!(value, json!("2024-11-05"));
        assert_eq!(ProtocolVersion::default().to_string(), "2024-11-05");

        let unknown = serde_json::from_value::<ProtocolVersion>(json!("2025-03-26"));
        assert!(unknown.is_err());
    }

    #[test]
    fn test_capabilities_wire_shape() {
        let caps = Capabilities {
            roots: Some(RootsCapabilities {
                list_changed: Some(true),
            }),
            sampling: Some(SamplingCapabilities {}),
        };

        assert_eq!(
            serde_json::to_value(caps).unwrap(),
            json!({"roots": {"listChanged": true}, "sampling": {}})
        );
    }

    #[test]
    fn test_empty_capabilities_serialize_to_empty_object() {
        assert_eq!(
            serde_json::to_value(Capabilities::default()).unwrap(),
            json!({})
        );
    }
}
