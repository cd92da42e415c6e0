//! Core JSON-RPC 2.0 message structures.
//!
//! The probe only ever sends requests and reads replies as loose JSON, so the
//! request envelope is the one strongly typed message here.
//!
//! # Examples
//!
//! ```rust
//! use mcp_probe_core::messages::core::JsonRpcRequest;
//! use serde_json::json;
//!
//! let request = JsonRpcRequest::with_random_id("tools/list", json!({}));
//! assert_eq!(request.jsonrpc, "2.0");
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// JSON-RPC 2.0 request message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    /// JSON-RPC version (always "2.0")
    pub jsonrpc: String,

    /// Unique identifier for request/response correlation
    pub id: RequestId,

    /// Method name being invoked
    pub method: String,

    /// Parameters for the method
    pub params: Value,
}

impl JsonRpcRequest {
    /// Create a new JSON-RPC request with the given ID, method, and parameters.
    pub fn new(id: impl Into<RequestId>, method: impl Into<String>, params: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id: id.into(),
            method: method.into(),
            params,
        }
    }

    /// Generate a new request with a random UUID as the ID.
    ///
    /// Every call produces a fresh id, which is all the correlation the probe
    /// needs.
    pub fn with_random_id(method: impl Into<String>, params: Value) -> Self {
        Self::new(Uuid::new_v4().to_string(), method, params)
    }
}

/// JSON-RPC request identifier.
///
/// Requests carry string ids; the server echoes them back verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(String);

impl RequestId {
    /// The id as sent on the wire.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for RequestId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for RequestId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
