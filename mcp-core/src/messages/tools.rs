//! Reading tool descriptors out of a `tools/list` reply.
//!
//! Replies are inspected as loose JSON rather than deserialized into a strict
//! schema: the probe only cares whether `result.tools` is present and what
//! each entry is called.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Shown when a tool entry has no `name` string.
pub const UNKNOWN_TOOL_NAME: &str = "Unknown";

/// Shown when a tool entry has no `description` string.
pub const MISSING_DESCRIPTION: &str = "No description";

/// Name and description of one advertised tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ToolSummary {
    /// Tool name, if the server sent one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Human-readable description, if the server sent one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ToolSummary {
    /// Create a summary with both fields present.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            description: Some(description.into()),
        }
    }

    /// Extract a summary from one entry of a `tools` array.
    ///
    /// Entries that are not objects, or whose fields are not strings, yield
    /// empty fields instead of an error.
    pub fn from_value(value: &Value) -> Self {
        let field = |key: &str| value.get(key).and_then(Value::as_str).map(str::to_string);
        Self {
            name: field("name"),
            description: field("description"),
        }
    }

    /// Name for display.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(UNKNOWN_TOOL_NAME)
    }

    /// Description for display.
    pub fn display_description(&self) -> &str {
        self.description.as_deref().unwrap_or(MISSING_DESCRIPTION)
    }
}

/// What a `tools/list` reply said about tools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolsListing {
    /// `result.tools` was an array (possibly empty)
    Found(Vec<ToolSummary>),
    /// The body had no `result.tools` array
    Missing,
}

impl ToolsListing {
    /// Inspect a parsed reply body.
    pub fn from_response(body: &Value) -> Self {
        match body
            .get("result")
            .and_then(|result| result.get("tools"))
            .and_then(Value::as_array)
        {
            Some(tools) => Self::Found(tools.iter().map(ToolSummary::from_value).collect()),
            None => Self::Missing,
        }
    }

    /// The body substituted when a reply cannot be parsed as JSON.
    pub fn unparseable_fallback() -> Value {
        serde_json::json!({"result": {"tools": []}})
    }

    /// Whether the reply counted as a successful listing.
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// Tools found, empty when missing.
    pub fn tools(&self) -> &[ToolSummary] {
        match self {
            Self::Found(tools) => tools,
            Self::Missing => &[],
        }
    }
}
