//! # MCP Probe Core Library
//!
//! `mcp-probe-core` checks that an MCP server speaking the legacy HTTP+SSE
//! transport (protocol `2024-11-05`) is up and answering. A run walks a fixed
//! sequence of stages:
//!
//! 1. `GET /health` must answer 200
//! 2. `GET /sse` must announce a `session_id=<hex>` before any `ping`
//! 3. `POST /messages/?session_id=<id>` with `initialize`
//! 4. `POST /messages/?session_id=<id>` with `tools/list`, which must carry
//!    `result.tools`
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mcp_probe_core::{ProbeConfig, ProbeRunner};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ProbeConfig::with_base_url("http://localhost:8000")?;
//!     let mut runner = ProbeRunner::new(config)?;
//!
//!     let outcome = runner.run().await;
//!     std::process::exit(outcome.exit_code().into());
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`error`]: error types for transport and configuration failures
//! - [`config`]: run settings, loadable from TOML, YAML or JSON
//! - [`messages`]: the JSON-RPC and MCP message types the probe sends
//! - [`transport`]: HTTP client construction and SSE session discovery
//! - [`report`]: the human-readable console output
//! - [`probe`]: the stage runner itself

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::uninlined_format_args)]

pub mod config;
pub mod error;
pub mod messages;
pub mod probe;
pub mod report;
pub mod transport;

// Re-export commonly used types for convenience
pub use config::ProbeConfig;
pub use error::{McpError, McpResult};
pub use messages::{InitializeRequest, JsonRpcRequest, ToolSummary, ToolsListing};
pub use probe::{InitializeOutcome, ProbeOutcome, ProbeRunner};
pub use report::Console;

/// Current version of the mcp-probe-core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
