//! The probe runner: a fixed, strictly sequential check of one MCP server.
//!
//! ```text
//! GET /health ──► settle ──► GET /sse ──► POST initialize ──► POST tools/list ──► summary
//! ```
//!
//! Each stage catches its own failures, prints them through the
//! [`Console`], and hands a sentinel to the next step. Nothing is retried.
//! A failed health check or a missing session id ends the run early.

use crate::config::ProbeConfig;
use crate::error::{McpError, McpResult, TransportError};
use crate::messages::{InitializeRequest, JsonRpcRequest, ToolsListing};
use crate::report::Console;
use crate::transport::{build_http_client, response_lines, scan_for_session, SessionScan};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Response, StatusCode};
use serde_json::{json, Value};
use url::Url;

/// How the server answered `initialize`.
#[derive(Debug, Clone, PartialEq)]
pub enum InitializeOutcome {
    /// `202 Accepted`; the real reply travels over the SSE stream
    Accepted,
    /// Any other status with a JSON body
    Json(Value),
    /// Any other status with a body that is not JSON
    Text(String),
}

/// Final verdict of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// Every stage succeeded
    Passed {
        /// Number of tools the server advertised
        tool_count: usize,
    },
    /// `/health` was unreachable or did not answer 200
    HealthCheckFailed,
    /// No session id came out of `/sse`
    NoSession,
    /// `initialize` could not be delivered
    InitializeFailed,
    /// `tools/list` could not be delivered
    ToolsListFailed,
    /// `tools/list` was answered without a `result.tools` array
    ToolsMissing,
}

impl ProbeOutcome {
    /// Whether the run passed.
    pub fn is_passed(&self) -> bool {
        matches!(self, Self::Passed { .. })
    }

    /// Process exit code for this outcome.
    pub fn exit_code(&self) -> u8 {
        if self.is_passed() {
            0
        } else {
            1
        }
    }
}

/// Runs the probe against one server.
#[derive(Debug)]
pub struct ProbeRunner {
    config: ProbeConfig,
    client: Client,
    console: Console,
}

impl ProbeRunner {
    /// Runner printing to standard output.
    pub fn new(config: ProbeConfig) -> McpResult<Self> {
        Self::with_console(config, Console::stdout())
    }

    /// Runner printing to `console`.
    pub fn with_console(config: ProbeConfig, console: Console) -> McpResult<Self> {
        config.validate()?;
        let client = build_http_client(&config)?;
        Ok(Self {
            config,
            client,
            console,
        })
    }

    /// Execute every stage and print the summary.
    pub async fn run(&mut self) -> ProbeOutcome {
        let started_at = chrono::Local::now()
            .format("%Y-%m-%d %H:%M:%S%.6f")
            .to_string();
        let base_url = self.config.base_url.as_str().trim_end_matches('/').to_string();
        self.console.suite_header(&base_url, started_at);

        if !self.check_health().await {
            self.console.health_failed();
            tracing::info!("Health check failed; skipping protocol test");
            return ProbeOutcome::HealthCheckFailed;
        }

        self.console.settling();
        tokio::time::sleep(self.config.settle_delay).await;

        let outcome = self.run_protocol_test().await;
        tracing::info!("Probe finished: {:?}", outcome);

        self.console.summary(outcome.is_passed());
        outcome
    }

    /// SSE session discovery followed by the two JSON-RPC calls.
    pub async fn run_protocol_test(&mut self) -> ProbeOutcome {
        self.console.protocol_start();

        let Some(session_id) = self.acquire_session_id().await else {
            return ProbeOutcome::NoSession;
        };

        let messages_url = match self.config.messages_url(&session_id) {
            Ok(url) => url,
            Err(e) => {
                self.console.initialize_error(&e);
                return ProbeOutcome::InitializeFailed;
            }
        };
        self.console.messages_endpoint(messages_url.as_str());

        if self.send_initialize(&session_id).await.is_err() {
            return ProbeOutcome::InitializeFailed;
        }

        match self.request_tools_list(&session_id).await {
            Ok(ToolsListing::Found(tools)) => ProbeOutcome::Passed {
                tool_count: tools.len(),
            },
            Ok(ToolsListing::Missing) => ProbeOutcome::ToolsMissing,
            Err(_) => ProbeOutcome::ToolsListFailed,
        }
    }

    /// `true` iff `/health` answers exactly 200.
    pub async fn check_health(&mut self) -> bool {
        self.console.health_start();

        match self.fetch_health().await {
            Ok((status, body)) => {
                tracing::debug!("Health check answered {}", status);
                self.console.health_response(status.as_u16(), &body);
                status == StatusCode::OK
            }
            Err(e) => {
                tracing::warn!("Health check error: {}", e);
                self.console.health_error(&e);
                false
            }
        }
    }

    async fn fetch_health(&self) -> McpResult<(StatusCode, String)> {
        let url = self.config.health_url()?;
        let response = self.send(self.client.get(url), "GET /health").await?;
        let status = response.status();
        let body = self.read_text(response, "GET /health").await?;
        Ok((status, body))
    }

    /// Open `/sse` and read lines until a session id, a `ping`, or the end of
    /// the stream.
    pub async fn acquire_session_id(&mut self) -> Option<String> {
        self.console.sse_start();

        let response = match self.open_event_stream().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("SSE connect failed: {}", e);
                self.console.sse_error(&e);
                return None;
            }
        };

        self.console
            .sse_response(response.status().as_u16(), response.headers());

        let lines = response_lines(response);
        tokio::pin!(lines);

        let console = &mut self.console;
        let scan = scan_for_session(lines, |line| console.sse_line(line)).await;

        match scan {
            SessionScan::Found(session_id) => {
                tracing::info!("Acquired session id {}", session_id);
                self.console.session_found(&session_id);
                Some(session_id)
            }
            SessionScan::ReadFailed(reason) => {
                let error = McpError::from(TransportError::SseError { reason });
                self.console.sse_error(&error);
                None
            }
            SessionScan::PingBeforeSession | SessionScan::StreamEnded => {
                tracing::info!("No session id on event stream: {:?}", scan);
                self.console.session_missing();
                None
            }
        }
    }

    async fn open_event_stream(&self) -> McpResult<Response> {
        let url = self.config.sse_url()?;
        tracing::debug!("Opening event stream at {}", url);
        self.send(
            self.client.get(url).header(ACCEPT, "text/event-stream"),
            "GET /sse",
        )
        .await
    }

    /// POST the `initialize` request for `session_id`.
    ///
    /// Transport failures are printed and returned; the run treats them as
    /// fatal.
    pub async fn send_initialize(&mut self, session_id: &str) -> McpResult<InitializeOutcome> {
        self.console.initialize_start();

        let result = self.try_initialize(session_id).await;
        if let Err(e) = &result {
            tracing::warn!("initialize failed: {}", e);
            self.console.initialize_error(e);
        }
        result
    }

    async fn try_initialize(&mut self, session_id: &str) -> McpResult<InitializeOutcome> {
        let params = InitializeRequest::probe_default(
            self.config.client_name.clone(),
            self.config.client_version.clone(),
        );
        let request = JsonRpcRequest::with_random_id("initialize", serde_json::to_value(params)?);
        let url = self.config.messages_url(session_id)?;

        let response = self.post_message(url, &request).await?;
        let status = response.status();
        self.console.initialize_status(status.as_u16());

        if status == StatusCode::ACCEPTED {
            self.console.initialize_accepted();
            return Ok(InitializeOutcome::Accepted);
        }

        let body = self.read_text(response, "POST initialize").await?;
        match serde_json::from_str::<Value>(&body) {
            Ok(value) => {
                self.console.initialize_json(&value);
                Ok(InitializeOutcome::Json(value))
            }
            Err(e) => {
                tracing::debug!("initialize reply is not JSON: {}", e);
                self.console.initialize_text(&body);
                Ok(InitializeOutcome::Text(body))
            }
        }
    }

    /// POST `tools/list` for `session_id` and report what came back.
    ///
    /// A body that is not JSON is treated as an empty listing.
    pub async fn request_tools_list(&mut self, session_id: &str) -> McpResult<ToolsListing> {
        self.console.tools_start();

        let result = self.try_tools_list(session_id).await;
        match &result {
            Ok(ToolsListing::Found(tools)) => {
                self.console.tools_found(tools, self.config.tool_preview_limit);
            }
            Ok(ToolsListing::Missing) => self.console.tools_missing(),
            Err(e) => {
                tracing::warn!("tools/list failed: {}", e);
                self.console.tools_error(e);
            }
        }
        result
    }

    async fn try_tools_list(&mut self, session_id: &str) -> McpResult<ToolsListing> {
        let request = JsonRpcRequest::with_random_id("tools/list", json!({}));
        let url = self.config.messages_url(session_id)?;

        let response = self.post_message(url, &request).await?;
        self.console.tools_status(response.status().as_u16());

        let body = self.read_text(response, "POST tools/list").await?;
        let parsed = match serde_json::from_str::<Value>(&body) {
            Ok(value) => {
                self.console.tools_json(&value);
                value
            }
            Err(e) => {
                tracing::debug!("tools/list reply is not JSON: {}", e);
                self.console.tools_text(&body);
                ToolsListing::unparseable_fallback()
            }
        };

        Ok(ToolsListing::from_response(&parsed))
    }

    async fn post_message(&self, url: Url, request: &JsonRpcRequest) -> McpResult<Response> {
        tracing::debug!("POST {} to {} (id {})", request.method, url, request.id);
        let builder = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .json(request);
        self.send(builder, &format!("POST {}", request.method)).await
    }

    async fn send(&self, builder: reqwest::RequestBuilder, operation: &str) -> McpResult<Response> {
        builder
            .send()
            .await
            .map_err(|e| McpError::from_request(operation, e, self.config.timeout))
    }

    async fn read_text(&self, response: Response, operation: &str) -> McpResult<String> {
        response
            .text()
            .await
            .map_err(|e| McpError::from_request(operation, e, self.config.timeout))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(ProbeOutcome::Passed { tool_count: 0 }.exit_code(), 0);
        for outcome in [
            ProbeOutcome::HealthCheckFailed,
            ProbeOutcome::NoSession,
            ProbeOutcome::InitializeFailed,
            ProbeOutcome::ToolsListFailed,
            ProbeOutcome::ToolsMissing,
        ] {
            assert_eq!(outcome.exit_code(), 1, "{outcome:?}");
            assert!(!outcome.is_passed());
        }
    }

    #[test]
    fn test_runner_rejects_invalid_config() {
        let config = ProbeConfig::default().timeout(std::time::Duration::ZERO);
        assert!(ProbeRunner::new(config).is_err());
    }
}
