//! Human-readable console output for a probe run.
//!
//! This is the probe's user interface: emoji-prefixed lines on standard
//! output. Diagnostic traces go through `tracing` instead and never land
//! here.

use crate::messages::ToolSummary;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

const SEPARATOR_WIDTH: usize = 50;
const DESCRIPTION_PREVIEW_CHARS: usize = 60;

/// Characters of an unparseable body shown before it is cut off.
pub const BODY_PREVIEW_CHARS: usize = 200;

/// Prefix of `s` holding at most `max_chars` characters.
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// One numbered entry of the tool preview.
pub fn format_tool_line(index: usize, tool: &ToolSummary) -> String {
    format!(
        "  {}. {} - {}...",
        index,
        tool.display_name(),
        truncate_chars(tool.display_description(), DESCRIPTION_PREVIEW_CHARS)
    )
}

/// Preview lines for `tools`: the first `limit` entries, then a count of the
/// rest.
pub fn tool_preview_lines(tools: &[ToolSummary], limit: usize) -> Vec<String> {
    let mut lines: Vec<String> = tools
        .iter()
        .take(limit)
        .enumerate()
        .map(|(i, tool)| format_tool_line(i + 1, tool))
        .collect();

    if tools.len() > limit {
        lines.push(format!("  ... and {} more tools", tools.len() - limit));
    }

    lines
}

/// In-memory sink that can be cloned and read back after a run.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    /// Everything written so far, lossily decoded.
    pub fn contents(&self) -> String {
        match self.0.lock() {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(poisoned) => String::from_utf8_lossy(&poisoned.into_inner()).into_owned(),
        }
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .map_err(|_| io::Error::other("output buffer poisoned"))?
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Writes the probe's progress lines.
pub struct Console {
    out: Box<dyn Write + Send>,
}

impl Default for Console {
    fn default() -> Self {
        Self::stdout()
    }
}

impl std::fmt::Debug for Console {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Console").finish_non_exhaustive()
    }
}

impl Console {
    /// Console writing to standard output.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    /// Console writing to an arbitrary sink.
    pub fn new(out: impl Write + Send + 'static) -> Self {
        Self { out: Box::new(out) }
    }

    /// Console writing to a fresh [`SharedBuffer`], returned alongside it.
    pub fn buffered() -> (Self, SharedBuffer) {
        let buffer = SharedBuffer::default();
        (Self::new(buffer.clone()), buffer)
    }

    fn line(&mut self, text: impl std::fmt::Display) {
        if let Err(e) = writeln!(self.out, "{}", text) {
            tracing::warn!("Failed to write probe output: {}", e);
        }
    }

    fn separator(&mut self) {
        self.line("=".repeat(SEPARATOR_WIDTH));
    }

    fn text_preview(&mut self, label: &str, body: &str) {
        self.line(format!(
            "{} (text): {}...",
            label,
            truncate_chars(body, BODY_PREVIEW_CHARS)
        ));
    }

    fn pretty_json(&mut self, label: &str, body: &serde_json::Value) {
        let rendered = serde_json::to_string_pretty(body).unwrap_or_else(|_| body.to_string());
        self.line(format!("{}: {}", label, rendered));
    }

    /// Banner printed once at start-up.
    pub fn suite_header(&mut self, base_url: &str, started_at: impl std::fmt::Display) {
        self.line("🧪 MCP Protocol Test Suite");
        self.line(format!("⏰ Started at: {}", started_at));
        self.line(format!("🌐 Base URL: {}", base_url));
    }

    pub(crate) fn health_start(&mut self) {
        self.line("\n🏥 Testing Health Endpoint...");
    }

    pub(crate) fn health_response(&mut self, status: u16, body: &str) {
        self.line(format!("Health Response Status: {}", status));
        self.line(format!("Health Response: {}", body));
    }

    pub(crate) fn health_error(&mut self, error: impl std::fmt::Display) {
        self.line(format!("❌ Health Check Error: {}", error));
    }

    pub(crate) fn health_failed(&mut self) {
        self.line("❌ Health check failed - server may not be running");
    }

    pub(crate) fn settling(&mut self) {
        self.line("⏳ Waiting for server to be fully ready...");
    }

    pub(crate) fn protocol_start(&mut self) {
        self.line("🚀 Testing MCP SSE Protocol Flow");
        self.separator();
    }

    pub(crate) fn sse_start(&mut self) {
        self.line("\n📡 Step 1: Connecting to SSE endpoint...");
    }

    pub(crate) fn sse_response(&mut self, status: u16, headers: &reqwest::header::HeaderMap) {
        self.line(format!("SSE Response Status: {}", status));
        self.line(format!("SSE Response Headers: {:?}", headers));
    }

    pub(crate) fn sse_line(&mut self, line: &str) {
        self.line(format!("SSE Line: {}", line));
    }

    pub(crate) fn session_found(&mut self, session_id: &str) {
        self.line(format!("✅ Found Session ID: {}", session_id));
    }

    pub(crate) fn sse_error(&mut self, error: impl std::fmt::Display) {
        self.line(format!("❌ SSE Connection Error: {}", error));
    }

    pub(crate) fn session_missing(&mut self) {
        self.line("❌ Failed to get session ID from SSE endpoint");
    }

    pub(crate) fn messages_endpoint(&mut self, url: &str) {
        self.line("\n📨 Step 2: Testing messages endpoint with session ID...");
        self.line(format!("Messages URL: {}", url));
    }

    pub(crate) fn initialize_start(&mut self) {
        self.line("\n🔧 Step 3: Sending MCP initialize request...");
    }

    pub(crate) fn initialize_status(&mut self, status: u16) {
        self.line(format!("Initialize Response Status: {}", status));
    }

    pub(crate) fn initialize_accepted(&mut self) {
        self.line("✅ Initialize request accepted (202 Accepted)");
    }

    pub(crate) fn initialize_json(&mut self, body: &serde_json::Value) {
        self.pretty_json("Initialize Response", body);
    }

    pub(crate) fn initialize_text(&mut self, body: &str) {
        self.text_preview("Initialize Response", body);
    }

    pub(crate) fn initialize_error(&mut self, error: impl std::fmt::Display) {
        self.line(format!("❌ Initialize Request Error: {}", error));
    }

    pub(crate) fn tools_start(&mut self) {
        self.line("\n🛠️  Step 4: Requesting tools list...");
    }

    pub(crate) fn tools_status(&mut self, status: u16) {
        self.line(format!("Tools List Response Status: {}", status));
    }

    pub(crate) fn tools_json(&mut self, body: &serde_json::Value) {
        self.pretty_json("Tools List Response", body);
    }

    pub(crate) fn tools_text(&mut self, body: &str) {
        self.text_preview("Tools List Response", body);
    }

    pub(crate) fn tools_found(&mut self, tools: &[ToolSummary], preview_limit: usize) {
        self.line(format!("\n✅ Found {} tools:", tools.len()));
        for line in tool_preview_lines(tools, preview_limit) {
            self.line(line);
        }
    }

    pub(crate) fn tools_missing(&mut self) {
        self.line("❌ No tools found in response");
    }

    pub(crate) fn tools_error(&mut self, error: impl std::fmt::Display) {
        self.line(format!("❌ Tools List Request Error: {}", error));
    }

    /// Closing PASS/FAIL banner.
    pub fn summary(&mut self, passed: bool) {
        self.line("");
        self.separator();
        if passed {
            self.line("✅ MCP Protocol Test: PASSED");
            self.line("🎉 Your MCP server is working correctly!");
        } else {
            self.line("❌ MCP Protocol Test: FAILED");
            self.line("🔧 Check the server logs for more details");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tools(n: usize) -> Vec<ToolSummary> {
        (1..=n)
            .map(|i| ToolSummary::new(format!("tool-{i}"), format!("Tool number {i}")))
            .collect()
    }

    #[test]
    fn test_truncate_chars_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("short", 60), "short");
        assert_eq!(truncate_chars("", 3), "");
    }

    #[test]
    fn test_tool_line_truncates_description() {
        let long = "x".repeat(80);
        let line = format_tool_line(1, &ToolSummary::new("big", long));
        assert_eq!(line, format!("  1. big - {}...", "x".repeat(60)));
    }

    #[test]
    fn test_tool_line_defaults() {
        assert_eq!(
            format_tool_line(3, &ToolSummary::default()),
            "  3. Unknown - No description..."
        );
    }

    #[test]
    fn test_preview_under_limit() {
        let lines = tool_preview_lines(&tools(2), 5);
        assert_eq!(
            lines,
            vec![
                "  1. tool-1 - Tool number 1...",
                "  2. tool-2 - Tool number 2..."
            ]
        );
    }

    #[test]
    fn test_preview_over_limit() {
        let lines = tool_preview_lines(&tools(8), 5);
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[4], "  5. tool-5 - Tool number 5...");
        assert_eq!(lines[5], "  ... and 3 more tools");
    }

    #[test]
    fn test_preview_exactly_at_limit_has_no_remainder() {
        let lines = tool_preview_lines(&tools(5), 5);
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn test_buffered_console_summary() {
        let (mut console, buffer) = Console::buffered();
        console.summary(false);

        let out = buffer.contents();
        assert!(out.contains(&"=".repeat(50)));
        assert!(out.contains("❌ MCP Protocol Test: FAILED"));
    }
}
