//! Session discovery on the legacy `/sse` endpoint.
//!
//! Servers speaking the 2024-11-05 HTTP+SSE transport announce the message
//! endpoint for a connection as an event such as
//! `data: /messages/?session_id=9f86d081884c`. The scanner reads the body as
//! raw text lines, not parsed events, and gives up at the first line that
//! mentions `ping`: a keep-alive arriving before the announcement means the
//! server is not going to send one.

use futures::{Stream, StreamExt, TryStreamExt};
use regex::Regex;
use std::fmt::Display;
use std::sync::OnceLock;
use tokio::io::AsyncRead;
use tokio_util::codec::{FramedRead, LinesCodec, LinesCodecError};
use tokio_util::io::StreamReader;

const SESSION_MARKER: &str = "session_id=";

/// Longest line, in bytes, the scanner buffers before giving up on the stream.
pub const MAX_LINE_BYTES: usize = 64 * 1024;

fn session_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"session_id=([a-f0-9]+)").unwrap_or_else(|e| unreachable!("{e}"))
    })
}

/// What a single stream line means for the scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineVerdict {
    /// The line carried a session id
    Session(String),
    /// The line mentioned `ping` before any session id was seen
    Ping,
    /// Nothing of interest; keep reading
    Continue,
}

/// Classify one line. Surrounding whitespace is ignored.
///
/// A line that contains `session_id=` but no lowercase hex after it falls
/// through to the `ping` check.
pub fn classify_line(line: &str) -> LineVerdict {
    let line = line.trim();

    if line.contains(SESSION_MARKER) {
        if let Some(id) = session_pattern()
            .captures(line)
            .and_then(|captures| captures.get(1))
        {
            return LineVerdict::Session(id.as_str().to_string());
        }
    }

    if line.to_lowercase().contains("ping") {
        return LineVerdict::Ping;
    }

    LineVerdict::Continue
}

/// Result of scanning an event stream for a session id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionScan {
    /// Session id found; reading stopped at that line
    Found(String),
    /// A `ping` line arrived first
    PingBeforeSession,
    /// The stream ended without either
    StreamEnded,
    /// Reading the stream failed
    ReadFailed(String),
}

impl SessionScan {
    /// The session id, if one was found.
    pub fn session_id(&self) -> Option<&str> {
        match self {
            Self::Found(id) => Some(id),
            _ => None,
        }
    }
}

/// Read `lines` until a verdict is reached.
///
/// `on_line` sees every line read, trimmed. Lines after the deciding one are
/// left unread in the stream.
pub async fn scan_for_session<S, E>(mut lines: S, mut on_line: impl FnMut(&str)) -> SessionScan
where
    S: Stream<Item = Result<String, E>> + Unpin,
    E: Display,
{
    let mut seen = 0usize;

    while let Some(line) = lines.next().await {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!("SSE stream error after {} lines: {}", seen, e);
                return SessionScan::ReadFailed(e.to_string());
            }
        };
        seen += 1;

        let line = line.trim();
        on_line(line);

        match classify_line(line) {
            LineVerdict::Session(id) => {
                tracing::debug!("Session id found on line {}", seen);
                return SessionScan::Found(id);
            }
            LineVerdict::Ping => {
                tracing::debug!("Ping on line {} before any session id", seen);
                return SessionScan::PingBeforeSession;
            }
            LineVerdict::Continue => {}
        }
    }

    tracing::debug!("SSE stream ended after {} lines", seen);
    SessionScan::StreamEnded
}

/// Split a streamed response body into text lines.
///
/// Line terminators (`\n` or `\r\n`) are stripped. Invalid UTF-8 and lines
/// longer than [`MAX_LINE_BYTES`] surface as error items.
pub fn response_lines(
    response: reqwest::Response,
) -> impl Stream<Item = Result<String, LinesCodecError>> {
    let body = response.bytes_stream().map_err(std::io::Error::other);
    body_lines(StreamReader::new(body), MAX_LINE_BYTES)
}

fn body_lines<R: AsyncRead>(body: R, max_length: usize) -> FramedRead<R, LinesCodec> {
    FramedRead::new(body, LinesCodec::new_with_max_length(max_length))
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;
    use std::convert::Infallible;
    use tracing_test::traced_test;

    fn lines(raw: &[&str]) -> impl Stream<Item = Result<String, Infallible>> + Unpin {
        stream::iter(raw.iter().map(|l| Ok(l.to_string())).collect::<Vec<_>>())
    }

    #[test]
    fn test_classify_line() {
        assert_eq!(
            classify_line("data: /messages/?session_id=abc123"),
            LineVerdict::Session("abc123".to_string())
        );
        assert_eq!(classify_line("event: endpoint"), LineVerdict::Continue);
        assert_eq!(classify_line(": PING 2024-01-01"), LineVerdict::Ping);
        assert_eq!(classify_line(""), LineVerdict::Continue);
    }

    #[test]
    fn test_uppercase_hex_is_not_a_session() {
        assert_eq!(classify_line("data: session_id=ABCDEF"), LineVerdict::Continue);
        assert_eq!(classify_line("data: session_id=XYZ ping"), LineVerdict::Ping);
    }

    #[test]
    fn test_session_capture_stops_at_non_hex() {
        assert_eq!(
            classify_line("data: /messages/?session_id=dead-beef"),
            LineVerdict::Session("dead".to_string())
        );
    }

    #[tokio::test]
    async fn test_scan_stops_at_session_line() {
        let mut stream = lines(&[
            "event: endpoint",
            "data: /messages/?session_id=abc123",
            "",
            "event: ping",
        ]);
        let mut seen = Vec::new();

        let scan = scan_for_session(&mut stream, |l| seen.push(l.to_string())).await;

        assert_eq!(scan, SessionScan::Found("abc123".to_string()));
        assert_eq!(seen.len(), 2);
        assert_eq!(stream.next().await, Some(Ok(String::new())));
    }

    #[tokio::test]
    async fn test_scan_ping_before_session() {
        let mut stream = lines(&[": ping", "data: session_id=abc123"]);

        let scan = scan_for_session(&mut stream, |_| {}).await;

        assert_eq!(scan, SessionScan::PingBeforeSession);
        assert_eq!(scan.session_id(), None);
        assert_eq!(
            stream.next().await,
            Some(Ok("data: session_id=abc123".to_string()))
        );
    }

    #[tokio::test]
    async fn test_scan_empty_stream() {
        let scan = scan_for_session(lines(&[]), |_| {}).await;
        assert_eq!(scan, SessionScan::StreamEnded);
    }

    #[tokio::test]
    async fn test_scan_trims_lines() {
        let scan = scan_for_session(lines(&["   data: session_id=deadbeef \r"]), |l| {
            assert_eq!(l, "data: session_id=deadbeef");
        })
        .await;
        assert_eq!(scan.session_id(), Some("deadbeef"));
    }

    #[tokio::test]
    #[traced_test]
    async fn test_scan_read_error() {
        let stream = stream::iter(vec![
            Ok("event: endpoint".to_string()),
            Err("connection reset"),
        ]);

        let scan = scan_for_session(stream, |_| {}).await;
        assert_eq!(scan, SessionScan::ReadFailed("connection reset".to_string()));
        assert!(logs_contain("SSE stream error after 1 lines"));
    }

    #[tokio::test]
    async fn test_overlong_line_ends_scan() {
        let body = format!("event: endpoint\n{}\ndata: session_id=abc123\n", "x".repeat(32));
        let lines = body_lines(body.as_bytes(), 16);

        let mut seen = Vec::new();
        let scan = scan_for_session(lines, |l| seen.push(l.to_string())).await;

        assert!(matches!(scan, SessionScan::ReadFailed(_)), "{scan:?}");
        assert_eq!(seen, vec!["event: endpoint"]);
    }
}
