//! Error types for the A2A chat client.
//!
//! Transport-level failures (status-derived or network-level) surface to the
//! caller of the enclosing operation. Malformed frames inside a stream are
//! not errors; they are delivered to the sink as
//! [`StreamEvent::ParseError`](crate::types::StreamEvent::ParseError).

/// Unified error type for every client operation.
#[derive(Debug, Clone, thiserror::Error)]
pub enum A2AError {
    /// The agent answered with a status outside the accepted range
    /// (`[200, 300)` for plain requests, exactly `200` for streams).
    #[error("HTTP {status}: {status_text}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Canonical reason phrase for the status (may be empty).
        status_text: String,
        /// Response body text, if any could be read.
        body: String,
    },

    /// Network-level failure: DNS, connection refused, TLS, or a socket
    /// error while a stream was being read.
    #[error("Transport error: {0}")]
    Transport(String),

    /// A configured request or stream idle timeout expired.
    #[error("Timeout: {0}")]
    Timeout(String),

    /// A successful response body was not valid JSON (or did not have the
    /// expected shape).
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    /// The SSE buffer held more unframed bytes than the configured limit.
    #[error("SSE buffer exceeded {limit} bytes without a complete frame")]
    BufferOverflow {
        /// The configured limit in bytes.
        limit: usize,
    },

    /// A fallback request was issued with an empty URL list.
    #[error("no endpoint URLs to try")]
    NoEndpoints,

    /// Catch-all for errors that don't fit other categories.
    #[error("{0}")]
    Other(String),
}

/// Convenience result type for client operations.
pub type A2AResult<T> = Result<T, A2AError>;

/// Error returned by a caller-supplied [`EventSink`](crate::client::EventSink).
///
/// Sink errors are logged and absorbed; they never abort a stream.
pub type SinkError = Box<dyn std::error::Error + Send + Sync>;

impl A2AError {
    /// Build an [`A2AError::Http`] from a status code and body, filling in
    /// the canonical reason phrase.
    pub fn http(status: reqwest::StatusCode, body: impl Into<String>) -> Self {
        A2AError::Http {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            body: body.into(),
        }
    }

    /// Map a `reqwest` error onto the transport error family.
    pub(crate) fn from_reqwest(context: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            A2AError::Timeout(format!("{context} timed out: {err}"))
        } else if err.is_connect() {
            A2AError::Transport(format!("{context}: connection failed: {err}"))
        } else {
            A2AError::Transport(format!("{context}: {err}"))
        }
    }

    /// Whether this error belongs to the transport family (status-derived,
    /// network-level or timeout). Only these errors make the fallback
    /// request move on to the next URL.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            A2AError::Http { .. } | A2AError::Transport(_) | A2AError::Timeout(_)
        )
    }

    /// The HTTP status code, for status-derived errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            A2AError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for A2AError {
    fn from(err: serde_json::Error) -> Self {
        A2AError::InvalidJson(err.to_string())
    }
}
