//! Server-Sent Events (SSE) framing for A2A streaming responses.
//!
//! The response body arrives as an arbitrary sequence of byte chunks. The
//! [`SseFramer`] appends every chunk to one buffer and only frames complete
//! lines, keeping the unterminated remainder buffered until more bytes
//! arrive. A `data:` marker or a JSON object split across chunk boundaries is
//! therefore rejoined before it is looked at.
//!
//! Per complete line:
//! - blank lines, `:` comments and `event:`/`id:`/`retry:` fields are skipped;
//! - `data:` lines yield their trimmed value, except empty values and the
//!   `[DONE]` sentinel; the value must look like a JSON object (starts with
//!   `{` and contains `}`), and the greedy leading `{ … }` run up to the last
//!   `}` of the line is emitted;
//! - a bare line without a field prefix is emitted the same way when it looks
//!   like a JSON object (agents that answer with plain JSON lines);
//! - a `data:` marker that directly follows a closed object starts a new
//!   payload, so several events glued onto one line are all delivered.
//!
//! At end of stream the remainder is framed once more and its last payload
//! is emitted trimmed, even when it is not JSON-shaped; the classifier then
//! reports it as a parse error. Bytes that are not valid UTF-8 fail the
//! stream.
//!
//! [`PayloadStream`] runs the framer in a background task and hands payloads
//! to the consumer over a bounded channel, preserving order.

use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use futures::stream::{Stream, StreamExt};
use tokio::sync::mpsc;

use crate::error::{A2AError, A2AResult};
use crate::utils::constants::{DEFAULT_MAX_BUFFER_BYTES, SSE_DATA_PREFIX, SSE_DONE_SENTINEL};

/// SSE fields that carry no payload for this client.
const IGNORED_FIELDS: [&str; 3] = ["event:", "id:", "retry:"];

/// Capacity of the channel between the reader task and the consumer.
const CHANNEL_CAPACITY: usize = 64;

/// Incremental SSE framer over a whole-stream byte buffer.
///
/// # Example
///
/// ```
/// use a2a_chat::client::SseFramer;
///
/// let mut framer = SseFramer::default();
/// assert!(framer.push(b"data: {\"a\":").unwrap().is_empty());
/// assert_eq!(framer.push(b"1}\n").unwrap(), vec!["{\"a\":1}".to_string()]);
/// assert!(framer.finish().unwrap().is_empty());
/// ```
#[derive(Debug)]
pub struct SseFramer {
    buffer: Vec<u8>,
    /// Leading bytes of `buffer` already known to hold no newline.
    scanned: usize,
    max_buffer_bytes: usize,
}

impl Default for SseFramer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_BUFFER_BYTES)
    }
}

impl SseFramer {
    /// Create a framer that fails once more than `max_buffer_bytes` unframed
    /// bytes are held.
    pub fn new(max_buffer_bytes: usize) -> Self {
        Self {
            buffer: Vec::new(),
            scanned: 0,
            max_buffer_bytes,
        }
    }

    /// Number of bytes waiting for a line terminator.
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Append a chunk and return every payload that became frameable.
    ///
    /// # Errors
    ///
    /// Returns [`A2AError::BufferOverflow`] when the unterminated remainder
    /// grows past the configured limit, and [`A2AError::Transport`] when a
    /// complete line is not valid UTF-8.
    pub fn push(&mut self, chunk: &[u8]) -> A2AResult<Vec<String>> {
        self.buffer.extend_from_slice(chunk);

        let mut payloads = Vec::new();
        let mut start = 0;
        let mut search_from = self.scanned;
        while let Some(offset) = self.buffer[search_from..].iter().position(|&b| b == b'\n') {
            let end = search_from + offset;
            let line = decode_utf8(&self.buffer[start..end])?;
            payloads.extend(frame_line(line.trim_end_matches('\r')));
            start = end + 1;
            search_from = start;
        }
        self.buffer.drain(..start);
        self.scanned = self.buffer.len();

        if self.buffer.len() > self.max_buffer_bytes {
            return Err(A2AError::BufferOverflow {
                limit: self.max_buffer_bytes,
            });
        }
        Ok(payloads)
    }

    /// Flush the remainder at end of stream.
    ///
    /// The last payload of the remainder (with any `data:` prefix removed)
    /// is returned trimmed when it is non-blank and not a sentinel, comment
    /// or ignored field. Payloads glued before it must look like objects.
    ///
    /// # Errors
    ///
    /// Returns [`A2AError::Transport`] when the remainder is not valid UTF-8.
    pub fn finish(&mut self) -> A2AResult<Vec<String>> {
        let buffer = std::mem::take(&mut self.buffer);
        self.scanned = 0;

        let value = match parse_line(decode_utf8(&buffer)?) {
            SseLine::Data(value) | SseLine::Bare(value) => value,
            SseLine::Blank | SseLine::Comment | SseLine::Field => return Ok(Vec::new()),
        };
        let mut segments = split_data_markers(value);
        let last = segments.pop();

        let mut payloads: Vec<String> = segments.into_iter().filter_map(frame_data).collect();
        payloads.extend(
            last.filter(|v| !v.is_empty() && *v != SSE_DONE_SENTINEL)
                .map(str::to_string),
        );
        Ok(payloads)
    }
}

fn decode_utf8(bytes: &[u8]) -> A2AResult<&str> {
    std::str::from_utf8(bytes)
        .map_err(|e| A2AError::Transport(format!("invalid UTF-8 in SSE stream: {e}")))
}

enum SseLine<'a> {
    Blank,
    Comment,
    Field,
    Data(&'a str),
    Bare(&'a str),
}

fn parse_line(line: &str) -> SseLine<'_> {
    let line = line.trim();
    if line.is_empty() {
        SseLine::Blank
    } else if line.starts_with(':') {
        SseLine::Comment
    } else if let Some(value) = line.strip_prefix(SSE_DATA_PREFIX) {
        SseLine::Data(value.trim())
    } else if IGNORED_FIELDS.iter().any(|field| line.starts_with(field)) {
        SseLine::Field
    } else {
        SseLine::Bare(line)
    }
}

/// Frame one complete line into its payloads.
fn frame_line(line: &str) -> Vec<String> {
    match parse_line(line) {
        SseLine::Data(value) | SseLine::Bare(value) => split_data_markers(value)
            .into_iter()
            .filter_map(frame_data)
            .collect(),
        SseLine::Blank | SseLine::Comment | SseLine::Field => Vec::new(),
    }
}

/// Split a line wherever a `data:` marker directly follows a closing `}`.
///
/// A marker inside a string value is left alone unless it happens to sit
/// right after a `}`.
fn split_data_markers(value: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut start = 0;
    for (idx, _) in value.match_indices(SSE_DATA_PREFIX) {
        if value[start..idx].trim_end().ends_with('}') {
            segments.push(value[start..idx].trim());
            start = idx + SSE_DATA_PREFIX.len();
        }
    }
    segments.push(value[start..].trim());
    segments
}

fn frame_data(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else if value == SSE_DONE_SENTINEL {
        tracing::debug!("stream signalled [DONE]");
        None
    } else {
        let payload = json_object_run(value);
        if payload.is_none() {
            tracing::debug!(data = value, "skipping non-object SSE data");
        }
        payload
    }
}

/// The leading `{ … }` run, from the first byte to the last `}`.
fn json_object_run(value: &str) -> Option<String> {
    if !value.starts_with('{') {
        return None;
    }
    value.rfind('}').map(|end| value[..=end].to_string())
}

/// Options for a [`PayloadStream`].
#[derive(Debug, Clone, Copy)]
pub struct FramingOptions {
    /// Cap on unframed bytes, see [`SseFramer::new`].
    pub max_buffer_bytes: usize,
    /// Fail the stream when no chunk arrives within this duration.
    pub idle_timeout: Option<Duration>,
}

impl Default for FramingOptions {
    fn default() -> Self {
        Self {
            max_buffer_bytes: DEFAULT_MAX_BUFFER_BYTES,
            idle_timeout: None,
        }
    }
}

/// A stream of framed SSE payloads (raw JSON text, one per event).
///
/// Yields `Ok(payload)` per event in wire order. A transport error, idle
/// timeout or buffer overflow is yielded once as `Err` and ends the stream.
/// Dropping the stream aborts the background reader and closes the
/// connection.
///
/// # Example
///
/// ```no_run
/// # async fn example(mut stream: a2a_chat::client::PayloadStream) {
/// while let Some(payload) = stream.next().await {
///     match payload {
///         Ok(text) => println!("frame: {}", text),
///         Err(e) => eprintln!("stream error: {}", e),
///     }
/// }
/// # }
/// ```
pub struct PayloadStream {
    receiver: mpsc::Receiver<A2AResult<String>>,
    task: tokio::task::JoinHandle<()>,
}

impl Drop for PayloadStream {
    fn drop(&mut self) {
        self.task.abort();
    }
}

impl std::fmt::Debug for PayloadStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PayloadStream").finish_non_exhaustive()
    }
}

impl PayloadStream {
    /// Frame a stream of byte chunks in a background task.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<S, B>(chunks: S, options: FramingOptions) -> Self
    where
        S: Stream<Item = A2AResult<B>> + Send + 'static,
        B: AsRef<[u8]> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);

        let task = tokio::spawn(async move {
            if let Err(e) = pump(chunks, options, &tx).await {
                // Receiver may already be gone.
                let _ = tx.send(Err(e)).await;
            }
        });

        Self {
            receiver: rx,
            task,
        }
    }

    /// Get the next payload. Returns `None` once the stream is exhausted.
    pub async fn next(&mut self) -> Option<A2AResult<String>> {
        self.receiver.recv().await
    }
}

impl Stream for PayloadStream {
    type Item = A2AResult<String>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver.poll_recv(cx)
    }
}

async fn pump<S, B>(
    chunks: S,
    options: FramingOptions,
    tx: &mpsc::Sender<A2AResult<String>>,
) -> A2AResult<()>
where
    S: Stream<Item = A2AResult<B>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
{
    let mut chunks = Box::pin(chunks);
    let mut framer = SseFramer::new(options.max_buffer_bytes);

    loop {
        let next = match options.idle_timeout {
            Some(limit) => tokio::time::timeout(limit, chunks.next())
                .await
                .map_err(|_| A2AError::Timeout(format!("no SSE data received for {limit:?}")))?,
            None => chunks.next().await,
        };
        let Some(chunk) = next else { break };

        for payload in framer.push(chunk?.as_ref())? {
            if tx.send(Ok(payload)).await.is_err() {
                // Consumer dropped the stream.
                return Ok(());
            }
        }
    }

    for payload in framer.finish()? {
        if tx.send(Ok(payload)).await.is_err() {
            break;
        }
    }
    Ok(())
}
