//! Transport layer for A2A client communication.
//!
//! Provides the `Transport` trait, which abstracts plain HTTP requests and
//! streamed response bodies, and `HttpTransport`, the `reqwest`-backed
//! implementation. The fallback request helper lives on the trait so that
//! test doubles get it for free.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, StatusCode};

use crate::error::{A2AError, A2AResult};
use crate::utils::constants::DEFAULT_MAX_BUFFER_BYTES;

use super::sse::{FramingOptions, PayloadStream};

/// Method, headers and optional body of one outbound request.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSpec {
    /// HTTP method.
    pub method: Method,
    /// Per-request headers, applied on top of the transport's defaults.
    pub headers: Vec<(String, String)>,
    /// Request body.
    pub body: Option<String>,
}

impl RequestSpec {
    /// A bare `GET` request.
    pub fn get() -> Self {
        Self {
            method: Method::GET,
            headers: Vec::new(),
            body: None,
        }
    }

    /// A `POST` request carrying a JSON body.
    pub fn post_json(body: impl Into<String>) -> Self {
        Self {
            method: Method::POST,
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            body: Some(body.into()),
        }
    }

    /// Add a header (builder-style).
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Look up a header by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Body of the first successful attempt of a fallback request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackResponse {
    /// The URL that answered.
    pub url: String,
    /// Full response body text.
    pub body: String,
}

/// Transport abstraction for A2A communication.
///
/// Implementations issue a single HTTP request and either read the whole
/// body or expose it as a stream of framed SSE payloads.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue a request and return the full body text.
    ///
    /// Statuses outside `[200, 300)` fail with [`A2AError::Http`].
    async fn request(&self, url: &str, spec: &RequestSpec) -> A2AResult<String>;

    /// Issue a request and return its body as a stream of SSE payloads.
    ///
    /// Any status other than exactly `200` fails with [`A2AError::Http`].
    async fn stream(&self, url: &str, spec: &RequestSpec) -> A2AResult<PayloadStream>;

    /// Try `urls` in order and return the first successful body.
    ///
    /// Only transport-family errors ([`A2AError::is_transport`]) move on to
    /// the next URL; once every URL has failed the last error is returned.
    async fn request_with_fallback(
        &self,
        urls: &[String],
        spec: &RequestSpec,
    ) -> A2AResult<FallbackResponse> {
        let mut last_error = None;

        for (attempt, url) in urls.iter().enumerate() {
            match self.request(url, spec).await {
                Ok(body) => {
                    if attempt > 0 {
                        tracing::info!(url = %url, attempt = attempt + 1, "fallback request succeeded");
                    }
                    return Ok(FallbackResponse {
                        url: url.clone(),
                        body,
                    });
                }
                Err(e) if e.is_transport() => {
                    tracing::warn!(url = %url, error = %e, "request failed, trying next endpoint");
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or(A2AError::NoEndpoints))
    }
}

/// Configuration for [`HttpTransport`].
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Whole-request timeout for plain requests, and connect/header timeout
    /// for streams. Defaults to 60 seconds; `None` disables it.
    pub request_timeout: Option<Duration>,
    /// Maximum gap between two chunks of a streamed body. Defaults to none.
    pub stream_idle_timeout: Option<Duration>,
    /// Additional HTTP headers to include on every request.
    pub headers: HashMap<String, String>,
    /// Cap on unframed SSE bytes. Defaults to 1 MiB.
    pub max_buffer_bytes: usize,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            request_timeout: Some(Duration::from_secs(60)),
            stream_idle_timeout: None,
            headers: HashMap::new(),
            max_buffer_bytes: DEFAULT_MAX_BUFFER_BYTES,
        }
    }
}

/// HTTP transport using `reqwest`.
///
/// # Example
///
/// ```no_run
/// use a2a_chat::client::{HttpTransport, RequestSpec, Transport};
///
/// # async fn example() -> a2a_chat::A2AResult<()> {
/// let transport = HttpTransport::new();
/// let body = transport
///     .request("http://localhost:7420/.well-known/agent.json", &RequestSpec::get())
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    config: TransportConfig,
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpTransport {
    /// Create a transport with default configuration (60s timeout, no extra headers).
    pub fn new() -> Self {
        Self::with_config(TransportConfig::default())
    }

    /// Create a transport with custom configuration.
    pub fn with_config(config: TransportConfig) -> Self {
        let mut default_headers = HeaderMap::new();
        for (key, value) in &config.headers {
            if let (Ok(name), Ok(val)) = (
                HeaderName::from_bytes(key.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                default_headers.insert(name, val);
            } else {
                tracing::warn!(header = %key, "ignoring invalid header");
            }
        }

        let client = reqwest::Client::builder()
            .default_headers(default_headers)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self { client, config }
    }

    /// Create a transport with an existing `reqwest::Client`.
    ///
    /// Headers in `config` are not applied; configure them on the client.
    pub fn with_client(client: reqwest::Client, config: TransportConfig) -> Self {
        Self { client, config }
    }

    /// Returns the configuration this transport was built with.
    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    fn build(&self, url: &str, spec: &RequestSpec) -> reqwest::RequestBuilder {
        let mut builder = self.client.request(spec.method.clone(), url);
        for (name, value) in &spec.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &spec.body {
            builder = builder.body(body.clone());
        }
        builder
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn request(&self, url: &str, spec: &RequestSpec) -> A2AResult<String> {
        let mut builder = self.build(url, spec);
        if let Some(timeout) = self.config.request_timeout {
            builder = builder.timeout(timeout);
        }

        tracing::debug!(method = %spec.method, url = %url, "sending request");
        let response = builder
            .send()
            .await
            .map_err(|e| A2AError::from_reqwest("HTTP request failed", e))?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(A2AError::http(status, body_text));
        }

        response
            .text()
            .await
            .map_err(|e| A2AError::from_reqwest("failed to read response body", e))
    }

    async fn stream(&self, url: &str, spec: &RequestSpec) -> A2AResult<PayloadStream> {
        tracing::debug!(method = %spec.method, url = %url, "opening stream");
        let pending = self.build(url, spec).send();
        let sent = match self.config.request_timeout {
            Some(limit) => tokio::time::timeout(limit, pending).await.map_err(|_| {
                A2AError::Timeout(format!("stream request got no response within {limit:?}"))
            })?,
            None => pending.await,
        };
        let response = sent.map_err(|e| A2AError::from_reqwest("stream HTTP request failed", e))?;

        let status = response.status();
        if status != StatusCode::OK {
            let body_text = response.text().await.unwrap_or_default();
            return Err(A2AError::http(status, body_text));
        }

        let chunks = response.bytes_stream().map(|chunk| {
            chunk.map_err(|e| A2AError::Transport(format!("error reading SSE stream: {e}")))
        });
        Ok(PayloadStream::spawn(
            chunks,
            FramingOptions {
                max_buffer_bytes: self.config.max_buffer_bytes,
                idle_timeout: self.config.stream_idle_timeout,
            },
        ))
    }
}
