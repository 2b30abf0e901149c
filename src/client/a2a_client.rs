//! High-level A2A chat client.
//!
//! Ties the pieces together: discovery through [`CardResolver`], request
//! encoding, dispatch over a [`Transport`], and for streamed replies the SSE
//! reader and classifier feeding the caller's [`EventSink`].

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::Stream;
use serde_json::Value;

use crate::error::{A2AError, A2AResult};
use crate::types::{AgentCard, JsonRpcRequest, RpcMethod, StreamEvent, TaskState};
use crate::utils::constants::DEFAULT_CLIENT_ID;

use super::card_resolver::CardResolver;
use super::classifier::classify_payload;
use super::encoder::{build_request, encode_request, message_endpoint, select_method, SendOptions};
use super::sink::EventSink;
use super::sse::PayloadStream;
use super::transport::{HttpTransport, RequestSpec, Transport, TransportConfig};

/// Configuration for [`A2AClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// HTTP settings for the default transport.
    pub transport: TransportConfig,
    /// Identifier stamped into every request's `metadata.clientId`.
    pub client_id: String,
    /// Extra well-known card paths tried after `.well-known/agent.json`.
    pub card_fallback_paths: Vec<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            transport: TransportConfig::default(),
            client_id: DEFAULT_CLIENT_ID.to_string(),
            card_fallback_paths: Vec::new(),
        }
    }
}

/// Result of [`A2AClient::send_message`].
#[derive(Debug, Clone, PartialEq)]
pub enum SendOutcome {
    /// The parsed JSON body of a `message/send` reply, unmodified.
    Response(Value),
    /// A `message/stream` reply was delivered to the sink.
    Streamed(StreamSummary),
}

/// What happened on a completed stream.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StreamSummary {
    /// Events delivered (or offered) to the sink.
    pub events: usize,
    /// Frames that could not be decoded.
    pub parse_errors: usize,
    /// Events the sink rejected.
    pub sink_failures: usize,
    /// Last task id seen on the stream.
    pub task_id: Option<String>,
    /// Last context id seen on the stream.
    pub context_id: Option<String>,
    /// State of the final status update, if one arrived.
    pub final_state: Option<TaskState>,
}

impl StreamSummary {
    /// Account for one event.
    pub fn record(&mut self, event: &StreamEvent) {
        self.events += 1;
        match event {
            StreamEvent::StatusUpdate(update) => {
                self.track_ids(update.status.task_id.as_deref(), update.status.context_id.as_deref());
                if update.status.is_final {
                    self.final_state = Some(update.status.state.clone());
                }
            }
            StreamEvent::ArtifactUpdate(update) => self.track_ids(update.task_id.as_deref(), None),
            StreamEvent::TaskUpdate(update) => {
                self.track_ids(Some(update.task_id.as_str()), Some(update.context_id.as_str()))
            }
            StreamEvent::Message(message) => {
                self.track_ids(message.task_id.as_deref(), message.context_id.as_deref())
            }
            StreamEvent::ParseError(_) => self.parse_errors += 1,
            StreamEvent::RpcError(_) | StreamEvent::Unclassified(_) => {}
        }
    }

    fn track_ids(&mut self, task_id: Option<&str>, context_id: Option<&str>) {
        if let Some(id) = task_id.filter(|id| !id.is_empty()) {
            self.task_id = Some(id.to_string());
        }
        if let Some(id) = context_id.filter(|id| !id.is_empty()) {
            self.context_id = Some(id.to_string());
        }
    }
}

/// Classified events of one `message/stream` reply, in wire order.
///
/// A transport error, idle timeout or buffer overflow is yielded once as
/// `Err` and ends the stream.
pub struct EventStream {
    payloads: PayloadStream,
}

impl std::fmt::Debug for EventStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventStream").finish_non_exhaustive()
    }
}

impl EventStream {
    /// Classify an existing payload stream.
    pub fn new(payloads: PayloadStream) -> Self {
        Self { payloads }
    }

    /// Get the next event. Returns `None` once the stream is exhausted.
    pub async fn next(&mut self) -> Option<A2AResult<StreamEvent>> {
        let payload = self.payloads.next().await?;
        Some(payload.map(|raw| classify_frame(&raw)))
    }
}

impl Stream for EventStream {
    type Item = A2AResult<StreamEvent>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.payloads)
            .poll_next(cx)
            .map(|item| item.map(|payload| payload.map(|raw| classify_frame(&raw))))
    }
}

fn classify_frame(raw: &str) -> StreamEvent {
    tracing::debug!(frame = raw, "received stream frame");
    classify_payload(raw)
}

/// Client for chatting with A2A-compatible agents.
///
/// # Example
///
/// ```no_run
/// use a2a_chat::client::{sink_fn, A2AClient, SendOptions};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = A2AClient::new();
/// let card = client.check_agent("http://localhost:7420").await?;
/// println!("talking to {}", card.name);
///
/// // Single JSON reply:
/// let reply = client
///     .send_text("http://localhost:7420", "Hello", &SendOptions::new())
///     .await?;
/// println!("{reply}");
///
/// // Streamed reply:
/// let mut sink = sink_fn(|event| {
///     println!("{}", event.type_name());
///     Ok(())
/// });
/// let summary = client
///     .stream_text("http://localhost:7420", "Tell me a story", &SendOptions::new(), &mut sink)
///     .await?;
/// println!("{} events", summary.events);
/// # Ok(())
/// # }
/// ```
pub struct A2AClient {
    transport: Arc<dyn Transport>,
    config: ClientConfig,
}

impl std::fmt::Debug for A2AClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("A2AClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for A2AClient {
    fn default() -> Self {
        Self::new()
    }
}

impl A2AClient {
    /// Create a client with default configuration.
    pub fn new() -> Self {
        Self::with_config(ClientConfig::default())
    }

    /// Create a client over an [`HttpTransport`] built from `config`.
    pub fn with_config(config: ClientConfig) -> Self {
        let transport = Arc::new(HttpTransport::with_config(config.transport.clone()));
        Self::with_transport(transport, config)
    }

    /// Create a client with a custom transport.
    ///
    /// `config.transport` is ignored; the transport brings its own settings.
    pub fn with_transport(transport: Arc<dyn Transport>, config: ClientConfig) -> Self {
        Self { transport, config }
    }

    /// Returns the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// A card resolver sharing this client's transport and card paths.
    pub fn card_resolver(&self) -> CardResolver {
        self.config
            .card_fallback_paths
            .iter()
            .fold(CardResolver::with_transport(self.transport.clone()), |resolver, path| {
                resolver.with_fallback_path(path.clone())
            })
    }

    /// Fetch the agent card to check that an agent is reachable.
    ///
    /// # Errors
    ///
    /// Propagates the transport error of the last card URL tried, or
    /// [`A2AError::InvalidJson`] for a body that is not a card.
    pub async fn check_agent(&self, agent_url: &str) -> A2AResult<AgentCard> {
        tracing::info!(agent_url = %agent_url, "checking agent");
        match self.card_resolver().resolve(agent_url).await {
            Ok(card) => {
                tracing::info!("connected to agent: {} v{}", card.name, card.version);
                Ok(card)
            }
            Err(e) => {
                tracing::error!(agent_url = %agent_url, error = %e, "failed to connect to agent");
                Err(e)
            }
        }
    }

    /// Send one user message.
    ///
    /// Streams (`message/stream`) only when `options.streaming` is set and a
    /// sink is given; otherwise sends `message/send` and returns the reply.
    pub async fn send_message(
        &self,
        agent_url: &str,
        text: &str,
        options: &SendOptions,
        sink: Option<&mut dyn EventSink>,
    ) -> A2AResult<SendOutcome> {
        let method = select_method(options.streaming, sink.is_some());
        let request = build_request(text, method, options, &self.config.client_id);
        tracing::info!(
            agent_url = %agent_url,
            method = %method,
            task_id = options.task_id.as_deref().unwrap_or_default(),
            context_id = options.context_id.as_deref().unwrap_or_default(),
            "sending message"
        );

        let outcome = match (method, sink) {
            (RpcMethod::MessageStream, Some(sink)) => self
                .stream_request(agent_url, &request, sink)
                .await
                .map(SendOutcome::Streamed),
            _ => self
                .send_request(agent_url, &request)
                .await
                .map(SendOutcome::Response),
        };

        if let Err(e) = &outcome {
            tracing::error!(agent_url = %agent_url, method = %method, error = %e, "failed to send message");
        }
        outcome
    }

    /// Send with `message/send` and return the parsed reply.
    ///
    /// `options.streaming` is ignored.
    pub async fn send_text(
        &self,
        agent_url: &str,
        text: &str,
        options: &SendOptions,
    ) -> A2AResult<Value> {
        match self.send_message(agent_url, text, options, None).await? {
            SendOutcome::Response(value) => Ok(value),
            SendOutcome::Streamed(_) => Err(A2AError::Other(
                "unexpected streamed reply to message/send".into(),
            )),
        }
    }

    /// Send with `message/stream`, delivering every event to `sink`.
    ///
    /// `options.streaming` is ignored.
    pub async fn stream_text(
        &self,
        agent_url: &str,
        text: &str,
        options: &SendOptions,
        sink: &mut dyn EventSink,
    ) -> A2AResult<StreamSummary> {
        let options = options.clone().streaming(true);
        match self.send_message(agent_url, text, &options, Some(sink)).await? {
            SendOutcome::Streamed(summary) => Ok(summary),
            SendOutcome::Response(_) => Err(A2AError::Other(
                "unexpected single reply to message/stream".into(),
            )),
        }
    }

    /// Send with `message/stream` and return the events as a [`Stream`]
    /// instead of pushing them to a sink.
    pub async fn stream_events(
        &self,
        agent_url: &str,
        text: &str,
        options: &SendOptions,
    ) -> A2AResult<EventStream> {
        let request = build_request(text, RpcMethod::MessageStream, options, &self.config.client_id);
        tracing::info!(agent_url = %agent_url, method = %RpcMethod::MessageStream, "sending message");
        self.open_stream(agent_url, &request).await
    }

    async fn send_request(&self, agent_url: &str, request: &JsonRpcRequest) -> A2AResult<Value> {
        let endpoint = message_endpoint(agent_url);
        let spec =
            RequestSpec::post_json(encode_request(request)?).with_header("Accept", "application/json");

        let response = self
            .transport
            .request_with_fallback(std::slice::from_ref(&endpoint), &spec)
            .await?;

        let value: Value = serde_json::from_str(&response.body).map_err(|e| {
            A2AError::InvalidJson(format!("reply from {} is not JSON: {e}", response.url))
        })?;

        if value.get("error").is_some() {
            tracing::warn!(agent_url = %agent_url, error = %value["error"], "agent returned a JSON-RPC error");
        }
        Ok(value)
    }

    async fn open_stream(&self, agent_url: &str, request: &JsonRpcRequest) -> A2AResult<EventStream> {
        let spec = RequestSpec::post_json(encode_request(request)?)
            .with_header("Accept", "text/event-stream")
            .with_header("Cache-Control", "no-cache");

        let payloads = self.transport.stream(agent_url, &spec).await?;
        Ok(EventStream::new(payloads))
    }

    async fn stream_request(
        &self,
        agent_url: &str,
        request: &JsonRpcRequest,
        sink: &mut dyn EventSink,
    ) -> A2AResult<StreamSummary> {
        let mut events = self.open_stream(agent_url, request).await?;
        let mut summary = StreamSummary::default();

        while let Some(event) = events.next().await {
            let event = event?;
            summary.record(&event);
            if let Err(e) = sink.deliver(event) {
                summary.sink_failures += 1;
                tracing::warn!(error = %e, "event sink failed, continuing stream");
            }
        }

        tracing::info!(
            events = summary.events,
            parse_errors = summary.parse_errors,
            "stream finished"
        );
        Ok(summary)
    }
}
