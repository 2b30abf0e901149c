//! Builder for configuring an [`A2AClient`](crate::client::A2AClient).

use std::sync::Arc;
use std::time::Duration;

use crate::client::{A2AClient, ClientConfig, Transport};
use crate::error::A2AResult;
use crate::types::AgentCard;

/// Builder for constructing an [`A2AClient`] with custom configuration.
///
/// # Example
///
/// ```no_run
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// use a2a_chat::builders::ClientBuilder;
/// use std::time::Duration;
///
/// let (client, card) = ClientBuilder::new()
///     .with_timeout(Duration::from_secs(30))
///     .with_client_id("my-terminal-ui")
///     .with_card_fallback_path(".well-known/agent-card.json")
///     .connect("http://localhost:7420")
///     .await?;
/// println!("connected to {} v{}", card.name, card.version);
/// # let _ = client;
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct ClientBuilder {
    config: ClientConfig,
    transport: Option<Arc<dyn Transport>>,
}

impl std::fmt::Debug for ClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("config", &self.config)
            .field("custom_transport", &self.transport.is_some())
            .finish()
    }
}

impl ClientBuilder {
    /// Create a builder with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.transport.request_timeout = Some(timeout);
        self
    }

    /// Disable the request timeout.
    pub fn without_timeout(mut self) -> Self {
        self.config.transport.request_timeout = None;
        self
    }

    /// Fail a stream when no bytes arrive for `timeout`.
    pub fn with_stream_idle_timeout(mut self, timeout: Duration) -> Self {
        self.config.transport.stream_idle_timeout = Some(timeout);
        self
    }

    /// Add a custom HTTP header sent on every request.
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.transport.headers.insert(key.into(), value.into());
        self
    }

    /// Set the `metadata.clientId` stamped into requests.
    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.config.client_id = client_id.into();
        self
    }

    /// Cap the bytes the SSE reader may hold without a complete frame.
    pub fn with_max_buffer_bytes(mut self, limit: usize) -> Self {
        self.config.transport.max_buffer_bytes = limit;
        self
    }

    /// Add a well-known card path tried after the default one.
    pub fn with_card_fallback_path(mut self, path: impl Into<String>) -> Self {
        self.config.card_fallback_paths.push(path.into());
        self
    }

    /// Use a custom transport. HTTP settings on this builder are then ignored.
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// The configuration built so far.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Build the client.
    pub fn build(self) -> A2AClient {
        match self.transport {
            Some(transport) => A2AClient::with_transport(transport, self.config),
            None => A2AClient::with_config(self.config),
        }
    }

    /// Build the client and check the agent at `agent_url`.
    pub async fn connect(self, agent_url: &str) -> A2AResult<(A2AClient, AgentCard)> {
        let client = self.build();
        let card = client.check_agent(agent_url).await?;
        Ok((client, card))
    }
}
