//! Agent card discovery and resolution.
//!
//! Implements the well-known URI convention for discovering A2A agent cards.
//! The card is fetched from `{base}/.well-known/agent.json`; extra well-known
//! paths can be configured and are tried in order after it.

use std::sync::Arc;

use crate::error::{A2AError, A2AResult};
use crate::types::AgentCard;
use crate::utils::constants::AGENT_CARD_WELL_KNOWN_PATH;

use super::transport::{HttpTransport, RequestSpec, Transport};

/// Resolves [`AgentCard`]s from agent base URLs.
///
/// # Example
///
/// ```no_run
/// use a2a_chat::client::CardResolver;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let resolver = CardResolver::new();
/// let card = resolver.resolve("http://localhost:7420").await?;
/// println!("Agent: {} v{}", card.name, card.version);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct CardResolver {
    transport: Arc<dyn Transport>,
    /// Well-known paths tried in order, relative to the base URL.
    card_paths: Vec<String>,
}

impl std::fmt::Debug for CardResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CardResolver")
            .field("card_paths", &self.card_paths)
            .finish_non_exhaustive()
    }
}

impl CardResolver {
    /// Create a new resolver over a default [`HttpTransport`].
    pub fn new() -> Self {
        Self::with_transport(Arc::new(HttpTransport::new()))
    }

    /// Create a resolver that fetches through the given transport.
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            card_paths: vec![AGENT_CARD_WELL_KNOWN_PATH.to_string()],
        }
    }

    /// Also try `path` (e.g. `.well-known/agent-card.json`) when the
    /// previously configured paths fail.
    pub fn with_fallback_path(mut self, path: impl Into<String>) -> Self {
        self.card_paths.push(path.into());
        self
    }

    /// Build the card URL for `base_url` and a well-known `path`.
    ///
    /// Exactly one `/` separates the two.
    ///
    /// ```
    /// use a2a_chat::client::CardResolver;
    ///
    /// assert_eq!(
    ///     CardResolver::card_url("http://h:1/", ".well-known/agent.json"),
    ///     "http://h:1/.well-known/agent.json"
    /// );
    /// assert_eq!(
    ///     CardResolver::card_url("http://h:1", ".well-known/agent.json"),
    ///     "http://h:1/.well-known/agent.json"
    /// );
    /// ```
    pub fn card_url(base_url: &str, path: &str) -> String {
        let path = path.trim_start_matches('/');
        if base_url.ends_with('/') {
            format!("{base_url}{path}")
        } else {
            format!("{base_url}/{path}")
        }
    }

    /// The URLs [`resolve`](Self::resolve) will try, in order.
    pub fn candidate_urls(&self, base_url: &str) -> Vec<String> {
        self.card_paths
            .iter()
            .map(|path| Self::card_url(base_url, path))
            .collect()
    }

    /// Fetch and parse the agent card for the given base URL.
    ///
    /// # Errors
    ///
    /// Returns the transport error of the last URL tried when none answers
    /// successfully, and [`A2AError::InvalidJson`] when the body is not a
    /// card with at least `name` and `version`.
    pub async fn resolve(&self, base_url: &str) -> A2AResult<AgentCard> {
        let urls = self.candidate_urls(base_url);
        tracing::info!(base_url = %base_url, "fetching agent card");

        let spec = RequestSpec::get().with_header("Accept", "application/json");
        let response = self.transport.request_with_fallback(&urls, &spec).await?;

        let card: AgentCard = serde_json::from_str(&response.body).map_err(|e| {
            A2AError::InvalidJson(format!(
                "failed to parse agent card from {}: {e}",
                response.url
            ))
        })?;

        tracing::debug!(url = %response.url, "resolved agent card: {} v{}", card.name, card.version);
        Ok(card)
    }
}

impl Default for CardResolver {
    fn default() -> Self {
        Self::new()
    }
}
