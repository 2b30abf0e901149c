//! # a2a-chat — client core for chatting with Agent-to-Agent (A2A) agents
//!
//! This crate implements the client side of a chat UI that talks to remote
//! [A2A](https://a2a-protocol.org/latest/specification/) agents over
//! JSON-RPC 2.0, with real-time replies via Server-Sent Events (SSE).
//!
//! ## Overview
//!
//! A host (terminal UI, desktop shell, web bridge) hands the client an agent
//! URL and some user text. The client:
//! - checks the agent by fetching its card from `/.well-known/agent.json`
//! - wraps the text in a `message/send` or `message/stream` request
//! - for `message/send`, returns the agent's JSON reply unmodified
//! - for `message/stream`, frames the SSE body (tolerating arbitrary chunk
//!   boundaries), classifies every frame and delivers a [`types::StreamEvent`]
//!   to the host's [`client::EventSink`], in order
//!
//! HTTP goes through the [`client::Transport`] trait, which also provides an
//! ordered multi-URL fallback request.
//!
//! ## Quick Start
//!
//! ```no_run
//! use a2a_chat::client::{sink_fn, A2AClient, SendOptions};
//! use a2a_chat::types::StreamEvent;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let agent = "http://localhost:7420";
//!     let client = A2AClient::new();
//!
//!     let card = client.check_agent(agent).await?;
//!     println!("{} v{}", card.name, card.version);
//!
//!     let mut sink = sink_fn(|event| {
//!         match event {
//!             StreamEvent::StatusUpdate(update) if !update.status_only => {
//!                 println!("{}", update.text);
//!             }
//!             StreamEvent::ArtifactUpdate(artifact) => {
//!                 println!("[{}] {}", artifact.name, artifact.text_content);
//!             }
//!             other => println!("({})", other.type_name()),
//!         }
//!         Ok(())
//!     });
//!
//!     let options = SendOptions::new().streaming(true);
//!     client.send_message(agent, "Tell me a story", &options, Some(&mut sink)).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`client::A2AClient`] — check an agent, send a message, stream a reply
//! - [`client::CardResolver`] — discovers agent cards from well-known paths
//! - [`client::HttpTransport`] — `reqwest`-backed HTTP with fallback
//! - [`client::SseFramer`] / [`client::PayloadStream`] — SSE framing
//! - [`client::classify_payload`] — frame classification
//! - [`builders::ClientBuilder`] — configuration
//! - [`error::A2AError`] — error type for every operation
//!
//! ## Demos
//!
//! See the `demos/` directory for runnable programs:
//! - `chat_client.rs` — check an agent and send one message
//! - `stream_monitor.rs` — stream a reply as JSON lines for a host UI

pub mod builders;
pub mod client;
pub mod error;
pub mod types;
pub mod utils;

/// Prelude module that re-exports commonly used types and traits.
///
/// # Example
///
/// ```
/// use a2a_chat::prelude::*;
///
/// let options = SendOptions::new().streaming(true);
/// assert!(options.streaming);
/// ```
pub mod prelude {
    pub use crate::types::{
        AgentCard, ArtifactUpdate, Message, Part, Role, StatusUpdate, StreamEvent, TaskState,
        TaskUpdate,
    };

    pub use crate::error::{A2AError, A2AResult, SinkError};

    pub use crate::builders::ClientBuilder;

    pub use crate::client::{
        sink_fn, A2AClient, ChannelSink, EventSink, SendOptions, SendOutcome, StreamSummary,
    };
}

// Re-export core types at crate root for convenience.
pub use builders::ClientBuilder;
pub use error::{A2AError, A2AResult};
pub use types::*;
