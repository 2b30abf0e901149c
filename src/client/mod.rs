//! A2A chat client: talk to remote A2A agents over JSON-RPC and SSE.
//!
//! - [`A2AClient`] — check an agent, send a message, stream the reply
//! - [`CardResolver`] — discover agent cards via the well-known URL convention
//! - [`Transport`] / [`HttpTransport`] — pluggable HTTP layer with
//!   ordered multi-URL fallback
//! - [`SseFramer`] / [`PayloadStream`] — chunk-boundary-safe SSE framing
//! - [`classify_payload`] — frame to [`StreamEvent`](crate::types::StreamEvent)
//! - [`EventSink`] — where classified events are delivered
//!
//! # Quick Start
//!
//! ```no_run
//! use a2a_chat::client::{A2AClient, ChannelSink, SendOptions};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = A2AClient::new();
//! client.check_agent("http://localhost:7420").await?;
//!
//! let (mut sink, mut events) = ChannelSink::channel();
//! let printer = tokio::spawn(async move {
//!     while let Some(event) = events.recv().await {
//!         println!("{}", serde_json::to_string(&event).unwrap_or_default());
//!     }
//! });
//!
//! client
//!     .stream_text("http://localhost:7420", "Write a haiku", &SendOptions::new(), &mut sink)
//!     .await?;
//! drop(sink);
//! printer.await?;
//! # Ok(())
//! # }
//! ```

mod a2a_client;
mod card_resolver;
mod classifier;
mod encoder;
mod sink;
mod sse;
mod transport;

pub use a2a_client::{A2AClient, ClientConfig, EventStream, SendOutcome, StreamSummary};
pub use card_resolver::CardResolver;
pub use classifier::{classify, classify_payload};
pub use encoder::{
    build_request, encode_request, message_endpoint, select_method, SendOptions,
};
pub use sink::{sink_fn, ChannelSink, EventSink};
pub use sse::{FramingOptions, PayloadStream, SseFramer};
pub use transport::{FallbackResponse, HttpTransport, RequestSpec, Transport, TransportConfig};
