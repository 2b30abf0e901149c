//! Constants for well-known paths and wire tokens.

/// The well-known path for the agent card, relative to the agent base URL.
pub const AGENT_CARD_WELL_KNOWN_PATH: &str = ".well-known/agent.json";

/// The newer well-known path some agents publish instead (A2A v0.3+).
pub const AGENT_CARD_V3_WELL_KNOWN_PATH: &str = ".well-known/agent-card.json";

/// Client identifier stamped into request metadata unless configured otherwise.
pub const DEFAULT_CLIENT_ID: &str = "a2a-chat-client";

/// JSON-RPC protocol version tag.
pub const JSONRPC_VERSION: &str = "2.0";

/// Field prefix of an SSE data line.
pub const SSE_DATA_PREFIX: &str = "data:";

/// Sentinel some agents send as the last data frame.
pub const SSE_DONE_SENTINEL: &str = "[DONE]";

/// Default cap on unframed bytes held by the SSE reader (1 MiB).
pub const DEFAULT_MAX_BUFFER_BYTES: usize = 1024 * 1024;
