//! Protocol encoding for outbound user messages.
//!
//! Picks the JSON-RPC method, wraps the user's text in a `message/send` or
//! `message/stream` envelope and derives the endpoint URL.

use crate::error::A2AResult;
use crate::types::{ClientMetadata, JsonRpcId, JsonRpcRequest, RpcMethod, SendMessageParams};
use crate::utils::constants::JSONRPC_VERSION;
use crate::utils::message::{new_request_id, new_user_text_message};

/// Per-send options chosen by the caller.
///
/// # Example
///
/// ```
/// use a2a_chat::client::SendOptions;
///
/// let options = SendOptions::new().streaming(true).task_id("task-42");
/// assert!(options.streaming);
/// assert_eq!(options.task_id.as_deref(), Some("task-42"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SendOptions {
    /// Ask for a streamed (`message/stream`) response.
    pub streaming: bool,
    /// Continue an existing task.
    pub task_id: Option<String>,
    /// Continue an existing conversation context.
    pub context_id: Option<String>,
}

impl SendOptions {
    /// Non-streaming options with no task or context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the streaming flag.
    pub fn streaming(mut self, streaming: bool) -> Self {
        self.streaming = streaming;
        self
    }

    /// Continue the given task.
    pub fn task_id(mut self, task_id: impl Into<String>) -> Self {
        self.task_id = Some(task_id.into());
        self
    }

    /// Continue the given context.
    pub fn context_id(mut self, context_id: impl Into<String>) -> Self {
        self.context_id = Some(context_id.into());
        self
    }
}

/// Streaming is used only when requested and there is a sink to deliver to.
pub fn select_method(streaming: bool, has_sink: bool) -> RpcMethod {
    if streaming && has_sink {
        RpcMethod::MessageStream
    } else {
        RpcMethod::MessageSend
    }
}

/// Build the JSON-RPC request for one user message.
///
/// Every call gets fresh message and request ids. `taskId` and `contextId`
/// are included only when non-empty.
///
/// # Example
///
/// ```
/// use a2a_chat::client::{build_request, SendOptions};
/// use a2a_chat::types::RpcMethod;
///
/// let request = build_request("Hello", RpcMethod::MessageSend, &SendOptions::new(), "my-ui");
/// assert_eq!(request.method, "message/send");
/// assert_eq!(request.params.metadata.client_id, "my-ui");
/// ```
pub fn build_request(
    text: &str,
    method: RpcMethod,
    options: &SendOptions,
    client_id: &str,
) -> JsonRpcRequest {
    let message = new_user_text_message(
        text,
        options.task_id.as_deref(),
        options.context_id.as_deref(),
    );

    JsonRpcRequest {
        id: JsonRpcId::String(new_request_id()),
        jsonrpc: JSONRPC_VERSION.to_string(),
        method: method.as_str().to_string(),
        params: SendMessageParams {
            message,
            metadata: ClientMetadata {
                client_id: client_id.to_string(),
            },
        },
    }
}

/// Serialize a request into its JSON body.
pub fn encode_request(request: &JsonRpcRequest) -> A2AResult<String> {
    Ok(serde_json::to_string(request)?)
}

/// Endpoint for non-streaming sends: the agent URL with a trailing slash.
pub fn message_endpoint(agent_url: &str) -> String {
    if agent_url.ends_with('/') {
        agent_url.to_string()
    } else {
        format!("{agent_url}/")
    }
}
