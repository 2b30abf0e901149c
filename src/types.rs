//! Wire types for the A2A chat client.
//!
//! Two groups live here:
//!
//! - **Protocol types** that mirror the JSON the agent speaks: the outbound
//!   JSON-RPC envelope and message, and the inbound result payloads found in
//!   streamed frames (`status-update`, `artifact-update`, `task`, `message`).
//!   Inbound types are lenient: optional fields default, unknown roles and
//!   task states are kept, and unusable parts decode as `Part::Unknown`.
//! - **[`StreamEvent`]**, the small tagged union handed to the caller's sink.
//!   It serializes with a `type` tag and camelCase fields so a host UI can
//!   forward it unchanged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

// ============================================================================
// Enums
// ============================================================================

/// The lifecycle state of a task.
///
/// States the client does not know are preserved in [`TaskState::Unknown`]
/// instead of failing the whole frame.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskState {
    /// Task has been received but not yet started.
    Submitted,
    /// Task is actively being processed.
    Working,
    /// Task completed successfully.
    Completed,
    /// Task failed.
    Failed,
    /// Task was canceled.
    Canceled,
    /// Task requires additional input from the user.
    InputRequired,
    /// Task was rejected by the agent.
    Rejected,
    /// Task requires authentication.
    AuthRequired,
    /// Any state string not listed above.
    Unknown(String),
}

impl TaskState {
    /// Wire representation of this state.
    pub fn as_str(&self) -> &str {
        match self {
            TaskState::Submitted => "submitted",
            TaskState::Working => "working",
            TaskState::Completed => "completed",
            TaskState::Failed => "failed",
            TaskState::Canceled => "canceled",
            TaskState::InputRequired => "input-required",
            TaskState::Rejected => "rejected",
            TaskState::AuthRequired => "auth-required",
            TaskState::Unknown(s) => s,
        }
    }
}

impl From<String> for TaskState {
    fn from(s: String) -> Self {
        match s.as_str() {
            "submitted" => TaskState::Submitted,
            "working" => TaskState::Working,
            "completed" => TaskState::Completed,
            "failed" => TaskState::Failed,
            "canceled" => TaskState::Canceled,
            "input-required" => TaskState::InputRequired,
            "rejected" => TaskState::Rejected,
            "auth-required" => TaskState::AuthRequired,
            _ => TaskState::Unknown(s),
        }
    }
}

impl From<TaskState> for String {
    fn from(state: TaskState) -> Self {
        match state {
            TaskState::Unknown(s) => s,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The role of a message sender.
///
/// Roles other than `user` and `agent` are kept in [`Role::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum Role {
    /// Message from the user / client.
    User,
    /// Message from the agent / server.
    Agent,
    /// Role missing from the payload.
    #[default]
    Unspecified,
    /// Any other role string.
    Other(String),
}

impl Role {
    /// Wire representation of this role.
    pub fn as_str(&self) -> &str {
        match self {
            Role::User => "user",
            Role::Agent => "agent",
            Role::Unspecified => "unspecified",
            Role::Other(s) => s,
        }
    }
}

impl From<Option<String>> for Role {
    fn from(s: Option<String>) -> Self {
        let Some(s) = s else {
            return Role::Unspecified;
        };
        match s.as_str() {
            "user" => Role::User,
            "agent" => Role::Agent,
            "unspecified" => Role::Unspecified,
            _ => Role::Other(s),
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::Other(s) => s,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Message & Parts
// ============================================================================

/// A content part within a message or artifact, discriminated by `kind`.
///
/// JSON wire format:
/// - Text: `{"kind": "text", "text": "hello"}`
/// - File: `{"kind": "file", "file": {...}}`
/// - Data: `{"kind": "data", "data": {"key": "value"}}`
///
/// Decoding never fails on a well-formed JSON value: a part with a missing
/// or unknown `kind`, or without the field its kind requires, becomes
/// [`Part::Unknown`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum Part {
    /// A text content part.
    #[serde(rename = "text")]
    Text {
        /// The text content.
        text: String,
        /// Optional metadata associated with this part.
        #[serde(skip_serializing_if = "Option::is_none")]
        metadata: Option<Value>,
    },
    /// A file content part. The client never inspects file content.
    #[serde(rename = "file")]
    File {
        /// The file content (inline bytes or URI), kept as raw JSON.
        file: Value,
        /// Optional metadata associated with this part.
        #[serde(skip_serializing_if = "Option::is_none")]
        metadata: Option<Value>,
    },
    /// A structured data content part.
    #[serde(rename = "data")]
    Data {
        /// Arbitrary structured data.
        data: Value,
        /// Optional metadata associated with this part.
        #[serde(skip_serializing_if = "Option::is_none")]
        metadata: Option<Value>,
    },
    /// A part this client cannot use.
    #[serde(rename = "unknown")]
    Unknown,
}

impl<'de> Deserialize<'de> for Part {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Part::from_value(Value::deserialize(deserializer)?))
    }
}

impl Part {
    fn from_value(value: Value) -> Self {
        let Value::Object(mut map) = value else {
            return Part::Unknown;
        };
        let metadata = map.remove("metadata").filter(|m| !m.is_null());
        let kind = map.get("kind").and_then(Value::as_str).map(str::to_owned);

        match kind.as_deref() {
            Some("text") => match map.remove("text") {
                Some(Value::String(text)) => Part::Text { text, metadata },
                _ => Part::Unknown,
            },
            Some("file") => match map.remove("file") {
                Some(file) => Part::File { file, metadata },
                None => Part::Unknown,
            },
            Some("data") => match map.remove("data") {
                Some(data) => Part::Data { data, metadata },
                None => Part::Unknown,
            },
            _ => Part::Unknown,
        }
    }

    /// Create a text part.
    pub fn text(text: impl Into<String>) -> Self {
        Part::Text {
            text: text.into(),
            metadata: None,
        }
    }
}

/// A single message in a conversation.
///
/// Used both for the outbound user turn and for agent messages embedded in
/// streamed status updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Discriminator field, always "message".
    #[serde(default = "kind_message")]
    pub kind: String,

    /// Who sent this message.
    #[serde(default)]
    pub role: Role,

    /// Unique message identifier.
    #[serde(default)]
    pub message_id: String,

    /// Content parts of the message.
    #[serde(default)]
    pub parts: Vec<Part>,

    /// Task this message is associated with.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,

    /// Context this message belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_id: Option<String>,

    /// Arbitrary metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

fn kind_message() -> String {
    "message".to_string()
}

// ============================================================================
// Inbound result payloads
// ============================================================================

/// Current status of a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStatus {
    /// The current state.
    pub state: TaskState,

    /// Optional message associated with this status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,

    /// ISO-8601 timestamp of when this status was set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// A task snapshot (`kind: "task"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique task identifier.
    pub id: String,

    /// Context identifier.
    pub context_id: String,

    /// Current task status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
}

/// An artifact produced by a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    /// Unique artifact identifier.
    pub artifact_id: String,

    /// Human-readable name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Description of the artifact.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Content parts of the artifact.
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// Notification that a task's status has changed (`kind: "status-update"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStatusUpdateEvent {
    /// ID of the task whose status changed.
    #[serde(default)]
    pub task_id: Option<String>,

    /// Context this task belongs to.
    #[serde(default)]
    pub context_id: Option<String>,

    /// The new status.
    pub status: TaskStatus,

    /// Whether this is the final status update for this task.
    #[serde(default, rename = "final")]
    pub r#final: bool,
}

/// Notification that an artifact has been created or updated
/// (`kind: "artifact-update"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskArtifactUpdateEvent {
    /// ID of the task that produced the artifact.
    #[serde(default)]
    pub task_id: Option<String>,

    /// Context this task belongs to.
    #[serde(default)]
    pub context_id: Option<String>,

    /// The artifact.
    pub artifact: Artifact,

    /// Whether to append to an existing artifact.
    #[serde(default)]
    pub append: Option<bool>,

    /// Whether this is the last chunk of the artifact.
    #[serde(default)]
    pub last_chunk: Option<bool>,
}

// ============================================================================
// Agent Card
// ============================================================================

/// Self-describing manifest for an A2A agent.
///
/// Only `name` and `version` are required. Every other descriptor field the
/// agent publishes is kept in [`AgentCard::extra`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentCard {
    /// Human-readable name.
    pub name: String,

    /// Agent version string.
    pub version: String,

    /// Description of the agent's capabilities.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Primary URL for the agent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Agent capabilities.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capabilities: Option<AgentCapabilities>,

    /// Skills the agent supports.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skills: Vec<AgentSkill>,

    /// Remaining descriptor fields, untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AgentCard {
    /// Whether the agent advertises `message/stream` support.
    pub fn supports_streaming(&self) -> bool {
        self.capabilities
            .as_ref()
            .and_then(|c| c.streaming)
            .unwrap_or(false)
    }
}

/// Agent capabilities declaration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentCapabilities {
    /// Whether the agent supports streaming responses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub streaming: Option<bool>,

    /// Whether the agent supports push notifications.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub push_notifications: Option<bool>,
}

/// A skill that an agent can perform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentSkill {
    /// Unique skill identifier.
    pub id: String,

    /// Human-readable skill name.
    #[serde(default)]
    pub name: String,

    /// Description of what the skill does.
    #[serde(default)]
    pub description: String,

    /// Categorization tags.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

// ============================================================================
// JSON-RPC
// ============================================================================

/// A JSON-RPC request identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JsonRpcId {
    /// String identifier.
    String(String),
    /// Numeric identifier.
    Number(i64),
}

impl fmt::Display for JsonRpcId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JsonRpcId::String(s) => write!(f, "{}", s),
            JsonRpcId::Number(n) => write!(f, "{}", n),
        }
    }
}

/// JSON-RPC method used to deliver a user message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RpcMethod {
    /// `message/send`: single JSON response.
    MessageSend,
    /// `message/stream`: SSE response.
    MessageStream,
}

impl RpcMethod {
    /// Wire name of the method.
    pub fn as_str(&self) -> &'static str {
        match self {
            RpcMethod::MessageSend => "message/send",
            RpcMethod::MessageStream => "message/stream",
        }
    }
}

impl fmt::Display for RpcMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Client metadata stamped into every request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientMetadata {
    /// Fixed identifier of this client.
    pub client_id: String,
}

/// Parameters for `message/send` and `message/stream`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageParams {
    /// The message to send.
    pub message: Message,

    /// Client metadata.
    pub metadata: ClientMetadata,
}

/// A JSON-RPC 2.0 request carrying a user message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    /// Request identifier, independent of the message identifier.
    pub id: JsonRpcId,

    /// Protocol version, always "2.0".
    pub jsonrpc: String,

    /// Method name.
    pub method: String,

    /// Method parameters.
    pub params: SendMessageParams,
}

/// A JSON-RPC 2.0 error object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    /// Error code.
    pub code: i64,

    /// Human-readable error message.
    pub message: String,

    /// Optional structured error data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

// ============================================================================
// Stream events (delivered to the sink)
// ============================================================================

/// One classified update from a `message/stream` response.
///
/// Ephemeral: built per frame and handed to the sink; the client keeps no
/// copy.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum StreamEvent {
    /// A task status change, optionally carrying agent text.
    StatusUpdate(StatusUpdate),
    /// A new or incremental artifact.
    ArtifactUpdate(ArtifactUpdate),
    /// A task snapshot.
    TaskUpdate(TaskUpdate),
    /// A direct agent message.
    Message(AgentMessage),
    /// A JSON-RPC error envelope received inside the stream.
    RpcError(JsonRpcError),
    /// A valid frame whose `kind` is missing or not recognized.
    Unclassified(UnclassifiedFrame),
    /// A frame that could not be decoded.
    ParseError(ParseErrorFrame),
}

impl StreamEvent {
    /// The `type` tag this event serializes with.
    pub fn type_name(&self) -> &'static str {
        match self {
            StreamEvent::StatusUpdate(_) => "status-update",
            StreamEvent::ArtifactUpdate(_) => "artifact-update",
            StreamEvent::TaskUpdate(_) => "task-update",
            StreamEvent::Message(_) => "message",
            StreamEvent::RpcError(_) => "rpc-error",
            StreamEvent::Unclassified(_) => "unclassified",
            StreamEvent::ParseError(_) => "parse-error",
        }
    }

    /// Whether this event reports a final task status.
    pub fn is_final(&self) -> bool {
        match self {
            StreamEvent::StatusUpdate(update) => update.status.is_final,
            _ => false,
        }
    }
}

/// Status fields shared by every status update.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusInfo {
    /// The task state.
    pub state: TaskState,
    /// Timestamp reported by the agent.
    pub timestamp: Option<String>,
    /// Whether this is the final update for the task.
    #[serde(rename = "final")]
    pub is_final: bool,
    /// Task id.
    pub task_id: Option<String>,
    /// Context id.
    pub context_id: Option<String>,
}

/// A `status-update` event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    /// Concatenated text parts of the status message (empty when
    /// `status_only`).
    pub text: String,
    /// Status fields.
    pub status: StatusInfo,
    /// Id of the originating message, when text is present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    /// Role of the originating message, when text is present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    /// True when the update carries no text.
    pub status_only: bool,
}

/// An `artifact-update` event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactUpdate {
    /// Artifact id.
    pub artifact_id: String,
    /// Artifact name, or `"Artifact {id}"` when the agent sent none.
    pub name: String,
    /// Text parts, concatenated in order.
    pub text_content: String,
    /// Data parts, shallow-merged; later keys win.
    pub data_content: Map<String, Value>,
    /// Append to a previously delivered artifact with the same id.
    pub append: Option<bool>,
    /// Last chunk of this artifact.
    pub last_chunk: Option<bool>,
    /// Task id.
    pub task_id: Option<String>,
    /// When the client classified the frame.
    pub timestamp: DateTime<Utc>,
}

/// A `task-update` event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskUpdate {
    /// Task id.
    pub task_id: String,
    /// Context id.
    pub context_id: String,
    /// Current status state, if the snapshot carried one.
    pub state: Option<TaskState>,
    /// When the client classified the frame.
    pub timestamp: DateTime<Utc>,
}

/// A `message` event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentMessage {
    /// Message id.
    pub message_id: String,
    /// Sender role.
    pub role: Role,
    /// Text parts, concatenated in order.
    pub text: String,
    /// Task id.
    pub task_id: Option<String>,
    /// Context id.
    pub context_id: Option<String>,
}

/// An `unclassified` event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnclassifiedFrame {
    /// The `kind` found in the result, if any.
    pub kind: Option<String>,
    /// The decoded frame.
    pub payload: Value,
}

/// A `parse-error` event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseErrorFrame {
    /// The raw payload text.
    pub text: String,
    /// Decoder message.
    pub reason: String,
}
