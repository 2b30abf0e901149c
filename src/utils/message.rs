//! Utility functions for creating outbound A2A Message objects and ids.

use crate::types::{Message, Part, Role};
use uuid::Uuid;

/// Generates a fresh message identifier (`msg-<uuid v4>`).
pub fn new_message_id() -> String {
    format!("msg-{}", Uuid::new_v4())
}

/// Generates a fresh JSON-RPC request identifier (`req-<uuid v4>`).
pub fn new_request_id() -> String {
    format!("req-{}", Uuid::new_v4())
}

/// Creates a user message containing a single text Part.
///
/// `task_id` and `context_id` are attached only when present and non-empty;
/// leaving them out lets the agent start a new task.
///
/// # Example
///
/// ```
/// use a2a_chat::utils::new_user_text_message;
///
/// let message = new_user_text_message("Hello", Some("task-1"), None);
/// assert_eq!(message.role, a2a_chat::types::Role::User);
/// assert_eq!(message.task_id.as_deref(), Some("task-1"));
/// assert!(message.context_id.is_none());
/// ```
pub fn new_user_text_message(
    text: impl Into<String>,
    task_id: Option<&str>,
    context_id: Option<&str>,
) -> Message {
    Message {
        kind: "message".to_string(),
        role: Role::User,
        message_id: new_message_id(),
        parts: vec![Part::text(text)],
        task_id: non_empty(task_id),
        context_id: non_empty(context_id),
        metadata: None,
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}
