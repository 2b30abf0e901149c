//! Turns decoded stream frames into [`StreamEvent`]s.
//!
//! A frame is either a JSON-RPC response envelope whose `result` carries the
//! update, or (from some agents) the bare result object itself. The result's
//! `kind` selects the event type. Classification never fails: bad frames
//! become [`StreamEvent::ParseError`] so the stream keeps going.

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::types::{
    AgentMessage, ArtifactUpdate, JsonRpcError, Message, ParseErrorFrame, StatusInfo,
    StatusUpdate, StreamEvent, Task, TaskArtifactUpdateEvent, TaskStatusUpdateEvent, TaskUpdate,
    UnclassifiedFrame,
};
use crate::utils::parts::{concat_text_parts, merge_data_parts};

/// Classify one raw payload from the SSE reader.
///
/// # Example
///
/// ```
/// use a2a_chat::client::classify_payload;
/// use a2a_chat::types::StreamEvent;
///
/// let event = classify_payload(r#"{"result":{"kind":"task","id":"t1","contextId":"c1"}}"#);
/// assert!(matches!(event, StreamEvent::TaskUpdate(_)));
///
/// let event = classify_payload("{not json");
/// assert!(matches!(event, StreamEvent::ParseError(_)));
/// ```
pub fn classify_payload(raw: &str) -> StreamEvent {
    match serde_json::from_str::<Value>(raw) {
        Ok(payload) => classify_value(raw, &payload),
        Err(e) => {
            tracing::warn!(error = %e, "failed to decode stream frame");
            parse_error(raw.to_string(), e)
        }
    }
}

/// Classify an already-decoded frame.
pub fn classify(payload: &Value) -> StreamEvent {
    classify_value(&payload.to_string(), payload)
}

fn classify_value(raw: &str, payload: &Value) -> StreamEvent {
    let result = match payload.get("result") {
        Some(result) => result,
        None => {
            if let Some(error) = payload.get("error") {
                return match decode::<JsonRpcError>(error) {
                    Ok(error) => {
                        tracing::warn!(code = error.code, error_message = %error.message, "agent returned an error in stream");
                        StreamEvent::RpcError(error)
                    }
                    Err(e) => parse_error(raw.to_string(), e),
                };
            }
            if payload.get("kind").is_none() {
                return unclassified(None, payload);
            }
            payload
        }
    };

    let kind = result.get("kind").and_then(Value::as_str);
    let event = match kind {
        Some("status-update") => decode(result).map(status_update),
        Some("artifact-update") => decode(result).map(artifact_update),
        Some("task") => decode(result).map(task_update),
        Some("message") => decode(result).map(agent_message),
        other => return unclassified(other.map(str::to_string), payload),
    };

    event.unwrap_or_else(|e| {
        tracing::warn!(kind = kind.unwrap_or_default(), error = %e, "malformed stream frame");
        parse_error(raw.to_string(), e)
    })
}

fn decode<T: DeserializeOwned>(value: &Value) -> Result<T, serde_json::Error> {
    T::deserialize(value)
}

fn parse_error(text: String, err: serde_json::Error) -> StreamEvent {
    StreamEvent::ParseError(ParseErrorFrame {
        text,
        reason: err.to_string(),
    })
}

fn unclassified(kind: Option<String>, payload: &Value) -> StreamEvent {
    tracing::warn!(kind = kind.as_deref().unwrap_or("<none>"), "unhandled stream frame");
    StreamEvent::Unclassified(UnclassifiedFrame {
        kind,
        payload: payload.clone(),
    })
}

fn status_update(event: TaskStatusUpdateEvent) -> StreamEvent {
    let status = StatusInfo {
        state: event.status.state,
        timestamp: event.status.timestamp,
        is_final: event.r#final,
        task_id: event.task_id,
        context_id: event.context_id,
    };

    let text = event
        .status
        .message
        .as_ref()
        .map(|message| concat_text_parts(&message.parts))
        .unwrap_or_default();

    if text.is_empty() {
        return StreamEvent::StatusUpdate(StatusUpdate {
            text,
            status,
            message_id: None,
            role: None,
            status_only: true,
        });
    }

    let message = event.status.message;
    StreamEvent::StatusUpdate(StatusUpdate {
        text,
        status,
        message_id: message.as_ref().map(|m| m.message_id.clone()),
        role: message.map(|m| m.role),
        status_only: false,
    })
}

fn artifact_update(event: TaskArtifactUpdateEvent) -> StreamEvent {
    let artifact = event.artifact;
    let name = artifact
        .name
        .clone()
        .unwrap_or_else(|| format!("Artifact {}", artifact.artifact_id));

    StreamEvent::ArtifactUpdate(ArtifactUpdate {
        text_content: concat_text_parts(&artifact.parts),
        data_content: merge_data_parts(&artifact.parts),
        artifact_id: artifact.artifact_id,
        name,
        append: event.append,
        last_chunk: event.last_chunk,
        task_id: event.task_id,
        timestamp: Utc::now(),
    })
}

fn task_update(task: Task) -> StreamEvent {
    StreamEvent::TaskUpdate(TaskUpdate {
        task_id: task.id,
        context_id: task.context_id,
        state: task.status.map(|status| status.state),
        timestamp: Utc::now(),
    })
}

fn agent_message(message: Message) -> StreamEvent {
    StreamEvent::Message(AgentMessage {
        text: concat_text_parts(&message.parts),
        message_id: message.message_id,
        role: message.role,
        task_id: message.task_id,
        context_id: message.context_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Role, TaskState};
    use serde_json::json;

    fn envelope(result: Value) -> String {
        json!({"jsonrpc": "2.0", "id": "req-1", "result": result}).to_string()
    }

    #[test]
    fn test_status_update_with_text() {
        let raw = envelope(json!({
            "kind": "status-update",
            "taskId": "t1",
            "contextId": "c1",
            "final": false,
            "status": {
                "state": "working",
                "timestamp": "2025-01-01T00:00:00Z",
                "message": {
                    "kind": "message",
                    "role": "agent",
                    "messageId": "m1",
                    "parts": [
                        {"kind": "text", "text": "hi"},
                        {"kind": "data", "data": {"ignored": true}},
                        {"kind": "text", "text": "there"}
                    ]
                }
            }
        }));

        match classify_payload(&raw) {
            StreamEvent::StatusUpdate(update) => {
                assert_eq!(update.text, "hithere");
                assert!(!update.status_only);
                assert_eq!(update.message_id.as_deref(), Some("m1"));
                assert_eq!(update.role, Some(Role::Agent));
                assert_eq!(update.status.state, TaskState::Working);
                assert_eq!(update.status.timestamp.as_deref(), Some("2025-01-01T00:00:00Z"));
                assert_eq!(update.status.task_id.as_deref(), Some("t1"));
                assert!(!update.status.is_final);
            }
            other => panic!("expected status update, got {other:?}"),
        }
    }

    #[test]
    fn test_status_update_without_message_is_status_only() {
        let raw = envelope(json!({
            "kind": "status-update",
            "taskId": "t1",
            "final": true,
            "status": {"state": "completed"}
        }));

        let event = classify_payload(&raw);
        assert!(event.is_final());
        match event {
            StreamEvent::StatusUpdate(update) => {
                assert!(update.status_only);
                assert_eq!(update.text, "");
                assert!(update.message_id.is_none());
                assert!(update.role.is_none());
                assert_eq!(update.status.state, TaskState::Completed);
            }
            other => panic!("expected status update, got {other:?}"),
        }
    }

    #[test]
    fn test_status_update_with_only_data_parts_is_status_only() {
        let raw = envelope(json!({
            "kind": "status-update",
            "status": {
                "state": "working",
                "message": {"role": "agent", "messageId": "m2", "parts": [{"kind": "data", "data": {}}]}
            }
        }));
        match classify_payload(&raw) {
            StreamEvent::StatusUpdate(update) => {
                assert!(update.status_only);
                assert!(update.message_id.is_none());
            }
            other => panic!("expected status update, got {other:?}"),
        }
    }

    #[test]
    fn test_status_update_with_unknown_role_keeps_text() {
        let raw = envelope(json!({
            "kind": "status-update",
            "taskId": "t1",
            "final": true,
            "status": {
                "state": "completed",
                "message": {
                    "role": "assistant",
                    "messageId": "m3",
                    "parts": [{"kind": "text", "text": "done"}]
                }
            }
        }));
        match classify_payload(&raw) {
            StreamEvent::StatusUpdate(update) => {
                assert_eq!(update.text, "done");
                assert_eq!(update.role, Some(Role::Other("assistant".to_string())));
                assert!(update.status.is_final);
                assert_eq!(update.status.state, TaskState::Completed);
            }
            other => panic!("expected status update, got {other:?}"),
        }
    }

    #[test]
    fn test_status_update_skips_parts_without_kind() {
        let raw = envelope(json!({
            "kind": "status-update",
            "final": false,
            "status": {
                "state": "working",
                "message": {
                    "role": "agent",
                    "messageId": "m4",
                    "parts": [
                        {"type": "text", "text": "x"},
                        {"kind": "text", "text": "kept"}
                    ]
                }
            }
        }));
        match classify_payload(&raw) {
            StreamEvent::StatusUpdate(update) => {
                assert_eq!(update.text, "kept");
                assert_eq!(update.status.state, TaskState::Working);
            }
            other => panic!("expected status update, got {other:?}"),
        }
    }

    #[test]
    fn test_artifact_update_skips_legacy_parts() {
        let raw = envelope(json!({
            "kind": "artifact-update",
            "taskId": "t1",
            "artifact": {
                "artifactId": "a3",
                "parts": [
                    {"text": "legacy"},
                    {"kind": "text"},
                    {"kind": "text", "text": "ok"}
                ]
            }
        }));
        match classify_payload(&raw) {
            StreamEvent::ArtifactUpdate(update) => {
                assert_eq!(update.artifact_id, "a3");
                assert_eq!(update.text_content, "ok");
                assert!(update.data_content.is_empty());
            }
            other => panic!("expected artifact update, got {other:?}"),
        }
    }

    #[test]
    fn test_artifact_update_merges_parts() {
        let raw = envelope(json!({
            "kind": "artifact-update",
            "taskId": "t1",
            "lastChunk": true,
            "artifact": {
                "artifactId": "a1",
                "parts": [
                    {"kind": "text", "text": "foo"},
                    {"kind": "data", "data": {"x": 1}},
                    {"kind": "data", "data": {"x": 2, "y": 3}},
                    {"kind": "text", "text": "bar"}
                ]
            }
        }));

        match classify_payload(&raw) {
            StreamEvent::ArtifactUpdate(update) => {
                assert_eq!(update.artifact_id, "a1");
                assert_eq!(update.name, "Artifact a1");
                assert_eq!(update.text_content, "foobar");
                assert_eq!(Value::Object(update.data_content), json!({"x": 2, "y": 3}));
                assert_eq!(update.last_chunk, Some(true));
                assert_eq!(update.append, None);
                assert_eq!(update.task_id.as_deref(), Some("t1"));
            }
            other => panic!("expected artifact update, got {other:?}"),
        }
    }

    #[test]
    fn test_artifact_name_is_kept() {
        let raw = envelope(json!({
            "kind": "artifact-update",
            "artifact": {"artifactId": "a2", "name": "report.md", "parts": []}
        }));
        match classify_payload(&raw) {
            StreamEvent::ArtifactUpdate(update) => {
                assert_eq!(update.name, "report.md");
                assert_eq!(update.text_content, "");
                assert!(update.data_content.is_empty());
            }
            other => panic!("expected artifact update, got {other:?}"),
        }
    }

    #[test]
    fn test_task_snapshot() {
        let raw = envelope(json!({
            "kind": "task",
            "id": "t1",
            "contextId": "c1",
            "status": {"state": "submitted"}
        }));
        match classify_payload(&raw) {
            StreamEvent::TaskUpdate(update) => {
                assert_eq!(update.task_id, "t1");
                assert_eq!(update.context_id, "c1");
                assert_eq!(update.state, Some(TaskState::Submitted));
            }
            other => panic!("expected task update, got {other:?}"),
        }
    }

    #[test]
    fn test_direct_message() {
        let raw = envelope(json!({
            "kind": "message",
            "role": "agent",
            "messageId": "m9",
            "parts": [{"kind": "text", "text": "pong"}]
        }));
        match classify_payload(&raw) {
            StreamEvent::Message(message) => {
                assert_eq!(message.text, "pong");
                assert_eq!(message.message_id, "m9");
                assert_eq!(message.role, Role::Agent);
            }
            other => panic!("expected message, got {other:?}"),
        }
    }

    #[test]
    fn test_bare_result_without_envelope() {
        let raw = json!({"kind": "task", "id": "t2", "contextId": "c2"}).to_string();
        assert!(matches!(classify_payload(&raw), StreamEvent::TaskUpdate(_)));
    }

    #[test]
    fn test_unknown_kind_is_unclassified() {
        let raw = envelope(json!({"kind": "heartbeat"}));
        match classify_payload(&raw) {
            StreamEvent::Unclassified(frame) => {
                assert_eq!(frame.kind.as_deref(), Some("heartbeat"));
                assert_eq!(frame.payload["result"]["kind"], "heartbeat");
            }
            other => panic!("expected unclassified, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_kind_is_unclassified() {
        let raw = json!({"jsonrpc": "2.0", "id": "x"}).to_string();
        match classify_payload(&raw) {
            StreamEvent::Unclassified(frame) => assert!(frame.kind.is_none()),
            other => panic!("expected unclassified, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        match classify_payload("{\"result\": {\"kind\": ") {
            StreamEvent::ParseError(frame) => {
                assert_eq!(frame.text, "{\"result\": {\"kind\": ");
                assert!(!frame.reason.is_empty());
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_wrong_shape_is_parse_error() {
        let raw = envelope(json!({"kind": "status-update", "status": "working"}));
        match classify_payload(&raw) {
            StreamEvent::ParseError(frame) => assert_eq!(frame.text, raw),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_rpc_error_envelope() {
        let raw = json!({
            "jsonrpc": "2.0",
            "id": "req-1",
            "error": {"code": -32601, "message": "Method not found"}
        })
        .to_string();
        match classify_payload(&raw) {
            StreamEvent::RpcError(error) => {
                assert_eq!(error.code, -32601);
                assert_eq!(error.message, "Method not found");
            }
            other => panic!("expected rpc error, got {other:?}"),
        }
    }

    #[test]
    fn test_classify_decoded_value() {
        let value = json!({"result": {"kind": "task", "id": "t3", "contextId": "c3"}});
        assert!(matches!(classify(&value), StreamEvent::TaskUpdate(_)));
    }
}
