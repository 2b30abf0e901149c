//! Utility functions for working with A2A Part objects.

use crate::types::Part;
use serde_json::{Map, Value};

/// Extracts text content from all text Parts in a list.
///
/// # Example
///
/// ```
/// use a2a_chat::types::Part;
/// use a2a_chat::utils::get_text_parts;
///
/// let parts = vec![Part::text("Hello"), Part::text("World")];
/// assert_eq!(get_text_parts(&parts), vec!["Hello", "World"]);
/// ```
pub fn get_text_parts(parts: &[Part]) -> Vec<&str> {
    parts
        .iter()
        .filter_map(|part| match part {
            Part::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
        .collect()
}

/// Concatenates every text Part in order, with no separator.
///
/// Non-text parts are skipped.
///
/// # Example
///
/// ```
/// use a2a_chat::types::Part;
/// use a2a_chat::utils::concat_text_parts;
///
/// let parts = vec![Part::text("hi"), Part::text("there")];
/// assert_eq!(concat_text_parts(&parts), "hithere");
/// ```
pub fn concat_text_parts(parts: &[Part]) -> String {
    get_text_parts(parts).concat()
}

/// Shallow-merges the object payloads of all data Parts into one object.
///
/// Parts are applied in order, so on a key collision the later part wins.
/// Data parts whose payload is not a JSON object are skipped.
///
/// # Example
///
/// ```
/// use a2a_chat::types::Part;
/// use a2a_chat::utils::merge_data_parts;
/// use serde_json::json;
///
/// let parts = vec![
///     Part::Data { data: json!({"x": 1}), metadata: None },
///     Part::Data { data: json!({"x": 2, "y": 3}), metadata: None },
/// ];
/// assert_eq!(serde_json::Value::Object(merge_data_parts(&parts)), json!({"x": 2, "y": 3}));
/// ```
pub fn merge_data_parts(parts: &[Part]) -> Map<String, Value> {
    let mut merged = Map::new();
    for part in parts {
        match part {
            Part::Data {
                data: Value::Object(fields),
                ..
            } => {
                for (key, value) in fields {
                    merged.insert(key.clone(), value.clone());
                }
            }
            Part::Data { data, .. } => {
                tracing::debug!(data = %data, "skipping non-object data part");
            }
            _ => {}
        }
    }
    merged
}
