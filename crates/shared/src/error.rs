use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Error body used by the analysis service and the relay alike.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub detail: String,
}

impl ErrorDetail {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

/// Pulls a displayable message out of an error body.
///
/// Returns `None` when `detail` is missing, null or an empty string. Non-string
/// details (validation error lists, for instance) come back as their JSON text.
pub fn detail_message(body: &Value) -> Option<String> {
    match body.get("detail")? {
        Value::Null => None,
        Value::String(text) if text.is_empty() => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}
