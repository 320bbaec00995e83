use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    pub url: String,
}

/// Successful `/analyze` reply.
///
/// `analysis` is always held as text. Services that answer with a structured
/// report get it rendered as pretty JSON, and that same text is what goes
/// back out as `suggestions` on revision. `content` is never inspected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    #[serde(default, deserialize_with = "deserialize_analysis_text")]
    pub analysis: String,
    #[serde(default)]
    pub content: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviseRequest {
    pub content: Value,
    pub suggestions: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviseResponse {
    pub revised: String,
}

pub fn render_analysis(value: Value) -> String {
    match value {
        Value::String(text) => text,
        Value::Null => String::new(),
        other => serde_json::to_string_pretty(&other).unwrap_or_else(|_| other.to_string()),
    }
}

fn deserialize_analysis_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(render_analysis)
}
