use serde::{Deserialize, Serialize};

/// One turn of a stored chat, as exported by the chat front-end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub is_user: bool,
    #[serde(rename = "mes", default)]
    pub message: String,
}

/// A model advertised by the generation service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    pub name: String,
    pub model: String,
    pub default: bool,
}

/// Body of a summary request received at the API boundary.
///
/// Either `messages` (already rendered lines) or `chat` (raw chat turns) must
/// be present. Numbers at or below zero select the configured defaults.
#[derive(Debug, Default, Deserialize)]
pub struct SummaryRequest {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub messages: Option<Vec<String>>,
    #[serde(default)]
    pub chat: Option<Vec<ChatMessage>>,
    #[serde(default)]
    pub max_tokens: Option<i64>,
    #[serde(default)]
    pub summary_words: Option<i64>,
}
