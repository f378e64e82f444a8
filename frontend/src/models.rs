use serde::{Deserialize, Serialize};

/// Who authored a transcript entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Bot,
    /// Error lines styled as bot messages.
    BotError,
}

impl ChatRole {
    /// CSS classes matching the widget stylesheet.
    pub fn css_class(&self) -> &'static str {
        match self {
            ChatRole::User => "chat-message user",
            ChatRole::Bot => "chat-message bot",
            ChatRole::BotError => "chat-message bot error",
        }
    }
}

/// One rendered transcript entry. `markup` is inserted verbatim — bot
/// responses are trusted HTML from the backend.
#[derive(Clone, Debug, PartialEq)]
pub struct ChatMessage {
    pub id: u64,
    pub role: ChatRole,
    pub markup: String,
}

/// Response from `GET /start`.
#[derive(Clone, Debug, Deserialize)]
pub struct StartChatResponse {
    pub session_id: String,
    pub message: String,
}

/// Request body for `POST /analyze`.
#[derive(Clone, Debug, Serialize)]
pub struct AnalyzeRequest {
    pub session_id: String,
    pub response: String,
}

/// Response from `POST /analyze`: either `message` markup or an
/// application-level `error`.
#[derive(Clone, Debug, Deserialize)]
pub struct AnalyzeResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}
