use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageRole {
    User,
    Assistant,
}

/// One turn of the conversation, as replayed to the model.
#[derive(Debug, Clone)]
pub struct ChatTurn {
    pub role: MessageRole,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: MessageRole::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: MessageRole::Assistant, content: content.into() }
    }
}

/// An in-memory chat session. Lives until process exit; never persisted.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    pub turns: Vec<ChatTurn>,
    /// Follow-up questions the advisor still has to cover for this patient.
    pub remaining_questions: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn new(id: String, remaining_questions: Vec<String>) -> Self {
        Self { id, turns: Vec::new(), remaining_questions, created_at: Utc::now() }
    }
}

// ── Wire types ────────────────────────────────────────────────────────────────

/// Response body for `GET /start`.
#[derive(Debug, Serialize)]
pub struct StartChatResponse {
    pub session_id: String,
    pub message: String,
}

/// Request body for `POST /analyze`.
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub session_id: String,
    /// The user's free-text reply. Field name matches the widget's wire format.
    pub response: String,
}

/// Success body for `POST /analyze` — `message` is trusted HTML markup.
#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub message: String,
}

/// Application-level failure body — the widget surfaces `error` verbatim.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}
