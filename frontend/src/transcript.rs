use crate::models::{ChatMessage, ChatRole};

/// The ordered list of rendered chat messages plus the optional typing
/// placeholder. Kept free of DOM and signal types so the send-cycle
/// sequencing can be unit tested natively.
///
/// Entries are append-only; the placeholder is the only thing ever removed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Transcript {
    entries: Vec<ChatMessage>,
    typing: bool,
    next_id: u64,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[ChatMessage] {
        &self.entries
    }

    /// Whether the typing placeholder is currently shown.
    pub fn is_typing(&self) -> bool {
        self.typing
    }

    pub fn push_user(&mut self, markup: impl Into<String>) {
        self.push(ChatRole::User, markup.into());
    }

    pub fn push_bot(&mut self, markup: impl Into<String>) {
        self.push(ChatRole::Bot, markup.into());
    }

    pub fn push_error(&mut self, markup: impl Into<String>) {
        self.push(ChatRole::BotError, markup.into());
    }

    /// Inserts the typing placeholder. At most one exists at a time.
    pub fn show_typing(&mut self) {
        self.typing = true;
    }

    /// Removes the typing placeholder. Called exactly once per send attempt,
    /// on both the success and failure paths.
    pub fn clear_typing(&mut self) {
        self.typing = false;
    }

    fn push(&mut self, role: ChatRole, markup: String) {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push(ChatMessage { id, role, markup });
    }
}
