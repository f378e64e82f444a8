use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::{ChatApi, HttpApi};
use crate::transcript::Transcript;

/// Generic error line for transport failures during analyze.
const SEND_FAILED_MESSAGE: &str = "Server error. Try again.";

/// Shared widget state, provided via Leptos context.
///
/// One session id at most; one transcript; one input field. All mutation goes
/// through [`ChatState::acquire_session`] and [`ChatState::run_send`], both
/// generic over [`ChatApi`] so the full send cycle is unit-testable.
#[derive(Clone, Copy)]
pub struct ChatState {
    pub session_id: ReadSignal<Option<String>>,
    pub transcript: ReadSignal<Transcript>,
    pub input: ReadSignal<String>,

    pub set_session_id: WriteSignal<Option<String>>,
    pub set_transcript: WriteSignal<Transcript>,
    pub set_input: WriteSignal<String>,
}

impl ChatState {
    fn new() -> Self {
        let (session_id, set_session_id) = signal(None::<String>);
        let (transcript, set_transcript) = signal(Transcript::new());
        let (input, set_input) = signal(String::new());

        Self {
            session_id,
            transcript,
            input,
            set_session_id,
            set_transcript,
            set_input,
        }
    }

    /// Create a new `ChatState` and provide it in the current Leptos context.
    pub fn provide() -> Self {
        let state = Self::new();
        provide_context(state);
        state
    }

    /// Start a session on page load.
    pub fn start_session_on_load(&self) {
        let state = *self;
        spawn_local(async move {
            state.acquire_session(&HttpApi).await;
        });
    }

    /// Calls the start operation and, on success, stores the session id and
    /// appends the welcome markup. Failures are logged only — the session
    /// stays absent and nothing is shown to the user.
    async fn acquire_session(&self, api: &impl ChatApi) {
        match api.start_session().await {
            Ok(resp) => {
                log::info!("Session started: {}", resp.session_id);
                self.set_session_id.set(Some(resp.session_id));
                self.set_transcript.update(|t| t.push_bot(resp.message));
            }
            Err(e) => {
                log::error!("Error starting session: {e}");
            }
        }
    }

    /// Runs one send cycle for the current input value. No-op for empty
    /// trimmed input. Not guarded against overlapping invocations.
    pub fn send_message(&self) {
        let state = *self;
        spawn_local(async move {
            state.run_send(&HttpApi).await;
        });
    }

    async fn run_send(self, api: &impl ChatApi) {
        let text = self.input.get_untracked();
        if text.trim().is_empty() {
            return;
        }

        // Acquire a session first if none exists; proceed either way.
        if self.session_id.get_untracked().is_none() {
            log::warn!("No session found. Starting new session...");
            self.acquire_session(api).await;
        }
        let session_id = self.session_id.get_untracked().unwrap_or_default();

        self.set_transcript.update(|t| {
            t.push_user(text.clone());
            t.show_typing();
        });

        match api.analyze(&session_id, &text).await {
            Ok(resp) => {
                self.set_transcript.update(|t| {
                    t.clear_typing();
                    match resp.error {
                        Some(err) => {
                            log::error!("API error: {err}");
                            t.push_error(err);
                        }
                        None => t.push_bot(resp.message.unwrap_or_default()),
                    }
                });
                self.set_input.set(String::new());
            }
            Err(e) => {
                // Transport failure: generic error line, input left as-is.
                log::error!("Server error: {e}");
                self.set_transcript.update(|t| {
                    t.clear_typing();
                    t.push_error(SEND_FAILED_MESSAGE);
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::models::{AnalyzeResponse, ChatRole, StartChatResponse};

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    enum Call {
        Start,
        Analyze,
    }

    /// Scripted transport double that records the order of operations and
    /// the arguments the analyze call was made with.
    struct ScriptedApi {
        start: Result<StartChatResponse, String>,
        analyze: Result<AnalyzeResponse, String>,
        calls: RefCell<Vec<Call>>,
        analyzed_with: RefCell<Option<(String, String)>>,
    }

    impl ScriptedApi {
        fn new(
            start: Result<StartChatResponse, String>,
            analyze: Result<AnalyzeResponse, String>,
        ) -> Self {
            Self {
                start,
                analyze,
                calls: RefCell::new(Vec::new()),
                analyzed_with: RefCell::new(None),
            }
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.borrow().clone()
        }
    }

    impl ChatApi for ScriptedApi {
        async fn start_session(&self) -> Result<StartChatResponse, String> {
            self.calls.borrow_mut().push(Call::Start);
            self.start.clone()
        }

        async fn analyze(
            &self,
            session_id: &str,
            text: &str,
        ) -> Result<AnalyzeResponse, String> {
            self.calls.borrow_mut().push(Call::Analyze);
            *self.analyzed_with.borrow_mut() =
                Some((session_id.to_string(), text.to_string()));
            self.analyze.clone()
        }
    }

    fn started(session_id: &str) -> Result<StartChatResponse, String> {
        Ok(StartChatResponse {
            session_id: session_id.to_string(),
            message: "Hei, jeg er Velfie.".to_string(),
        })
    }

    fn bot_reply(markup: &str) -> Result<AnalyzeResponse, String> {
        Ok(AnalyzeResponse { message: Some(markup.to_string()), error: None })
    }

    fn app_error(error: &str) -> Result<AnalyzeResponse, String> {
        Ok(AnalyzeResponse { message: None, error: Some(error.to_string()) })
    }

    #[tokio::test]
    async fn send_without_session_starts_exactly_once_before_analyze() {
        let state = ChatState::new();
        state.set_input.set("hello".to_string());
        let api = ScriptedApi::new(started("s1"), bot_reply("<p>hi</p>"));

        state.run_send(&api).await;

        assert_eq!(api.calls(), vec![Call::Start, Call::Analyze]);
        let (session_id, text) = api.analyzed_with.borrow().clone().unwrap();
        assert_eq!(session_id, "s1");
        assert_eq!(text, "hello");
        assert_eq!(state.session_id.get_untracked().as_deref(), Some("s1"));
    }

    #[tokio::test]
    async fn send_with_existing_session_skips_start() {
        let state = ChatState::new();
        state.set_session_id.set(Some("s9".to_string()));
        state.set_input.set("hello".to_string());
        let api = ScriptedApi::new(started("unused"), bot_reply("<p>hi</p>"));

        state.run_send(&api).await;

        assert_eq!(api.calls(), vec![Call::Analyze]);
        let (session_id, _) = api.analyzed_with.borrow().clone().unwrap();
        assert_eq!(session_id, "s9");
    }

    #[tokio::test]
    async fn success_appends_user_then_bot_and_clears_input() {
        let state = ChatState::new();
        state.set_session_id.set(Some("s1".to_string()));
        state.set_input.set("hello".to_string());
        let api = ScriptedApi::new(started("unused"), bot_reply("<p>hi</p>"));

        state.run_send(&api).await;

        let transcript = state.transcript.get_untracked();
        let entries = transcript.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].role, ChatRole::User);
        assert_eq!(entries[0].markup, "hello");
        assert_eq!(entries[1].role, ChatRole::Bot);
        assert_eq!(entries[1].markup, "<p>hi</p>");
        assert!(!transcript.is_typing());
        assert_eq!(state.input.get_untracked(), "");
    }

    #[tokio::test]
    async fn application_error_is_surfaced_verbatim_and_input_cleared() {
        let state = ChatState::new();
        state.set_session_id.set(Some("s1".to_string()));
        state.set_input.set("hello".to_string());
        let api = ScriptedApi::new(started("unused"), app_error("rate limited"));

        state.run_send(&api).await;

        let transcript = state.transcript.get_untracked();
        let last = transcript.entries().last().unwrap();
        assert_eq!(last.role, ChatRole::BotError);
        assert_eq!(last.markup, "rate limited");
        assert!(!transcript.is_typing());
        assert_eq!(state.input.get_untracked(), "");
    }

    #[tokio::test]
    async fn transport_failure_keeps_input_and_shows_generic_error() {
        let state = ChatState::new();
        state.set_session_id.set(Some("s1".to_string()));
        state.set_input.set("hello".to_string());
        let api = ScriptedApi::new(started("unused"), Err("network down".to_string()));

        state.run_send(&api).await;

        let transcript = state.transcript.get_untracked();
        let last = transcript.entries().last().unwrap();
        assert_eq!(last.role, ChatRole::BotError);
        assert_eq!(last.markup, SEND_FAILED_MESSAGE);
        assert!(!transcript.is_typing());
        assert_eq!(state.input.get_untracked(), "hello");
    }

    #[tokio::test]
    async fn empty_or_whitespace_input_makes_no_call_and_no_message() {
        let state = ChatState::new();
        state.set_input.set("   \n".to_string());
        let api = ScriptedApi::new(started("s1"), bot_reply("<p>hi</p>"));

        state.run_send(&api).await;

        assert!(api.calls().is_empty());
        assert!(state.transcript.get_untracked().entries().is_empty());
    }

    #[tokio::test]
    async fn start_failure_is_silent_and_send_still_proceeds() {
        let state = ChatState::new();
        state.set_input.set("hello".to_string());
        let api = ScriptedApi::new(Err("refused".to_string()), bot_reply("<p>hi</p>"));

        state.run_send(&api).await;

        // Start was attempted, failed silently, and analyze went out with an
        // empty session id.
        assert_eq!(api.calls(), vec![Call::Start, Call::Analyze]);
        let (session_id, _) = api.analyzed_with.borrow().clone().unwrap();
        assert_eq!(session_id, "");
        assert!(state.session_id.get_untracked().is_none());

        // No welcome line was shown; only the user and bot messages exist.
        let transcript = state.transcript.get_untracked();
        assert_eq!(transcript.entries().len(), 2);
        assert_eq!(transcript.entries()[0].role, ChatRole::User);
    }

    #[tokio::test]
    async fn successful_start_stores_id_and_shows_welcome_verbatim() {
        let state = ChatState::new();
        let api = ScriptedApi::new(started("s1"), bot_reply("unused"));

        state.acquire_session(&api).await;

        assert_eq!(state.session_id.get_untracked().as_deref(), Some("s1"));
        let transcript = state.transcript.get_untracked();
        assert_eq!(transcript.entries().len(), 1);
        assert_eq!(transcript.entries()[0].role, ChatRole::Bot);
        assert_eq!(transcript.entries()[0].markup, "Hei, jeg er Velfie.");
    }
}
