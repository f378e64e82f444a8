use tracing::{error, info};

use crate::agent::OpenAiAgentService;
use crate::errors::AppError;
use crate::models::{AnalyzeRequest, ChatTurn, StartChatResponse};
use crate::session::SessionStore;

const MAX_MESSAGE_LENGTH: usize = 8000;

/// Welcome line shown when a session starts. Inserted verbatim by the widget.
const WELCOME_MESSAGE: &str = "Hei, jeg er Velfie og er din digitale hjelpeassistent. \
    Jeg er her for å hjelpe deg med å finne riktig velferdsteknologi for pasienten. \
    Hvilke utfordringer har pasienten?";

/// Fallback reply when the model call fails. The original behavior is to
/// answer with an apology rather than an error.
const AGENT_FAILURE_MESSAGE: &str = "Beklager, det oppstod en feil. Prøv igjen.";

/// Follow-up questions seeded into every new session.
const FOLLOW_UP_QUESTIONS: [&str; 9] = [
    "Har pasienten vansker med tids- og stedsorientering?",
    "Har pasienten økt risiko for fall?",
    "Har pasienten en tendens til å gå ut om natten uten å finne tilbake?",
    "Klarer pasienten å åpne døren selv?",
    "Har pasienten en medisinsk tilstand som gjør at det kan oppstå akutte nødsituasjoner hjemme?",
    "Klarer pasienten å forstå varsler eller muntlige beskjeder fra utstyr?",
    "Trenger pasienten hjelp til å ta medisiner til riktig tid?",
    "Har pasienten behov for en trygghetsalarm?",
    "Hvor gammel er pasienten? (Skriv alder i tall)",
];

/// Demo video per service, keyed by the (lowercase) service name as it
/// appears in the model's reply. The files are served from the `/assets`
/// route mounted in `main`.
const VIDEO_SOURCES: [(&str, &str); 4] = [
    ("elås", "/assets/elas.mp4"),
    ("elektronisk medisindispenser", "/assets/elektronisk_medisindispenser.mp4"),
    ("lokaliseringstjeneste", "/assets/lokaliseringstjeneste.mp4"),
    ("trygghetsalarm", "/assets/trygghetsalarm.mp4"),
];

/// Marker the preamble asks the model to leave inside recommendation cards.
const VIDEO_PLACEHOLDER: &str = "{video_html}";

#[derive(Clone)]
pub struct AdvisorService {
    store: SessionStore,
    agent: OpenAiAgentService,
}

impl AdvisorService {
    pub fn new(store: SessionStore, agent: OpenAiAgentService) -> Self {
        Self { store, agent }
    }

    /// Creates a fresh session and returns its id plus the welcome markup.
    pub async fn start_session(&self) -> StartChatResponse {
        let questions = FOLLOW_UP_QUESTIONS.iter().map(|q| q.to_string()).collect();
        let session = self.store.create(questions).await;
        info!("Session {} started at {}", session.id, session.created_at);
        StartChatResponse {
            session_id: session.id,
            message: WELCOME_MESSAGE.to_string(),
        }
    }

    /// Runs one advisory turn: validate, replay history to the model, record
    /// the exchange, and attach demo videos to the reply.
    pub async fn analyze(&self, request: AnalyzeRequest) -> Result<String, AppError> {
        validate_input(&request.response)?;

        let session = self.store.snapshot(&request.session_id).await?;

        let reply = match self
            .agent
            .chat(&session.id, &session.turns, &request.response)
            .await
        {
            Ok(content) => content.trim().to_string(),
            Err(e) => {
                // Answer with the apology instead of surfacing the failure;
                // the exchange is not recorded in the history.
                error!("Agent call failed for session {}: {e}", session.id);
                return Ok(AGENT_FAILURE_MESSAGE.to_string());
            }
        };

        self.store
            .append_turns(
                &session.id,
                ChatTurn::user(request.response),
                ChatTurn::assistant(reply.clone()),
            )
            .await?;

        Ok(attach_service_videos(&reply))
    }
}

fn validate_input(text: &str) -> Result<(), AppError> {
    if text.trim().is_empty() {
        return Err(AppError::EmptyField { field_name: "response".to_string() });
    }
    if text.len() > MAX_MESSAGE_LENGTH {
        return Err(AppError::FieldTooLong {
            field_name: "response".to_string(),
            max_length: MAX_MESSAGE_LENGTH,
            actual_length: text.len(),
        });
    }
    Ok(())
}

/// Substitutes one `{video_html}` placeholder per service mentioned in the
/// reply, then strips any placeholders left over.
fn attach_service_videos(reply: &str) -> String {
    let mut out = reply.to_string();
    let lowered = reply.to_lowercase();

    for (service, src) in VIDEO_SOURCES {
        if lowered.contains(service) {
            let video_html = format!(
                "<video class=\"video-thumbnail\" controls>\
                 <source src=\"{src}\" type=\"video/mp4\"></video>"
            );
            out = out.replacen(VIDEO_PLACEHOLDER, &video_html, 1);
        }
    }

    out.replace(VIDEO_PLACEHOLDER, "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_whitespace_input_is_rejected() {
        assert!(validate_input("").unwrap_err().is_validation());
        assert!(validate_input("   \n\t").unwrap_err().is_validation());
        assert!(validate_input("hei").is_ok());
    }

    #[test]
    fn oversized_input_is_rejected() {
        let big = "x".repeat(MAX_MESSAGE_LENGTH + 1);
        assert!(validate_input(&big).unwrap_err().is_validation());
    }

    #[test]
    fn mentioned_service_gets_its_video() {
        let reply = "Anbefaler Trygghetsalarm. {video_html}";
        let out = attach_service_videos(reply);
        assert!(out.contains("<video class=\"video-thumbnail\" controls>"));
        assert!(out.contains("<source src=\"/assets/trygghetsalarm.mp4\" type=\"video/mp4\">"));
        assert!(!out.contains(VIDEO_PLACEHOLDER));
    }

    #[test]
    fn service_match_is_case_insensitive() {
        let out = attach_service_videos("ELÅS passer godt. {video_html}");
        assert!(out.contains("/assets/elas.mp4"));
    }

    #[test]
    fn every_video_source_is_a_local_asset() {
        for (_, src) in VIDEO_SOURCES {
            assert!(src.starts_with("/assets/") && src.ends_with(".mp4"), "{src}");
        }
    }

    #[test]
    fn leftover_placeholders_are_stripped() {
        let out = attach_service_videos("Ingen tjeneste nevnt. {video_html}{video_html}");
        assert!(!out.contains(VIDEO_PLACEHOLDER));
        assert_eq!(out, "Ingen tjeneste nevnt. ");
    }

    #[test]
    fn replies_without_placeholder_pass_through() {
        let reply = "Har pasienten økt risiko for fall?";
        assert_eq!(attach_service_videos(reply), reply);
    }
}
