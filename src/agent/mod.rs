use rig::completion::Chat;
use rig::message::Message as RigMessage;
use rig::prelude::CompletionClient;
use rig::providers::openai;
use tracing::error;

use crate::errors::AppError;
use crate::models::{ChatTurn, MessageRole};

const DEFAULT_MODEL: &str = "gpt-4o";
const TEMPERATURE: f64 = 0.2;
const MAX_TOKENS: u64 = 2000;

/// Advisory preamble for the Velfie assistant. The model is instructed to
/// collect indications one question at a time and, once everything is covered,
/// emit recommendation cards. `{video_html}` placeholders left in the cards
/// are substituted by the service layer.
const PREAMBLE: &str = r#"Du er en digital helseassistent kalt Velfie. Din oppgave er å hjelpe brukeren med å finne riktig velferdsteknologi for pasienten.

Steg 1: Analyser brukerens melding og identifiser hvilke indikasjoner som allerede er nevnt. Ikke røp vurderingen din før anbefalingene er klare.

Steg 2: Hvis indikasjoner mangler, still ett konsist oppfølgingsspørsmål av gangen til alle tjenester er dekket.

Indikasjoner per tjeneste:
- Digitalt tilsyn: fallfare og orienteringsvansker.
- Døralarm: orienteringsvansker og tendens til nattvandring.
- Elektronisk dørlås (eLås): har trygghetsalarm og vansker med å åpne døren.
- Elektronisk medisindispenser: trenger hjelp med medisiner og forstår varsler fra utstyr.
- GPS/lokaliseringstjeneste: over 18 år og orienteringsvansker.
- Trygghetsalarm: behov for akutt hjelp hjemme.

Oppfølgingsspørsmål:
1. Digitalt tilsyn: "Har pasienten problemer med tids- og stedsorientering?"
2. Døralarm: "Har pasienten en tendens til å gå ut om natten uten å finne tilbake?"
3. Elektronisk dørlås: "Har pasienten en trygghetsalarm og vansker med å åpne døren?"
4. Elektronisk medisindispenser: "Trenger pasienten hjelp til å ta medisiner til riktig tid?"
5. GPS/lokaliseringstjeneste: "Har pasienten orienteringsvansker?" Spør også "Er pasienten over 18 år?" hvis alder ikke er nevnt.
6. Trygghetsalarm: "Har pasienten en sykdom som kan kreve akutt hjelp?"

Steg 3: Når alle spørsmål er besvart, gi en samlet anbefaling. Forklar hvorfor tilbudene passer basert på indikasjonene og gi en kort beskrivelse av hver tjeneste. Inntil 6 tjenester kan anbefales.

Lenker for "Les mer" (skal åpnes i ny fane):
- Digitalt tilsyn: https://sites.google.com/trondheim.kommune.no/velferdsteknologi/v%C3%A5re-tilbud/digitalt-tilsyn?authuser=0
- Døralarm: https://sites.google.com/trondheim.kommune.no/velferdsteknologi/v%C3%A5re-tilbud/d%C3%B8ralarm?authuser=0
- Elektronisk dørlås (eLås): https://sites.google.com/trondheim.kommune.no/velferdsteknologi/v%C3%A5re-tilbud/elektronisk-d%C3%B8rl%C3%A5s-el%C3%A5s?authuser=0
- Elektronisk medisindispenser: https://sites.google.com/trondheim.kommune.no/velferdsteknologi/v%C3%A5re-tilbud/elektronisk-medisindispenser?authuser=0
- Lokaliseringstjeneste (GPS): https://sites.google.com/trondheim.kommune.no/velferdsteknologi/v%C3%A5re-tilbud/lokaliseringstjeneste-gps?authuser=0

Format for hver anbefaling:
<div class="recommendation-card">
    <h3>{tjenestenavn}</h3>
    <p><strong>Indikasjoner:</strong> {indikasjoner}</p>
    <p><strong>Beskrivelse:</strong> {beskrivelse}</p>
    <a href="{lenke}" target="_blank" class="btn-link">Les mer</a>
    {video_html}
</div>"#;

/// Builds a rig [`RigMessage`] history list from stored [`ChatTurn`] records.
fn to_rig_history(turns: &[ChatTurn]) -> Vec<RigMessage> {
    turns
        .iter()
        .map(|t| match t.role {
            MessageRole::User => RigMessage::user(&t.content),
            MessageRole::Assistant => RigMessage::assistant(&t.content),
        })
        .collect()
}

/// Service that runs one advisory chat turn against OpenAI via rig.
/// A fresh agent is built per request so the history is replayed from the
/// session store each time.
#[derive(Clone)]
pub struct OpenAiAgentService {
    client: openai::Client,
    model: String,
}

impl OpenAiAgentService {
    pub fn new(api_key: &str) -> Self {
        let client = openai::Client::builder()
            .api_key(api_key)
            .build()
            .expect("Failed to build OpenAI client");
        Self { client, model: DEFAULT_MODEL.to_string() }
    }

    /// Sends one chat turn, replaying `history` as context.
    pub async fn chat(
        &self,
        session_id: &str,
        history: &[ChatTurn],
        user_message: &str,
    ) -> Result<String, AppError> {
        let agent = self
            .client
            .agent(&self.model)
            .preamble(PREAMBLE)
            .temperature(TEMPERATURE)
            .max_tokens(MAX_TOKENS)
            .build();

        let rig_history = to_rig_history(history);

        agent.chat(user_message, rig_history).await.map_err(|e| {
            error!("OpenAI inference failed for session {session_id}: {e}");
            let msg = e.to_string();
            if msg.contains("Connection refused") || msg.contains("connect") {
                AppError::AgentUnavailable
            } else {
                AppError::InferenceError { message: msg }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_preserves_turn_order() {
        let turns = vec![
            ChatTurn::user("first"),
            ChatTurn::assistant("second"),
            ChatTurn::user("third"),
        ];
        assert_eq!(to_rig_history(&turns).len(), 3);
    }
}
