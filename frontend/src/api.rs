use gloo_net::http::Request;

use crate::models::{AnalyzeRequest, AnalyzeResponse, StartChatResponse};

/// Base URL of the backend API server.
const API_BASE: &str = "http://127.0.0.1:8000";

/// Transport boundary for the two backend operations. The widget state is
/// generic over this trait so the send cycle can be driven by a test double.
#[allow(async_fn_in_trait)]
pub trait ChatApi {
    async fn start_session(&self) -> Result<StartChatResponse, String>;
    async fn analyze(&self, session_id: &str, text: &str) -> Result<AnalyzeResponse, String>;
}

/// Production transport: plain HTTP against the fixed local endpoint.
#[derive(Clone, Copy)]
pub struct HttpApi;

impl ChatApi for HttpApi {
    /// Calls `GET /start` to open a new chat session.
    async fn start_session(&self) -> Result<StartChatResponse, String> {
        let resp = Request::get(&format!("{API_BASE}/start"))
            .send()
            .await
            .map_err(|e| format!("Network error: {e}"))?;

        if !resp.ok() {
            return Err(format!("Server error: {}", resp.status()));
        }

        resp.json::<StartChatResponse>()
            .await
            .map_err(|e| format!("Parse error: {e}"))
    }

    /// Calls `POST /analyze` with the user's text.
    ///
    /// The body is parsed on any status: application-level failures arrive as
    /// an `error` field (possibly with a 4xx/5xx status) and are part of the
    /// normal response shape, not a transport failure.
    async fn analyze(&self, session_id: &str, text: &str) -> Result<AnalyzeResponse, String> {
        let body = AnalyzeRequest {
            session_id: session_id.to_string(),
            response: text.to_string(),
        };

        let resp = Request::post(&format!("{API_BASE}/analyze"))
            .json(&body)
            .map_err(|e| format!("Serialize error: {e}"))?
            .send()
            .await
            .map_err(|e| format!("Network error: {e}"))?;

        resp.json::<AnalyzeResponse>()
            .await
            .map_err(|e| format!("Parse error: {e}"))
    }
}
