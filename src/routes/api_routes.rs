use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::errors::AppError;
use crate::models::{AnalyzeRequest, AnalyzeResponse, ErrorBody};
use crate::service::advisor_service::AdvisorService;

/// GET `/start` — creates a session and returns the welcome markup.
pub async fn start_handler(State(svc): State<AdvisorService>) -> impl IntoResponse {
    Json(svc.start_session().await)
}

/// POST `/analyze` — runs one advisory turn. Application-level failures come
/// back as an `error` body; the widget reads it regardless of status.
pub async fn analyze_handler(
    State(svc): State<AdvisorService>,
    Json(request): Json<AnalyzeRequest>,
) -> Response {
    match svc.analyze(request).await {
        Ok(message) => Json(AnalyzeResponse { message }).into_response(),
        Err(err) => error_response(&err),
    }
}

fn error_response(err: &AppError) -> Response {
    let status = if err.is_validation() {
        StatusCode::BAD_REQUEST
    } else if err.is_not_found() {
        StatusCode::NOT_FOUND
    } else if err.is_agent_unavailable() {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };

    (status, Json(ErrorBody { error: err.to_string() })).into_response()
}
