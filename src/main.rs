mod agent;
mod errors;
mod models;
mod routes;
mod service;
mod session;

use axum::{routing::get, routing::post, Router};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::agent::OpenAiAgentService;
use crate::routes::api_routes::{analyze_handler, start_handler};
use crate::service::advisor_service::AdvisorService;
use crate::session::SessionStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present (development convenience)
    dotenvy::dotenv().ok();

    // Initialise tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "velfie=debug,tower_http=debug".into()),
        )
        .init();

    // ── Dependency wiring ─────────────────────────────────────────────────────
    let api_key = std::env::var("OPENAI_API_KEY")
        .expect("OPENAI_API_KEY must be set (copy .env.example to .env)");

    let store = SessionStore::new();
    let agent = OpenAiAgentService::new(&api_key);
    let advisor = AdvisorService::new(store, agent);

    // ── Router ────────────────────────────────────────────────────────────────
    // CORS is wide open: the widget is served from a different origin.
    let app = Router::new()
        .route("/start", get(start_handler))
        .route("/analyze", post(analyze_handler))
        .nest_service("/assets", ServeDir::new("assets"))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(advisor);

    // ── Listen ────────────────────────────────────────────────────────────────
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8000);
    let addr = format!("127.0.0.1:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{addr}/");

    axum::serve(listener, app).await?;
    Ok(())
}
