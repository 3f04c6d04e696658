//! HTTP surface: `POST /predict`, `GET /health`, `GET /debug/llm`.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::json;

use triagem_core::Process;
use triagem_runtime::{DecisionOrchestrator, RuntimeConfig};

/// Shared, read-only request state.
#[derive(Clone)]
pub struct AppState {
    orchestrator: Arc<DecisionOrchestrator>,
    has_key: bool,
}

impl AppState {
    pub fn new(orchestrator: DecisionOrchestrator, config: &RuntimeConfig) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
            has_key: config.has_api_key(),
        }
    }
}

#[derive(Debug, Serialize)]
struct LlmDebug<'a> {
    provider: &'a str,
    model: &'a str,
    has_key: bool,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/debug/llm", get(debug_llm))
        .route("/predict", post(predict))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, state: AppState) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Listening");
    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn debug_llm(State(state): State<AppState>) -> Response {
    Json(LlmDebug {
        provider: state.orchestrator.provider_name(),
        model: state.orchestrator.model(),
        has_key: state.has_key,
    })
    .into_response()
}

async fn predict(State(state): State<AppState>, Json(process): Json<Process>) -> Response {
    if let Err(e) = process.validate() {
        tracing::info!(processo = %process.numero_processo, error = %e, "Rejected invalid process");
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "error": e.to_string() })),
        )
            .into_response();
    }

    let report = state.orchestrator.decide(&process).await;
    (StatusCode::OK, Json(report.decision)).into_response()
}
