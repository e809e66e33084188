//! # routes — HTTP trigger for the scheduler
//!
//! | Method | Path      | Description                                        |
//! |--------|-----------|----------------------------------------------------|
//! | POST   | `/invoke` | Run the screen once; body = optional event JSON    |
//! | GET    | `/health` | Liveness check                                     |
//!
//! `/invoke` answers with the handler's status code and its
//! `{statusCode, body}` JSON, so a scheduler sees `500` when delivery failed.

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use crate::handler::handle;
use crate::market::MarketDataProvider;
use crate::publisher::ReportPublisher;
use crate::state::SharedState;

pub fn build_router<P, R>(state: SharedState<P, R>) -> Router
where
    P: MarketDataProvider + Send + Sync + 'static,
    R: ReportPublisher + Send + Sync + 'static,
{
    Router::new()
        .route("/invoke", post(invoke::<P, R>))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ─── POST /invoke ─────────────────────────────────────────────────────────────

async fn invoke<P, R>(State(state): State<SharedState<P, R>>, body: Bytes) -> impl IntoResponse
where
    P: MarketDataProvider + Send + Sync + 'static,
    R: ReportPublisher + Send + Sync + 'static,
{
    // The event is opaque; anything that isn't JSON is treated as no event.
    let event: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let today = chrono::Utc::now().date_naive();

    let resp = handle(
        event,
        Value::Null,
        &state.watchlist,
        &state.provider,
        &state.publisher,
        today,
    )
    .await;

    let status = StatusCode::from_u16(resp.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(resp))
}

// ─── GET /health ──────────────────────────────────────────────────────────────

async fn health() -> impl IntoResponse {
    Json(json!({ "ok": true }))
}

// ─── Tests ────────────────────────────────────────────────────────────────────
