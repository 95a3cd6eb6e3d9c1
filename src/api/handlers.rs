use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

/// Body served at `/` for process keepers
pub const ALIVE_BODY: &str = "I'm alive!";

/// Read-only state shared across handlers
pub struct AppState {
    pub started_at: Instant,
    pub location: String,
}

impl AppState {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            started_at: Instant::now(),
            location: location.into(),
        }
    }
}

// ============================================================================
// Liveness
// ============================================================================

pub async fn alive() -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        ALIVE_BODY,
    )
}

// ============================================================================
// Health Check
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub location: String,
    pub uptime_secs: u64,
}

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        location: state.location.clone(),
        uptime_secs: state.started_at.elapsed().as_secs(),
    })
}
