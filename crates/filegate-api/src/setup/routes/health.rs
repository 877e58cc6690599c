//! Health check handlers.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

const CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// Run an async check with timeout; returns "healthy", "timeout", or "{prefix}: {error}".
async fn run_check<F, E>(timeout: Duration, f: F, error_prefix: &str) -> String
where
    F: Future<Output = Result<(), E>>,
    E: Display,
{
    match tokio::time::timeout(timeout, f).await {
        Ok(Ok(())) => "healthy".to_string(),
        Ok(Err(e)) => format!("{}: {}", error_prefix, e),
        Err(_) => "timeout".to_string(),
    }
}

#[derive(Serialize)]
pub(super) struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
}

#[derive(Serialize)]
pub(super) struct ReadinessResponse {
    pub status: &'static str,
    pub database: String,
}

/// Liveness: the process answers. No dependency is touched.
pub(super) async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        timestamp: Utc::now(),
    })
}

/// Readiness: the file registry answers within the check timeout.
pub(super) async fn readiness_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let files = state.files.clone();
    let database = run_check(CHECK_TIMEOUT, async move { files.ping().await }, "not_ready").await;

    if database == "healthy" {
        (
            StatusCode::OK,
            Json(ReadinessResponse {
                status: "ready",
                database,
            }),
        )
    } else {
        tracing::error!(database = %database, "Readiness check failed");
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ReadinessResponse {
                status: "not_ready",
                database,
            }),
        )
    }
}
