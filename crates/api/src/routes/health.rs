//! Liveness probe. Mounted at the root, outside the page routes.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `ok` when every dependency answers, `degraded` otherwise.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    /// The picture upload directory exists and is a directory.
    pub media_healthy: bool,
}

/// GET /health
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = agenda_db::health_check(&state.pool).await.is_ok();
    let media_healthy = tokio::fs::metadata(&state.config.media_root)
        .await
        .is_ok_and(|meta| meta.is_dir());

    if !db_healthy || !media_healthy {
        tracing::warn!(db_healthy, media_healthy, "Health check degraded");
    }

    Json(HealthResponse {
        status: if db_healthy && media_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        media_healthy,
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
