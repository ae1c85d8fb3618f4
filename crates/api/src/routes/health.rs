use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok`, or `degraded` when the database is unreachable.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    /// Whether the media root exists and is a directory.
    pub media_healthy: bool,
}

/// GET /health -- service, database and media-root health.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = imgview_db::health_check(&state.pool).await.is_ok();
    let media_healthy = tokio::fs::metadata(state.media.root())
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false);

    let status = if db_healthy && media_healthy {
        "ok"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        media_healthy,
    })
}

/// Mounted at the root, not under `/api/v1`.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
