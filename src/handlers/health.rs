//! Health endpoint
//!
//! Readiness probe backed by the database pool; degrades to 503 when the
//! store is unreachable.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tracing::error;

use crate::database::{connection, DatabasePool};

pub fn router(pool: DatabasePool) -> Router {
    Router::new().route("/health", get(health)).with_state(pool)
}

async fn health(State(pool): State<DatabasePool>) -> (StatusCode, Json<serde_json::Value>) {
    match connection::health_check(&pool).await {
        Ok(()) => (StatusCode::OK, Json(json!({ "status": "ok" }))),
        Err(e) => {
            error!(error = %e, "Database health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unavailable" })),
            )
        }
    }
}
