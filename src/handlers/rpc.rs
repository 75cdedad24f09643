//! Trusted query endpoint
//!
//! `getUpcomingEvents` is the one read that never goes straight to the
//! store: the approval and date filters are enforced here, server-side, so
//! an arbitrary client cannot list unapproved events. Errors use the
//! callable convention: `unauthenticated`, `invalid-argument`, `internal`.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, error};

use crate::models::event::Event;
use crate::services::auth::AuthProvider;
use crate::services::events::UpcomingEventsSource;

#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<dyn AuthProvider>,
    pub events: Arc<dyn UpcomingEventsSource>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/rpc/getUpcomingEvents", post(get_upcoming_events))
        .with_state(state)
}

/// Callable-style failure with a stable status string.
#[derive(Debug)]
pub struct RpcError {
    http: StatusCode,
    status: &'static str,
    message: String,
}

impl RpcError {
    fn unauthenticated() -> Self {
        Self {
            http: StatusCode::UNAUTHORIZED,
            status: "unauthenticated",
            message: "You must be logged in to view events.".to_string(),
        }
    }

    fn invalid_argument(message: &str) -> Self {
        Self {
            http: StatusCode::BAD_REQUEST,
            status: "invalid-argument",
            message: message.to_string(),
        }
    }

    fn internal() -> Self {
        Self {
            http: StatusCode::INTERNAL_SERVER_ERROR,
            status: "internal",
            message: "An error occurred while fetching events.".to_string(),
        }
    }
}

impl IntoResponse for RpcError {
    fn into_response(self) -> Response {
        let body = json!({
            "error": {
                "status": self.status,
                "message": self.message,
            }
        });
        (self.http, Json(body)).into_response()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GetUpcomingEventsRequest {
    #[serde(default)]
    college_id: Option<String>,
}

async fn get_upcoming_events(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Option<Json<GetUpcomingEventsRequest>>,
) -> Result<Json<Vec<Event>>, RpcError> {
    let token = bearer_token(&headers).ok_or_else(RpcError::unauthenticated)?;
    let principal = state
        .auth
        .verify_token(token)
        .await
        .map_err(|_| RpcError::unauthenticated())?;

    let college_id = payload
        .and_then(|Json(request)| request.college_id)
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| RpcError::invalid_argument("A collegeId must be provided."))?;

    debug!(uid = %principal.uid, college_id = %college_id, "Fetching upcoming events");

    let events = state
        .events
        .list_approved_upcoming(&college_id)
        .await
        .map_err(|e| {
            error!(college_id = %college_id, error = %e, "Upcoming events query failed");
            RpcError::internal()
        })?;

    Ok(Json(events))
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
