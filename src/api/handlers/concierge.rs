//! Concierge handler.

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};

use crate::api::dto::{AskRequest, AskResponse};
use crate::app_state::AppState;

/// `POST /api/ask-ai` — Ask the concierge for a recommendation.
///
/// Always answers `200`; a malformed body is treated as an empty query.
#[utoipa::path(
    post,
    path = "/api/ask-ai",
    tag = "Concierge",
    summary = "Ask for a recommendation",
    description = "Answers a free-text question using the stored events as context. Failures are described in the reply text.",
    request_body = AskRequest,
    responses(
        (status = 200, description = "Concierge reply", body = AskResponse),
    )
)]
pub async fn ask_ai(
    State(state): State<AppState>,
    body: Result<Json<AskRequest>, JsonRejection>,
) -> impl IntoResponse {
    let query = match body {
        Ok(Json(req)) => req.query,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "unreadable concierge request");
            String::new()
        }
    };
    let reply = state.concierge.ask(&query).await;
    Json(AskResponse { reply })
}

/// Concierge routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/ask-ai", post(ask_ai))
}
