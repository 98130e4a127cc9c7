//! Like, check-in and comment handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::{delete, post, put};
use axum::{Json, Router};

use super::events::parse_event_id;
use crate::api::dto::{
    CheckinRequest, CheckinResponse, CommentRequest, LikeRequest, LikeResponse, MessageResponse,
};
use crate::app_state::AppState;
use crate::domain::Comment;
use crate::error::{ErrorResponse, GatewayError};

/// `PUT /api/events/{id}/like` — Toggle a like.
///
/// # Errors
///
/// Returns [`GatewayError::EventNotFound`] for an unknown id and
/// [`GatewayError::Validation`] for a blank identity.
#[utoipa::path(
    put,
    path = "/api/events/{id}/like",
    tag = "Engagement",
    summary = "Toggle like",
    params(
        ("id" = String, Path, description = "Event identifier"),
    ),
    request_body = LikeRequest,
    responses(
        (status = 200, description = "Like state after the toggle", body = LikeResponse),
        (status = 400, description = "Missing identity", body = ErrorResponse),
        (status = 404, description = "Event not found", body = ErrorResponse),
    )
)]
pub async fn toggle_like(
    State(state): State<AppState>,
    Path(id): Path<String>,
    req: Result<Json<LikeRequest>, JsonRejection>,
) -> Result<impl IntoResponse, GatewayError> {
    let id = parse_event_id(&id)?;
    let Json(req) = req?;
    let outcome = state.events.toggle_like(id, &req.user_email).await?;
    Ok(Json(LikeResponse {
        liked: outcome.liked,
        likes: outcome.likes,
    }))
}

/// `POST /api/events/{id}/checkin` — Check in to an event.
///
/// # Errors
///
/// Returns [`GatewayError::EventNotFound`] for an unknown id and
/// [`GatewayError::Validation`] for a blank identity.
#[utoipa::path(
    post,
    path = "/api/events/{id}/checkin",
    tag = "Engagement",
    summary = "Check in",
    description = "Adds the identity to the event's check-ins. Checking in twice changes nothing.",
    params(
        ("id" = String, Path, description = "Event identifier"),
    ),
    request_body = CheckinRequest,
    responses(
        (status = 200, description = "Check-ins after the operation", body = CheckinResponse),
        (status = 400, description = "Missing identity", body = ErrorResponse),
        (status = 404, description = "Event not found", body = ErrorResponse),
    )
)]
pub async fn check_in(
    State(state): State<AppState>,
    Path(id): Path<String>,
    req: Result<Json<CheckinRequest>, JsonRejection>,
) -> Result<impl IntoResponse, GatewayError> {
    let id = parse_event_id(&id)?;
    let Json(req) = req?;
    let checkins = state.events.check_in(id, &req.user).await?;
    Ok(Json(CheckinResponse { checkins }))
}

/// `POST /api/events/{id}/comment` — Add a comment.
///
/// # Errors
///
/// Returns [`GatewayError::Validation`] for empty text and
/// [`GatewayError::EventNotFound`] for an unknown id.
#[utoipa::path(
    post,
    path = "/api/events/{id}/comment",
    tag = "Engagement",
    summary = "Add comment",
    params(
        ("id" = String, Path, description = "Event identifier"),
    ),
    request_body = CommentRequest,
    responses(
        (status = 200, description = "Stored comment", body = Comment),
        (status = 400, description = "Empty comment", body = ErrorResponse),
        (status = 404, description = "Event not found", body = ErrorResponse),
    )
)]
pub async fn add_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    req: Result<Json<CommentRequest>, JsonRejection>,
) -> Result<impl IntoResponse, GatewayError> {
    let id = parse_event_id(&id)?;
    let Json(req) = req?;
    let comment = state.events.add_comment(id, &req.user, &req.text).await?;
    Ok(Json(comment))
}

/// `DELETE /api/events/{id}/comment/{comment_id}` — Remove a comment.
///
/// # Errors
///
/// Returns [`GatewayError::EventNotFound`] or
/// [`GatewayError::CommentNotFound`].
#[utoipa::path(
    delete,
    path = "/api/events/{id}/comment/{comment_id}",
    tag = "Engagement",
    summary = "Delete comment",
    params(
        ("id" = String, Path, description = "Event identifier"),
        ("comment_id" = String, Path, description = "Comment identifier"),
    ),
    responses(
        (status = 200, description = "Comment removed", body = MessageResponse),
        (status = 404, description = "Event or comment not found", body = ErrorResponse),
    )
)]
pub async fn delete_comment(
    State(state): State<AppState>,
    Path((id, comment_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, GatewayError> {
    let id = parse_event_id(&id)?;
    state.events.remove_comment(id, &comment_id).await?;
    Ok(Json(MessageResponse::new("Comment deleted")))
}

/// Engagement routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/events/{id}/like", put(toggle_like))
        .route("/events/{id}/checkin", post(check_in))
        .route("/events/{id}/comment", post(add_comment))
        .route("/events/{id}/comment/{comment_id}", delete(delete_comment))
}
