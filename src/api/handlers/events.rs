//! Event listing, edit and delete handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::{get, put};
use axum::{Json, Router};
use serde_json::{Map, Value};

use crate::api::dto::MessageResponse;
use crate::app_state::AppState;
use crate::domain::EventId;
use crate::error::{ErrorResponse, GatewayError};

/// Parses a path segment as an event identifier. Malformed identifiers
/// cannot name a stored event, so they are reported as not found.
pub(crate) fn parse_event_id(raw: &str) -> Result<EventId, GatewayError> {
    raw.parse()
        .map_err(|_| GatewayError::EventNotFound(raw.to_string()))
}

/// `GET /api/events` — List all events, newest first.
///
/// # Errors
///
/// Returns [`GatewayError::PersistenceError`] if the store is unavailable.
#[utoipa::path(
    get,
    path = "/api/events",
    tag = "Events",
    summary = "List events",
    description = "Returns every stored event, newest first. `likes`, `checkins` and `comments` are always present.",
    responses(
        (status = 200, description = "Event documents", body = Vec<serde_json::Value>),
        (status = 500, description = "Store unavailable", body = ErrorResponse),
    )
)]
pub async fn list_events(State(state): State<AppState>) -> Result<impl IntoResponse, GatewayError> {
    Ok(Json(state.events.list().await?))
}

/// `PUT /api/events/{id}` — Edit allow-listed fields.
///
/// # Errors
///
/// Returns [`GatewayError::Validation`] if no editable field was supplied
/// and [`GatewayError::EventNotFound`] for an unknown id.
#[utoipa::path(
    put,
    path = "/api/events/{id}",
    tag = "Events",
    summary = "Update an event",
    description = "Applies `event_name`, `venue`, `date`, `time` and `ticket_link`; other keys are ignored.",
    params(
        ("id" = String, Path, description = "Event identifier"),
    ),
    request_body = serde_json::Value,
    responses(
        (status = 200, description = "Updated event", body = serde_json::Value),
        (status = 400, description = "No editable fields", body = ErrorResponse),
        (status = 404, description = "Event not found", body = ErrorResponse),
    )
)]
pub async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
    changes: Result<Json<Map<String, Value>>, JsonRejection>,
) -> Result<impl IntoResponse, GatewayError> {
    let id = parse_event_id(&id)?;
    let Json(changes) = changes?;
    Ok(Json(state.events.update(id, changes).await?))
}

/// `DELETE /api/events/{id}` — Remove an event.
///
/// # Errors
///
/// Returns [`GatewayError::EventNotFound`] for an unknown id.
#[utoipa::path(
    delete,
    path = "/api/events/{id}",
    tag = "Events",
    summary = "Delete an event",
    params(
        ("id" = String, Path, description = "Event identifier"),
    ),
    responses(
        (status = 200, description = "Event deleted", body = MessageResponse),
        (status = 404, description = "Event not found", body = ErrorResponse),
    )
)]
pub async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, GatewayError> {
    let id = parse_event_id(&id)?;
    state.events.delete(id).await?;
    Ok(Json(MessageResponse::new("Event deleted")))
}

/// Event routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/events", get(list_events))
        .route("/events/{id}", put(update_event).delete(delete_event))
}
