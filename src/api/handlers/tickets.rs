//! Ticket claim and listing handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{ClaimTicketRequest, ClaimTicketResponse};
use crate::app_state::AppState;
use crate::domain::Ticket;
use crate::error::{ErrorResponse, GatewayError};
use crate::service::ClaimDetails;

/// `POST /api/tickets/claim` — Claim a free ticket.
///
/// Repeating a claim returns the ticket already on record.
///
/// # Errors
///
/// Returns [`GatewayError::Validation`] for a missing identity.
#[utoipa::path(
    post,
    path = "/api/tickets/claim",
    tag = "Tickets",
    summary = "Claim ticket",
    request_body = ClaimTicketRequest,
    responses(
        (status = 201, description = "Ticket issued", body = ClaimTicketResponse),
        (status = 200, description = "Ticket already claimed", body = ClaimTicketResponse),
        (status = 400, description = "Missing identity", body = ErrorResponse),
    )
)]
pub async fn claim_ticket(
    State(state): State<AppState>,
    req: Result<Json<ClaimTicketRequest>, JsonRejection>,
) -> Result<impl IntoResponse, GatewayError> {
    let Json(req) = req?;
    let details = ClaimDetails {
        event_name: req.event_name,
        venue: req.venue,
        date: req.date,
    };
    let (ticket, issued) = state
        .tickets
        .claim(req.event_id, &req.user_email, details)
        .await?;

    let (status, message) = if issued {
        (StatusCode::CREATED, "Ticket claimed")
    } else {
        (StatusCode::OK, "Ticket already claimed")
    };
    Ok((
        status,
        Json(ClaimTicketResponse {
            message: message.to_string(),
            ticket,
        }),
    ))
}

/// `GET /api/user/{email}/tickets` — List a user's tickets.
///
/// # Errors
///
/// Returns [`GatewayError::PersistenceError`] if the store is unavailable.
#[utoipa::path(
    get,
    path = "/api/user/{email}/tickets",
    tag = "Tickets",
    summary = "List tickets",
    params(
        ("email" = String, Path, description = "Ticket holder"),
    ),
    responses(
        (status = 200, description = "Tickets, newest first", body = Vec<Ticket>),
    )
)]
pub async fn list_tickets(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<impl IntoResponse, GatewayError> {
    Ok(Json(state.tickets.list(&email).await?))
}

/// Ticket routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/tickets/claim", post(claim_ticket))
        .route("/user/{email}/tickets", get(list_tickets))
}
