//! OpenAPI document for the REST surface.

use utoipa::OpenApi;

use crate::api::dto::{
    AskRequest, AskResponse, AvatarForm, CheckinRequest, CheckinResponse, ClaimTicketRequest,
    ClaimTicketResponse, CommentRequest, FlyerForm, LikeRequest, LikeResponse, MessageResponse,
};
use crate::api::handlers::{concierge, engagement, events, profile, scan, system, tickets};
use crate::domain::{Comment, Ticket, UserProfile};
use crate::error::ErrorResponse;

/// Generated OpenAPI description, served at `/api-docs/openapi.json` when
/// the `swagger-ui` feature is enabled.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "vibe-gateway",
        description = "Flyer scanning, event discovery and engagement API."
    ),
    paths(
        scan::scan_flyer,
        events::list_events,
        events::update_event,
        events::delete_event,
        engagement::toggle_like,
        engagement::check_in,
        engagement::add_comment,
        engagement::delete_comment,
        profile::upload_avatar,
        profile::get_profile,
        tickets::claim_ticket,
        tickets::list_tickets,
        concierge::ask_ai,
        system::health_handler,
    ),
    components(schemas(
        ErrorResponse,
        MessageResponse,
        FlyerForm,
        AvatarForm,
        LikeRequest,
        LikeResponse,
        CheckinRequest,
        CheckinResponse,
        CommentRequest,
        Comment,
        UserProfile,
        ClaimTicketRequest,
        ClaimTicketResponse,
        Ticket,
        AskRequest,
        AskResponse,
        system::HealthResponse,
    )),
    tags(
        (name = "Scan", description = "Flyer ingestion"),
        (name = "Events", description = "Stored events"),
        (name = "Engagement", description = "Likes, check-ins and comments"),
        (name = "Profiles", description = "User avatars"),
        (name = "Tickets", description = "Free ticket claims"),
        (name = "Concierge", description = "Recommendations"),
        (name = "System", description = "Service health"),
    )
)]
pub struct ApiDoc;
