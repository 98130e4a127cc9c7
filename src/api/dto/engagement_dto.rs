//! Like, check-in and comment DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Request body for `PUT /api/events/{id}/like`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct LikeRequest {
    /// Identity toggling the like.
    #[serde(default)]
    pub user_email: String,
}

/// Response body for `PUT /api/events/{id}/like`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LikeResponse {
    /// Whether the identity likes the event after the toggle.
    pub liked: bool,
    /// Likes after the toggle.
    pub likes: Vec<String>,
}

/// Request body for `POST /api/events/{id}/checkin`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckinRequest {
    /// Identity checking in.
    #[serde(default)]
    pub user: String,
}

/// Response body for `POST /api/events/{id}/checkin`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CheckinResponse {
    /// Check-ins after the operation.
    pub checkins: Vec<String>,
}

/// Request body for `POST /api/events/{id}/comment`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CommentRequest {
    /// Author identity; blank means anonymous.
    #[serde(default)]
    pub user: String,
    /// Comment body.
    #[serde(default)]
    pub text: String,
}
