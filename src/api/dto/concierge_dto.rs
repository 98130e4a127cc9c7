//! Concierge DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Request body for `POST /api/ask-ai`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct AskRequest {
    /// Free-text question.
    #[serde(default)]
    pub query: String,
}

/// Response body for `POST /api/ask-ai`. Always returned with `200`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AskResponse {
    /// Recommendation, or an apology describing what went wrong.
    pub reply: String,
}
