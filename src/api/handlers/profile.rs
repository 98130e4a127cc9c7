//! Avatar upload and profile lookup handlers.

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, Path, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use super::multipart::PhotoForm;
use crate::app_state::AppState;
use crate::domain::UserProfile;
use crate::error::{ErrorResponse, GatewayError};

/// `POST /api/user/profile` — Upload an avatar.
///
/// Only future events and comments pick up the new avatar.
///
/// # Errors
///
/// Returns [`GatewayError::Intake`] for a missing photo and
/// [`GatewayError::Validation`] for a missing email.
#[utoipa::path(
    post,
    path = "/api/user/profile",
    tag = "Profiles",
    summary = "Upload avatar",
    request_body(content = crate::api::dto::AvatarForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Profile after the upsert", body = UserProfile),
        (status = 400, description = "Missing photo or email", body = ErrorResponse),
    )
)]
pub async fn upload_avatar(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, GatewayError> {
    let mut form = PhotoForm::read(multipart?).await?;
    let (file_name, bytes) = form.take_photo()?;
    let email = form.text("email").unwrap_or_default();
    let profile = state.profiles.upload_avatar(email, &file_name, &bytes).await?;
    Ok(Json(profile))
}

/// `GET /api/user/{email}` — Fetch a profile.
///
/// # Errors
///
/// Returns [`GatewayError::ProfileNotFound`] if none exists.
#[utoipa::path(
    get,
    path = "/api/user/{email}",
    tag = "Profiles",
    summary = "Get profile",
    params(
        ("email" = String, Path, description = "Profile owner"),
    ),
    responses(
        (status = 200, description = "Profile", body = UserProfile),
        (status = 404, description = "Profile not found", body = ErrorResponse),
    )
)]
pub async fn get_profile(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<impl IntoResponse, GatewayError> {
    Ok(Json(state.profiles.get(&email).await?))
}

/// Profile routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/user/profile", post(upload_avatar))
        .route("/user/{email}", get(get_profile))
}
