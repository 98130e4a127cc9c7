//! Flyer scan handler.

use std::sync::Arc;

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};

use super::multipart::PhotoForm;
use crate::app_state::AppState;
use crate::error::{ErrorResponse, GatewayError};
use crate::service::FlyerUpload;

/// `POST /api/scan` — Run the ingestion pipeline on one flyer.
///
/// The pipeline runs on its own task, so a client that disconnects does not
/// cancel an in-flight model call or store write.
///
/// # Errors
///
/// Returns [`GatewayError::Intake`] for a missing or disallowed photo and a
/// pipeline error when extraction or persistence fails.
#[utoipa::path(
    post,
    path = "/api/scan",
    tag = "Scan",
    summary = "Scan a flyer",
    description = "Stores the uploaded flyer, extracts event details with the first available model and persists the resulting event.",
    request_body(content = crate::api::dto::FlyerForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Assembled event record", body = serde_json::Value),
        (status = 400, description = "Missing or unsupported photo", body = ErrorResponse),
        (status = 500, description = "Extraction or persistence failed", body = ErrorResponse),
    )
)]
pub async fn scan_flyer(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, GatewayError> {
    let mut form = PhotoForm::read(multipart?).await?;
    let (file_name, bytes) = form.take_photo()?;
    let upload = FlyerUpload {
        file_name,
        bytes,
        user_email: form.text("user_email").map(ToString::to_string),
    };

    let pipeline = Arc::clone(&state.pipeline);
    let record = tokio::spawn(async move { pipeline.ingest(upload).await })
        .await
        .map_err(|e| GatewayError::Internal(format!("ingestion task aborted: {e}")))??;

    Ok(Json(record))
}

/// Scan routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/scan", post(scan_flyer))
}
