//! REST endpoint handlers organized by resource.

pub mod concierge;
pub mod engagement;
pub mod events;
pub mod multipart;
pub mod profile;
pub mod scan;
pub mod system;
pub mod tickets;

use axum::Router;

use crate::app_state::AppState;

/// Composes all resource routes under `/api`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(scan::routes())
        .merge(events::routes())
        .merge(engagement::routes())
        .merge(profile::routes())
        .merge(tickets::routes())
        .merge(concierge::routes())
}
