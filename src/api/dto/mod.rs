//! Data Transfer Objects for REST request/response serialization.
//!
//! Event documents themselves are returned as-is (see
//! [`crate::domain::EventRecord`]); these types cover the remaining
//! request and response bodies.

pub mod common_dto;
pub mod concierge_dto;
pub mod engagement_dto;
pub mod ticket_dto;
pub mod upload_dto;

pub use common_dto::*;
pub use concierge_dto::*;
pub use engagement_dto::*;
pub use ticket_dto::*;
pub use upload_dto::*;
