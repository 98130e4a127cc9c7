//! Multipart form shapes, used for API documentation only.
//!
//! The handlers read these forms field by field with
//! [`axum::extract::Multipart`].

use utoipa::ToSchema;

/// Form for `POST /api/scan`.
#[derive(Debug, ToSchema)]
pub struct FlyerForm {
    /// Flyer image (png, jpg, jpeg, gif or webp).
    #[schema(value_type = String, format = Binary)]
    pub photo: Vec<u8>,
    /// Creator identity; anonymous when absent.
    pub user_email: Option<String>,
}

/// Form for `POST /api/user/profile`.
#[derive(Debug, ToSchema)]
pub struct AvatarForm {
    /// Avatar image (png, jpg, jpeg, gif or webp).
    #[schema(value_type = String, format = Binary)]
    pub photo: Vec<u8>,
    /// Profile owner.
    pub email: String,
}
