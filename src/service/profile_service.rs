//! Profile service: avatar uploads and lookups.

use std::sync::Arc;

use crate::domain::UserProfile;
use crate::error::GatewayError;
use crate::persistence::EventStore;
use crate::pipeline::ImageStore;

/// Stores avatars and keeps the profile collection current.
#[derive(Debug, Clone)]
pub struct ProfileService {
    store: Arc<dyn EventStore>,
    avatars: ImageStore,
}

impl ProfileService {
    /// Creates a new `ProfileService` writing avatars into `avatars`.
    #[must_use]
    pub fn new(store: Arc<dyn EventStore>, avatars: ImageStore) -> Self {
        Self { store, avatars }
    }

    /// Image storage used for avatars.
    #[must_use]
    pub fn image_store(&self) -> &ImageStore {
        &self.avatars
    }

    /// Stores a new avatar and upserts the profile for `email`.
    ///
    /// Events and comments stamped with the previous avatar keep it.
    ///
    /// # Errors
    ///
    /// - [`GatewayError::Validation`] if `email` is blank.
    /// - [`GatewayError::Intake`] for a missing or disallowed image.
    /// - [`GatewayError::PersistenceError`] if the upsert fails.
    pub async fn upload_avatar(
        &self,
        email: &str,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<UserProfile, GatewayError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(GatewayError::Validation("email is required".to_string()));
        }
        let stored = self.avatars.store(file_name, bytes).await?;
        let profile = UserProfile::new(email.to_string(), Some(stored.public_url));
        self.store.upsert_profile(&profile).await?;
        tracing::info!(email, "avatar updated");
        Ok(profile)
    }

    /// Looks up a profile.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ProfileNotFound`] if none exists.
    pub async fn get(&self, email: &str) -> Result<UserProfile, GatewayError> {
        self.store
            .get_profile(email)
            .await?
            .ok_or_else(|| GatewayError::ProfileNotFound(email.to_string()))
    }
}
