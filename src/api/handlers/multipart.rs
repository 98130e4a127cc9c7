//! Reads the `photo` upload forms used by scan and avatar endpoints.

use std::collections::HashMap;

use axum::extract::Multipart;

use crate::error::GatewayError;

/// A multipart form with one optional file part and any number of text
/// fields.
#[derive(Debug, Default)]
pub struct PhotoForm {
    /// File name and bytes of the `photo` part, if sent.
    pub photo: Option<(String, Vec<u8>)>,
    /// Remaining text fields by name.
    pub fields: HashMap<String, String>,
}

impl PhotoForm {
    /// Drains `multipart`, keeping the first `photo` part.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Intake`] if the body is not valid multipart.
    pub async fn read(mut multipart: Multipart) -> Result<Self, GatewayError> {
        let mut form = Self::default();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| GatewayError::Intake(format!("invalid multipart body: {e}")))?
        {
            let name = field.name().unwrap_or_default().to_string();
            if name == "photo" {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| GatewayError::Intake(format!("could not read photo: {e}")))?;
                if form.photo.is_none() {
                    form.photo = Some((file_name, bytes.to_vec()));
                }
            } else {
                let value = field
                    .text()
                    .await
                    .map_err(|e| GatewayError::Intake(format!("could not read field {name}: {e}")))?;
                form.fields.insert(name, value);
            }
        }
        Ok(form)
    }

    /// Takes the photo part, failing when it is absent or empty.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Intake`] when no photo was sent.
    pub fn take_photo(&mut self) -> Result<(String, Vec<u8>), GatewayError> {
        match self.photo.take() {
            Some((name, bytes)) if !bytes.is_empty() => Ok((name, bytes)),
            _ => Err(GatewayError::Intake("no photo uploaded".to_string())),
        }
    }

    /// Text field `name`, trimmed, or `None` when absent or blank.
    #[must_use]
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }
}
