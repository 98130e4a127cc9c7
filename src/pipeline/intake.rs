//! Image intake: validates uploads and writes them under a storage root.

use std::path::{Path, PathBuf};

use crate::error::GatewayError;

/// Extensions accepted for flyer and avatar uploads (lower-case).
pub const ALLOWED_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "gif", "webp"];

/// An upload persisted to local storage.
///
/// Never renamed or moved once written; `public_url` is stable for the
/// lifetime of the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    /// Random hex prefix plus the sanitized original name.
    pub file_name: String,
    /// Absolute path of the written file.
    pub path: PathBuf,
    /// Reference served to API consumers, e.g. `/uploads/1a2b3c4d_flyer.png`.
    pub public_url: String,
}

impl StoredImage {
    /// MIME type derived from the file extension.
    #[must_use]
    pub fn mime_type(&self) -> &'static str {
        match extension_of(&self.file_name).as_deref() {
            Some("png") => "image/png",
            Some("gif") => "image/gif",
            Some("webp") => "image/webp",
            _ => "image/jpeg",
        }
    }
}

/// Directory-backed image storage mounted under a public URL prefix.
#[derive(Debug, Clone)]
pub struct ImageStore {
    root: PathBuf,
    public_prefix: String,
}

impl ImageStore {
    /// Creates a store writing into `root` and serving under `public_prefix`
    /// (e.g. `/uploads`).
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, public_prefix: &str) -> Self {
        Self {
            root: root.into(),
            public_prefix: public_prefix.trim_end_matches('/').to_string(),
        }
    }

    /// Storage root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Validates and writes an upload.
    ///
    /// # Errors
    ///
    /// - [`GatewayError::Intake`] if the payload is empty or the name has no
    ///   allowed image extension.
    /// - [`GatewayError::Storage`] if the directory cannot be written.
    pub async fn store(
        &self,
        original_name: &str,
        bytes: &[u8],
    ) -> Result<StoredImage, GatewayError> {
        if bytes.is_empty() {
            return Err(GatewayError::Intake("no photo uploaded".to_string()));
        }

        let sanitized = sanitize_file_name(original_name)
            .ok_or_else(|| GatewayError::Intake("upload has no usable file name".to_string()))?;

        match extension_of(&sanitized) {
            Some(ext) if ALLOWED_EXTENSIONS.contains(&ext.as_str()) => {}
            Some(ext) => {
                return Err(GatewayError::Intake(format!("unsupported image type: .{ext}")));
            }
            None => {
                return Err(GatewayError::Intake("upload has no file extension".to_string()));
            }
        }

        let file_name = format!("{}_{sanitized}", random_prefix());

        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| GatewayError::Storage(format!("upload directory unavailable: {e}")))?;

        let path = std::path::absolute(self.root.join(&file_name))
            .map_err(|e| GatewayError::Storage(format!("cannot resolve upload path: {e}")))?;

        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| GatewayError::Storage(format!("could not store upload: {e}")))?;

        tracing::debug!(file = %file_name, bytes = bytes.len(), "upload stored");

        Ok(StoredImage {
            public_url: format!("{}/{file_name}", self.public_prefix),
            file_name,
            path,
        })
    }
}

/// Reduces a client-supplied name to a safe single path component.
///
/// Keeps only the part after the last `/` or `\`, replaces anything outside
/// `[A-Za-z0-9._-]` with `_`, and strips leading dots. Returns `None` when
/// nothing usable remains.
#[must_use]
pub fn sanitize_file_name(name: &str) -> Option<String> {
    let last = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = last
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned.to_string())
    }
}

fn extension_of(name: &str) -> Option<String> {
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

fn random_prefix() -> String {
    uuid::Uuid::new_v4().simple().to_string().chars().take(8).collect()
}
