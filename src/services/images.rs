//! Image upload storage.
//!
//! Each upload lands in its own randomly named directory under the storage
//! root, so a stored path always has the form `<6-hex-chars>/<uuid>.<ext>`.
//! The file format is decided by sniffing the content, never by the
//! client-declared content type.

use std::path::PathBuf;

use rand::Rng;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Maximum accepted upload size: 2 MiB
pub const MAX_FILE_SIZE: usize = 2_097_152;

/// Accepted image formats, detected from content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Jpeg,
    Png,
}

impl ImageKind {
    /// Detect the image format from leading magic bytes
    pub fn sniff(data: &[u8]) -> Option<Self> {
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(ImageKind::Jpeg)
        } else if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
            Some(ImageKind::Png)
        } else {
            None
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ImageKind::Jpeg => "jpg",
            ImageKind::Png => "png",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageKind::Jpeg => "image/jpeg",
            ImageKind::Png => "image/png",
        }
    }
}

/// File-system store for uploaded book images
#[derive(Clone)]
pub struct ImageStore {
    root: PathBuf,
}

impl ImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &std::path::Path {
        &self.root
    }

    /// Validate and store an uploaded image. Returns the relative path
    /// `<randomDir>/<filename>`. Nothing is written when validation fails.
    pub async fn upload(&self, data: &[u8]) -> AppResult<String> {
        let kind = ImageKind::sniff(data).ok_or_else(|| {
            AppError::Validation("Invalid file type. Only JPG and PNG are allowed.".to_string())
        })?;

        if data.len() > MAX_FILE_SIZE {
            return Err(AppError::Validation(
                "File is too large. Maximum size is 2MB.".to_string(),
            ));
        }

        let folder = hex::encode(rand::thread_rng().gen::<[u8; 3]>());
        let file_name = format!("{}.{}", Uuid::new_v4(), kind.extension());

        let dir = self.root.join(&folder);
        tokio::fs::create_dir_all(&dir).await?;
        tokio::fs::write(dir.join(&file_name), data).await?;

        Ok(format!("{}/{}", folder, file_name))
    }

    /// Best-effort removal of the directory holding a previously stored
    /// image. Failures are logged and swallowed: the caller has already
    /// switched to the replacement image and must not be rolled back.
    pub async fn remove(&self, rel_path: &str) {
        let Some((folder, _)) = rel_path.split_once('/') else {
            return;
        };
        // Only ever delete a direct child of the storage root
        if folder.is_empty() || folder.contains(['/', '\\', '.']) {
            return;
        }

        let dir = self.root.join(folder);
        if let Err(e) = tokio::fs::remove_dir_all(&dir).await {
            tracing::warn!("Failed to remove old image directory {:?}: {}", dir, e);
        }
    }
}
