//! On-disk storage for uploaded image files.
//!
//! Files live under `<media_root>/uploads/` and are referenced from the
//! database by their path relative to the media root. The same directory is
//! mounted at `/media` by the router.

use std::path::{Path, PathBuf};

use imgview_core::storage::{stored_file_path, validate_stored_path, UPLOAD_DIR};

use crate::error::{AppError, AppResult};

/// URL prefix the media root is served under.
pub const MEDIA_URL_PREFIX: &str = "/media";

#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
}

impl MediaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the upload directory if missing. Called once at startup.
    pub async fn ensure_dirs(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(self.root.join(UPLOAD_DIR)).await
    }

    /// Write `bytes` under a fresh name and return the relative path.
    pub async fn save(&self, extension: &str, bytes: &[u8]) -> AppResult<String> {
        let relative = stored_file_path(extension);
        let dest = self.root.join(&relative);
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::InternalError(format!("Failed to create upload dir: {e}")))?;
        }
        tokio::fs::write(&dest, bytes)
            .await
            .map_err(|e| AppError::InternalError(format!("Failed to write upload: {e}")))?;
        Ok(relative)
    }

    /// Delete a stored file. Failures are logged, never returned: the
    /// database row is the source of truth and a stray file is harmless.
    pub async fn remove(&self, relative: &str) {
        if let Err(e) = validate_stored_path(relative) {
            tracing::warn!(path = %relative, error = %e, "Skipping removal of suspicious media path");
            return;
        }
        match tokio::fs::remove_file(self.root.join(relative)).await {
            Ok(()) => tracing::debug!(path = %relative, "Removed media file"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(path = %relative, error = %e, "Failed to remove media file"),
        }
    }

    /// Public URL for a stored file.
    pub fn url_for(relative: &str) -> String {
        format!("{MEDIA_URL_PREFIX}/{relative}")
    }
}
