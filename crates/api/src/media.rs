//! Local storage for uploaded contact pictures.

use std::path::Path;

use agenda_core::picture::upload_path;

use crate::error::{AppError, AppResult};

/// Write `bytes` under `media_root` and return the path relative to it.
///
/// The file lands at `pictures/{YYYY}/{MM}/{uuid}.{extension}`; parent
/// directories are created as needed.
pub async fn store_picture(media_root: &Path, bytes: &[u8], extension: &str) -> AppResult<String> {
    let relative = upload_path(chrono::Utc::now(), extension);
    let file_path = media_root.join(&relative);

    if let Some(dir) = file_path.parent() {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?;
    }
    tokio::fs::write(&file_path, bytes)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;

    tracing::debug!(path = %relative, size = bytes.len(), "Stored picture");
    Ok(relative)
}

/// Remove a picture stored for a write that did not complete.
///
/// Failures are logged, not returned; the caller is already on an error path.
pub async fn discard_picture(media_root: &Path, relative: Option<&str>) {
    let Some(relative) = relative else {
        return;
    };
    if let Err(e) = tokio::fs::remove_file(media_root.join(relative)).await {
        tracing::warn!(path = %relative, error = %e, "Failed to discard picture");
    }
}
