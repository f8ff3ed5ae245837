// SPDX-License-Identifier: GPL-3.0-only

//! Gallery persistence for captured photos and videos

use crate::backends::camera::{MediaHandle, MediaKind};
use crate::errors::{AppError, AppResult};
use futures::FutureExt;
use futures::future::BoxFuture;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Reference to media stored in the gallery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedRef(pub PathBuf);

/// Persistence collaborator: writes captured media to durable storage
pub trait MediaStore: Send + Sync {
    fn save_media(
        &self,
        handle: &MediaHandle,
        kind: MediaKind,
    ) -> BoxFuture<'static, AppResult<SavedRef>>;

    /// Location a user can browse, if any
    fn location(&self) -> Option<PathBuf> {
        None
    }
}

/// Copies captured files into an album directory
#[derive(Debug, Clone)]
pub struct GalleryStore {
    album_dir: PathBuf,
}

impl GalleryStore {
    pub fn new(album_dir: PathBuf) -> Self {
        Self { album_dir }
    }
}

impl MediaStore for GalleryStore {
    fn save_media(
        &self,
        handle: &MediaHandle,
        kind: MediaKind,
    ) -> BoxFuture<'static, AppResult<SavedRef>> {
        let source = handle.to_path();
        let album_dir = self.album_dir.clone();
        let uri = handle.to_string();
        async move {
            let source = source.ok_or_else(|| {
                AppError::PersistenceFailed(format!("not a local file: {}", uri))
            })?;
            save_into(&source, &album_dir, kind)
                .await
                .map_err(|err| AppError::PersistenceFailed(err.to_string()))
        }
        .boxed()
    }

    fn location(&self) -> Option<PathBuf> {
        Some(self.album_dir.clone())
    }
}

async fn save_into(source: &Path, album_dir: &Path, kind: MediaKind) -> std::io::Result<SavedRef> {
    tokio::fs::create_dir_all(album_dir).await?;

    let extension = source
        .extension()
        .map(|ext| ext.to_string_lossy().to_string())
        .unwrap_or_else(|| "bin".to_string());
    let filename = gallery_filename(kind, &extension);
    let destination = album_dir.join(&filename);

    debug!(from = %source.display(), to = %destination.display(), "Copying media into gallery");
    tokio::fs::copy(source, &destination).await?;
    info!(path = %destination.display(), ?kind, "Media saved to gallery");

    Ok(SavedRef(destination))
}

/// `IMG_20250101_120000_1a2b3c4d.png`; the suffix keeps same-second captures apart
fn gallery_filename(kind: MediaKind, extension: &str) -> String {
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("{}_{}_{}.{}", kind.prefix(), timestamp, &suffix[..8], extension)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn saves_copy_into_album() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("capture.png");
        std::fs::write(&source, b"png-bytes").unwrap();

        let store = GalleryStore::new(dir.path().join("Camera"));
        let saved = store
            .save_media(&MediaHandle::from_path(&source), MediaKind::Photo)
            .await
            .unwrap();

        assert!(saved.0.starts_with(dir.path().join("Camera")));
        let name = saved.0.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("IMG_"));
        assert!(name.ends_with(".png"));
        assert_eq!(std::fs::read(&saved.0).unwrap(), b"png-bytes");
    }

    #[tokio::test]
    async fn missing_source_is_persistence_failure() {
        let dir = tempfile::tempdir().unwrap();
        let store = GalleryStore::new(dir.path().join("Camera"));
        let handle = MediaHandle::from_path(&dir.path().join("missing.gif"));
        let err = store.save_media(&handle, MediaKind::Video).await.unwrap_err();
        assert!(matches!(err, AppError::PersistenceFailed(_)));
    }
}
