// SPDX-License-Identifier: GPL-3.0-only

//! Static image overlay
//!
//! The image is decoded off the UI thread. Until it arrives, and forever if
//! it fails, the overlay renders nothing.

use crate::constants::overlays::VINTAGE_ASSET;
use crate::errors::{AppError, AppResult};
use crate::render::{DrawCommand, cover_rect};
use image::RgbaImage;
use kurbo::Size;
use rust_embed::RustEmbed;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(RustEmbed)]
#[folder = "resources/overlays/"]
struct OverlayAssets;

/// Where the overlay image comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Image compiled into the binary
    Bundled(&'static str),
    File(PathBuf),
}

impl ImageSource {
    pub fn from_override(path: Option<PathBuf>) -> Self {
        path.map(ImageSource::File)
            .unwrap_or(ImageSource::Bundled(VINTAGE_ASSET))
    }
}

/// Decode the image synchronously
pub fn decode(source: &ImageSource) -> AppResult<RgbaImage> {
    let bytes = match source {
        ImageSource::Bundled(name) => OverlayAssets::get(name)
            .map(|file| file.data.into_owned())
            .ok_or_else(|| AppError::OverlayResourceLoadFailed(format!("missing asset {}", name)))?,
        ImageSource::File(path) => std::fs::read(path).map_err(|err| {
            AppError::OverlayResourceLoadFailed(format!("{}: {}", path.display(), err))
        })?,
    };
    Ok(image::load_from_memory(&bytes)?.to_rgba8())
}

/// Decode on the blocking pool
pub async fn load(source: ImageSource) -> AppResult<Arc<RgbaImage>> {
    tokio::task::spawn_blocking(move || decode(&source).map(Arc::new))
        .await
        .map_err(|err| AppError::OverlayResourceLoadFailed(err.to_string()))?
}

#[derive(Debug, Clone)]
pub enum ImageState {
    Loading,
    Ready(Arc<RgbaImage>),
    Failed,
}

#[derive(Debug)]
pub struct VintageOverlay {
    state: ImageState,
    viewport: Size,
}

impl VintageOverlay {
    pub fn new(viewport: Size) -> Self {
        Self {
            state: ImageState::Loading,
            viewport,
        }
    }

    pub fn state(&self) -> &ImageState {
        &self.state
    }

    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    /// Apply the decode result; failures are contained here
    pub fn image_loaded(&mut self, result: AppResult<Arc<RgbaImage>>) {
        self.state = match result {
            Ok(image) => {
                info!(width = image.width(), height = image.height(), "Overlay image loaded");
                ImageState::Ready(image)
            }
            Err(err) => {
                warn!(error = %err, "Overlay image unavailable, rendering nothing");
                ImageState::Failed
            }
        };
    }

    pub fn render(&self) -> Vec<DrawCommand> {
        match &self.state {
            ImageState::Ready(image) => {
                let size = Size::new(f64::from(image.width()), f64::from(image.height()));
                vec![DrawCommand::Image {
                    image: Arc::clone(image),
                    dest: cover_rect(size, self.viewport),
                }]
            }
            ImageState::Loading | ImageState::Failed => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_asset_decodes() {
        let image = decode(&ImageSource::Bundled(VINTAGE_ASSET)).unwrap();
        assert!(image.width() > 0 && image.height() > 0);
    }

    #[test]
    fn renders_nothing_until_loaded_or_after_failure() {
        let mut overlay = VintageOverlay::new(Size::new(320.0, 240.0));
        assert!(overlay.render().is_empty());

        overlay.image_loaded(Err(AppError::OverlayResourceLoadFailed("gone".into())));
        assert!(matches!(overlay.state(), ImageState::Failed));
        assert!(overlay.render().is_empty());
    }

    #[test]
    fn ready_image_covers_viewport() {
        let mut overlay = VintageOverlay::new(Size::new(320.0, 240.0));
        overlay.image_loaded(Ok(Arc::new(RgbaImage::new(160, 120))));
        let commands = overlay.render();
        let DrawCommand::Image { dest, .. } = &commands[0] else {
            panic!("expected image command");
        };
        assert_eq!(dest.width(), 320.0);
        assert_eq!(dest.height(), 240.0);
    }

    #[tokio::test]
    async fn missing_file_fails_to_load() {
        let result = load(ImageSource::File(PathBuf::from("/nonexistent/overlay.png"))).await;
        assert!(matches!(result, Err(AppError::OverlayResourceLoadFailed(_))));
    }
}
