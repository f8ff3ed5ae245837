// SPDX-License-Identifier: GPL-3.0-only

//! User configuration persisted as JSON

use crate::capture::CaptureMode;
use crate::constants::{app_info, gallery, overlays, zoom};
use crate::errors::AppResult;
use crate::flash::FlashMode;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{error, info};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Capture mode selected at startup
    pub capture_mode: CaptureMode,
    /// Last used flash mode
    pub flash_mode: FlashMode,
    /// Mirror the front camera preview horizontally
    pub mirror_preview: bool,
    /// Album captured media is saved into
    pub album: String,
    /// Gallery root override (default: the user's pictures directory)
    pub gallery_dir: Option<PathBuf>,
    /// Image shown by the vintage overlay (default: bundled image)
    pub overlay_image: Option<PathBuf>,
    /// Pulsing glow anchor and base radius
    pub glow_center: (f64, f64),
    pub glow_radius: f64,
    /// Falling particle pool size
    pub particle_count: usize,
    /// Used when the device reports no usable zoom range
    pub fallback_max_zoom: f64,
    /// Upward drag distance that maps to maximum zoom
    pub full_zoom_drag_distance: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capture_mode: CaptureMode::Photo,
            flash_mode: FlashMode::Off,
            mirror_preview: true,
            album: gallery::DEFAULT_ALBUM.to_string(),
            gallery_dir: None,
            overlay_image: None,
            glow_center: overlays::GLOW_CENTER,
            glow_radius: overlays::GLOW_RADIUS,
            particle_count: overlays::PARTICLE_COUNT,
            fallback_max_zoom: zoom::FALLBACK_MAX_ZOOM,
            full_zoom_drag_distance: zoom::FULL_ZOOM_DRAG_DISTANCE,
        }
    }
}

impl Config {
    /// Default location: `<config dir>/viewfinder/config.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(app_info::APP_ID).join("config.json"))
    }

    /// Read a config file; a missing file yields defaults
    pub fn load(path: &Path) -> AppResult<Self> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(err.into()),
        }
    }

    /// Like [`Config::load`], but falls back to defaults on any error
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(err) => {
                error!(path = %path.display(), error = %err, "Errors loading config");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        info!(path = %path.display(), "Config saved");
        Ok(())
    }

    /// Directory captured media is saved into
    pub fn gallery_directory(&self) -> PathBuf {
        let root = self.gallery_dir.clone().unwrap_or_else(|| {
            dirs::picture_dir()
                .or_else(|| dirs::home_dir().map(|home| home.join("Pictures")))
                .unwrap_or_else(|| PathBuf::from("."))
        });
        root.join(&self.album)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_fills_defaults() {
        let config: Config = serde_json::from_str(r#"{ "album": "Snaps" }"#).unwrap();
        assert_eq!(config.album, "Snaps");
        assert_eq!(config.particle_count, overlays::PARTICLE_COUNT);
        assert_eq!(config.capture_mode, CaptureMode::Photo);
    }

    #[test]
    fn gallery_directory_uses_override() {
        let config = Config {
            gallery_dir: Some(PathBuf::from("/media/pics")),
            ..Config::default()
        };
        assert_eq!(config.gallery_directory(), PathBuf::from("/media/pics/Camera"));
    }
}
