// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for configuration module

use viewfinder::flash::FlashMode;
use viewfinder::{CaptureMode, Config};

#[test]
fn test_config_default() {
    // Test that default config can be created
    let config = Config::default();

    // Check sensible defaults
    assert_eq!(config.capture_mode, CaptureMode::Photo);
    assert_eq!(config.flash_mode, FlashMode::Off);
    assert!(
        config.mirror_preview,
        "Mirror preview should be enabled by default"
    );
    assert!(config.overlay_image.is_none(), "Bundled overlay image by default");
}

#[test]
fn test_config_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.json");

    let config = Config {
        capture_mode: CaptureMode::Video,
        flash_mode: FlashMode::On,
        album: "Holiday".to_string(),
        particle_count: 12,
        ..Config::default()
    };
    config.save(&path).unwrap();

    let loaded = Config::load(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_missing_config_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let loaded = Config::load(&dir.path().join("absent.json")).unwrap();
    assert_eq!(loaded, Config::default());
}

#[test]
fn test_corrupt_config_falls_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{ not json").unwrap();

    assert!(Config::load(&path).is_err());
    assert_eq!(Config::load_or_default(&path), Config::default());
}

#[test]
fn test_gallery_directory_uses_album() {
    let config = Config {
        gallery_dir: Some("/tmp/gallery".into()),
        album: "Camera".to_string(),
        ..Config::default()
    };
    assert_eq!(
        config.gallery_directory(),
        std::path::PathBuf::from("/tmp/gallery/Camera")
    );
}
