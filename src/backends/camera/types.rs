// SPDX-License-Identifier: GPL-3.0-only

//! Shared types for the camera device boundary

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Result type for device operations
pub type DeviceResult<T> = Result<T, DeviceError>;

/// Errors reported by a camera device
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceError {
    /// No camera or microphone available
    NotAvailable(String),
    /// Device busy with another operation
    Busy,
    /// Still capture failed
    CaptureFailed(String),
    /// Recording could not be started or failed while running
    RecordingFailed(String),
    /// Stop requested without an active recording
    NoRecordingInProgress,
    /// General I/O error
    IoError(String),
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceError::NotAvailable(msg) => write!(f, "Device not available: {}", msg),
            DeviceError::Busy => write!(f, "Device is busy"),
            DeviceError::CaptureFailed(msg) => write!(f, "Capture failed: {}", msg),
            DeviceError::RecordingFailed(msg) => write!(f, "Recording failed: {}", msg),
            DeviceError::NoRecordingInProgress => write!(f, "No recording in progress"),
            DeviceError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for DeviceError {}

impl From<std::io::Error> for DeviceError {
    fn from(err: std::io::Error) -> Self {
        DeviceError::IoError(err.to_string())
    }
}

/// Which lens is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CameraPosition {
    #[default]
    Back,
    Front,
}

impl CameraPosition {
    pub fn toggle(self) -> Self {
        match self {
            CameraPosition::Back => CameraPosition::Front,
            CameraPosition::Front => CameraPosition::Back,
        }
    }
}

/// Kind of captured media
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Photo,
    Video,
}

impl MediaKind {
    /// Filename prefix used when saving
    pub fn prefix(self) -> &'static str {
        match self {
            MediaKind::Photo => "IMG",
            MediaKind::Video => "VID",
        }
    }
}

/// Opaque handle to captured media (a `file://` URI)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MediaHandle(String);

impl MediaHandle {
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    pub fn from_path(path: &Path) -> Self {
        Self(format!("file://{}", path.display()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Local filesystem path, if this handle refers to one
    pub fn to_path(&self) -> Option<PathBuf> {
        self.0.strip_prefix("file://").map(PathBuf::from)
    }
}

impl fmt::Display for MediaHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Still image produced by the device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoResult {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
}

impl PhotoResult {
    pub fn handle(&self) -> MediaHandle {
        MediaHandle::from_path(&self.path)
    }
}

/// Finished recording produced by the device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoResult {
    pub path: PathBuf,
    pub duration: Duration,
}

impl VideoResult {
    pub fn handle(&self) -> MediaHandle {
        MediaHandle::from_path(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_round_trips_paths() {
        let handle = MediaHandle::from_path(Path::new("/tmp/IMG_1.png"));
        assert_eq!(handle.as_str(), "file:///tmp/IMG_1.png");
        assert_eq!(handle.to_path(), Some(PathBuf::from("/tmp/IMG_1.png")));
        assert_eq!(MediaHandle::new("content://media/1").to_path(), None);
    }
}
