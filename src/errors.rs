// SPDX-License-Identifier: GPL-3.0-only

//! Error types for the viewfinder

use std::fmt;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Permissions the session depends on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    /// Camera and microphone access (required for any capture)
    CameraAndMicrophone,
    /// Write access to the media gallery
    Storage,
}

/// Main application error type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// A required permission was not granted
    PermissionDenied(Permission),
    /// No camera or microphone found
    DeviceUnavailable(String),
    /// Photo capture was rejected or failed
    CaptureFailed(String),
    /// The device refused to start recording
    RecordingStartFailed(String),
    /// Failure during an active recording
    RecordingRuntimeError(String),
    /// Saving to the gallery failed
    PersistenceFailed(String),
    /// An overlay resource (e.g. image) could not be loaded
    OverlayResourceLoadFailed(String),
    /// Configuration errors
    Config(String),
    /// Storage/filesystem errors
    Storage(String),
}

impl AppError {
    /// Short title used when surfacing the error to the user
    pub fn title(&self) -> &'static str {
        match self {
            AppError::PermissionDenied(_) => "Permission Required",
            AppError::DeviceUnavailable(_) => "Camera Unavailable",
            AppError::CaptureFailed(_) => "Error",
            AppError::RecordingStartFailed(_) => "Error",
            AppError::RecordingRuntimeError(_) => "Recording Error",
            AppError::PersistenceFailed(_) => "Save Error",
            AppError::OverlayResourceLoadFailed(_) => "Overlay Error",
            AppError::Config(_) => "Configuration Error",
            AppError::Storage(_) => "Storage Error",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Permission::CameraAndMicrophone => write!(f, "camera and microphone"),
            Permission::Storage => write!(f, "storage"),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::PermissionDenied(p) => write!(f, "{} permission is required", p),
            AppError::DeviceUnavailable(msg) => write!(f, "Camera not available: {}", msg),
            AppError::CaptureFailed(msg) => write!(f, "Failed to take photo: {}", msg),
            AppError::RecordingStartFailed(msg) => write!(f, "Failed to start recording: {}", msg),
            AppError::RecordingRuntimeError(msg) => write!(f, "Recording failed: {}", msg),
            AppError::PersistenceFailed(msg) => write!(f, "Failed to save to gallery: {}", msg),
            AppError::OverlayResourceLoadFailed(msg) => {
                write!(f, "Failed to load overlay resource: {}", msg)
            }
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
            AppError::Storage(msg) => write!(f, "Storage error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<image::ImageError> for AppError {
    fn from(err: image::ImageError) -> Self {
        AppError::OverlayResourceLoadFailed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permission_message_names_the_permission() {
        let err = AppError::PermissionDenied(Permission::Storage);
        assert_eq!(err.to_string(), "storage permission is required");
        assert_eq!(err.title(), "Permission Required");
    }
}
