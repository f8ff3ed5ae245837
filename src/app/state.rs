// SPDX-License-Identifier: GPL-3.0-only

//! Session messages and the presentation snapshot

use crate::backends::camera::{
    CameraPosition, DeviceError, MediaHandle, MediaKind, PhotoResult, VideoResult,
};
use crate::capture::{CaptureMode, ClockTicket, SessionState, Ticket};
use crate::effects::EffectId;
use crate::errors::{AppError, AppResult};
use crate::flash::FlashMode;
use crate::gesture::GestureEvent;
use crate::storage::SavedRef;
use image::RgbaImage;
use kurbo::{Point, Size};
use std::sync::Arc;
use std::time::Instant;

/// Messages handled by [`SessionController::update`](super::SessionController::update)
#[derive(Debug, Clone)]
pub enum Message {
    // ===== Gestures =====
    /// Pinch or drag update/end
    Gesture(GestureEvent),

    // ===== Capture button =====
    CaptureButtonPressed,
    CaptureButtonReleased,
    /// Device resolved a photo capture
    PhotoCaptured(Ticket, Result<PhotoResult, DeviceError>),
    /// Device answered the recording start
    RecordingStartResolved(Ticket, Result<(), DeviceError>),
    /// Recording completed with a file
    RecordingFinished(Ticket, VideoResult),
    /// Recording failed while running
    RecordingFailed(Ticket, DeviceError),
    /// Device answered the stop request
    StopRecordingResolved(Ticket, Result<(), DeviceError>),
    /// One second of recording elapsed
    RecordingTick(ClockTicket),

    // ===== Persistence =====
    /// Storage permission request answered for pending media
    StoragePermissionResolved {
        granted: bool,
        handle: MediaHandle,
        kind: MediaKind,
    },
    /// Gallery save finished
    MediaSaved(MediaKind, AppResult<SavedRef>),

    // ===== Controls =====
    SetCaptureMode(CaptureMode),
    ToggleCaptureMode,
    /// Cycle flash Off -> On -> Auto
    ToggleFlash,
    /// Switch between back and front lens
    ToggleCamera,

    // ===== Effects =====
    SelectEffect(EffectId),
    NextEffect,
    PreviousEffect,
    ToggleFiltersPanel,
    /// Display-synchronized frame event
    AnimationFrame(Instant),
    ViewportResized(Size),
    PointerDown(Point),
    PointerMoved(Point),
    PointerUp,
    /// Overlay image decoded for the given mount
    OverlayImageLoaded(u64, AppResult<Arc<RgbaImage>>),

    // ===== System =====
    /// Permission or device availability may have changed
    PermissionsChanged,
    OpenGallery,
    GalleryOpened(Result<(), String>),
    /// Media picked from the gallery becomes the last result
    SelectFromGallery(MediaHandle),
    /// View is going away; cancel everything in flight
    Teardown,
    Noop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// User-visible message, drained by the presentation layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn success(title: &str, message: &str) -> Self {
        Self {
            level: NoticeLevel::Success,
            title: title.to_string(),
            message: message.to_string(),
        }
    }

    pub fn info(title: &str, message: &str) -> Self {
        Self {
            level: NoticeLevel::Info,
            title: title.to_string(),
            message: message.to_string(),
        }
    }
}

impl From<&AppError> for Notice {
    fn from(err: &AppError) -> Self {
        Self {
            level: NoticeLevel::Error,
            title: err.title().to_string(),
            message: err.to_string(),
        }
    }
}

/// Read-only view of the session for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub zoom: f64,
    /// `2.5x`, or the drag hint at minimum zoom
    pub zoom_label: String,
    pub session_state: SessionState,
    pub capture_mode: CaptureMode,
    pub recording_seconds: u32,
    /// `MM:SS`
    pub recording_time: String,
    pub recording_indicator_opacity: f32,
    pub active_effect: EffectId,
    /// Shown when an effect other than Original is active
    pub active_effect_label: Option<String>,
    pub last_result: Option<MediaHandle>,
    pub flash_mode: FlashMode,
    pub camera_position: CameraPosition,
    pub button_scale: f32,
    pub capture_enabled: bool,
    pub filters_panel_visible: bool,
}
