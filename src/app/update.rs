// SPDX-License-Identifier: GPL-3.0-only

//! Message update handling
//!
//! The main `update()` function acts as a dispatcher, while the handlers live
//! in the `handlers` submodules organized by concern.
//!
//! # Handler Modules
//!
//! - `handlers::gesture`: pinch/drag zoom
//! - `handlers::capture`: capture button, device completions, recording clock, saving
//! - `handlers::effects`: effect selection, frame events, drawing input
//! - `handlers::system`: flash, lens, mode, permissions, gallery, teardown

use crate::app::SessionController;
use crate::app::state::Message;
use crate::app::task::Task;
use tracing::debug;

impl SessionController {
    /// Main message handler - routes messages to handler methods
    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            // ===== Gestures =====
            Message::Gesture(event) => self.handle_gesture(event),

            // ===== Capture button =====
            Message::CaptureButtonPressed => self.handle_capture_pressed(),
            Message::CaptureButtonReleased => self.handle_capture_released(),
            Message::PhotoCaptured(ticket, result) => self.handle_photo_captured(ticket, result),
            Message::RecordingStartResolved(ticket, result) => {
                self.handle_recording_start_resolved(ticket, result)
            }
            Message::RecordingFinished(ticket, video) => {
                self.handle_recording_finished(ticket, video)
            }
            Message::RecordingFailed(ticket, error) => self.handle_recording_failed(ticket, error),
            Message::StopRecordingResolved(ticket, result) => {
                self.handle_stop_recording_resolved(ticket, result)
            }
            Message::RecordingTick(clock) => self.handle_recording_tick(clock),

            // ===== Persistence =====
            Message::StoragePermissionResolved {
                granted,
                handle,
                kind,
            } => self.handle_storage_permission_resolved(granted, handle, kind),
            Message::MediaSaved(kind, result) => self.handle_media_saved(kind, result),

            // ===== Controls =====
            Message::SetCaptureMode(mode) => self.handle_set_capture_mode(mode),
            Message::ToggleCaptureMode => {
                let mode = self.capture.mode().toggle();
                self.handle_set_capture_mode(mode)
            }
            Message::ToggleFlash => self.handle_toggle_flash(),
            Message::ToggleCamera => self.handle_toggle_camera(),

            // ===== Effects =====
            Message::SelectEffect(id) => self.handle_select_effect(id),
            Message::NextEffect => {
                let id = self.compositor.active_id().next();
                self.handle_select_effect(id)
            }
            Message::PreviousEffect => {
                let id = self.compositor.active_id().previous();
                self.handle_select_effect(id)
            }
            Message::ToggleFiltersPanel => {
                self.filters_panel_visible = !self.filters_panel_visible;
                debug!(visible = self.filters_panel_visible, "Filters panel toggled");
                Task::none()
            }
            Message::AnimationFrame(now) => self.handle_animation_frame(now),
            Message::ViewportResized(size) => self.handle_viewport_resized(size),
            Message::PointerDown(point) => self.handle_pointer_down(point),
            Message::PointerMoved(point) => self.handle_pointer_moved(point),
            Message::PointerUp => self.handle_pointer_up(),
            Message::OverlayImageLoaded(mount, result) => {
                self.handle_overlay_image_loaded(mount, result)
            }

            // ===== System =====
            Message::PermissionsChanged => {
                self.refresh_availability();
                Task::none()
            }
            Message::OpenGallery => self.handle_open_gallery(),
            Message::GalleryOpened(result) => self.handle_gallery_opened(result),
            Message::SelectFromGallery(handle) => self.handle_select_from_gallery(handle),
            Message::Teardown => self.handle_teardown(),
            Message::Noop => Task::none(),
        }
    }
}
