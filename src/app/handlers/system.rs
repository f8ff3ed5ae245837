// SPDX-License-Identifier: GPL-3.0-only

//! Flash, lens, capture mode, gallery and teardown handlers

use crate::app::{SessionController, usable_max_zoom};
use crate::app::state::Message;
use crate::app::task::Task;
use crate::backends::camera::MediaHandle;
use crate::capture::CaptureMode;
use crate::errors::AppError;
use tracing::{debug, error, info, warn};

impl SessionController {
    pub(crate) fn handle_set_capture_mode(&mut self, mode: CaptureMode) -> Task<Message> {
        self.capture.set_mode(mode);
        if self.config.capture_mode != mode {
            self.config.capture_mode = mode;
            self.save_config();
        }
        Task::none()
    }

    pub(crate) fn handle_toggle_flash(&mut self) -> Task<Message> {
        self.flash = self.flash.next();
        self.device.set_torch(self.flash.torch());
        info!(flash = ?self.flash, "Flash mode changed");
        self.config.flash_mode = self.flash;
        self.save_config();
        Task::none()
    }

    /// Switch lens; zoom restarts at the minimum of the new lens range
    pub(crate) fn handle_toggle_camera(&mut self) -> Task<Message> {
        if !self.capture.is_idle() {
            debug!(state = ?self.capture.state(), "Lens switch ignored while busy");
            return Task::none();
        }
        let position = self.position.toggle();
        match self.device.set_position(position) {
            Ok(()) => {
                self.position = position;
                let max_zoom =
                    usable_max_zoom(self.device.max_zoom(), self.config.fallback_max_zoom);
                self.gesture.set_max_zoom(max_zoom);
                let zoom = self.gesture.reset();
                self.device.set_zoom(zoom);
                info!(?position, max_zoom, "Camera switched");
            }
            Err(err) => {
                warn!(error = %err, "Failed to switch camera");
                self.notify_error(&AppError::DeviceUnavailable(err.to_string()));
            }
        }
        Task::none()
    }

    pub(crate) fn handle_open_gallery(&self) -> Task<Message> {
        let Some(dir) = self.store.location() else {
            warn!("No gallery location to open");
            return Task::none();
        };
        info!(path = %dir.display(), "Opening gallery directory");
        Task::perform(
            async move {
                tokio::task::spawn_blocking(move || {
                    std::fs::create_dir_all(&dir).map_err(|e| e.to_string())?;
                    open::that(&dir).map_err(|e| e.to_string())
                })
                .await
                .map_err(|e| e.to_string())
                .and_then(|result| result)
            },
            Message::GalleryOpened,
        )
    }

    pub(crate) fn handle_gallery_opened(&self, result: Result<(), String>) -> Task<Message> {
        match result {
            Ok(()) => info!("Gallery opened successfully"),
            Err(err) => error!(error = %err, "Failed to open gallery directory"),
        }
        Task::none()
    }

    pub(crate) fn handle_select_from_gallery(&mut self, handle: MediaHandle) -> Task<Message> {
        info!(%handle, "Picked media from gallery");
        self.capture.set_last_result(handle);
        Task::none()
    }

    /// Cancel every timer, frame subscription and recording in flight
    pub(crate) fn handle_teardown(&mut self) -> Task<Message> {
        self.compositor.teardown();
        match self.capture.abandon() {
            Some(_) => {
                info!("Stopping recording on teardown");
                Task::perform(self.device.stop_recording(), |_| Message::Noop)
            }
            None => Task::none(),
        }
    }
}
