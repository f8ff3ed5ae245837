// SPDX-License-Identifier: GPL-3.0-only

//! Capture session controller
//!
//! Wires gesture output into the device zoom, the capture button into the
//! [`CaptureStateMachine`], and the effect catalog into the
//! [`OverlayCompositor`]. All state lives on one thread; device calls come back
//! as [`Message`]s through the channel returned by [`SessionController::new`].
//!
//! # Module Structure
//!
//! - `state`: messages, notices and the presentation snapshot
//! - `task`: asynchronous work returned by handlers
//! - `update`: the message dispatcher
//! - `handlers`: handler implementations grouped by concern

mod handlers;
mod state;
mod task;
mod update;

pub use state::{Message, Notice, NoticeLevel, Snapshot};
pub use task::Task;

use crate::backends::camera::{CameraDevice, CameraPosition};
use crate::backends::permissions::PermissionGate;
use crate::capture::{CaptureStateMachine, recording_indicator_opacity};
use crate::compositor::OverlayCompositor;
use crate::config::Config;
use crate::constants::{format_recording_time, zoom};
use crate::effects::{EffectId, OverlaySettings};
use crate::errors::{AppError, Permission};
use crate::flash::FlashMode;
use crate::gesture::{GestureFusionEngine, zoom_label};
use crate::render::{self, DrawCommand};
use crate::storage::MediaStore;
use image::RgbaImage;
use kurbo::Size;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{info, warn};

/// External collaborators of a session
#[derive(Clone)]
pub struct Collaborators {
    pub device: Arc<dyn CameraDevice>,
    pub permissions: Arc<dyn PermissionGate>,
    pub store: Arc<dyn MediaStore>,
}

pub struct SessionController {
    device: Arc<dyn CameraDevice>,
    permissions: Arc<dyn PermissionGate>,
    store: Arc<dyn MediaStore>,
    config: Config,
    /// Where setting changes are persisted; `None` keeps them in memory
    config_path: Option<PathBuf>,
    gesture: GestureFusionEngine,
    capture: CaptureStateMachine,
    compositor: OverlayCompositor,
    flash: FlashMode,
    position: CameraPosition,
    filters_panel_visible: bool,
    notices: VecDeque<Notice>,
    sender: UnboundedSender<Message>,
}

impl SessionController {
    /// Build a session; the receiver yields messages produced by async work
    pub fn new(
        collaborators: Collaborators,
        config: Config,
        viewport: Size,
    ) -> (Self, UnboundedReceiver<Message>) {
        let compositor = OverlayCompositor::new(OverlaySettings::from(&config), viewport);
        Self::with_compositor(collaborators, config, compositor)
    }

    /// Build a session around a prepared compositor (e.g. a seeded one)
    pub fn with_compositor(
        collaborators: Collaborators,
        config: Config,
        compositor: OverlayCompositor,
    ) -> (Self, UnboundedReceiver<Message>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let Collaborators {
            device,
            permissions,
            store,
        } = collaborators;

        let max_zoom = usable_max_zoom(device.max_zoom(), config.fallback_max_zoom);
        let gesture =
            GestureFusionEngine::new(max_zoom).with_full_zoom_drag(config.full_zoom_drag_distance);
        let flash = config.flash_mode;
        device.set_torch(flash.torch());

        let mut session = Self {
            device,
            permissions,
            store,
            capture: CaptureStateMachine::new(config.capture_mode),
            config,
            config_path: None,
            gesture,
            compositor,
            flash,
            position: CameraPosition::Back,
            filters_panel_visible: false,
            notices: VecDeque::new(),
            sender,
        };
        session.refresh_availability();
        info!(max_zoom, mode = %session.capture.mode(), "Session created");
        (session, receiver)
    }

    /// Persist capture mode and flash changes to `path`
    pub fn with_config_path(mut self, path: PathBuf) -> Self {
        self.config_path = Some(path);
        self
    }

    /// Handle a message and spawn the work it produces
    pub fn dispatch(&mut self, message: Message) {
        let task = self.update(message);
        task.spawn(&self.sender);
    }

    /// Sender for messages from the presentation layer
    pub fn sender(&self) -> UnboundedSender<Message> {
        self.sender.clone()
    }

    pub fn snapshot(&self) -> Snapshot {
        self.snapshot_at(Instant::now())
    }

    pub fn snapshot_at(&self, now: Instant) -> Snapshot {
        let zoom = self.gesture.current();
        let active_effect = self.compositor.active_id();
        Snapshot {
            zoom,
            zoom_label: zoom_label(zoom).unwrap_or_else(|| zoom::DRAG_HINT.to_string()),
            session_state: self.capture.state(),
            capture_mode: self.capture.mode(),
            recording_seconds: self.capture.recording_seconds(),
            recording_time: format_recording_time(self.capture.recording_seconds()),
            recording_indicator_opacity: recording_indicator_opacity(
                self.capture.recording_since(),
                now,
            ),
            active_effect,
            active_effect_label: (active_effect != EffectId::None)
                .then(|| active_effect.to_string()),
            last_result: self.capture.last_result().cloned(),
            flash_mode: self.flash,
            camera_position: self.position,
            button_scale: self.capture.feedback().scale_at(now),
            capture_enabled: self.capture.is_enabled(),
            filters_panel_visible: self.filters_panel_visible,
        }
    }

    /// Display list of the active overlay
    pub fn overlay(&self) -> Vec<DrawCommand> {
        self.compositor.render()
    }

    /// Composite the active overlay onto a camera frame
    pub fn render_overlay(&self, frame: &mut RgbaImage) {
        render::composite(frame, &self.compositor.render());
    }

    /// Whether frame events should be delivered
    pub fn wants_animation_frames(&self) -> bool {
        self.compositor.wants_frames()
    }

    /// Live per-frame subscriptions held by overlays
    pub fn active_frame_callbacks(&self) -> usize {
        self.compositor.active_frame_callbacks()
    }

    /// Whether pointer input should go to the drawing surface
    pub fn overlay_claims_pointer(&self) -> bool {
        self.compositor.claims_pointer()
    }

    /// Take the notices raised since the last call
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        self.notices.drain(..).collect()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn has_pending_tick(&self) -> bool {
        self.capture.clock().has_pending_tick()
    }

    fn notify(&mut self, notice: Notice) {
        info!(title = %notice.title, message = %notice.message, "Notice");
        self.notices.push_back(notice);
    }

    fn notify_error(&mut self, error: &AppError) {
        warn!(error = %error, "Surfacing error");
        self.notices.push_back(Notice::from(error));
    }

    /// Enable the capture button only with a device and camera permission
    fn refresh_availability(&mut self) {
        let device = self.device.is_available();
        let permitted = self.permissions.has_camera_and_mic();
        let was_enabled = self.capture.is_enabled();
        self.capture.set_enabled(device && permitted);

        if was_enabled && !(device && permitted) {
            let error = if device {
                AppError::PermissionDenied(Permission::CameraAndMicrophone)
            } else {
                AppError::DeviceUnavailable("no camera or microphone found".to_string())
            };
            self.notify_error(&error);
        }
    }

    fn save_config(&self) {
        let Some(path) = &self.config_path else {
            return;
        };
        if let Err(err) = self.config.save(path) {
            warn!(error = %err, "Failed to save config");
        }
    }
}

fn usable_max_zoom(reported: f64, fallback: f64) -> f64 {
    if reported.is_finite() && reported >= zoom::MIN_ZOOM {
        reported
    } else {
        fallback
    }
}
