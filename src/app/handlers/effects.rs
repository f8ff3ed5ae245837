// SPDX-License-Identifier: GPL-3.0-only

//! Effect selection, frame events and drawing input

use crate::app::SessionController;
use crate::app::state::Message;
use crate::app::task::Task;
use crate::effects::{EffectId, vintage};
use crate::errors::AppResult;
use image::RgbaImage;
use kurbo::{Point, Size};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

impl SessionController {
    pub(crate) fn handle_select_effect(&mut self, id: EffectId) -> Task<Message> {
        match self.compositor.select_effect(id) {
            Some(request) => {
                let mount = request.mount;
                Task::perform(vintage::load(request.source), move |result| {
                    Message::OverlayImageLoaded(mount, result)
                })
            }
            None => Task::none(),
        }
    }

    pub(crate) fn handle_overlay_image_loaded(
        &mut self,
        mount: u64,
        result: AppResult<Arc<RgbaImage>>,
    ) -> Task<Message> {
        // Load failures stay inside the overlay
        self.compositor.image_loaded(mount, result);
        Task::none()
    }

    pub(crate) fn handle_animation_frame(&mut self, now: Instant) -> Task<Message> {
        self.compositor.on_frame(now);
        Task::none()
    }

    pub(crate) fn handle_viewport_resized(&mut self, size: Size) -> Task<Message> {
        debug!(width = size.width, height = size.height, "Viewport resized");
        self.compositor.set_viewport(size);
        Task::none()
    }

    pub(crate) fn handle_pointer_down(&mut self, point: Point) -> Task<Message> {
        if self.compositor.claims_pointer() {
            self.compositor.pointer_down(point);
        }
        Task::none()
    }

    pub(crate) fn handle_pointer_moved(&mut self, point: Point) -> Task<Message> {
        if self.compositor.claims_pointer() {
            self.compositor.pointer_move(point);
        }
        Task::none()
    }

    pub(crate) fn handle_pointer_up(&mut self) -> Task<Message> {
        if self.compositor.claims_pointer() {
            self.compositor.pointer_up();
        }
        Task::none()
    }
}
