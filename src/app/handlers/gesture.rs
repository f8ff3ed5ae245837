// SPDX-License-Identifier: GPL-3.0-only

//! Zoom gesture handler

use crate::app::SessionController;
use crate::app::state::Message;
use crate::app::task::Task;
use crate::gesture::GestureEvent;
use tracing::debug;

impl SessionController {
    pub(crate) fn handle_gesture(&mut self, event: GestureEvent) -> Task<Message> {
        let before = self.gesture.current();
        let zoom = self.gesture.handle(event);
        if zoom != before {
            debug!(zoom, ?event, "Zoom updated");
            self.device.set_zoom(zoom);
        }
        Task::none()
    }
}
