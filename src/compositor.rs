// SPDX-License-Identifier: GPL-3.0-only

//! Overlay compositor
//!
//! Holds zero or one mounted [`EffectOverlay`]. Switching effects drops the
//! previous overlay (and with it every frame subscription it held) before the
//! next one is built, so two effects never animate in the same frame.

use crate::animation::FrameRegistry;
use crate::effects::vintage::ImageSource;
use crate::effects::{EffectId, EffectOverlay, MountContext, OverlaySettings};
use crate::errors::AppResult;
use crate::render::DrawCommand;
use image::RgbaImage;
use kurbo::{Point, Size};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Asynchronous image decode the mounted overlay is waiting on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageLoadRequest {
    /// Mount the result belongs to
    pub mount: u64,
    pub source: ImageSource,
}

#[derive(Debug)]
pub struct OverlayCompositor {
    active: Option<EffectOverlay>,
    mount: u64,
    frames: FrameRegistry,
    settings: OverlaySettings,
    viewport: Size,
    rng: StdRng,
}

impl OverlayCompositor {
    pub fn new(settings: OverlaySettings, viewport: Size) -> Self {
        Self::with_rng(settings, viewport, StdRng::from_entropy())
    }

    /// Deterministic particle placement
    pub fn with_seed(settings: OverlaySettings, viewport: Size, seed: u64) -> Self {
        Self::with_rng(settings, viewport, StdRng::seed_from_u64(seed))
    }

    fn with_rng(settings: OverlaySettings, viewport: Size, rng: StdRng) -> Self {
        Self {
            active: None,
            mount: 0,
            frames: FrameRegistry::new(),
            settings,
            viewport,
            rng,
        }
    }

    pub fn active_id(&self) -> EffectId {
        self.active.as_ref().map_or(EffectId::None, EffectOverlay::id)
    }

    pub fn active(&self) -> Option<&EffectOverlay> {
        self.active.as_ref()
    }

    /// Mount `id`, replacing the current overlay
    ///
    /// Selecting the active effect again keeps its state untouched.
    pub fn select_effect(&mut self, id: EffectId) -> Option<ImageLoadRequest> {
        if id == self.active_id() {
            debug!(effect = ?id, "Effect already active");
            return None;
        }

        let previous = self.active_id();
        self.unmount();

        self.mount += 1;
        self.active = EffectOverlay::mount(
            id,
            MountContext {
                viewport: self.viewport,
                frames: &self.frames,
                settings: &self.settings,
                rng: &mut self.rng,
            },
        );
        info!(from = ?previous, to = ?id, mount = self.mount, "Effect selected");

        self.active
            .as_ref()
            .and_then(|overlay| overlay.pending_image(&self.settings))
            .map(|source| ImageLoadRequest {
                mount: self.mount,
                source,
            })
    }

    fn unmount(&mut self) {
        if let Some(overlay) = self.active.take() {
            debug!(effect = ?overlay.id(), "Unmounting overlay");
            drop(overlay);
        }
    }

    /// Deliver a decoded image; results for an earlier mount are dropped
    pub fn image_loaded(&mut self, mount: u64, result: AppResult<Arc<RgbaImage>>) -> bool {
        if mount != self.mount {
            debug!(mount, current = self.mount, "Ignoring image for unmounted overlay");
            return false;
        }
        match self.active.as_mut() {
            Some(EffectOverlay::Vintage(vintage)) => {
                vintage.image_loaded(result);
                true
            }
            _ => false,
        }
    }

    /// Display-synchronized frame event
    pub fn on_frame(&mut self, now: Instant) {
        if let Some(overlay) = self.active.as_mut() {
            overlay.on_frame(now);
        }
    }

    pub fn wants_frames(&self) -> bool {
        self.active.as_ref().is_some_and(EffectOverlay::wants_frames)
    }

    /// Frame subscriptions currently alive
    pub fn active_frame_callbacks(&self) -> usize {
        self.frames.active()
    }

    pub fn render(&self) -> Vec<DrawCommand> {
        self.active
            .as_ref()
            .map(EffectOverlay::render)
            .unwrap_or_default()
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
        if let Some(overlay) = self.active.as_mut() {
            overlay.set_viewport(viewport);
        }
    }

    pub fn claims_pointer(&self) -> bool {
        self.active.as_ref().is_some_and(EffectOverlay::claims_pointer)
    }

    pub fn pointer_down(&mut self, point: Point) {
        if let Some(overlay) = self.active.as_mut() {
            overlay.pointer_down(point);
        }
    }

    pub fn pointer_move(&mut self, point: Point) {
        if let Some(overlay) = self.active.as_mut() {
            overlay.pointer_move(point);
        }
    }

    pub fn pointer_up(&mut self) {
        if let Some(overlay) = self.active.as_mut() {
            overlay.pointer_up();
        }
    }

    /// Unmount everything (view torn down)
    pub fn teardown(&mut self) {
        self.unmount();
        self.mount += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compositor() -> OverlayCompositor {
        OverlayCompositor::with_seed(OverlaySettings::default(), Size::new(320.0, 240.0), 1)
    }

    #[test]
    fn reselecting_keeps_state() {
        let mut compositor = compositor();
        compositor.select_effect(EffectId::Sepia);
        compositor.pointer_down(Point::new(1.0, 1.0));
        compositor.pointer_up();
        compositor.select_effect(EffectId::Sepia);
        let Some(EffectOverlay::Sepia(sepia)) = compositor.active() else {
            panic!("sepia should stay mounted");
        };
        assert_eq!(sepia.canvas().finished().len(), 1);
    }

    #[test]
    fn switching_discards_previous_state() {
        let mut compositor = compositor();
        compositor.select_effect(EffectId::Sepia);
        compositor.pointer_down(Point::new(1.0, 1.0));
        compositor.select_effect(EffectId::Monochrome);
        compositor.select_effect(EffectId::Sepia);
        let Some(EffectOverlay::Sepia(sepia)) = compositor.active() else {
            panic!("sepia should be mounted");
        };
        assert_eq!(sepia.canvas().strokes().count(), 0);
    }

    #[test]
    fn none_renders_nothing() {
        let mut compositor = compositor();
        compositor.select_effect(EffectId::Monochrome);
        compositor.select_effect(EffectId::None);
        assert!(compositor.active().is_none());
        assert!(compositor.render().is_empty());
    }

    #[test]
    fn stale_image_is_dropped() {
        let mut compositor = compositor();
        let request = compositor.select_effect(EffectId::Vintage).unwrap();
        compositor.select_effect(EffectId::None);
        compositor.select_effect(EffectId::Vintage);
        let image = Arc::new(RgbaImage::new(4, 4));
        assert!(!compositor.image_loaded(request.mount, Ok(image)));
        assert!(compositor.render().is_empty());
    }
}
