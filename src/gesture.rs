// SPDX-License-Identifier: GPL-3.0-only

//! Gesture fusion for zoom
//!
//! Two gesture streams can be active at once: a pinch reporting the scale
//! factor since it began, and a vertical drag reporting the translation since
//! it began. Each update produces a zoom candidate clamped to
//! `[MIN_ZOOM, max]`, and the latest candidate from either stream wins.
//!
//! When either gesture ends, the current zoom is frozen into `base`. The next
//! pinch multiplies that anchor, so switching from drag to pinch never jumps.

use crate::constants::zoom::{FALLBACK_MAX_ZOOM, FULL_ZOOM_DRAG_DISTANCE, MIN_ZOOM};
use tracing::debug;

/// Zoom scalar and its gesture anchor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomState {
    /// Zoom currently applied to the device
    pub current: f64,
    /// Zoom frozen at the end of the previous gesture
    pub base: f64,
    pub min: f64,
    pub max: f64,
}

impl ZoomState {
    fn new(max: f64) -> Self {
        Self {
            current: MIN_ZOOM,
            base: MIN_ZOOM,
            min: MIN_ZOOM,
            max,
        }
    }

    fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }
}

/// Raw gesture input
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEvent {
    /// Scale factor relative to the start of the pinch
    PinchUpdate(f64),
    PinchEnd,
    /// Vertical translation since the start of the drag (negative is upward)
    DragUpdate(f64),
    DragEnd,
}

/// Converts pinch and drag streams into a single bounded zoom value
#[derive(Debug, Clone)]
pub struct GestureFusionEngine {
    zoom: ZoomState,
    full_zoom_drag: f64,
}

impl GestureFusionEngine {
    pub fn new(max_zoom: f64) -> Self {
        Self {
            zoom: ZoomState::new(sanitize_max_zoom(max_zoom)),
            full_zoom_drag: FULL_ZOOM_DRAG_DISTANCE,
        }
    }

    /// Override the drag distance that maps to maximum zoom
    pub fn with_full_zoom_drag(mut self, distance: f64) -> Self {
        if distance.is_finite() && distance > 0.0 {
            self.full_zoom_drag = distance;
        }
        self
    }

    pub fn zoom(&self) -> ZoomState {
        self.zoom
    }

    pub fn current(&self) -> f64 {
        self.zoom.current
    }

    /// Apply one gesture event, returning the zoom to push to the device
    pub fn handle(&mut self, event: GestureEvent) -> f64 {
        match event {
            GestureEvent::PinchUpdate(scale) => self.pinch_update(scale),
            GestureEvent::DragUpdate(translation_y) => self.drag_update(translation_y),
            GestureEvent::PinchEnd | GestureEvent::DragEnd => self.end_gesture(),
        }
    }

    /// `candidate = clamp(base * scale)`
    pub fn pinch_update(&mut self, scale: f64) -> f64 {
        if !scale.is_finite() || scale <= 0.0 {
            debug!(scale, "Ignoring invalid pinch scale");
            return self.zoom.current;
        }
        self.zoom.current = self.zoom.clamp(self.zoom.base * scale);
        self.zoom.current
    }

    /// Upward drag maps linearly onto `[min, max]`
    pub fn drag_update(&mut self, translation_y: f64) -> f64 {
        if !translation_y.is_finite() {
            debug!(translation_y, "Ignoring invalid drag translation");
            return self.zoom.current;
        }
        let drag_distance = -translation_y;
        let ratio = (drag_distance / self.full_zoom_drag).clamp(0.0, 1.0);
        let candidate = self.zoom.min + (self.zoom.max - self.zoom.min) * ratio;
        self.zoom.current = self.zoom.clamp(candidate);
        self.zoom.current
    }

    /// Freeze the current zoom as the anchor for the next gesture
    pub fn end_gesture(&mut self) -> f64 {
        self.zoom.base = self.zoom.current;
        debug!(base = self.zoom.base, "Zoom anchored");
        self.zoom.current
    }

    /// Adopt a new device zoom range, keeping the current values in bounds
    pub fn set_max_zoom(&mut self, max_zoom: f64) {
        self.zoom.max = sanitize_max_zoom(max_zoom);
        self.zoom.current = self.zoom.clamp(self.zoom.current);
        self.zoom.base = self.zoom.clamp(self.zoom.base);
    }

    /// Return to the minimum zoom (e.g. after switching lenses)
    pub fn reset(&mut self) -> f64 {
        self.zoom.current = self.zoom.min;
        self.zoom.base = self.zoom.min;
        self.zoom.current
    }
}

fn sanitize_max_zoom(max_zoom: f64) -> f64 {
    if max_zoom.is_finite() && max_zoom >= MIN_ZOOM {
        max_zoom
    } else {
        FALLBACK_MAX_ZOOM
    }
}

/// Label for the on-screen zoom indicator
pub fn zoom_label(zoom: f64) -> Option<String> {
    (zoom > MIN_ZOOM).then(|| format!("{:.1}x", zoom))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pinch_then_drag_scenario() {
        let mut engine = GestureFusionEngine::new(10.0);
        assert_eq!(engine.pinch_update(2.0), 2.0);
        engine.end_gesture();
        assert_eq!(engine.zoom().base, 2.0);
        assert_eq!(engine.drag_update(-100.0), 5.5);
    }

    #[test]
    fn pinch_resumes_from_anchor_after_drag() {
        let mut engine = GestureFusionEngine::new(10.0);
        engine.drag_update(-50.0);
        engine.end_gesture();
        let anchored = engine.current();
        assert_eq!(engine.pinch_update(1.0), anchored);
        assert_eq!(engine.pinch_update(2.0), anchored * 2.0);
    }

    #[test]
    fn drag_at_rest_is_minimum() {
        let mut engine = GestureFusionEngine::new(10.0);
        engine.pinch_update(3.0);
        engine.end_gesture();
        assert_eq!(engine.drag_update(0.0), 1.0);
        // Downward drag never goes below the minimum
        assert_eq!(engine.drag_update(150.0), 1.0);
    }

    #[test]
    fn values_are_clamped() {
        let mut engine = GestureFusionEngine::new(4.0);
        assert_eq!(engine.pinch_update(100.0), 4.0);
        assert_eq!(engine.pinch_update(0.01), 1.0);
        assert_eq!(engine.drag_update(-10_000.0), 4.0);
    }

    #[test]
    fn invalid_input_keeps_current() {
        let mut engine = GestureFusionEngine::new(10.0);
        engine.pinch_update(2.0);
        assert_eq!(engine.pinch_update(f64::NAN), 2.0);
        assert_eq!(engine.pinch_update(-1.0), 2.0);
        assert_eq!(engine.drag_update(f64::INFINITY), 2.0);
    }

    #[test]
    fn shrinking_range_clamps_state() {
        let mut engine = GestureFusionEngine::new(10.0);
        engine.pinch_update(8.0);
        engine.end_gesture();
        engine.set_max_zoom(3.0);
        assert_eq!(engine.zoom().current, 3.0);
        assert_eq!(engine.zoom().base, 3.0);
    }

    #[test]
    fn unusable_max_zoom_falls_back() {
        let engine = GestureFusionEngine::new(f64::NAN);
        assert_eq!(engine.zoom().max, FALLBACK_MAX_ZOOM);
        let engine = GestureFusionEngine::new(0.5);
        assert_eq!(engine.zoom().max, FALLBACK_MAX_ZOOM);
    }

    #[test]
    fn zoom_label_hidden_at_minimum() {
        assert_eq!(zoom_label(1.0), None);
        assert_eq!(zoom_label(2.345).as_deref(), Some("2.3x"));
    }
}
