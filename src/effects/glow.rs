// SPDX-License-Identifier: GPL-3.0-only

//! Pulsing gold circle

use crate::animation::{Ease, FrameSubscription, ping_pong};
use crate::constants::overlays::{
    GLOW_HALF_CYCLE, GLOW_OUTER_BLUR, GLOW_OUTER_OPACITY, GLOW_OUTER_RING_FACTOR, GLOW_SCALE_HIGH,
    GLOW_SCALE_LOW, GLOW_STROKE_WIDTH,
};
use crate::render::{Color, DrawCommand, Paint};
use kurbo::Point;
use std::time::{Duration, Instant};

#[derive(Debug)]
pub struct GlowOverlay {
    center: Point,
    base_radius: f64,
    /// Animation time accumulated from frame events
    elapsed: Duration,
    frames: FrameSubscription,
}

impl GlowOverlay {
    pub fn new(center: Point, base_radius: f64, frames: FrameSubscription) -> Self {
        Self {
            center,
            base_radius,
            elapsed: Duration::ZERO,
            frames,
        }
    }

    pub fn on_frame(&mut self, now: Instant) {
        self.elapsed += self.frames.delta(now);
    }

    pub fn scale(&self) -> f64 {
        ping_pong(
            GLOW_SCALE_LOW,
            GLOW_SCALE_HIGH,
            self.elapsed,
            GLOW_HALF_CYCLE,
            Ease::InOutQuad,
        )
    }

    pub fn radius(&self) -> f64 {
        self.base_radius * self.scale()
    }

    pub fn render(&self) -> Vec<DrawCommand> {
        let radius = self.radius();
        vec![
            DrawCommand::Circle {
                center: self.center,
                radius: radius * GLOW_OUTER_RING_FACTOR,
                paint: Paint::Stroke {
                    color: Color::GOLD.with_opacity(GLOW_OUTER_OPACITY),
                    width: 1.0,
                },
                blur: GLOW_OUTER_BLUR,
            },
            DrawCommand::Circle {
                center: self.center,
                radius,
                paint: Paint::Stroke {
                    color: Color::GOLD,
                    width: GLOW_STROKE_WIDTH,
                },
                blur: 0.0,
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::FrameRegistry;

    #[test]
    fn radius_oscillates_between_bounds() {
        let registry = FrameRegistry::new();
        let mut glow = GlowOverlay::new(Point::new(0.0, 0.0), 100.0, registry.subscribe("glow"));
        let start = Instant::now();
        glow.on_frame(start);
        assert!((glow.radius() - 90.0).abs() < 1e-9);

        glow.on_frame(start + Duration::from_secs(1));
        assert!((glow.radius() - 120.0).abs() < 1e-9);

        let mut t = start + Duration::from_secs(1);
        for _ in 0..120 {
            t += Duration::from_millis(16);
            glow.on_frame(t);
            assert!(glow.radius() >= 90.0 - 1e-9 && glow.radius() <= 120.0 + 1e-9);
        }
    }

    #[test]
    fn outer_ring_is_wider_and_faint() {
        let registry = FrameRegistry::new();
        let glow = GlowOverlay::new(Point::new(0.0, 0.0), 100.0, registry.subscribe("glow"));
        let commands = glow.render();
        let DrawCommand::Circle { radius, paint, .. } = &commands[0] else {
            panic!("expected circle");
        };
        assert!((radius - 162.0).abs() < 1e-9);
        assert!(matches!(paint, Paint::Stroke { color, .. } if color.a < 255));
    }
}
