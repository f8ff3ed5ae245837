// SPDX-License-Identifier: GPL-3.0-only

//! Capture button and recording indicator animation values
//!
//! Both are evaluated from a timestamp rather than stored frame by frame, so
//! the presentation layer can sample them at whatever rate it draws.

use crate::animation::{Ease, lerp, ping_pong};
use crate::constants::{feedback, timing};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq)]
struct Pulse {
    started_at: Instant,
    from: f32,
}

/// Capture button scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ButtonFeedback {
    target: f32,
    pulse: Option<Pulse>,
}

impl Default for ButtonFeedback {
    fn default() -> Self {
        Self {
            target: feedback::REST_SCALE,
            pulse: None,
        }
    }
}

impl ButtonFeedback {
    pub fn press(&mut self) {
        self.target = feedback::PRESSED_SCALE;
        self.pulse = None;
    }

    pub fn release(&mut self) {
        self.target = feedback::REST_SCALE;
    }

    /// Shrink briefly, then settle at rest
    pub fn pulse(&mut self, now: Instant) {
        let from = self.scale_at(now);
        self.pulse = Some(Pulse {
            started_at: now,
            from,
        });
        self.target = feedback::REST_SCALE;
    }

    pub fn scale_at(&self, now: Instant) -> f32 {
        let Some(pulse) = self.pulse else {
            return self.target;
        };
        let elapsed = now.saturating_duration_since(pulse.started_at);
        let half = timing::SUCCESS_PULSE_HALF;
        if elapsed < half {
            progress_lerp(pulse.from, feedback::PULSE_SCALE, elapsed, half)
        } else if elapsed < half * 2 {
            progress_lerp(feedback::PULSE_SCALE, feedback::REST_SCALE, elapsed - half, half)
        } else {
            self.target
        }
    }

    pub fn is_pulsing(&self, now: Instant) -> bool {
        self.pulse.is_some_and(|pulse| {
            now.saturating_duration_since(pulse.started_at) < timing::SUCCESS_PULSE_HALF * 2
        })
    }
}

fn progress_lerp(from: f32, to: f32, elapsed: Duration, span: Duration) -> f32 {
    let t = elapsed.as_secs_f64() / span.as_secs_f64();
    lerp(f64::from(from), f64::from(to), t, Ease::Linear) as f32
}

/// Opacity of the blinking recording dot; zero when not recording
pub fn recording_indicator_opacity(recording_since: Option<Instant>, now: Instant) -> f32 {
    match recording_since {
        Some(start) => ping_pong(
            f64::from(feedback::RECORDING_OPACITY_HIGH),
            f64::from(feedback::RECORDING_OPACITY_LOW),
            now.saturating_duration_since(start),
            timing::RECORDING_BLINK_HALF,
            Ease::Linear,
        ) as f32,
        None => 0.0,
    }
}
