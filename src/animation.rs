// SPDX-License-Identifier: GPL-3.0-only

//! Animation primitives shared by the capture button and the effect overlays
//!
//! Per-frame work is driven by display-synchronized frame events. Anything that
//! wants those events holds a [`FrameSubscription`]; dropping the subscription
//! unsubscribes it. The [`FrameRegistry`] counts live subscriptions so a leaked
//! per-frame callback is observable.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use tracing::debug;

/// Easing curves used by overlay and button animations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ease {
    Linear,
    InOutQuad,
}

impl Ease {
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(2) / 2.0)
                }
            }
        }
    }
}

/// Interpolate from `from` to `to` at progress `t` with the given easing
pub fn lerp(from: f64, to: f64, t: f64, ease: Ease) -> f64 {
    from + (to - from) * ease.apply(t)
}

/// Value that ping-pongs between two bounds, one half-cycle per `half_period`
///
/// The first half-cycle runs `low → high`, the second `high → low`.
pub fn ping_pong(low: f64, high: f64, elapsed: Duration, half_period: Duration, ease: Ease) -> f64 {
    let half = half_period.as_secs_f64();
    if half <= 0.0 {
        return low;
    }
    let phase = elapsed.as_secs_f64().rem_euclid(2.0 * half);
    if phase < half {
        lerp(low, high, phase / half, ease)
    } else {
        lerp(high, low, (phase - half) / half, ease)
    }
}

#[derive(Debug, Default)]
struct RegistryInner {
    active: AtomicUsize,
    next_id: AtomicU64,
}

/// Registry of live per-frame subscriptions
#[derive(Debug, Clone, Default)]
pub struct FrameRegistry {
    inner: Arc<RegistryInner>,
}

impl FrameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to frame events; the subscription ends when the handle is dropped
    pub fn subscribe(&self, owner: &'static str) -> FrameSubscription {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let active = self.inner.active.fetch_add(1, Ordering::AcqRel) + 1;
        debug!(id, owner, active, "Frame subscription started");
        FrameSubscription {
            id,
            owner,
            registry: Arc::clone(&self.inner),
            last_frame: None,
        }
    }

    /// Number of subscriptions currently alive
    pub fn active(&self) -> usize {
        self.inner.active.load(Ordering::Acquire)
    }
}

/// Handle for a display-synchronized frame callback
#[derive(Debug)]
pub struct FrameSubscription {
    id: u64,
    owner: &'static str,
    registry: Arc<RegistryInner>,
    last_frame: Option<Instant>,
}

impl FrameSubscription {
    /// Time elapsed since the previous frame event, zero for the first one
    pub fn delta(&mut self, now: Instant) -> Duration {
        let delta = self
            .last_frame
            .map(|last| now.saturating_duration_since(last))
            .unwrap_or(Duration::ZERO);
        self.last_frame = Some(now);
        delta
    }
}

impl Drop for FrameSubscription {
    fn drop(&mut self) {
        let remaining = self.registry.active.fetch_sub(1, Ordering::AcqRel) - 1;
        debug!(id = self.id, owner = self.owner, remaining, "Frame subscription cancelled");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ease_endpoints_are_stable() {
        for ease in [Ease::Linear, Ease::InOutQuad] {
            assert_eq!(ease.apply(0.0), 0.0);
            assert_eq!(ease.apply(1.0), 1.0);
        }
        assert_eq!(Ease::InOutQuad.apply(0.5), 0.5);
    }

    #[test]
    fn ping_pong_reaches_both_bounds() {
        let half = Duration::from_secs(1);
        let at = |ms| ping_pong(0.9, 1.2, Duration::from_millis(ms), half, Ease::InOutQuad);
        assert!((at(0) - 0.9).abs() < 1e-9);
        assert!((at(1000) - 1.2).abs() < 1e-9);
        assert!((at(2000) - 0.9).abs() < 1e-9);
        assert!(at(500) > 0.9 && at(500) < 1.2);
    }

    #[test]
    fn dropping_subscription_unsubscribes() {
        let registry = FrameRegistry::new();
        let first = registry.subscribe("test");
        let second = registry.subscribe("test");
        assert_eq!(registry.active(), 2);
        drop(first);
        assert_eq!(registry.active(), 1);
        drop(second);
        assert_eq!(registry.active(), 0);
    }

    #[test]
    fn first_delta_is_zero() {
        let registry = FrameRegistry::new();
        let mut sub = registry.subscribe("test");
        let start = Instant::now();
        assert_eq!(sub.delta(start), Duration::ZERO);
        assert_eq!(
            sub.delta(start + Duration::from_millis(16)),
            Duration::from_millis(16)
        );
    }
}
