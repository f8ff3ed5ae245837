// SPDX-License-Identifier: GPL-3.0-only

//! Animated test pattern

use crate::backends::camera::CameraPosition;
use crate::constants::virtual_camera::PATTERN_SPEED;
use image::{Rgba, RgbaImage};
use std::time::Duration;

const BACK_BARS: [[u8; 3]; 8] = [
    [235, 235, 235],
    [235, 235, 16],
    [16, 235, 235],
    [16, 235, 16],
    [235, 16, 235],
    [235, 16, 16],
    [16, 16, 235],
    [40, 40, 40],
];

const FRONT_BARS: [[u8; 3]; 4] = [[214, 170, 140], [190, 140, 110], [120, 90, 70], [60, 50, 45]];

/// Lens settings a frame is rendered with
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatternParams {
    pub zoom: f64,
    pub position: CameraPosition,
    pub torch: bool,
}

/// Render one frame of the drifting color-bar pattern
///
/// Digital zoom crops around the center; the torch brightens the image.
pub fn render(width: u32, height: u32, elapsed: Duration, params: PatternParams) -> RgbaImage {
    let zoom = params.zoom.max(1.0);
    let w = f64::from(width);
    let h = f64::from(height);
    let drift = elapsed.as_secs_f64() * PATTERN_SPEED;
    let boost = if params.torch { 40 } else { 0 };

    RgbaImage::from_fn(width, height, |x, y| {
        let u = w / 2.0 + (f64::from(x) + 0.5 - w / 2.0) / zoom;
        let v = h / 2.0 + (f64::from(y) + 0.5 - h / 2.0) / zoom;
        let [r, g, b] = match params.position {
            CameraPosition::Back => bar(&BACK_BARS, u + drift, w),
            CameraPosition::Front => bar(&FRONT_BARS, w - u + drift, w),
        };
        // Darken towards the bottom so vertical zoom is visible too
        let shade = 1.0 - 0.5 * (v / h).clamp(0.0, 1.0);
        let channel = |c: u8| ((f64::from(c) * shade) as u8).saturating_add(boost);
        Rgba([channel(r), channel(g), channel(b), 255])
    })
}

fn bar<const N: usize>(palette: &[[u8; 3]; N], x: f64, width: f64) -> [u8; 3] {
    let bar_width = (width / N as f64).max(1.0);
    let index = (x / bar_width).floor().rem_euclid(N as f64) as usize;
    palette[index.min(N - 1)]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(zoom: f64) -> PatternParams {
        PatternParams {
            zoom,
            position: CameraPosition::Back,
            torch: false,
        }
    }

    #[test]
    fn frame_has_requested_size() {
        let frame = render(64, 48, Duration::ZERO, params(1.0));
        assert_eq!(frame.dimensions(), (64, 48));
    }

    #[test]
    fn zoom_changes_the_frame() {
        let wide = render(64, 48, Duration::ZERO, params(1.0));
        let tight = render(64, 48, Duration::ZERO, params(4.0));
        assert_ne!(wide, tight);
    }

    #[test]
    fn pattern_drifts_over_time() {
        let first = render(64, 48, Duration::ZERO, params(1.0));
        let later = render(64, 48, Duration::from_millis(500), params(1.0));
        assert_ne!(first, later);
    }
}
