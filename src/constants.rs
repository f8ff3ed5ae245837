// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

use std::time::Duration;

/// Zoom gesture constants
pub mod zoom {
    /// Lower bound of the zoom scalar
    pub const MIN_ZOOM: f64 = 1.0;

    /// Used when the device reports no usable maximum zoom
    pub const FALLBACK_MAX_ZOOM: f64 = 10.0;

    /// Upward drag distance (in points) that maps to maximum zoom
    pub const FULL_ZOOM_DRAG_DISTANCE: f64 = 200.0;

    /// Hint shown while the zoom is at its minimum
    pub const DRAG_HINT: &str = "↑ Drag up to zoom";
}

/// Capture button and recording timing
pub mod timing {
    use super::Duration;

    /// Recording clock cadence
    pub const RECORDING_TICK: Duration = Duration::from_secs(1);

    /// Each half of the photo success pulse (shrink, then restore)
    pub const SUCCESS_PULSE_HALF: Duration = Duration::from_millis(100);

    /// Recording indicator fade half-cycle
    pub const RECORDING_BLINK_HALF: Duration = Duration::from_millis(500);
}

/// Capture button feedback scales
pub mod feedback {
    /// Resting button scale
    pub const REST_SCALE: f32 = 1.0;

    /// Scale while the button is held
    pub const PRESSED_SCALE: f32 = 1.2;

    /// Smallest scale reached during the photo success pulse
    pub const PULSE_SCALE: f32 = 0.8;

    /// Recording indicator opacity bounds
    pub const RECORDING_OPACITY_LOW: f32 = 0.3;
    pub const RECORDING_OPACITY_HIGH: f32 = 1.0;
}

/// Effect overlay parameters
pub mod overlays {
    use super::Duration;

    /// Pulsing glow anchor and base radius (screen points)
    pub const GLOW_CENTER: (f64, f64) = (190.0, 300.0);
    pub const GLOW_RADIUS: f64 = 150.0;

    /// Glow scale bounds and half-cycle
    pub const GLOW_SCALE_LOW: f64 = 0.9;
    pub const GLOW_SCALE_HIGH: f64 = 1.2;
    pub const GLOW_HALF_CYCLE: Duration = Duration::from_secs(1);

    /// The faint outer ring sits at this multiple of the animated radius
    pub const GLOW_OUTER_RING_FACTOR: f64 = 1.8;
    pub const GLOW_OUTER_OPACITY: f32 = 0.15;
    pub const GLOW_OUTER_BLUR: f64 = 12.0;
    pub const GLOW_STROKE_WIDTH: f64 = 3.0;

    /// Falling particle pool
    pub const PARTICLE_COUNT: usize = 30;
    pub const PARTICLE_RADIUS: (f64, f64) = (1.0, 3.0);
    pub const PARTICLE_SPEED: (f64, f64) = (50.0, 150.0);
    pub const PARTICLE_GLOW_FACTOR: f64 = 3.0;
    pub const PARTICLE_GLOW_OPACITY: f32 = 0.15;
    pub const PARTICLE_GLOW_BLUR: f64 = 6.0;
    pub const PARTICLE_CORE_OPACITY: f32 = 0.9;

    /// Freehand stroke width on the sepia canvas
    pub const DRAW_STROKE_WIDTH: f64 = 4.0;

    /// Bundled overlay image for the vintage effect
    pub const VINTAGE_ASSET: &str = "vintage.png";
}

/// Synthetic camera constants
pub mod virtual_camera {
    use super::Duration;

    /// Preview frame size
    pub const FRAME_WIDTH: u32 = 320;
    pub const FRAME_HEIGHT: u32 = 240;

    /// Portrait viewport used by the terminal viewer and the render command
    pub const PORTRAIT_WIDTH: u32 = 390;
    pub const PORTRAIT_HEIGHT: u32 = 640;

    /// Frame cadence of the terminal viewer and the render command
    pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

    /// Maximum digital zoom of the back and front lens
    pub const MAX_ZOOM: f64 = 10.0;
    pub const FRONT_MAX_ZOOM: f64 = 5.0;

    /// Horizontal drift of the test pattern
    pub const PATTERN_SPEED: f64 = 40.0;

    /// Frame interval while recording
    pub const RECORDING_FRAME_INTERVAL: Duration = Duration::from_millis(100);

    /// Upper bound on recorded frames (one minute at the recording interval)
    pub const MAX_RECORDED_FRAMES: usize = 600;
}

/// Gallery defaults
pub mod gallery {
    /// Album that captured media is saved into
    pub const DEFAULT_ALBUM: &str = "Camera";
}

/// Application information utilities
pub mod app_info {
    /// Application identifier used for config and cache directories
    pub const APP_ID: &str = "viewfinder";

    /// Get the application version from build-time environment
    pub fn version() -> &'static str {
        env!("GIT_VERSION")
    }
}

/// Format a recording duration as `MM:SS`
pub fn format_recording_time(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
