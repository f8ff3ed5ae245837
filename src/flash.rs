// SPDX-License-Identifier: GPL-3.0-only

//! Flash mode selection
//!
//! Photo capture hands the mode to the device as-is. Recording only knows
//! on/off, and the torch follows the `On` mode.

use serde::{Deserialize, Serialize};

/// Flash operating mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FlashMode {
    /// Flash LED is off
    #[default]
    Off,
    /// Flash fires on capture, torch stays lit
    On,
    /// Device decides per capture
    Auto,
}

impl FlashMode {
    /// Cycle to the next mode: Off -> On -> Auto -> Off
    pub fn next(self) -> Self {
        match self {
            FlashMode::Off => FlashMode::On,
            FlashMode::On => FlashMode::Auto,
            FlashMode::Auto => FlashMode::Off,
        }
    }

    /// Whether the torch should be lit in this mode
    pub fn torch(self) -> bool {
        self == FlashMode::On
    }

    /// Flash mode passed to the device when recording starts
    pub fn for_recording(self) -> FlashMode {
        if self == FlashMode::On {
            FlashMode::On
        } else {
            FlashMode::Off
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            FlashMode::On => "⚡",
            FlashMode::Auto => "🔆",
            FlashMode::Off => "❌",
        }
    }
}
