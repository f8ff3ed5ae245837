// SPDX-License-Identifier: GPL-3.0-only

//! Viewfinder - camera viewfinder core with animated effect overlays
//!
//! This library provides the state and logic behind a live camera viewfinder:
//! gesture zoom, press-and-hold capture, and a catalog of effect overlays
//! composited over the camera feed.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`app`]: Session controller, messages and the presentation snapshot
//! - [`gesture`]: Pinch and drag input fused into one zoom value
//! - [`capture`]: Capture button state machine, recording clock, button feedback
//! - [`effects`]: Effect catalog and overlay implementations
//! - [`compositor`]: Mounts exactly one overlay at a time
//! - [`render`]: Overlay display lists and the CPU compositor
//! - [`backends`]: Camera device, permission and virtual camera abstractions
//! - [`config`]: User configuration handling
//! - [`storage`]: Gallery persistence
//!
//! # Example
//!
//! ```ignore
//! // Run the terminal viewfinder against the virtual camera:
//! // viewfinder terminal
//! ```

pub mod animation;
pub mod app;
pub mod backends;
pub mod capture;
pub mod compositor;
pub mod config;
pub mod constants;
pub mod effects;
pub mod errors;
pub mod flash;
pub mod gesture;
pub mod render;
pub mod storage;
pub mod terminal;

// Re-export commonly used types
pub use app::{Collaborators, Message, Notice, NoticeLevel, SessionController, Snapshot};
pub use capture::{CaptureMode, SessionState};
pub use compositor::OverlayCompositor;
pub use config::Config;
pub use effects::EffectId;
pub use errors::{AppError, AppResult};
pub use gesture::{GestureEvent, GestureFusionEngine};
