// SPDX-License-Identifier: GPL-3.0-only

//! Collaborators the capture session talks to
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │              SessionController              │
//! └──────┬──────────────────┬───────────────┬───┘
//!        │                  │               │
//! ┌──────┴───────┐  ┌───────┴──────┐  ┌─────┴───────┐
//! │ CameraDevice │  │PermissionGate│  │ MediaStore  │
//! │  (camera)    │  │(permissions) │  │ (storage)   │
//! └──────┬───────┘  └──────────────┘  └─────────────┘
//!        │
//! ┌──────┴────────┐
//! │ VirtualCamera │
//! └───────────────┘
//! ```
//!
//! # Modules
//!
//! - [`camera`]: device trait and shared types
//! - [`permissions`]: camera/microphone and storage permission gate
//! - [`virtual_camera`]: synthetic device used by the CLI and tests

pub mod camera;
pub mod permissions;
pub mod virtual_camera;
