// SPDX-License-Identifier: GPL-3.0-only

//! Message handler modules
//!
//! Handlers are grouped by concern so related functionality stays together.

pub mod capture;
pub mod effects;
pub mod gesture;
pub mod system;
