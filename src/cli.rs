// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands for the viewfinder
//!
//! This module provides command-line functionality for:
//! - Listing the effect catalog
//! - Rendering overlay frames on the virtual camera feed to PNG files

use chrono::Local;
use kurbo::{Point, Size};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use viewfinder::backends::virtual_camera::VirtualCamera;
use viewfinder::constants::virtual_camera::{FRAME_INTERVAL, PORTRAIT_HEIGHT, PORTRAIT_WIDTH};
use viewfinder::effects::{OverlaySettings, vintage};
use viewfinder::{Config, EffectId, OverlayCompositor};

/// Seed for reproducible particle placement
const RENDER_SEED: u64 = 7;

/// List the effect catalog
pub fn list_effects() -> Result<(), Box<dyn std::error::Error>> {
    println!("Available effects:");
    println!();
    for id in EffectId::ALL {
        let mut traits = Vec::new();
        if id == EffectId::Glow || id == EffectId::Snow {
            traits.push("animated");
        }
        if id == EffectId::Sepia {
            traits.push("drawable");
        }
        if id == EffectId::Vintage {
            traits.push("image");
        }

        if traits.is_empty() {
            println!("  {:<12} {}", id.name(), id);
        } else {
            println!("  {:<12} {} ({})", id.name(), id, traits.join(", "));
        }
    }
    Ok(())
}

/// Render `count` composited frames, advancing `frames` animation frames before each
pub fn render(
    config_path: Option<PathBuf>,
    effect: EffectId,
    frames: u32,
    count: u32,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = config_path
        .as_deref()
        .map(Config::load_or_default)
        .unwrap_or_default();

    let output_dir = output.unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&output_dir)?;

    let viewport = Size::new(PORTRAIT_WIDTH as f64, PORTRAIT_HEIGHT as f64);
    let camera = VirtualCamera::new(std::env::temp_dir().join("viewfinder-render"))
        .with_frame_size(PORTRAIT_WIDTH, PORTRAIT_HEIGHT);
    let mut compositor =
        OverlayCompositor::with_seed(OverlaySettings::from(&config), viewport, RENDER_SEED);

    println!("Rendering {} ({}x{})", effect, PORTRAIT_WIDTH, PORTRAIT_HEIGHT);
    if let Some(request) = compositor.select_effect(effect) {
        let image = vintage::decode(&request.source).map(std::sync::Arc::new);
        if let Err(err) = &image {
            eprintln!("Overlay image unavailable: {}", err);
        }
        compositor.image_loaded(request.mount, image);
    }
    if compositor.claims_pointer() {
        draw_signature(&mut compositor, viewport);
    }

    let start = Instant::now();
    let mut elapsed = Duration::ZERO;
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");

    for index in 0..count {
        for _ in 0..frames {
            elapsed += FRAME_INTERVAL;
            compositor.on_frame(start + elapsed);
        }

        let mut frame = camera.frame_at(elapsed);
        viewfinder::render::composite(&mut frame, &compositor.render());

        let path = output_path(&output_dir, effect, &timestamp.to_string(), index, count);
        frame.save(&path)?;
        println!("  Saved: {}", path.display());
    }

    compositor.teardown();
    Ok(())
}

/// A wavy stroke across the middle of the viewport
fn draw_signature(compositor: &mut OverlayCompositor, viewport: Size) {
    let steps = 24;
    let left = viewport.width * 0.15;
    let span = viewport.width * 0.7;
    let mid = viewport.height * 0.5;

    compositor.pointer_down(Point::new(left, mid));
    for step in 1..=steps {
        let t = step as f64 / steps as f64;
        let y = mid + (t * std::f64::consts::TAU * 2.0).sin() * 30.0;
        compositor.pointer_move(Point::new(left + span * t, y));
    }
    compositor.pointer_up();
}

fn output_path(dir: &Path, effect: EffectId, timestamp: &str, index: u32, count: u32) -> PathBuf {
    if count == 1 {
        dir.join(format!("{}_{}.png", effect.name(), timestamp))
    } else {
        dir.join(format!("{}_{}_{:03}.png", effect.name(), timestamp, index))
    }
}
