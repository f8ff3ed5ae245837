// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for overlay mounting and the effect catalog

use kurbo::{Point, Size};
use std::time::{Duration, Instant};
use viewfinder::effects::{EffectOverlay, OverlaySettings};
use viewfinder::effects::snow::{Particle, ParticleField, wrap};
use viewfinder::effects::vintage;
use viewfinder::render::DrawCommand;
use viewfinder::{EffectId, OverlayCompositor};

fn compositor() -> OverlayCompositor {
    OverlayCompositor::with_seed(OverlaySettings::default(), Size::new(390.0, 640.0), 42)
}

#[test]
fn test_switching_animated_effects_keeps_one_subscription() {
    let mut compositor = compositor();

    compositor.select_effect(EffectId::Snow);
    assert_eq!(compositor.active_frame_callbacks(), 1);

    // Snow is unmounted before Glow mounts
    compositor.select_effect(EffectId::Glow);
    assert_eq!(compositor.active_id(), EffectId::Glow);
    assert_eq!(compositor.active_frame_callbacks(), 1);

    compositor.select_effect(EffectId::None);
    assert_eq!(compositor.active_frame_callbacks(), 0);
    assert!(compositor.render().is_empty());
}

#[test]
fn test_cycling_the_whole_catalog_releases_everything() {
    let mut compositor = compositor();
    let mut id = EffectId::None;
    for _ in 0..(EffectId::ALL.len() * 3) {
        id = id.next();
        compositor.select_effect(id);
        assert_eq!(compositor.active_id(), id);
        assert!(compositor.active_frame_callbacks() <= 1);
    }
    compositor.teardown();
    assert_eq!(compositor.active_frame_callbacks(), 0);
    assert_eq!(compositor.active_id(), EffectId::None);
}

#[test]
fn test_only_animated_effects_want_frames() {
    let mut compositor = compositor();
    for id in EffectId::ALL {
        compositor.select_effect(id);
        let animated = matches!(id, EffectId::Glow | EffectId::Snow);
        assert_eq!(compositor.wants_frames(), animated, "{:?}", id);
        assert_eq!(compositor.claims_pointer(), id == EffectId::Sepia, "{:?}", id);
    }
}

#[test]
fn test_sepia_strokes_reset_on_remount() {
    let mut compositor = compositor();
    compositor.select_effect(EffectId::Sepia);
    compositor.pointer_down(Point::new(10.0, 10.0));
    compositor.pointer_move(Point::new(50.0, 40.0));
    compositor.pointer_up();
    let strokes = compositor
        .render()
        .iter()
        .filter(|cmd| matches!(cmd, DrawCommand::Stroke { .. }))
        .count();
    assert_eq!(strokes, 1);

    compositor.select_effect(EffectId::Monochrome);
    compositor.select_effect(EffectId::Sepia);
    assert!(
        !compositor
            .render()
            .iter()
            .any(|cmd| matches!(cmd, DrawCommand::Stroke { .. })),
        "Strokes must not survive a remount"
    );
}

#[test]
fn test_vintage_image_for_old_mount_is_dropped() {
    let mut compositor = compositor();
    let request = compositor
        .select_effect(EffectId::Vintage)
        .expect("vintage requests its image");
    let image = vintage::decode(&request.source).map(std::sync::Arc::new);
    assert!(image.is_ok(), "bundled image decodes");

    // Leave and come back: the first request belongs to a dead mount
    compositor.select_effect(EffectId::None);
    let second = compositor
        .select_effect(EffectId::Vintage)
        .expect("remount requests again");
    assert_ne!(request.mount, second.mount);
    assert!(!compositor.image_loaded(request.mount, image.clone()));
    assert!(compositor.render().is_empty());

    assert!(compositor.image_loaded(second.mount, image));
    assert!(
        compositor
            .render()
            .iter()
            .any(|cmd| matches!(cmd, DrawCommand::Image { .. }))
    );
}

#[test]
fn test_particle_wraps_by_overshoot() {
    let viewport = Size::new(100.0, 100.0);
    let mut field = ParticleField::from_particles(
        vec![Particle {
            x: 20.0,
            y: 99.0,
            radius: 2.0,
            speed: 100.0,
        }],
        viewport,
    );
    field.advance(0.05);
    let particle = field.particles()[0];
    assert!((particle.y - 4.0).abs() < 1e-9, "y = {}", particle.y);
    assert_eq!(particle.x, 20.0);
    assert_eq!(particle.speed, 100.0);

    assert_eq!(wrap(50.0, 100.0), 50.0);
    assert_eq!(wrap(100.0, 100.0), 100.0);
}

#[test]
fn test_glow_animates_with_frames() {
    let mut compositor = compositor();
    compositor.select_effect(EffectId::Glow);
    let radius = |compositor: &OverlayCompositor| match compositor.active() {
        Some(EffectOverlay::Glow(glow)) => glow.radius(),
        other => panic!("expected glow, got {:?}", other),
    };
    // Starts at the low end of the pulse
    assert!((radius(&compositor) - 150.0 * 0.9).abs() < 1e-9);

    let start = Instant::now();
    compositor.on_frame(start);
    compositor.on_frame(start + Duration::from_millis(500));
    let halfway = radius(&compositor);
    assert!(halfway > 150.0 * 0.9 && halfway < 150.0 * 1.2, "radius = {}", halfway);
}
