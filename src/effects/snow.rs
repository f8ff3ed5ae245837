// SPDX-License-Identifier: GPL-3.0-only

//! Falling star particles
//!
//! The pool is allocated once at mount. Particles that fall past the bottom
//! wrap back to the top by the overshoot, keeping their x, radius and speed.

use crate::animation::FrameSubscription;
use crate::constants::overlays::{
    PARTICLE_CORE_OPACITY, PARTICLE_GLOW_BLUR, PARTICLE_GLOW_FACTOR, PARTICLE_GLOW_OPACITY,
    PARTICLE_RADIUS, PARTICLE_SPEED,
};
use crate::render::{Color, DrawCommand, Paint};
use kurbo::{Point, Size};
use rand::Rng;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    /// Fall speed in points per second
    pub speed: f64,
}

/// Vertical position after wrapping past `height`
pub fn wrap(y: f64, height: f64) -> f64 {
    if height > 0.0 && y > height {
        y.rem_euclid(height)
    } else {
        y
    }
}

#[derive(Debug, Clone)]
pub struct ParticleField {
    particles: Vec<Particle>,
    viewport: Size,
}

impl ParticleField {
    /// Scatter `count` particles over the viewport
    pub fn new(count: usize, viewport: Size, rng: &mut impl Rng) -> Self {
        let particles = (0..count)
            .map(|_| Particle {
                x: random_in(rng, 0.0, viewport.width),
                y: random_in(rng, 0.0, viewport.height),
                radius: random_in(rng, PARTICLE_RADIUS.0, PARTICLE_RADIUS.1),
                speed: random_in(rng, PARTICLE_SPEED.0, PARTICLE_SPEED.1),
            })
            .collect();
        Self {
            particles,
            viewport,
        }
    }

    pub fn from_particles(particles: Vec<Particle>, viewport: Size) -> Self {
        Self {
            particles,
            viewport,
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    /// Advance every particle by `speed * dt`
    pub fn advance(&mut self, dt: f64) {
        let height = self.viewport.height;
        for particle in &mut self.particles {
            particle.y = wrap(particle.y + particle.speed * dt, height);
        }
    }
}

fn random_in(rng: &mut impl Rng, low: f64, high: f64) -> f64 {
    if high > low {
        rng.gen_range(low..high)
    } else {
        low
    }
}

#[derive(Debug)]
pub struct SnowOverlay {
    field: ParticleField,
    frames: FrameSubscription,
}

impl SnowOverlay {
    pub fn new(field: ParticleField, frames: FrameSubscription) -> Self {
        Self { field, frames }
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    pub fn set_viewport(&mut self, viewport: Size) {
        self.field.set_viewport(viewport);
    }

    pub fn on_frame(&mut self, now: Instant) {
        let dt = self.frames.delta(now).as_secs_f64();
        self.field.advance(dt);
    }

    /// Soft glow under a sharp core, per particle
    pub fn render(&self) -> Vec<DrawCommand> {
        self.field
            .particles()
            .iter()
            .flat_map(|particle| {
                let center = Point::new(particle.x, particle.y);
                [
                    DrawCommand::Circle {
                        center,
                        radius: particle.radius * PARTICLE_GLOW_FACTOR,
                        paint: Paint::Fill(Color::WHITE.with_opacity(PARTICLE_GLOW_OPACITY)),
                        blur: PARTICLE_GLOW_BLUR,
                    },
                    DrawCommand::Circle {
                        center,
                        radius: particle.radius,
                        paint: Paint::Fill(Color::WHITE.with_opacity(PARTICLE_CORE_OPACITY)),
                        blur: 0.0,
                    },
                ]
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn particles_start_inside_viewport() {
        let mut rng = StdRng::seed_from_u64(7);
        let viewport = Size::new(320.0, 240.0);
        let field = ParticleField::new(30, viewport, &mut rng);
        assert_eq!(field.particles().len(), 30);
        for p in field.particles() {
            assert!((0.0..320.0).contains(&p.x));
            assert!((0.0..240.0).contains(&p.y));
            assert!((1.0..3.0).contains(&p.radius));
            assert!((50.0..150.0).contains(&p.speed));
        }
    }

    #[test]
    fn wrap_keeps_overshoot() {
        assert_eq!(wrap(104.0, 100.0), 4.0);
        assert_eq!(wrap(100.0, 100.0), 100.0);
        assert_eq!(wrap(250.0, 100.0), 50.0);
    }

    #[test]
    fn each_particle_draws_glow_and_core() {
        let registry = crate::animation::FrameRegistry::new();
        let field = ParticleField::from_particles(
            vec![Particle {
                x: 10.0,
                y: 10.0,
                radius: 2.0,
                speed: 60.0,
            }],
            Size::new(100.0, 100.0),
        );
        let overlay = SnowOverlay::new(field, registry.subscribe("snow"));
        let commands = overlay.render();
        assert_eq!(commands.len(), 2);
        assert!(matches!(commands[0], DrawCommand::Circle { radius, .. } if radius == 6.0));
        assert!(matches!(commands[1], DrawCommand::Circle { radius, .. } if radius == 2.0));
    }
}
