// SPDX-License-Identifier: GPL-3.0-only

//! Effect catalog and overlay variants
//!
//! The catalog is a closed set. Each non-`None` entry owns its own runtime
//! state inside [`EffectOverlay`], created on mount and dropped on unmount.

pub mod glow;
pub mod monochrome;
pub mod sepia;
pub mod snow;
pub mod vintage;

use crate::animation::FrameRegistry;
use crate::config::Config;
use crate::render::DrawCommand;
use glow::GlowOverlay;
use kurbo::{Point, Size};
use monochrome::MonochromeOverlay;
use rand::Rng;
use sepia::SepiaOverlay;
use snow::{ParticleField, SnowOverlay};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Instant;
use vintage::{ImageSource, VintageOverlay};

/// Catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EffectId {
    /// "Original": no overlay
    #[default]
    None,
    Monochrome,
    Sepia,
    Vintage,
    Glow,
    Snow,
}

impl EffectId {
    /// Catalog order
    pub const ALL: [EffectId; 6] = [
        EffectId::None,
        EffectId::Monochrome,
        EffectId::Sepia,
        EffectId::Vintage,
        EffectId::Snow,
        EffectId::Glow,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            EffectId::None => "Original",
            EffectId::Monochrome => "B&W",
            EffectId::Sepia => "Sepia",
            EffectId::Vintage => "Vintage",
            EffectId::Glow => "gold",
            EffectId::Snow => "snow",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            EffectId::None => "📷",
            EffectId::Monochrome => "⚫",
            EffectId::Sepia => "🟤",
            EffectId::Vintage => "📹",
            EffectId::Glow => "🌟",
            EffectId::Snow => "❄️",
        }
    }

    /// Stable lowercase name used on the command line
    pub fn name(self) -> &'static str {
        match self {
            EffectId::None => "none",
            EffectId::Monochrome => "monochrome",
            EffectId::Sepia => "sepia",
            EffectId::Vintage => "vintage",
            EffectId::Glow => "glow",
            EffectId::Snow => "snow",
        }
    }

    fn position(self) -> usize {
        Self::ALL.iter().position(|id| *id == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.position() + 1) % Self::ALL.len()]
    }

    pub fn previous(self) -> Self {
        Self::ALL[(self.position() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for EffectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.emoji(), self.display_name())
    }
}

impl FromStr for EffectId {
    type Err = String;

    /// Accepts the command-line name or the catalog display name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|id| {
                id.name() == wanted
                    || id.display_name().to_lowercase() == wanted
                    || (wanted == "original" && *id == EffectId::None)
            })
            .ok_or_else(|| format!("unknown effect '{}'", s))
    }
}

/// Parameters overlays are built from
#[derive(Debug, Clone, PartialEq)]
pub struct OverlaySettings {
    pub glow_center: Point,
    pub glow_radius: f64,
    pub particle_count: usize,
    pub overlay_image: Option<PathBuf>,
}

impl From<&Config> for OverlaySettings {
    fn from(config: &Config) -> Self {
        Self {
            glow_center: Point::new(config.glow_center.0, config.glow_center.1),
            glow_radius: config.glow_radius,
            particle_count: config.particle_count,
            overlay_image: config.overlay_image.clone(),
        }
    }
}

impl Default for OverlaySettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

/// What a mount needs from its surroundings
pub struct MountContext<'a, R: Rng> {
    pub viewport: Size,
    pub frames: &'a FrameRegistry,
    pub settings: &'a OverlaySettings,
    pub rng: &'a mut R,
}

/// The mounted overlay and its state
#[derive(Debug)]
pub enum EffectOverlay {
    Monochrome(MonochromeOverlay),
    Sepia(SepiaOverlay),
    Vintage(VintageOverlay),
    Glow(GlowOverlay),
    Snow(SnowOverlay),
}

impl EffectOverlay {
    /// Build fresh state for `id`; `None` mounts nothing
    pub fn mount<R: Rng>(id: EffectId, ctx: MountContext<'_, R>) -> Option<Self> {
        let overlay = match id {
            EffectId::None => return None,
            EffectId::Monochrome => EffectOverlay::Monochrome(MonochromeOverlay),
            EffectId::Sepia => EffectOverlay::Sepia(SepiaOverlay::default()),
            EffectId::Vintage => EffectOverlay::Vintage(VintageOverlay::new(ctx.viewport)),
            EffectId::Glow => EffectOverlay::Glow(GlowOverlay::new(
                ctx.settings.glow_center,
                ctx.settings.glow_radius,
                ctx.frames.subscribe("glow"),
            )),
            EffectId::Snow => EffectOverlay::Snow(SnowOverlay::new(
                ParticleField::new(ctx.settings.particle_count, ctx.viewport, ctx.rng),
                ctx.frames.subscribe("snow"),
            )),
        };
        Some(overlay)
    }

    pub fn id(&self) -> EffectId {
        match self {
            EffectOverlay::Monochrome(_) => EffectId::Monochrome,
            EffectOverlay::Sepia(_) => EffectId::Sepia,
            EffectOverlay::Vintage(_) => EffectId::Vintage,
            EffectOverlay::Glow(_) => EffectId::Glow,
            EffectOverlay::Snow(_) => EffectId::Snow,
        }
    }

    /// Image this overlay needs loaded after mounting
    pub fn pending_image(&self, settings: &OverlaySettings) -> Option<ImageSource> {
        match self {
            EffectOverlay::Vintage(_) => {
                Some(ImageSource::from_override(settings.overlay_image.clone()))
            }
            _ => None,
        }
    }

    /// Whether this overlay consumes display-synchronized frame events
    pub fn wants_frames(&self) -> bool {
        matches!(self, EffectOverlay::Glow(_) | EffectOverlay::Snow(_))
    }

    /// Whether pointer input is claimed for drawing
    pub fn claims_pointer(&self) -> bool {
        matches!(self, EffectOverlay::Sepia(_))
    }

    pub fn on_frame(&mut self, now: Instant) {
        match self {
            EffectOverlay::Glow(glow) => glow.on_frame(now),
            EffectOverlay::Snow(snow) => snow.on_frame(now),
            EffectOverlay::Monochrome(_) | EffectOverlay::Sepia(_) | EffectOverlay::Vintage(_) => {}
        }
    }

    pub fn set_viewport(&mut self, viewport: Size) {
        match self {
            EffectOverlay::Vintage(vintage) => vintage.set_viewport(viewport),
            EffectOverlay::Snow(snow) => snow.set_viewport(viewport),
            EffectOverlay::Monochrome(_) | EffectOverlay::Sepia(_) | EffectOverlay::Glow(_) => {}
        }
    }

    pub fn pointer_down(&mut self, point: Point) {
        if let EffectOverlay::Sepia(sepia) = self {
            sepia.canvas_mut().pointer_down(point);
        }
    }

    pub fn pointer_move(&mut self, point: Point) {
        if let EffectOverlay::Sepia(sepia) = self {
            sepia.canvas_mut().pointer_move(point);
        }
    }

    pub fn pointer_up(&mut self) {
        if let EffectOverlay::Sepia(sepia) = self {
            sepia.canvas_mut().pointer_up();
        }
    }

    pub fn render(&self) -> Vec<DrawCommand> {
        match self {
            EffectOverlay::Monochrome(mono) => mono.render(),
            EffectOverlay::Sepia(sepia) => sepia.render(),
            EffectOverlay::Vintage(vintage) => vintage.render(),
            EffectOverlay::Glow(glow) => glow.render(),
            EffectOverlay::Snow(snow) => snow.render(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_order_and_labels() {
        let labels: Vec<&str> = EffectId::ALL.iter().map(|id| id.display_name()).collect();
        assert_eq!(labels, ["Original", "B&W", "Sepia", "Vintage", "snow", "gold"]);
    }

    #[test]
    fn next_and_previous_wrap() {
        assert_eq!(EffectId::Glow.next(), EffectId::None);
        assert_eq!(EffectId::None.previous(), EffectId::Glow);
        assert_eq!(EffectId::Sepia.next(), EffectId::Vintage);
    }

    #[test]
    fn parses_names_and_labels() {
        assert_eq!("snow".parse::<EffectId>(), Ok(EffectId::Snow));
        assert_eq!("gold".parse::<EffectId>(), Ok(EffectId::Glow));
        assert_eq!("B&W".parse::<EffectId>(), Ok(EffectId::Monochrome));
        assert_eq!("Original".parse::<EffectId>(), Ok(EffectId::None));
        assert!("sparkles".parse::<EffectId>().is_err());
    }
}
