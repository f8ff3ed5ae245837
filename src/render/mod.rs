// SPDX-License-Identifier: GPL-3.0-only

//! Overlay display list
//!
//! Effect overlays do not draw directly. Each frame they emit a list of
//! [`DrawCommand`]s in painter's order, and [`composite`] rasterizes the list
//! onto the camera frame. An empty list means the overlay renders nothing.

mod raster;

pub use raster::composite;

use bytemuck::{Pod, Zeroable};
use image::RgbaImage;
use kurbo::{BezPath, Point, Rect, Size};
use std::sync::Arc;

/// Straight (non-premultiplied) RGBA color
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GOLD: Color = Color::rgb(255, 215, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Same color with its alpha scaled by `opacity`
    pub fn with_opacity(self, opacity: f32) -> Self {
        let a = (f32::from(self.a) * opacity.clamp(0.0, 1.0)).round() as u8;
        Self { a, ..self }
    }

    pub fn to_array(self) -> [u8; 4] {
        bytemuck::cast(self)
    }
}

/// Linear RGB transform; each row is `[r, g, b, offset]`, alpha is untouched
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorMatrix {
    pub rows: [[f32; 4]; 3],
}

impl ColorMatrix {
    pub const IDENTITY: ColorMatrix = ColorMatrix {
        rows: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
        ],
    };

    pub fn apply(&self, pixel: [u8; 4]) -> [u8; 4] {
        let rgb = [
            f32::from(pixel[0]) / 255.0,
            f32::from(pixel[1]) / 255.0,
            f32::from(pixel[2]) / 255.0,
        ];
        let mut out = [0u8, 0, 0, pixel[3]];
        for (channel, row) in out.iter_mut().zip(self.rows.iter()) {
            let value = row[0] * rgb[0] + row[1] * rgb[1] + row[2] * rgb[2] + row[3];
            *channel = (value.clamp(0.0, 1.0) * 255.0).round() as u8;
        }
        out
    }
}

/// How a circle is drawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Paint {
    Fill(Color),
    /// Ring centered on the radius
    Stroke { color: Color, width: f64 },
}

#[derive(Debug, Clone)]
pub enum DrawCommand {
    /// Recolor everything drawn so far
    ColorMatrix(ColorMatrix),
    Circle {
        center: Point,
        radius: f64,
        paint: Paint,
        /// Width of the soft edge; zero gives a one-pixel antialiased edge
        blur: f64,
    },
    /// Polyline stroke with round joins
    Stroke {
        path: BezPath,
        color: Color,
        width: f64,
    },
    Image {
        image: Arc<RgbaImage>,
        dest: Rect,
    },
}

/// Rectangle that scales `image` to cover `viewport`, centered and cropped
pub fn cover_rect(image: Size, viewport: Size) -> Rect {
    if image.width <= 0.0 || image.height <= 0.0 {
        return Rect::from_origin_size(Point::ORIGIN, viewport);
    }
    let scale = (viewport.width / image.width).max(viewport.height / image.height);
    let size = Size::new(image.width * scale, image.height * scale);
    let origin = Point::new(
        (viewport.width - size.width) / 2.0,
        (viewport.height - size.height) / 2.0,
    );
    Rect::from_origin_size(origin, size)
}
