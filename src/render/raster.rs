// SPDX-License-Identifier: GPL-3.0-only

//! Overlay rasterization
//!
//! Shapes and images are drawn with `vello_cpu` into a transparent layer the
//! size of the frame, and the layer is composited over the frame. A color
//! matrix flushes the layer first, so it recolors everything drawn before it.

use super::{Color, ColorMatrix, DrawCommand, Paint};
use image::RgbaImage;
use kurbo::{BezPath, PathEl, Point, Rect};
use std::sync::Arc;
use tracing::warn;
use vello_cpu::kurbo::{self as cpu, Shape};
use vello_cpu::peniko;

/// Flattening tolerance for circles, in pixels
const CIRCLE_TOLERANCE: f64 = 0.1;

/// Rasterize `commands` onto `frame` in order
pub fn composite(frame: &mut RgbaImage, commands: &[DrawCommand]) {
    let mut layer = ShapeLayer::new(frame.width(), frame.height());
    if layer.is_none() && commands.iter().any(|c| !matches!(c, DrawCommand::ColorMatrix(_))) {
        warn!(
            width = frame.width(),
            height = frame.height(),
            "Frame too large for the overlay layer, drawing color matrices only"
        );
    }

    for command in commands {
        match command {
            DrawCommand::ColorMatrix(matrix) => {
                if let Some(layer) = layer.as_mut() {
                    layer.flush_onto(frame);
                }
                apply_matrix(frame, matrix);
            }
            DrawCommand::Circle {
                center,
                radius,
                paint,
                blur,
            } => {
                if let Some(layer) = layer.as_mut() {
                    layer.circle(*center, *radius, *paint, *blur);
                }
            }
            DrawCommand::Stroke { path, color, width } => {
                if let Some(layer) = layer.as_mut() {
                    layer.stroke(path, *color, *width);
                }
            }
            DrawCommand::Image { image, dest } => {
                if let Some(layer) = layer.as_mut() {
                    layer.image(image, *dest);
                }
            }
        }
    }

    if let Some(layer) = layer.as_mut() {
        layer.flush_onto(frame);
    }
}

fn apply_matrix(frame: &mut RgbaImage, matrix: &ColorMatrix) {
    let pixels: &mut [[u8; 4]] = bytemuck::cast_slice_mut(&mut **frame);
    for pixel in pixels {
        *pixel = matrix.apply(*pixel);
    }
}

/// Pending vector drawing for one frame
struct ShapeLayer {
    width: u16,
    height: u16,
    ctx: vello_cpu::RenderContext,
    pending: bool,
}

impl ShapeLayer {
    fn new(width: u32, height: u32) -> Option<Self> {
        let width = u16::try_from(width).ok()?;
        let height = u16::try_from(height).ok()?;
        Some(Self {
            width,
            height,
            ctx: vello_cpu::RenderContext::new(width, height),
            pending: false,
        })
    }

    fn circle(&mut self, center: Point, radius: f64, paint: Paint, blur: f64) {
        let color = match paint {
            Paint::Fill(color) | Paint::Stroke { color, .. } => color,
        };
        if radius <= 0.0 || color.a == 0 {
            return;
        }
        if blur > 0.0 {
            self.soft_circle(center, radius, paint, blur);
            return;
        }

        let shape = cpu::Circle::new(to_cpu_point(center), radius).to_path(CIRCLE_TOLERANCE);
        self.ctx.set_transform(cpu::Affine::IDENTITY);
        self.ctx.set_paint(to_cpu_color(color));
        match paint {
            Paint::Fill(_) => self.ctx.fill_path(&shape),
            Paint::Stroke { width, .. } => {
                self.ctx.set_stroke(cpu::Stroke::new(width));
                self.ctx.stroke_path(&shape);
            }
        }
        self.pending = true;
    }

    /// Circle or ring whose edges fade out over `blur` pixels
    fn soft_circle(&mut self, center: Point, radius: f64, paint: Paint, blur: f64) {
        let half = blur / 2.0;
        let (color, inner, outer) = match paint {
            Paint::Fill(color) => (color, 0.0, radius),
            Paint::Stroke { color, width } => {
                (color, (radius - width / 2.0).max(0.0), radius + width / 2.0)
            }
        };
        let reach = outer + half;
        let offset = |distance: f64| (distance / reach).clamp(0.0, 1.0) as f32;

        let solid = to_cpu_color(color);
        let clear = to_cpu_color(Color { a: 0, ..color });
        let gradient = match paint {
            Paint::Fill(_) => peniko::Gradient::new_radial(to_cpu_point(center), reach as f32)
                .with_stops([
                    (0.0, solid),
                    (offset(outer - half), solid),
                    (1.0, clear),
                ]),
            Paint::Stroke { .. } => {
                // A ring thinner than the blur peaks at its centerline
                let rise = offset((inner + half).min(radius));
                let fall = offset((outer - half).max(radius));
                peniko::Gradient::new_radial(to_cpu_point(center), reach as f32).with_stops([
                    (offset(inner - half), clear),
                    (rise, solid),
                    (fall.max(rise), solid),
                    (1.0, clear),
                ])
            }
        };

        self.ctx.set_transform(cpu::Affine::IDENTITY);
        self.ctx.set_paint_transform(cpu::Affine::IDENTITY);
        self.ctx.set_paint(gradient);
        self.ctx.fill_rect(&cpu::Rect::new(
            center.x - reach,
            center.y - reach,
            center.x + reach,
            center.y + reach,
        ));
        self.pending = true;
    }

    fn stroke(&mut self, path: &BezPath, color: Color, width: f64) {
        if color.a == 0 || width <= 0.0 {
            return;
        }
        // A single tap still leaves a dot
        if let Some(point) = lone_point(path) {
            self.circle(point, width / 2.0, Paint::Fill(color), 0.0);
            return;
        }

        self.ctx.set_transform(cpu::Affine::IDENTITY);
        self.ctx.set_paint(to_cpu_color(color));
        self.ctx.set_stroke(
            cpu::Stroke::new(width)
                .with_join(cpu::Join::Round)
                .with_caps(cpu::Cap::Round),
        );
        self.ctx.stroke_path(&bezpath_to_cpu(path));
        self.pending = true;
    }

    /// Scale `image` into `dest`
    fn image(&mut self, image: &RgbaImage, dest: Rect) {
        if dest.width() <= 0.0 || dest.height() <= 0.0 {
            return;
        }
        let Some(pixmap) = image_to_pixmap(image) else {
            warn!(
                width = image.width(),
                height = image.height(),
                "Overlay image too large to draw"
            );
            return;
        };
        let (w, h) = (f64::from(pixmap.width()), f64::from(pixmap.height()));
        let paint = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: peniko::ImageSampler::default(),
        };

        self.ctx.set_transform(
            cpu::Affine::translate((dest.x0, dest.y0))
                * cpu::Affine::scale_non_uniform(dest.width() / w, dest.height() / h),
        );
        self.ctx.set_paint_transform(cpu::Affine::IDENTITY);
        self.ctx.set_paint(paint);
        self.ctx.fill_rect(&cpu::Rect::new(0.0, 0.0, w, h));
        self.pending = true;
    }

    /// Render everything queued so far and blend it over `frame`
    fn flush_onto(&mut self, frame: &mut RgbaImage) {
        if !self.pending {
            return;
        }
        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut pixmap);
        self.ctx = vello_cpu::RenderContext::new(self.width, self.height);
        self.pending = false;

        let layer: &[[u8; 4]] = bytemuck::cast_slice(pixmap.data_as_u8_slice());
        let pixels: &mut [[u8; 4]] = bytemuck::cast_slice_mut(&mut **frame);
        for (dst, src) in pixels.iter_mut().zip(layer) {
            *dst = blend_premul(*dst, *src);
        }
    }
}

/// Source-over of a premultiplied layer pixel onto a straight-alpha pixel
fn blend_premul(dst: [u8; 4], src: [u8; 4]) -> [u8; 4] {
    if src[3] == 0 {
        return dst;
    }
    let sa = f32::from(src[3]) / 255.0;
    let da = f32::from(dst[3]) / 255.0;
    let out_a = sa + da * (1.0 - sa);
    let mut out = [0u8; 4];
    for i in 0..3 {
        let value = (f32::from(src[i]) + f32::from(dst[i]) * da * (1.0 - sa)) / out_a;
        out[i] = value.round().clamp(0.0, 255.0) as u8;
    }
    out[3] = (out_a * 255.0).round() as u8;
    out
}

fn premul_rgba8([r, g, b, a]: [u8; 4]) -> peniko::color::PremulRgba8 {
    let af = u16::from(a) + 1;
    let premul = |c: u8| -> u8 { ((u16::from(c) * af) >> 8) as u8 };
    peniko::color::PremulRgba8 {
        r: premul(r),
        g: premul(g),
        b: premul(b),
        a,
    }
}

fn image_to_pixmap(image: &RgbaImage) -> Option<vello_cpu::Pixmap> {
    let width = u16::try_from(image.width()).ok()?;
    let height = u16::try_from(image.height()).ok()?;
    if width == 0 || height == 0 {
        return None;
    }
    let pixels: Vec<_> = image.pixels().map(|pixel| premul_rgba8(pixel.0)).collect();
    let may_have_opacities = pixels.iter().any(|pixel| pixel.a != 255);
    Some(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        width,
        height,
        may_have_opacities,
    ))
}

/// The point of a path that never leaves its first `MoveTo`
fn lone_point(path: &BezPath) -> Option<Point> {
    let mut point = None;
    for element in path.elements() {
        match *element {
            PathEl::MoveTo(p) => point = Some(p),
            PathEl::LineTo(_) | PathEl::QuadTo(..) | PathEl::CurveTo(..) => return None,
            PathEl::ClosePath => {}
        }
    }
    point
}

fn to_cpu_color(color: Color) -> peniko::Color {
    peniko::Color::from_rgba8(color.r, color.g, color.b, color.a)
}

fn to_cpu_point(p: Point) -> cpu::Point {
    cpu::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &BezPath) -> cpu::BezPath {
    let mut out = cpu::BezPath::new();
    for &element in path.elements() {
        match element {
            PathEl::MoveTo(p) => out.move_to(to_cpu_point(p)),
            PathEl::LineTo(p) => out.line_to(to_cpu_point(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(to_cpu_point(p1), to_cpu_point(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(to_cpu_point(p1), to_cpu_point(p2), to_cpu_point(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn black(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 255]))
    }

    #[test]
    fn premultiplied_over_replaces_or_keeps_destination() {
        assert_eq!(
            blend_premul([0, 0, 0, 255], [255, 0, 0, 255]),
            [255, 0, 0, 255]
        );
        assert_eq!(blend_premul([9, 9, 9, 255], [0, 0, 0, 0]), [9, 9, 9, 255]);
        // Half-transparent white over black
        assert_eq!(
            blend_premul([0, 0, 0, 255], [128, 128, 128, 128]),
            [128, 128, 128, 255]
        );
    }

    #[test]
    fn filled_circle_covers_center_only() {
        let mut frame = black(40, 40);
        composite(
            &mut frame,
            &[DrawCommand::Circle {
                center: Point::new(20.0, 20.0),
                radius: 5.0,
                paint: Paint::Fill(Color::WHITE),
                blur: 0.0,
            }],
        );
        assert_eq!(frame.get_pixel(20, 20).0, [255, 255, 255, 255]);
        assert_eq!(frame.get_pixel(2, 2).0, [0, 0, 0, 255]);
    }

    #[test]
    fn ring_leaves_its_center_untouched() {
        let mut frame = black(40, 40);
        composite(
            &mut frame,
            &[DrawCommand::Circle {
                center: Point::new(20.0, 20.0),
                radius: 10.0,
                paint: Paint::Stroke {
                    color: Color::WHITE,
                    width: 4.0,
                },
                blur: 0.0,
            }],
        );
        assert_eq!(frame.get_pixel(20, 20).0, [0, 0, 0, 255]);
        assert!(frame.get_pixel(29, 19).0[0] > 200);
    }

    #[test]
    fn blurred_circle_stays_within_its_reach() {
        let mut frame = black(40, 40);
        composite(
            &mut frame,
            &[DrawCommand::Circle {
                center: Point::new(20.0, 20.0),
                radius: 6.0,
                paint: Paint::Fill(Color::WHITE),
                blur: 4.0,
            }],
        );
        assert!(frame.get_pixel(20, 20).0[0] > 240);
        assert_eq!(frame.get_pixel(20, 30).0, [0, 0, 0, 255]);
    }

    #[test]
    fn stroke_paints_along_segment() {
        let mut frame = black(40, 40);
        let mut path = BezPath::new();
        path.move_to((5.0, 20.0));
        path.line_to((35.0, 20.0));
        composite(
            &mut frame,
            &[DrawCommand::Stroke {
                path,
                color: Color::RED,
                width: 4.0,
            }],
        );
        assert_eq!(frame.get_pixel(20, 20).0, [255, 0, 0, 255]);
        assert_eq!(frame.get_pixel(20, 30).0, [0, 0, 0, 255]);
    }

    #[test]
    fn tap_without_movement_leaves_a_dot() {
        let mut path = BezPath::new();
        path.move_to((10.0, 10.0));
        assert_eq!(lone_point(&path), Some(Point::new(10.0, 10.0)));

        let mut frame = black(20, 20);
        composite(
            &mut frame,
            &[DrawCommand::Stroke {
                path,
                color: Color::RED,
                width: 6.0,
            }],
        );
        assert!(frame.get_pixel(10, 10).0[0] > 200);
    }

    #[test]
    fn matrix_recolors_only_what_came_before() {
        let zero = ColorMatrix {
            rows: [[0.0; 4]; 3],
        };
        let mut frame = RgbaImage::from_pixel(20, 20, Rgba([200, 200, 200, 255]));
        composite(
            &mut frame,
            &[
                DrawCommand::ColorMatrix(zero),
                DrawCommand::Circle {
                    center: Point::new(10.0, 10.0),
                    radius: 4.0,
                    paint: Paint::Fill(Color::WHITE),
                    blur: 0.0,
                },
            ],
        );
        assert_eq!(frame.get_pixel(1, 1).0, [0, 0, 0, 255]);
        assert_eq!(frame.get_pixel(10, 10).0, [255, 255, 255, 255]);
    }

    #[test]
    fn image_is_scaled_into_destination() {
        let mut frame = black(20, 20);
        let overlay = Arc::new(RgbaImage::from_pixel(2, 2, Rgba([0, 255, 0, 255])));
        composite(
            &mut frame,
            &[DrawCommand::Image {
                image: overlay,
                dest: Rect::new(0.0, 0.0, 10.0, 10.0),
            }],
        );
        assert_eq!(frame.get_pixel(5, 5).0, [0, 255, 0, 255]);
        assert_eq!(frame.get_pixel(15, 15).0, [0, 0, 0, 255]);
    }
}
