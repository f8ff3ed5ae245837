// SPDX-License-Identifier: GPL-3.0-only

//! Sepia tone with freehand drawing
//!
//! Strokes form an append-only sequence. Only the open stroke (the one under
//! a pressed pointer) can still grow; lifting the pointer finalizes it.

use crate::constants::overlays::DRAW_STROKE_WIDTH;
use crate::render::{Color, ColorMatrix, DrawCommand};
use kurbo::{BezPath, Point};
use tracing::debug;

pub const SEPIA: ColorMatrix = ColorMatrix {
    rows: [
        [0.393, 0.769, 0.189, 0.0],
        [0.349, 0.686, 0.168, 0.0],
        [0.272, 0.534, 0.131, 0.0],
    ],
};

/// Ordered freehand strokes plus the one being drawn
#[derive(Debug, Default)]
pub struct StrokeCanvas {
    finished: Vec<BezPath>,
    open: Option<BezPath>,
}

impl StrokeCanvas {
    /// Start a new stroke; a stroke left open is finalized first
    pub fn pointer_down(&mut self, point: Point) {
        self.finish_open();
        let mut path = BezPath::new();
        path.move_to(point);
        self.open = Some(path);
    }

    /// Extend the open stroke; ignored while no pointer is down
    pub fn pointer_move(&mut self, point: Point) {
        if let Some(path) = self.open.as_mut() {
            path.line_to(point);
        }
    }

    pub fn pointer_up(&mut self) {
        self.finish_open();
    }

    fn finish_open(&mut self) {
        if let Some(path) = self.open.take() {
            self.finished.push(path);
            debug!(strokes = self.finished.len(), "Stroke finalized");
        }
    }

    pub fn finished(&self) -> &[BezPath] {
        &self.finished
    }

    pub fn open(&self) -> Option<&BezPath> {
        self.open.as_ref()
    }

    pub fn is_drawing(&self) -> bool {
        self.open.is_some()
    }

    /// Finished strokes in order, then the open one
    pub fn strokes(&self) -> impl Iterator<Item = &BezPath> {
        self.finished.iter().chain(self.open.iter())
    }
}

#[derive(Debug, Default)]
pub struct SepiaOverlay {
    canvas: StrokeCanvas,
}

impl SepiaOverlay {
    pub fn canvas(&self) -> &StrokeCanvas {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut StrokeCanvas {
        &mut self.canvas
    }

    pub fn render(&self) -> Vec<DrawCommand> {
        let mut commands = vec![DrawCommand::ColorMatrix(SEPIA)];
        commands.extend(self.canvas.strokes().map(|path| DrawCommand::Stroke {
            path: path.clone(),
            color: Color::RED,
            width: DRAW_STROKE_WIDTH,
        }));
        commands
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifting_pointer_finalizes_stroke() {
        let mut canvas = StrokeCanvas::default();
        canvas.pointer_down(Point::new(0.0, 0.0));
        canvas.pointer_move(Point::new(10.0, 0.0));
        assert!(canvas.is_drawing());
        assert!(canvas.finished().is_empty());

        canvas.pointer_up();
        assert!(!canvas.is_drawing());
        assert_eq!(canvas.finished().len(), 1);

        // Moves without a pressed pointer never touch finished strokes
        let before = canvas.finished()[0].elements().len();
        canvas.pointer_move(Point::new(20.0, 20.0));
        assert_eq!(canvas.finished()[0].elements().len(), before);
    }

    #[test]
    fn strokes_keep_drawing_order() {
        let mut canvas = StrokeCanvas::default();
        for x in [1.0, 2.0, 3.0] {
            canvas.pointer_down(Point::new(x, 0.0));
            canvas.pointer_up();
        }
        canvas.pointer_down(Point::new(4.0, 0.0));
        let starts: Vec<f64> = canvas
            .strokes()
            .filter_map(|path| path.elements().first().and_then(|el| el.end_point()))
            .map(|p| p.x)
            .collect();
        assert_eq!(starts, vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn render_tints_before_strokes() {
        let mut overlay = SepiaOverlay::default();
        overlay.canvas_mut().pointer_down(Point::new(1.0, 1.0));
        let commands = overlay.render();
        assert!(matches!(commands[0], DrawCommand::ColorMatrix(_)));
        assert!(matches!(commands[1], DrawCommand::Stroke { .. }));
    }
}
