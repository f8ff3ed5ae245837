// SPDX-License-Identifier: GPL-3.0-only

//! Black and white

use crate::render::{ColorMatrix, DrawCommand};

/// BT.601 luma on every channel
pub const GRAYSCALE: ColorMatrix = ColorMatrix {
    rows: [
        [0.299, 0.587, 0.114, 0.0],
        [0.299, 0.587, 0.114, 0.0],
        [0.299, 0.587, 0.114, 0.0],
    ],
};

#[derive(Debug, Default)]
pub struct MonochromeOverlay;

impl MonochromeOverlay {
    pub fn render(&self) -> Vec<DrawCommand> {
        vec![DrawCommand::ColorMatrix(GRAYSCALE)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grayscale_equalizes_channels() {
        let [r, g, b, a] = GRAYSCALE.apply([200, 100, 50, 255]);
        assert_eq!(r, g);
        assert_eq!(g, b);
        assert_eq!(a, 255);
    }
}
