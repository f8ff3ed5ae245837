// SPDX-License-Identifier: GPL-3.0-only

//! Frame collection and GIF encoding for synthetic recordings

use crate::backends::camera::{DeviceError, DeviceResult};
use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame, RgbaImage};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// Frames collected while a recording runs
#[derive(Debug)]
pub struct FrameBuffer {
    frames: Vec<RgbaImage>,
    limit: usize,
}

impl FrameBuffer {
    pub fn new(limit: usize) -> Self {
        Self {
            frames: Vec::new(),
            limit,
        }
    }

    /// Append a frame; returns false once the limit is reached
    pub fn push(&mut self, frame: RgbaImage) -> bool {
        if self.frames.len() >= self.limit {
            return false;
        }
        self.frames.push(frame);
        true
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn into_frames(self) -> Vec<RgbaImage> {
        self.frames
    }
}

/// Encode frames as a looping GIF with a fixed frame interval
pub fn write_gif(path: &Path, frames: Vec<RgbaImage>, interval: Duration) -> DeviceResult<()> {
    if frames.is_empty() {
        return Err(DeviceError::RecordingFailed("no frames recorded".to_string()));
    }
    let count = frames.len();
    let file = BufWriter::new(File::create(path)?);
    let mut encoder = GifEncoder::new(file);
    encoder
        .set_repeat(Repeat::Infinite)
        .map_err(|err| DeviceError::RecordingFailed(err.to_string()))?;

    let delay = Delay::from_saturating_duration(interval);
    encoder
        .encode_frames(
            frames
                .into_iter()
                .map(|frame| Frame::from_parts(frame, 0, 0, delay)),
        )
        .map_err(|err| DeviceError::RecordingFailed(err.to_string()))?;

    debug!(frames = count, "GIF encoded");
    info!(path = %path.display(), frames = count, "Recording written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_stops_at_limit() {
        let mut buffer = FrameBuffer::new(2);
        assert!(buffer.push(RgbaImage::new(1, 1)));
        assert!(buffer.push(RgbaImage::new(1, 1)));
        assert!(!buffer.push(RgbaImage::new(1, 1)));
        assert_eq!(buffer.len(), 2);
    }

    #[test]
    fn writes_animated_gif() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.gif");
        let frames = vec![RgbaImage::new(8, 8), RgbaImage::new(8, 8)];
        write_gif(&path, frames, Duration::from_millis(100)).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..3], b"GIF");
    }

    #[test]
    fn empty_recording_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = write_gif(
            &dir.path().join("empty.gif"),
            Vec::new(),
            Duration::from_millis(100),
        );
        assert!(matches!(result, Err(DeviceError::RecordingFailed(_))));
    }
}
