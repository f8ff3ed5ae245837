// SPDX-License-Identifier: GPL-3.0-only

//! Camera device abstraction
//!
//! The session never talks to hardware directly. Everything it needs from a
//! camera goes through [`CameraDevice`]:
//!
//! ```text
//! ┌─────────────────────┐
//! │  SessionController  │
//! └──────────┬──────────┘
//!            │ set_zoom / capture_photo / start_recording ...
//!            ▼
//! ┌─────────────────────┐
//! │ CameraDevice Trait  │
//! └──────────┬──────────┘
//!            │
//!            ▼
//!     ┌──────────────┐
//!     │VirtualCamera │  ← synthetic implementation
//!     └──────────────┘
//! ```
//!
//! Capture and recording are the only asynchronous operations. Their
//! completions are delivered back to the session as messages.

pub mod types;

pub use types::*;

use crate::flash::FlashMode;
use futures::future::BoxFuture;

type FinishedCallback = Box<dyn FnOnce(VideoResult) + Send>;
type ErrorCallback = Box<dyn FnOnce(DeviceError) + Send>;

/// Completion callbacks for a recording
///
/// Exactly one of them fires: consuming `self` makes a second completion
/// unrepresentable.
pub struct RecordingEvents {
    on_finished: FinishedCallback,
    on_error: ErrorCallback,
}

impl RecordingEvents {
    pub fn new(
        on_finished: impl FnOnce(VideoResult) + Send + 'static,
        on_error: impl FnOnce(DeviceError) + Send + 'static,
    ) -> Self {
        Self {
            on_finished: Box::new(on_finished),
            on_error: Box::new(on_error),
        }
    }

    /// The recording stopped and produced a file
    pub fn finished(self, video: VideoResult) {
        (self.on_finished)(video);
    }

    /// The recording failed while running
    pub fn failed(self, error: DeviceError) {
        (self.on_error)(error);
    }
}

impl std::fmt::Debug for RecordingEvents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("RecordingEvents")
    }
}

/// Physical (or synthetic) camera handle
pub trait CameraDevice: Send + Sync {
    /// Whether a camera and microphone are present
    fn is_available(&self) -> bool;

    /// Largest zoom factor the active lens supports
    fn max_zoom(&self) -> f64;

    fn set_zoom(&self, zoom: f64);

    fn set_torch(&self, on: bool);

    /// Switch to another lens
    fn set_position(&self, position: CameraPosition) -> DeviceResult<()>;

    /// Capture a still image
    fn capture_photo(&self, flash: FlashMode) -> BoxFuture<'static, DeviceResult<PhotoResult>>;

    /// Start recording
    ///
    /// The returned future resolves once the device confirms the recording is
    /// running (or failed to start). Later completion goes through `events`.
    fn start_recording(
        &self,
        flash: FlashMode,
        events: RecordingEvents,
    ) -> BoxFuture<'static, DeviceResult<()>>;

    /// Ask the running recording to stop; `events` fires afterwards
    fn stop_recording(&self) -> BoxFuture<'static, DeviceResult<()>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::time::Duration;

    #[test]
    fn only_one_callback_fires() {
        let (tx, rx) = mpsc::channel();
        let tx_err = tx.clone();
        let events = RecordingEvents::new(
            move |video| tx.send(Ok(video)).unwrap(),
            move |err| tx_err.send(Err(err)).unwrap(),
        );
        events.failed(DeviceError::Busy);
        assert_eq!(rx.recv().unwrap(), Err(DeviceError::Busy));
        assert!(rx.try_recv().is_err());

        let (tx, rx) = mpsc::channel();
        let tx_err = tx.clone();
        let events = RecordingEvents::new(
            move |video: VideoResult| tx.send(Ok(video.duration)).unwrap(),
            move |err| tx_err.send(Err(err)).unwrap(),
        );
        events.finished(VideoResult {
            path: "/tmp/v.gif".into(),
            duration: Duration::from_secs(2),
        });
        assert_eq!(rx.recv().unwrap(), Ok(Duration::from_secs(2)));
    }
}
