// SPDX-License-Identifier: GPL-3.0-only

//! Synthetic camera device
//!
//! Produces a drifting test pattern instead of sensor data, so the whole
//! session can run without hardware.
//!
//! ```text
//! ┌──────────────┐  frame_at()   ┌─────────────────┐
//! │ pattern.rs   │──────────────▶│ preview / photo │ → PNG
//! └──────────────┘               └─────────────────┘
//!        │ every 100 ms while recording
//!        ▼
//! ┌──────────────┐  stop signal  ┌─────────────────┐
//! │ FrameBuffer  │──────────────▶│ GifEncoder      │ → RecordingEvents
//! └──────────────┘               └─────────────────┘
//! ```
//!
//! [`Faults`] make individual operations fail on demand.

mod pattern;
mod recorder;

pub use pattern::PatternParams;
pub use recorder::{FrameBuffer, write_gif};

use crate::backends::camera::{
    CameraDevice, CameraPosition, DeviceError, DeviceResult, PhotoResult, RecordingEvents,
    VideoResult,
};
use crate::constants::virtual_camera::{
    FRAME_HEIGHT, FRAME_WIDTH, FRONT_MAX_ZOOM, MAX_RECORDED_FRAMES, MAX_ZOOM,
    RECORDING_FRAME_INTERVAL,
};
use crate::flash::FlashMode;
use futures::FutureExt;
use futures::future::{BoxFuture, ready};
use image::RgbaImage;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

/// Failure injection switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Faults {
    /// Photo capture rejects
    pub capture: bool,
    /// Recording refuses to start
    pub start_recording: bool,
    /// Recording fails at runtime after this many frames
    pub recording_after_frames: Option<usize>,
    /// Stop request is rejected
    pub stop_recording: bool,
}

#[derive(Debug)]
struct DeviceState {
    available: bool,
    zoom: f64,
    torch: bool,
    position: CameraPosition,
    faults: Faults,
    /// Stop signal of the running recording
    recording: Option<oneshot::Sender<()>>,
}

impl DeviceState {
    fn params(&self) -> PatternParams {
        PatternParams {
            zoom: self.zoom,
            position: self.position,
            torch: self.torch,
        }
    }
}

#[derive(Debug, Clone)]
pub struct VirtualCamera {
    state: Arc<Mutex<DeviceState>>,
    output_dir: PathBuf,
    epoch: Instant,
    frame_size: (u32, u32),
}

impl VirtualCamera {
    /// Camera writing its captures into `output_dir`
    pub fn new(output_dir: PathBuf) -> Self {
        Self {
            state: Arc::new(Mutex::new(DeviceState {
                available: true,
                zoom: 1.0,
                torch: false,
                position: CameraPosition::Back,
                faults: Faults::default(),
                recording: None,
            })),
            output_dir,
            epoch: Instant::now(),
            frame_size: (FRAME_WIDTH, FRAME_HEIGHT),
        }
    }

    pub fn with_frame_size(mut self, width: u32, height: u32) -> Self {
        self.frame_size = (width.max(1), height.max(1));
        self
    }

    fn lock(&self) -> MutexGuard<'_, DeviceState> {
        lock_state(&self.state)
    }

    pub fn set_available(&self, available: bool) {
        self.lock().available = available;
    }

    pub fn set_faults(&self, faults: Faults) {
        self.lock().faults = faults;
    }

    pub fn zoom(&self) -> f64 {
        self.lock().zoom
    }

    pub fn torch(&self) -> bool {
        self.lock().torch
    }

    pub fn position(&self) -> CameraPosition {
        self.lock().position
    }

    pub fn is_recording(&self) -> bool {
        self.lock().recording.is_some()
    }

    pub fn frame_size(&self) -> (u32, u32) {
        self.frame_size
    }

    /// Preview frame for the given time since the device was created
    pub fn frame_at(&self, elapsed: Duration) -> RgbaImage {
        let params = self.lock().params();
        pattern::render(self.frame_size.0, self.frame_size.1, elapsed, params)
    }

    pub fn current_frame(&self) -> RgbaImage {
        self.frame_at(self.epoch.elapsed())
    }

    fn capture_path(&self, extension: &str) -> PathBuf {
        let id = uuid::Uuid::new_v4().simple().to_string();
        self.output_dir
            .join(format!("capture_{}.{}", &id[..12], extension))
    }
}

fn write_photo(frame: RgbaImage, path: PathBuf, output_dir: &Path) -> DeviceResult<PhotoResult> {
    std::fs::create_dir_all(output_dir)?;
    let (width, height) = frame.dimensions();
    frame
        .save(&path)
        .map_err(|err| DeviceError::CaptureFailed(err.to_string()))?;
    Ok(PhotoResult {
        path,
        width,
        height,
    })
}

fn lock_state(state: &Mutex<DeviceState>) -> MutexGuard<'_, DeviceState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

impl CameraDevice for VirtualCamera {
    fn is_available(&self) -> bool {
        self.lock().available
    }

    fn max_zoom(&self) -> f64 {
        match self.lock().position {
            CameraPosition::Back => MAX_ZOOM,
            CameraPosition::Front => FRONT_MAX_ZOOM,
        }
    }

    fn set_zoom(&self, zoom: f64) {
        let max = self.max_zoom();
        self.lock().zoom = zoom.clamp(1.0, max);
    }

    fn set_torch(&self, on: bool) {
        let mut state = self.lock();
        if state.torch != on {
            debug!(on, "Torch toggled");
            state.torch = on;
        }
    }

    fn set_position(&self, position: CameraPosition) -> DeviceResult<()> {
        let mut state = self.lock();
        if state.recording.is_some() {
            return Err(DeviceError::Busy);
        }
        state.position = position;
        state.zoom = 1.0;
        info!(?position, "Switched lens");
        Ok(())
    }

    fn capture_photo(&self, flash: FlashMode) -> BoxFuture<'static, DeviceResult<PhotoResult>> {
        let (available, faults) = {
            let state = self.lock();
            (state.available, state.faults)
        };
        if !available {
            return ready(Err(DeviceError::NotAvailable("virtual camera disabled".into()))).boxed();
        }
        if faults.capture {
            return ready(Err(DeviceError::CaptureFailed("injected capture fault".into()))).boxed();
        }

        let frame = self.current_frame();
        let path = self.capture_path("png");
        let output_dir = self.output_dir.clone();
        debug!(?flash, path = %path.display(), "Capturing still");
        async move {
            match tokio::task::spawn_blocking(move || write_photo(frame, path, &output_dir)).await {
                Ok(result) => result,
                Err(err) => Err(DeviceError::CaptureFailed(err.to_string())),
            }
        }
        .boxed()
    }

    fn start_recording(
        &self,
        flash: FlashMode,
        events: RecordingEvents,
    ) -> BoxFuture<'static, DeviceResult<()>> {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            return ready(Err(DeviceError::RecordingFailed("no async runtime".into()))).boxed();
        };

        let mut state = self.lock();
        if !state.available {
            return ready(Err(DeviceError::NotAvailable("virtual camera disabled".into()))).boxed();
        }
        if state.recording.is_some() {
            return ready(Err(DeviceError::Busy)).boxed();
        }
        if state.faults.start_recording {
            return ready(Err(DeviceError::RecordingFailed("injected start fault".into()))).boxed();
        }

        let (stop_tx, stop_rx) = oneshot::channel();
        state.recording = Some(stop_tx);
        let fail_after = state.faults.recording_after_frames;
        drop(state);

        info!(?flash, "Virtual recording started");
        let job = RecordingJob {
            camera: self.clone(),
            path: self.capture_path("gif"),
            fail_after,
        };
        // Spawned before returning so a stop can never overtake the start
        runtime.spawn(job.run(stop_rx, events));
        ready(Ok(())).boxed()
    }

    fn stop_recording(&self) -> BoxFuture<'static, DeviceResult<()>> {
        let mut state = self.lock();
        if state.faults.stop_recording {
            return ready(Err(DeviceError::RecordingFailed("injected stop fault".into()))).boxed();
        }
        let result = match state.recording.take() {
            Some(stop) => {
                // The job may already have ended on its own
                let _ = stop.send(());
                Ok(())
            }
            None => Err(DeviceError::NoRecordingInProgress),
        };
        ready(result).boxed()
    }
}

struct RecordingJob {
    camera: VirtualCamera,
    path: PathBuf,
    fail_after: Option<usize>,
}

impl RecordingJob {
    async fn run(self, mut stop: oneshot::Receiver<()>, events: RecordingEvents) {
        let started = Instant::now();
        let mut buffer = FrameBuffer::new(MAX_RECORDED_FRAMES);
        let mut interval = tokio::time::interval(RECORDING_FRAME_INTERVAL);

        loop {
            tokio::select! {
                biased;
                _ = &mut stop => break,
                _ = interval.tick() => {
                    if !buffer.push(self.camera.current_frame()) {
                        debug!("Frame limit reached, waiting for stop");
                    }
                    if self.fail_after.is_some_and(|limit| buffer.len() >= limit) {
                        warn!(frames = buffer.len(), "Injected recording fault");
                        lock_state(&self.camera.state).recording = None;
                        events.failed(DeviceError::RecordingFailed(
                            "injected runtime fault".into(),
                        ));
                        return;
                    }
                }
            }
        }

        if buffer.is_empty() {
            buffer.push(self.camera.current_frame());
        }
        let duration = started.elapsed();
        let frames = buffer.into_frames();
        let path = self.path.clone();
        let output_dir = self.camera.output_dir.clone();
        let written = tokio::task::spawn_blocking(move || -> DeviceResult<()> {
            std::fs::create_dir_all(&output_dir)?;
            write_gif(&path, frames, RECORDING_FRAME_INTERVAL)
        })
        .await
        .map_err(|err| DeviceError::RecordingFailed(err.to_string()))
        .and_then(|result| result);

        match written {
            Ok(()) => events.finished(VideoResult {
                path: self.path,
                duration,
            }),
            Err(err) => events.failed(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn camera() -> (tempfile::TempDir, VirtualCamera) {
        let dir = tempfile::tempdir().unwrap();
        let camera = VirtualCamera::new(dir.path().to_path_buf()).with_frame_size(32, 24);
        (dir, camera)
    }

    fn events() -> (RecordingEvents, mpsc::UnboundedReceiver<DeviceResult<VideoResult>>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let tx_err = tx.clone();
        let events = RecordingEvents::new(
            move |video| {
                let _ = tx.send(Ok(video));
            },
            move |err| {
                let _ = tx_err.send(Err(err));
            },
        );
        (events, rx)
    }

    #[tokio::test]
    async fn photo_is_written_as_png() {
        let (_dir, camera) = camera();
        let photo = camera.capture_photo(FlashMode::Off).await.unwrap();
        assert_eq!((photo.width, photo.height), (32, 24));
        assert!(photo.path.exists());
    }

    #[tokio::test]
    async fn capture_fault_rejects() {
        let (_dir, camera) = camera();
        camera.set_faults(Faults {
            capture: true,
            ..Faults::default()
        });
        let err = camera.capture_photo(FlashMode::On).await.unwrap_err();
        assert!(matches!(err, DeviceError::CaptureFailed(_)));
    }

    #[tokio::test]
    async fn recording_finishes_with_gif() {
        let (_dir, camera) = camera();
        let (events, mut rx) = events();
        camera.start_recording(FlashMode::Off, events).await.unwrap();
        assert!(camera.is_recording());
        tokio::time::sleep(Duration::from_millis(250)).await;
        camera.stop_recording().await.unwrap();

        let video = rx.recv().await.unwrap().unwrap();
        assert!(video.path.exists());
        assert!(!camera.is_recording());
    }

    #[tokio::test]
    async fn second_recording_is_busy() {
        let (_dir, camera) = camera();
        let (first, _rx1) = events();
        let (second, _rx2) = events();
        camera.start_recording(FlashMode::Off, first).await.unwrap();
        let err = camera.start_recording(FlashMode::Off, second).await.unwrap_err();
        assert_eq!(err, DeviceError::Busy);
        camera.stop_recording().await.unwrap();
    }

    #[tokio::test]
    async fn runtime_fault_reports_error() {
        let (_dir, camera) = camera();
        camera.set_faults(Faults {
            recording_after_frames: Some(1),
            ..Faults::default()
        });
        let (events, mut rx) = events();
        camera.start_recording(FlashMode::Off, events).await.unwrap();
        assert!(rx.recv().await.unwrap().is_err());
        assert_eq!(
            camera.stop_recording().await.unwrap_err(),
            DeviceError::NoRecordingInProgress
        );
    }

    #[tokio::test]
    async fn lens_switch_changes_zoom_range() {
        let (_dir, camera) = camera();
        camera.set_zoom(8.0);
        camera.set_position(CameraPosition::Front).unwrap();
        assert_eq!(camera.max_zoom(), FRONT_MAX_ZOOM);
        assert_eq!(camera.zoom(), 1.0);
    }
}
