// SPDX-License-Identifier: GPL-3.0-only

//! Capture button, device completion and gallery save handlers

use crate::app::SessionController;
use crate::app::state::{Message, Notice};
use crate::app::task::Task;
use crate::backends::camera::{
    DeviceError, MediaHandle, MediaKind, PhotoResult, RecordingEvents, VideoResult,
};
use crate::capture::{ClockTicket, Completion, PressOutcome, Ticket};
use crate::constants::timing::RECORDING_TICK;
use crate::errors::{AppError, AppResult, Permission};
use crate::storage::SavedRef;
use std::time::Instant;
use tracing::{debug, info};

impl SessionController {
    pub(crate) fn handle_capture_pressed(&mut self) -> Task<Message> {
        match self.capture.press_start(Instant::now()) {
            PressOutcome::Rejected(reason) => {
                debug!(?reason, "Capture press rejected");
                Task::none()
            }
            PressOutcome::CapturePhoto(ticket) => {
                let capture = self.device.capture_photo(self.flash);
                Task::perform(capture, move |result| Message::PhotoCaptured(ticket, result))
            }
            PressOutcome::StartRecording { ticket, clock } => {
                let finished = self.sender.clone();
                let failed = self.sender.clone();
                let events = RecordingEvents::new(
                    move |video| {
                        let _ = finished.send(Message::RecordingFinished(ticket, video));
                    },
                    move |error| {
                        let _ = failed.send(Message::RecordingFailed(ticket, error));
                    },
                );
                let start = self
                    .device
                    .start_recording(self.flash.for_recording(), events);
                Task::batch([
                    Task::perform(start, move |result| {
                        Message::RecordingStartResolved(ticket, result)
                    }),
                    self.schedule_tick(clock),
                ])
            }
        }
    }

    pub(crate) fn handle_capture_released(&mut self) -> Task<Message> {
        match self.capture.press_end() {
            Some(ticket) => self.stop_recording(ticket),
            None => Task::none(),
        }
    }

    fn stop_recording(&self, ticket: Ticket) -> Task<Message> {
        let stop = self.device.stop_recording();
        Task::perform(stop, move |result| Message::StopRecordingResolved(ticket, result))
    }

    /// Next one-second tick; the clock keeps its abort handle
    fn schedule_tick(&mut self, clock: ClockTicket) -> Task<Message> {
        let (task, handle) = Task::delay(RECORDING_TICK, Message::RecordingTick(clock)).abortable();
        self.capture.arm_tick(handle);
        task
    }

    pub(crate) fn handle_recording_tick(&mut self, clock: ClockTicket) -> Task<Message> {
        if self.capture.tick(clock) {
            debug!(seconds = self.capture.recording_seconds(), "Recording tick");
            self.schedule_tick(clock)
        } else {
            Task::none()
        }
    }

    pub(crate) fn handle_photo_captured(
        &mut self,
        ticket: Ticket,
        result: Result<PhotoResult, DeviceError>,
    ) -> Task<Message> {
        let result = result.map(|photo| photo.handle());
        let completion = self.capture.photo_completed(ticket, result, Instant::now());
        self.apply_completion(ticket, completion, MediaKind::Photo)
    }

    pub(crate) fn handle_recording_start_resolved(
        &mut self,
        ticket: Ticket,
        result: Result<(), DeviceError>,
    ) -> Task<Message> {
        let completion = self.capture.recording_started(ticket, result);
        self.apply_completion(ticket, completion, MediaKind::Video)
    }

    pub(crate) fn handle_recording_finished(
        &mut self,
        ticket: Ticket,
        video: VideoResult,
    ) -> Task<Message> {
        info!(path = %video.path.display(), duration = ?video.duration, "Recording delivered");
        let completion = self.capture.recording_finished(ticket, video.handle());
        self.apply_completion(ticket, completion, MediaKind::Video)
    }

    pub(crate) fn handle_recording_failed(
        &mut self,
        ticket: Ticket,
        error: DeviceError,
    ) -> Task<Message> {
        let completion = self.capture.recording_failed(ticket, error);
        self.apply_completion(ticket, completion, MediaKind::Video)
    }

    pub(crate) fn handle_stop_recording_resolved(
        &mut self,
        ticket: Ticket,
        result: Result<(), DeviceError>,
    ) -> Task<Message> {
        match result {
            // The finished callback completes the transition
            Ok(()) => Task::none(),
            Err(error) => {
                let completion = self.capture.recording_failed(ticket, error);
                self.apply_completion(ticket, completion, MediaKind::Video)
            }
        }
    }

    fn apply_completion(
        &mut self,
        ticket: Ticket,
        completion: Completion,
        kind: MediaKind,
    ) -> Task<Message> {
        match completion {
            Completion::Stale => Task::none(),
            Completion::Confirmed { stop_pending: true } => self.stop_recording(ticket),
            Completion::Confirmed { stop_pending: false } => Task::none(),
            Completion::Stored(handle) => self.persist(handle, kind),
            Completion::Failed(error) => {
                self.notify_error(&error);
                Task::none()
            }
        }
    }

    /// Save to the gallery, asking for storage access first if needed
    fn persist(&mut self, handle: MediaHandle, kind: MediaKind) -> Task<Message> {
        if self.permissions.has_storage() {
            return self.save_media(handle, kind);
        }
        info!(?kind, "Requesting storage permission");
        let request = self.permissions.request_storage();
        Task::perform(request, move |granted| Message::StoragePermissionResolved {
            granted,
            handle,
            kind,
        })
    }

    fn save_media(&self, handle: MediaHandle, kind: MediaKind) -> Task<Message> {
        let save = self.store.save_media(&handle, kind);
        Task::perform(save, move |result| Message::MediaSaved(kind, result))
    }

    pub(crate) fn handle_storage_permission_resolved(
        &mut self,
        granted: bool,
        handle: MediaHandle,
        kind: MediaKind,
    ) -> Task<Message> {
        if granted {
            self.save_media(handle, kind)
        } else {
            self.notify_error(&AppError::PermissionDenied(Permission::Storage));
            Task::none()
        }
    }

    pub(crate) fn handle_media_saved(
        &mut self,
        kind: MediaKind,
        result: AppResult<SavedRef>,
    ) -> Task<Message> {
        match result {
            Ok(saved) => {
                info!(?kind, path = %saved.0.display(), "Saved to gallery");
                if kind == MediaKind::Video {
                    self.notify(Notice::success("Success", "Video saved to gallery"));
                }
            }
            Err(error) => self.notify_error(&error),
        }
        Task::none()
    }
}
