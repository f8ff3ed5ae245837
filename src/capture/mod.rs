// SPDX-License-Identifier: GPL-3.0-only

//! Capture session state machine
//!
//! ```text
//!            press (Photo)            photo resolved / failed
//!   Idle ───────────────────▶ Capturing ───────────────────▶ Idle
//!    │
//!    │ press (Video, optimistic)      finished / start failed / runtime error
//!    └──────────────────────▶ Recording ───────────────────▶ Idle
//! ```
//!
//! Device calls are asynchronous and may resolve after the user has moved
//! on. Every operation the machine starts is identified by a [`Ticket`], and
//! a completion is only applied while its ticket is still the one in flight.
//! Anything else is stale and dropped.

mod clock;
mod feedback;

pub use clock::{ClockTicket, RecordingClock};
pub use feedback::{ButtonFeedback, recording_indicator_opacity};

use crate::backends::camera::{DeviceError, MediaHandle};
use crate::errors::AppError;
use futures::future::AbortHandle;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;
use tracing::{debug, info, warn};

/// What the capture button does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CaptureMode {
    #[default]
    Photo,
    Video,
}

impl CaptureMode {
    pub fn toggle(self) -> Self {
        match self {
            CaptureMode::Photo => CaptureMode::Video,
            CaptureMode::Video => CaptureMode::Photo,
        }
    }
}

impl fmt::Display for CaptureMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureMode::Photo => write!(f, "Photo"),
            CaptureMode::Video => write!(f, "Video"),
        }
    }
}

/// Lifecycle of the capture button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Capturing,
    Recording,
}

/// Identifies one capture or recording operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

/// Why a press was ignored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Missing device or permission
    Disabled,
    /// Another capture or recording is in flight
    Busy(SessionState),
}

/// Result of a press on the capture button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressOutcome {
    Rejected(Rejection),
    /// Invoke the device photo capture
    CapturePhoto(Ticket),
    /// Invoke the device recording start and schedule the first clock tick
    StartRecording { ticket: Ticket, clock: ClockTicket },
}

/// Effect of applying a device completion
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// The completion belongs to an operation that is no longer in flight
    Stale,
    /// The device confirmed the recording; `stop_pending` if the button was
    /// already released and the stop still has to be sent
    Confirmed { stop_pending: bool },
    /// New media became the last result and should be persisted
    Stored(MediaHandle),
    /// The machine returned to idle; surface the error
    Failed(AppError),
}

#[derive(Debug, Default)]
pub struct CaptureStateMachine {
    mode: CaptureMode,
    state: SessionState,
    clock: RecordingClock,
    last_result: Option<MediaHandle>,
    next_ticket: u64,
    in_flight: Option<Ticket>,
    recording_confirmed: bool,
    stop_requested: bool,
    enabled: bool,
    feedback: ButtonFeedback,
}

impl CaptureStateMachine {
    pub fn new(mode: CaptureMode) -> Self {
        Self {
            mode,
            enabled: true,
            ..Self::default()
        }
    }

    pub fn mode(&self) -> CaptureMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: CaptureMode) {
        if self.mode != mode {
            info!(from = %self.mode, to = %mode, "Capture mode changed");
            self.mode = mode;
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == SessionState::Idle
    }

    pub fn recording_seconds(&self) -> u32 {
        self.clock.seconds()
    }

    pub fn recording_since(&self) -> Option<Instant> {
        self.clock.started_at()
    }

    pub fn clock(&self) -> &RecordingClock {
        &self.clock
    }

    pub fn last_result(&self) -> Option<&MediaHandle> {
        self.last_result.as_ref()
    }

    /// Replace the last result with media picked from the gallery
    pub fn set_last_result(&mut self, handle: MediaHandle) {
        self.last_result = Some(handle);
    }

    pub fn feedback(&self) -> &ButtonFeedback {
        &self.feedback
    }

    pub fn in_flight(&self) -> Option<Ticket> {
        self.in_flight
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Disable the button while the device or a permission is missing
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled != enabled {
            info!(enabled, "Capture button availability changed");
            self.enabled = enabled;
        }
    }

    /// Capture button pressed
    pub fn press_start(&mut self, now: Instant) -> PressOutcome {
        if !self.enabled {
            debug!("Press ignored: capture disabled");
            return PressOutcome::Rejected(Rejection::Disabled);
        }
        if self.state != SessionState::Idle {
            debug!(state = ?self.state, "Press ignored: operation in flight");
            return PressOutcome::Rejected(Rejection::Busy(self.state));
        }

        self.feedback.press();
        let ticket = self.issue_ticket();
        match self.mode {
            CaptureMode::Photo => {
                self.state = SessionState::Capturing;
                info!(ticket = ticket.0, "Capturing photo");
                PressOutcome::CapturePhoto(ticket)
            }
            CaptureMode::Video => {
                self.state = SessionState::Recording;
                self.recording_confirmed = false;
                self.stop_requested = false;
                let clock = self.clock.start(now);
                info!(ticket = ticket.0, "Recording started (awaiting device)");
                PressOutcome::StartRecording { ticket, clock }
            }
        }
    }

    /// Capture button released
    ///
    /// Returns the recording to stop, if the device should be asked now. A
    /// release before the device confirmed the start defers the stop until
    /// [`Self::recording_started`] reports it.
    pub fn press_end(&mut self) -> Option<Ticket> {
        self.feedback.release();
        if self.state != SessionState::Recording || self.stop_requested {
            return None;
        }
        self.stop_requested = true;
        if self.recording_confirmed {
            info!("Stopping recording");
            self.in_flight
        } else {
            debug!("Stop deferred until the device confirms recording");
            None
        }
    }

    /// Device resolved a photo capture
    pub fn photo_completed(
        &mut self,
        ticket: Ticket,
        result: Result<MediaHandle, DeviceError>,
        now: Instant,
    ) -> Completion {
        if !self.owns(ticket, SessionState::Capturing) {
            return self.stale(ticket);
        }
        self.in_flight = None;
        self.state = SessionState::Idle;
        match result {
            Ok(handle) => {
                info!(%handle, "Photo captured");
                self.last_result = Some(handle.clone());
                self.feedback.pulse(now);
                Completion::Stored(handle)
            }
            Err(err) => {
                warn!(error = %err, "Photo capture failed");
                Completion::Failed(AppError::CaptureFailed(err.to_string()))
            }
        }
    }

    /// Device answered the recording start
    pub fn recording_started(
        &mut self,
        ticket: Ticket,
        result: Result<(), DeviceError>,
    ) -> Completion {
        if !self.owns(ticket, SessionState::Recording) {
            return self.stale(ticket);
        }
        match result {
            Ok(()) => {
                self.recording_confirmed = true;
                debug!(stop_pending = self.stop_requested, "Device confirmed recording");
                Completion::Confirmed {
                    stop_pending: self.stop_requested,
                }
            }
            Err(err) => {
                warn!(error = %err, "Recording failed to start");
                self.leave_recording();
                Completion::Failed(AppError::RecordingStartFailed(err.to_string()))
            }
        }
    }

    /// Device finished the recording and delivered the file
    pub fn recording_finished(&mut self, ticket: Ticket, handle: MediaHandle) -> Completion {
        if !self.owns(ticket, SessionState::Recording) {
            return self.stale(ticket);
        }
        info!(%handle, seconds = self.clock.seconds(), "Recording finished");
        self.leave_recording();
        self.last_result = Some(handle.clone());
        Completion::Stored(handle)
    }

    /// Device reported an error during the recording (or while stopping it)
    pub fn recording_failed(&mut self, ticket: Ticket, error: DeviceError) -> Completion {
        if !self.owns(ticket, SessionState::Recording) {
            return self.stale(ticket);
        }
        warn!(error = %error, "Recording error");
        self.leave_recording();
        Completion::Failed(AppError::RecordingRuntimeError(error.to_string()))
    }

    /// One second of recording elapsed
    pub fn tick(&mut self, ticket: ClockTicket) -> bool {
        self.state == SessionState::Recording && self.clock.tick(ticket)
    }

    /// Hand the abort handle of the next scheduled tick to the clock
    pub fn arm_tick(&mut self, handle: AbortHandle) {
        if self.state == SessionState::Recording {
            self.clock.arm(handle);
        } else {
            handle.abort();
        }
    }

    /// Abandon any operation in flight (view torn down)
    ///
    /// Returns the recording ticket if a recording was running, so the caller
    /// can still ask the device to stop it.
    pub fn abandon(&mut self) -> Option<Ticket> {
        let recording = (self.state == SessionState::Recording)
            .then_some(self.in_flight)
            .flatten();
        if self.state == SessionState::Recording {
            self.leave_recording();
        }
        self.state = SessionState::Idle;
        self.in_flight = None;
        self.feedback.release();
        recording
    }

    fn issue_ticket(&mut self) -> Ticket {
        self.next_ticket += 1;
        let ticket = Ticket(self.next_ticket);
        self.in_flight = Some(ticket);
        ticket
    }

    fn owns(&self, ticket: Ticket, state: SessionState) -> bool {
        self.state == state && self.in_flight == Some(ticket)
    }

    fn stale(&self, ticket: Ticket) -> Completion {
        debug!(ticket = ticket.0, state = ?self.state, "Ignoring stale completion");
        Completion::Stale
    }

    /// The clock is stopped before the state changes, so an in-flight tick
    /// can never land on the next session
    fn leave_recording(&mut self) {
        self.clock.stop();
        self.state = SessionState::Idle;
        self.in_flight = None;
        self.recording_confirmed = false;
        self.stop_requested = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle(name: &str) -> MediaHandle {
        MediaHandle::new(format!("file:///tmp/{}", name))
    }

    #[test]
    fn photo_round_trip_stores_result() {
        let now = Instant::now();
        let mut machine = CaptureStateMachine::new(CaptureMode::Photo);
        let PressOutcome::CapturePhoto(ticket) = machine.press_start(now) else {
            panic!("expected photo capture");
        };
        assert_eq!(machine.state(), SessionState::Capturing);

        let completion = machine.photo_completed(ticket, Ok(handle("a.png")), now);
        assert_eq!(completion, Completion::Stored(handle("a.png")));
        assert_eq!(machine.state(), SessionState::Idle);
        assert_eq!(machine.last_result(), Some(&handle("a.png")));
    }

    #[test]
    fn press_while_busy_is_rejected() {
        let now = Instant::now();
        let mut machine = CaptureStateMachine::new(CaptureMode::Photo);
        machine.press_start(now);
        assert_eq!(
            machine.press_start(now),
            PressOutcome::Rejected(Rejection::Busy(SessionState::Capturing))
        );
        assert_eq!(machine.last_result(), None);
    }

    #[test]
    fn disabled_button_never_leaves_idle() {
        let mut machine = CaptureStateMachine::new(CaptureMode::Video);
        machine.set_enabled(false);
        assert_eq!(
            machine.press_start(Instant::now()),
            PressOutcome::Rejected(Rejection::Disabled)
        );
        assert!(machine.is_idle());
    }

    #[test]
    fn failed_photo_keeps_previous_result() {
        let now = Instant::now();
        let mut machine = CaptureStateMachine::new(CaptureMode::Photo);
        machine.set_last_result(handle("old.png"));
        let PressOutcome::CapturePhoto(ticket) = machine.press_start(now) else {
            panic!("expected photo capture");
        };
        let completion =
            machine.photo_completed(ticket, Err(DeviceError::CaptureFailed("boom".into())), now);
        assert!(matches!(completion, Completion::Failed(AppError::CaptureFailed(_))));
        assert!(machine.is_idle());
        assert_eq!(machine.last_result(), Some(&handle("old.png")));
    }

    #[test]
    fn release_before_confirmation_defers_stop() {
        let mut machine = CaptureStateMachine::new(CaptureMode::Video);
        let PressOutcome::StartRecording { ticket, .. } = machine.press_start(Instant::now()) else {
            panic!("expected recording");
        };
        assert_eq!(machine.press_end(), None);
        assert_eq!(
            machine.recording_started(ticket, Ok(())),
            Completion::Confirmed { stop_pending: true }
        );
        assert_eq!(machine.press_end(), None);
    }

    #[test]
    fn stale_completion_is_ignored() {
        let now = Instant::now();
        let mut machine = CaptureStateMachine::new(CaptureMode::Video);
        let PressOutcome::StartRecording { ticket: first, .. } = machine.press_start(now) else {
            panic!("expected recording");
        };
        machine.recording_failed(first, DeviceError::Busy);
        machine.press_start(now);

        assert_eq!(machine.recording_finished(first, handle("late.gif")), Completion::Stale);
        assert_eq!(machine.state(), SessionState::Recording);
        assert_eq!(machine.last_result(), None);
    }

    #[test]
    fn abandon_returns_running_recording() {
        let mut machine = CaptureStateMachine::new(CaptureMode::Video);
        let PressOutcome::StartRecording { ticket, clock } = machine.press_start(Instant::now())
        else {
            panic!("expected recording");
        };
        assert_eq!(machine.abandon(), Some(ticket));
        assert!(machine.is_idle());
        assert!(!machine.tick(clock));
    }
}
