// SPDX-License-Identifier: GPL-3.0-only

//! One-second recording clock
//!
//! The clock owns the cancellation of its own tick source. Stopping aborts the
//! pending tick and bumps the epoch, so a tick already in flight carries a
//! stale ticket and is ignored.

use futures::future::AbortHandle;
use std::time::Instant;
use tracing::debug;

/// Identifies the clock run a tick belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockTicket(u64);

#[derive(Debug, Default)]
pub struct RecordingClock {
    seconds: u32,
    epoch: u64,
    started_at: Option<Instant>,
    pending_tick: Option<AbortHandle>,
}

impl RecordingClock {
    /// Start a new run from zero
    pub fn start(&mut self, now: Instant) -> ClockTicket {
        self.cancel_pending();
        self.epoch += 1;
        self.seconds = 0;
        self.started_at = Some(now);
        debug!(epoch = self.epoch, "Recording clock started");
        ClockTicket(self.epoch)
    }

    /// Register the abort handle of the next scheduled tick
    pub fn arm(&mut self, handle: AbortHandle) {
        if let Some(previous) = self.pending_tick.replace(handle) {
            previous.abort();
        }
    }

    /// Count one second; returns false for ticks from a stopped run
    pub fn tick(&mut self, ticket: ClockTicket) -> bool {
        if !self.is_running() || ticket.0 != self.epoch {
            debug!(ticket = ticket.0, epoch = self.epoch, "Ignoring stale clock tick");
            return false;
        }
        self.pending_tick = None;
        self.seconds += 1;
        true
    }

    /// Cancel the tick source and reset to zero
    pub fn stop(&mut self) {
        self.cancel_pending();
        if self.started_at.take().is_some() {
            debug!(epoch = self.epoch, seconds = self.seconds, "Recording clock stopped");
        }
        self.epoch += 1;
        self.seconds = 0;
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending_tick.take() {
            handle.abort();
        }
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn seconds(&self) -> u32 {
        self.seconds
    }

    pub fn started_at(&self) -> Option<Instant> {
        self.started_at
    }

    /// Whether a scheduled tick is still armed
    pub fn has_pending_tick(&self) -> bool {
        self.pending_tick.is_some()
    }

    /// Ticket for the current run
    pub fn ticket(&self) -> Option<ClockTicket> {
        self.is_running().then_some(ClockTicket(self.epoch))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_ticks_of_current_run() {
        let mut clock = RecordingClock::default();
        let ticket = clock.start(Instant::now());
        assert!(clock.tick(ticket));
        assert!(clock.tick(ticket));
        assert_eq!(clock.seconds(), 2);
    }

    #[test]
    fn stop_invalidates_in_flight_ticks() {
        let mut clock = RecordingClock::default();
        let ticket = clock.start(Instant::now());
        clock.tick(ticket);
        clock.stop();
        assert!(!clock.tick(ticket));
        assert_eq!(clock.seconds(), 0);
        assert!(!clock.is_running());
    }

    #[test]
    fn stop_aborts_pending_tick() {
        let mut clock = RecordingClock::default();
        clock.start(Instant::now());
        let (handle, _registration) = AbortHandle::new_pair();
        clock.arm(handle.clone());
        assert!(clock.has_pending_tick());
        clock.stop();
        assert!(handle.is_aborted());
        assert!(!clock.has_pending_tick());
    }

    #[test]
    fn restart_ignores_previous_run() {
        let mut clock = RecordingClock::default();
        let first = clock.start(Instant::now());
        clock.stop();
        let second = clock.start(Instant::now());
        assert!(!clock.tick(first));
        assert!(clock.tick(second));
        assert_eq!(clock.seconds(), 1);
    }
}
