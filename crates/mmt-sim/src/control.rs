//! Cross-thread run control: pause, resume, stop.
//!
//! The driver inspects the control state at exactly one point, between
//! events.  `pause` therefore takes effect after the currently-processing
//! event finishes — never mid-mutation — and a paused driver sleeps on a
//! condvar rather than polling.

use std::sync::{Arc, Condvar, Mutex, PoisonError};

// ── DriverState ───────────────────────────────────────────────────────────────

/// Lifecycle of the driver: `Ready → Running → (Paused ↔ Running) → Stopped`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Ready,
    Running,
    Paused,
    Stopped,
}

/// What the gate tells the loop to do next.
pub(crate) enum LoopSignal {
    Continue,
    Stop,
}

// ── RunControl ────────────────────────────────────────────────────────────────

struct ControlShared {
    state: Mutex<DriverState>,
    resumed: Condvar,
}

/// Cloneable handle for controlling a running simulation from other threads.
///
/// `stop` is terminal: the driver discards its remaining queued events and
/// the control can not be rewound to `Ready`.
#[derive(Clone)]
pub struct RunControl {
    shared: Arc<ControlShared>,
}

impl RunControl {
    pub fn new() -> Self {
        Self {
            shared: Arc::new(ControlShared {
                state: Mutex::new(DriverState::Ready),
                resumed: Condvar::new(),
            }),
        }
    }

    pub fn state(&self) -> DriverState {
        *self.lock()
    }

    /// Request a pause.  Takes effect after the in-flight event completes.
    pub fn pause(&self) {
        let mut state = self.lock();
        if matches!(*state, DriverState::Ready | DriverState::Running) {
            *state = DriverState::Paused;
        }
    }

    /// Resume a paused run.  No effect in any other state.
    pub fn resume(&self) {
        let mut state = self.lock();
        if *state == DriverState::Paused {
            *state = DriverState::Running;
            self.shared.resumed.notify_all();
        }
    }

    /// Request termination.  The driver discards all remaining events.
    pub fn stop(&self) {
        let mut state = self.lock();
        *state = DriverState::Stopped;
        self.shared.resumed.notify_all();
    }

    // ── Driver-side hooks ─────────────────────────────────────────────────

    /// Mark the run as started (`Ready → Running`).
    pub(crate) fn mark_running(&self) {
        let mut state = self.lock();
        if *state == DriverState::Ready {
            *state = DriverState::Running;
        }
    }

    /// The single between-events control point: blocks while paused, and
    /// reports whether to continue or stop.
    pub(crate) fn gate(&self) -> LoopSignal {
        let mut state = self.lock();
        loop {
            match *state {
                DriverState::Stopped => return LoopSignal::Stop,
                DriverState::Paused => {
                    state = self
                        .shared
                        .resumed
                        .wait(state)
                        .unwrap_or_else(PoisonError::into_inner);
                }
                _ => return LoopSignal::Continue,
            }
        }
    }

    /// Mark the run as finished (terminal, same state as an external stop).
    pub(crate) fn finish(&self) {
        *self.lock() = DriverState::Stopped;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, DriverState> {
        self.shared
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for RunControl {
    fn default() -> Self {
        Self::new()
    }
}
