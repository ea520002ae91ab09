//! Simulation time model.
//!
//! # Design
//!
//! Time is represented as a monotonically non-decreasing `SimTime` counter in
//! whole seconds of simulated time.  The mapping to wall-clock time is held
//! in `SimClock`:
//!
//!   wall_time = start_unix_secs + sim_time
//!
//! Using an integer second as the canonical time unit means all timetable
//! arithmetic is exact (no floating-point drift) and comparisons are O(1).
//! Events carry a `SimTime`; the clock only ever moves forward, to the time
//! of the event being processed.

use std::fmt;

use crate::{CoreError, CoreResult};

// ── SimTime ───────────────────────────────────────────────────────────────────

/// An absolute simulation timestamp, in seconds since the start of the run.
///
/// Stored as `u64`: at 1-second resolution a u64 lasts ~585 billion years,
/// so overflow is not a practical concern.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimTime(pub u64);

impl SimTime {
    pub const ZERO: SimTime = SimTime(0);

    /// Return the time `secs` seconds after `self`.
    #[inline]
    pub fn offset(self, secs: u64) -> SimTime {
        SimTime(self.0 + secs)
    }

    /// Seconds elapsed from `earlier` to `self`.
    ///
    /// # Panics
    /// Panics in debug mode if `earlier > self`.
    #[inline]
    pub fn since(self, earlier: SimTime) -> u64 {
        self.0 - earlier.0
    }
}

impl std::ops::Add<u64> for SimTime {
    type Output = SimTime;
    #[inline]
    fn add(self, rhs: u64) -> SimTime {
        SimTime(self.0 + rhs)
    }
}

impl std::ops::Sub for SimTime {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: SimTime) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// The simulation clock: current simulated time plus the wall-clock anchor.
///
/// The clock is advanced only by the driver, to the timestamp of the event
/// being processed.  Moving it backwards is a causality violation and is
/// rejected.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// Unix timestamp (seconds since epoch) of `SimTime::ZERO`.
    pub start_unix_secs: i64,
    /// The current simulated time.
    pub now: SimTime,
}

impl SimClock {
    /// Create a clock anchored at `start_unix_secs`, at `SimTime::ZERO`.
    pub fn new(start_unix_secs: i64) -> Self {
        Self {
            start_unix_secs,
            now: SimTime::ZERO,
        }
    }

    /// Advance the clock to `time`.
    ///
    /// `time` may equal `now` (many events share a timestamp) but may never
    /// precede it.
    pub fn advance_to(&mut self, time: SimTime) -> CoreResult<()> {
        if time < self.now {
            return Err(CoreError::ClockRegression {
                now: self.now,
                requested: time,
            });
        }
        self.now = time;
        Ok(())
    }

    /// Current Unix timestamp corresponding to `now`.
    #[inline]
    pub fn current_unix_secs(&self) -> i64 {
        self.start_unix_secs + self.now.0 as i64
    }

    /// Break the current time into (day, hour, minute) components from sim
    /// start.  Useful for human-readable logging without a datetime library.
    pub fn elapsed_dhm(&self) -> (u64, u32, u32) {
        let total_secs = self.now.0;
        let days = total_secs / 86_400;
        let hours = ((total_secs % 86_400) / 3_600) as u32;
        let minutes = ((total_secs % 3_600) / 60) as u32;
        (days, hours, minutes)
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (d, h, m) = self.elapsed_dhm();
        write!(f, "{} (day {} {:02}:{:02})", self.now, d, h, m)
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
///
/// Typically loaded from a TOML/JSON file by the application crate and passed
/// to the simulation builder.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    /// Unix timestamp for `SimTime::ZERO` (e.g. a Monday 00:00 local time).
    pub start_unix_secs: i64,

    /// Master RNG seed.  The same seed and inputs always produce identical
    /// results.
    pub seed: u64,

    /// Worker thread count for the per-subset dispatcher fan-out.
    /// `None` uses all logical cores.
    pub num_threads: Option<usize>,
}

impl SimConfig {
    /// Construct a `SimClock` pre-configured for this run.
    pub fn make_clock(&self) -> SimClock {
        SimClock::new(self.start_unix_secs)
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            start_unix_secs: 0,
            seed: 0,
            num_threads: None,
        }
    }
}
