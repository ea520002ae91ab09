//! Passenger trips and their leg decomposition.

use std::collections::VecDeque;
use std::fmt;

use mmt_core::{LegId, NodeId, SimTime, TripId, VehicleId};

use crate::{ModelError, ModelResult};

// ── LegState ──────────────────────────────────────────────────────────────────

/// Lifecycle states shared by legs and trips.
///
/// A leg runs `Release → Assigned → Ready → Onboard → Complete`.  A trip
/// mirrors its current leg, except that the transition out of `Onboard` is
/// guarded: with further legs remaining the trip re-enters `Assigned` (next
/// leg already assigned) or `Release` (next leg awaiting the optimizer)
/// instead of completing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LegState {
    /// Known to the system, not yet assigned to a vehicle.
    Release,
    /// Assigned to a vehicle by the optimizer.
    Assigned,
    /// Passenger waiting at the boarding stop.
    Ready,
    /// Riding the assigned vehicle.
    Onboard,
    /// Dropped off at the alighting stop.  Terminal.
    Complete,
}

impl LegState {
    pub fn is_terminal(self) -> bool {
        matches!(self, LegState::Complete)
    }

    pub fn name(self) -> &'static str {
        match self {
            LegState::Release => "release",
            LegState::Assigned => "assigned",
            LegState::Ready => "ready",
            LegState::Onboard => "onboard",
            LegState::Complete => "complete",
        }
    }
}

impl fmt::Display for LegState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ── Leg ───────────────────────────────────────────────────────────────────────

/// One single-vehicle segment of a trip, between a boarding and an alighting
/// node.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Leg {
    pub id: LegId,
    /// The trip this leg belongs to.
    pub trip: TripId,
    /// Node where the passenger boards.
    pub origin: NodeId,
    /// Node where the passenger alights.
    pub destination: NodeId,
    pub state: LegState,
    /// Vehicle serving this leg, once assigned.
    pub assigned_vehicle: Option<VehicleId>,
    /// Index of the boarding stop in the assigned vehicle's route.
    pub boarding_stop: Option<usize>,
    /// Index of the alighting stop in the assigned vehicle's route.
    pub alighting_stop: Option<usize>,
}

impl Leg {
    pub fn new(id: LegId, trip: TripId, origin: NodeId, destination: NodeId) -> Self {
        Self {
            id,
            trip,
            origin,
            destination,
            state: LegState::Release,
            assigned_vehicle: None,
            boarding_stop: None,
            alighting_stop: None,
        }
    }
}

// ── Trip ──────────────────────────────────────────────────────────────────────

/// A passenger's full origin→destination request, decomposed into ordered
/// legs by the (out-of-scope) splitter.
///
/// Invariant: `previous_legs ++ [current_leg] ++ next_legs` always equals the
/// full decomposition, in order, and at most one leg is current at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Trip {
    pub id: TripId,
    pub state: LegState,
    /// When the request enters the system.
    pub release_time: SimTime,
    previous_legs: Vec<LegId>,
    current_leg: Option<LegId>,
    next_legs: VecDeque<LegId>,
}

impl Trip {
    /// Build a trip from its ordered leg decomposition.
    ///
    /// A zero-leg trip is malformed input and is rejected here, before the
    /// simulation starts.
    pub fn new(id: TripId, release_time: SimTime, legs: Vec<LegId>) -> ModelResult<Self> {
        let mut legs: VecDeque<LegId> = legs.into();
        let current = legs.pop_front().ok_or(ModelError::EmptyTrip(id))?;
        Ok(Self {
            id,
            state: LegState::Release,
            release_time,
            previous_legs: Vec::new(),
            current_leg: Some(current),
            next_legs: legs,
        })
    }

    // ── Leg cursor ────────────────────────────────────────────────────────

    pub fn current_leg(&self) -> Option<LegId> {
        self.current_leg
    }

    pub fn has_next_legs(&self) -> bool {
        !self.next_legs.is_empty()
    }

    /// The leg that becomes current after the current one completes.
    pub fn next_leg(&self) -> Option<LegId> {
        self.next_legs.front().copied()
    }

    /// Retire the current leg and promote the next one (if any).
    ///
    /// Returns the new current leg.  Called by the alighting handler after
    /// the state machine has already vetted the `Onboard` exit.
    pub fn advance_leg(&mut self) -> Option<LegId> {
        if let Some(done) = self.current_leg.take() {
            self.previous_legs.push(done);
        }
        self.current_leg = self.next_legs.pop_front();
        self.current_leg
    }

    // ── Views ─────────────────────────────────────────────────────────────

    pub fn previous_legs(&self) -> &[LegId] {
        &self.previous_legs
    }

    /// The full decomposition, in order: previous ++ current ++ next.
    pub fn all_legs(&self) -> Vec<LegId> {
        let mut all = self.previous_legs.clone();
        all.extend(self.current_leg);
        all.extend(self.next_legs.iter().copied());
        all
    }

    pub fn leg_count(&self) -> usize {
        self.previous_legs.len() + usize::from(self.current_leg.is_some()) + self.next_legs.len()
    }
}
