//! Vehicles and their lifecycle states.

use std::fmt;

use mmt_core::{LegId, VehicleId};

use crate::Route;

// ── VehicleState ──────────────────────────────────────────────────────────────

/// Lifecycle states of a vehicle.
///
/// `Release → Boarding → Enroute → Alighting → (Boarding | Enroute | Complete)`,
/// cycling through stops until the route is exhausted.  `Complete` is
/// terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VehicleState {
    /// Created but not yet in service.
    Release,
    /// Dwelling at a stop with doors open.
    Boarding,
    /// Travelling between stops.
    Enroute,
    /// Arrived at a stop; passengers are getting off.
    Alighting,
    /// Route exhausted; out of service.  Terminal.
    Complete,
}

impl VehicleState {
    pub fn is_terminal(self) -> bool {
        matches!(self, VehicleState::Complete)
    }

    pub fn name(self) -> &'static str {
        match self {
            VehicleState::Release => "release",
            VehicleState::Boarding => "boarding",
            VehicleState::Enroute => "enroute",
            VehicleState::Alighting => "alighting",
            VehicleState::Complete => "complete",
        }
    }
}

impl fmt::Display for VehicleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ── Vehicle ───────────────────────────────────────────────────────────────────

/// One vehicle and the legs it is serving.
///
/// Owned by the `Environment`; mutated only while an event targeting it is
/// being processed.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vehicle {
    pub id: VehicleId,
    pub state: VehicleState,
    pub route: Route,
    /// Legs assigned by the optimizer but not yet picked up.
    pub assigned_legs: Vec<LegId>,
    /// Legs currently riding this vehicle.
    pub onboard_legs: Vec<LegId>,
    /// Legs already dropped off.
    pub alighted_legs: Vec<LegId>,
}

impl Vehicle {
    pub fn new(id: VehicleId, route: Route) -> Self {
        Self {
            id,
            state: VehicleState::Release,
            route,
            assigned_legs: Vec::new(),
            onboard_legs: Vec::new(),
            alighted_legs: Vec::new(),
        }
    }

    /// Move `leg` from the assigned roster to onboard.
    ///
    /// Quietly tolerates a leg missing from the assigned roster — the event
    /// choreography guarantees it is there, and the FSM has already vetted
    /// the transition.
    pub fn board(&mut self, leg: LegId) {
        self.assigned_legs.retain(|&l| l != leg);
        self.onboard_legs.push(leg);
    }

    /// Move `leg` from onboard to the alighted roster.
    pub fn alight(&mut self, leg: LegId) {
        self.onboard_legs.retain(|&l| l != leg);
        self.alighted_legs.push(leg);
    }
}
