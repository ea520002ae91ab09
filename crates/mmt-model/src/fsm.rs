//! Guarded transition tables for vehicles, legs, and trips.
//!
//! # Design
//!
//! Transitions are data, not code: each entity kind has a static table of
//! [`Rule`]s keyed by `(current state, event class)`.  A rule's target is
//! either a fixed next state or a guarded list of `(guard, state)` pairs;
//! guards are named predicates evaluated at transition time against live
//! entity data (route exhaustion, remaining legs, next-leg assignment).  The
//! first guard that holds selects the next state.
//!
//! The driver calls the `*_transition` functions *before* running an event's
//! handler body.  A `(state, event)` pair with no rule — or a guarded rule
//! where no guard holds — is a fatal error: it means events were scheduled
//! out of order somewhere upstream, and continuing would corrupt the world.

use thiserror::Error;

use mmt_event::{EntityRef, EventClass};

use crate::{Leg, LegState, Trip, Vehicle, VehicleState};

// ── Errors ────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum FsmError {
    /// The entity's state machine has no transition for this event kind.
    #[error("no transition for {entity:?} in state {state} on {event:?}")]
    InvalidTransition {
        entity: EntityRef,
        state: &'static str,
        event: EventClass,
    },

    /// A guarded transition exists but none of its guards held.
    #[error("no guard matched for {entity:?} in state {state} on {event:?}")]
    NoGuardMatched {
        entity: EntityRef,
        state: &'static str,
        event: EventClass,
    },
}

// ── Table machinery ───────────────────────────────────────────────────────────

/// One entry of a transition table.
pub struct Rule<S: 'static, G: 'static> {
    pub from: S,
    pub on: EventClass,
    pub to: Target<S, G>,
}

/// Where a rule leads: a fixed state, or the first state whose guard holds.
pub enum Target<S: 'static, G: 'static> {
    Fixed(S),
    Guarded(&'static [(G, S)]),
}

fn lookup<S: Copy + PartialEq, G>(
    rules: &'static [Rule<S, G>],
    from: S,
    on: EventClass,
) -> Option<&'static Target<S, G>> {
    rules
        .iter()
        .find(|r| r.from == from && r.on == on)
        .map(|r| &r.to)
}

// ── Vehicle machine ───────────────────────────────────────────────────────────

/// Guards over live vehicle data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleGuard {
    /// There is at least one stop after the current one.
    RouteRemaining,
    /// The current stop is the last one.
    RouteExhausted,
}

fn vehicle_guard_holds(guard: VehicleGuard, vehicle: &Vehicle) -> bool {
    match guard {
        VehicleGuard::RouteRemaining => !vehicle.route.is_exhausted(),
        VehicleGuard::RouteExhausted => vehicle.route.is_exhausted(),
    }
}

/// `Release → Boarding → Enroute → Alighting → (Boarding | Enroute | Complete)`.
///
/// The three-way exit from `Alighting` is driven by which follow-up event the
/// arrival handler scheduled; the guards re-check the route so a
/// wrongly-scheduled follow-up fails loudly instead of silently corrupting
/// the cycle.
static VEHICLE_RULES: &[Rule<VehicleState, VehicleGuard>] = &[
    Rule {
        from: VehicleState::Release,
        on: EventClass::VehicleBoarding,
        to: Target::Guarded(&[(VehicleGuard::RouteRemaining, VehicleState::Boarding)]),
    },
    Rule {
        from: VehicleState::Release,
        on: EventClass::VehicleComplete,
        to: Target::Guarded(&[(VehicleGuard::RouteExhausted, VehicleState::Complete)]),
    },
    Rule {
        from: VehicleState::Boarding,
        on: EventClass::VehicleDeparture,
        to: Target::Guarded(&[(VehicleGuard::RouteRemaining, VehicleState::Enroute)]),
    },
    Rule {
        from: VehicleState::Enroute,
        on: EventClass::VehicleArrival,
        to: Target::Fixed(VehicleState::Alighting),
    },
    Rule {
        from: VehicleState::Alighting,
        on: EventClass::VehicleBoarding,
        to: Target::Guarded(&[(VehicleGuard::RouteRemaining, VehicleState::Boarding)]),
    },
    Rule {
        from: VehicleState::Alighting,
        on: EventClass::VehicleDeparture,
        to: Target::Guarded(&[(VehicleGuard::RouteRemaining, VehicleState::Enroute)]),
    },
    Rule {
        from: VehicleState::Alighting,
        on: EventClass::VehicleComplete,
        to: Target::Guarded(&[(VehicleGuard::RouteExhausted, VehicleState::Complete)]),
    },
];

/// Advance a vehicle's state machine for `on`.
///
/// Pure with respect to the vehicle: returns the next state, which the
/// caller stores.  Errors are fatal for the run.
pub fn vehicle_transition(vehicle: &Vehicle, on: EventClass) -> Result<VehicleState, FsmError> {
    let target = lookup(VEHICLE_RULES, vehicle.state, on).ok_or(FsmError::InvalidTransition {
        entity: EntityRef::Vehicle(vehicle.id),
        state: vehicle.state.name(),
        event: on,
    })?;
    match target {
        Target::Fixed(next) => Ok(*next),
        Target::Guarded(arms) => arms
            .iter()
            .find(|(g, _)| vehicle_guard_holds(*g, vehicle))
            .map(|(_, next)| *next)
            .ok_or(FsmError::NoGuardMatched {
                entity: EntityRef::Vehicle(vehicle.id),
                state: vehicle.state.name(),
                event: on,
            }),
    }
}

// ── Leg machine ───────────────────────────────────────────────────────────────

/// Legs have no guarded transitions; the guard type is uninhabited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegGuard {}

/// `Release → Assigned → Ready → Onboard → Complete`.
///
/// Re-assignment (`Assigned` on a second `LegAssigned`) is legal: a later
/// checkpoint may move a not-yet-ready leg to a better vehicle.
static LEG_RULES: &[Rule<LegState, LegGuard>] = &[
    Rule {
        from: LegState::Release,
        on: EventClass::LegAssigned,
        to: Target::Fixed(LegState::Assigned),
    },
    Rule {
        from: LegState::Assigned,
        on: EventClass::LegAssigned,
        to: Target::Fixed(LegState::Assigned),
    },
    Rule {
        from: LegState::Assigned,
        on: EventClass::LegReady,
        to: Target::Fixed(LegState::Ready),
    },
    Rule {
        from: LegState::Ready,
        on: EventClass::LegBoarded,
        to: Target::Fixed(LegState::Onboard),
    },
    Rule {
        from: LegState::Onboard,
        on: EventClass::LegAlighted,
        to: Target::Fixed(LegState::Complete),
    },
];

/// Advance a leg's state machine for `on`.
pub fn leg_transition(leg: &Leg, on: EventClass) -> Result<LegState, FsmError> {
    let target = lookup(LEG_RULES, leg.state, on).ok_or(FsmError::InvalidTransition {
        entity: EntityRef::Leg(leg.id),
        state: leg.state.name(),
        event: on,
    })?;
    match target {
        Target::Fixed(next) => Ok(*next),
        Target::Guarded(_) => unreachable!("leg rules have no guarded targets"),
    }
}

// ── Trip machine ──────────────────────────────────────────────────────────────

/// Guards over live trip data, evaluated with the state of the trip's *next*
/// leg (if any) supplied by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TripGuard {
    /// The current leg is the last one.
    NoNextLeg,
    /// A further leg exists and the optimizer has already assigned it.
    NextLegAssigned,
    /// A further leg exists but still awaits assignment.
    NextLegUnassigned,
}

fn trip_guard_holds(guard: TripGuard, trip: &Trip, next_leg_state: Option<LegState>) -> bool {
    match guard {
        TripGuard::NoNextLeg => !trip.has_next_legs(),
        TripGuard::NextLegAssigned => {
            trip.has_next_legs() && next_leg_state.is_some_and(|s| s != LegState::Release)
        }
        TripGuard::NextLegUnassigned => {
            trip.has_next_legs() && next_leg_state == Some(LegState::Release)
        }
    }
}

/// A trip mirrors its current leg, with the guarded loop out of `Onboard`:
/// with a connection remaining, the trip re-enters `Assigned` (connection
/// already assigned) or `Release` (awaiting the next checkpoint) instead of
/// completing.
static TRIP_RULES: &[Rule<LegState, TripGuard>] = &[
    Rule {
        from: LegState::Release,
        on: EventClass::LegAssigned,
        to: Target::Fixed(LegState::Assigned),
    },
    Rule {
        from: LegState::Assigned,
        on: EventClass::LegAssigned,
        to: Target::Fixed(LegState::Assigned),
    },
    Rule {
        from: LegState::Assigned,
        on: EventClass::LegReady,
        to: Target::Fixed(LegState::Ready),
    },
    Rule {
        from: LegState::Ready,
        on: EventClass::LegBoarded,
        to: Target::Fixed(LegState::Onboard),
    },
    Rule {
        from: LegState::Onboard,
        on: EventClass::LegAlighted,
        to: Target::Guarded(&[
            (TripGuard::NoNextLeg, LegState::Complete),
            (TripGuard::NextLegAssigned, LegState::Assigned),
            (TripGuard::NextLegUnassigned, LegState::Release),
        ]),
    },
];

/// Advance a trip's state machine for an event targeting its current leg.
///
/// `next_leg_state` is the live state of the trip's next leg, or `None` if
/// the current leg is the last.
pub fn trip_transition(
    trip: &Trip,
    next_leg_state: Option<LegState>,
    on: EventClass,
) -> Result<LegState, FsmError> {
    let target = lookup(TRIP_RULES, trip.state, on).ok_or(FsmError::InvalidTransition {
        entity: EntityRef::Trip(trip.id),
        state: trip.state.name(),
        event: on,
    })?;
    match target {
        Target::Fixed(next) => Ok(*next),
        Target::Guarded(arms) => arms
            .iter()
            .find(|(g, _)| trip_guard_holds(*g, trip, next_leg_state))
            .map(|(_, next)| *next)
            .ok_or(FsmError::NoGuardMatched {
                entity: EntityRef::Trip(trip.id),
                state: trip.state.name(),
                event: on,
            }),
    }
}
