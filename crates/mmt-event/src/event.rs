//! The `Event` type and its kind/priority taxonomy.

use std::cmp::Ordering;
use std::fmt;

use mmt_core::{LegId, SimTime, TripId, VehicleId};

// ── EventKind ─────────────────────────────────────────────────────────────────

/// The tagged union of everything that can happen in the simulation.
///
/// Each variant carries the id of the entity it targets.  The driver
/// dispatches on this enum in a single `match`; there is no dynamic dispatch
/// on entity classes anywhere in the kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EventKind {
    /// A vehicle enters service and is placed at the first stop of its route.
    VehicleRelease { vehicle: VehicleId },
    /// A vehicle opens its doors for boarding at the current stop.
    VehicleBoarding { vehicle: VehicleId },
    /// A vehicle leaves the current stop for the next one.
    VehicleDeparture { vehicle: VehicleId },
    /// A vehicle reaches the next stop of its route.
    VehicleArrival { vehicle: VehicleId },
    /// A vehicle has exhausted its route and leaves service.
    VehicleComplete { vehicle: VehicleId },

    /// A passenger trip (and its legs) enters the system.
    TripRelease { trip: TripId },
    /// The optimizer assigned a leg to a vehicle, boarding at the stop with
    /// index `insert_at` in that vehicle's route.
    LegAssigned {
        leg: LegId,
        vehicle: VehicleId,
        insert_at: usize,
    },
    /// The passenger is waiting at the leg's boarding stop.
    LegReady { leg: LegId },
    /// The passenger boarded the assigned vehicle.
    LegBoarded { leg: LegId },
    /// The passenger alighted at the leg's alighting stop.
    LegAlighted { leg: LegId },
}

/// An `EventKind` with its payload stripped — the key the state-machine
/// transition tables are indexed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EventClass {
    VehicleRelease,
    VehicleBoarding,
    VehicleDeparture,
    VehicleArrival,
    VehicleComplete,
    TripRelease,
    LegAssigned,
    LegReady,
    LegBoarded,
    LegAlighted,
}

/// Which entity an event targets, for dispatch and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EntityRef {
    Vehicle(VehicleId),
    Trip(TripId),
    Leg(LegId),
}

// Priority classes, lower value = processed first at equal timestamps.
// The relative order matters: a vehicle must arrive (and let passengers
// alight) before it departs again, and assignments land after all physical
// events at the same instant.
const PRIO_RELEASE: u8 = 0;
const PRIO_ARRIVAL: u8 = 1;
const PRIO_ALIGHT: u8 = 2;
const PRIO_COMPLETE: u8 = 3;
const PRIO_READY: u8 = 4;
const PRIO_DEPARTURE: u8 = 5;
const PRIO_BOARDING: u8 = 6;
const PRIO_ASSIGN: u8 = 7;

impl EventKind {
    /// The payload-free class used as the transition-table key.
    pub fn class(&self) -> EventClass {
        match self {
            EventKind::VehicleRelease { .. } => EventClass::VehicleRelease,
            EventKind::VehicleBoarding { .. } => EventClass::VehicleBoarding,
            EventKind::VehicleDeparture { .. } => EventClass::VehicleDeparture,
            EventKind::VehicleArrival { .. } => EventClass::VehicleArrival,
            EventKind::VehicleComplete { .. } => EventClass::VehicleComplete,
            EventKind::TripRelease { .. } => EventClass::TripRelease,
            EventKind::LegAssigned { .. } => EventClass::LegAssigned,
            EventKind::LegReady { .. } => EventClass::LegReady,
            EventKind::LegBoarded { .. } => EventClass::LegBoarded,
            EventKind::LegAlighted { .. } => EventClass::LegAlighted,
        }
    }

    /// Default priority for this kind of event.
    pub fn priority(&self) -> u8 {
        match self.class() {
            EventClass::VehicleRelease | EventClass::TripRelease => PRIO_RELEASE,
            EventClass::VehicleArrival => PRIO_ARRIVAL,
            EventClass::LegAlighted => PRIO_ALIGHT,
            EventClass::VehicleComplete => PRIO_COMPLETE,
            EventClass::LegReady => PRIO_READY,
            EventClass::VehicleDeparture => PRIO_DEPARTURE,
            EventClass::VehicleBoarding | EventClass::LegBoarded => PRIO_BOARDING,
            EventClass::LegAssigned => PRIO_ASSIGN,
        }
    }

    /// The entity this event targets.
    pub fn entity(&self) -> EntityRef {
        match *self {
            EventKind::VehicleRelease { vehicle }
            | EventKind::VehicleBoarding { vehicle }
            | EventKind::VehicleDeparture { vehicle }
            | EventKind::VehicleArrival { vehicle }
            | EventKind::VehicleComplete { vehicle } => EntityRef::Vehicle(vehicle),
            EventKind::TripRelease { trip } => EntityRef::Trip(trip),
            EventKind::LegAssigned { leg, .. }
            | EventKind::LegReady { leg }
            | EventKind::LegBoarded { leg }
            | EventKind::LegAlighted { leg } => EntityRef::Leg(leg),
        }
    }

    /// Short stable label for logs and output rows.
    pub fn label(&self) -> &'static str {
        match self.class() {
            EventClass::VehicleRelease => "vehicle_release",
            EventClass::VehicleBoarding => "vehicle_boarding",
            EventClass::VehicleDeparture => "vehicle_departure",
            EventClass::VehicleArrival => "vehicle_arrival",
            EventClass::VehicleComplete => "vehicle_complete",
            EventClass::TripRelease => "trip_release",
            EventClass::LegAssigned => "leg_assigned",
            EventClass::LegReady => "leg_ready",
            EventClass::LegBoarded => "leg_boarded",
            EventClass::LegAlighted => "leg_alighted",
        }
    }
}

// ── Event ─────────────────────────────────────────────────────────────────────

/// One scheduled occurrence, immutable once created and consumed exactly once.
///
/// `sequence` is stamped by the [`EventQueue`][crate::EventQueue] at push
/// time; it never repeats within a run and serves only as the final
/// tie-break of the ordering key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Event {
    pub time: SimTime,
    pub priority: u8,
    pub sequence: u64,
    pub kind: EventKind,
}

impl Ord for Event {
    /// Lexicographic `(time, priority, sequence)`.  `sequence` is unique per
    /// queue, so two distinct events never compare equal.
    fn cmp(&self, other: &Self) -> Ordering {
        self.time
            .cmp(&other.time)
            .then_with(|| self.priority.cmp(&other.priority))
            .then_with(|| self.sequence.cmp(&other.sequence))
    }
}

impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{} (#{})", self.kind.label(), self.time, self.sequence)
    }
}
