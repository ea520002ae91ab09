//! The live environment and its frozen snapshots.

use std::sync::Arc;

use mmt_core::{CoreError, LegId, NodeId, SimClock, SimTime, TripId, VehicleId};
use mmt_network::TransitNetwork;

use crate::{Leg, LegState, ModelResult, Route, Trip, Vehicle};

// ── Environment ───────────────────────────────────────────────────────────────

/// The mutable world: current simulation time, all vehicles, all trips and
/// legs, and the (read-only) network topology.
///
/// There is exactly one `Environment` per run, owned by the driver and passed
/// explicitly wherever it is needed.  Event handlers are the only code that
/// mutates it; observers and the optimizer see it through `&` or through a
/// frozen [`Snapshot`].
pub struct Environment {
    pub clock: SimClock,
    pub network: Arc<TransitNetwork>,
    vehicles: Vec<Vehicle>,
    trips: Vec<Trip>,
    legs: Vec<Leg>,
}

impl Environment {
    pub fn new(clock: SimClock, network: Arc<TransitNetwork>) -> Self {
        Self {
            clock,
            network,
            vehicles: Vec::new(),
            trips: Vec::new(),
            legs: Vec::new(),
        }
    }

    #[inline]
    pub fn now(&self) -> SimTime {
        self.clock.now
    }

    // ── Entity registration ───────────────────────────────────────────────
    //
    // Ids are allocated densely so they double as Vec indexes; all entity
    // creation funnels through these two methods.

    /// Register a vehicle with the given route.  Returns its id.
    pub fn add_vehicle(&mut self, route: Route) -> VehicleId {
        let id = VehicleId(self.vehicles.len() as u32);
        self.vehicles.push(Vehicle::new(id, route));
        id
    }

    /// Register a trip from its ordered `(board, alight)` node pairs.
    ///
    /// Creates one leg per pair in the flat leg table.  Rejects an empty
    /// decomposition.
    pub fn add_trip(
        &mut self,
        release_time: SimTime,
        segments: &[(NodeId, NodeId)],
    ) -> ModelResult<TripId> {
        let trip_id = TripId(self.trips.len() as u32);
        let mut leg_ids = Vec::with_capacity(segments.len());
        for &(origin, destination) in segments {
            let leg_id = LegId(self.legs.len() as u32);
            self.legs.push(Leg::new(leg_id, trip_id, origin, destination));
            leg_ids.push(leg_id);
        }
        // Trip::new rejects the zero-leg case before any leg is referenced.
        let trip = Trip::new(trip_id, release_time, leg_ids)?;
        self.trips.push(trip);
        Ok(trip_id)
    }

    // ── Entity access ─────────────────────────────────────────────────────

    pub fn vehicle(&self, id: VehicleId) -> ModelResult<&Vehicle> {
        self.vehicles
            .get(id.index())
            .ok_or_else(|| CoreError::VehicleNotFound(id).into())
    }

    pub fn vehicle_mut(&mut self, id: VehicleId) -> ModelResult<&mut Vehicle> {
        self.vehicles
            .get_mut(id.index())
            .ok_or_else(|| CoreError::VehicleNotFound(id).into())
    }

    pub fn trip(&self, id: TripId) -> ModelResult<&Trip> {
        self.trips
            .get(id.index())
            .ok_or_else(|| CoreError::TripNotFound(id).into())
    }

    pub fn trip_mut(&mut self, id: TripId) -> ModelResult<&mut Trip> {
        self.trips
            .get_mut(id.index())
            .ok_or_else(|| CoreError::TripNotFound(id).into())
    }

    pub fn leg(&self, id: LegId) -> ModelResult<&Leg> {
        self.legs
            .get(id.index())
            .ok_or_else(|| CoreError::LegNotFound(id).into())
    }

    pub fn leg_mut(&mut self, id: LegId) -> ModelResult<&mut Leg> {
        self.legs
            .get_mut(id.index())
            .ok_or_else(|| CoreError::LegNotFound(id).into())
    }

    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub fn trips(&self) -> &[Trip] {
        &self.trips
    }

    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }

    pub fn vehicle_count(&self) -> usize {
        self.vehicles.len()
    }

    pub fn trip_count(&self) -> usize {
        self.trips.len()
    }

    pub fn leg_count(&self) -> usize {
        self.legs.len()
    }

    /// `true` once every vehicle and every trip has reached `Complete`.
    pub fn all_terminal(&self) -> bool {
        self.vehicles.iter().all(|v| v.state.is_terminal())
            && self.trips.iter().all(|t| t.state.is_terminal())
    }

    // ── Freezing ──────────────────────────────────────────────────────────

    /// Take an immutable, deep, point-in-time copy restricted to the decision
    /// horizon.
    ///
    /// Included are non-terminal vehicles that still have a stop departing at
    /// or after `horizon` (with the index of the first such stop — the
    /// earliest insertion point the optimizer may use), and legs that are
    /// released but not yet assigned.  Everything committed to happen inside
    /// `[now, horizon)` is invisible to the dispatcher by construction.
    pub fn freeze(&self, horizon: SimTime) -> Snapshot {
        let vehicles = self
            .vehicles
            .iter()
            .filter(|v| !v.state.is_terminal())
            .filter_map(|v| {
                v.route.first_stop_from(horizon).map(|idx| SnapshotVehicle {
                    vehicle: v.clone(),
                    assignable_from: idx,
                })
            })
            .collect();

        let legs = self
            .legs
            .iter()
            .filter(|l| l.state == LegState::Release)
            .filter(|l| self.trips[l.trip.index()].release_time <= self.clock.now)
            .cloned()
            .collect();

        Snapshot {
            taken_at: self.clock.now,
            horizon,
            vehicles,
            legs,
            network: Arc::clone(&self.network),
        }
    }
}

// ── Snapshot ──────────────────────────────────────────────────────────────────

/// A frozen, independently owned copy of the assignable part of the world.
///
/// Never aliases live state: dispatchers may hold it across the checkpoint
/// (including on worker threads) without observing mutation.
pub struct Snapshot {
    /// Simulation time at which the snapshot was taken.
    pub taken_at: SimTime,
    /// `taken_at + freeze_interval`; nothing before this may be altered.
    pub horizon: SimTime,
    pub vehicles: Vec<SnapshotVehicle>,
    /// Released, unassigned legs awaiting a vehicle.
    pub legs: Vec<Leg>,
    pub network: Arc<TransitNetwork>,
}

/// One vehicle in a snapshot, with the earliest route index the optimizer is
/// allowed to touch.
pub struct SnapshotVehicle {
    pub vehicle: Vehicle,
    /// Index of the first stop departing at or after the horizon.
    pub assignable_from: usize,
}

impl Snapshot {
    pub fn vehicle(&self, id: VehicleId) -> Option<&SnapshotVehicle> {
        self.vehicles.iter().find(|sv| sv.vehicle.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.legs.is_empty() || self.vehicles.is_empty()
    }
}
