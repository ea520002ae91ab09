//! Assignment decisions and feasibility search.

use mmt_core::{LegId, SimTime, VehicleId};
use mmt_model::{Leg, SnapshotVehicle};

// ── Decision ──────────────────────────────────────────────────────────────────

/// One leg→vehicle assignment produced by a dispatcher.
///
/// `insert_at` is the index of the boarding stop in the vehicle's route; the
/// alighting stop is re-derived by the assignment handler (the first later
/// stop at the leg's destination), so a decision stays valid even if other
/// decisions touch the same route first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub leg: LegId,
    pub vehicle: VehicleId,
    pub insert_at: usize,
}

impl Decision {
    /// The first feasible insertion of `leg` into `candidate`'s route, if any.
    pub fn first_feasible(leg: &Leg, candidate: &SnapshotVehicle) -> Option<Decision> {
        feasible_insertions(leg, candidate).next().map(|(d, _)| d)
    }
}

/// All feasible insertions of `leg` into `candidate`'s route, in route order.
///
/// An insertion is feasible when the route has a stop at the leg's origin at
/// or after the vehicle's assignable index, followed by a stop at the leg's
/// destination.  Yields `(boarding_index, alighting_arrival)` pairs wrapped
/// as [`Decision`]s with their ride's arrival time for ranking.
pub fn feasible_insertions<'a>(
    leg: &'a Leg,
    candidate: &'a SnapshotVehicle,
) -> impl Iterator<Item = (Decision, SimTime)> + 'a {
    let stops = candidate.vehicle.route.stops();
    let from = candidate.assignable_from;

    (from..stops.len())
        .filter(move |&i| stops[i].location == leg.origin)
        .filter_map(move |i| {
            candidate
                .vehicle
                .route
                .find_stop_at(leg.destination, i)
                .map(|j| {
                    (
                        Decision {
                            leg: leg.id,
                            vehicle: candidate.vehicle.id,
                            insert_at: i,
                        },
                        stops[j].arrival,
                    )
                })
        })
}
