//! Unit tests for feasibility search and the built-in dispatchers.

use std::sync::Arc;

use mmt_core::{LegId, NodeId, SimClock, SimTime, VehicleId};
use mmt_model::{Environment, Route, Stop};
use mmt_network::TransitNetwork;

use crate::{Decision, Dispatcher, EarliestArrivalDispatcher, FirstFeasibleDispatcher, NoopDispatcher};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn stop(node: u32, arrival: u64, departure: u64) -> Stop {
    Stop::new(NodeId(node), SimTime(arrival), SimTime(departure))
}

/// Environment with two vehicles over nodes 0→1→2:
/// - vehicle 0: slow (arrives node 2 at t=200)
/// - vehicle 1: fast (arrives node 2 at t=90) but starts later
/// and one released single-leg trip 0→2.
fn two_vehicle_env() -> Environment {
    let mut env = Environment::new(SimClock::new(0), Arc::new(TransitNetwork::empty()));
    env.add_vehicle(
        Route::new(vec![stop(0, 0, 10), stop(1, 100, 110), stop(2, 200, 200)]).unwrap(),
    );
    env.add_vehicle(Route::new(vec![stop(0, 20, 30), stop(2, 90, 90)]).unwrap());
    env.add_trip(SimTime(0), &[(NodeId(0), NodeId(2))]).unwrap();
    env
}

#[cfg(test)]
mod feasibility {
    use super::*;

    #[test]
    fn infeasible_when_destination_is_behind_boarding() {
        let mut env = Environment::new(SimClock::new(0), Arc::new(TransitNetwork::empty()));
        // Route visits 2 before 0 — leg 0→2 cannot be served.
        env.add_vehicle(Route::new(vec![stop(2, 0, 0), stop(0, 50, 50)]).unwrap());
        env.add_trip(SimTime(0), &[(NodeId(0), NodeId(2))]).unwrap();

        let snap = env.freeze(SimTime(0));
        let decisions = FirstFeasibleDispatcher.dispatch(&snap).unwrap();
        assert!(decisions.is_empty());
    }

    #[test]
    fn boarding_respects_assignable_index() {
        let env = two_vehicle_env();
        // Horizon past vehicle 0's node-0 departure: its only boarding stop
        // for the leg is frozen, so only vehicle 1 remains feasible.
        let snap = env.freeze(SimTime(15));
        let decisions = FirstFeasibleDispatcher.dispatch(&snap).unwrap();
        assert_eq!(decisions.len(), 1);
        assert_eq!(decisions[0].vehicle, VehicleId(1));
    }
}

#[cfg(test)]
mod builtins {
    use super::*;

    #[test]
    fn noop_assigns_nothing() {
        let env = two_vehicle_env();
        let snap = env.freeze(SimTime(0));
        assert!(NoopDispatcher.dispatch(&snap).unwrap().is_empty());
    }

    #[test]
    fn first_feasible_takes_snapshot_order() {
        let env = two_vehicle_env();
        let snap = env.freeze(SimTime(0));
        let decisions = FirstFeasibleDispatcher.dispatch(&snap).unwrap();
        assert_eq!(
            decisions,
            vec![Decision {
                leg: LegId(0),
                vehicle: VehicleId(0),
                insert_at: 0,
            }]
        );
    }

    #[test]
    fn earliest_arrival_prefers_the_fast_vehicle() {
        let env = two_vehicle_env();
        let snap = env.freeze(SimTime(0));
        let decisions = EarliestArrivalDispatcher.dispatch(&snap).unwrap();
        assert_eq!(decisions.len(), 1);
        assert_eq!(decisions[0].vehicle, VehicleId(1));
    }

    #[test]
    fn dispatchers_are_deterministic() {
        let env = two_vehicle_env();
        let snap = env.freeze(SimTime(0));
        let a = EarliestArrivalDispatcher.dispatch(&snap).unwrap();
        let b = EarliestArrivalDispatcher.dispatch(&snap).unwrap();
        assert_eq!(a, b);
    }
}
