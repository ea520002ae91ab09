//! Unit tests for routes, trips, state machines, and the environment.

use std::sync::Arc;

use mmt_core::{LegId, NodeId, SimClock, SimTime, VehicleId};
use mmt_event::EventClass;
use mmt_network::TransitNetwork;

use crate::fsm::{self, FsmError};
use crate::{Environment, Leg, LegState, ModelError, Route, Stop, Trip, Vehicle, VehicleState};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn stop(node: u32, arrival: u64, departure: u64) -> Stop {
    Stop::new(NodeId(node), SimTime(arrival), SimTime(departure))
}

/// Route `[A@0-0, B@10-12, C@20-20]`.
fn three_stop_route() -> Route {
    Route::new(vec![stop(0, 0, 0), stop(1, 10, 12), stop(2, 20, 20)]).unwrap()
}

fn test_env() -> Environment {
    Environment::new(SimClock::new(0), Arc::new(TransitNetwork::empty()))
}

// ── Route ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod route {
    use super::*;

    #[test]
    fn empty_route_rejected() {
        assert!(matches!(Route::new(vec![]), Err(ModelError::EmptyRoute)));
    }

    #[test]
    fn decreasing_times_rejected() {
        let err = Route::new(vec![stop(0, 10, 10), stop(1, 5, 6)]).unwrap_err();
        assert!(matches!(err, ModelError::NonMonotonicRoute { index: 1 }));
    }

    #[test]
    fn departure_before_arrival_rejected() {
        let err = Route::new(vec![stop(0, 10, 9)]).unwrap_err();
        assert!(matches!(err, ModelError::NonMonotonicRoute { index: 0 }));
    }

    #[test]
    fn cursor_advances_monotonically() {
        let mut route = three_stop_route();
        assert!(route.current_stop().is_none());
        assert_eq!(route.next_stops().len(), 3);

        route.start();
        assert_eq!(route.current_index(), Some(0));
        assert_eq!(route.next_stops().len(), 2);
        assert!(!route.is_exhausted());

        assert_eq!(route.advance().unwrap().location, NodeId(1));
        assert_eq!(route.advance().unwrap().location, NodeId(2));
        assert!(route.is_exhausted());
        assert!(route.advance().is_none());
        assert_eq!(route.current_index(), Some(2));
    }

    #[test]
    fn first_stop_from_respects_horizon() {
        let route = three_stop_route();
        assert_eq!(route.first_stop_from(SimTime(0)), Some(0));
        assert_eq!(route.first_stop_from(SimTime(5)), Some(1));
        assert_eq!(route.first_stop_from(SimTime(13)), Some(2));
        assert_eq!(route.first_stop_from(SimTime(21)), None);
    }

    #[test]
    fn find_stop_at_searches_after_boarding() {
        let route = three_stop_route();
        assert_eq!(route.find_stop_at(NodeId(2), 0), Some(2));
        assert_eq!(route.find_stop_at(NodeId(0), 0), None); // behind
    }
}

// ── Trip invariant ────────────────────────────────────────────────────────────

#[cfg(test)]
mod trip {
    use super::*;
    use mmt_core::TripId;

    #[test]
    fn zero_leg_trip_rejected() {
        let err = Trip::new(TripId(0), SimTime::ZERO, vec![]).unwrap_err();
        assert!(matches!(err, ModelError::EmptyTrip(_)));
    }

    #[test]
    fn decomposition_order_is_preserved_across_advances() {
        let legs = vec![LegId(0), LegId(1), LegId(2)];
        let mut trip = Trip::new(TripId(0), SimTime::ZERO, legs.clone()).unwrap();

        // previous ++ current ++ next must equal the decomposition at every step.
        assert_eq!(trip.all_legs(), legs);
        assert_eq!(trip.current_leg(), Some(LegId(0)));
        assert!(trip.has_next_legs());

        assert_eq!(trip.advance_leg(), Some(LegId(1)));
        assert_eq!(trip.all_legs(), legs);
        assert_eq!(trip.previous_legs(), &[LegId(0)]);

        assert_eq!(trip.advance_leg(), Some(LegId(2)));
        assert!(!trip.has_next_legs());

        assert_eq!(trip.advance_leg(), None);
        assert_eq!(trip.all_legs(), legs);
        assert_eq!(trip.leg_count(), 3);
    }
}

// ── Vehicle state machine ─────────────────────────────────────────────────────

#[cfg(test)]
mod vehicle_fsm {
    use super::*;

    fn vehicle_at(state: VehicleState, advance_to_last: bool) -> Vehicle {
        let mut v = Vehicle::new(VehicleId(0), three_stop_route());
        v.route.start();
        if advance_to_last {
            while v.route.advance().is_some() {}
        }
        v.state = state;
        v
    }

    #[test]
    fn full_cycle() {
        let v = vehicle_at(VehicleState::Release, false);
        let s = fsm::vehicle_transition(&v, EventClass::VehicleBoarding).unwrap();
        assert_eq!(s, VehicleState::Boarding);

        let v = vehicle_at(VehicleState::Boarding, false);
        let s = fsm::vehicle_transition(&v, EventClass::VehicleDeparture).unwrap();
        assert_eq!(s, VehicleState::Enroute);

        let v = vehicle_at(VehicleState::Enroute, false);
        let s = fsm::vehicle_transition(&v, EventClass::VehicleArrival).unwrap();
        assert_eq!(s, VehicleState::Alighting);
    }

    #[test]
    fn alighting_exit_is_guarded_on_route() {
        // Mid-route: boarding again is legal, completing is not.
        let v = vehicle_at(VehicleState::Alighting, false);
        assert_eq!(
            fsm::vehicle_transition(&v, EventClass::VehicleBoarding).unwrap(),
            VehicleState::Boarding
        );
        assert!(matches!(
            fsm::vehicle_transition(&v, EventClass::VehicleComplete),
            Err(FsmError::NoGuardMatched { .. })
        ));

        // Last stop: only completing is legal.
        let v = vehicle_at(VehicleState::Alighting, true);
        assert_eq!(
            fsm::vehicle_transition(&v, EventClass::VehicleComplete).unwrap(),
            VehicleState::Complete
        );
        assert!(matches!(
            fsm::vehicle_transition(&v, EventClass::VehicleDeparture),
            Err(FsmError::NoGuardMatched { .. })
        ));
    }

    #[test]
    fn alighting_may_skip_straight_to_enroute() {
        let v = vehicle_at(VehicleState::Alighting, false);
        assert_eq!(
            fsm::vehicle_transition(&v, EventClass::VehicleDeparture).unwrap(),
            VehicleState::Enroute
        );
    }

    #[test]
    fn unmatched_event_is_invalid_transition() {
        let v = vehicle_at(VehicleState::Boarding, false);
        assert!(matches!(
            fsm::vehicle_transition(&v, EventClass::VehicleArrival),
            Err(FsmError::InvalidTransition { .. })
        ));

        let v = vehicle_at(VehicleState::Complete, false);
        assert!(matches!(
            fsm::vehicle_transition(&v, EventClass::VehicleBoarding),
            Err(FsmError::InvalidTransition { .. })
        ));
    }
}

// ── Leg and trip state machines ───────────────────────────────────────────────

#[cfg(test)]
mod passenger_fsm {
    use super::*;
    use mmt_core::TripId;

    fn leg_in(state: LegState) -> Leg {
        let mut leg = Leg::new(LegId(0), TripId(0), NodeId(0), NodeId(1));
        leg.state = state;
        leg
    }

    fn trip_in(state: LegState, leg_count: usize) -> Trip {
        let legs = (0..leg_count as u32).map(LegId).collect();
        let mut trip = Trip::new(TripId(0), SimTime::ZERO, legs).unwrap();
        trip.state = state;
        trip
    }

    #[test]
    fn leg_happy_path() {
        let steps = [
            (LegState::Release, EventClass::LegAssigned, LegState::Assigned),
            (LegState::Assigned, EventClass::LegReady, LegState::Ready),
            (LegState::Ready, EventClass::LegBoarded, LegState::Onboard),
            (LegState::Onboard, EventClass::LegAlighted, LegState::Complete),
        ];
        for (from, on, to) in steps {
            assert_eq!(fsm::leg_transition(&leg_in(from), on).unwrap(), to);
        }
    }

    #[test]
    fn leg_reassignment_is_legal() {
        let leg = leg_in(LegState::Assigned);
        assert_eq!(
            fsm::leg_transition(&leg, EventClass::LegAssigned).unwrap(),
            LegState::Assigned
        );
    }

    #[test]
    fn leg_out_of_order_event_is_invalid() {
        assert!(matches!(
            fsm::leg_transition(&leg_in(LegState::Release), EventClass::LegBoarded),
            Err(FsmError::InvalidTransition { .. })
        ));
        assert!(matches!(
            fsm::leg_transition(&leg_in(LegState::Complete), EventClass::LegAlighted),
            Err(FsmError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn trip_completes_on_final_leg() {
        let trip = trip_in(LegState::Onboard, 1);
        let s = fsm::trip_transition(&trip, None, EventClass::LegAlighted).unwrap();
        assert_eq!(s, LegState::Complete);
    }

    #[test]
    fn trip_with_assigned_connection_reenters_assigned() {
        let trip = trip_in(LegState::Onboard, 2);
        let s =
            fsm::trip_transition(&trip, Some(LegState::Assigned), EventClass::LegAlighted).unwrap();
        assert_eq!(s, LegState::Assigned);
    }

    #[test]
    fn trip_with_unassigned_connection_reenters_release() {
        let trip = trip_in(LegState::Onboard, 2);
        let s =
            fsm::trip_transition(&trip, Some(LegState::Release), EventClass::LegAlighted).unwrap();
        assert_eq!(s, LegState::Release);
    }
}

// ── Environment and freezing ──────────────────────────────────────────────────

#[cfg(test)]
mod env {
    use super::*;

    #[test]
    fn dense_id_allocation() {
        let mut env = test_env();
        let v0 = env.add_vehicle(three_stop_route());
        let v1 = env.add_vehicle(three_stop_route());
        assert_eq!((v0, v1), (VehicleId(0), VehicleId(1)));

        let t0 = env
            .add_trip(SimTime(5), &[(NodeId(0), NodeId(1)), (NodeId(1), NodeId(2))])
            .unwrap();
        let legs = env.trip(t0).unwrap().all_legs();
        assert_eq!(legs, vec![LegId(0), LegId(1)]);
        assert_eq!(env.leg(LegId(1)).unwrap().origin, NodeId(1));
    }

    #[test]
    fn zero_leg_trip_rejected_at_registration() {
        let mut env = test_env();
        assert!(env.add_trip(SimTime(0), &[]).is_err());
        assert_eq!(env.trip_count(), 0);
    }

    #[test]
    fn unknown_ids_error() {
        let env = test_env();
        assert!(env.vehicle(VehicleId(9)).is_err());
        assert!(env.leg(LegId(9)).is_err());
    }

    #[test]
    fn freeze_filters_by_horizon_and_state() {
        let mut env = test_env();
        env.add_vehicle(three_stop_route()); // departures at 0, 12, 20
        let done = env.add_vehicle(three_stop_route());
        env.vehicle_mut(done).unwrap().state = VehicleState::Complete;

        env.add_trip(SimTime(0), &[(NodeId(0), NodeId(1))]).unwrap();
        env.add_trip(SimTime(500), &[(NodeId(0), NodeId(2))]).unwrap(); // not yet released

        let snap = env.freeze(SimTime(15));
        // Terminal vehicle excluded; the live one is assignable from stop 2
        // (first departure >= 15).
        assert_eq!(snap.vehicles.len(), 1);
        assert_eq!(snap.vehicles[0].assignable_from, 2);
        // Only the released trip's leg is visible.
        assert_eq!(snap.legs.len(), 1);
        assert_eq!(snap.legs[0].id, LegId(0));
    }

    #[test]
    fn freeze_excludes_vehicles_entirely_inside_window() {
        let mut env = test_env();
        env.add_vehicle(three_stop_route());
        let snap = env.freeze(SimTime(100)); // beyond the last departure
        assert!(snap.vehicles.is_empty());
    }

    #[test]
    fn snapshot_is_independent_of_live_state() {
        let mut env = test_env();
        let v = env.add_vehicle(three_stop_route());
        env.add_trip(SimTime(0), &[(NodeId(0), NodeId(1))]).unwrap();

        let snap = env.freeze(SimTime(0));
        env.vehicle_mut(v).unwrap().state = VehicleState::Enroute;
        env.leg_mut(LegId(0)).unwrap().state = LegState::Assigned;

        assert_eq!(snap.vehicles[0].vehicle.state, VehicleState::Release);
        assert_eq!(snap.legs[0].state, LegState::Release);
    }

    #[test]
    fn all_terminal_tracks_both_fleets() {
        let mut env = test_env();
        let v = env.add_vehicle(three_stop_route());
        let t = env.add_trip(SimTime(0), &[(NodeId(0), NodeId(1))]).unwrap();
        assert!(!env.all_terminal());

        env.vehicle_mut(v).unwrap().state = VehicleState::Complete;
        assert!(!env.all_terminal());
        env.trip_mut(t).unwrap().state = LegState::Complete;
        assert!(env.all_terminal());
    }
}
