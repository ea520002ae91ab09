//! Event handler bodies — the apply half of the two-step protocol.
//!
//! By the time a handler runs, the target entity's state machine has already
//! been advanced for the event, so handlers only mutate rosters, move route
//! cursors, and schedule follow-up events.  All follow-ups are timestamped at
//! or after the current event's time, so the queue's causality guard can
//! never fire here in a healthy run.

use mmt_core::{LegId, SimTime, VehicleId};
use mmt_event::{EventKind, EventQueue};
use mmt_model::{Environment, LegState, ModelError, VehicleState};

use crate::SimResult;

/// Dispatch the handler body for `kind` at time `now`.
pub(crate) fn apply(
    env: &mut Environment,
    queue: &mut EventQueue,
    now: SimTime,
    kind: EventKind,
) -> SimResult<()> {
    match kind {
        EventKind::VehicleRelease { vehicle } => on_vehicle_release(env, queue, now, vehicle),
        EventKind::VehicleBoarding { vehicle } => on_vehicle_boarding(env, queue, vehicle),
        EventKind::VehicleDeparture { vehicle } => on_vehicle_departure(env, queue, vehicle),
        EventKind::VehicleArrival { vehicle } => on_vehicle_arrival(env, queue, now, vehicle),
        // Terminal; the state machine already parked the vehicle in Complete.
        EventKind::VehicleComplete { .. } => Ok(()),
        // Creation marker: the trip and its legs already exist in the
        // environment; the coordinator reacts to this event as a checkpoint
        // trigger.
        EventKind::TripRelease { .. } => Ok(()),
        EventKind::LegAssigned {
            leg,
            vehicle,
            insert_at,
        } => on_leg_assigned(env, queue, now, leg, vehicle, insert_at),
        EventKind::LegReady { leg } => on_leg_ready(env, queue, now, leg),
        EventKind::LegBoarded { leg } => on_leg_boarded(env, leg),
        EventKind::LegAlighted { leg } => on_leg_alighted(env, queue, now, leg),
    }
}

// ── Vehicle handlers ──────────────────────────────────────────────────────────

/// Place the vehicle at the first stop of its route and open for boarding,
/// or retire it immediately if the route has a single stop.
fn on_vehicle_release(
    env: &mut Environment,
    queue: &mut EventQueue,
    now: SimTime,
    vehicle: VehicleId,
) -> SimResult<()> {
    let v = env.vehicle_mut(vehicle)?;
    v.route.start();

    if v.route.is_exhausted() {
        queue.push(now, EventKind::VehicleComplete { vehicle })?;
    } else {
        queue.push(now, EventKind::VehicleBoarding { vehicle })?;
    }
    Ok(())
}

/// Doors open: schedule boarding for every leg already waiting at this stop,
/// then the departure.
fn on_vehicle_boarding(
    env: &mut Environment,
    queue: &mut EventQueue,
    vehicle: VehicleId,
) -> SimResult<()> {
    let v = env.vehicle(vehicle)?;
    // The Release→Boarding transition implies the cursor is placed.
    let stop_index = v.route.current_index().ok_or(ModelError::StopOutOfRange {
        vehicle,
        index: 0,
    })?;
    let stop = v.route.current_stop().ok_or(ModelError::StopOutOfRange {
        vehicle,
        index: stop_index,
    })?;
    let departure = stop.departure;
    let waiting = stop.boarding.clone();

    for leg_id in waiting {
        let leg = env.leg(leg_id)?;
        if leg.state == LegState::Ready && leg.boarding_stop == Some(stop_index) {
            queue.push(departure, EventKind::LegBoarded { leg: leg_id })?;
        }
        // Legs still Assigned here become Ready later; the LegReady handler
        // schedules their boarding while the vehicle is still at the stop.
    }

    queue.push(departure, EventKind::VehicleDeparture { vehicle })?;
    Ok(())
}

/// Doors closed: head for the next stop.
fn on_vehicle_departure(
    env: &mut Environment,
    queue: &mut EventQueue,
    vehicle: VehicleId,
) -> SimResult<()> {
    let v = env.vehicle(vehicle)?;
    // The Boarding→Enroute guard vetted that a next stop exists.
    let next = v
        .route
        .next_stops()
        .first()
        .ok_or(ModelError::StopOutOfRange {
            vehicle,
            index: v.route.len(),
        })?;
    queue.push(next.arrival, EventKind::VehicleArrival { vehicle })?;
    Ok(())
}

/// Advance to the reached stop, drop off its alighting legs, then either
/// open the doors again or retire.
fn on_vehicle_arrival(
    env: &mut Environment,
    queue: &mut EventQueue,
    now: SimTime,
    vehicle: VehicleId,
) -> SimResult<()> {
    let v = env.vehicle_mut(vehicle)?;
    let route_len = v.route.len();
    let stop = v.route.advance().ok_or(ModelError::StopOutOfRange {
        vehicle,
        index: route_len,
    })?;
    let alighting = stop.alighting.clone();
    let exhausted = v.route.is_exhausted();

    for leg_id in alighting {
        if env.leg(leg_id)?.state == LegState::Onboard {
            queue.push(now, EventKind::LegAlighted { leg: leg_id })?;
        }
    }

    if exhausted {
        queue.push(now, EventKind::VehicleComplete { vehicle })?;
    } else {
        queue.push(now, EventKind::VehicleBoarding { vehicle })?;
    }
    Ok(())
}

// ── Leg handlers ──────────────────────────────────────────────────────────────

/// Attach the leg to its vehicle's route rosters and, if it is the trip's
/// current leg, mark the passenger ready at the boarding stop.
fn on_leg_assigned(
    env: &mut Environment,
    queue: &mut EventQueue,
    now: SimTime,
    leg: LegId,
    vehicle: VehicleId,
    insert_at: usize,
) -> SimResult<()> {
    let destination = env.leg(leg)?.destination;

    // Reassignment: detach from the previous rosters first (the new
    // assignment may be the same vehicle at a different stop).
    let previous = env.leg(leg)?.assigned_vehicle;
    if let Some(old) = previous {
        let old_v = env.vehicle_mut(old)?;
        old_v.assigned_legs.retain(|&l| l != leg);
        for stop in 0..old_v.route.len() {
            if let Some(s) = old_v.route.stop_mut(stop) {
                s.boarding.retain(|&l| l != leg);
                s.alighting.retain(|&l| l != leg);
            }
        }
    }

    let v = env.vehicle_mut(vehicle)?;
    let alight_at =
        v.route
            .find_stop_at(destination, insert_at)
            .ok_or(ModelError::StopOutOfRange {
                vehicle,
                index: insert_at,
            })?;
    v.route
        .stop_mut(insert_at)
        .ok_or(ModelError::StopOutOfRange {
            vehicle,
            index: insert_at,
        })?
        .boarding
        .push(leg);
    v.route
        .stop_mut(alight_at)
        .ok_or(ModelError::StopOutOfRange {
            vehicle,
            index: alight_at,
        })?
        .alighting
        .push(leg);
    v.assigned_legs.push(leg);

    let trip_id = {
        let l = env.leg_mut(leg)?;
        l.assigned_vehicle = Some(vehicle);
        l.boarding_stop = Some(insert_at);
        l.alighting_stop = Some(alight_at);
        l.trip
    };

    // A current leg's passenger is already waiting (at the trip origin or
    // fresh off the previous leg); future legs become ready when their
    // predecessor alights.
    if env.trip(trip_id)?.current_leg() == Some(leg) {
        queue.push(now, EventKind::LegReady { leg })?;
    }
    Ok(())
}

/// Passenger is at the boarding stop: board now if the vehicle is there.
fn on_leg_ready(
    env: &mut Environment,
    queue: &mut EventQueue,
    now: SimTime,
    leg: LegId,
) -> SimResult<()> {
    let l = env.leg(leg)?;
    let vehicle_id = l.assigned_vehicle.ok_or(ModelError::LegUnassigned { leg })?;
    let boarding_stop = l.boarding_stop;

    let v = env.vehicle(vehicle_id)?;
    if v.route.current_index() != boarding_stop {
        // Vehicle not at the stop yet; its boarding handler collects the leg
        // on arrival.
        return Ok(());
    }
    let Some(stop) = v.route.current_stop() else {
        return Ok(());
    };

    match v.state {
        // Doors are open: board when they close.
        VehicleState::Boarding => {
            queue.push(stop.departure, EventKind::LegBoarded { leg })?;
        }
        // Zero-dwell stop: the departure was processed earlier this instant,
        // but the doors are considered open until the timestamp passes.
        VehicleState::Enroute if stop.departure == now => {
            queue.push(now, EventKind::LegBoarded { leg })?;
        }
        // Release/Alighting: a VehicleBoarding event for this stop is still
        // pending and will schedule the boarding.  Anything later is a missed
        // connection; the leg stays Ready at the stop.
        _ => {}
    }
    Ok(())
}

/// Move the passenger onto the vehicle.
fn on_leg_boarded(env: &mut Environment, leg: LegId) -> SimResult<()> {
    let vehicle = env
        .leg(leg)?
        .assigned_vehicle
        .ok_or(ModelError::LegUnassigned { leg })?;
    env.vehicle_mut(vehicle)?.board(leg);
    Ok(())
}

/// Drop the passenger off; advance the trip to its next leg, chaining the
/// connection if it is already assigned.
fn on_leg_alighted(
    env: &mut Environment,
    queue: &mut EventQueue,
    now: SimTime,
    leg: LegId,
) -> SimResult<()> {
    let (vehicle, trip_id) = {
        let l = env.leg(leg)?;
        (
            l.assigned_vehicle.ok_or(ModelError::LegUnassigned { leg })?,
            l.trip,
        )
    };
    env.vehicle_mut(vehicle)?.alight(leg);

    let trip = env.trip_mut(trip_id)?;
    let next = if trip.current_leg() == Some(leg) {
        trip.advance_leg()
    } else {
        None
    };
    if let Some(next) = next
        && env.leg(next)?.state != LegState::Release
    {
        // The connection is already assigned: the passenger heads straight
        // to its boarding stop.  Unassigned connections wait for the next
        // checkpoint; the LegAssigned handler then marks them ready.
        queue.push(now, EventKind::LegReady { leg: next })?;
    }
    Ok(())
}
