//! CSV loaders for vehicle timetables and trip requests.
//!
//! # Vehicle CSV format
//!
//! One row per scheduled stop, grouped by `vehicle_id` and ordered by
//! `stop_seq`:
//!
//! ```csv
//! vehicle_id,stop_seq,node_id,arrival_secs,departure_secs
//! 0,0,3,0,30
//! 0,1,7,600,630
//! 1,0,2,120,150
//! ```
//!
//! Vehicle ids are used only for grouping; routes are returned in ascending
//! `vehicle_id` order and the simulation builder assigns dense ids in that
//! order.
//!
//! # Trip CSV format
//!
//! One row per leg, grouped by `trip_id` and ordered by `leg_seq`; all rows
//! of a trip must agree on `release_secs`:
//!
//! ```csv
//! trip_id,leg_seq,board_node,alight_node,release_secs
//! 0,0,3,7,45
//! 1,0,3,5,60
//! 1,1,5,9,60
//! ```
//!
//! The geographic variant ([`load_trips_geo_reader`]) replaces the node
//! columns with `board_lat,board_lon,alight_lat,alight_lon` and snaps each
//! coordinate to the nearest network node.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use mmt_core::{NodeId, SimTime};
use mmt_model::{Route, Stop};
use mmt_network::{GeoPoint, TransitNetwork};

use crate::{LoadError, LoadResult};

// ── Records ───────────────────────────────────────────────────────────────────

/// One trip request ready for `SimBuilder::trip`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripRecord {
    pub release_time: SimTime,
    /// Ordered `(board, alight)` node pairs, one per leg.
    pub segments: Vec<(NodeId, NodeId)>,
}

#[derive(Deserialize)]
struct StopRow {
    vehicle_id: u32,
    stop_seq: u32,
    node_id: u32,
    arrival_secs: u64,
    departure_secs: u64,
}

#[derive(Deserialize)]
struct LegRow {
    trip_id: u32,
    leg_seq: u32,
    board_node: u32,
    alight_node: u32,
    release_secs: u64,
}

#[derive(Deserialize)]
struct GeoLegRow {
    trip_id: u32,
    leg_seq: u32,
    board_lat: f32,
    board_lon: f32,
    alight_lat: f32,
    alight_lon: f32,
    release_secs: u64,
}

// ── Vehicle loading ───────────────────────────────────────────────────────────

/// Load vehicle routes from a CSV file.
pub fn load_routes_csv(path: &Path) -> LoadResult<Vec<Route>> {
    let file = std::fs::File::open(path)?;
    load_routes_reader(file)
}

/// Like [`load_routes_csv`] but accepts any `Read` source.
pub fn load_routes_reader<R: Read>(reader: R) -> LoadResult<Vec<Route>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut by_vehicle: HashMap<u32, Vec<StopRow>> = HashMap::new();

    for row in csv_reader.deserialize() {
        let row: StopRow = row?;
        by_vehicle.entry(row.vehicle_id).or_default().push(row);
    }

    let mut ids: Vec<u32> = by_vehicle.keys().copied().collect();
    ids.sort_unstable();

    let mut routes = Vec::with_capacity(ids.len());
    for id in ids {
        let mut rows = by_vehicle.remove(&id).unwrap_or_default();
        rows.sort_unstable_by_key(|r| r.stop_seq);

        let stops: Vec<Stop> = rows
            .iter()
            .map(|r| {
                Stop::new(
                    NodeId(r.node_id),
                    SimTime(r.arrival_secs),
                    SimTime(r.departure_secs),
                )
            })
            .collect();
        // Route::new re-validates the timetable (non-decreasing times).
        routes.push(Route::new(stops)?);
    }
    Ok(routes)
}

// ── Trip loading ──────────────────────────────────────────────────────────────

/// Load trip requests from a CSV file.
pub fn load_trips_csv(path: &Path) -> LoadResult<Vec<TripRecord>> {
    let file = std::fs::File::open(path)?;
    load_trips_reader(file)
}

/// Like [`load_trips_csv`] but accepts any `Read` source.
pub fn load_trips_reader<R: Read>(reader: R) -> LoadResult<Vec<TripRecord>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut by_trip: HashMap<u32, Vec<LegRow>> = HashMap::new();

    for row in csv_reader.deserialize() {
        let row: LegRow = row?;
        by_trip.entry(row.trip_id).or_default().push(row);
    }

    let mut ids: Vec<u32> = by_trip.keys().copied().collect();
    ids.sort_unstable();

    let mut trips = Vec::with_capacity(ids.len());
    for id in ids {
        let mut rows = by_trip.remove(&id).unwrap_or_default();
        rows.sort_unstable_by_key(|r| r.leg_seq);

        let release = rows[0].release_secs;
        if rows.iter().any(|r| r.release_secs != release) {
            return Err(LoadError::Parse(format!(
                "trip {id}: rows disagree on release_secs"
            )));
        }

        trips.push(TripRecord {
            release_time: SimTime(release),
            segments: rows
                .iter()
                .map(|r| (NodeId(r.board_node), NodeId(r.alight_node)))
                .collect(),
        });
    }
    Ok(trips)
}

/// Load trip requests whose endpoints are geographic coordinates, snapping
/// each to the nearest node of `network`.
pub fn load_trips_geo_reader<R: Read>(
    reader: R,
    network: &TransitNetwork,
) -> LoadResult<Vec<TripRecord>> {
    let snap = |lat: f32, lon: f32| {
        network
            .nearest_node(GeoPoint::new(lat, lon))
            .ok_or_else(|| LoadError::Parse("cannot snap coordinates: network has no nodes".into()))
    };

    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut by_trip: HashMap<u32, Vec<GeoLegRow>> = HashMap::new();

    for row in csv_reader.deserialize() {
        let row: GeoLegRow = row?;
        by_trip.entry(row.trip_id).or_default().push(row);
    }

    let mut ids: Vec<u32> = by_trip.keys().copied().collect();
    ids.sort_unstable();

    let mut trips = Vec::with_capacity(ids.len());
    for id in ids {
        let mut rows = by_trip.remove(&id).unwrap_or_default();
        rows.sort_unstable_by_key(|r| r.leg_seq);

        let release = rows[0].release_secs;
        if rows.iter().any(|r| r.release_secs != release) {
            return Err(LoadError::Parse(format!(
                "trip {id}: rows disagree on release_secs"
            )));
        }

        let mut segments = Vec::with_capacity(rows.len());
        for r in &rows {
            segments.push((
                snap(r.board_lat, r.board_lon)?,
                snap(r.alight_lat, r.alight_lon)?,
            ));
        }
        trips.push(TripRecord {
            release_time: SimTime(release),
            segments,
        });
    }
    Ok(trips)
}
