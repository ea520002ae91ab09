//! Plain data row types written by output backends.

use mmt_event::{EntityRef, Event};
use mmt_optim::CheckpointReport;

/// One processed event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRow {
    pub time_secs: u64,
    pub unix_time_secs: i64,
    pub sequence: u64,
    /// Stable kind label, e.g. `vehicle_arrival`.
    pub kind: &'static str,
    /// `vehicle`, `trip`, or `leg`.
    pub entity_kind: &'static str,
    pub entity_id: u32,
}

impl EventRow {
    /// Flatten an event for output, anchored at `start_unix_secs`.
    pub fn from_event(event: &Event, start_unix_secs: i64) -> Self {
        let (entity_kind, entity_id) = match event.kind.entity() {
            EntityRef::Vehicle(v) => ("vehicle", v.0),
            EntityRef::Trip(t) => ("trip", t.0),
            EntityRef::Leg(l) => ("leg", l.0),
        };
        Self {
            time_secs: event.time.0,
            unix_time_secs: start_unix_secs + event.time.0 as i64,
            sequence: event.sequence,
            kind: event.kind.label(),
            entity_kind,
            entity_id,
        }
    }
}

/// One coordinator checkpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckpointRow {
    pub time_secs: u64,
    pub horizon_secs: u64,
    pub subsets: u64,
    pub decisions: u64,
    pub stale: u64,
    pub failed_subsets: u64,
    pub unassigned: u64,
}

impl From<&CheckpointReport> for CheckpointRow {
    fn from(report: &CheckpointReport) -> Self {
        Self {
            time_secs: report.at.0,
            horizon_secs: report.horizon.0,
            subsets: report.subsets as u64,
            decisions: report.decisions as u64,
            stale: report.stale as u64,
            failed_subsets: report.failed_subsets as u64,
            unassigned: report.unassigned as u64,
        }
    }
}
