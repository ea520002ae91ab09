//! Built-in dispatchers.
//!
//! These cover testing and baseline-comparison needs; production scenarios
//! plug in their own [`Dispatcher`] implementations.

use mmt_model::Snapshot;

use crate::{Decision, DispatchResult, Dispatcher, feasible_insertions};

// ── NoopDispatcher ────────────────────────────────────────────────────────────

/// Assigns nothing, ever.  Legs stay released until the run drains.
pub struct NoopDispatcher;

impl Dispatcher for NoopDispatcher {
    fn dispatch(&self, _snapshot: &Snapshot) -> DispatchResult<Vec<Decision>> {
        Ok(vec![])
    }

    fn name(&self) -> &'static str {
        "noop"
    }
}

// ── FirstFeasibleDispatcher ───────────────────────────────────────────────────

/// Assigns each leg to the first vehicle (in snapshot order) whose remaining
/// route serves the leg's origin and then its destination.
///
/// Intentionally naive — it is the deterministic baseline the scenario tests
/// are written against.
pub struct FirstFeasibleDispatcher;

impl Dispatcher for FirstFeasibleDispatcher {
    fn dispatch(&self, snapshot: &Snapshot) -> DispatchResult<Vec<Decision>> {
        let decisions = snapshot
            .legs
            .iter()
            .filter_map(|leg| {
                snapshot
                    .vehicles
                    .iter()
                    .find_map(|sv| Decision::first_feasible(leg, sv))
            })
            .collect();
        Ok(decisions)
    }

    fn name(&self) -> &'static str {
        "first_feasible"
    }
}

// ── EarliestArrivalDispatcher ─────────────────────────────────────────────────

/// Assigns each leg to the feasible insertion with the earliest alighting
/// arrival, ranked over every vehicle in the subset.
///
/// Ties resolve to the lower vehicle id and then the earlier boarding index,
/// keeping runs reproducible.
pub struct EarliestArrivalDispatcher;

impl Dispatcher for EarliestArrivalDispatcher {
    fn dispatch(&self, snapshot: &Snapshot) -> DispatchResult<Vec<Decision>> {
        let decisions = snapshot
            .legs
            .iter()
            .filter_map(|leg| {
                snapshot
                    .vehicles
                    .iter()
                    .flat_map(|sv| feasible_insertions(leg, sv))
                    .min_by_key(|(d, arrival)| (*arrival, d.vehicle, d.insert_at))
                    .map(|(d, _)| d)
            })
            .collect();
        Ok(decisions)
    }

    fn name(&self) -> &'static str {
        "earliest_arrival"
    }
}
