//! The checkpoint algorithm: freeze, dispatch, re-inject.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use mmt_core::{LegId, SimTime, VehicleId};
use mmt_dispatch::{Decision, Dispatcher};
use mmt_event::{Event, EventClass, EventError, EventKind, EventQueue};
use mmt_model::{Environment, LegState, Snapshot};

use crate::Partition;

// ── Configuration ─────────────────────────────────────────────────────────────

/// When checkpoints fire and how far ahead the frozen window reaches.
#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    /// Width of the frozen window: decisions may only touch the world at or
    /// after `now + freeze_interval_secs`.
    pub freeze_interval_secs: u64,

    /// Fire a checkpoint whenever this much simulated time has passed since
    /// the last periodic one.  `None` disables periodic checkpoints.
    pub periodic_interval_secs: Option<u64>,

    /// Fire a checkpoint after every `TripRelease` event.
    pub on_trip_release: bool,
}

impl Default for CoordinatorConfig {
    /// Event-triggered checkpoints with no frozen lead time — the right
    /// setting for small timetabled scenarios where requests should be
    /// matched the moment they appear.
    fn default() -> Self {
        Self {
            freeze_interval_secs: 0,
            periodic_interval_secs: None,
            on_trip_release: true,
        }
    }
}

// ── StaleDecision ─────────────────────────────────────────────────────────────

/// Why a dispatcher decision was rejected at validation time.
///
/// Stale decisions are recoverable: the decision is discarded, the leg stays
/// unassigned for the next checkpoint, and the run continues.
#[derive(Debug, Error)]
pub enum StaleDecision {
    #[error("leg {0} does not exist")]
    UnknownLeg(LegId),

    #[error("leg {0} is no longer assignable (already assigned or completed)")]
    LegNotAssignable(LegId),

    #[error("vehicle {0} does not exist")]
    UnknownVehicle(VehicleId),

    #[error("vehicle {0} has already completed its route")]
    VehicleRetired(VehicleId),

    #[error("leg {leg} and vehicle {vehicle} live in different partition subsets")]
    CrossSubset { leg: LegId, vehicle: VehicleId },

    #[error("stop {index} of vehicle {vehicle} does not serve leg {leg}'s origin")]
    WrongBoardingStop {
        leg: LegId,
        vehicle: VehicleId,
        index: usize,
    },

    #[error("stop {index} of vehicle {vehicle} departs inside the frozen window")]
    FrozenInsertion { vehicle: VehicleId, index: usize },

    #[error("no stop after {index} serves leg {leg}'s destination")]
    NoAlightingStop { leg: LegId, index: usize },
}

// ── CheckpointReport ──────────────────────────────────────────────────────────

/// What one checkpoint did, surfaced to observers and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckpointReport {
    pub at: SimTime,
    pub horizon: SimTime,
    /// Number of dispatcher invocations (1 without a partition).
    pub subsets: usize,
    /// Decisions validated and converted into `LegAssigned` events.
    pub decisions: usize,
    /// Decisions rejected as stale and discarded.
    pub stale: usize,
    /// Subsets whose dispatcher invocation failed and was deferred.
    pub failed_subsets: usize,
    /// Snapshot legs left without a decision.
    pub unassigned: usize,
}

// ── Coordinator ───────────────────────────────────────────────────────────────

/// Periodically freezes the environment, invokes the dispatcher (per
/// partition subset when one is configured), and re-injects decisions as
/// future events.
///
/// Owns no entity state; the environment is borrowed per checkpoint, frozen,
/// and released before any event is pushed.
pub struct Coordinator<D: Dispatcher> {
    config: CoordinatorConfig,
    dispatcher: D,
    partition: Option<Partition>,
    /// Next periodic deadline; `None` when periodic checkpoints are off.
    next_periodic: Option<SimTime>,
}

impl<D: Dispatcher> Coordinator<D> {
    pub fn new(config: CoordinatorConfig, dispatcher: D) -> Self {
        let next_periodic = config.periodic_interval_secs.map(|_| SimTime::ZERO);
        Self {
            config,
            dispatcher,
            partition: None,
            next_periodic,
        }
    }

    /// Scope dispatch to the given (pre-validated) partition.
    pub fn with_partition(mut self, partition: Partition) -> Self {
        self.partition = Some(partition);
        self
    }

    pub fn partition(&self) -> Option<&Partition> {
        self.partition.as_ref()
    }

    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    /// Is a checkpoint due after `just_processed`?
    ///
    /// Called by the driver between events — the single point where control
    /// passes from event processing to optimization.
    pub fn should_run(&self, now: SimTime, just_processed: &Event) -> bool {
        if self.config.on_trip_release
            && just_processed.kind.class() == EventClass::TripRelease
        {
            return true;
        }
        matches!(self.next_periodic, Some(due) if now >= due)
    }

    /// Execute one checkpoint: freeze → dispatch per subset → validate →
    /// enqueue `LegAssigned` events at the horizon.
    ///
    /// Dispatcher failures and stale decisions are logged and counted in the
    /// report; only a queue-level causality error (a kernel bug, not a
    /// dispatcher bug) aborts.
    pub fn run_checkpoint(
        &mut self,
        env: &Environment,
        queue: &mut EventQueue,
    ) -> Result<CheckpointReport, EventError> {
        let now = env.now();
        let horizon = now.offset(self.config.freeze_interval_secs);

        if let (Some(interval), Some(due)) = (self.config.periodic_interval_secs, self.next_periodic)
            && now >= due
        {
            self.next_periodic = Some(now.offset(interval));
        }

        let snapshot = env.freeze(horizon);
        let snapshot_legs = snapshot.legs.len();

        let sub_snapshots = match &self.partition {
            Some(partition) => split_snapshot(snapshot, partition),
            None => vec![snapshot],
        };

        let mut report = CheckpointReport {
            at: now,
            horizon,
            subsets: sub_snapshots.len(),
            decisions: 0,
            stale: 0,
            failed_subsets: 0,
            unassigned: 0,
        };

        // Subsets are disjoint by construction, so their dispatches share no
        // mutable state and may run on worker threads.  Results are merged
        // back into the single-threaded event stream only after the join.
        let results = self.dispatch_all(&sub_snapshots);

        for (subset, result) in results.into_iter().enumerate() {
            let decisions = match result {
                Ok(decisions) => decisions,
                Err(e) => {
                    warn!(
                        "{} failed for subset {subset}: {e}; deferring its entities to the next checkpoint",
                        self.dispatcher.name()
                    );
                    report.failed_subsets += 1;
                    continue;
                }
            };

            for decision in decisions {
                match validate_decision(env, self.partition.as_ref(), &decision, horizon) {
                    Ok(()) => {
                        queue.push(
                            horizon,
                            EventKind::LegAssigned {
                                leg: decision.leg,
                                vehicle: decision.vehicle,
                                insert_at: decision.insert_at,
                            },
                        )?;
                        report.decisions += 1;
                    }
                    Err(stale) => {
                        warn!("discarding stale decision {decision:?}: {stale}");
                        report.stale += 1;
                    }
                }
            }
        }

        report.unassigned = snapshot_legs.saturating_sub(report.decisions);
        debug!(
            "checkpoint at {now}: {} decision(s), {} stale, {} unassigned across {} subset(s)",
            report.decisions, report.stale, report.unassigned, report.subsets
        );
        Ok(report)
    }

    /// Invoke the dispatcher once per subset snapshot.
    #[cfg(not(feature = "parallel"))]
    fn dispatch_all(
        &self,
        sub_snapshots: &[Snapshot],
    ) -> Vec<mmt_dispatch::DispatchResult<Vec<Decision>>> {
        sub_snapshots
            .iter()
            .map(|s| self.dispatcher.dispatch(s))
            .collect()
    }

    /// Invoke the dispatcher once per subset snapshot, on Rayon's pool.
    #[cfg(feature = "parallel")]
    fn dispatch_all(
        &self,
        sub_snapshots: &[Snapshot],
    ) -> Vec<mmt_dispatch::DispatchResult<Vec<Decision>>> {
        use rayon::prelude::*;

        sub_snapshots
            .par_iter()
            .map(|s| self.dispatcher.dispatch(s))
            .collect()
    }
}

// ── Internals ─────────────────────────────────────────────────────────────────

/// Split a snapshot into per-subset snapshots by membership.
///
/// Entities outside every subset cannot occur here — the exact cover was
/// validated at build time — but are dropped defensively rather than trusted.
fn split_snapshot(snapshot: Snapshot, partition: &Partition) -> Vec<Snapshot> {
    let mut subs: Vec<Snapshot> = (0..partition.len())
        .map(|_| Snapshot {
            taken_at: snapshot.taken_at,
            horizon: snapshot.horizon,
            vehicles: Vec::new(),
            legs: Vec::new(),
            network: Arc::clone(&snapshot.network),
        })
        .collect();

    for sv in snapshot.vehicles {
        if let Some(i) = partition.subset_of_vehicle(sv.vehicle.id) {
            subs[i].vehicles.push(sv);
        }
    }
    for leg in snapshot.legs {
        if let Some(i) = partition.subset_of_leg(leg.id) {
            subs[i].legs.push(leg);
        }
    }
    subs
}

/// Re-check a decision against *live* state just before it becomes an event.
fn validate_decision(
    env: &Environment,
    partition: Option<&Partition>,
    decision: &Decision,
    horizon: SimTime,
) -> Result<(), StaleDecision> {
    let leg = env
        .leg(decision.leg)
        .map_err(|_| StaleDecision::UnknownLeg(decision.leg))?;
    if leg.state != LegState::Release {
        return Err(StaleDecision::LegNotAssignable(decision.leg));
    }

    let vehicle = env
        .vehicle(decision.vehicle)
        .map_err(|_| StaleDecision::UnknownVehicle(decision.vehicle))?;
    if vehicle.state.is_terminal() {
        return Err(StaleDecision::VehicleRetired(decision.vehicle));
    }

    if let Some(partition) = partition
        && partition.subset_of_leg(decision.leg) != partition.subset_of_vehicle(decision.vehicle)
    {
        return Err(StaleDecision::CrossSubset {
            leg: decision.leg,
            vehicle: decision.vehicle,
        });
    }

    let stop = vehicle
        .route
        .stop(decision.insert_at)
        .filter(|s| s.location == leg.origin)
        .ok_or(StaleDecision::WrongBoardingStop {
            leg: decision.leg,
            vehicle: decision.vehicle,
            index: decision.insert_at,
        })?;
    if stop.departure < horizon {
        return Err(StaleDecision::FrozenInsertion {
            vehicle: decision.vehicle,
            index: decision.insert_at,
        });
    }

    if vehicle
        .route
        .find_stop_at(leg.destination, decision.insert_at)
        .is_none()
    {
        return Err(StaleDecision::NoAlightingStop {
            leg: decision.leg,
            index: decision.insert_at,
        });
    }

    Ok(())
}
