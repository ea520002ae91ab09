//! The `Simulation` struct and its event loop.

use tracing::info;

use mmt_core::{SimConfig, SimTime};
use mmt_dispatch::Dispatcher;
use mmt_event::{EntityRef, Event, EventClass, EventQueue};
use mmt_model::{Environment, fsm};
use mmt_optim::Coordinator;

use crate::control::{LoopSignal, RunControl};
use crate::{SimObserver, SimResult, handlers};

// ── RunSummary ────────────────────────────────────────────────────────────────

/// Statistics for one completed (or stopped) run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub events_processed: u64,
    pub checkpoints_run: u64,
    /// Simulation time when the loop exited.
    pub final_time: SimTime,
    /// `true` if an external `stop` cut the run short.
    pub stopped_early: bool,
}

// ── Simulation ────────────────────────────────────────────────────────────────

/// The top-level driver: owns the environment, the event queue, and the
/// optimization coordinator; drives the single-threaded event loop.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Simulation<D: Dispatcher> {
    /// Global configuration.
    pub config: SimConfig,

    /// The single mutable world.
    pub env: Environment,

    /// Pending events ordered by `(time, priority, sequence)`.
    pub queue: EventQueue,

    /// Checkpoint scheduling and dispatch.
    pub coordinator: Coordinator<D>,

    pub(crate) control: RunControl,
}

impl<D: Dispatcher> Simulation<D> {
    // ── Public API ────────────────────────────────────────────────────────

    /// A cloneable handle for pausing, resuming, or stopping this run from
    /// another thread.
    pub fn control(&self) -> RunControl {
        self.control.clone()
    }

    /// Run until the queue is empty or an external stop arrives.
    ///
    /// An empty queue is the success path; every fatal error carries the
    /// violated invariant and offending entity.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<RunSummary> {
        self.control.mark_running();
        info!(
            "run starting: {} vehicles, {} trips, {} seeded events",
            self.env.vehicle_count(),
            self.env.trip_count(),
            self.queue.len()
        );

        let mut summary = RunSummary {
            events_processed: 0,
            checkpoints_run: 0,
            final_time: self.env.now(),
            stopped_early: false,
        };

        loop {
            // The single between-events control point (pause blocks here).
            if matches!(self.control.gate(), LoopSignal::Stop) {
                self.queue.clear();
                summary.stopped_early = true;
                break;
            }

            // EmptyQueue: the normal termination signal.
            let Some(event) = self.queue.pop() else {
                break;
            };

            self.env.clock.advance_to(event.time)?;
            self.transition(&event)?;
            handlers::apply(&mut self.env, &mut self.queue, event.time, event.kind)?;
            summary.events_processed += 1;
            observer.on_event(&event, &self.env);

            if self.coordinator.should_run(self.env.now(), &event) {
                let report = self.coordinator.run_checkpoint(&self.env, &mut self.queue)?;
                summary.checkpoints_run += 1;
                observer.on_checkpoint(&report, &self.env);
            }
        }

        summary.final_time = self.env.now();
        self.control.finish();
        info!(
            "run finished at {}: {} events, {} checkpoints{}",
            self.env.clock,
            summary.events_processed,
            summary.checkpoints_run,
            if summary.stopped_early { " (stopped)" } else { "" }
        );
        observer.on_sim_end(&summary, &self.env);
        Ok(summary)
    }

    // ── Two-step protocol, step one ───────────────────────────────────────

    /// Advance the target entity's state machine for this event.
    ///
    /// Release events are creation markers: the entity already starts in
    /// `Release`, so they advance no machine.  Leg events also advance the
    /// owning trip's machine when they target its current leg.
    fn transition(&mut self, event: &Event) -> SimResult<()> {
        let class = event.kind.class();
        if matches!(class, EventClass::VehicleRelease | EventClass::TripRelease) {
            return Ok(());
        }

        match event.kind.entity() {
            EntityRef::Vehicle(id) => {
                let next = fsm::vehicle_transition(self.env.vehicle(id)?, class)?;
                self.env.vehicle_mut(id)?.state = next;
            }
            EntityRef::Leg(id) => {
                let next = fsm::leg_transition(self.env.leg(id)?, class)?;
                self.env.leg_mut(id)?.state = next;

                let trip_id = self.env.leg(id)?.trip;
                let trip = self.env.trip(trip_id)?;
                if trip.current_leg() == Some(id) {
                    let next_leg_state = match trip.next_leg() {
                        Some(next_leg) => Some(self.env.leg(next_leg)?.state),
                        None => None,
                    };
                    let next_state = fsm::trip_transition(trip, next_leg_state, class)?;
                    self.env.trip_mut(trip_id)?.state = next_state;
                }
            }
            // TripRelease was filtered above; no other event targets a trip.
            EntityRef::Trip(_) => {}
        }
        Ok(())
    }
}
