//! Observer hooks for statistics collection and visualization.

use mmt_event::Event;
use mmt_model::Environment;
use mmt_optim::CheckpointReport;

use crate::RunSummary;

/// Callbacks invoked by [`Simulation::run`][crate::Simulation::run].
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.  Observers receive the environment by
/// shared reference and must not (and cannot) mutate it.
///
/// # Example — event counter
///
/// ```rust,ignore
/// #[derive(Default)]
/// struct EventCounter(u64);
///
/// impl SimObserver for EventCounter {
///     fn on_event(&mut self, _event: &Event, _env: &Environment) {
///         self.0 += 1;
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called after each event has been fully processed.
    fn on_event(&mut self, _event: &Event, _env: &Environment) {}

    /// Called after each coordinator checkpoint completes.
    fn on_checkpoint(&mut self, _report: &CheckpointReport, _env: &Environment) {}

    /// Called once when the run terminates (queue drained or stopped).
    fn on_sim_end(&mut self, _summary: &RunSummary, _env: &Environment) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to call `run` but
/// don't want callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}

/// Fan-out to any number of boxed observers, in order.
impl SimObserver for Vec<Box<dyn SimObserver>> {
    fn on_event(&mut self, event: &Event, env: &Environment) {
        for obs in self.iter_mut() {
            obs.on_event(event, env);
        }
    }

    fn on_checkpoint(&mut self, report: &CheckpointReport, env: &Environment) {
        for obs in self.iter_mut() {
            obs.on_checkpoint(report, env);
        }
    }

    fn on_sim_end(&mut self, summary: &RunSummary, env: &Environment) {
        for obs in self.iter_mut() {
            obs.on_sim_end(summary, env);
        }
    }
}
