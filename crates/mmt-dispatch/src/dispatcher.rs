//! The `Dispatcher` trait — the main optimization extension point.

use thiserror::Error;

use mmt_model::Snapshot;
use mmt_network::NetworkError;

use crate::Decision;

/// Errors a dispatcher may raise for a whole invocation.
///
/// A failed invocation is recoverable at the checkpoint level: the
/// coordinator logs it and defers the affected subset's entities to the next
/// checkpoint.  Dispatchers should not error over a single unassignable leg —
/// leaving it out of the decision list is the normal way to defer it.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("network query failed: {0}")]
    Network(#[from] NetworkError),

    #[error("dispatcher failure: {0}")]
    Internal(String),
}

pub type DispatchResult<T> = Result<T, DispatchError>;

/// Pluggable assignment logic invoked at every coordinator checkpoint.
///
/// Implementations see only the frozen snapshot — never live state — and
/// must be deterministic given identical input so simulation runs are
/// reproducible.  When a partition is configured the coordinator may invoke
/// the same dispatcher concurrently on disjoint subsets, hence `Send + Sync`.
///
/// # Example — assign everything to vehicle 0
///
/// ```rust,ignore
/// struct AllToFirst;
///
/// impl Dispatcher for AllToFirst {
///     fn dispatch(&self, snapshot: &Snapshot) -> DispatchResult<Vec<Decision>> {
///         let Some(sv) = snapshot.vehicles.first() else {
///             return Ok(vec![]);
///         };
///         Ok(snapshot
///             .legs
///             .iter()
///             .filter_map(|leg| Decision::first_feasible(leg, sv))
///             .collect())
///     }
/// }
/// ```
pub trait Dispatcher: Send + Sync {
    /// Produce assignment decisions for the snapshot.
    ///
    /// Every returned decision must reference a leg and vehicle present in
    /// the snapshot; the coordinator validates and discards stale ones.
    /// Legs left without a decision are retried at the next checkpoint.
    fn dispatch(&self, snapshot: &Snapshot) -> DispatchResult<Vec<Decision>>;

    /// Human-readable name used in logs.
    fn name(&self) -> &'static str {
        "dispatcher"
    }
}
