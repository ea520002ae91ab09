//! Framework error type.
//!
//! Sub-crates define their own error enums and either convert them into
//! `CoreError` via `From` impls or keep them separate and wrap `CoreError` as
//! one variant.  Both patterns are acceptable; prefer whichever keeps error
//! sites clean.

use thiserror::Error;

use crate::{LegId, NodeId, SimTime, TripId, VehicleId};

/// The top-level error type for `mmt-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("vehicle {0} not found")]
    VehicleNotFound(VehicleId),

    #[error("trip {0} not found")]
    TripNotFound(TripId),

    #[error("leg {0} not found")]
    LegNotFound(LegId),

    #[error("node {0} not found")]
    NodeNotFound(NodeId),

    #[error("clock may not move backwards: now {now}, requested {requested}")]
    ClockRegression { now: SimTime, requested: SimTime },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for all `mmt-*` crates.
pub type CoreResult<T> = Result<T, CoreError>;
