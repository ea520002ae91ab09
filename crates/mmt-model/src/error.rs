//! Model-subsystem error type.

use thiserror::Error;

use mmt_core::{CoreError, LegId, TripId, VehicleId};

/// Errors produced when constructing or mutating model entities.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("route must contain at least one stop")]
    EmptyRoute,

    #[error("route stop times must be non-decreasing (violated at stop index {index})")]
    NonMonotonicRoute { index: usize },

    #[error("trip {0} has no legs")]
    EmptyTrip(TripId),

    #[error("leg {leg} is not assigned to a vehicle")]
    LegUnassigned { leg: LegId },

    #[error("stop index {index} out of range for vehicle {vehicle}")]
    StopOutOfRange { vehicle: VehicleId, index: usize },

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type ModelResult<T> = Result<T, ModelError>;
