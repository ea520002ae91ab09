//! Driver error type.

use thiserror::Error;

use mmt_core::CoreError;
use mmt_event::EventError;
use mmt_model::{FsmError, ModelError};
use mmt_optim::PartitionError;

/// Fatal simulation errors.
///
/// Everything here aborts the run: configuration problems surface from the
/// builder before any event is processed, while event/FSM errors mean an
/// ordering invariant was violated mid-run and the world can no longer be
/// trusted.  Recoverable conditions (dispatcher failures, stale decisions)
/// never reach this type — the coordinator logs and absorbs them.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("invalid partition: {0}")]
    Partition(#[from] PartitionError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Event(#[from] EventError),

    #[error(transparent)]
    Fsm(#[from] FsmError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type SimResult<T> = Result<T, SimError>;
