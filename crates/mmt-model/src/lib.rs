//! `mmt-model` — entities, state machines, and the environment.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                  |
//! |-------------|-----------------------------------------------------------|
//! | [`route`]   | `Stop`, `Route` (timetabled stop sequence with a cursor)  |
//! | [`vehicle`] | `Vehicle`, `VehicleState`                                 |
//! | [`trip`]    | `Trip`, `Leg`, `LegState`                                 |
//! | [`fsm`]     | guarded transition tables, the transition half of the two-step event protocol |
//! | [`env`]     | `Environment` (live world) and `Snapshot` (frozen horizon copy) |
//! | [`error`]   | `ModelError`, `ModelResult<T>`                            |
//!
//! # The two-step event protocol
//!
//! For every popped event the driver first advances the target entity's state
//! machine through [`fsm`] — a pure table lookup with guard predicates over
//! live entity data — and only then runs the handler body that mutates the
//! environment.  A (state, event) pair with no table entry is a fatal
//! [`fsm::FsmError::InvalidTransition`]: it means the event choreography
//! upstream is broken, not that the input data was bad.

pub mod env;
pub mod error;
pub mod fsm;
pub mod route;
pub mod trip;
pub mod vehicle;

#[cfg(test)]
mod tests;

pub use env::{Environment, Snapshot, SnapshotVehicle};
pub use error::{ModelError, ModelResult};
pub use fsm::FsmError;
pub use route::{Route, Stop};
pub use trip::{Leg, LegState, Trip};
pub use vehicle::{Vehicle, VehicleState};
