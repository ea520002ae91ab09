//! `mmt-core` — foundational types for the `rust_mmt` multimodal transit
//! simulator.
//!
//! This crate is a dependency of every other `mmt-*` crate.  It intentionally
//! has no `mmt-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module    | Contents                                        |
//! |-----------|-------------------------------------------------|
//! | [`ids`]   | `VehicleId`, `TripId`, `LegId`, `NodeId`, `EdgeId` |
//! | [`time`]  | `SimTime`, `SimClock`, `SimConfig`              |
//! | [`rng`]   | `SimRng` (seeded, reproducible)                 |
//! | [`error`] | `CoreError`, `CoreResult`                       |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                              |
//! |---------|-----------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types. |

pub mod error;
pub mod ids;
pub mod rng;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use ids::{EdgeId, LegId, NodeId, TripId, VehicleId};
pub use rng::SimRng;
pub use time::{SimClock, SimConfig, SimTime};
