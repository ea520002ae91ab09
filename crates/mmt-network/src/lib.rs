//! `mmt-network` — the transit network graph consumed by dispatch logic.
//!
//! The simulator core treats the network as an opaque read-only object: a set
//! of nodes with coordinates and directed, travel-time-weighted links.
//! Dispatchers query it for travel times; loaders use the spatial index to
//! snap coordinates to the nearest node.
//!
//! # Crate layout
//!
//! | Module      | Contents                                              |
//! |-------------|-------------------------------------------------------|
//! | [`geo`]     | `GeoPoint`, haversine distance                        |
//! | [`network`] | `TransitNetwork` (CSR + R-tree), `TransitNetworkBuilder` |
//! | [`travel`]  | Dijkstra shortest-travel-time query                   |
//! | [`error`]   | `NetworkError`, `NetworkResult<T>`                    |

pub mod error;
pub mod geo;
pub mod network;
pub mod travel;

#[cfg(test)]
mod tests;

pub use error::{NetworkError, NetworkResult};
pub use geo::GeoPoint;
pub use network::{TransitNetwork, TransitNetworkBuilder};
