//! `mmt-data` — boundary loaders for vehicles and trips.
//!
//! The simulator core does not care how its inputs were produced; this crate
//! provides the two standard producers:
//!
//! - CSV loaders ([`loader`]) for vehicle timetables and trip requests,
//!   including a variant that snaps geographic coordinates to the nearest
//!   network node;
//! - a deterministic synthetic [`generator`] for benchmark and test demand.
//!
//! All loaders have `_reader` variants accepting any `std::io::Read`, so
//! tests can feed them from in-memory `Cursor`s.

pub mod error;
pub mod generator;
pub mod loader;

#[cfg(test)]
mod tests;

pub use error::{LoadError, LoadResult};
pub use generator::{DemandConfig, generate_demand};
pub use loader::{
    TripRecord, load_routes_csv, load_routes_reader, load_trips_csv, load_trips_geo_reader,
    load_trips_reader,
};
