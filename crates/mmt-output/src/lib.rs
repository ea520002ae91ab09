//! `mmt-output` — simulation output writers.
//!
//! Three backends are provided behind Cargo features:
//!
//! | Feature   | Backend | Files created                            |
//! |-----------|---------|------------------------------------------|
//! | *(none)*  | CSV     | `events.csv`, `checkpoints.csv`          |
//! | `sqlite`  | SQLite  | `output.db`                              |
//! | `parquet` | Parquet | `events.parquet`, `checkpoints.parquet`  |
//!
//! All backends implement [`OutputWriter`] and are driven by
//! [`SimOutputObserver`], which implements `mmt_sim::SimObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use mmt_output::{CsvWriter, SimOutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = SimOutputObserver::new(writer, &config);
//! sim.run(&mut obs)?;
//! if let Some(e) = obs.take_error() {
//!     eprintln!("output error: {e}");
//! }
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "parquet")]
pub mod parquet;

#[cfg(test)]
mod tests;

pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::SimOutputObserver;
pub use row::{CheckpointRow, EventRow};
pub use writer::OutputWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;

#[cfg(feature = "parquet")]
pub use parquet::ParquetWriter;
