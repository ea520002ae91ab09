//! The `OutputWriter` trait implemented by all backend writers.

use crate::{CheckpointRow, EventRow, OutputResult};

/// Trait implemented by CSV, SQLite, and Parquet writers.
///
/// All methods are infallible from the observer's perspective — errors are
/// stored internally and retrieved with
/// [`SimOutputObserver::take_error`][crate::SimOutputObserver::take_error].
pub trait OutputWriter {
    /// Write a batch of processed events.
    fn write_events(&mut self, rows: &[EventRow]) -> OutputResult<()>;

    /// Write one checkpoint row.
    fn write_checkpoint(&mut self, row: &CheckpointRow) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent — safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
