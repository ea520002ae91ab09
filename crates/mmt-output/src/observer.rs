//! `SimOutputObserver<W>` — bridges `SimObserver` to an `OutputWriter`.

use mmt_core::SimConfig;
use mmt_event::Event;
use mmt_model::Environment;
use mmt_optim::CheckpointReport;
use mmt_sim::{RunSummary, SimObserver};

use crate::row::{CheckpointRow, EventRow};
use crate::writer::OutputWriter;
use crate::OutputError;

/// Events are buffered and flushed to the writer in batches of this size.
const EVENT_BATCH: usize = 1_024;

/// A [`SimObserver`] that writes event and checkpoint logs to any
/// [`OutputWriter`] backend (CSV, SQLite, Parquet, …).
///
/// Errors from the writer are stored internally because observer methods
/// have no return value.  After `sim.run()` returns, check for errors with
/// [`take_error`][Self::take_error].
pub struct SimOutputObserver<W: OutputWriter> {
    writer: W,
    start_unix_secs: i64,
    buffer: Vec<EventRow>,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    /// Create an observer backed by `writer`, using `config` for wall-clock
    /// conversion.
    pub fn new(writer: W, config: &SimConfig) -> Self {
        Self {
            writer,
            start_unix_secs: config.start_unix_secs,
            buffer: Vec::with_capacity(EVENT_BATCH),
            last_error: None,
        }
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the sim).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn flush_events(&mut self) {
        if self.buffer.is_empty() {
            return;
        }
        let result = self.writer.write_events(&self.buffer);
        self.buffer.clear();
        self.store_err(result);
    }

    fn store_err(&mut self, result: crate::OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_event(&mut self, event: &Event, _env: &Environment) {
        self.buffer
            .push(EventRow::from_event(event, self.start_unix_secs));
        if self.buffer.len() >= EVENT_BATCH {
            self.flush_events();
        }
    }

    fn on_checkpoint(&mut self, report: &CheckpointReport, _env: &Environment) {
        let row = CheckpointRow::from(report);
        let result = self.writer.write_checkpoint(&row);
        self.store_err(result);
    }

    fn on_sim_end(&mut self, _summary: &RunSummary, _env: &Environment) {
        self.flush_events();
        let result = self.writer.finish();
        self.store_err(result);
    }
}
