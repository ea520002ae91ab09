//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `events.csv`
//! - `checkpoints.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{CheckpointRow, EventRow, OutputResult};

/// Writes simulation output to two CSV files.
pub struct CsvWriter {
    events: Writer<File>,
    checkpoints: Writer<File>,
    finished: bool,
}

impl CsvWriter {
    /// Open (or create) the two CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut events = Writer::from_path(dir.join("events.csv"))?;
        events.write_record([
            "time_secs",
            "unix_time_secs",
            "sequence",
            "kind",
            "entity_kind",
            "entity_id",
        ])?;

        let mut checkpoints = Writer::from_path(dir.join("checkpoints.csv"))?;
        checkpoints.write_record([
            "time_secs",
            "horizon_secs",
            "subsets",
            "decisions",
            "stale",
            "failed_subsets",
            "unassigned",
        ])?;

        Ok(Self {
            events,
            checkpoints,
            finished: false,
        })
    }
}

impl OutputWriter for CsvWriter {
    fn write_events(&mut self, rows: &[EventRow]) -> OutputResult<()> {
        for row in rows {
            self.events.write_record(&[
                row.time_secs.to_string(),
                row.unix_time_secs.to_string(),
                row.sequence.to_string(),
                row.kind.to_string(),
                row.entity_kind.to_string(),
                row.entity_id.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_checkpoint(&mut self, row: &CheckpointRow) -> OutputResult<()> {
        self.checkpoints.write_record(&[
            row.time_secs.to_string(),
            row.horizon_secs.to_string(),
            row.subsets.to_string(),
            row.decisions.to_string(),
            row.stale.to_string(),
            row.failed_subsets.to_string(),
            row.unassigned.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.events.flush()?;
        self.checkpoints.flush()?;
        Ok(())
    }
}
