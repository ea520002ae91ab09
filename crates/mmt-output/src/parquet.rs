//! Parquet output backend (feature `parquet`).
//!
//! Creates two files in the configured output directory:
//! - `events.parquet`
//! - `checkpoints.parquet`

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{Int64Builder, StringBuilder, UInt32Builder, UInt64Builder};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;

use crate::writer::OutputWriter;
use crate::{CheckpointRow, EventRow, OutputResult};

fn event_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("time_secs", DataType::UInt64, false),
        Field::new("unix_time_secs", DataType::Int64, false),
        Field::new("sequence", DataType::UInt64, false),
        Field::new("kind", DataType::Utf8, false),
        Field::new("entity_kind", DataType::Utf8, false),
        Field::new("entity_id", DataType::UInt32, false),
    ]))
}

fn checkpoint_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("time_secs", DataType::UInt64, false),
        Field::new("horizon_secs", DataType::UInt64, false),
        Field::new("subsets", DataType::UInt64, false),
        Field::new("decisions", DataType::UInt64, false),
        Field::new("stale", DataType::UInt64, false),
        Field::new("failed_subsets", DataType::UInt64, false),
        Field::new("unassigned", DataType::UInt64, false),
    ]))
}

fn snappy_props() -> WriterProperties {
    WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build()
}

/// Writes simulation output to two Parquet files.
///
/// `finish()` **must** be called to write the Parquet file footer; files
/// written without calling `finish()` cannot be opened by Parquet readers.
pub struct ParquetWriter {
    events: Option<ArrowWriter<File>>,
    checkpoints: Option<ArrowWriter<File>>,
    event_schema: Arc<Schema>,
    checkpoint_schema: Arc<Schema>,
}

impl ParquetWriter {
    /// Create both Parquet files in `dir`.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let event_schema = event_schema();
        let checkpoint_schema = checkpoint_schema();

        let event_file = File::create(dir.join("events.parquet"))?;
        let events = ArrowWriter::try_new(
            event_file,
            Arc::clone(&event_schema),
            Some(snappy_props()),
        )?;

        let checkpoint_file = File::create(dir.join("checkpoints.parquet"))?;
        let checkpoints = ArrowWriter::try_new(
            checkpoint_file,
            Arc::clone(&checkpoint_schema),
            Some(snappy_props()),
        )?;

        Ok(Self {
            events: Some(events),
            checkpoints: Some(checkpoints),
            event_schema,
            checkpoint_schema,
        })
    }
}

impl OutputWriter for ParquetWriter {
    fn write_events(&mut self, rows: &[EventRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let Some(writer) = self.events.as_mut() else {
            return Ok(());
        };

        let mut time_secs = UInt64Builder::new();
        let mut unix_times = Int64Builder::new();
        let mut sequences = UInt64Builder::new();
        let mut kinds = StringBuilder::new();
        let mut entity_kinds = StringBuilder::new();
        let mut entity_ids = UInt32Builder::new();

        for row in rows {
            time_secs.append_value(row.time_secs);
            unix_times.append_value(row.unix_time_secs);
            sequences.append_value(row.sequence);
            kinds.append_value(row.kind);
            entity_kinds.append_value(row.entity_kind);
            entity_ids.append_value(row.entity_id);
        }

        let batch = RecordBatch::try_new(
            Arc::clone(&self.event_schema),
            vec![
                Arc::new(time_secs.finish()),
                Arc::new(unix_times.finish()),
                Arc::new(sequences.finish()),
                Arc::new(kinds.finish()),
                Arc::new(entity_kinds.finish()),
                Arc::new(entity_ids.finish()),
            ],
        )?;
        writer.write(&batch)?;
        Ok(())
    }

    fn write_checkpoint(&mut self, row: &CheckpointRow) -> OutputResult<()> {
        let Some(writer) = self.checkpoints.as_mut() else {
            return Ok(());
        };

        let mut time_secs = UInt64Builder::new();
        let mut horizons = UInt64Builder::new();
        let mut subsets = UInt64Builder::new();
        let mut decisions = UInt64Builder::new();
        let mut stale = UInt64Builder::new();
        let mut failed = UInt64Builder::new();
        let mut unassigned = UInt64Builder::new();

        time_secs.append_value(row.time_secs);
        horizons.append_value(row.horizon_secs);
        subsets.append_value(row.subsets);
        decisions.append_value(row.decisions);
        stale.append_value(row.stale);
        failed.append_value(row.failed_subsets);
        unassigned.append_value(row.unassigned);

        let batch = RecordBatch::try_new(
            Arc::clone(&self.checkpoint_schema),
            vec![
                Arc::new(time_secs.finish()),
                Arc::new(horizons.finish()),
                Arc::new(subsets.finish()),
                Arc::new(decisions.finish()),
                Arc::new(stale.finish()),
                Arc::new(failed.finish()),
                Arc::new(unassigned.finish()),
            ],
        )?;
        writer.write(&batch)?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if let Some(w) = self.events.take() {
            w.close()?;
        }
        if let Some(w) = self.checkpoints.take() {
            w.close()?;
        }
        Ok(())
    }
}
