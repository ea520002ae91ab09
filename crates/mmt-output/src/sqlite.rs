//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `output.db` file in the configured output directory with
//! two tables: `events` and `checkpoints`.

use std::path::Path;

use rusqlite::Connection;

use crate::writer::OutputWriter;
use crate::{CheckpointRow, EventRow, OutputResult};

/// Writes simulation output to an SQLite database.
pub struct SqliteWriter {
    conn: Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `output.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let conn = Connection::open(dir.join("output.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS events (
                 time_secs      INTEGER NOT NULL,
                 unix_time_secs INTEGER NOT NULL,
                 sequence       INTEGER NOT NULL,
                 kind           TEXT    NOT NULL,
                 entity_kind    TEXT    NOT NULL,
                 entity_id      INTEGER NOT NULL
             );
             CREATE TABLE IF NOT EXISTS checkpoints (
                 time_secs      INTEGER NOT NULL,
                 horizon_secs   INTEGER NOT NULL,
                 subsets        INTEGER NOT NULL,
                 decisions      INTEGER NOT NULL,
                 stale          INTEGER NOT NULL,
                 failed_subsets INTEGER NOT NULL,
                 unassigned     INTEGER NOT NULL
             );",
        )?;

        Ok(Self {
            conn,
            finished: false,
        })
    }
}

impl OutputWriter for SqliteWriter {
    fn write_events(&mut self, rows: &[EventRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO events \
                 (time_secs, unix_time_secs, sequence, kind, entity_kind, entity_id) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.time_secs,
                    row.unix_time_secs,
                    row.sequence,
                    row.kind,
                    row.entity_kind,
                    row.entity_id,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_checkpoint(&mut self, row: &CheckpointRow) -> OutputResult<()> {
        self.conn.execute(
            "INSERT INTO checkpoints \
             (time_secs, horizon_secs, subsets, decisions, stale, failed_subsets, unassigned) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            rusqlite::params![
                row.time_secs,
                row.horizon_secs,
                row.subsets,
                row.decisions,
                row.stale,
                row.failed_subsets,
                row.unassigned,
            ],
        )?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
