//! Integration tests for mmt-output.

#[cfg(test)]
mod csv_tests {
    use tempfile::TempDir;

    use crate::csv::CsvWriter;
    use crate::row::{CheckpointRow, EventRow};
    use crate::writer::OutputWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn event_row(sequence: u64, time_secs: u64) -> EventRow {
        EventRow {
            time_secs,
            unix_time_secs: time_secs as i64,
            sequence,
            kind: "vehicle_arrival",
            entity_kind: "vehicle",
            entity_id: 0,
        }
    }

    fn checkpoint_row(time_secs: u64) -> CheckpointRow {
        CheckpointRow {
            time_secs,
            horizon_secs: time_secs + 30,
            subsets: 1,
            decisions: 2,
            stale: 0,
            failed_subsets: 0,
            unassigned: 1,
        }
    }

    #[test]
    fn csv_files_created() {
        let dir = tmp();
        let _w = CsvWriter::new(dir.path()).unwrap();
        assert!(dir.path().join("events.csv").exists());
        assert!(dir.path().join("checkpoints.csv").exists());
    }

    #[test]
    fn csv_headers_correct() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("events.csv")).unwrap();
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(
            headers,
            ["time_secs", "unix_time_secs", "sequence", "kind", "entity_kind", "entity_id"]
        );

        let mut rdr2 = csv::Reader::from_path(dir.path().join("checkpoints.csv")).unwrap();
        let headers2: Vec<_> = rdr2.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(
            headers2,
            ["time_secs", "horizon_secs", "subsets", "decisions", "stale", "failed_subsets", "unassigned"]
        );
    }

    #[test]
    fn csv_event_round_trip() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        let rows = vec![event_row(0, 0), event_row(1, 10), event_row(2, 10)];
        w.write_events(&rows).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("events.csv")).unwrap();
        let read_rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(read_rows.len(), 3);
        assert_eq!(&read_rows[0][2], "0"); // sequence
        assert_eq!(&read_rows[1][0], "10"); // time_secs
        assert_eq!(&read_rows[2][3], "vehicle_arrival");
    }

    #[test]
    fn csv_checkpoint_round_trip() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_checkpoint(&checkpoint_row(60)).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("checkpoints.csv")).unwrap();
        let read_rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(read_rows.len(), 1);
        assert_eq!(&read_rows[0][0], "60"); // time_secs
        assert_eq!(&read_rows[0][1], "90"); // horizon_secs
        assert_eq!(&read_rows[0][3], "2"); // decisions
    }

    #[test]
    fn csv_finish_idempotent() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap(); // second call should not panic
    }

    #[test]
    fn csv_empty_batch_ok() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_events(&[]).unwrap();
    }

    #[test]
    fn integration_csv() {
        use mmt_core::{NodeId, SimConfig, SimTime};
        use mmt_dispatch::FirstFeasibleDispatcher;
        use mmt_model::{Route, Stop};
        use mmt_optim::CoordinatorConfig;
        use mmt_sim::SimBuilder;

        use crate::observer::SimOutputObserver;

        let config = SimConfig::default();
        let route = Route::new(vec![
            Stop::new(NodeId(0), SimTime(0), SimTime(0)),
            Stop::new(NodeId(1), SimTime(10), SimTime(10)),
        ])
        .unwrap();

        let mut sim = SimBuilder::new(
            config.clone(),
            CoordinatorConfig::default(),
            FirstFeasibleDispatcher,
        )
        .vehicle(route)
        .trip(SimTime(0), vec![(NodeId(0), NodeId(1))])
        .build()
        .unwrap();

        let dir = tmp();
        let writer = CsvWriter::new(dir.path()).unwrap();
        let mut obs = SimOutputObserver::new(writer, &config);
        let summary = sim.run(&mut obs).unwrap();
        assert!(obs.take_error().is_none());

        // One row per processed event, one per checkpoint.
        let mut events = csv::Reader::from_path(dir.path().join("events.csv")).unwrap();
        assert_eq!(events.records().count() as u64, summary.events_processed);

        let mut checkpoints = csv::Reader::from_path(dir.path().join("checkpoints.csv")).unwrap();
        assert_eq!(checkpoints.records().count() as u64, summary.checkpoints_run);
    }
}

#[cfg(all(test, feature = "sqlite"))]
mod sqlite_tests {
    use tempfile::TempDir;

    use crate::row::{CheckpointRow, EventRow};
    use crate::sqlite::SqliteWriter;
    use crate::writer::OutputWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    #[test]
    fn sqlite_round_trip() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.write_events(&[EventRow {
            time_secs: 5,
            unix_time_secs: 5,
            sequence: 0,
            kind: "trip_release",
            entity_kind: "trip",
            entity_id: 3,
        }])
        .unwrap();
        w.write_checkpoint(&CheckpointRow {
            time_secs: 5,
            horizon_secs: 5,
            subsets: 1,
            decisions: 1,
            stale: 0,
            failed_subsets: 0,
            unassigned: 0,
        })
        .unwrap();
        w.finish().unwrap();

        let conn = rusqlite::Connection::open(dir.path().join("output.db")).unwrap();
        let events: i64 = conn
            .query_row("SELECT COUNT(*) FROM events", [], |r| r.get(0))
            .unwrap();
        let checkpoints: i64 = conn
            .query_row("SELECT COUNT(*) FROM checkpoints", [], |r| r.get(0))
            .unwrap();
        assert_eq!((events, checkpoints), (1, 1));
    }
}
