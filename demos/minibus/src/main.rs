//! minibus — smallest end-to-end demo of the rust_mmt simulator.
//!
//! Two minibuses shuttle along a 5-stop line; four passenger trips (one with
//! a transfer) are matched to them by the earliest-arrival dispatcher at
//! trip-release checkpoints.  Event and checkpoint logs land in `./output`.

mod network;

use std::io::Cursor;
use std::path::Path;

use anyhow::{Context, Result};

use mmt_core::SimConfig;
use mmt_data::{load_routes_reader, load_trips_reader};
use mmt_dispatch::EarliestArrivalDispatcher;
use mmt_optim::CoordinatorConfig;
use mmt_output::{CsvWriter, SimOutputObserver};
use mmt_sim::SimBuilder;

use network::build_network;

// ── Timetables ────────────────────────────────────────────────────────────────

// Bus 0 runs the full line outbound; bus 1 starts later and short-turns.
const ROUTES_CSV: &str = "\
vehicle_id,stop_seq,node_id,arrival_secs,departure_secs\n\
0,0,0,0,60\n\
0,1,1,240,300\n\
0,2,2,480,540\n\
0,3,3,720,780\n\
0,4,4,960,960\n\
1,0,4,600,660\n\
1,1,3,840,900\n\
1,2,2,1080,1140\n\
1,3,1,1320,1320\n\
";

// Trip 2 transfers at stop 2: inbound on bus 0, back out on bus 1.
const TRIPS_CSV: &str = "\
trip_id,leg_seq,board_node,alight_node,release_secs\n\
0,0,0,3,0\n\
1,0,1,4,120\n\
2,0,0,2,0\n\
2,1,2,1,0\n\
3,0,4,2,500\n\
";

// ── Main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = SimConfig {
        start_unix_secs: 1_767_225_600, // 2026-01-01 00:00 UTC
        seed: 42,
        num_threads: Some(1),
    };
    let coordinator_config = CoordinatorConfig {
        freeze_interval_secs: 30,
        periodic_interval_secs: Some(300),
        on_trip_release: true,
    };

    let routes = load_routes_reader(Cursor::new(ROUTES_CSV)).context("parse routes")?;
    let trips = load_trips_reader(Cursor::new(TRIPS_CSV)).context("parse trips")?;

    let mut builder = SimBuilder::new(
        config.clone(),
        coordinator_config,
        EarliestArrivalDispatcher,
    )
    .network(build_network());
    for route in routes {
        builder = builder.vehicle(route);
    }
    for trip in trips {
        builder = builder.trip(trip.release_time, trip.segments);
    }
    let mut sim = builder.build().context("build simulation")?;

    let out_dir = Path::new("./output");
    std::fs::create_dir_all(out_dir)?;
    let writer = CsvWriter::new(out_dir).context("open output files")?;
    let mut observer = SimOutputObserver::new(writer, &config);

    let summary = sim.run(&mut observer).context("run simulation")?;
    if let Some(e) = observer.take_error() {
        eprintln!("output error: {e}");
    }

    println!(
        "processed {} events across {} checkpoints; finished at {}",
        summary.events_processed, summary.checkpoints_run, summary.final_time
    );
    for trip in sim.env.trips() {
        println!("  trip {}: {}", trip.id.0, trip.state);
    }
    for vehicle in sim.env.vehicles() {
        println!("  vehicle {}: {}", vehicle.id.0, vehicle.state);
    }
    println!(
        "served {} of {} trips; logs in {}",
        sim.env
            .trips()
            .iter()
            .filter(|t| t.state.is_terminal())
            .count(),
        sim.env.trip_count(),
        out_dir.display()
    );
    Ok(())
}
