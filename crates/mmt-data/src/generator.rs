//! Deterministic synthetic demand generation.
//!
//! Useful for benchmarks and tests that need demand volume without a real
//! request dataset.  The same seed and network always produce the same
//! trips.

use mmt_core::{NodeId, SimRng, SimTime};
use mmt_network::TransitNetwork;

use crate::TripRecord;

/// Parameters for [`generate_demand`].
#[derive(Debug, Clone)]
pub struct DemandConfig {
    /// Number of trips to generate.
    pub trips: usize,
    /// Release times are drawn uniformly from `[0, release_window_secs)`.
    pub release_window_secs: u64,
    /// RNG seed; derive it from `SimConfig::seed` for whole-run determinism.
    pub seed: u64,
}

/// Generate single-leg trips between distinct random network nodes.
///
/// Returns an empty list for networks with fewer than two nodes (there is
/// nowhere to travel).
pub fn generate_demand(network: &TransitNetwork, config: &DemandConfig) -> Vec<TripRecord> {
    let node_count = network.node_count();
    if node_count < 2 {
        return Vec::new();
    }

    let mut rng = SimRng::new(config.seed);
    let mut trips = Vec::with_capacity(config.trips);

    for _ in 0..config.trips {
        let origin = NodeId(rng.gen_range(0..node_count as u32));
        // Draw from the remaining nodes, skipping over the origin.
        let mut destination = NodeId(rng.gen_range(0..node_count as u32 - 1));
        if destination.0 >= origin.0 {
            destination.0 += 1;
        }

        let release = if config.release_window_secs == 0 {
            SimTime::ZERO
        } else {
            SimTime(rng.gen_range(0..config.release_window_secs))
        };

        trips.push(TripRecord {
            release_time: release,
            segments: vec![(origin, destination)],
        });
    }
    trips
}
