//! Fluent builder for constructing a [`Simulation`].

use std::sync::Arc;

use mmt_core::{LegId, NodeId, SimConfig, SimTime, VehicleId};
use mmt_dispatch::Dispatcher;
use mmt_event::{EventKind, EventQueue};
use mmt_model::{Environment, Route};
use mmt_network::TransitNetwork;
use mmt_optim::{Coordinator, CoordinatorConfig, Partition, Partitioner};

use crate::control::RunControl;
use crate::{SimResult, Simulation};

/// Fluent builder for [`Simulation<D>`].
///
/// # Required inputs
///
/// - [`SimConfig`] — wall-clock anchor, seed.
/// - [`CoordinatorConfig`] — freeze interval and checkpoint triggers.
/// - `D: Dispatcher` — the optimization plugin.
///
/// # Optional inputs (have defaults)
///
/// | Method            | Default                          |
/// |-------------------|----------------------------------|
/// | `.network(n)`     | `TransitNetwork::empty()`        |
/// | `.vehicle(route)` | no vehicles                      |
/// | `.trip(..)`       | no trips                         |
/// | `.partitioner(p)` | one implicit whole-fleet subset  |
///
/// `build()` validates everything that can fail before the run: route
/// timetables were already vetted by [`Route::new`], trips must have at least
/// one leg, and a configured partition must exactly cover all vehicle and
/// leg ids.  It then seeds the queue with the release events.
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(config, CoordinatorConfig::default(), FirstFeasibleDispatcher)
///     .network(network)
///     .vehicle(route_a)
///     .vehicle(route_b)
///     .trip(SimTime(60), vec![(NodeId(0), NodeId(3))])
///     .build()?;
/// sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder<D: Dispatcher> {
    config: SimConfig,
    coordinator_config: CoordinatorConfig,
    dispatcher: D,
    network: Option<TransitNetwork>,
    routes: Vec<Route>,
    trips: Vec<(SimTime, Vec<(NodeId, NodeId)>)>,
    partitioner: Option<Box<dyn Partitioner>>,
    partition: Option<Partition>,
}

impl<D: Dispatcher> SimBuilder<D> {
    /// Create a builder with all required inputs.
    pub fn new(config: SimConfig, coordinator_config: CoordinatorConfig, dispatcher: D) -> Self {
        Self {
            config,
            coordinator_config,
            dispatcher,
            network: None,
            routes: Vec::new(),
            trips: Vec::new(),
            partitioner: None,
            partition: None,
        }
    }

    /// Supply the transit network dispatchers may query.
    ///
    /// If not called, an empty network is used; timetable-only dispatchers
    /// work fine without one.
    pub fn network(mut self, network: TransitNetwork) -> Self {
        self.network = Some(network);
        self
    }

    /// Add a vehicle with a validated route.  Its release event is seeded at
    /// the first stop's arrival time.
    pub fn vehicle(mut self, route: Route) -> Self {
        self.routes.push(route);
        self
    }

    /// Add a trip released at `release_time`, decomposed into ordered
    /// `(board, alight)` node pairs.
    pub fn trip(mut self, release_time: SimTime, segments: Vec<(NodeId, NodeId)>) -> Self {
        self.trips.push((release_time, segments));
        self
    }

    /// Build the partition from a strategy at `build()` time (it needs the
    /// final id universe).  Mutually exclusive with [`partition`][Self::partition];
    /// the explicit partition wins.
    pub fn partitioner(mut self, partitioner: Box<dyn Partitioner>) -> Self {
        self.partitioner = Some(partitioner);
        self
    }

    /// Supply an explicit partition.  It is still validated against the
    /// final id universe.
    pub fn partition(mut self, partition: Partition) -> Self {
        self.partition = Some(partition);
        self
    }

    /// Validate inputs, seed the release events, and return a ready-to-run
    /// [`Simulation`].
    pub fn build(self) -> SimResult<Simulation<D>> {
        // The global pool can only be initialised once per process; later
        // builders keep the first size.
        #[cfg(feature = "parallel")]
        if let Some(n) = self.config.num_threads {
            let _ = rayon::ThreadPoolBuilder::new().num_threads(n).build_global();
        }

        let network = Arc::new(self.network.unwrap_or_else(TransitNetwork::empty));
        let mut env = Environment::new(self.config.make_clock(), Arc::clone(&network));
        let mut queue = EventQueue::new();

        // ── Vehicles: register and seed releases ──────────────────────────
        for route in self.routes {
            let release_time = route.stops()[0].arrival;
            let vehicle = env.add_vehicle(route);
            queue.push(release_time, EventKind::VehicleRelease { vehicle })?;
        }

        // ── Trips: register and seed releases ─────────────────────────────
        for (release_time, segments) in self.trips {
            let trip = env.add_trip(release_time, &segments)?;
            queue.push(release_time, EventKind::TripRelease { trip })?;
        }

        // ── Partition: build (if strategic) and validate the exact cover ──
        let vehicle_ids: Vec<VehicleId> = env.vehicles().iter().map(|v| v.id).collect();
        let leg_ids: Vec<LegId> = env.legs().iter().map(|l| l.id).collect();

        let partition = match (self.partition, self.partitioner) {
            (Some(p), _) => Some(p),
            (None, Some(strategy)) => Some(strategy.partition(&vehicle_ids, &leg_ids)),
            (None, None) => None,
        };
        if let Some(p) = &partition {
            p.validate(&vehicle_ids, &leg_ids)?;
        }

        let mut coordinator = Coordinator::new(self.coordinator_config, self.dispatcher);
        if let Some(p) = partition {
            coordinator = coordinator.with_partition(p);
        }

        Ok(Simulation {
            config: self.config,
            env,
            queue,
            coordinator,
            control: RunControl::new(),
        })
    }
}
