//! Partitions: disjoint, exhaustive groupings of vehicles and legs.
//!
//! A partition scopes independent dispatcher invocations: subsets share no
//! entities, so their dispatches may run out of order or concurrently with no
//! coordination.  The exact-cover invariant (every vehicle id and leg id in
//! exactly one subset) is validated before the simulation starts; a gap or
//! overlap is a configuration error, never a runtime surprise.

use rustc_hash::FxHashSet;
use thiserror::Error;

use mmt_core::{LegId, VehicleId};

// ── Errors ────────────────────────────────────────────────────────────────────

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PartitionError {
    #[error("vehicle {0} belongs to no subset")]
    UncoveredVehicle(VehicleId),

    #[error("leg {0} belongs to no subset")]
    UncoveredLeg(LegId),

    #[error("vehicle {0} belongs to more than one subset")]
    OverlappingVehicle(VehicleId),

    #[error("leg {0} belongs to more than one subset")]
    OverlappingLeg(LegId),
}

// ── PartitionSubset ───────────────────────────────────────────────────────────

/// One membership set of a partition.  Pure data: it answers "is this id
/// mine?" and nothing else.
#[derive(Debug, Clone, Default)]
pub struct PartitionSubset {
    vehicles: FxHashSet<VehicleId>,
    legs: FxHashSet<LegId>,
}

impl PartitionSubset {
    pub fn new(
        vehicles: impl IntoIterator<Item = VehicleId>,
        legs: impl IntoIterator<Item = LegId>,
    ) -> Self {
        Self {
            vehicles: vehicles.into_iter().collect(),
            legs: legs.into_iter().collect(),
        }
    }

    #[inline]
    pub fn contains_vehicle(&self, id: VehicleId) -> bool {
        self.vehicles.contains(&id)
    }

    #[inline]
    pub fn contains_leg(&self, id: LegId) -> bool {
        self.legs.contains(&id)
    }

    pub fn vehicle_count(&self) -> usize {
        self.vehicles.len()
    }

    pub fn leg_count(&self) -> usize {
        self.legs.len()
    }
}

// ── Partition ─────────────────────────────────────────────────────────────────

/// An ordered set of disjoint subsets covering the whole fleet and demand.
#[derive(Debug, Clone, Default)]
pub struct Partition {
    subsets: Vec<PartitionSubset>,
}

impl Partition {
    pub fn new(subsets: Vec<PartitionSubset>) -> Self {
        Self { subsets }
    }

    pub fn subsets(&self) -> &[PartitionSubset] {
        &self.subsets
    }

    pub fn len(&self) -> usize {
        self.subsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subsets.is_empty()
    }

    /// Index of the subset owning `id`, if any.
    pub fn subset_of_vehicle(&self, id: VehicleId) -> Option<usize> {
        self.subsets.iter().position(|s| s.contains_vehicle(id))
    }

    pub fn subset_of_leg(&self, id: LegId) -> Option<usize> {
        self.subsets.iter().position(|s| s.contains_leg(id))
    }

    /// Check the exact-cover invariant against the full id universe.
    ///
    /// Every vehicle and leg must belong to exactly one subset.  Called by
    /// the simulation builder before the run starts.
    pub fn validate(&self, vehicles: &[VehicleId], legs: &[LegId]) -> Result<(), PartitionError> {
        for &v in vehicles {
            match self.subsets.iter().filter(|s| s.contains_vehicle(v)).count() {
                0 => return Err(PartitionError::UncoveredVehicle(v)),
                1 => {}
                _ => return Err(PartitionError::OverlappingVehicle(v)),
            }
        }
        for &l in legs {
            match self.subsets.iter().filter(|s| s.contains_leg(l)).count() {
                0 => return Err(PartitionError::UncoveredLeg(l)),
                1 => {}
                _ => return Err(PartitionError::OverlappingLeg(l)),
            }
        }
        Ok(())
    }
}

// ── Partitioner ───────────────────────────────────────────────────────────────

/// Strategy that builds a [`Partition`] from the full id universe.
///
/// Implementations must produce an exact cover; the builder re-validates
/// whatever they return, so a buggy partitioner fails fast at configuration
/// time.
pub trait Partitioner {
    fn partition(&self, vehicles: &[VehicleId], legs: &[LegId]) -> Partition;
}

/// The default: one implicit subset containing everything.
pub struct WholeFleet;

impl Partitioner for WholeFleet {
    fn partition(&self, vehicles: &[VehicleId], legs: &[LegId]) -> Partition {
        Partition::new(vec![PartitionSubset::new(
            vehicles.iter().copied(),
            legs.iter().copied(),
        )])
    }
}

/// Deterministic id-modulo split into `k` subsets.
///
/// Simple and balanced, but blind to geography: a leg may land in a subset
/// whose vehicles cannot serve it, in which case it stays unassigned until a
/// later checkpoint (or forever, if no subset-local vehicle fits).  Scenario
/// authors choose subsets that keep demand near supply.
pub struct HashPartitioner {
    pub k: usize,
}

impl Partitioner for HashPartitioner {
    fn partition(&self, vehicles: &[VehicleId], legs: &[LegId]) -> Partition {
        let k = self.k.max(1);
        let mut subsets = vec![PartitionSubset::default(); k];
        for &v in vehicles {
            subsets[v.index() % k].vehicles.insert(v);
        }
        for &l in legs {
            subsets[l.index() % k].legs.insert(l);
        }
        Partition::new(subsets)
    }
}
