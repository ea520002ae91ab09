//! `mmt-optim` — the optimization coordination protocol.
//!
//! The coordinator decides *when* to invoke the dispatcher, *what* it sees (a
//! frozen snapshot, optionally split across disjoint partition subsets), and
//! *how* its decisions re-enter the event stream (as `LegAssigned` events at
//! or after the freeze horizon — never inside the frozen window).
//!
//! # Crate layout
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`partition`]   | `Partition`, `PartitionSubset`, `Partitioner`, exact-cover validation |
//! | [`coordinator`] | `Coordinator`, `CoordinatorConfig`, checkpoint algorithm, `StaleDecision` |
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                   |
//! |------------|----------------------------------------------------------|
//! | `parallel` | Per-subset dispatch runs on Rayon's thread pool.         |

pub mod coordinator;
pub mod partition;


pub use coordinator::{CheckpointReport, Coordinator, CoordinatorConfig, StaleDecision};
pub use partition::{HashPartitioner, Partition, PartitionError, PartitionSubset, Partitioner, WholeFleet};
