//! `mmt-sim` — the simulation driver.
//!
//! # The loop
//!
//! ```text
//! loop:
//!   ① Gate      — honor pause (blocks on a condvar) and stop (drains queue).
//!   ② Pop       — next event by (time, priority, sequence); empty = done.
//!   ③ Advance   — move the clock to the event's timestamp (monotonic).
//!   ④ Transition— advance the target entity's state machine (mmt-model::fsm).
//!   ⑤ Apply     — run the handler body: mutate the environment, enqueue
//!                 follow-up events.
//!   ⑥ Observe   — notify observers with the event and environment.
//!   ⑦ Optimize  — if a checkpoint is due, freeze → dispatch → re-inject.
//! ```
//!
//! Steps ④ and ⑤ are the two-step event protocol: the state machine is
//! always advanced before the handler body runs, and a mismatch is fatal.
//!
//! The loop is strictly single-threaded; the only cross-thread surface is
//! [`RunControl`] (pause/resume/stop) and the only internal parallelism is
//! the per-subset dispatch inside a checkpoint (the `parallel` feature).
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use mmt_core::{NodeId, SimConfig, SimTime};
//! use mmt_dispatch::FirstFeasibleDispatcher;
//! use mmt_model::{Route, Stop};
//! use mmt_optim::CoordinatorConfig;
//! use mmt_sim::{NoopObserver, SimBuilder};
//!
//! let mut sim = SimBuilder::new(
//!     SimConfig::default(),
//!     CoordinatorConfig::default(),
//!     FirstFeasibleDispatcher,
//! )
//! .vehicle(route)
//! .trip(SimTime(0), vec![(NodeId(0), NodeId(1))])
//! .build()?;
//! let summary = sim.run(&mut NoopObserver)?;
//! ```

pub mod builder;
pub mod control;
pub mod error;
pub mod observer;
pub mod sim;

mod handlers;


pub use builder::SimBuilder;
pub use control::{DriverState, RunControl};
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use sim::{RunSummary, Simulation};
