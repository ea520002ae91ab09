//! `mmt-dispatch` — the dispatcher plugin boundary.
//!
//! A dispatcher receives a frozen [`Snapshot`][mmt_model::Snapshot] and
//! returns assignment [`Decision`]s; it never touches live state.  The
//! coordinator (mmt-optim) handles validation, partitioning, and turning
//! decisions into events — dispatchers only rank and match.
//!
//! # Crate layout
//!
//! | Module         | Contents                                            |
//! |----------------|-----------------------------------------------------|
//! | [`dispatcher`] | the `Dispatcher` trait, `DispatchError`             |
//! | [`decision`]   | `Decision`, feasibility search over snapshot routes |
//! | [`builtin`]    | `NoopDispatcher`, `FirstFeasibleDispatcher`, `EarliestArrivalDispatcher` |

pub mod builtin;
pub mod decision;
pub mod dispatcher;

#[cfg(test)]
mod tests;

pub use builtin::{EarliestArrivalDispatcher, FirstFeasibleDispatcher, NoopDispatcher};
pub use decision::{Decision, feasible_insertions};
pub use dispatcher::{DispatchError, DispatchResult, Dispatcher};
