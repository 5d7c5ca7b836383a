//! Stage trait and batch dispatch for the slime trail simulation.
//!
//! The [`Stage`] trait defines the `&self` run function over an explicit
//! [`SimulationState`](slime_field::SimulationState) plus a read-only
//! [`StageContext`]. [`Dispatch`] splits a stage into device-width groups
//! and runs them serially or on the rayon pool.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod context;
pub mod dispatch;
pub mod stage;

pub use context::StageContext;
pub use dispatch::{group_count, Dispatch};
pub use stage::{Stage, StageReport};
