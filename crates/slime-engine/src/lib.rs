//! Frame scheduling and the owned simulation.
//!
//! [`Simulation`] owns the trail field, the agents and the random source,
//! and advances them one frame per [`tick()`](Simulation::tick). The
//! [`StepScheduler`] inside it runs the stage pipeline in its fixed order
//! and checks a [`CancelToken`] at every stage barrier.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod cancel;
pub mod hash;
pub mod metrics;
pub mod scheduler;
pub mod simulation;

pub use cancel::CancelToken;
pub use hash::{agents_hash, field_hash};
pub use metrics::{FrameMetrics, FrameReport};
pub use scheduler::{SchedulerPhase, StepScheduler};
pub use simulation::{Reconfigured, Simulation};
