//! Slime: a stigmergic physarum trail simulation.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all slime sub-crates. For most users, adding `slime` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use slime::prelude::*;
//!
//! let config = SimConfig {
//!     steps_per_frame: 2,
//!     boundary: BoundaryPolicy::Wrap,
//!     ..SimConfig::sized(64, 64, 500)
//! };
//! let mut sim = Simulation::new(config).unwrap();
//! for frame in 0..30 {
//!     sim.tick(1.0 / 30.0, frame as f64 / 30.0).unwrap();
//! }
//!
//! let view = sim.view(RenderSource::Diffused);
//! assert_eq!((view.width(), view.height()), (64, 64));
//! assert!(view.max() > 0.0);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `slime-core` | `Agent`, `SimConfig`, boundary policy, errors, IDs |
//! | [`field`] | `slime-field` | `TrailField`, `AgentStore`, `FieldView` |
//! | [`stage`] | `slime-stage` | `Stage` trait, `StageContext`, batch dispatch |
//! | [`stages`] | `slime-stages` | Movement, sensing, evaporation, diffusion, feedback |
//! | [`engine`] | `slime-engine` | `Simulation`, `StepScheduler`, metrics, cancellation |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, configuration, and errors (`slime-core`).
pub use slime_core as types;

/// Trail field and agent storage (`slime-field`).
///
/// Renderers only need [`field::FieldView`] and [`field::RenderSource`],
/// both also in the [`prelude`].
pub use slime_field as field;

/// Stage trait and batch dispatch (`slime-stage`).
///
/// The [`stage::Stage`] trait is the extension point for custom pipelines
/// built with [`engine::StepScheduler::with_stages`].
pub use slime_stage as stage;

/// The five standard stages (`slime-stages`).
pub use slime_stages as stages;

/// Frame scheduler and owned simulation (`slime-engine`).
pub use slime_engine as engine;

/// Common imports for typical slime usage.
///
/// ```rust
/// use slime::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use slime_core::{
        Agent, BatchProfile, BoundaryPolicy, ExecutionMode, FrameId, SimConfig, StageKind,
    };

    // Errors
    pub use slime_core::{ConfigError, TickError};

    // Field
    pub use slime_field::{AgentStore, FieldView, RenderSource, TrailField};

    // Stages
    pub use slime_stage::{Stage, StageContext, StageReport};

    // Engine
    pub use slime_engine::{
        CancelToken, FrameMetrics, FrameReport, Reconfigured, SchedulerPhase, Simulation,
        StepScheduler,
    };
}
