//! The five stages of a slime trail frame.
//!
//! # Frame order
//!
//! 1. [`MovementStage`]: advance agents, deposit into raw (per sub-step)
//! 2. [`SensingStage`]: steer agents from the raw field (per sub-step, optional)
//! 3. [`EvaporationStage`]: decay raw in place
//! 4. [`DiffusionStage`]: raw → diffused, 3×3 blur
//! 5. [`FeedbackStage`]: diffused → raw
//!
//! Every stage is a unit struct; parameters come from the
//! [`StageContext`](slime_stage::StageContext) at run time.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod diffusion;
pub mod evaporation;
pub mod feedback;
pub mod movement;
pub mod sensing;

pub use diffusion::{DiffusionStage, DIFFUSE_RADIUS};
pub use evaporation::EvaporationStage;
pub use feedback::FeedbackStage;
pub use movement::MovementStage;
pub use sensing::{SensingStage, Steer};

use slime_stage::Stage;

/// The two stages run once per sub-step, in order.
pub fn substep_stages() -> Vec<Box<dyn Stage>> {
    vec![Box::new(MovementStage), Box::new(SensingStage)]
}

/// The three stages run once per frame after all sub-steps, in order.
pub fn frame_stages() -> Vec<Box<dyn Stage>> {
    vec![
        Box::new(EvaporationStage),
        Box::new(DiffusionStage),
        Box::new(FeedbackStage),
    ]
}
