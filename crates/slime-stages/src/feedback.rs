//! Diffused → raw feedback.

use slime_core::StageKind;
use slime_field::SimulationState;
use slime_stage::{Stage, StageContext, StageReport};

/// Copies the diffused buffer back into raw.
///
/// Afterwards both buffers hold the smoothed field, so the next frame's
/// agents sense it and a renderer may read either one.
#[derive(Clone, Copy, Debug, Default)]
pub struct FeedbackStage;

impl Stage for FeedbackStage {
    fn kind(&self) -> StageKind {
        StageKind::Feedback
    }

    fn run(&self, state: &mut SimulationState, ctx: &StageContext<'_>) -> StageReport {
        let dispatch = ctx.dispatch();
        let (diffused, raw) = state.field.feedback_buffers();
        let units = raw.len();
        let width = dispatch.width(StageKind::Feedback);
        let groups = dispatch.zip_mut(width, raw, diffused, |dst, src| dst.copy_from_slice(src));
        StageReport::new(StageKind::Feedback, units, groups)
    }
}
