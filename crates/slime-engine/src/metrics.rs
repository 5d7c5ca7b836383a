//! Per-frame metrics.
//!
//! [`FrameMetrics`] captures timing and dispatch data for a single frame.
//! All durations are in microseconds.

use slime_core::{FrameId, StageKind};
use slime_stage::StageReport;

/// Timing and dispatch metrics collected during one frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameMetrics {
    /// Wall-clock time for the whole frame, in microseconds.
    pub total_us: u64,
    /// Sub-steps completed.
    pub substeps: u32,
    /// Per-stage execution time summed over sub-steps: `(name, microseconds)`,
    /// in first-run order.
    pub stage_us: Vec<(&'static str, u64)>,
    /// Deposits that fell outside the field, summed over sub-steps.
    pub discarded_deposits: u64,
    /// Groups dispatched by one movement pass.
    pub movement_groups: usize,
    /// Groups dispatched by one sensing pass (0 when sensing is off).
    pub sensing_groups: usize,
}

impl FrameMetrics {
    /// Fold one stage invocation into the frame totals.
    pub fn record(&mut self, name: &'static str, report: &StageReport, us: u64) {
        match self.stage_us.iter_mut().find(|(n, _)| *n == name) {
            Some((_, total)) => *total += us,
            None => self.stage_us.push((name, us)),
        }
        self.discarded_deposits += report.discarded as u64;
        match report.kind {
            StageKind::Movement => self.movement_groups = report.groups,
            StageKind::Sensing => self.sensing_groups = report.groups,
            _ => {}
        }
    }

    /// Total time recorded for the stage called `name`.
    pub fn stage(&self, name: &str) -> Option<u64> {
        self.stage_us
            .iter()
            .find(|(n, _)| *n == name)
            .map(|&(_, us)| us)
    }
}

/// Result of a successful `Simulation::tick()`.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameReport {
    /// The frame just completed.
    pub frame: FrameId,
    /// Wall time passed to `tick()`.
    pub wall_time: f64,
    /// Metrics for this frame.
    pub metrics: FrameMetrics,
}
