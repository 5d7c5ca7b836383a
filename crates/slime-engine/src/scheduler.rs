//! The per-frame stage pipeline.
//!
//! # Frame order
//!
//! ```text
//! repeat steps_per_frame:
//!     movement
//!     sensing            (skipped when sensing_enabled is false)
//! evaporation
//! diffusion
//! feedback
//! ```
//!
//! Each stage returns only after its whole batch has finished, so the
//! point between two stage calls is a barrier. The scheduler checks the
//! [`CancelToken`] at every barrier, including the one before the first
//! stage.

use std::time::Instant;

use slime_core::{StageKind, TickError};
use slime_field::SimulationState;
use slime_stage::{Stage, StageContext};

use crate::cancel::CancelToken;
use crate::metrics::FrameMetrics;

/// Where the scheduler is in its frame cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SchedulerPhase {
    /// Between frames. Reconfiguration and reads are allowed.
    #[default]
    Idle,
    /// A frame is in flight.
    Stepping,
}

/// Runs the sub-step stages `steps_per_frame` times, then the frame stages
/// once.
pub struct StepScheduler {
    substep: Vec<Box<dyn Stage>>,
    frame: Vec<Box<dyn Stage>>,
    phase: SchedulerPhase,
}

impl StepScheduler {
    /// The standard five-stage pipeline.
    pub fn new() -> Self {
        Self::with_stages(slime_stages::substep_stages(), slime_stages::frame_stages())
    }

    /// A pipeline with explicit stage lists.
    ///
    /// `substep` runs in order once per sub-step; `frame` runs in order once
    /// after the last sub-step. Any stage whose kind is
    /// [`StageKind::Sensing`] is skipped while sensing is disabled.
    pub fn with_stages(substep: Vec<Box<dyn Stage>>, frame: Vec<Box<dyn Stage>>) -> Self {
        Self {
            substep,
            frame,
            phase: SchedulerPhase::Idle,
        }
    }

    /// Current phase.
    pub fn phase(&self) -> SchedulerPhase {
        self.phase
    }

    /// Stage names in execution order for one frame with one sub-step.
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.substep
            .iter()
            .chain(&self.frame)
            .map(|s| s.name())
            .collect()
    }

    /// Run one frame.
    ///
    /// On cancellation the state is left exactly as the last completed
    /// stage left it and [`TickError::Cancelled`] names that stage.
    pub fn run_frame(
        &mut self,
        state: &mut SimulationState,
        ctx: &StageContext<'_>,
        cancel: &CancelToken,
    ) -> Result<FrameMetrics, TickError> {
        self.phase = SchedulerPhase::Stepping;
        let result = self.drive(state, ctx, cancel);
        self.phase = SchedulerPhase::Idle;
        result
    }

    fn drive(
        &self,
        state: &mut SimulationState,
        ctx: &StageContext<'_>,
        cancel: &CancelToken,
    ) -> Result<FrameMetrics, TickError> {
        let frame_start = Instant::now();
        let cfg = ctx.config();
        let mut metrics = FrameMetrics::default();
        let mut last = None;

        for _ in 0..cfg.steps_per_frame {
            for stage in &self.substep {
                if stage.kind() == StageKind::Sensing && !cfg.sensing_enabled {
                    continue;
                }
                run_stage(stage.as_ref(), state, ctx, cancel, &mut last, &mut metrics)?;
            }
            metrics.substeps += 1;
        }
        for stage in &self.frame {
            run_stage(stage.as_ref(), state, ctx, cancel, &mut last, &mut metrics)?;
        }

        metrics.total_us = frame_start.elapsed().as_micros() as u64;
        Ok(metrics)
    }
}

impl Default for StepScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for StepScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StepScheduler")
            .field("stages", &self.stage_names())
            .field("phase", &self.phase)
            .finish()
    }
}

fn run_stage(
    stage: &dyn Stage,
    state: &mut SimulationState,
    ctx: &StageContext<'_>,
    cancel: &CancelToken,
    last: &mut Option<&'static str>,
    metrics: &mut FrameMetrics,
) -> Result<(), TickError> {
    if cancel.is_cancelled() {
        return Err(TickError::Cancelled { after: *last });
    }
    let start = Instant::now();
    let report = stage.run(state, ctx);
    metrics.record(stage.name(), &report, start.elapsed().as_micros() as u64);
    *last = Some(stage.name());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use slime_core::SimConfig;
    use slime_core::StageKind::*;
    use slime_test_utils::{state_with, RecordingStage, StageLog};

    fn recording(log: &StageLog) -> StepScheduler {
        StepScheduler::with_stages(
            vec![
                Box::new(RecordingStage::new(Movement, log.clone())),
                Box::new(RecordingStage::new(Sensing, log.clone())),
            ],
            vec![
                Box::new(RecordingStage::new(Evaporation, log.clone())),
                Box::new(RecordingStage::new(Diffusion, log.clone())),
                Box::new(RecordingStage::new(Feedback, log.clone())),
            ],
        )
    }

    #[test]
    fn standard_pipeline_order() {
        assert_eq!(
            StepScheduler::new().stage_names(),
            vec!["movement", "sensing", "evaporation", "diffusion", "feedback"]
        );
    }

    #[test]
    fn substeps_repeat_agent_stages_only() {
        let log = StageLog::new();
        let mut sched = recording(&log);
        let cfg = SimConfig {
            steps_per_frame: 3,
            ..SimConfig::sized(4, 4, 1)
        };
        let mut state = state_with(4, 4, vec![]);
        let metrics = sched
            .run_frame(&mut state, &StageContext::new(&cfg, 1.0), &CancelToken::new())
            .unwrap();

        assert_eq!(
            log.entries(),
            vec![
                Movement, Sensing, Movement, Sensing, Movement, Sensing, Evaporation, Diffusion,
                Feedback
            ]
        );
        assert_eq!(metrics.substeps, 3);
        assert_eq!(metrics.stage_us.len(), 5);
        assert_eq!(sched.phase(), SchedulerPhase::Idle);
    }

    #[test]
    fn sensing_skipped_when_disabled() {
        let log = StageLog::new();
        let mut sched = recording(&log);
        let cfg = SimConfig {
            sensing_enabled: false,
            steps_per_frame: 2,
            ..SimConfig::sized(4, 4, 1)
        };
        let mut state = state_with(4, 4, vec![]);
        let metrics = sched
            .run_frame(&mut state, &StageContext::new(&cfg, 1.0), &CancelToken::new())
            .unwrap();
        assert_eq!(
            log.entries(),
            vec![Movement, Movement, Evaporation, Diffusion, Feedback]
        );
        assert_eq!(metrics.sensing_groups, 0);
        assert_eq!(metrics.stage("sensing"), None);
    }

    #[test]
    fn cancel_before_first_stage_runs_nothing() {
        let log = StageLog::new();
        let mut sched = recording(&log);
        let cfg = SimConfig::sized(4, 4, 1);
        let mut state = state_with(4, 4, vec![]);
        let token = CancelToken::new();
        token.cancel();
        let err = sched
            .run_frame(&mut state, &StageContext::new(&cfg, 1.0), &token)
            .unwrap_err();
        assert_eq!(err, TickError::Cancelled { after: None });
        assert!(log.entries().is_empty());
        assert_eq!(sched.phase(), SchedulerPhase::Idle);
    }

    #[test]
    fn cancel_mid_frame_stops_at_next_barrier() {
        let log = StageLog::new();
        let token = CancelToken::new();
        let trip = token.clone();
        let mut sched = StepScheduler::with_stages(
            vec![Box::new(RecordingStage::new(Movement, log.clone()))],
            vec![
                Box::new(
                    RecordingStage::new(Evaporation, log.clone()).with_hook(move || trip.cancel()),
                ),
                Box::new(RecordingStage::new(Diffusion, log.clone())),
            ],
        );
        let cfg = SimConfig::sized(4, 4, 1);
        let mut state = state_with(4, 4, vec![]);
        let err = sched
            .run_frame(&mut state, &StageContext::new(&cfg, 1.0), &token)
            .unwrap_err();
        assert_eq!(
            err,
            TickError::Cancelled {
                after: Some("evaporation")
            }
        );
        assert_eq!(log.entries(), vec![Movement, Evaporation]);
    }
}
