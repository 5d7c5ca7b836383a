//! Re-initialisation and cancellation through the public `Simulation` API.

use slime_core::{Agent, SimConfig, StageKind, TickError};
use slime_engine::{Reconfigured, Simulation, StepScheduler};
use slime_field::RenderSource;
use slime_stages::{EvaporationStage, FeedbackStage, MovementStage};
use slime_test_utils::{scenario_config, single_agent_state, RecordingStage, StageLog};

#[test]
fn population_change_reinitialises_agents() {
    let mut sim = Simulation::new(SimConfig::sized(64, 48, 25)).unwrap();
    for i in 0..5 {
        sim.tick(0.016, i as f64 * 0.016).unwrap();
    }
    assert_eq!(sim.agents().len(), 25);

    let next = SimConfig {
        agent_count: 50,
        ..sim.config().clone()
    };
    assert_eq!(sim.reconfigure(next).unwrap(), Reconfigured::Repopulated);
    assert_eq!(sim.agents().len(), 50);
    assert!(sim.agents().all_within(64, 48));

    sim.tick(0.016, 1.0).unwrap();
    assert_eq!(sim.agents().len(), 50);
}

#[test]
fn resolution_change_gives_fresh_field() {
    let mut sim = Simulation::new(SimConfig::sized(32, 32, 40)).unwrap();
    sim.tick(0.1, 0.0).unwrap();
    assert!(sim.field().max_raw() > 0.0);

    let next = SimConfig {
        width: 20,
        height: 10,
        ..sim.config().clone()
    };
    assert_eq!(sim.reconfigure(next).unwrap(), Reconfigured::Resized);
    let view = sim.view(RenderSource::Raw);
    assert_eq!((view.width(), view.height()), (20, 10));
    assert!(view.as_slice().iter().all(|&v| v == 0.0));
    assert!(sim.agents().all_within(20, 10));
}

#[test]
fn cancellation_leaves_last_completed_stage_state() {
    let log = StageLog::new();
    let state = single_agent_state(4, 4, 2.0, 2.0, 0.0);
    let mut sim = Simulation::from_state(scenario_config(), state).unwrap();
    let token = sim.cancel_token();
    let trip = token.clone();
    let scheduler = StepScheduler::with_stages(
        vec![Box::new(MovementStage)],
        vec![
            Box::new(EvaporationStage),
            Box::new(
                RecordingStage::new(StageKind::Diffusion, log.clone())
                    .with_hook(move || trip.cancel()),
            ),
            Box::new(FeedbackStage),
        ],
    );
    sim = sim.with_scheduler(scheduler);

    let err = sim.tick(1.0, 0.0).unwrap_err();
    assert_eq!(
        err,
        TickError::Cancelled {
            after: Some("diffusion")
        }
    );
    assert_eq!(log.entries(), vec![StageKind::Diffusion]);
    // Movement and evaporation committed; feedback never copied diffused back.
    assert_eq!(sim.agents().as_slice()[0], Agent::new(3.0, 2.0, 0.0));
    assert_eq!(sim.field().get(3, 2), 0.5);
    assert!(sim.field().diffused().iter().all(|&v| v == 0.0));
    assert_eq!(sim.frame_id().0, 0);
    assert!(!token.is_cancelled());
}

#[test]
fn frame_counter_advances_only_on_success() {
    let mut sim = Simulation::new(SimConfig::sized(8, 8, 3)).unwrap();
    sim.tick(0.1, 0.0).unwrap();
    sim.cancel_token().cancel();
    assert!(sim.tick(0.1, 0.1).is_err());
    let report = sim.tick(0.1, 0.2).unwrap();
    assert_eq!(report.frame.0, 2);
    assert_eq!(sim.frame_id().0, 2);
}

#[test]
fn cancel_after_last_barrier_does_not_leak_into_next_frame() {
    let log = StageLog::new();
    let state = single_agent_state(4, 4, 0.5, 0.5, 0.0);
    let mut sim = Simulation::from_state(scenario_config(), state).unwrap();
    let trip = sim.cancel_token();
    let scheduler = StepScheduler::with_stages(
        vec![Box::new(MovementStage)],
        vec![
            Box::new(EvaporationStage),
            Box::new(FeedbackStage),
            Box::new(
                RecordingStage::new(StageKind::Feedback, log.clone())
                    .with_hook(move || trip.cancel()),
            ),
        ],
    );
    sim = sim.with_scheduler(scheduler);

    // The hook fires inside the final stage, after the last barrier check.
    sim.tick(1.0, 0.0).unwrap();
    assert!(!sim.cancel_token().is_cancelled());
    let report = sim.tick(1.0, 1.0).unwrap();
    assert_eq!(report.frame.0, 2);
    assert_eq!(log.entries(), vec![StageKind::Feedback, StageKind::Feedback]);
}
