//! Agent movement and trail deposit.
//!
//! Each agent advances `speed * dt` along its heading, the boundary policy
//! is applied to the new position, and one deposit is recorded in the cell
//! it lands in. Deposits go into the field's per-cell integer counters
//! first and are folded into `raw` in a second pass, so the result does not
//! depend on agent order or on how the batch was scheduled.

use std::sync::atomic::Ordering;

use slime_core::{resolve_position, Agent, BoundaryPolicy, StageKind};
use slime_field::{SimulationState, TrailField};
use slime_stage::{Dispatch, Stage, StageContext, StageReport};

/// Moves every agent one sub-step and deposits `trail_rate` where it lands.
#[derive(Clone, Copy, Debug, Default)]
pub struct MovementStage;

/// Advance `agent` by `step` along its heading and apply `policy`.
fn advance(agent: &mut Agent, step: f32, width: usize, height: usize, policy: BoundaryPolicy) {
    let (dx, dy) = agent.direction();
    let moved = (agent.position.0 + dx * step, agent.position.1 + dy * step);
    agent.position = resolve_position(moved, width, height, policy);
}

/// Fold the pending deposit counters into `raw` and reset them.
fn fold_deposits(field: &mut TrailField, trail_rate: f32, dispatch: &Dispatch) {
    // Cell-wide pass: uses the cell batch width, not the agent one.
    let width = dispatch.profile().cells;
    let (raw, counts) = field.deposit_buffers();
    let counts: &[_] = counts;
    dispatch.zip_mut(width, raw, counts, |raw, counts| {
        for (v, c) in raw.iter_mut().zip(counts) {
            let n = c.swap(0, Ordering::Relaxed);
            if n > 0 {
                *v += n as f32 * trail_rate;
            }
        }
    });
}

impl Stage for MovementStage {
    fn kind(&self) -> StageKind {
        StageKind::Movement
    }

    fn run(&self, state: &mut SimulationState, ctx: &StageContext<'_>) -> StageReport {
        let cfg = ctx.config();
        let dispatch = ctx.dispatch();
        let step = cfg.speed * ctx.dt();
        let policy = cfg.boundary;

        let field = &state.field;
        let (width, height) = (field.width(), field.height());
        let units = state.agents.len();

        let (groups, discarded) = dispatch.sum_mut(
            dispatch.width(StageKind::Movement),
            state.agents.as_mut_slice(),
            |_, agents| {
                let mut dropped = 0;
                for agent in agents {
                    advance(agent, step, width, height, policy);
                    // Position is already resolved; only Discard can miss.
                    let cell = agent
                        .cell()
                        .and_then(|(cx, cy)| field.resolve(cx, cy, BoundaryPolicy::Discard));
                    match cell {
                        Some(cell) => field.record_deposit(cell),
                        None => dropped += 1,
                    }
                }
                dropped
            },
        );

        fold_deposits(&mut state.field, cfg.trail_rate, dispatch);

        StageReport {
            kind: StageKind::Movement,
            units,
            groups,
            discarded,
        }
    }
}
