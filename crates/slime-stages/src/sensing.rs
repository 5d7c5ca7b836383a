//! Trail sensing and steering.
//!
//! Each agent samples the raw field at three probes `sensor_offset_distance`
//! ahead of it: straight on, rotated by `-sensor_angle_rad`, and rotated by
//! `+sensor_angle_rad`. A probe's sample is the sum of raw over the
//! `(2r+1) × (2r+1)` window centred on the probe's cell, `r` being
//! `sensor_width`, with cells resolved through the boundary policy.
//!
//! The agent turns towards a side probe only when that side is strictly
//! greater than both other samples. Ties keep the heading bit-for-bit.

use slime_core::agent::normalize_angle;
use slime_core::{quantize, Agent, BoundaryPolicy, SimConfig, StageKind};
use slime_field::{SimulationState, TrailField};
use slime_stage::{Stage, StageContext, StageReport};

/// Steers every agent towards the strongest of its three probes.
#[derive(Clone, Copy, Debug, Default)]
pub struct SensingStage;

/// Outcome of comparing the three probe samples.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Steer {
    /// Keep the current heading.
    Straight,
    /// Turn by `-sensor_angle_rad`.
    Left,
    /// Turn by `+sensor_angle_rad`.
    Right,
}

impl Steer {
    /// Pick a direction from the forward, left and right samples.
    ///
    /// A side wins only when it is strictly greater than both others.
    ///
    /// ```
    /// use slime_stages::Steer;
    ///
    /// assert_eq!(Steer::choose(1.0, 2.0, 0.0), Steer::Left);
    /// assert_eq!(Steer::choose(1.0, 2.0, 2.0), Steer::Straight);
    /// assert_eq!(Steer::choose(3.0, 2.0, 2.0), Steer::Straight);
    /// ```
    pub fn choose(forward: f32, left: f32, right: f32) -> Self {
        if left > forward && left > right {
            Steer::Left
        } else if right > forward && right > left {
            Steer::Right
        } else {
            Steer::Straight
        }
    }
}

/// Sum of raw over the sensor window around the point `(px, py)`.
///
/// A probe with a NaN coordinate has no cell and samples `0.0`.
fn sample(field: &TrailField, (px, py): (f32, f32), radius: usize, policy: BoundaryPolicy) -> f32 {
    match (quantize(px), quantize(py)) {
        (Some(cx), Some(cy)) => field.window_sum(cx, cy, radius, policy),
        _ => 0.0,
    }
}

/// Sample the three probes for `agent` and return the steering decision.
fn steer(agent: &Agent, field: &TrailField, cfg: &SimConfig) -> Steer {
    let angle = cfg.sensor_angle_rad;
    let distance = cfg.sensor_offset_distance;
    let probe = |a: f32| {
        sample(
            field,
            agent.probe(a, distance),
            cfg.sensor_width,
            cfg.boundary,
        )
    };
    let forward = probe(agent.heading);
    let left = probe(agent.heading - angle);
    let right = probe(agent.heading + angle);
    Steer::choose(forward, left, right)
}

impl Stage for SensingStage {
    fn kind(&self) -> StageKind {
        StageKind::Sensing
    }

    fn run(&self, state: &mut SimulationState, ctx: &StageContext<'_>) -> StageReport {
        let cfg = ctx.config();
        let dispatch = ctx.dispatch();
        let field = &state.field;
        let units = state.agents.len();

        let groups = dispatch.for_each_mut(
            dispatch.width(StageKind::Sensing),
            state.agents.as_mut_slice(),
            |_, agents| {
                for agent in agents {
                    match steer(agent, field, cfg) {
                        Steer::Straight => {}
                        Steer::Left => {
                            agent.heading = normalize_angle(agent.heading - cfg.sensor_angle_rad)
                        }
                        Steer::Right => {
                            agent.heading = normalize_angle(agent.heading + cfg.sensor_angle_rad)
                        }
                    }
                }
            },
        );

        StageReport::new(StageKind::Sensing, units, groups)
    }
}
