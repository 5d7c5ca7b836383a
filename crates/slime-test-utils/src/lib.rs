//! Test utilities for slime development.
//!
//! Provides builders for small deterministic fields and populations, the
//! fixed configurations used across the workspace's tests, and the
//! [`RecordingStage`] fixture for checking scheduler ordering.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

pub use fixtures::{RecordingStage, StageLog};

use std::f32::consts::TAU;

use slime_core::{Agent, BoundaryPolicy, ExecutionMode, SimConfig};
use slime_field::{AgentStore, SimulationState, TrailField};

/// Golden angle in radians, used to spread fixture headings.
const GOLDEN_ANGLE: f32 = 2.399_963;

/// A `width × height` field with the given raw cells set.
///
/// # Panics
///
/// Panics on a zero dimension or an out-of-range cell.
pub fn field_with(width: usize, height: usize, cells: &[((usize, usize), f32)]) -> TrailField {
    let mut field = TrailField::new(width, height).expect("fixture field dimensions");
    for &((x, y), v) in cells {
        field.set(x, y, v);
    }
    field
}

/// A field whose raw buffer is `value` everywhere.
pub fn uniform_field(width: usize, height: usize, value: f32) -> TrailField {
    let mut field = TrailField::new(width, height).expect("fixture field dimensions");
    field.raw_mut().fill(value);
    field
}

/// A field whose raw buffer is taken from `values` (row-major).
///
/// # Panics
///
/// Panics if `values.len() != width * height`.
pub fn field_from_raw(width: usize, height: usize, values: &[f32]) -> TrailField {
    let mut field = TrailField::new(width, height).expect("fixture field dimensions");
    field.raw_mut().copy_from_slice(values);
    field
}

/// `n` agents laid out deterministically over the field.
///
/// Positions step through a coprime lattice so they cover the whole field
/// without any random source; headings advance by the golden angle.
pub fn lattice_agents(n: usize, width: usize, height: usize) -> Vec<Agent> {
    let (w, h) = (width as f32, height as f32);
    (0..n)
        .map(|i| {
            let t = i as f32;
            let x = (t * 0.618_034 * w + 0.5).rem_euclid(w);
            let y = (t * 0.381_966 * h + 0.25).rem_euclid(h);
            Agent::new(x, y, (t * GOLDEN_ANGLE).rem_euclid(TAU))
        })
        .collect()
}

/// A zeroed `width × height` field with the given agents.
pub fn state_with(width: usize, height: usize, agents: Vec<Agent>) -> SimulationState {
    SimulationState::new(
        TrailField::new(width, height).expect("fixture field dimensions"),
        AgentStore::from_agents(agents),
    )
}

/// A single agent at `(x, y)` facing `heading` on a zeroed field.
pub fn single_agent_state(
    width: usize,
    height: usize,
    x: f32,
    y: f32,
    heading: f32,
) -> SimulationState {
    state_with(width, height, vec![Agent::new(x, y, heading)])
}

/// The 4×4 single-agent configuration: speed 1, trail rate 1,
/// evaporation 0.5, no sensing, no diffusion, serial dispatch.
pub fn scenario_config() -> SimConfig {
    SimConfig {
        width: 4,
        height: 4,
        agent_count: 1,
        speed: 1.0,
        steps_per_frame: 1,
        evaporation_speed: 0.5,
        diffuse_speed: 0.0,
        trail_rate: 1.0,
        sensing_enabled: false,
        boundary: BoundaryPolicy::Clamp,
        execution: ExecutionMode::Serial,
        ..SimConfig::default()
    }
}

/// A small configuration with every stage active, for determinism tests.
pub fn busy_config(execution: ExecutionMode) -> SimConfig {
    SimConfig {
        width: 48,
        height: 32,
        agent_count: 300,
        speed: 12.0,
        steps_per_frame: 3,
        sensor_offset_distance: 4.0,
        seed: 0x5EED,
        execution,
        ..SimConfig::default()
    }
}
