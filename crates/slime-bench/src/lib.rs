//! Benchmark profiles for the slime trail simulation.
//!
//! - [`reference_profile`]: 256×256 field, 10K agents, 1 sub-step
//! - [`stress_profile`]: 1024×1024 field, 250K agents, 3 sub-steps
//! - [`run_frames`]: tick a simulation `n` times at a fixed 60 Hz

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use slime_core::{ExecutionMode, SimConfig};
use slime_engine::Simulation;

/// Fixed frame time used by the profiles.
pub const FRAME_DT: f32 = 1.0 / 60.0;

/// 256×256 field with 10K agents.
pub fn reference_profile(seed: u64, execution: ExecutionMode) -> SimConfig {
    SimConfig {
        speed: 30.0,
        seed,
        execution,
        ..SimConfig::sized(256, 256, 10_000)
    }
}

/// 1024×1024 field with 250K agents and three sub-steps per frame.
pub fn stress_profile(seed: u64, execution: ExecutionMode) -> SimConfig {
    SimConfig {
        steps_per_frame: 3,
        speed: 30.0,
        seed,
        execution,
        ..SimConfig::sized(1024, 1024, 250_000)
    }
}

/// Tick `sim` `n` times at [`FRAME_DT`], continuing from its last wall time.
///
/// # Panics
///
/// Panics if a tick fails, which only happens if the simulation's cancel
/// token is set.
pub fn run_frames(sim: &mut Simulation, n: usize) {
    let mut t = sim.last_wall_time().unwrap_or(0.0);
    for _ in 0..n {
        t += FRAME_DT as f64;
        sim.tick(FRAME_DT, t).expect("benchmark tick");
    }
}
