//! Run a small simulation and print per-frame metrics.
//!
//! `RUST_LOG=slime_engine=trace cargo run -p slime-bench --example quickstart`
//! shows the per-frame trace events.

use slime_bench::{reference_profile, FRAME_DT};
use slime_core::ExecutionMode;
use slime_engine::Simulation;
use slime_field::RenderSource;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Slime Trail Quickstart ===\n");

    let config = reference_profile(42, ExecutionMode::Parallel);
    let mut sim = Simulation::new(config.clone()).unwrap();

    for frame in 0..120u32 {
        let report = sim.tick(FRAME_DT, frame as f64 * FRAME_DT as f64).unwrap();
        if frame % 30 == 0 || frame == 119 {
            let view = sim.view(RenderSource::Diffused);
            let mean = view.as_slice().iter().sum::<f32>() / view.as_slice().len() as f32;
            println!(
                "  frame {:>3}: max={:>8.3}, mean={:>8.5}, time={:>6}μs",
                report.frame.0,
                view.max(),
                mean,
                report.metrics.total_us,
            );
        }
    }

    tracing::info!("doubling the population");
    let outcome = sim
        .reconfigure(slime_core::SimConfig {
            agent_count: config.agent_count * 2,
            ..config
        })
        .unwrap();
    println!("\nReconfigured: {outcome:?}, agents={}", sim.agents().len());

    let report = sim.tick(FRAME_DT, 2.1).unwrap();
    println!("  frame {:>3}: time={:>6}μs", report.frame.0, report.metrics.total_us);
    println!(
        "  agents_hash={:016x} field_hash={:016x}",
        sim.agents_hash(),
        sim.field_hash()
    );
}
