//! 3×3 box-blur diffusion from raw into diffused.
//!
//! Each output cell moves from its raw value towards the mean of its
//! `(2·DIFFUSE_RADIUS + 1)²` neighbourhood by `diffuse_speed`:
//!
//! ```text
//! diffused[i] = raw[i] + diffuse_speed * (mean(raw[window(i)]) - raw[i])
//! ```
//!
//! The window is truncated at the field edges: the mean is taken over the
//! in-bounds cells only. Diffusion reads only raw and writes only diffused.

use slime_core::StageKind;
use slime_field::SimulationState;
use slime_stage::{Stage, StageContext, StageReport};

/// Neighbourhood radius of the blur kernel, in cells.
pub const DIFFUSE_RADIUS: usize = 1;

/// Blurs raw into diffused.
#[derive(Clone, Copy, Debug, Default)]
pub struct DiffusionStage;

/// Mean of `raw` over the truncated window centred on `(x, y)`.
fn local_mean(raw: &[f32], width: usize, height: usize, x: usize, y: usize) -> f32 {
    let x0 = x.saturating_sub(DIFFUSE_RADIUS);
    let y0 = y.saturating_sub(DIFFUSE_RADIUS);
    let x1 = (x + DIFFUSE_RADIUS).min(width - 1);
    let y1 = (y + DIFFUSE_RADIUS).min(height - 1);

    let mut sum = 0.0f32;
    for yy in y0..=y1 {
        let row = &raw[yy * width..(yy + 1) * width];
        sum += row[x0..=x1].iter().sum::<f32>();
    }
    let count = (x1 - x0 + 1) * (y1 - y0 + 1);
    sum / count as f32
}

impl Stage for DiffusionStage {
    fn kind(&self) -> StageKind {
        StageKind::Diffusion
    }

    fn run(&self, state: &mut SimulationState, ctx: &StageContext<'_>) -> StageReport {
        let speed = ctx.config().diffuse_speed;
        let dispatch = ctx.dispatch();
        let (width, height) = (state.field.width(), state.field.height());
        let (raw, diffused) = state.field.diffusion_buffers();
        let units = diffused.len();

        let groups = dispatch.for_each_mut(
            dispatch.width(StageKind::Diffusion),
            diffused,
            |offset, out| {
                for (k, d) in out.iter_mut().enumerate() {
                    let i = offset + k;
                    let (x, y) = (i % width, i / width);
                    let v = raw[i];
                    *d = v + speed * (local_mean(raw, width, height, x, y) - v);
                }
            },
        );

        StageReport::new(StageKind::Diffusion, units, groups)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use slime_core::{BatchProfile, ExecutionMode, SimConfig};
    use slime_test_utils::{field_from_raw, field_with, state_with, uniform_field};

    fn config(diffuse_speed: f32) -> SimConfig {
        SimConfig {
            diffuse_speed,
            execution: ExecutionMode::Serial,
            ..SimConfig::sized(4, 4, 1)
        }
    }

    fn run(state: &mut SimulationState, cfg: &SimConfig) -> StageReport {
        DiffusionStage.run(state, &StageContext::new(cfg, 1.0))
    }

    #[test]
    fn local_mean_truncates_at_edges() {
        let raw = vec![1.0f32; 16];
        assert_eq!(local_mean(&raw, 4, 4, 0, 0), 1.0);
        let mut raw = vec![0.0f32; 16];
        raw[0] = 4.0;
        // Corner: 2×2 window.
        assert_eq!(local_mean(&raw, 4, 4, 0, 0), 1.0);
        // Edge: 3×2 window.
        assert!((local_mean(&raw, 4, 4, 1, 0) - 4.0 / 6.0).abs() < 1e-6);
        // Interior: full 3×3 window.
        assert!((local_mean(&raw, 4, 4, 1, 1) - 4.0 / 9.0).abs() < 1e-6);
        assert_eq!(local_mean(&raw, 4, 4, 3, 3), 0.0);
    }

    #[test]
    fn single_cell_field_is_fixed_point() {
        let cfg = config(1.0);
        let mut state = state_with(1, 1, vec![]);
        state.field.set(0, 0, 3.0);
        run(&mut state, &cfg);
        assert_eq!(state.field.get_diffused(0, 0), 3.0);
    }

    #[test]
    fn uniform_field_is_unchanged() {
        let cfg = config(0.5);
        let mut state = state_with(4, 4, vec![]);
        state.field = uniform_field(4, 4, 2.5);
        run(&mut state, &cfg);
        assert!(state.field.diffused().iter().all(|&v| v == 2.5));
    }

    #[test]
    fn reads_raw_and_writes_only_diffused() {
        let cfg = config(1.0);
        let mut state = state_with(4, 4, vec![]);
        state.field = field_with(4, 4, &[((1, 1), 9.0)]);
        let raw_before = state.field.raw().to_vec();
        run(&mut state, &cfg);
        assert_eq!(state.field.raw(), &raw_before[..]);
        assert_eq!(state.field.get_diffused(1, 1), 1.0);
        assert_eq!(state.field.get_diffused(0, 0), 9.0 / 4.0);
        assert_eq!(state.field.get_diffused(3, 3), 0.0);
    }

    #[test]
    fn zero_speed_copies_raw() {
        let cfg = config(0.0);
        let mut state = state_with(4, 4, vec![]);
        state.field = field_with(4, 4, &[((2, 3), 1.5), ((0, 1), 0.25)]);
        run(&mut state, &cfg);
        assert_eq!(state.field.diffused(), state.field.raw());
    }

    #[test]
    fn batch_width_does_not_change_output() {
        let values: Vec<f32> = (0..15 * 9).map(|i| ((i * 7) % 11) as f32).collect();
        let mut outputs = Vec::new();
        for (execution, width) in [
            (ExecutionMode::Serial, 4096),
            (ExecutionMode::Parallel, 1),
            (ExecutionMode::Parallel, 7),
            (ExecutionMode::Parallel, 15),
        ] {
            let cfg = SimConfig {
                diffuse_speed: 0.3,
                execution,
                batch: BatchProfile::uniform(width),
                ..SimConfig::sized(15, 9, 1)
            };
            let mut state = state_with(15, 9, vec![]);
            state.field = field_from_raw(15, 9, &values);
            run(&mut state, &cfg);
            outputs.push(state.field.diffused().to_vec());
        }
        assert!(outputs.windows(2).all(|w| w[0] == w[1]));
    }

    proptest! {
        #[test]
        fn stays_between_raw_and_local_mean(
            values in prop::collection::vec(0.0f32..50.0, 7 * 5),
            speed in 0.0f32..=1.0,
        ) {
            let cfg = config(speed);
            let mut state = state_with(7, 5, vec![]);
            state.field = field_from_raw(7, 5, &values);
            run(&mut state, &cfg);
            for y in 0..5 {
                for x in 0..7 {
                    let v = values[y * 7 + x];
                    let m = local_mean(&values, 7, 5, x, y);
                    let d = state.field.get_diffused(x, y);
                    let tol = 1e-4 * (1.0 + v.abs().max(m.abs()));
                    prop_assert!(d >= v.min(m) - tol, "{d} below [{v}, {m}]");
                    prop_assert!(d <= v.max(m) + tol, "{d} above [{v}, {m}]");
                }
            }
        }
    }
}
