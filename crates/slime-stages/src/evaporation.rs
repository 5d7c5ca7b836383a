//! Trail evaporation.

use slime_core::StageKind;
use slime_field::SimulationState;
use slime_stage::{Stage, StageContext, StageReport};

/// Decays raw in place: `raw = max(0, raw - evaporation_speed * dt)`.
///
/// Runs once per frame, after every sub-step. Each cell is updated from its
/// own value only, so the in-place pass has no cross-cell hazard.
#[derive(Clone, Copy, Debug, Default)]
pub struct EvaporationStage;

impl Stage for EvaporationStage {
    fn kind(&self) -> StageKind {
        StageKind::Evaporation
    }

    fn run(&self, state: &mut SimulationState, ctx: &StageContext<'_>) -> StageReport {
        let decay = ctx.config().evaporation_speed * ctx.dt();
        let dispatch = ctx.dispatch();
        let raw = state.field.raw_mut();
        let units = raw.len();

        let width = dispatch.width(StageKind::Evaporation);
        let groups = dispatch.for_each_mut(width, raw, |_, cells| {
            for v in cells {
                *v = (*v - decay).max(0.0);
            }
        });

        StageReport::new(StageKind::Evaporation, units, groups)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use slime_core::SimConfig;
    use slime_test_utils::{field_from_raw, field_with, scenario_config, state_with};

    fn run(state: &mut SimulationState, cfg: &SimConfig, dt: f32) -> StageReport {
        EvaporationStage.run(state, &StageContext::new(cfg, dt))
    }

    #[test]
    fn decays_by_rate_times_dt() {
        let cfg = scenario_config();
        let mut state = state_with(4, 4, vec![]);
        state.field = field_with(4, 4, &[((3, 2), 1.0)]);
        let report = run(&mut state, &cfg, 1.0);
        assert_eq!(state.field.get(3, 2), 0.5);
        assert_eq!(state.field.total_raw(), 0.5);
        assert_eq!(report.units, 16);
        assert_eq!(report.groups, 1);
    }

    #[test]
    fn floors_at_zero() {
        let cfg = scenario_config();
        let mut state = state_with(4, 4, vec![]);
        state.field = field_with(4, 4, &[((0, 0), 0.2), ((1, 0), 3.0)]);
        run(&mut state, &cfg, 1.0);
        assert_eq!(state.field.get(0, 0), 0.0);
        assert_eq!(state.field.get(1, 0), 2.5);
    }

    #[test]
    fn zero_dt_is_identity() {
        let cfg = scenario_config();
        let mut state = state_with(4, 4, vec![]);
        state.field = field_with(4, 4, &[((2, 2), 0.7)]);
        run(&mut state, &cfg, 0.0);
        assert_eq!(state.field.get(2, 2), 0.7);
    }

    proptest! {
        #[test]
        fn never_increases_and_never_negative(
            values in prop::collection::vec(0.0f32..100.0, 36),
            rate in 0.0f32..10.0,
            dt in 0.0f32..2.0,
        ) {
            let cfg = SimConfig { evaporation_speed: rate, ..scenario_config() };
            let mut state = state_with(6, 6, vec![]);
            state.field = field_from_raw(6, 6, &values);
            run(&mut state, &cfg, dt);
            for (before, after) in values.iter().zip(state.field.raw()) {
                prop_assert!(*after <= *before);
                prop_assert!(*after >= 0.0);
            }
        }
    }
}
