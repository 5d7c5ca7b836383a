//! The [`Stage`] trait and [`StageReport`].
//!
//! Stages are stateless operators run by the scheduler in a fixed order.
//! All persistent state lives in [`SimulationState`]; parameters arrive
//! through the [`StageContext`].

use slime_core::StageKind;
use slime_field::SimulationState;

use crate::context::StageContext;

/// What one stage invocation did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StageReport {
    /// Which stage ran.
    pub kind: StageKind,
    /// Agents or cells processed.
    pub units: usize,
    /// Dispatch groups used (`ceil(units / width)`).
    pub groups: usize,
    /// Deposits that fell outside the field and were dropped.
    pub discarded: usize,
}

impl StageReport {
    /// A report with no discarded deposits.
    pub fn new(kind: StageKind, units: usize, groups: usize) -> Self {
        Self {
            kind,
            units,
            groups,
            discarded: 0,
        }
    }
}

/// A stateless per-frame operator.
///
/// # Contract
///
/// - `run()` is total on validated state: it never fails and never panics
///   for in-range inputs.
/// - `run()` returns only after the whole batch has finished. The caller
///   treats the return as a barrier.
/// - `run()` is deterministic: identical state, config, and `dt` give
///   bit-identical results regardless of execution mode.
///
/// # Examples
///
/// ```
/// use slime_core::{SimConfig, StageKind};
/// use slime_field::{AgentStore, SimulationState, TrailField};
/// use slime_stage::{Stage, StageContext, StageReport};
///
/// struct Zero;
///
/// impl Stage for Zero {
///     fn kind(&self) -> StageKind { StageKind::Evaporation }
///
///     fn run(&self, state: &mut SimulationState, _ctx: &StageContext<'_>) -> StageReport {
///         state.field.raw_mut().fill(0.0);
///         StageReport::new(self.kind(), state.field.cell_count(), 1)
///     }
/// }
///
/// let cfg = SimConfig::sized(4, 4, 1);
/// let mut state = SimulationState::new(
///     TrailField::new(4, 4).unwrap(),
///     AgentStore::from_agents(vec![]),
/// );
/// let report = Zero.run(&mut state, &StageContext::new(&cfg, 1.0));
/// assert_eq!(report.units, 16);
/// ```
pub trait Stage: Send + Sync {
    /// Which of the five stages this is.
    fn kind(&self) -> StageKind;

    /// Name for logs and metrics.
    fn name(&self) -> &'static str {
        self.kind().name()
    }

    /// Execute the stage over the whole population or field.
    fn run(&self, state: &mut SimulationState, ctx: &StageContext<'_>) -> StageReport;
}
