//! Execution context passed to stages.

use slime_core::SimConfig;

use crate::dispatch::Dispatch;

/// Read-only inputs a stage needs besides the simulation state.
///
/// Built by the scheduler once per frame. `dt` is the frame's delta time;
/// agent stages apply it once per sub-step, field stages once per frame.
#[derive(Clone, Copy, Debug)]
pub struct StageContext<'a> {
    config: &'a SimConfig,
    dispatch: Dispatch,
    dt: f32,
}

impl<'a> StageContext<'a> {
    /// Construct a context whose dispatcher follows `config.execution`
    /// and `config.batch`.
    pub fn new(config: &'a SimConfig, dt: f32) -> Self {
        Self {
            config,
            dispatch: Dispatch::new(config.execution, config.batch),
            dt,
        }
    }

    /// Construct a context with an explicit dispatcher.
    pub fn with_dispatch(config: &'a SimConfig, dispatch: Dispatch, dt: f32) -> Self {
        Self {
            config,
            dispatch,
            dt,
        }
    }

    /// Simulation parameters.
    pub fn config(&self) -> &'a SimConfig {
        self.config
    }

    /// Batch dispatcher.
    pub fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }

    /// Frame delta time.
    pub fn dt(&self) -> f32 {
        self.dt
    }
}
