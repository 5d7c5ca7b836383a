//! The owned simulation.
//!
//! [`Simulation`] is the user-facing API. It owns the configuration, the
//! trail field, the agent store, the scheduler and the random source.
//!
//! # Ownership model
//!
//! All mutating methods take `&mut self`, and [`view()`](Simulation::view)
//! returns a [`FieldView`] that borrows from `self`. A renderer therefore
//! cannot hold a view across a `tick()` or a `reconfigure()`, and the
//! borrow checker rules out reading a buffer while a stage writes it.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use slime_core::{ConfigError, FrameId, SimConfig, TickError};
use slime_field::{AgentStore, FieldView, RenderSource, SimulationState, TrailField};
use slime_stage::StageContext;

use crate::cancel::CancelToken;
use crate::hash::{agents_hash, field_hash};
use crate::metrics::{FrameMetrics, FrameReport};
use crate::scheduler::{SchedulerPhase, StepScheduler};

// Compile-time assertion: Simulation can be moved to a worker thread.
const _: () = {
    #[allow(dead_code)]
    fn assert_send<T: Send>() {}
    #[allow(dead_code)]
    fn check() {
        assert_send::<Simulation>();
    }
};

// ── Reconfigured ────────────────────────────────────────────────

/// What a successful [`Simulation::reconfigure()`] rebuilt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reconfigured {
    /// Only scalar parameters changed; field and agents were kept.
    Parameters,
    /// The agent count changed; agents were re-scattered, the field kept.
    Repopulated,
    /// The resolution changed; a zeroed field was allocated and the agents
    /// re-scattered over it.
    Resized,
}

// ── Simulation ──────────────────────────────────────────────────

/// A running trail simulation.
///
/// # Example
///
/// ```
/// use slime_core::SimConfig;
/// use slime_engine::Simulation;
/// use slime_field::RenderSource;
///
/// let mut sim = Simulation::new(SimConfig::sized(64, 64, 100)).unwrap();
/// for i in 0..10 {
///     sim.tick(1.0 / 60.0, i as f64 / 60.0).unwrap();
/// }
/// let view = sim.view(RenderSource::Diffused);
/// assert_eq!(view.as_slice().len(), 64 * 64);
/// assert_eq!(sim.frame_id().0, 10);
/// ```
pub struct Simulation {
    config: SimConfig,
    state: SimulationState,
    scheduler: StepScheduler,
    rng: ChaCha8Rng,
    frame: FrameId,
    last_wall_time: Option<f64>,
    last_metrics: FrameMetrics,
    cancel: CancelToken,
}

impl Simulation {
    /// Validate `config`, allocate the field, and scatter the agents with a
    /// generator seeded from `config.seed`.
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Self::with_rng(config, rng)
    }

    /// Like [`new()`](Self::new), with an explicit random source.
    ///
    /// The generator is consumed only when agents are (re-)scattered.
    pub fn with_rng(config: SimConfig, mut rng: ChaCha8Rng) -> Result<Self, ConfigError> {
        config.validate()?;
        let state = SimulationState::from_config(&config, &mut rng)?;
        tracing::debug!(
            width = config.width,
            height = config.height,
            agents = config.agent_count,
            seed = config.seed,
            "simulation created"
        );
        Ok(Self::assemble(config, state, rng))
    }

    /// Adopt an existing state, e.g. a hand-placed fixture.
    ///
    /// `config.width`, `config.height` and `config.agent_count` are taken
    /// from `state` before validation.
    pub fn from_state(mut config: SimConfig, state: SimulationState) -> Result<Self, ConfigError> {
        config.width = state.field.width();
        config.height = state.field.height();
        config.agent_count = state.agents.len();
        config.validate()?;
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        tracing::debug!(
            width = config.width,
            height = config.height,
            agents = config.agent_count,
            "simulation adopted state"
        );
        Ok(Self::assemble(config, state, rng))
    }

    /// Replace the stage pipeline. Used by tests and benches to insert
    /// instrumented stages.
    pub fn with_scheduler(mut self, scheduler: StepScheduler) -> Self {
        self.scheduler = scheduler;
        self
    }

    fn assemble(config: SimConfig, state: SimulationState, rng: ChaCha8Rng) -> Self {
        Self {
            config,
            state,
            scheduler: StepScheduler::new(),
            rng,
            frame: FrameId::default(),
            last_wall_time: None,
            last_metrics: FrameMetrics::default(),
            cancel: CancelToken::new(),
        }
    }

    /// Advance one frame.
    ///
    /// Runs `steps_per_frame` sub-steps of movement (and sensing, if
    /// enabled), each applying `delta_time` in full, then evaporation,
    /// diffusion and feedback once.
    ///
    /// # Errors
    ///
    /// - [`TickError::InvalidDeltaTime`] if `delta_time` is negative or not
    ///   finite.
    /// - [`TickError::WallTimeRegressed`] if `wall_time` is lower than the
    ///   previous accepted tick's, or NaN.
    /// - [`TickError::Cancelled`] if the [`CancelToken`] was set. The state
    ///   is whatever the last completed stage left; the frame counter does
    ///   not advance.
    ///
    /// The first two reject the call without touching any state.
    ///
    /// The token is cleared whenever a frame ends, completed or cancelled.
    /// A request made after the last stage barrier of a frame is therefore
    /// dropped rather than carried into the next frame; a request made
    /// between ticks cancels the next frame before its first stage.
    pub fn tick(&mut self, delta_time: f32, wall_time: f64) -> Result<FrameReport, TickError> {
        if !delta_time.is_finite() || delta_time < 0.0 {
            tracing::warn!(delta_time, "tick rejected: invalid delta time");
            return Err(TickError::InvalidDeltaTime { value: delta_time });
        }
        let previous = self.last_wall_time.unwrap_or(f64::NEG_INFINITY);
        if wall_time.is_nan() || wall_time < previous {
            tracing::warn!(previous, wall_time, "tick rejected: wall time regressed");
            return Err(TickError::WallTimeRegressed {
                previous,
                current: wall_time,
            });
        }
        self.last_wall_time = Some(wall_time);

        let ctx = StageContext::new(&self.config, delta_time);
        let outcome = self.scheduler.run_frame(&mut self.state, &ctx, &self.cancel);
        self.cancel.reset();
        match outcome {
            Ok(metrics) => {
                self.frame = self.frame.next();
                tracing::trace!(
                    frame = self.frame.0,
                    total_us = metrics.total_us,
                    substeps = metrics.substeps,
                    discarded = metrics.discarded_deposits,
                    "frame complete"
                );
                self.last_metrics = metrics.clone();
                Ok(FrameReport {
                    frame: self.frame,
                    wall_time,
                    metrics,
                })
            }
            Err(err) => {
                tracing::warn!(frame = self.frame.0, %err, "frame cancelled");
                Err(err)
            }
        }
    }

    /// Apply a new configuration between frames.
    ///
    /// Validates `config` first; on error nothing changes. A resolution
    /// change allocates a zeroed field and re-scatters the agents over it;
    /// an agent-count change re-scatters the agents and keeps the field.
    /// A seed change reseeds the generator before any scatter. New buffers
    /// are built before the old ones are replaced, so an allocation failure
    /// also leaves the simulation untouched.
    pub fn reconfigure(&mut self, config: SimConfig) -> Result<Reconfigured, ConfigError> {
        config.validate()?;

        let resized = self.config.resolution_changed(&config);
        let repopulated = resized || self.config.population_changed(&config);

        let mut rng = if config.seed != self.config.seed {
            ChaCha8Rng::seed_from_u64(config.seed)
        } else {
            self.rng.clone()
        };
        let field = if resized {
            Some(TrailField::new(config.width, config.height)?)
        } else {
            None
        };
        let agents = if repopulated {
            Some(AgentStore::scatter(
                config.agent_count,
                config.width,
                config.height,
                &mut rng,
            )?)
        } else {
            None
        };

        if let Some(field) = field {
            self.state.field = field;
        }
        if let Some(agents) = agents {
            self.state.agents = agents;
        }
        self.rng = rng;
        self.config = config;

        let outcome = if resized {
            Reconfigured::Resized
        } else if repopulated {
            Reconfigured::Repopulated
        } else {
            Reconfigured::Parameters
        };
        tracing::debug!(
            width = self.config.width,
            height = self.config.height,
            agents = self.config.agent_count,
            seed = self.config.seed,
            ?outcome,
            "simulation reconfigured"
        );
        Ok(outcome)
    }

    /// Read-only view of one field buffer for rendering.
    pub fn view(&self, source: RenderSource) -> FieldView<'_> {
        self.state.field.view(source)
    }

    /// The agents.
    pub fn agents(&self) -> &AgentStore {
        &self.state.agents
    }

    /// The trail field.
    pub fn field(&self) -> &TrailField {
        &self.state.field
    }

    /// Field and agents together.
    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    /// The active configuration.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Last completed frame (0 before the first tick).
    pub fn frame_id(&self) -> FrameId {
        self.frame
    }

    /// Wall time of the last accepted tick.
    pub fn last_wall_time(&self) -> Option<f64> {
        self.last_wall_time
    }

    /// Metrics from the most recent completed frame.
    pub fn last_metrics(&self) -> &FrameMetrics {
        &self.last_metrics
    }

    /// A handle that cancels the in-flight frame when set.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Scheduler phase. Always [`SchedulerPhase::Idle`] when observable
    /// through `&self`.
    pub fn phase(&self) -> SchedulerPhase {
        self.scheduler.phase()
    }

    /// FNV-1a hash of the agent store.
    pub fn agents_hash(&self) -> u64 {
        agents_hash(self.state.agents.as_slice())
    }

    /// FNV-1a hash of the raw field.
    pub fn field_hash(&self) -> u64 {
        field_hash(&self.state.field)
    }
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("frame", &self.frame)
            .field("width", &self.config.width)
            .field("height", &self.config.height)
            .field("agents", &self.state.agents.len())
            .field("seed", &self.config.seed)
            .finish()
    }
}
