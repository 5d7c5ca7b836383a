//! Simulation configuration and validation.
//!
//! [`SimConfig`] is the full parameter set supplied by the host. It is
//! validated once when a simulation is built or reconfigured; the stages
//! read it through a shared reference and never mutate it.

use std::f32::consts::FRAC_PI_4;
use std::fmt;

use crate::boundary::BoundaryPolicy;
use crate::error::ConfigError;

// ── StageKind ──────────────────────────────────────────────────────

/// The five per-frame stages, used for batch sizing and reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StageKind {
    /// Agent advance and deposit.
    Movement,
    /// Three-probe steering.
    Sensing,
    /// Per-cell decay.
    Evaporation,
    /// Raw → diffused blur.
    Diffusion,
    /// Diffused → raw copy.
    Feedback,
}

impl StageKind {
    /// Stable lowercase name used in logs and metrics.
    pub fn name(self) -> &'static str {
        match self {
            Self::Movement => "movement",
            Self::Sensing => "sensing",
            Self::Evaporation => "evaporation",
            Self::Diffusion => "diffusion",
            Self::Feedback => "feedback",
        }
    }

    /// Whether the stage is dispatched over agents (as opposed to cells).
    pub fn is_agent_stage(self) -> bool {
        matches!(self, Self::Movement | Self::Sensing)
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ── ExecutionMode ──────────────────────────────────────────────────

/// How a stage batch is executed.
///
/// Both modes produce bit-identical results; `Serial` exists for
/// single-threaded hosts and for isolating scheduling effects in tests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExecutionMode {
    /// Run each batch on the calling thread, group by group.
    Serial,
    /// Run groups of a batch on the rayon thread pool.
    #[default]
    Parallel,
}

// ── BatchProfile ───────────────────────────────────────────────────

/// Preferred batch widths reported by the compute device.
///
/// A stage over `n` units is dispatched as `ceil(n / width)` groups.
/// Movement and sensing may prefer different widths, and so dispatch a
/// different number of groups over the same population.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BatchProfile {
    /// Agents per group for the movement stage. Default: 64.
    pub movement: usize,
    /// Agents per group for the sensing stage. Default: 32.
    pub sensing: usize,
    /// Cells per group for evaporation, diffusion and feedback. Default: 4096.
    pub cells: usize,
}

impl Default for BatchProfile {
    fn default() -> Self {
        Self {
            movement: 64,
            sensing: 32,
            cells: 4096,
        }
    }
}

impl BatchProfile {
    /// The same width for every stage.
    pub fn uniform(width: usize) -> Self {
        Self {
            movement: width,
            sensing: width,
            cells: width,
        }
    }

    /// Preferred width for `stage`.
    pub fn width_for(&self, stage: StageKind) -> usize {
        match stage {
            StageKind::Movement => self.movement,
            StageKind::Sensing => self.sensing,
            StageKind::Evaporation | StageKind::Diffusion | StageKind::Feedback => self.cells,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for stage in [StageKind::Movement, StageKind::Sensing, StageKind::Diffusion] {
            if self.width_for(stage) == 0 {
                return Err(ConfigError::ZeroBatchWidth { stage });
            }
        }
        Ok(())
    }
}

// ── SimConfig ──────────────────────────────────────────────────────

/// Complete parameter set for a simulation.
///
/// Changing `width`/`height` recreates the trail field; changing
/// `agent_count` re-scatters the population. Every other field takes
/// effect on the next frame without touching state.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Field width in cells. Default: 256.
    pub width: usize,
    /// Field height in cells. Default: 256.
    pub height: usize,
    /// Number of agents. Default: 25.
    pub agent_count: usize,
    /// Distance travelled per unit of `delta_time`. Default: 20.
    pub speed: f32,
    /// Movement/sensing sub-steps per frame. Default: 1.
    pub steps_per_frame: u32,
    /// Trail lost per unit of `delta_time`. Default: 0.25.
    pub evaporation_speed: f32,
    /// Blend factor towards the 3×3 local mean, in `[0, 1]`. Default: 0.5.
    pub diffuse_speed: f32,
    /// Angle between the forward probe and each side probe. Default: π/4.
    pub sensor_angle_rad: f32,
    /// Sample aperture radius in cells; 0 samples a single cell. At most
    /// `max(width, height)`. Default: 1.
    pub sensor_width: usize,
    /// Distance from the agent to each probe centre. Default: 9.
    pub sensor_offset_distance: f32,
    /// Trail deposited per agent per sub-step. Default: 1.
    pub trail_rate: f32,
    /// Whether agents steer. When off they travel in straight lines.
    /// Default: true.
    pub sensing_enabled: bool,
    /// Seed for agent placement. Default: 0.
    pub seed: u64,
    /// Out-of-bounds policy. Default: [`BoundaryPolicy::Clamp`].
    pub boundary: BoundaryPolicy,
    /// Serial or rayon-parallel batches. Default: parallel.
    pub execution: ExecutionMode,
    /// Preferred batch widths per stage.
    pub batch: BatchProfile,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            width: 256,
            height: 256,
            agent_count: 25,
            speed: 20.0,
            steps_per_frame: 1,
            evaporation_speed: 0.25,
            diffuse_speed: 0.5,
            sensor_angle_rad: FRAC_PI_4,
            sensor_width: 1,
            sensor_offset_distance: 9.0,
            trail_rate: 1.0,
            sensing_enabled: true,
            seed: 0,
            boundary: BoundaryPolicy::Clamp,
            execution: ExecutionMode::Parallel,
            batch: BatchProfile::default(),
        }
    }
}

impl SimConfig {
    /// Default parameters on a `width × height` field with `agent_count`
    /// agents.
    pub fn sized(width: usize, height: usize, agent_count: usize) -> Self {
        Self {
            width,
            height,
            agent_count,
            ..Self::default()
        }
    }

    /// Number of cells in the field. Only meaningful after
    /// [`validate`](Self::validate) has succeeded.
    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }

    /// Whether moving from `self` to `next` requires a new trail field.
    pub fn resolution_changed(&self, next: &SimConfig) -> bool {
        self.width != next.width || self.height != next.height
    }

    /// Whether moving from `self` to `next` requires a new agent store.
    pub fn population_changed(&self, next: &SimConfig) -> bool {
        self.agent_count != next.agent_count
    }

    /// Check every structural and numeric invariant.
    ///
    /// Fails fast on the first violation; nothing is clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // 1. Field must be non-empty and addressable.
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::EmptyField {
                width: self.width,
                height: self.height,
            });
        }
        match self.width.checked_mul(self.height) {
            Some(n) if u32::try_from(n).is_ok() => {}
            _ => {
                return Err(ConfigError::CellCountOverflow {
                    width: self.width,
                    height: self.height,
                })
            }
        }

        // 2. Population must be non-empty and fit the per-cell deposit counter.
        if self.agent_count == 0 {
            return Err(ConfigError::NoAgents);
        }
        if u32::try_from(self.agent_count).is_err() {
            return Err(ConfigError::InvalidParameter {
                name: "agent_count",
                value: self.agent_count as f64,
                expected: "at most u32::MAX",
            });
        }

        if self.steps_per_frame == 0 {
            return Err(ConfigError::ZeroStepsPerFrame);
        }

        // 3. Scalar parameters.
        non_negative("speed", self.speed)?;
        non_negative("evaporation_speed", self.evaporation_speed)?;
        non_negative("sensor_offset_distance", self.sensor_offset_distance)?;
        non_negative("trail_rate", self.trail_rate)?;
        if !self.sensor_angle_rad.is_finite() {
            return Err(ConfigError::InvalidParameter {
                name: "sensor_angle_rad",
                value: self.sensor_angle_rad as f64,
                expected: "finite",
            });
        }
        if self.sensor_width > self.width.max(self.height) {
            return Err(ConfigError::InvalidParameter {
                name: "sensor_width",
                value: self.sensor_width as f64,
                expected: "at most max(width, height)",
            });
        }
        if !(0.0..=1.0).contains(&self.diffuse_speed) {
            return Err(ConfigError::InvalidParameter {
                name: "diffuse_speed",
                value: self.diffuse_speed as f64,
                expected: "in [0, 1]",
            });
        }

        // 4. Dispatch widths.
        self.batch.validate()
    }
}

fn non_negative(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidParameter {
            name,
            value: value as f64,
            expected: "finite and >= 0",
        })
    }
}
