//! Error types for the slime trail simulation.
//!
//! Configuration problems are caught once, when a simulation is built or
//! reconfigured. Per-frame stepping on validated state has no failure
//! paths; [`TickError`] only covers contract violations by the frame
//! driver and frame cancellation.

use std::error::Error;
use std::fmt;

use crate::config::StageKind;

/// Errors detected while validating a [`SimConfig`](crate::SimConfig) or
/// allocating simulation state.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// Width or height is zero.
    EmptyField {
        /// Configured width.
        width: usize,
        /// Configured height.
        height: usize,
    },
    /// Agent count is zero.
    NoAgents,
    /// A scalar parameter is NaN, infinite, or outside its valid range.
    InvalidParameter {
        /// Parameter name as it appears on `SimConfig`.
        name: &'static str,
        /// The rejected value.
        value: f64,
        /// The accepted range, e.g. `"finite and >= 0"`.
        expected: &'static str,
    },
    /// `steps_per_frame` is zero.
    ZeroStepsPerFrame,
    /// A stage was given a preferred batch width of zero.
    ZeroBatchWidth {
        /// The stage with the zero width.
        stage: StageKind,
    },
    /// `width * height` does not fit in `usize` or exceeds the deposit
    /// counter range.
    CellCountOverflow {
        /// Configured width.
        width: usize,
        /// Configured height.
        height: usize,
    },
    /// A field or agent buffer could not be allocated.
    AllocationFailed {
        /// Which buffer failed.
        what: &'static str,
        /// Requested size in bytes.
        bytes: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyField { width, height } => {
                write!(f, "field must be non-empty, got {width}x{height}")
            }
            Self::NoAgents => write!(f, "agent_count must be at least 1"),
            Self::InvalidParameter {
                name,
                value,
                expected,
            } => write!(f, "{name} must be {expected}, got {value}"),
            Self::ZeroStepsPerFrame => write!(f, "steps_per_frame must be at least 1"),
            Self::ZeroBatchWidth { stage } => {
                write!(f, "preferred batch width for {stage} must be at least 1")
            }
            Self::CellCountOverflow { width, height } => {
                write!(f, "cell count {width}x{height} overflows")
            }
            Self::AllocationFailed { what, bytes } => {
                write!(f, "failed to allocate {bytes} bytes for {what}")
            }
        }
    }
}

impl Error for ConfigError {}

/// Errors returned by `Simulation::tick()`.
///
/// The first two variants reject the call before any state is touched.
/// [`TickError::Cancelled`] is returned after a partial frame: every stage
/// up to and including `after` has fully committed, nothing later ran.
#[derive(Clone, Debug, PartialEq)]
pub enum TickError {
    /// `delta_time` is negative, NaN, or infinite.
    InvalidDeltaTime {
        /// The rejected value.
        value: f32,
    },
    /// `wall_time` went backwards.
    WallTimeRegressed {
        /// Wall time of the previous accepted tick.
        previous: f64,
        /// The rejected wall time.
        current: f64,
    },
    /// The frame was cancelled at a stage barrier.
    Cancelled {
        /// Name of the last stage that completed, or `None` if cancellation
        /// was observed before the first stage.
        after: Option<&'static str>,
    },
}

impl fmt::Display for TickError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDeltaTime { value } => {
                write!(f, "delta_time must be finite and >= 0, got {value}")
            }
            Self::WallTimeRegressed { previous, current } => {
                write!(f, "wall_time went backwards: {current} < {previous}")
            }
            Self::Cancelled { after: Some(stage) } => {
                write!(f, "frame cancelled after stage '{stage}'")
            }
            Self::Cancelled { after: None } => write!(f, "frame cancelled before any stage ran"),
        }
    }
}

impl Error for TickError {}
