//! Core types for the slime trail simulation.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! value types shared by every layer of the workspace: the [`Agent`]
//! record, the [`SimConfig`] parameter set, boundary handling, frame IDs,
//! and the error enums.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod agent;
pub mod boundary;
pub mod config;
pub mod error;
pub mod id;

pub use agent::Agent;
pub use boundary::{quantize, resolve_axis, resolve_position, BoundaryPolicy};
pub use config::{BatchProfile, ExecutionMode, SimConfig, StageKind};
pub use error::{ConfigError, TickError};
pub use id::FrameId;
