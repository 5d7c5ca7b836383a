//! Trail field and agent storage for the slime trail simulation.
//!
//! [`TrailField`] owns the `raw` and `diffused` grids plus the per-cell
//! deposit accumulator. It hands stages disjoint borrows (one read-only
//! source, one writable destination) so no stage can read and write the
//! same buffer in a single pass. [`AgentStore`] owns the fixed-length agent
//! population and its seeded scatter.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod agents;
mod alloc;
pub mod state;
pub mod trail;
pub mod view;

pub use agents::AgentStore;
pub use state::SimulationState;
pub use trail::TrailField;
pub use view::{FieldView, RenderSource};
