//! Reusable stage fixtures.
//!
//! [`RecordingStage`] appends its [`StageKind`] to a shared [`StageLog`]
//! each time it runs and optionally calls a hook, which lets scheduler
//! tests observe stage order and trip cancellation mid-frame.

use std::sync::{Arc, Mutex};

use slime_core::StageKind;
use slime_field::SimulationState;
use slime_stage::{Stage, StageContext, StageReport};

/// Shared, ordered record of stage invocations.
#[derive(Clone, Debug, Default)]
pub struct StageLog(Arc<Mutex<Vec<StageKind>>>);

impl StageLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, kind: StageKind) {
        self.0.lock().expect("stage log poisoned").push(kind);
    }

    /// Snapshot of everything recorded so far.
    pub fn entries(&self) -> Vec<StageKind> {
        self.0.lock().expect("stage log poisoned").clone()
    }

    pub fn clear(&self) {
        self.0.lock().expect("stage log poisoned").clear();
    }
}

type Hook = Box<dyn Fn() + Send + Sync>;

/// Records its kind into a [`StageLog`] and leaves the state untouched.
pub struct RecordingStage {
    kind: StageKind,
    log: StageLog,
    hook: Option<Hook>,
}

impl RecordingStage {
    pub fn new(kind: StageKind, log: StageLog) -> Self {
        Self {
            kind,
            log,
            hook: None,
        }
    }

    /// Call `hook` after recording, on every run.
    pub fn with_hook(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.hook = Some(Box::new(hook));
        self
    }
}

impl Stage for RecordingStage {
    fn kind(&self) -> StageKind {
        self.kind
    }

    fn run(&self, state: &mut SimulationState, _ctx: &StageContext<'_>) -> StageReport {
        self.log.push(self.kind);
        if let Some(hook) = &self.hook {
            hook();
        }
        let units = if self.kind.is_agent_stage() {
            state.agents.len()
        } else {
            state.field.cell_count()
        };
        StageReport::new(self.kind, units, 1)
    }
}
