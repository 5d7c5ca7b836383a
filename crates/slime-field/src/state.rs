//! The owned simulation state handed to every stage.

use rand::Rng;
use slime_core::{ConfigError, SimConfig};

use crate::agents::AgentStore;
use crate::trail::TrailField;

/// Everything that persists across frames: the trail field and the agents.
///
/// Stages receive `&mut SimulationState` and borrow the two halves
/// separately, so a stage can mutate agents while reading the field (or
/// the reverse) without any runtime locking.
#[derive(Debug)]
pub struct SimulationState {
    /// The raw/diffused trail buffers.
    pub field: TrailField,
    /// The agent population.
    pub agents: AgentStore,
}

impl SimulationState {
    /// Allocate a field and scatter a population for `config`.
    ///
    /// Assumes `config` has already been validated; still returns
    /// allocation failures.
    pub fn from_config<R: Rng>(config: &SimConfig, rng: &mut R) -> Result<Self, ConfigError> {
        let field = TrailField::new(config.width, config.height)?;
        let agents = AgentStore::scatter(config.agent_count, config.width, config.height, rng)?;
        Ok(Self { field, agents })
    }

    /// Pair an existing field and population.
    pub fn new(field: TrailField, agents: AgentStore) -> Self {
        Self { field, agents }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn from_config_sizes_everything() {
        let cfg = SimConfig::sized(12, 8, 30);
        let state = SimulationState::from_config(&cfg, &mut ChaCha8Rng::seed_from_u64(1)).unwrap();
        assert_eq!(state.field.cell_count(), 96);
        assert_eq!(state.agents.len(), 30);
        assert!(state.agents.all_within(12, 8));
    }
}
