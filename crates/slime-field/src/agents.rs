//! The fixed-length agent population.

use rand::Rng;
use slime_core::agent::heading_towards;
use slime_core::{Agent, ConfigError};

use crate::alloc::try_alloc_with;

/// An ordered, fixed-length sequence of [`Agent`]s.
///
/// The length never changes after construction. A population-size change
/// is handled by building a new store, never by pushing or removing.
#[derive(Clone, Debug, PartialEq)]
pub struct AgentStore {
    agents: Vec<Agent>,
}

impl AgentStore {
    /// Scatter `count` agents uniformly over `[0,width) × [0,height)`.
    ///
    /// Each agent starts facing the field centre, so the population first
    /// converges and then disperses instead of piling up at the edges.
    /// `rng` is the only source of randomness; the same generator state
    /// yields the same store.
    pub fn scatter<R: Rng>(
        count: usize,
        width: usize,
        height: usize,
        rng: &mut R,
    ) -> Result<Self, ConfigError> {
        if count == 0 {
            return Err(ConfigError::NoAgents);
        }
        if width == 0 || height == 0 {
            return Err(ConfigError::EmptyField { width, height });
        }

        let (w, h) = (width as f32, height as f32);
        let (cx, cy) = (w / 2.0, h / 2.0);
        let agents = try_alloc_with(count, "agent store", || {
            let x = rng.random_range(0.0..w);
            let y = rng.random_range(0.0..h);
            Agent::new(x, y, heading_towards(x, y, cx, cy))
        })?;

        tracing::debug!(count, width, height, "scattered agents");
        Ok(Self { agents })
    }

    /// Wrap an explicit population, e.g. a hand-placed test fixture.
    pub fn from_agents(agents: Vec<Agent>) -> Self {
        Self { agents }
    }

    /// Number of agents.
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    /// Whether the store is empty. Stores built by
    /// [`scatter`](Self::scatter) never are.
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// The agents in order.
    pub fn as_slice(&self) -> &[Agent] {
        &self.agents
    }

    /// Mutable agents, for the stages that update them in place.
    pub fn as_mut_slice(&mut self) -> &mut [Agent] {
        &mut self.agents
    }

    /// Agent at index `i`.
    pub fn get(&self, i: usize) -> Option<&Agent> {
        self.agents.get(i)
    }

    /// Iterate agents in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Agent> {
        self.agents.iter()
    }

    /// Whether every agent lies inside `[0,width) × [0,height)`.
    pub fn all_within(&self, width: usize, height: usize) -> bool {
        let (w, h) = (width as f32, height as f32);
        self.agents.iter().all(|a| {
            let (x, y) = a.position;
            (0.0..w).contains(&x) && (0.0..h).contains(&y)
        })
    }
}

impl<'a> IntoIterator for &'a AgentStore {
    type Item = &'a Agent;
    type IntoIter = std::slice::Iter<'a, Agent>;

    fn into_iter(self) -> Self::IntoIter {
        self.agents.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn scatter_has_requested_length_and_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let store = AgentStore::scatter(500, 40, 30, &mut rng).unwrap();
        assert_eq!(store.len(), 500);
        assert!(!store.is_empty());
        assert!(store.all_within(40, 30));
    }

    #[test]
    fn scatter_faces_the_centre() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let store = AgentStore::scatter(200, 64, 64, &mut rng).unwrap();
        for a in &store {
            let (dx, dy) = a.direction();
            let (tx, ty) = (32.0 - a.position.0, 32.0 - a.position.1);
            let len = (tx * tx + ty * ty).sqrt();
            if len > 1e-3 {
                let cos = (dx * tx + dy * ty) / len;
                assert!(cos > 0.999, "agent {a:?} not facing centre (cos={cos})");
            }
        }
    }

    #[test]
    fn same_seed_same_store() {
        let a = AgentStore::scatter(50, 16, 16, &mut ChaCha8Rng::seed_from_u64(3)).unwrap();
        let b = AgentStore::scatter(50, 16, 16, &mut ChaCha8Rng::seed_from_u64(3)).unwrap();
        let c = AgentStore::scatter(50, 16, 16, &mut ChaCha8Rng::seed_from_u64(4)).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn scatter_rejects_empty_inputs() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert_eq!(
            AgentStore::scatter(0, 4, 4, &mut rng).unwrap_err(),
            ConfigError::NoAgents
        );
        assert!(matches!(
            AgentStore::scatter(3, 0, 4, &mut rng),
            Err(ConfigError::EmptyField { .. })
        ));
    }

    #[test]
    fn from_agents_preserves_order() {
        let store = AgentStore::from_agents(vec![
            Agent::new(1.0, 1.0, 0.0),
            Agent::new(2.0, 2.0, 1.0),
        ]);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(1).unwrap().heading, 1.0);
        assert!(store.get(2).is_none());
        assert!(!store.all_within(2, 2));
        assert!(store.all_within(3, 3));
    }
}
