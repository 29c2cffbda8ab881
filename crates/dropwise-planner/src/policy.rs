use dropwise_engine::{Action, Observation};
use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;

use crate::planner::Planner;

/// Chooses actions from observations.
pub trait Policy {
    /// Returns the actions to play next, in order. Never empty.
    fn plan(&mut self, observation: &Observation) -> Vec<Action>;
}

/// Plays the placement chosen by a [`Planner`].
#[derive(Debug)]
pub struct HeuristicPolicy {
    planner: Planner,
}

impl HeuristicPolicy {
    #[must_use]
    pub fn new(planner: Planner) -> Self {
        Self { planner }
    }
}

impl Policy for HeuristicPolicy {
    fn plan(&mut self, observation: &Observation) -> Vec<Action> {
        self.planner.plan(observation).actions
    }
}

/// Baseline policy: one uniformly random action per call.
#[derive(Debug, Clone)]
pub struct RandomPolicy {
    rng: Pcg32,
}

impl RandomPolicy {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }
}

impl Policy for RandomPolicy {
    fn plan(&mut self, _observation: &Observation) -> Vec<Action> {
        vec![self.rng.random()]
    }
}
