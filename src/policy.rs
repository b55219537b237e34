use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::observation::Observation;
use crate::q_table::QTable;
use crate::world::Movement;

pub trait ExplorationStrategy {
    fn next_action(&mut self, state: Observation, table: &QTable) -> Movement;

    /// Called by the learning loop once every episode has finished.
    fn end_episode(&mut self) {}

    /// Current probability of a random action.
    fn epsilon(&self) -> f32;
}

pub struct EpsilonGreedy {
    epsilon: f32,
    decay: f32,
    min_epsilon: f32,
    rng: ChaCha8Rng,
}

impl EpsilonGreedy {
    pub fn new(epsilon: f32, decay: f32, min_epsilon: f32, seed: u64) -> Self {
        EpsilonGreedy {
            epsilon,
            decay,
            min_epsilon,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl ExplorationStrategy for EpsilonGreedy {
    fn next_action(&mut self, state: Observation, table: &QTable) -> Movement {
        if self.rng.gen::<f32>() < self.epsilon {
            return self.rng.gen::<Movement>();
        }
        table.best_action(state)
    }

    fn end_episode(&mut self) {
        self.epsilon = (self.epsilon * self.decay).max(self.min_epsilon);
    }

    fn epsilon(&self) -> f32 {
        self.epsilon
    }
}

/// Pure exploitation, used for evaluation runs.
pub struct Greedy;

impl ExplorationStrategy for Greedy {
    fn next_action(&mut self, state: Observation, table: &QTable) -> Movement {
        table.best_action(state)
    }

    fn epsilon(&self) -> f32 {
        0.0
    }
}

pub struct UniformRandom {
    rng: ChaCha8Rng,
}

impl UniformRandom {
    pub fn new(seed: u64) -> Self {
        UniformRandom {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl ExplorationStrategy for UniformRandom {
    fn next_action(&mut self, _state: Observation, _table: &QTable) -> Movement {
        self.rng.gen()
    }

    fn epsilon(&self) -> f32 {
        1.0
    }
}
