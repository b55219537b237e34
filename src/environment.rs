use crate::error::Result;
use crate::observation::{Observation, ObservationEncoding};
use crate::reward::RewardProfile;
use crate::world::{Event, Layout, Movement, World};

/// Result of a single environment step.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Step {
    pub observation: Observation,
    pub event: Event,
    pub reward: f32,
    /// The event ended the episode.
    pub terminated: bool,
    /// The step limit ended the episode.
    pub truncated: bool,
}

impl Step {
    pub fn done(&self) -> bool {
        self.terminated || self.truncated
    }
}

/// Episode wrapper around a [`World`]: observations, rewards and the step limit.
pub struct SurvivorEnv {
    world: World,
    encoding: ObservationEncoding,
    profile: RewardProfile,
    max_steps: usize,
    steps: usize,
    done: bool,
}

impl SurvivorEnv {
    pub fn new(
        layout: Layout,
        encoding: ObservationEncoding,
        profile: RewardProfile,
        max_steps: usize,
    ) -> Result<Self> {
        Ok(Self {
            world: World::new(layout)?,
            encoding,
            profile,
            max_steps,
            steps: 0,
            done: false,
        })
    }

    pub fn observation_count(&self) -> usize {
        self.encoding.size(self.world.layout())
    }

    pub fn action_count(&self) -> usize {
        Movement::ALL.len()
    }

    /// Shape a value table needs to be indexed by this environment.
    pub fn table_shape(&self) -> (usize, usize) {
        (self.observation_count(), self.action_count())
    }

    pub fn reset(&mut self, seed: Option<u64>) -> Observation {
        self.world.reset(seed);
        self.steps = 0;
        self.done = false;
        self.observe()
    }

    pub fn step(&mut self, movement: Movement) -> Step {
        debug_assert!(!self.done, "step after the episode ended");
        let event = self.world.step(movement);
        self.steps += 1;

        let reward = self.profile.reward(
            event,
            self.world.pickups_collected(),
            self.world.total_pickups(),
        );
        let terminated = self.profile.is_terminal(event);
        let truncated = !terminated && self.steps >= self.max_steps;
        self.done = terminated || truncated;
        Step {
            observation: self.observe(),
            event,
            reward,
            terminated,
            truncated,
        }
    }

    pub fn observe(&self) -> Observation {
        self.encoding.encode(&self.world)
    }

    pub fn world(&self) -> &World { &self.world }

    pub fn steps(&self) -> usize { self.steps }

    /// The last step ended the episode; `reset` before stepping again.
    pub fn is_done(&self) -> bool { self.done }

    pub fn max_steps(&self) -> usize { self.max_steps }

    pub fn profile(&self) -> &RewardProfile { &self.profile }

    pub fn encoding(&self) -> ObservationEncoding { self.encoding }
}
