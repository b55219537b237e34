use serde::Serialize;

use crate::environment::{Step, SurvivorEnv};
use crate::world::{Event, Movement};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Goal,
    Hazard,
    Truncated,
}

/// Running totals of one episode.
pub struct Agent {
    pub reward: f32,
    pub steps: usize,
    pub outcome: Option<Outcome>,
}

impl Agent {
    pub fn new() -> Self
    {
        Self {
            reward: 0.0,
            steps: 0,
            outcome: None,
        }
    }

    pub fn r#move(&mut self, env: &mut SurvivorEnv, movement: Movement) -> Step
    {
        let step = env.step(movement);
        self.reward += step.reward;
        self.steps += 1;

        if step.terminated {
            self.outcome = Some(match step.event {
                Event::Goal => Outcome::Goal,
                Event::Hazard => Outcome::Hazard,
                // RewardProfile::is_terminal never ends an episode on these
                Event::Floor | Event::Pickup => {
                    unreachable!("{:?} cannot end an episode", step.event)
                }
            });
        } else if step.truncated {
            self.outcome = Some(Outcome::Truncated);
        }
        step
    }

    pub fn finished(&self) -> bool {
        self.outcome.is_some()
    }
}

impl Default for Agent {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observation::ObservationEncoding;
    use crate::reward::RewardProfile;
    use crate::world::Layout;

    #[test]
    fn accumulates_reward_until_goal() {
        let mut env = SurvivorEnv::new(
            Layout::default(),
            ObservationEncoding::PositionWithPickups,
            RewardProfile::goal_only(),
            100,
        )
        .unwrap();
        env.reset(Some(1));
        let mut agent = Agent::new();
        // the hazard at (0, 1) does not end a goal-only episode
        for movement in [Movement::Right, Movement::Right, Movement::Right] {
            agent.r#move(&mut env, movement);
            assert!(!agent.finished());
        }
        let step = agent.r#move(&mut env, Movement::Right);
        assert_eq!(step.event, Event::Goal);
        assert_eq!(agent.outcome, Some(Outcome::Goal));
        assert_eq!(agent.steps, 4);
        assert_eq!(agent.reward, 1.0);
    }

    #[test]
    fn hazard_ends_a_survivor_episode_as_hazard() {
        let mut env = SurvivorEnv::new(
            Layout::default(),
            ObservationEncoding::PositionWithPickups,
            RewardProfile::survivor(),
            100,
        )
        .unwrap();
        env.reset(Some(1));
        let mut agent = Agent::new();
        let step = agent.r#move(&mut env, Movement::Right);
        assert_eq!(step.event, Event::Hazard);
        assert_eq!(agent.outcome, Some(Outcome::Hazard));
        assert_eq!(agent.reward, -10.0);
    }

    #[test]
    fn pickup_does_not_end_the_episode() {
        let mut env = SurvivorEnv::new(
            Layout::default(),
            ObservationEncoding::PositionWithPickups,
            RewardProfile::survivor(),
            100,
        )
        .unwrap();
        env.reset(Some(1));
        let mut agent = Agent::new();
        // pickup at (3, 0)
        for _ in 0..3 {
            agent.r#move(&mut env, Movement::Down);
        }
        assert_eq!(env.world().pickups_collected(), 1);
        assert!(!agent.finished());
    }
}
