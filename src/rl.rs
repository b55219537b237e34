use serde::Serialize;
use tracing::{debug, info};

use crate::agent::{Agent, Outcome};
use crate::config::TrainingConfig;
use crate::environment::SurvivorEnv;
use crate::policy::{ExplorationStrategy, Greedy};
use crate::q_table::QTable;
use crate::world::{Movement, Pos};

/// Summary of one finished episode.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EpisodeStats {
    pub episode: usize,
    pub steps: usize,
    pub total_reward: f32,
    pub outcome: Outcome,
    pub pickups_collected: usize,
    pub epsilon: f32,
    /// Largest absolute temporal difference seen during the episode.
    pub max_td: f32,
}

/// Positions visited by a greedy run, start cell first.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    pub positions: Vec<Pos>,
    pub actions: Vec<Movement>,
}

pub struct QLearning {
    config: TrainingConfig,
}

impl QLearning {
    pub fn new(config: TrainingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Runs `episodes` learning episodes, updating `table` after every step.
    pub fn train(
        &self,
        env: &mut SurvivorEnv,
        table: &mut QTable,
        strategy: &mut dyn ExplorationStrategy,
        episodes: usize,
    ) -> Vec<EpisodeStats> {
        let mut results = Vec::with_capacity(episodes);
        for episode_num in 0..episodes {
            let seed = self.config.seed.wrapping_add(episode_num as u64);
            let stats = self.run_episode(env, table, strategy, episode_num, seed);
            strategy.end_episode();

            if self.config.log_every > 0 && episode_num % self.config.log_every == 0 {
                info!(
                    episode = episode_num,
                    total_reward = stats.total_reward,
                    steps = stats.steps,
                    outcome = ?stats.outcome,
                    epsilon = stats.epsilon,
                    "training progress"
                );
            }
            results.push(stats);
        }
        results
    }

    fn run_episode(
        &self,
        env: &mut SurvivorEnv,
        table: &mut QTable,
        strategy: &mut dyn ExplorationStrategy,
        episode: usize,
        seed: u64,
    ) -> EpisodeStats {
        let epsilon = strategy.epsilon();
        let mut state = env.reset(Some(seed));
        let mut agent = Agent::new();
        let mut max_td: f32 = 0.0;

        // Run a full episode, ie until a terminal event or the step limit
        while !agent.finished() {
            let a = strategy.next_action(state, table);
            let step = agent.r#move(env, a);
            let s_p = (!step.terminated).then_some(step.observation);
            let t_d = table.update(
                state,
                a,
                step.reward,
                s_p,
                self.config.learning_rate,
                self.config.discount,
            );
            max_td = max_td.max(t_d.abs());
            state = step.observation;
        }

        EpisodeStats {
            episode,
            steps: agent.steps,
            total_reward: agent.reward,
            outcome: agent.outcome.unwrap_or(Outcome::Truncated),
            pickups_collected: env.world().pickups_collected(),
            epsilon,
            max_td,
        }
    }

    /// Plays one greedy episode without touching the table.
    pub fn evaluate(&self, env: &mut SurvivorEnv, table: &QTable, seed: u64) -> (EpisodeStats, Trajectory) {
        let mut state = env.reset(Some(seed));
        let mut agent = Agent::new();
        let mut trajectory = Trajectory {
            positions: vec![env.world().agent()],
            actions: Vec::new(),
        };
        debug!("\n{}", env.world());

        while !agent.finished() {
            let a = Greedy.next_action(state, table);
            let step = agent.r#move(env, a);
            trajectory.actions.push(a);
            trajectory.positions.push(env.world().agent());
            debug!(action = ?a, event = ?step.event, reward = step.reward, "\n{}", env.world());
            state = step.observation;
        }

        let stats = EpisodeStats {
            episode: 0,
            steps: agent.steps,
            total_reward: agent.reward,
            outcome: agent.outcome.unwrap_or(Outcome::Truncated),
            pickups_collected: env.world().pickups_collected(),
            epsilon: 0.0,
            max_td: 0.0,
        };
        info!(
            total_reward = stats.total_reward,
            steps = stats.steps,
            outcome = ?stats.outcome,
            "evaluation finished"
        );
        (stats, trajectory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observation::ObservationEncoding;
    use crate::policy::{EpsilonGreedy, Greedy};
    use crate::reward::RewardProfile;
    use crate::world::Layout;

    fn env() -> SurvivorEnv {
        SurvivorEnv::new(
            Layout::default(),
            ObservationEncoding::PositionWithPickups,
            RewardProfile::survivor(),
            100,
        )
        .unwrap()
    }

    #[test]
    fn training_learns_to_reach_the_goal() {
        let config = TrainingConfig::default();
        let learner = QLearning::new(config.clone());
        let mut env = env();
        let mut table = QTable::new(env.observation_count(), env.action_count());
        let mut strategy = EpsilonGreedy::new(
            config.epsilon_start,
            config.epsilon_decay,
            config.epsilon_min,
            config.seed,
        );

        let stats = learner.train(&mut env, &mut table, &mut strategy, 2000);
        assert_eq!(stats.len(), 2000);
        assert!(strategy.epsilon() <= config.epsilon_min + 1e-6);

        let (result, trajectory) = learner.evaluate(&mut env, &table, 0);
        assert_eq!(result.outcome, Outcome::Goal);
        assert_eq!(trajectory.positions.last(), Some(&env.world().goal()));
        assert_eq!(trajectory.positions.len(), trajectory.actions.len() + 1);
    }

    #[test]
    fn untrained_table_truncates() {
        let config = TrainingConfig {
            max_steps: 10,
            ..TrainingConfig::default()
        };
        let learner = QLearning::new(config.clone());
        let mut env = SurvivorEnv::new(
            Layout::default(),
            ObservationEncoding::PositionWithPickups,
            RewardProfile::survivor(),
            config.max_steps,
        )
        .unwrap();
        let table = QTable::new(env.observation_count(), env.action_count());
        // all-zero table always picks Left, which is a wall at the start
        let (stats, trajectory) = learner.evaluate(&mut env, &table, 0);
        assert_eq!(stats.outcome, Outcome::Truncated);
        assert_eq!(stats.steps, 10);
        assert!(trajectory.positions.iter().all(|p| *p == Pos::new(0, 0)));
    }

    fn one_step_learner() -> (QLearning, SurvivorEnv) {
        let config = TrainingConfig {
            max_steps: 1,
            ..TrainingConfig::default()
        };
        let env = SurvivorEnv::new(
            Layout::default(),
            ObservationEncoding::PositionWithPickups,
            RewardProfile::survivor(),
            config.max_steps,
        )
        .unwrap();
        (QLearning::new(config), env)
    }

    #[test]
    fn truncated_step_bootstraps_from_next_state() {
        let (learner, mut env) = one_step_learner();
        let mut table = QTable::new(env.observation_count(), env.action_count());
        let start = env.reset(Some(0));
        // greedy walks Down to (1, 0), observation 10, and is cut off there
        table.set(start, Movement::Down, 1.0);
        table.set(10, Movement::Up, 4.0);

        let stats = learner.train(&mut env, &mut table, &mut Greedy, 1);
        assert_eq!(stats[0].outcome, Outcome::Truncated);
        assert_eq!(env.observe(), 10);
        // 1 + 0.2 * (-0.1 + 0.9 * 4 - 1)
        assert!((table.get(start, Movement::Down) - 1.5).abs() < 1e-5);
    }

    #[test]
    fn terminal_step_drops_the_bootstrap_term() {
        let (learner, mut env) = one_step_learner();
        let mut table = QTable::new(env.observation_count(), env.action_count());
        let start = env.reset(Some(0));
        // greedy walks Right onto the hazard at (0, 1), observation 2
        table.set(start, Movement::Right, 1.0);
        table.set(2, Movement::Up, 4.0);

        let stats = learner.train(&mut env, &mut table, &mut Greedy, 1);
        assert_eq!(stats[0].outcome, Outcome::Hazard);
        assert_eq!(env.observe(), 2);
        // 1 + 0.2 * (-10 - 1)
        assert!((table.get(start, Movement::Right) + 1.2).abs() < 1e-5);
    }

    #[test]
    fn episode_stats_record_epsilon_before_decay() {
        let learner = QLearning::new(TrainingConfig::default());
        let mut env = env();
        let mut table = QTable::new(env.observation_count(), env.action_count());
        let mut strategy = EpsilonGreedy::new(1.0, 0.5, 0.1, 3);
        let stats = learner.train(&mut env, &mut table, &mut strategy, 3);
        let epsilons: Vec<f32> = stats.iter().map(|s| s.epsilon).collect();
        assert_eq!(epsilons, vec![1.0, 0.5, 0.25]);
    }
}
