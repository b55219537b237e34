//! Run configuration. Every field has a default, so a JSON file only needs
//! the values it changes.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::environment::SurvivorEnv;
use crate::error::{Error, Result};
use crate::observation::ObservationEncoding;
use crate::policy::EpsilonGreedy;
use crate::q_table::QTable;
use crate::reward::RewardProfile;
use crate::world::{Layout, Movement};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    pub learning_rate: f32,
    pub discount: f32,
    pub epsilon_start: f32,
    pub epsilon_min: f32,
    pub epsilon_decay: f32,
    pub max_steps: usize,
    pub episodes: usize,
    /// Log a progress line every this many episodes, 0 disables it.
    pub log_every: usize,
    pub seed: u64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.2,
            discount: 0.9,
            epsilon_start: 1.0,
            epsilon_min: 0.1,
            epsilon_decay: 0.995,
            max_steps: 100,
            episodes: 1000,
            log_every: 100,
            seed: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub layout: Layout,
    pub encoding: ObservationEncoding,
    pub reward: RewardProfile,
    pub training: TrainingConfig,
}

impl Config {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.layout.validate()?;
        let t = &self.training;
        check_unit("learning_rate", t.learning_rate, false)?;
        check_unit("discount", t.discount, true)?;
        check_unit("epsilon_start", t.epsilon_start, true)?;
        check_unit("epsilon_min", t.epsilon_min, true)?;
        check_unit("epsilon_decay", t.epsilon_decay, false)?;
        if t.epsilon_min > t.epsilon_start {
            return Err(Error::InvalidConfig(format!(
                "epsilon_min {} above epsilon_start {}",
                t.epsilon_min, t.epsilon_start
            )));
        }
        if t.max_steps == 0 {
            return Err(Error::InvalidConfig("max_steps must be positive".to_string()));
        }
        if t.epsilon_decay == 1.0 && t.epsilon_start > t.epsilon_min {
            warn!(epsilon = t.epsilon_start, "epsilon_decay is 1, exploration never decays");
        }
        if self.reward.step >= 0.0 && self.reward.goal > 0.0 {
            warn!(step = self.reward.step, "non-negative step reward does not favour short paths");
        }
        Ok(())
    }

    pub fn environment(&self) -> Result<SurvivorEnv> {
        SurvivorEnv::new(
            self.layout.clone(),
            self.encoding,
            self.reward,
            self.training.max_steps,
        )
    }

    pub fn exploration(&self) -> EpsilonGreedy {
        EpsilonGreedy::new(
            self.training.epsilon_start,
            self.training.epsilon_decay,
            self.training.epsilon_min,
            self.training.seed,
        )
    }

    /// Zeroed table sized for this configuration's observation space.
    pub fn empty_table(&self) -> QTable {
        QTable::new(self.encoding.size(&self.layout), Movement::ALL.len())
    }
}

// `(0, 1]`, or `[0, 1]` when `allow_zero`.
fn check_unit(name: &str, value: f32, allow_zero: bool) -> Result<()> {
    let (low_ok, range) = if allow_zero {
        (value >= 0.0, "[0, 1]")
    } else {
        (value > 0.0, "(0, 1]")
    };
    if low_ok && value <= 1.0 {
        Ok(())
    } else {
        Err(Error::InvalidConfig(format!("{} must be in {}, got {}", name, range, value)))
    }
}
