use serde::{Deserialize, Serialize};

use crate::world::Event;

/// Reward table for one revision of the game. Rewards depend only on the
/// event and the pickup counts.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardProfile {
    pub step: f32,
    pub hazard: f32,
    pub pickup: f32,
    pub goal: f32,
    /// Applied to `goal` when every pickup was collected before reaching it.
    pub all_pickups_goal_multiplier: f32,
    pub hazard_terminates: bool,
}

impl Default for RewardProfile {
    fn default() -> Self {
        Self::survivor()
    }
}

impl RewardProfile {
    /// Sparse reward: only the goal pays, hazards are walked through.
    pub fn goal_only() -> Self {
        Self {
            step: 0.0,
            hazard: 0.0,
            pickup: 0.0,
            goal: 1.0,
            all_pickups_goal_multiplier: 1.0,
            hazard_terminates: false,
        }
    }

    pub fn survivor() -> Self {
        Self {
            step: -0.1,
            hazard: -10.0,
            pickup: 2.0,
            goal: 10.0,
            all_pickups_goal_multiplier: 2.0,
            hazard_terminates: true,
        }
    }

    pub fn reward(&self, event: Event, collected: usize, total: usize) -> f32 {
        match event {
            Event::Floor => self.step,
            Event::Hazard => self.hazard,
            Event::Pickup => self.pickup,
            Event::Goal if total > 0 && collected == total => {
                self.goal * self.all_pickups_goal_multiplier
            }
            Event::Goal => self.goal,
        }
    }

    pub fn is_terminal(&self, event: Event) -> bool {
        match event {
            Event::Goal => true,
            Event::Hazard => self.hazard_terminates,
            Event::Floor | Event::Pickup => false,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileName {
    GoalOnly,
    #[default]
    Survivor,
}

impl From<ProfileName> for RewardProfile {
    fn from(name: ProfileName) -> Self {
        match name {
            ProfileName::GoalOnly => RewardProfile::goal_only(),
            ProfileName::Survivor => RewardProfile::survivor(),
        }
    }
}
