//! Survivor: a small grid world where an agent walks to the exit door,
//! collecting supplies and avoiding zombies, learned with tabular Q-learning.

pub mod agent;
pub mod config;
pub mod environment;
pub mod error;
pub mod observation;
pub mod policy;
pub mod q_table;
pub mod report;
pub mod reward;
pub mod rl;
pub mod world;

pub use config::{Config, TrainingConfig};
pub use environment::{Step, SurvivorEnv};
pub use error::{Error, Result};
pub use q_table::QTable;
pub use rl::{EpisodeStats, QLearning};
pub use world::{Event, Layout, Movement, Pos, World};
