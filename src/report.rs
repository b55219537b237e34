use std::io;
use std::path::Path;

use csv::Writer;
use ordered_float::OrderedFloat;

use crate::agent::Outcome;
use crate::error::Result;
use crate::rl::EpisodeStats;

pub fn write_stats<W: io::Write>(writer: W, stats: &[EpisodeStats]) -> Result<()> {
    let mut wtr = Writer::from_writer(writer);
    for row in stats {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_stats_file(path: impl AsRef<Path>, stats: &[EpisodeStats]) -> Result<()> {
    let wtr = std::fs::File::create(path)?;
    write_stats(wtr, stats)
}

/// Aggregate figures over a window of episodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub episodes: usize,
    pub goal_rate: f32,
    pub hazard_rate: f32,
    pub mean_reward: f32,
    pub best_reward: f32,
    pub mean_steps: f32,
}

pub fn summarize(stats: &[EpisodeStats]) -> Option<Summary> {
    if stats.is_empty() {
        return None;
    }
    let n = stats.len() as f32;
    let count = |outcome: Outcome| stats.iter().filter(|s| s.outcome == outcome).count() as f32;
    let best_reward = stats
        .iter()
        .map(|s| OrderedFloat(s.total_reward))
        .max()
        .map(OrderedFloat::into_inner)?;

    Some(Summary {
        episodes: stats.len(),
        goal_rate: count(Outcome::Goal) / n,
        hazard_rate: count(Outcome::Hazard) / n,
        mean_reward: stats.iter().map(|s| s.total_reward).sum::<f32>() / n,
        best_reward,
        mean_steps: stats.iter().map(|s| s.steps as f32).sum::<f32>() / n,
    })
}
