use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use survivor_rl::observation::ObservationEncoding;
use survivor_rl::reward::{ProfileName, RewardProfile};
use survivor_rl::{report, Config, QLearning, QTable};

#[derive(Parser)]
#[command(name = "survivor", about = "Train or replay a Q-learning survivor")]
struct Cli {
    /// JSON run configuration; defaults are used when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[arg(long, global = true, default_value = "survivor_q_table.bin")]
    table: PathBuf,

    #[arg(long, global = true)]
    seed: Option<u64>,

    #[arg(long, global = true, value_enum)]
    encoding: Option<EncodingArg>,

    #[arg(long, global = true, value_enum)]
    profile: Option<ProfileArg>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Learn a value table and save it.
    Train {
        #[arg(long)]
        episodes: Option<usize>,
        /// Write per-episode statistics as CSV.
        #[arg(long)]
        stats: Option<PathBuf>,
    },
    /// Replay the saved table greedily for one episode.
    Evaluate,
}

#[derive(Copy, Clone, ValueEnum)]
enum EncodingArg {
    Coordinates,
    PositionWithPickups,
    Neighborhood,
}

impl From<EncodingArg> for ObservationEncoding {
    fn from(arg: EncodingArg) -> Self {
        match arg {
            EncodingArg::Coordinates => ObservationEncoding::Coordinates,
            EncodingArg::PositionWithPickups => ObservationEncoding::PositionWithPickups,
            EncodingArg::Neighborhood => ObservationEncoding::Neighborhood,
        }
    }
}

#[derive(Copy, Clone, ValueEnum)]
enum ProfileArg {
    GoalOnly,
    Survivor,
}

impl From<ProfileArg> for RewardProfile {
    fn from(arg: ProfileArg) -> Self {
        match arg {
            ProfileArg::GoalOnly => ProfileName::GoalOnly.into(),
            ProfileArg::Survivor => ProfileName::Survivor.into(),
        }
    }
}

const DEFAULT_LOG_DIRECTIVES: &str = "survivor_rl=info,survivor=info";

/// `RUST_LOG` wins when set; otherwise crate-level info logs are shown.
fn log_filter(rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .filter(|s| !s.trim().is_empty())
        .and_then(|s| EnvFilter::try_new(s).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_DIRECTIVES))
}

fn init_logging() {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    fmt()
        .with_env_filter(log_filter(rust_log.as_deref()))
        .with_target(false)
        .init();
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(seed) = cli.seed {
        config.training.seed = seed;
    }
    if let Some(encoding) = cli.encoding {
        config.encoding = encoding.into();
    }
    if let Some(profile) = cli.profile {
        config.reward = profile.into();
    }
    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let mut env = config.environment()?;
    let learner = QLearning::new(config.training.clone());

    match &cli.command {
        Command::Train { episodes, stats } => {
            let episodes = episodes.unwrap_or(config.training.episodes);
            let mut table = config.empty_table();
            let mut strategy = config.exploration();
            info!(
                episodes,
                observations = env.observation_count(),
                encoding = ?config.encoding,
                "training started"
            );
            let results = learner.train(&mut env, &mut table, &mut strategy, episodes);

            if let Some(summary) = report::summarize(&results) {
                info!(
                    goal_rate = summary.goal_rate,
                    hazard_rate = summary.hazard_rate,
                    mean_reward = summary.mean_reward,
                    best_reward = summary.best_reward,
                    "training finished"
                );
            }
            table
                .save(&cli.table)
                .with_context(|| format!("saving table to {}", cli.table.display()))?;
            if let Some(path) = stats {
                report::write_stats_file(path, &results)
                    .with_context(|| format!("writing stats to {}", path.display()))?;
            }
        }
        Command::Evaluate => {
            let table = QTable::load(&cli.table, env.table_shape())
                .with_context(|| format!("loading table from {}", cli.table.display()))?;
            let (stats, trajectory) = learner.evaluate(&mut env, &table, config.training.seed);
            println!("{}", env.world());
            println!(
                "Total Reward: {} ({:?} after {} steps, path {:?})",
                stats.total_reward, stats.outcome, stats.steps, trajectory.actions
            );
        }
    }
    Ok(())
}
