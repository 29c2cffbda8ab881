use std::path::PathBuf;

use dropwise_engine::SimEnvironment;
use dropwise_planner::{
    EpisodeOptions, EpisodeSummary, HeuristicPolicy, Policy, RandomPolicy, play_episode,
};

use crate::schema::config::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum, derive_more::Display)]
pub(crate) enum PolicyKind {
    /// Heuristic placement planner
    #[display("heuristic")]
    Heuristic,
    /// Uniformly random actions
    #[display("random")]
    Random,
}

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Policy choosing the actions
    #[arg(long, default_value_t = PolicyKind::Heuristic)]
    policy: PolicyKind,
    /// Seed of the first episode; later episodes use the following seeds
    #[arg(long, default_value_t = 43)]
    seed: u64,
    /// Number of episodes to play
    #[arg(long, default_value_t = 1)]
    episodes: usize,
    /// Stop an episode after this many steps
    #[arg(long)]
    max_steps: Option<usize>,
    /// Print the board after every step
    #[arg(long)]
    render: bool,
    /// Path to a JSON config file
    #[arg(long)]
    config: Option<PathBuf>,
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg {
        policy: policy_kind,
        seed,
        episodes,
        max_steps,
        render,
        config,
    } = arg;

    let config = Config::load(config.as_deref())?;
    let mut env = SimEnvironment::new(config.environment, *seed);

    let mut summaries = Vec::with_capacity(*episodes);
    for episode in 0..*episodes {
        let seed = seed.wrapping_add(episode as u64);
        let mut policy: Box<dyn Policy> = match policy_kind {
            PolicyKind::Heuristic => Box::new(HeuristicPolicy::new(config.planner())),
            PolicyKind::Random => Box::new(RandomPolicy::new(seed)),
        };
        let options = EpisodeOptions {
            seed,
            max_steps: *max_steps,
        };

        let summary = play_episode(&mut env, policy.as_mut(), &options, |action, outcome| {
            if *render {
                println!("{action} (reward {:.3})", outcome.reward);
                println!("{}", outcome.observation.board);
                println!();
            }
        });
        println!("episode {episode} (seed {seed}): {}", format_summary(&summary));
        summaries.push(summary);
    }

    if let Some(mean) = mean_reward(&summaries) {
        println!("mean reward over {} episodes: {mean:.3}", summaries.len());
    }
    Ok(())
}

fn format_summary(summary: &EpisodeSummary) -> String {
    let EpisodeSummary {
        total_reward,
        steps,
        pieces,
        lines,
        score,
        terminated,
    } = summary;
    let end = if *terminated { "game over" } else { "step limit" };
    format!(
        "reward {total_reward:.3}, steps {steps}, pieces {pieces}, lines {lines}, score {score} ({end})"
    )
}

#[expect(clippy::cast_precision_loss)]
fn mean_reward(summaries: &[EpisodeSummary]) -> Option<f64> {
    if summaries.is_empty() {
        return None;
    }
    let total: f64 = summaries.iter().map(|s| s.total_reward).sum();
    Some(total / summaries.len() as f64)
}
