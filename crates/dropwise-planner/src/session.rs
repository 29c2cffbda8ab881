//! Episode driver: plays a [`Policy`] against an [`Environment`].

use std::collections::VecDeque;

use dropwise_engine::{Action, Environment, GameStats, StepOutcome};
use serde::Serialize;

use crate::policy::Policy;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EpisodeOptions {
    pub seed: u64,
    /// Stop after this many steps even if the episode has not terminated.
    pub max_steps: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EpisodeSummary {
    pub total_reward: f64,
    pub steps: usize,
    /// Pieces locked into the board.
    pub pieces: usize,
    pub lines: usize,
    pub score: usize,
    pub terminated: bool,
}

/// Plays one episode and reports its totals.
///
/// The policy is asked for a new plan when the previous one is used up or when a piece
/// locks. A swap issued by the plan itself brings in a new piece without triggering a
/// re-plan, since the plan already accounts for it. `on_step` sees every outcome.
pub fn play_episode<E, P, F>(
    env: &mut E,
    policy: &mut P,
    options: &EpisodeOptions,
    mut on_step: F,
) -> EpisodeSummary
where
    E: Environment + ?Sized,
    P: Policy + ?Sized,
    F: FnMut(Action, &StepOutcome),
{
    let mut observation = env.reset(options.seed);
    let mut pending = VecDeque::new();
    let mut stats = GameStats::new();
    let mut total_reward = 0.0;
    let mut steps = 0;
    let mut terminated = false;

    while options.max_steps.is_none_or(|max| steps < max) {
        if pending.is_empty() {
            pending.extend(policy.plan(&observation));
        }
        let Some(action) = pending.pop_front() else {
            tracing::warn!("policy returned an empty plan");
            break;
        };

        let outcome = env.step(action);
        steps += 1;
        total_reward += outcome.reward;
        on_step(action, &outcome);

        let locked = outcome.new_piece && action != Action::Swap;
        if locked {
            stats.complete_piece_drop(outcome.lines_cleared);
            pending.clear();
        }
        observation = outcome.observation;
        if outcome.terminated {
            terminated = true;
            break;
        }
    }

    let summary = EpisodeSummary {
        total_reward,
        steps,
        pieces: stats.completed_pieces(),
        lines: stats.total_cleared_lines(),
        score: stats.score(),
        terminated,
    };
    tracing::info!(
        seed = options.seed,
        steps = summary.steps,
        pieces = summary.pieces,
        lines = summary.lines,
        score = summary.score,
        total_reward = summary.total_reward,
        "episode finished"
    );
    summary
}
