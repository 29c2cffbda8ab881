//! Heuristic placement planning for falling-block puzzles.
//!
//! The crate is organized in three levels:
//!
//! 1. **Board evaluation** ([`heuristic`]) - scores a single board with a linear
//!    combination of aggregate height, complete lines, holes and bumpiness.
//! 2. **Placement planning** ([`planner`]) - enumerates hold × rotation × sweep
//!    placements of the falling piece, scores the resting boards, and turns the best one
//!    into engine actions.
//! 3. **Episode play** ([`policy`], [`session`]) - policies wrap a planner (or a
//!    random baseline) and the driver runs them against an
//!    [`Environment`](dropwise_engine::Environment).
//!
//! ```text
//! Episode play (policy + driver)
//!     ↓ uses
//! Placement planning (best placement → actions)
//!     ↓ uses
//! Board evaluation (score a resting board)
//! ```
//!
//! The search is greedy: only the immediate piece is evaluated, and every simulation
//! works on copies of the observation.

pub use self::{
    heuristic::{BoardEvaluator, HeuristicEvaluator, HeuristicWeights},
    planner::{Plan, Planner, PlannerConfig},
    policy::{HeuristicPolicy, Policy, RandomPolicy},
    session::{EpisodeOptions, EpisodeSummary, play_episode},
};

pub mod heuristic;
pub mod planner;
pub mod policy;
pub mod session;
