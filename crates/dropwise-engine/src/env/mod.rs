//! The environment a policy plays against.
//!
//! [`Environment`] is the seam between the planner and whatever runs the game. The crate
//! ships [`SimEnvironment`], a self-contained simulator with a 7-bag piece generator,
//! a hold slot and simple wall kicks.

pub use self::{action::*, game_stats::*, observation::*, piece_buffer::*, simulator::*};

mod action;
mod game_stats;
mod observation;
mod piece_buffer;
mod simulator;

/// Result of applying one [`Action`].
#[derive(Debug, Clone, PartialEq)]
pub struct StepOutcome {
    pub observation: Observation,
    pub reward: f64,
    pub terminated: bool,
    /// Rows removed by the lock this step caused, if any.
    pub lines_cleared: usize,
    /// A different piece became the falling piece (after a lock or a swap).
    pub new_piece: bool,
}

/// A falling-block game that can be reset and stepped one action at a time.
pub trait Environment {
    /// Starts a new episode and returns its first observation.
    fn reset(&mut self, seed: u64) -> Observation;

    /// Returns the current observation without advancing the game.
    fn observation(&self) -> Observation;

    /// Applies `action` and advances the game.
    ///
    /// Once an episode has terminated, further steps leave the state unchanged and
    /// report a reward of 0.
    fn step(&mut self, action: Action) -> StepOutcome;
}
