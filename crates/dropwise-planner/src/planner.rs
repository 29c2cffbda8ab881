//! Placement search: picks where the current piece should come to rest.
//!
//! # How It Works
//!
//! For every combination of
//!
//! 1. **Hold** - keep the falling piece, or swap it for the held piece (the queue head
//!    when the hold slot is empty),
//! 2. **Rotation** - none, clockwise, counter-clockwise, or counter-clockwise twice,
//! 3. **Sweep** - `k` diagonal steps to the left, or `k` to the right,
//!
//! the piece is dropped to rest with [`transform::shift_max_down`] and the resulting
//! board is scored by a [`BoardEvaluator`]. The highest score wins; ties keep the
//! candidate enumerated first, in the order listed above (no swap before swap, left
//! before right, fewer steps before more).
//!
//! Only the immediate piece is evaluated. The queue is read only to know what a swap
//! would bring in.
//!
//! # Usage
//!
//! ```
//! use dropwise_engine::{Action, Observation};
//! use dropwise_planner::{HeuristicEvaluator, Planner, PlannerConfig};
//!
//! let json = r#"{
//!     "board": ["....", ".oo.", ".oo.", "....", "....", "xx.."],
//!     "queue": [2, 3, 4, 5],
//!     "holder": null
//! }"#;
//! let observation: Observation = serde_json::from_str(json).unwrap();
//!
//! let planner = Planner::new(Box::new(HeuristicEvaluator::default()), PlannerConfig::default());
//! let plan = planner.plan(&observation);
//!
//! assert_eq!(plan.actions.last(), Some(&Action::HardDrop));
//! ```

use arrayvec::ArrayVec;
use dropwise_engine::{Action, ActiveMask, Board, Observation, TransformError, transform};
use serde::{Deserialize, Serialize};

use crate::heuristic::BoardEvaluator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Also consider swapping with the held piece. When disabled the search covers the
    /// falling piece only and falls back to a soft drop instead of a hard drop.
    pub search_hold: bool,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self { search_hold: true }
    }
}

/// Rotation applied before the sweep.
///
/// Two clockwise turns are not searched; two counter-clockwise turns reach the same
/// orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rotation {
    None,
    Clockwise,
    CounterClockwise,
    CounterClockwiseTwice,
}

impl Rotation {
    /// Search order.
    pub const ALL: [Self; 4] = [
        Rotation::None,
        Rotation::Clockwise,
        Rotation::CounterClockwise,
        Rotation::CounterClockwiseTwice,
    ];

    /// Applies the rotation to a board and its active mask.
    pub fn apply(self, board: &Board, mask: &ActiveMask) -> Result<Board, TransformError> {
        let (board, _mask) = match self {
            Rotation::None => return Ok(board.clone()),
            Rotation::Clockwise => transform::rotate_clockwise(board, mask)?,
            Rotation::CounterClockwise => transform::rotate_counter_clockwise(board, mask)?,
            Rotation::CounterClockwiseTwice => {
                let (board, mask) = transform::rotate_counter_clockwise(board, mask)?;
                transform::rotate_counter_clockwise(&board, &mask)?
            }
        };
        Ok(board)
    }

    #[must_use]
    pub fn actions(self) -> &'static [Action] {
        match self {
            Rotation::None => &[],
            Rotation::Clockwise => &[Action::RotateClockwise],
            Rotation::CounterClockwise => &[Action::RotateCounterClockwise],
            Rotation::CounterClockwiseTwice => &[
                Action::RotateCounterClockwise,
                Action::RotateCounterClockwise,
            ],
        }
    }
}

/// Direction of the horizontal sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sweep {
    Left,
    Right,
}

impl Sweep {
    pub const ALL: [Self; 2] = [Sweep::Left, Sweep::Right];

    fn shift(self, board: &Board) -> Result<Board, TransformError> {
        match self {
            Sweep::Left => transform::shift_left(board),
            Sweep::Right => transform::shift_right(board),
        }
    }

    #[must_use]
    pub fn action(self) -> Action {
        match self {
            Sweep::Left => Action::MoveLeft,
            Sweep::Right => Action::MoveRight,
        }
    }
}

/// How a candidate board was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlacementLabel {
    pub use_hold: bool,
    pub rotation: Rotation,
    pub sweep: Sweep,
    /// Number of diagonal steps taken in the sweep direction.
    pub shifts: usize,
    /// Rows fallen by the final drop.
    pub drop_distance: usize,
}

impl PlacementLabel {
    /// Engine actions that reproduce this placement.
    #[must_use]
    pub fn actions(&self) -> Vec<Action> {
        let mut actions = Vec::with_capacity(self.shifts + 4);
        if self.use_hold {
            actions.push(Action::Swap);
        }
        actions.extend_from_slice(self.rotation.actions());
        actions.extend(std::iter::repeat_n(self.sweep.action(), self.shifts));
        actions.push(Action::HardDrop);
        actions
    }
}

/// A resting board produced by the search, with its score.
#[derive(Debug, Clone)]
pub struct PlacementCandidate {
    pub board: Board,
    pub label: PlacementLabel,
    pub score: f64,
}

/// Output of a planning decision.
///
/// `label` and `score` are `None` when no placement could be simulated and `actions`
/// holds the single fallback action.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Plan {
    pub actions: Vec<Action>,
    pub label: Option<PlacementLabel>,
    pub score: Option<f64>,
}

/// Brute-force placement planner over a [`BoardEvaluator`].
#[derive(Debug)]
pub struct Planner {
    evaluator: Box<dyn BoardEvaluator>,
    config: PlannerConfig,
}

impl Planner {
    #[must_use]
    pub fn new(evaluator: Box<dyn BoardEvaluator>, config: PlannerConfig) -> Self {
        Self { evaluator, config }
    }

    /// Enumerates every reachable resting board in search order.
    ///
    /// Branches whose transforms fail are skipped.
    #[must_use]
    pub fn candidates(&self, observation: &Observation) -> Vec<PlacementCandidate> {
        let mut candidates = vec![];
        for (use_hold, board, mask) in self.hold_choices(observation) {
            if !board.has_active() {
                tracing::trace!(use_hold, "no active piece, branch pruned");
                continue;
            }
            for rotation in Rotation::ALL {
                let rotated = match rotation.apply(&board, &mask) {
                    Ok(rotated) => rotated,
                    Err(err) => {
                        tracing::trace!(use_hold, ?rotation, %err, "rotation pruned");
                        continue;
                    }
                };
                for sweep in Sweep::ALL {
                    self.sweep(&rotated, use_hold, rotation, sweep, &mut candidates);
                }
            }
        }
        candidates
    }

    fn hold_choices(&self, observation: &Observation) -> ArrayVec<(bool, Board, ActiveMask), 2> {
        let mut choices = ArrayVec::new();
        choices.push((false, observation.board.clone(), observation.mask.clone()));
        if self.config.search_hold {
            let board =
                transform::apply_hold(&observation.board, observation.holder, &observation.queue);
            let mask = ActiveMask::from_board(&board);
            choices.push((true, board, mask));
        }
        choices
    }

    fn sweep(
        &self,
        rotated: &Board,
        use_hold: bool,
        rotation: Rotation,
        sweep: Sweep,
        candidates: &mut Vec<PlacementCandidate>,
    ) {
        let mut current = rotated.clone();
        for shifts in 0..rotated.width() {
            let (board, drop_distance) = transform::shift_max_down(&current);
            let score = self.evaluator.evaluate(&board);
            candidates.push(PlacementCandidate {
                board,
                label: PlacementLabel {
                    use_hold,
                    rotation,
                    sweep,
                    shifts,
                    drop_distance,
                },
                score,
            });

            match sweep.shift(&current) {
                Ok(next) => current = next,
                Err(err) => {
                    tracing::trace!(use_hold, ?rotation, ?sweep, shifts, %err, "sweep stopped");
                    break;
                }
            }
        }
    }

    /// Selects the best candidate; the first one enumerated wins ties.
    #[must_use]
    pub fn select_best(&self, observation: &Observation) -> Option<PlacementCandidate> {
        let mut best: Option<PlacementCandidate> = None;
        for candidate in self.candidates(observation) {
            if best.as_ref().is_none_or(|best| candidate.score > best.score) {
                best = Some(candidate);
            }
        }
        best
    }

    /// Decides the action sequence for the falling piece. Never returns an empty plan.
    #[must_use]
    pub fn plan(&self, observation: &Observation) -> Plan {
        let Some(best) = self.select_best(observation) else {
            let fallback = if self.config.search_hold {
                Action::HardDrop
            } else {
                Action::MoveDown
            };
            tracing::debug!(%fallback, "no placement found, using fallback");
            return Plan {
                actions: vec![fallback],
                label: None,
                score: None,
            };
        };

        tracing::debug!(label = ?best.label, score = best.score, "placement selected");
        Plan {
            actions: best.label.actions(),
            label: Some(best.label),
            score: Some(best.score),
        }
    }
}
