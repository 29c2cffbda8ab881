use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use crate::{
    InvalidBoardSize,
    core::{Board, Cell, PieceKind, PieceRotation},
};

use super::{Action, Environment, GameStats, Observation, PieceBuffer, PieceSeed, StepOutcome};

/// Reward shaping of [`SimEnvironment`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardConfig {
    /// Granted on every step of a running episode.
    pub alive: f64,
    /// Multiplied by the square of the number of rows cleared at once.
    pub line_clear: f64,
    /// Added on the step that ends the episode.
    pub game_over: f64,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            alive: 0.001,
            line_clear: 1.0,
            game_over: -2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvConfig {
    pub height: usize,
    pub width: usize,
    pub rewards: RewardConfig,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            height: Board::DEFAULT_HEIGHT,
            width: Board::DEFAULT_WIDTH,
            rewards: RewardConfig::default(),
        }
    }
}

impl EnvConfig {
    /// Checks that the configured board has at least one row and one column.
    pub fn validate(&self) -> Result<(), InvalidBoardSize> {
        if self.height == 0 || self.width == 0 {
            return Err(InvalidBoardSize {
                height: self.height,
                width: self.width,
            });
        }
        Ok(())
    }
}

/// Reference [`Environment`] implementation.
///
/// The board only ever holds locked and empty cells; the falling piece is tracked
/// separately and painted as active cells when an observation is taken.
///
/// Every horizontal move or rotation is followed by one gravity step. When the piece
/// cannot fall it locks, full rows are cleared and the next piece spawns at the top.
/// A spawn that overlaps locked cells ends the episode.
///
/// # Example
///
/// ```
/// use dropwise_engine::{Action, EnvConfig, Environment, SimEnvironment};
///
/// let mut env = SimEnvironment::new(EnvConfig::default(), 43);
/// let outcome = env.step(Action::HardDrop);
///
/// assert!(outcome.new_piece);
/// assert!(!outcome.terminated);
/// assert_eq!(env.stats().completed_pieces(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct SimEnvironment {
    config: EnvConfig,
    board: Board,
    falling: Option<FallingPiece>,
    pieces: PieceBuffer,
    hold_used: bool,
    stats: GameStats,
}

impl SimEnvironment {
    /// Creates an environment and starts its first episode with `seed`.
    ///
    /// The config must pass [`EnvConfig::validate`].
    #[must_use]
    pub fn new(config: EnvConfig, seed: u64) -> Self {
        let mut pieces = PieceBuffer::with_seed(PieceSeed::from(seed));
        let board = Board::new(config.height, config.width);
        let falling = FallingPiece::spawn(pieces.pop_next(), &board);
        Self {
            config,
            board,
            falling,
            pieces,
            hold_used: false,
            stats: GameStats::new(),
        }
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn is_terminated(&self) -> bool {
        self.falling.is_none()
    }

    /// Kind of the falling piece, `None` once the episode has ended.
    #[must_use]
    pub fn falling_kind(&self) -> Option<PieceKind> {
        self.falling.map(|piece| piece.kind)
    }

    fn try_move(&mut self, moved: FallingPiece) {
        if moved.fits(&self.board) {
            self.falling = Some(moved);
        }
    }

    /// Moves the piece one row down, or locks it where it is.
    fn apply_gravity(&mut self, outcome: &mut Progress) {
        let Some(piece) = self.falling else {
            return;
        };
        let fallen = piece.down();
        if fallen.fits(&self.board) {
            self.falling = Some(fallen);
        } else {
            self.lock(piece, outcome);
        }
    }

    fn lock(&mut self, piece: FallingPiece, outcome: &mut Progress) {
        if let Some(cells) = piece.cells(&self.board) {
            for (row, col) in cells {
                self.board.set(row, col, Cell::Locked);
            }
        }
        let cleared_lines = self.board.clear_lines();
        self.stats.complete_piece_drop(cleared_lines);
        tracing::trace!(kind = ?piece.kind, cleared_lines, "piece locked");

        outcome.lines_cleared = cleared_lines;
        outcome.new_piece = true;
        self.hold_used = false;
        self.falling = FallingPiece::spawn(self.pieces.pop_next(), &self.board);
        if self.falling.is_none() {
            tracing::debug!(
                pieces = self.stats.completed_pieces(),
                lines = self.stats.total_cleared_lines(),
                score = self.stats.score(),
                "game over: spawn blocked"
            );
        }
    }

    fn swap(&mut self, piece: FallingPiece, outcome: &mut Progress) {
        if self.hold_used {
            return;
        }
        let Some(swapped) = FallingPiece::spawn(self.pieces.peek_hold_result(), &self.board)
        else {
            return;
        };
        let received = self.pieces.hold(piece.kind);
        debug_assert_eq!(received, swapped.kind);
        self.falling = Some(swapped);
        self.hold_used = true;
        outcome.new_piece = true;
    }
}

#[derive(Debug, Default)]
struct Progress {
    lines_cleared: usize,
    new_piece: bool,
}

impl Environment for SimEnvironment {
    fn reset(&mut self, seed: u64) -> Observation {
        *self = Self::new(self.config, seed);
        self.observation()
    }

    fn observation(&self) -> Observation {
        let mut board = self.board.clone();
        if let Some(cells) = self.falling.and_then(|piece| piece.cells(&board)) {
            for (row, col) in cells {
                board.set(row, col, Cell::Active);
            }
        }
        Observation::new(board, self.pieces.queue(), self.pieces.held_piece())
    }

    fn step(&mut self, action: Action) -> StepOutcome {
        let Some(piece) = self.falling else {
            return StepOutcome {
                observation: self.observation(),
                reward: 0.0,
                terminated: true,
                lines_cleared: 0,
                new_piece: false,
            };
        };

        let mut progress = Progress::default();
        match action {
            Action::MoveLeft => {
                self.try_move(piece.left());
                self.apply_gravity(&mut progress);
            }
            Action::MoveRight => {
                self.try_move(piece.right());
                self.apply_gravity(&mut progress);
            }
            Action::RotateClockwise => {
                if let Some(rotated) = piece.super_rotated(&self.board, true) {
                    self.falling = Some(rotated);
                }
                self.apply_gravity(&mut progress);
            }
            Action::RotateCounterClockwise => {
                if let Some(rotated) = piece.super_rotated(&self.board, false) {
                    self.falling = Some(rotated);
                }
                self.apply_gravity(&mut progress);
            }
            Action::MoveDown => self.apply_gravity(&mut progress),
            Action::HardDrop => {
                let dropped = piece.simulate_drop_position(&self.board);
                self.lock(dropped, &mut progress);
            }
            Action::Swap => self.swap(piece, &mut progress),
        }

        let rewards = &self.config.rewards;
        #[expect(clippy::cast_precision_loss)]
        let lines = progress.lines_cleared as f64;
        let mut reward = rewards.alive + rewards.line_clear * lines * lines;
        let terminated = self.is_terminated();
        if terminated {
            reward += rewards.game_over;
        }

        StepOutcome {
            observation: self.observation(),
            reward,
            terminated,
            lines_cleared: progress.lines_cleared,
            new_piece: progress.new_piece,
        }
    }
}

/// The falling piece: a template rotation placed with its box's top-left corner at
/// `(row, col)`. Coordinates are signed because kicks may push the box past an edge
/// while the occupied cells stay on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FallingPiece {
    kind: PieceKind,
    rotation: PieceRotation,
    row: isize,
    col: isize,
}

impl FallingPiece {
    /// Places `kind` at the top of the board, or returns `None` if it does not fit.
    #[expect(clippy::cast_possible_wrap)]
    fn spawn(kind: PieceKind, board: &Board) -> Option<Self> {
        let piece = Self {
            kind,
            rotation: PieceRotation::SPAWN,
            row: 0,
            col: kind.spawn_column(board.width()) as isize,
        };
        piece.fits(board).then_some(piece)
    }

    fn moved(self, d_row: isize, d_col: isize) -> Self {
        Self {
            row: self.row + d_row,
            col: self.col + d_col,
            ..self
        }
    }

    fn up(self) -> Self {
        self.moved(-1, 0)
    }

    fn down(self) -> Self {
        self.moved(1, 0)
    }

    fn left(self) -> Self {
        self.moved(0, -1)
    }

    fn right(self) -> Self {
        self.moved(0, 1)
    }

    /// Board positions of the piece's cells, or `None` if any of them is off the board.
    fn cells(self, board: &Board) -> Option<ArrayVec<(usize, usize), 4>> {
        self.kind
            .occupied_offsets(self.rotation)
            .map(|(dy, dx)| board.offset(dy, dx, self.row, self.col))
            .collect()
    }

    fn fits(self, board: &Board) -> bool {
        self.cells(board)
            .is_some_and(|cells| cells.iter().all(|&(row, col)| board.get(row, col).is_empty()))
    }

    /// Rotates in place, falling back to simple kicks (up, right, down, left).
    ///
    /// This is not a full Super Rotation System: there are no per-piece or
    /// per-orientation kick tables.
    fn super_rotated(self, board: &Board, clockwise: bool) -> Option<Self> {
        let rotation = if clockwise {
            self.rotation.rotated_right()
        } else {
            self.rotation.rotated_left()
        };
        let rotated = Self { rotation, ..self };
        [
            rotated,
            rotated.up(),
            rotated.right(),
            rotated.down(),
            rotated.left(),
        ]
        .into_iter()
        .find(|piece| piece.fits(board))
    }

    fn simulate_drop_position(self, board: &Board) -> Self {
        let mut dropped = self;
        while dropped.down().fits(board) {
            dropped = dropped.down();
        }
        dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_env(height: usize, width: usize) -> SimEnvironment {
        SimEnvironment::new(
            EnvConfig {
                height,
                width,
                ..EnvConfig::default()
            },
            43,
        )
    }

    fn force_piece(env: &mut SimEnvironment, kind: PieceKind) {
        env.falling = FallingPiece::spawn(kind, &env.board);
        assert!(env.falling.is_some());
    }

    #[test]
    fn test_spawn_is_centered_at_top() {
        let mut env = small_env(6, 10);
        force_piece(&mut env, PieceKind::O);

        let observation = env.observation();
        assert_eq!(observation.mask.positions().collect::<Vec<_>>(), [
            (0, 4),
            (0, 5),
            (1, 4),
            (1, 5)
        ]);
        assert_eq!(observation.queue, env.pieces.queue());
        assert_eq!(observation.holder, None);
    }

    #[test]
    fn test_move_applies_gravity() {
        let mut env = small_env(6, 10);
        force_piece(&mut env, PieceKind::O);

        let outcome = env.step(Action::MoveLeft);
        assert!(!outcome.new_piece);
        assert_eq!(outcome.observation.mask.positions().collect::<Vec<_>>(), [
            (1, 3),
            (1, 4),
            (2, 3),
            (2, 4)
        ]);
    }

    #[test]
    fn test_move_into_wall_still_falls() {
        let mut env = small_env(6, 4);
        force_piece(&mut env, PieceKind::O);
        env.step(Action::MoveLeft);

        let outcome = env.step(Action::MoveLeft);
        assert_eq!(outcome.observation.board.to_string(), [
            "....", "....", "oo..", "oo..", "....", "....",
        ]
        .join("\n"));
    }

    #[test]
    fn test_gravity_locks_resting_piece() {
        let mut env = small_env(3, 4);
        force_piece(&mut env, PieceKind::O);

        let outcome = env.step(Action::MoveDown);
        assert!(!outcome.new_piece);
        let outcome = env.step(Action::MoveDown);
        assert!(outcome.new_piece);
        assert_eq!(env.stats().completed_pieces(), 1);
        assert_eq!(env.board.to_string(), "....\n.xx.\n.xx.");
    }

    #[test]
    fn test_hard_drop_clears_line_and_rewards() {
        let mut env = small_env(5, 4);
        force_piece(&mut env, PieceKind::I);

        let outcome = env.step(Action::HardDrop);
        assert_eq!(outcome.lines_cleared, 1);
        assert!(outcome.new_piece);
        assert!(!outcome.terminated);
        assert!((outcome.reward - 1.001).abs() < 1e-9);
        assert_eq!(env.stats().total_cleared_lines(), 1);
        assert_eq!(env.stats().score(), 100);
        assert!(env.board.rows().flatten().all(|cell| cell.is_empty()));
    }

    #[test]
    fn test_rotation_kicks_off_wall() {
        let mut env = small_env(8, 4);
        force_piece(&mut env, PieceKind::I);
        // vertical I in column 2 of its box
        env.step(Action::RotateClockwise);
        env.step(Action::MoveRight);
        let before = env.falling.unwrap();
        assert_eq!(before.col, 1);

        // rotating back needs the box at column 0, reached by the left kick
        env.step(Action::RotateCounterClockwise);
        let after = env.falling.unwrap();
        assert_eq!(after.rotation, PieceRotation::SPAWN);
        assert_eq!(after.col, 0);
    }

    #[test]
    fn test_swap_once_per_piece() {
        let mut env = small_env(20, 10);
        let current = env.falling_kind().unwrap();
        let next = env.pieces.queue()[0];

        let outcome = env.step(Action::Swap);
        assert!(outcome.new_piece);
        assert_eq!(outcome.observation.holder, Some(current));
        assert_eq!(env.falling_kind(), Some(next));
        assert_eq!(outcome.observation.mask.count(), 4);

        let outcome = env.step(Action::Swap);
        assert!(!outcome.new_piece);
        assert_eq!(env.falling_kind(), Some(next));

        env.step(Action::HardDrop);
        let upcoming = env.falling_kind().unwrap();
        let outcome = env.step(Action::Swap);
        assert!(outcome.new_piece);
        assert_eq!(env.falling_kind(), Some(current));
        assert_eq!(outcome.observation.holder, Some(upcoming));
    }

    #[test]
    fn test_stacking_terminates() {
        let mut env = small_env(6, 10);
        let mut terminated = None;
        for step in 0..100 {
            let outcome = env.step(Action::HardDrop);
            if outcome.terminated {
                assert!(outcome.reward < 0.0);
                terminated = Some(step);
                break;
            }
        }
        assert!(terminated.is_some());
        assert!(env.is_terminated());

        let before = env.observation();
        let outcome = env.step(Action::MoveLeft);
        assert!(outcome.terminated);
        assert!(outcome.reward.abs() < f64::EPSILON);
        assert_eq!(outcome.observation, before);
    }

    #[test]
    fn test_reset_is_deterministic() {
        let mut a = small_env(20, 10);
        let mut b = small_env(20, 10);
        for action in [Action::HardDrop, Action::Swap, Action::MoveLeft, Action::HardDrop] {
            assert_eq!(a.step(action), b.step(action));
        }

        let first = a.reset(7);
        assert_eq!(first, b.reset(7));
        assert_eq!(a.stats().completed_pieces(), 0);
        assert!(first.board.rows().flatten().all(|cell| !cell.is_locked()));
    }

    #[test]
    fn test_config_defaults() {
        let config: EnvConfig = serde_json::from_str(r#"{"width": 6, "rewards": {"alive": 0.5}}"#)
            .unwrap();
        assert_eq!(config.height, 20);
        assert_eq!(config.width, 6);
        assert!((config.rewards.alive - 0.5).abs() < f64::EPSILON);
        assert!((config.rewards.game_over + 2.0).abs() < f64::EPSILON);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_rejects_empty_board() {
        let config: EnvConfig = serde_json::from_str(r#"{"height": 0}"#).unwrap();
        assert_eq!(
            config.validate(),
            Err(InvalidBoardSize {
                height: 0,
                width: Board::DEFAULT_WIDTH
            })
        );

        let config = EnvConfig {
            width: 0,
            ..EnvConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
