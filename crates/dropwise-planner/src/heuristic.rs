//! Linear board heuristic used to rank placements.
//!
//! ```text
//! score = a·Σheight + b·lines + c·holes + d·bumpiness
//! ```
//!
//! The metrics are taken on the board as it looks right after the piece comes to rest:
//! active cells count as filled and complete rows are still present.

use std::{cell::OnceCell, fmt, iter};

use dropwise_engine::Board;
use serde::{Deserialize, Serialize};

/// Coefficients of the linear heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeuristicWeights {
    pub aggregate_height: f64,
    pub complete_lines: f64,
    pub holes: f64,
    pub bumpiness: f64,
}

impl Default for HeuristicWeights {
    fn default() -> Self {
        Self {
            aggregate_height: -0.510_066,
            complete_lines: 0.760_666,
            holes: -0.356_63,
            bumpiness: -0.184_483,
        }
    }
}

/// Lazily computed metrics of a board.
#[derive(Debug)]
pub struct BoardMetrics<'a> {
    board: &'a Board,
    column_heights: OnceCell<Vec<usize>>,
    line_count: OnceCell<usize>,
    hole_count: OnceCell<usize>,
    bumpiness: OnceCell<usize>,
}

impl<'a> BoardMetrics<'a> {
    #[must_use]
    pub fn new(board: &'a Board) -> Self {
        Self {
            board,
            column_heights: OnceCell::new(),
            line_count: OnceCell::new(),
            hole_count: OnceCell::new(),
            bumpiness: OnceCell::new(),
        }
    }

    /// Height of each column: the board height minus the row of its topmost filled cell,
    /// 0 for an empty column.
    #[must_use]
    pub fn column_heights(&self) -> &[usize] {
        self.column_heights.get_or_init(|| {
            let board = self.board;
            (0..board.width())
                .map(|col| {
                    (0..board.height())
                        .find(|&row| board.get(row, col).is_filled())
                        .map_or(0, |top| board.height() - top)
                })
                .collect()
        })
    }

    #[must_use]
    pub fn aggregate_height(&self) -> usize {
        self.column_heights().iter().sum()
    }

    /// Number of rows with no empty cell.
    #[must_use]
    pub fn line_count(&self) -> usize {
        *self.line_count.get_or_init(|| {
            (0..self.board.height())
                .filter(|&row| self.board.is_row_filled(row))
                .count()
        })
    }

    /// Number of empty cells with a filled cell somewhere above them in the same column.
    #[must_use]
    pub fn hole_count(&self) -> usize {
        *self.hole_count.get_or_init(|| {
            let board = self.board;
            iter::zip(0..board.width(), self.column_heights())
                .map(|(col, &height)| {
                    let top = board.height() - height;
                    (top..board.height())
                        .filter(|&row| board.get(row, col).is_empty())
                        .count()
                })
                .sum()
        })
    }

    /// Sum of absolute height differences between adjacent columns.
    #[must_use]
    pub fn bumpiness(&self) -> usize {
        *self.bumpiness.get_or_init(|| {
            self.column_heights()
                .windows(2)
                .map(|w| w[0].abs_diff(w[1]))
                .sum()
        })
    }
}

/// Scores a board (higher is better).
pub trait BoardEvaluator: fmt::Debug + Send + Sync {
    fn evaluate(&self, board: &Board) -> f64;
}

/// [`BoardEvaluator`] computing the weighted sum of [`BoardMetrics`].
///
/// # Example
///
/// ```
/// use dropwise_engine::Board;
/// use dropwise_planner::heuristic::{BoardEvaluator, HeuristicEvaluator};
///
/// let board: Board = "
///     ....
///     ....
///     .oo.
///     .oo.
/// "
/// .parse()
/// .unwrap();
///
/// let evaluator = HeuristicEvaluator::default();
/// let score = evaluator.evaluate(&board);
/// // heights [0, 2, 2, 0]: aggregate 4, bumpiness 4
/// assert!((score - (-0.510_066 * 4.0 - 0.184_483 * 4.0)).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Default)]
pub struct HeuristicEvaluator {
    weights: HeuristicWeights,
}

impl HeuristicEvaluator {
    #[must_use]
    pub fn new(weights: HeuristicWeights) -> Self {
        Self { weights }
    }
}

impl BoardEvaluator for HeuristicEvaluator {
    #[expect(clippy::cast_precision_loss)]
    fn evaluate(&self, board: &Board) -> f64 {
        let metrics = BoardMetrics::new(board);
        let w = &self.weights;
        w.aggregate_height * metrics.aggregate_height() as f64
            + w.complete_lines * metrics.line_count() as f64
            + w.holes * metrics.hole_count() as f64
            + w.bumpiness * metrics.bumpiness() as f64
    }
}
