/// Score values for line clears.
///
/// Index corresponds to number of lines cleared simultaneously:
/// - 0 lines: 0 points
/// - 1 line: 100 points
/// - 2 lines: 300 points
/// - 3 lines: 500 points
/// - 4 lines: 800 points
const SCORE_TABLE: [usize; 5] = [0, 100, 300, 500, 800];

/// Game statistics tracking score, lines cleared, and piece count.
///
/// # Example
///
/// ```
/// use dropwise_engine::GameStats;
///
/// let mut stats = GameStats::new();
/// stats.complete_piece_drop(4);
///
/// assert_eq!(stats.score(), 800);
/// assert_eq!(stats.total_cleared_lines(), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameStats {
    score: usize,
    completed_pieces: usize,
    total_cleared_lines: usize,
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStats {
    /// Creates a new game statistics tracker with all counters at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            completed_pieces: 0,
            total_cleared_lines: 0,
        }
    }

    /// Returns the current score (sum of all line clear points).
    #[must_use]
    pub const fn score(&self) -> usize {
        self.score
    }

    /// Returns the total number of pieces that have been locked into place.
    #[must_use]
    pub const fn completed_pieces(&self) -> usize {
        self.completed_pieces
    }

    /// Returns the total number of lines cleared across all line clears.
    #[must_use]
    pub const fn total_cleared_lines(&self) -> usize {
        self.total_cleared_lines
    }

    /// Updates statistics after a piece locks and `cleared_lines` rows are removed.
    pub fn complete_piece_drop(&mut self, cleared_lines: usize) {
        let bucket = cleared_lines.min(SCORE_TABLE.len() - 1);
        self.completed_pieces += 1;
        self.total_cleared_lines += cleared_lines;
        self.score += SCORE_TABLE[bucket];
    }
}
