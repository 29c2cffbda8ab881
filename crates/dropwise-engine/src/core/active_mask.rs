use std::fmt;

use super::board::Board;

/// Boolean grid congruent to a [`Board`], `true` where the falling piece is.
///
/// Observations carry the mask next to the board. For a well-formed observation
/// [`ActiveMask::from_board`] reproduces it exactly, but transforms such as
/// [`rotate_clockwise`](crate::transform::rotate_clockwise) derive the next mask
/// independently of the board content, so the two are kept as separate values.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ActiveMask {
    height: usize,
    width: usize,
    bits: Vec<bool>,
}

impl ActiveMask {
    /// Creates a mask with no active cell.
    #[must_use]
    pub fn new(height: usize, width: usize) -> Self {
        Self {
            height,
            width,
            bits: vec![false; height * width],
        }
    }

    /// Builds the mask of the board's active cells.
    #[must_use]
    pub fn from_board(board: &Board) -> Self {
        let mut mask = Self::new(board.height(), board.width());
        for (row, col) in board.active_positions() {
            mask.set(row, col, true);
        }
        mask
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> bool {
        self.bits[row * self.width + col]
    }

    pub fn set(&mut self, row: usize, col: usize, active: bool) {
        assert!(row < self.height && col < self.width);
        self.bits[row * self.width + col] = active;
    }

    /// Number of active cells.
    #[must_use]
    pub fn count(&self) -> usize {
        self.bits.iter().filter(|b| **b).count()
    }

    /// Iterates over active positions in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.bits
            .iter()
            .enumerate()
            .filter(|(_, b)| **b)
            .map(|(i, _)| (i / self.width, i % self.width))
    }

    /// Returns the mask moved one row down, or `None` if an active cell is on the bottom row.
    #[must_use]
    pub fn shifted_down(&self) -> Option<Self> {
        let last_row = &self.bits[(self.height - 1) * self.width..];
        if last_row.iter().any(|b| *b) {
            return None;
        }
        let mut shifted = Self::new(self.height, self.width);
        shifted.bits[self.width..].copy_from_slice(&self.bits[..(self.height - 1) * self.width]);
        Some(shifted)
    }
}

impl fmt::Display for ActiveMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.bits.chunks_exact(self.width).enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            for b in row {
                write!(f, "{}", if *b { '#' } else { '.' })?;
            }
        }
        Ok(())
    }
}
