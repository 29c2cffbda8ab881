use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// A single cell of the board.
///
/// The text form used by observations and tests is `.` for [`Cell::Empty`],
/// `x` for [`Cell::Locked`] and `o` for [`Cell::Active`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, derive_more::IsVariant)]
pub enum Cell {
    /// Free space.
    #[default]
    Empty,
    /// Permanently settled block.
    Locked,
    /// Cell occupied by the falling piece.
    Active,
}

impl Cell {
    /// Returns `true` for locked and active cells.
    #[must_use]
    pub const fn is_filled(self) -> bool {
        !matches!(self, Cell::Empty)
    }

    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Locked => 'x',
            Cell::Active => 'o',
        }
    }

    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            '.' => Some(Cell::Empty),
            'x' => Some(Cell::Locked),
            'o' => Some(Cell::Active),
            _ => None,
        }
    }
}

/// Error returned when parsing a [`Board`] from its text form.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParseBoardError {
    #[display("board has no rows")]
    NoRows,
    #[display("row {row} is empty")]
    EmptyRow { row: usize },
    #[display("invalid cell {found:?} at row {row}, column {col}")]
    InvalidCell { row: usize, col: usize, found: char },
    #[display("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// Fixed-size grid of [`Cell`]s, addressed as `(row, col)` with row 0 at the top.
///
/// Boards are treated as values: every transform in [`crate::transform`] takes a
/// `&Board` and returns a fresh one, so search branches never share state.
///
/// # Example
///
/// ```
/// use dropwise_engine::{Board, Cell};
///
/// let board: Board = "
///     .oo.
///     .oo.
///     ....
///     x..x
/// "
/// .parse()
/// .unwrap();
///
/// assert_eq!(board.height(), 4);
/// assert_eq!(board.width(), 4);
/// assert_eq!(board.get(3, 0), Cell::Locked);
/// assert_eq!(board.active_positions().count(), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    height: usize,
    width: usize,
    cells: Vec<Cell>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new(Self::DEFAULT_HEIGHT, Self::DEFAULT_WIDTH)
    }
}

impl Board {
    pub const DEFAULT_HEIGHT: usize = 20;
    pub const DEFAULT_WIDTH: usize = 10;

    /// Creates an empty board.
    #[must_use]
    pub fn new(height: usize, width: usize) -> Self {
        assert!(height > 0 && width > 0, "board must not be empty");
        Self {
            height,
            width,
            cells: vec![Cell::Empty; height * width],
        }
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
    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[self.index(row, col)]
    }

    pub fn set(&mut self, row: usize, col: usize, cell: Cell) {
        let index = self.index(row, col);
        self.cells[index] = cell;
    }

    /// Returns the position displaced by `(d_row, d_col)`, or `None` if it leaves the board.
    #[must_use]
    pub fn offset(
        &self,
        row: usize,
        col: usize,
        d_row: isize,
        d_col: isize,
    ) -> Option<(usize, usize)> {
        let row = row.checked_add_signed(d_row).filter(|r| *r < self.height)?;
        let col = col.checked_add_signed(d_col).filter(|c| *c < self.width)?;
        Some((row, col))
    }

    #[must_use]
    pub fn row(&self, row: usize) -> &[Cell] {
        &self.cells[row * self.width..][..self.width]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        self.cells.chunks_exact(self.width)
    }

    /// Iterates over active cell positions in row-major order.
    pub fn active_positions(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_active())
            .map(|(i, _)| (i / self.width, i % self.width))
    }

    #[must_use]
    pub fn has_active(&self) -> bool {
        self.cells.iter().any(|cell| cell.is_active())
    }

    /// Turns every active cell back into empty space.
    pub fn clear_active(&mut self) {
        for cell in &mut self.cells {
            if cell.is_active() {
                *cell = Cell::Empty;
            }
        }
    }

    /// Checks if every cell of the row is locked or active.
    #[must_use]
    pub fn is_row_filled(&self, row: usize) -> bool {
        self.row(row).iter().all(|cell| cell.is_filled())
    }

    /// Removes rows filled with locked cells and returns the number of rows removed.
    ///
    /// Rows above a removed row shift down; new empty rows appear at the top.
    pub fn clear_lines(&mut self) -> usize {
        let mut count = 0;
        for row in (0..self.height).rev() {
            if self.row(row).iter().all(|cell| cell.is_locked()) {
                count += 1;
                continue;
            }
            if count > 0 {
                let src = row * self.width;
                self.cells
                    .copy_within(src..src + self.width, (row + count) * self.width);
            }
        }
        self.cells[..count * self.width].fill(Cell::Empty);
        count
    }

    fn index(&self, row: usize, col: usize) -> usize {
        assert!(
            row < self.height && col < self.width,
            "cell ({row}, {col}) outside {}x{} board",
            self.height,
            self.width,
        );
        row * self.width + col
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.rows().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            for cell in row {
                write!(f, "{}", cell.as_char())?;
            }
        }
        Ok(())
    }
}

impl Board {
    /// Builds a board from exact row strings, one cell character per column.
    ///
    /// Unlike [`FromStr`], nothing is trimmed or skipped: whitespace is an invalid
    /// cell and an empty row is an error.
    pub fn from_rows<I, S>(rows: I) -> Result<Self, ParseBoardError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut height = 0;
        let mut width = 0;
        let mut cells = vec![];
        for (row, line) in rows.into_iter().enumerate() {
            let line = line.as_ref();
            let found = line.chars().count();
            if found == 0 {
                return Err(ParseBoardError::EmptyRow { row });
            }
            if row == 0 {
                width = found;
            } else if found != width {
                return Err(ParseBoardError::RaggedRow {
                    row,
                    expected: width,
                    found,
                });
            }
            for (col, c) in line.chars().enumerate() {
                let cell = Cell::from_char(c).ok_or(ParseBoardError::InvalidCell {
                    row,
                    col,
                    found: c,
                })?;
                cells.push(cell);
            }
            height += 1;
        }
        if height == 0 {
            return Err(ParseBoardError::NoRows);
        }

        Ok(Self {
            height,
            width,
            cells,
        })
    }
}

/// Parses one row per non-blank line; surrounding whitespace is ignored.
impl FromStr for Board {
    type Err = ParseBoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_rows(s.lines().map(str::trim).filter(|line| !line.is_empty()))
    }
}

impl Serialize for Board {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // Format: ["..o.", "xx.x", ...] (one string per row)
        let rows: Vec<String> = self
            .rows()
            .map(|row| row.iter().map(|cell| cell.as_char()).collect())
            .collect();
        rows.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Board {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let rows = Vec::<String>::deserialize(deserializer)?;
        Self::from_rows(rows).map_err(serde::de::Error::custom)
    }
}
