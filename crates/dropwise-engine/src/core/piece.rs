use serde::{Deserialize, Serialize};

use crate::InvalidPieceId;

/// Enum representing the type of piece.
///
/// Discriminants are the piece ids used on the wire (observation queues and holder),
/// where 0 is an empty cell and 1 the board border.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum PieceKind {
    /// I-piece.
    I = 2,
    /// O-piece.
    O = 3,
    /// T-piece.
    T = 4,
    /// S-piece.
    S = 5,
    /// Z-piece.
    Z = 6,
    /// J-piece.
    J = 7,
    /// L-piece.
    L = 8,
}

impl TryFrom<u8> for PieceKind {
    type Error = InvalidPieceId;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        Self::from_id(id).ok_or(InvalidPieceId { id })
    }
}

impl From<PieceKind> for u8 {
    fn from(kind: PieceKind) -> Self {
        kind.id()
    }
}

impl PieceKind {
    /// Number of piece types (7).
    pub const LEN: usize = 7;

    pub const ALL: [Self; Self::LEN] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    #[must_use]
    pub const fn id(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub const fn from_id(id: u8) -> Option<Self> {
        match id {
            2 => Some(PieceKind::I),
            3 => Some(PieceKind::O),
            4 => Some(PieceKind::T),
            5 => Some(PieceKind::S),
            6 => Some(PieceKind::Z),
            7 => Some(PieceKind::J),
            8 => Some(PieceKind::L),
            _ => None,
        }
    }

    const fn index(self) -> usize {
        (self as u8 - 2) as usize
    }

    /// Side length of the square box the piece rotates in (4 for I, 2 for O, 3 otherwise).
    #[must_use]
    pub const fn size(self) -> usize {
        match self {
            PieceKind::I => 4,
            PieceKind::O => 2,
            _ => 3,
        }
    }

    /// Leftmost column of the piece's box when it spawns centered on a board of `board_width`.
    #[must_use]
    pub const fn spawn_column(self, board_width: usize) -> usize {
        (board_width / 2).saturating_sub(self.size() / 2)
    }

    /// Returns an iterator of `(row, col)` offsets occupied by the piece inside its box.
    pub fn occupied_offsets(self, rotation: PieceRotation) -> impl Iterator<Item = (usize, usize)> {
        let shape = &PIECE_SHAPES[self.index()][rotation.as_usize()];
        shape.iter().enumerate().flat_map(|(dy, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, filled)| **filled)
                .map(move |(dx, _)| (dy, dx))
        })
    }
}

/// Rotation state of a piece.
///
/// - `0`: spawn orientation
/// - `1`: 90° clockwise
/// - `2`: 180°
/// - `3`: 270° clockwise (90° counterclockwise)
///
/// Rotation operations wrap around modulo 4.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceRotation(u8);

impl PieceRotation {
    pub const SPAWN: Self = Self(0);

    #[must_use]
    pub fn rotated_right(self) -> Self {
        PieceRotation((self.0 + 1) % 4)
    }

    #[must_use]
    pub fn rotated_left(self) -> Self {
        PieceRotation((self.0 + 3) % 4)
    }

    const fn as_usize(self) -> usize {
        self.0 as usize
    }
}

/// Piece shape template as a 4×4 occupancy grid.
type PieceShape = [[bool; 4]; 4];

/// Generates all 4 rotation states of a piece shape by rotating 90° clockwise.
///
/// # Arguments
///
/// * `size` - Effective size of the piece (3 for most pieces, 4 for I, 2 for O)
/// * `shape` - Initial piece shape at 0° rotation
const fn shape_rotations(size: usize, shape: &PieceShape) -> [PieceShape; 4] {
    let mut rotates = [*shape; 4];
    let mut i = 1;
    while i < 4 {
        let mut new_shape = [[false; 4]; 4];
        let mut y = 0;
        while y < size {
            let mut x = 0;
            while x < size {
                new_shape[y][x] = rotates[i - 1][size - 1 - x][y];
                x += 1;
            }
            y += 1;
        }
        rotates[i] = new_shape;
        i += 1;
    }
    rotates
}

static PIECE_SHAPES: [[PieceShape; 4]; PieceKind::LEN] = {
    const C: bool = true;
    const E: bool = false;
    const EEEE: [bool; 4] = [E; 4];
    [
        // I-piece
        shape_rotations(4, &[EEEE, [C, C, C, C], EEEE, EEEE]),
        // O-piece
        shape_rotations(2, &[[C, C, E, E], [C, C, E, E], EEEE, EEEE]),
        // T-piece
        shape_rotations(3, &[[E, C, E, E], [C, C, C, E], EEEE, EEEE]),
        // S-piece
        shape_rotations(3, &[[E, C, C, E], [C, C, E, E], EEEE, EEEE]),
        // Z-piece
        shape_rotations(3, &[[C, C, E, E], [E, C, C, E], EEEE, EEEE]),
        // J-piece
        shape_rotations(3, &[[C, E, E, E], [C, C, C, E], EEEE, EEEE]),
        // L-piece
        shape_rotations(3, &[[E, E, C, E], [C, C, C, E], EEEE, EEEE]),
    ]
};
