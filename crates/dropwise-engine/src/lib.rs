//! Board model, piece transforms and the game environment for the dropwise planner.
//!
//! - [`core`] - cells, boards, active-piece masks and piece templates
//! - [`transform`] - pure board transitions used to simulate placements
//! - [`env`] - the environment interface, its action vocabulary and a reference simulator

pub use self::{core::*, env::*, transform::*};

pub mod core;
pub mod env;
pub mod transform;

/// Reason a transform could not produce a board.
///
/// Every variant is a recoverable, per-branch failure: searches skip the branch and
/// continue.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::IsVariant,
)]
pub enum TransformError {
    #[display("active piece blocked by a locked cell or the board edge")]
    Blocked,
    #[display("{active_cells} active cells do not form a square spin box")]
    NonSquareSpinBox { active_cells: usize },
    #[display("board has no active piece")]
    NoActivePiece,
    #[display("{mask_height}x{mask_width} mask does not fit a {board_height}x{board_width} board")]
    MaskSizeMismatch {
        mask_height: usize,
        mask_width: usize,
        board_height: usize,
        board_width: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid board size: {height}x{width}")]
pub struct InvalidBoardSize {
    pub height: usize,
    pub width: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid piece id: {id}")]
pub struct InvalidPieceId {
    pub id: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid action id: {id}")]
pub struct InvalidActionId {
    pub id: u8,
}
