//! Board, cell and piece model shared by the simulator and the planner.

pub use self::{active_mask::*, board::*, piece::*};

pub(crate) mod active_mask;
pub(crate) mod board;
pub(crate) mod piece;

/// Number of upcoming pieces visible in an observation.
pub const QUEUE_LEN: usize = 4;

/// Upcoming pieces in play order.
pub type Queue = [PieceKind; QUEUE_LEN];
