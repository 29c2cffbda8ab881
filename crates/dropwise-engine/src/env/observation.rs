use serde::{Deserialize, Serialize};

use crate::core::{ActiveMask, Board, PieceKind, Queue};

/// Everything the planner sees of the game at one step.
///
/// Serialized as `{"board": [...], "queue": [...], "holder": ...}` with piece ids on
/// the wire; the mask is not serialized and is rebuilt from the board's active cells.
///
/// # Example
///
/// ```
/// use dropwise_engine::{Observation, PieceKind};
///
/// let json = r#"{"board": ["..o.", ".ooo", "...."], "queue": [2, 3, 4, 5], "holder": null}"#;
/// let observation: Observation = serde_json::from_str(json).unwrap();
///
/// assert_eq!(observation.mask.count(), 4);
/// assert_eq!(observation.queue[0], PieceKind::I);
/// assert_eq!(observation.holder, None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ObservationRecord", into = "ObservationRecord")]
pub struct Observation {
    pub board: Board,
    pub mask: ActiveMask,
    pub queue: Queue,
    pub holder: Option<PieceKind>,
}

impl Observation {
    /// Builds an observation whose mask marks the board's active cells.
    #[must_use]
    pub fn new(board: Board, queue: Queue, holder: Option<PieceKind>) -> Self {
        let mask = ActiveMask::from_board(&board);
        Self {
            board,
            mask,
            queue,
            holder,
        }
    }
}

#[derive(Serialize, Deserialize)]
struct ObservationRecord {
    board: Board,
    queue: Queue,
    #[serde(default)]
    holder: Option<PieceKind>,
}

impl From<ObservationRecord> for Observation {
    fn from(record: ObservationRecord) -> Self {
        Self::new(record.board, record.queue, record.holder)
    }
}

impl From<Observation> for ObservationRecord {
    fn from(observation: Observation) -> Self {
        Self {
            board: observation.board,
            queue: observation.queue,
            holder: observation.holder,
        }
    }
}
