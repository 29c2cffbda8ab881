use rand::{
    Rng,
    distr::{Distribution, StandardUniform},
};
use serde::{Deserialize, Serialize};

use crate::InvalidActionId;

/// Primitive input accepted by an [`Environment`](super::Environment).
///
/// Discriminants are the wire ids of the action vocabulary.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Action {
    #[display("move_left")]
    MoveLeft = 0,
    #[display("move_right")]
    MoveRight = 1,
    #[display("move_down")]
    MoveDown = 2,
    #[display("rotate_clockwise")]
    RotateClockwise = 3,
    #[display("rotate_counter_clockwise")]
    RotateCounterClockwise = 4,
    #[display("hard_drop")]
    HardDrop = 5,
    #[display("swap")]
    Swap = 6,
}

impl Action {
    pub const LEN: usize = 7;

    pub const ALL: [Self; Self::LEN] = [
        Action::MoveLeft,
        Action::MoveRight,
        Action::MoveDown,
        Action::RotateClockwise,
        Action::RotateCounterClockwise,
        Action::HardDrop,
        Action::Swap,
    ];

    #[must_use]
    pub const fn id(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub const fn from_id(id: u8) -> Option<Self> {
        match id {
            0 => Some(Action::MoveLeft),
            1 => Some(Action::MoveRight),
            2 => Some(Action::MoveDown),
            3 => Some(Action::RotateClockwise),
            4 => Some(Action::RotateCounterClockwise),
            5 => Some(Action::HardDrop),
            6 => Some(Action::Swap),
            _ => None,
        }
    }
}

impl TryFrom<u8> for Action {
    type Error = InvalidActionId;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        Self::from_id(id).ok_or(InvalidActionId { id })
    }
}

impl From<Action> for u8 {
    fn from(action: Action) -> Self {
        action.id()
    }
}

impl Distribution<Action> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Action {
        Action::ALL[rng.random_range(0..Action::LEN)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_ids() {
        for (i, action) in Action::ALL.into_iter().enumerate() {
            assert_eq!(usize::from(action.id()), i);
            assert_eq!(Action::try_from(action.id()), Ok(action));
        }
        assert_eq!(Action::try_from(7), Err(InvalidActionId { id: 7 }));
    }

    #[test]
    fn test_action_names() {
        assert_eq!(Action::RotateCounterClockwise.to_string(), "rotate_counter_clockwise");
        for action in Action::ALL {
            let json = serde_json::to_string(&action).unwrap();
            assert_eq!(json, format!("\"{action}\""));
            assert_eq!(serde_json::from_str::<Action>(&json).unwrap(), action);
        }
    }
}
