//! Pure board transitions over the active piece.
//!
//! Every function here takes its inputs by reference and returns a new [`Board`]
//! (and [`ActiveMask`] where relevant) or a [`TransformError`]. Locked cells are
//! obstacles and never move; only active cells are displaced.
//!
//! These primitives approximate the environment closely enough to rank placements,
//! but they are not the environment's movement rules:
//!
//! - [`shift_left`] and [`shift_right`] move diagonally (one column sideways and one
//!   row down), accounting for the gravity step that follows every horizontal move.
//! - The rotations use a simplified spin-box rule, see [`rotate_clockwise`].
//!
//! # Example
//!
//! ```
//! use dropwise_engine::{Board, transform};
//!
//! let board: Board = "
//!     .oo.
//!     .oo.
//!     ....
//!     ....
//! "
//! .parse()
//! .unwrap();
//!
//! let (dropped, distance) = transform::shift_max_down(&board);
//! assert_eq!(distance, 2);
//! assert_eq!(dropped.to_string(), "....\n....\n.oo.\n.oo.");
//! ```

use crate::{
    TransformError,
    core::{ActiveMask, Board, Cell, PieceKind, PieceRotation, Queue},
};

/// Moves the active piece one row down.
pub fn shift_down(board: &Board) -> Result<Board, TransformError> {
    translate(board, 1, 0)
}

/// Moves the active piece one column left and one row down.
pub fn shift_left(board: &Board) -> Result<Board, TransformError> {
    translate(board, 1, -1)
}

/// Moves the active piece one column right and one row down.
pub fn shift_right(board: &Board) -> Result<Board, TransformError> {
    translate(board, 1, 1)
}

/// Drops the active piece as a rigid body until it rests on a locked cell or the bottom.
///
/// Returns the dropped board and the number of rows fallen. A board without an active
/// piece is returned unchanged with distance 0.
#[must_use]
pub fn shift_max_down(board: &Board) -> (Board, usize) {
    let distance = board
        .active_positions()
        .map(|(row, col)| {
            (row + 1..board.height())
                .take_while(|r| !board.get(*r, col).is_locked())
                .count()
        })
        .min()
        .unwrap_or(0);
    if distance == 0 {
        return (board.clone(), 0);
    }

    let targets: Vec<_> = board
        .active_positions()
        .map(|(row, col)| (row + distance, col))
        .collect();
    (fill_active(board, targets), distance)
}

/// Rotates the active piece 90° clockwise within its spin box.
///
/// The spin box is built from the mask:
///
/// 1. The number of active cells must be a perfect square `N×N`, otherwise the rotation
///    fails with [`TransformError::NonSquareSpinBox`].
/// 2. The board values at the active positions, in row-major order, form an `N×N` block.
/// 3. The block is rotated and written back one row below the top-left corner of the
///    active positions (the rotation includes the gravity step).
/// 4. A rotated active cell falling outside the board or on a locked cell fails the
///    rotation with [`TransformError::Blocked`].
///
/// A mask whose dimensions differ from the board's fails with
/// [`TransformError::MaskSizeMismatch`].
///
/// The returned mask is the input mask moved one row down; it does not follow the
/// rotated content.
pub fn rotate_clockwise(
    board: &Board,
    mask: &ActiveMask,
) -> Result<(Board, ActiveMask), TransformError> {
    rotate(board, mask, RotationDirection::Clockwise)
}

/// Rotates the active piece 90° counter-clockwise. See [`rotate_clockwise`].
pub fn rotate_counter_clockwise(
    board: &Board,
    mask: &ActiveMask,
) -> Result<(Board, ActiveMask), TransformError> {
    rotate(board, mask, RotationDirection::CounterClockwise)
}

/// Replaces the active piece with the piece obtained by a hold-swap.
///
/// The incoming piece is the held one, or the head of the queue when nothing is held.
/// It is stamped in spawn orientation at the top row, centered horizontally. The spawn
/// area is assumed clear: no collision check is made and the stamp overwrites whatever
/// it covers.
#[must_use]
pub fn apply_hold(board: &Board, holder: Option<PieceKind>, queue: &Queue) -> Board {
    let kind = holder.unwrap_or(queue[0]);
    let col0 = kind.spawn_column(board.width());

    let mut held = board.clone();
    held.clear_active();
    for (dy, dx) in kind.occupied_offsets(PieceRotation::SPAWN) {
        let (row, col) = (dy, col0 + dx);
        if row < held.height() && col < held.width() {
            held.set(row, col, Cell::Active);
        }
    }
    held
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RotationDirection {
    Clockwise,
    CounterClockwise,
}

fn translate(board: &Board, d_row: isize, d_col: isize) -> Result<Board, TransformError> {
    let mut targets = Vec::with_capacity(4);
    for (row, col) in board.active_positions() {
        let (row, col) = board
            .offset(row, col, d_row, d_col)
            .ok_or(TransformError::Blocked)?;
        if board.get(row, col).is_locked() {
            return Err(TransformError::Blocked);
        }
        targets.push((row, col));
    }
    if targets.is_empty() {
        return Err(TransformError::NoActivePiece);
    }
    Ok(fill_active(board, targets))
}

/// Clears all active cells, then marks `targets` active.
fn fill_active(board: &Board, targets: impl IntoIterator<Item = (usize, usize)>) -> Board {
    let mut moved = board.clone();
    moved.clear_active();
    for (row, col) in targets {
        moved.set(row, col, Cell::Active);
    }
    moved
}

fn spin_box_size(active_cells: usize) -> Result<usize, TransformError> {
    if active_cells == 0 {
        return Err(TransformError::NoActivePiece);
    }
    let size = active_cells.isqrt();
    if size * size != active_cells {
        return Err(TransformError::NonSquareSpinBox { active_cells });
    }
    Ok(size)
}

fn rotate(
    board: &Board,
    mask: &ActiveMask,
    direction: RotationDirection,
) -> Result<(Board, ActiveMask), TransformError> {
    if (mask.height(), mask.width()) != (board.height(), board.width()) {
        return Err(TransformError::MaskSizeMismatch {
            mask_height: mask.height(),
            mask_width: mask.width(),
            board_height: board.height(),
            board_width: board.width(),
        });
    }
    let positions: Vec<_> = mask.positions().collect();
    let size = spin_box_size(positions.len())?;
    let values: Vec<Cell> = positions
        .iter()
        .map(|&(row, col)| board.get(row, col))
        .collect();

    // Positions are non-empty once the spin box size is known.
    let anchor_row = positions.iter().map(|p| p.0).min().unwrap_or(0);
    let anchor_col = positions.iter().map(|p| p.1).min().unwrap_or(0);

    let mut targets = Vec::with_capacity(positions.len());
    for i in 0..size {
        for j in 0..size {
            let value = match direction {
                RotationDirection::Clockwise => values[(size - 1 - j) * size + i],
                RotationDirection::CounterClockwise => values[j * size + (size - 1 - i)],
            };
            if !value.is_active() {
                continue;
            }
            let (row, col) = (anchor_row + 1 + i, anchor_col + j);
            if row >= board.height() || col >= board.width() || board.get(row, col).is_locked()
            {
                return Err(TransformError::Blocked);
            }
            targets.push((row, col));
        }
    }
    if targets.is_empty() {
        return Err(TransformError::NoActivePiece);
    }

    let shifted_mask = mask.shifted_down().ok_or(TransformError::Blocked)?;
    Ok((fill_active(board, targets), shifted_mask))
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::core::QUEUE_LEN;

    fn board(art: &str) -> Board {
        art.parse().unwrap()
    }

    #[test]
    fn test_shift_down() {
        let b = board(
            "
            .oo.
            ..o.
            ....
            x..x
            ",
        );
        let shifted = shift_down(&b).unwrap();
        assert_eq!(shifted.to_string(), "....\n.oo.\n..o.\nx..x");

        let resting = board(
            "
            ....
            .oo.
            .xo.
            ....
            ",
        );
        assert_eq!(shift_down(&resting), Err(TransformError::Blocked));
    }

    #[test]
    fn test_shift_down_does_not_collide_with_itself() {
        // Vertical piece: every cell but the lowest moves onto a cell the piece occupies.
        let b = board(
            "
            .o..
            .o..
            .o..
            ....
            ",
        );
        let shifted = shift_down(&b).unwrap();
        assert_eq!(shifted.to_string(), "....\n.o..\n.o..\n.o..");
    }

    #[test]
    fn test_shift_down_bottom_edge() {
        let b = board(
            "
            ....
            .oo.
            ",
        );
        assert_eq!(shift_down(&b), Err(TransformError::Blocked));
    }

    #[test]
    fn test_shift_without_active_piece() {
        let b = board("....\nx..x");
        assert_eq!(shift_down(&b), Err(TransformError::NoActivePiece));
        assert_eq!(shift_left(&b), Err(TransformError::NoActivePiece));
        assert_eq!(shift_max_down(&b), (b.clone(), 0));
    }

    #[test]
    fn test_shift_left_and_right_move_diagonally() {
        let b = board(
            "
            .oo.
            ....
            ....
            ",
        );
        assert_eq!(shift_left(&b).unwrap().to_string(), "....\noo..\n....");
        assert_eq!(shift_right(&b).unwrap().to_string(), "....\n..oo\n....");
    }

    #[test]
    fn test_shift_left_past_wall_fails() {
        let mut b = board(
            "
            ..o.....
            .ooo....
            ........
            ........
            ........
            ",
        );
        // One legal step to the wall, then nothing.
        b = shift_left(&b).unwrap();
        assert_eq!(shift_left(&b), Err(TransformError::Blocked));

        let mut right = board(
            "
            ..o.....
            .ooo....
            ........
            ........
            ........
            ........
            ........
            ",
        );
        for _ in 0..4 {
            right = shift_right(&right).unwrap();
        }
        assert_eq!(right.get(5, 7), Cell::Active);
        assert_eq!(shift_right(&right), Err(TransformError::Blocked));
    }

    #[test]
    fn test_shift_left_blocked_by_locked_cell() {
        let b = board(
            "
            ..oo
            ..oo
            .x..
            ",
        );
        assert_eq!(shift_left(&b), Err(TransformError::Blocked));
        assert!(shift_right(&b).is_err());
    }

    #[test]
    fn test_shift_max_down_square_block() {
        let b = board(
            "
            .oo.
            .oo.
            ....
            ....
            ",
        );
        let (dropped, distance) = shift_max_down(&b);
        assert_eq!(distance, 2);
        assert_eq!(dropped.to_string(), "....\n....\n.oo.\n.oo.");
        assert!(!b.get(2, 1).is_active(), "input must not be mutated");
    }

    #[test]
    fn test_shift_max_down_rests_on_highest_obstacle() {
        let b = board(
            "
            ooo.
            ....
            ....
            ..x.
            x...
            ",
        );
        let (dropped, distance) = shift_max_down(&b);
        assert_eq!(distance, 2);
        assert_eq!(dropped.to_string(), "....\n....\nooo.\n..x.\nx...");
    }

    #[test]
    fn test_rotate_square_block() {
        let b = board(
            "
            .oo.
            .oo.
            ....
            ....
            ",
        );
        let mask = ActiveMask::from_board(&b);
        let (rotated, rotated_mask) = rotate_clockwise(&b, &mask).unwrap();

        assert_eq!(rotated.to_string(), "....\n.oo.\n.oo.\n....");
        assert_eq!(rotated_mask.to_string(), "....\n.##.\n.##.\n....");

        let (ccw, ccw_mask) = rotate_counter_clockwise(&b, &mask).unwrap();
        assert_eq!(ccw, rotated);
        assert_eq!(ccw_mask, rotated_mask);
    }

    #[test]
    fn test_rotate_spawned_piece_embeds_below_anchor() {
        let b = board(
            "
            ..o..
            .ooo.
            .....
            .....
            ",
        );
        let mask = ActiveMask::from_board(&b);
        let (rotated, rotated_mask) = rotate_clockwise(&b, &mask).unwrap();

        // Spin box anchored at (0, 1), written back from row 1.
        assert_eq!(rotated.to_string(), ".....\n.oo..\n.oo..\n.....");
        // The mask only moves down.
        assert_eq!(rotated_mask.to_string(), ".....\n..#..\n.###.\n.....");
    }

    #[test]
    fn test_rotate_uses_board_values_at_mask_positions() {
        // The mask no longer matches the board, as after a previous rotation.
        let b = board(
            "
            .....
            .oo..
            .oo..
            .....
            ",
        );
        let mask = ActiveMask::from_board(&board(
            "
            .....
            ..o..
            .ooo.
            .....
            ",
        ));
        // Values in row-major order: (1,2)=o (2,1)=o (2,2)=o (2,3)=. => [[o, o], [o, .]]
        let (cw, _) = rotate_clockwise(&b, &mask).unwrap();
        // Clockwise: [[o, o], [., o]]
        assert_eq!(cw.to_string(), ".....\n.....\n.oo..\n..o..");

        let (ccw, _) = rotate_counter_clockwise(&b, &mask).unwrap();
        // Counter-clockwise: [[o, .], [o, o]]
        assert_eq!(ccw.to_string(), ".....\n.....\n.o...\n.oo..");
    }

    #[test]
    fn test_rotate_non_square_fails() {
        let b = board(
            "
            ooooo
            .....
            .....
            ",
        );
        let mask = ActiveMask::from_board(&b);
        assert_eq!(mask.count(), 5);
        assert_eq!(
            rotate_clockwise(&b, &mask),
            Err(TransformError::NonSquareSpinBox { active_cells: 5 })
        );
        assert_eq!(
            rotate_counter_clockwise(&b, &mask),
            Err(TransformError::NonSquareSpinBox { active_cells: 5 })
        );
    }

    #[test]
    fn test_rotate_collision_fails_atomically() {
        let b = board(
            "
            .oo.
            .oo.
            ..x.
            ",
        );
        let mask = ActiveMask::from_board(&b);
        assert_eq!(rotate_clockwise(&b, &mask), Err(TransformError::Blocked));

        let bottom = board(
            "
            ....
            .oo.
            .oo.
            ",
        );
        let mask = ActiveMask::from_board(&bottom);
        assert_eq!(rotate_clockwise(&bottom, &mask), Err(TransformError::Blocked));
    }

    #[test]
    fn test_rotate_without_active_piece() {
        let b = board("....\n....");
        let mask = ActiveMask::from_board(&b);
        assert_eq!(
            rotate_clockwise(&b, &mask),
            Err(TransformError::NoActivePiece)
        );
    }

    #[test]
    fn test_rotate_with_mismatched_mask_fails() {
        let b = board(
            "
            oo..
            oo..
            ....
            ",
        );
        let mut mask = ActiveMask::new(6, 6);
        for (row, col) in [(4, 4), (4, 5), (5, 4), (5, 5)] {
            mask.set(row, col, true);
        }
        let expected = Err(TransformError::MaskSizeMismatch {
            mask_height: 6,
            mask_width: 6,
            board_height: 3,
            board_width: 4,
        });
        assert_eq!(rotate_clockwise(&b, &mask), expected);
        assert_eq!(rotate_counter_clockwise(&b, &mask), expected);

        let narrow = ActiveMask::from_board(&board("oo.
oo.
..."));
        assert!(
            rotate_clockwise(&b, &narrow)
                .unwrap_err()
                .is_mask_size_mismatch()
        );
    }

    #[test]
    fn test_apply_hold_uses_queue_head_when_holder_empty() {
        let b = board(
            "
            ..........
            ..........
            ....oo....
            ....oo....
            x.........
            ",
        );
        let queue: Queue = [PieceKind::T, PieceKind::I, PieceKind::O, PieceKind::S];
        let held = apply_hold(&b, None, &queue);
        assert_eq!(
            held.to_string(),
            [
                ".....o....",
                "....ooo...",
                "..........",
                "..........",
                "x.........",
            ]
            .join("\n")
        );
    }

    #[test]
    fn test_apply_hold_prefers_held_piece() {
        let b = board(
            "
            ....o.....
            ...ooo....
            ..........
            ",
        );
        let queue = [PieceKind::O; QUEUE_LEN];
        let held = apply_hold(&b, Some(PieceKind::I), &queue);
        assert_eq!(
            held.to_string(),
            ["..........", "...oooo...", ".........."].join("\n")
        );
    }

    #[test]
    fn test_apply_hold_overwrites_spawn_area() {
        let b = board(
            "
            ....xx....
            ....xx....
            ..o.......
            ",
        );
        let queue = [PieceKind::O; QUEUE_LEN];
        let held = apply_hold(&b, None, &queue);
        assert_eq!(
            held.to_string(),
            ["....oo....", "....oo....", ".........."].join("\n")
        );
    }

    fn arb_board() -> impl Strategy<Value = Board> {
        // A 2x2 piece at the top, random locked rubble below it.
        (2usize..10, 3usize..8).prop_flat_map(|(rubble_height, width)| {
            (
                0..width - 1,
                proptest::collection::vec(prop::bool::weighted(0.3), rubble_height * width),
            )
                .prop_map(move |(col, rubble)| {
                    let mut board = Board::new(rubble_height + 2, width);
                    for (i, locked) in rubble.into_iter().enumerate() {
                        if locked {
                            board.set(2 + i / width, i % width, Cell::Locked);
                        }
                    }
                    for (row, col) in [(0, col), (0, col + 1), (1, col), (1, col + 1)] {
                        board.set(row, col, Cell::Active);
                    }
                    board
                })
        })
    }

    proptest! {
        #[test]
        fn test_shift_max_down_matches_repeated_shift_down(board in arb_board()) {
            let (dropped, distance) = shift_max_down(&board);

            let mut stepped = board.clone();
            let mut steps = 0;
            while let Ok(next) = shift_down(&stepped) {
                stepped = next;
                steps += 1;
            }

            prop_assert_eq!(steps, distance);
            prop_assert_eq!(stepped, dropped);
        }

        #[test]
        fn test_sideways_shifts_never_wrap(board in arb_board()) {
            let width = board.width();
            let mut left = board.clone();
            let mut right = board.clone();
            for _ in 0..=width {
                if let Ok(next) = shift_left(&left) {
                    prop_assert_eq!(next.active_positions().count(), 4);
                    left = next;
                }
                if let Ok(next) = shift_right(&right) {
                    prop_assert_eq!(next.active_positions().count(), 4);
                    right = next;
                }
            }
            // Travel is bounded by the width, so the last attempt always fails.
            prop_assert!(shift_left(&left).is_err());
            prop_assert!(shift_right(&right).is_err());
        }
    }
}
