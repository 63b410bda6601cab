//! Board tests - piece state machine through the public API

use std::collections::HashSet;

use royale_tetris::core::Board;
use royale_tetris::types::{
    ClearKind, PieceKind, PlayerId, BOARD_HEIGHT, BOARD_WIDTH, EMPTY_CELL, GARBAGE_CELL,
    NEXT_QUEUE_LEN,
};

/// Fill `row` everywhere except where the active piece will land after a hard drop
fn fill_under_landing(board: &mut Board, row: i8) {
    let mut landed = *board.active().unwrap();
    landed.row = board.resting_row(landed.kind, landed.column, landed.row, landed.rotation);
    let holes: Vec<(i8, i8)> = landed.cells().to_vec();
    for column in 0..BOARD_WIDTH as i8 {
        if !holes.contains(&(column, row)) {
            board.grid_mut().set(column, row, GARBAGE_CELL);
        }
    }
}

#[test]
fn test_first_seven_pieces_are_one_bag() {
    let board = Board::with_seed(2024);
    let mut kinds: HashSet<PieceKind> = HashSet::new();
    kinds.insert(board.active().unwrap().kind);
    kinds.extend(board.next_queue().iter().copied());
    assert_eq!(board.next_queue().len(), NEXT_QUEUE_LEN);
    assert_eq!(kinds.len(), 7);
}

#[test]
fn test_same_seed_same_sequence() {
    let a = Board::with_seed(77);
    let b = Board::with_seed(77);
    assert_eq!(a.active().unwrap().kind, b.active().unwrap().kind);
    assert_eq!(a.next_queue(), b.next_queue());
}

#[test]
fn test_single_clear_starts_combo() {
    let mut board = Board::with_seed(5);
    fill_under_landing(&mut board, BOARD_HEIGHT as i8 - 1);

    board.hard_drop().unwrap();
    let clear = *board.last_clear().unwrap();
    assert_eq!(clear.lines, 1);
    assert_eq!(clear.kind, ClearKind::Single);
    assert_eq!(clear.combo, 0);
    assert!(!clear.back_to_back);
    assert_eq!(board.combo(), 0);
}

#[test]
fn test_combo_grows_then_resets() {
    let mut board = Board::with_seed(8);
    for expected in 0..3 {
        fill_under_landing(&mut board, BOARD_HEIGHT as i8 - 1);
        board.hard_drop().unwrap();
        assert_eq!(board.combo(), expected);
    }
    board.grid_mut().clear();
    board.hard_drop().unwrap();
    assert_eq!(board.combo(), -1);
    assert!(board.last_clear().is_none());
}

#[test]
fn test_buffered_garbage_lands_on_non_clearing_lock() {
    let mut board = Board::with_seed(3);
    board.receive_garbage(3, Some(PlayerId::from("enemy")));
    assert_eq!(board.garbage().total(), 3);

    board.hard_drop().unwrap();
    assert_eq!(board.garbage().total(), 0);
    for row in BOARD_HEIGHT as usize - 3..BOARD_HEIGHT as usize {
        let cells = board.grid().row(row);
        assert_eq!(cells.iter().filter(|&&c| c == GARBAGE_CELL).count(), 9);
        assert_eq!(cells.iter().filter(|&&c| c == EMPTY_CELL).count(), 1);
    }
}

#[test]
fn test_offset_cancels_oldest_first() {
    let mut board = Board::with_seed(3);
    board.receive_garbage(2, None);
    board.receive_garbage(3, None);
    assert_eq!(board.offset_garbage(4), 0);
    assert_eq!(board.garbage().total(), 1);
    assert_eq!(board.offset_garbage(5), 4);
    assert!(board.garbage().is_empty());
}

#[test]
fn test_overflowing_garbage_tops_out_with_killer() {
    let mut board = Board::with_seed(11);
    board.hard_drop().unwrap();
    board.apply_garbage(BOARD_HEIGHT as u32, Some(PlayerId::from("k")));

    assert!(board.is_game_over());
    assert_eq!(board.killer(), Some(&PlayerId::from("k")));
    // GameOver is terminal.
    assert!(!board.move_piece(1, 0));
    assert!(board.hard_drop().is_none());
}

#[test]
fn test_huge_garbage_fills_the_well_once() {
    let mut board = Board::with_seed(12);
    board.apply_garbage(u32::MAX, None);

    assert!(!board.is_game_over());
    for row in board.grid().rows() {
        assert_eq!(row.iter().filter(|&&c| c == EMPTY_CELL).count(), 1);
    }
    let piece = board.active().unwrap();
    assert!(piece.cells().iter().all(|&(_, r)| r < 0));
}

#[test]
fn test_snapshot_mirrors_board() {
    let mut board = Board::with_seed(21);
    board.hold();
    board.receive_garbage(2, None);
    let snap = board.snapshot();

    assert_eq!(snap.hold, board.hold_piece());
    assert_eq!(snap.pending_garbage, 2);
    assert_eq!(snap.next.len(), NEXT_QUEUE_LEN);
    assert_eq!(snap.active.map(|a| a.kind), board.active().map(|a| a.kind));
    assert!(!snap.game_over);
    assert_eq!(snap.filled_cells(), 0);
}

mod properties {
    use proptest::prelude::*;

    use royale_tetris::core::{kick_offsets, ActivePiece, Board};
    use royale_tetris::types::{BOARD_HEIGHT, BOARD_WIDTH};

    /// Every mino sits between the walls, above the floor and off the stack
    fn piece_fits(board: &Board, piece: &ActivePiece) -> bool {
        piece.cells().iter().all(|&(c, r)| {
            (0..BOARD_WIDTH as i8).contains(&c)
                && r < BOARD_HEIGHT as i8
                && (r < 0 || !board.grid().is_filled(c, r))
        })
    }

    fn step(board: &mut Board, action: u8) -> Result<(), TestCaseError> {
        match action {
            0 => {
                board.move_piece(-1, 0);
            }
            1 => {
                board.move_piece(1, 0);
            }
            2 => {
                board.gravity_step();
            }
            3 | 4 => {
                let Some(before) = board.active().copied() else {
                    return Ok(());
                };
                let clockwise = action == 3;
                let target = if clockwise {
                    before.rotation.rotate_cw()
                } else {
                    before.rotation.rotate_ccw()
                };
                if board.rotate(clockwise) {
                    let after = board.active().copied().unwrap();
                    let kick = (after.column - before.column, after.row - before.row);
                    prop_assert_eq!(after.kind, before.kind);
                    prop_assert_eq!(after.rotation, target);
                    prop_assert!(kick_offsets(before.kind, before.rotation, target).contains(&kick));
                } else {
                    prop_assert_eq!(board.active().copied(), Some(before));
                }
            }
            5 => {
                board.hold();
            }
            6 => {
                board.hard_drop();
            }
            7 => {
                board.tick_lock(250);
            }
            _ => board.apply_garbage(1, None),
        }
        Ok(())
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]

        /// The active piece never overlaps the stack or leaves the well, and a rotation
        /// either lands on one of its kicks or changes nothing.
        #[test]
        fn prop_active_piece_stays_legal(
            seed in any::<u32>(),
            actions in prop::collection::vec(0u8..9, 1..400)
        ) {
            let mut board = Board::with_seed(seed);
            for action in actions {
                step(&mut board, action)?;
                if board.is_game_over() {
                    break;
                }
                let piece = board.active().copied();
                prop_assert!(piece.is_some_and(|p| piece_fits(&board, &p)), "{:?}", piece);
            }
        }
    }
}
