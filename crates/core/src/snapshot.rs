//! Snapshot module - read-only board views for observers
//!
//! Plain copies with no references into the live board, so a room can hand them to the
//! transport layer while simulation continues.

use crate::board::ActivePiece;
use crate::types::{Cell, PieceKind, Rotation, BOARD_HEIGHT, BOARD_WIDTH};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActiveSnapshot {
    pub kind: PieceKind,
    pub column: i8,
    pub row: i8,
    pub rotation: Rotation,
}

impl From<ActivePiece> for ActiveSnapshot {
    fn from(value: ActivePiece) -> Self {
        Self {
            kind: value.kind,
            column: value.column,
            row: value.row,
            rotation: value.rotation,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardSnapshot {
    pub grid: [[Cell; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize],
    pub active: Option<ActiveSnapshot>,
    pub next: Vec<PieceKind>,
    pub hold: Option<PieceKind>,
    pub game_over: bool,
    /// Total lines waiting in the garbage buffer
    pub pending_garbage: u32,
}

impl BoardSnapshot {
    /// Number of non-empty cells
    pub fn filled_cells(&self) -> usize {
        self.grid.iter().flatten().filter(|&&c| c != 0).count()
    }

    /// Highest row index holding a filled cell, `None` for an empty grid
    pub fn stack_top(&self) -> Option<usize> {
        self.grid.iter().position(|row| row.iter().any(|&c| c != 0))
    }
}

#[cfg(test)]
mod tests {
    use crate::board::Board;
    use crate::types::NEXT_QUEUE_LEN;

    #[test]
    fn snapshot_of_fresh_board() {
        let board = Board::with_seed(8);
        let snap = board.snapshot();
        assert_eq!(snap.filled_cells(), 0);
        assert_eq!(snap.stack_top(), None);
        assert_eq!(snap.next.len(), NEXT_QUEUE_LEN);
        assert!(snap.active.is_some());
        assert_eq!(snap.pending_garbage, 0);
    }

    #[test]
    fn snapshot_tracks_buffer_and_stack() {
        let mut board = Board::with_seed(8);
        board.receive_garbage(3, None);
        board.hard_drop();
        let snap = board.snapshot();
        // Lock drained the three queued lines.
        assert_eq!(snap.pending_garbage, 0);
        assert!(snap.filled_cells() >= 4 + 27);
        assert!(snap.stack_top().is_some());
    }
}
