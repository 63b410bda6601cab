//! Automated agent - a bot that places one piece per interval
//!
//! The placement search is depth only: every rotation and every column in an oversized
//! scan range is dropped from the current row, and the deepest resting row wins. It does
//! not look at clears or holes.

use royale_core::SimpleRng;

use crate::agent::{Agent, Contender, DropOutcome, PlayerAgent};
use crate::types::{Difficulty, PlayerAction, Rotation, BOARD_WIDTH};

/// Leftmost column tried; shape offsets can reach 3 cells into the box
const SCAN_MIN_COLUMN: i8 = -3;

/// One past the rightmost column tried
const SCAN_MAX_COLUMN: i8 = BOARD_WIDTH as i8 + 1;

/// Chosen placement for the active piece
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub column: i8,
    pub rotation: Rotation,
    pub resting_row: i8,
}

#[derive(Debug, Clone)]
pub struct AutomatedAgent {
    player: PlayerAgent,
    difficulty: Difficulty,
    timer_ms: u32,
}

impl AutomatedAgent {
    pub fn new(player: PlayerAgent, difficulty: Difficulty) -> Self {
        Self {
            player,
            difficulty,
            timer_ms: 0,
        }
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Deepest reachable placement, first found wins ties
    pub fn find_placement(&self) -> Option<Placement> {
        let board = self.player.board();
        let piece = board.active()?;
        let mut best: Option<Placement> = None;

        for rotation in Rotation::ALL {
            for column in SCAN_MIN_COLUMN..SCAN_MAX_COLUMN {
                if board.check_collision_for(piece.kind, column, piece.row, rotation) {
                    continue;
                }
                let resting_row = board.resting_row(piece.kind, column, piece.row, rotation);
                if best.map_or(true, |b| resting_row > b.resting_row) {
                    best = Some(Placement {
                        column,
                        rotation,
                        resting_row,
                    });
                }
            }
        }
        best
    }

    /// Apply the best placement to the active piece and ask for a hard drop
    fn make_move(&mut self) -> Option<PlayerAction> {
        let placement = self.find_placement()?;
        self.player
            .board_mut()
            .set_active_placement(placement.column, placement.rotation);
        Some(PlayerAction::HardDrop)
    }
}

impl Agent for AutomatedAgent {
    fn player(&self) -> &PlayerAgent {
        &self.player
    }

    fn player_mut(&mut self) -> &mut PlayerAgent {
        &mut self.player
    }

    fn handle_input(&mut self, action: PlayerAction) -> Option<DropOutcome> {
        self.player.handle_input(action)
    }

    fn update_target(&mut self, contenders: &[Contender], rng: &mut SimpleRng) {
        self.player.update_target(contenders, rng);
    }

    fn per_tick_update(&mut self, elapsed_ms: u32) -> Option<PlayerAction> {
        if self.player.is_eliminated() {
            return None;
        }
        self.timer_ms = self.timer_ms.saturating_add(elapsed_ms);
        if self.timer_ms < self.difficulty.move_interval_ms() {
            return None;
        }
        self.timer_ms = 0;
        self.make_move()
    }

    fn reset(&mut self, seed: u32) {
        self.player.reset(seed);
        self.timer_ms = 0;
    }

    fn is_automated(&self) -> bool {
        true
    }
}
