//! Board module - one player's piece state machine
//!
//! Spawning -> Falling/Locking -> Locked (clear + respawn) -> GameOver.
//!
//! The board never fails with an error: rejected moves and rotations are ordinary `false`
//! outcomes and every operation on a board in GameOver is a no-op. GameOver is terminal
//! until [`Board::reset`].
//!
//! Garbage only enters the grid between pieces: [`Board::receive_garbage`] queues it and the
//! next non-clearing lock drains the queue. [`Board::apply_garbage`] pushes rows in right
//! away and relocates the active piece upward if the rising stack swallowed it.

use std::sync::Arc;

use crate::attack::AttackEconomy;
use crate::garbage::GarbageQueue;
use crate::grid::Grid;
use crate::pieces::{get_shape, try_rotate};
use crate::rng::{SevenBag, SimpleRng};
use crate::snapshot::BoardSnapshot;
use crate::types::{
    ClearKind, PieceKind, PlayerId, Rotation, BOARD_HEIGHT, BOARD_WIDTH, LOCK_DELAY_MS,
    MAX_LOCK_RESETS, NEXT_QUEUE_LEN, SPAWN_COLUMN, SPAWN_ROW,
};

/// Upward relocation bound when garbage pushes into the active piece
const MAX_GARBAGE_LIFT: i8 = 20;

/// Salt separating the garbage-hole stream from the bag stream of the same seed
const HOLE_SEED_SALT: u32 = 0x5bd1_e995;

/// The falling piece
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivePiece {
    pub kind: PieceKind,
    pub column: i8,
    pub row: i8,
    pub rotation: Rotation,
    /// Set by a successful T rotation; not used for scoring
    pub last_move_rotation: bool,
}

impl ActivePiece {
    pub fn spawn(kind: PieceKind) -> Self {
        Self {
            kind,
            column: SPAWN_COLUMN,
            row: SPAWN_ROW,
            rotation: Rotation::North,
            last_move_rotation: false,
        }
    }

    /// Absolute `(column, row)` of the four minos
    pub fn cells(&self) -> [(i8, i8); 4] {
        get_shape(self.kind, self.rotation).map(|(dx, dy)| (self.column + dx, self.row + dy))
    }
}

/// Outcome of a lock that cleared at least one row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearResult {
    pub lines: u32,
    pub kind: ClearKind,
    /// Combo counter after this clear (0 for the first clear of a chain)
    pub combo: i32,
    pub back_to_back: bool,
}

/// Final resting place of a hard-dropped piece
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropInfo {
    pub kind: PieceKind,
    pub column: i8,
    pub row: i8,
    pub rotation: Rotation,
}

/// Lock-delay tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardConfig {
    /// `None` disables timed locking; only hard drops lock then
    pub lock_delay_ms: Option<u32>,
    pub max_lock_resets: u8,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            lock_delay_ms: Some(LOCK_DELAY_MS),
            max_lock_resets: MAX_LOCK_RESETS,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Board {
    grid: Grid,
    active: Option<ActivePiece>,
    bag: SevenBag,
    next: [PieceKind; NEXT_QUEUE_LEN],
    hold: Option<PieceKind>,
    can_hold: bool,
    garbage: GarbageQueue,
    combo: i32,
    back_to_back: bool,
    /// Piece is resting on the stack (lock-delay window open)
    touching: bool,
    lock_resets: u8,
    lock_timer_ms: u32,
    game_over: bool,
    killer: Option<PlayerId>,
    last_clear: Option<ClearResult>,
    hole_rng: SimpleRng,
    economy: Arc<AttackEconomy>,
    config: BoardConfig,
}

impl Board {
    /// Create a board and spawn its first piece
    pub fn new(seed: u32, economy: Arc<AttackEconomy>, config: BoardConfig) -> Self {
        let mut bag = SevenBag::new(seed);
        let next = std::array::from_fn(|_| bag.draw());
        let mut board = Self {
            grid: Grid::new(),
            active: None,
            bag,
            next,
            hold: None,
            can_hold: true,
            garbage: GarbageQueue::new(),
            combo: -1,
            back_to_back: false,
            touching: false,
            lock_resets: 0,
            lock_timer_ms: 0,
            game_over: false,
            killer: None,
            last_clear: None,
            hole_rng: SimpleRng::new(seed ^ HOLE_SEED_SALT),
            economy,
            config,
        };
        board.spawn();
        board
    }

    /// Board with default economy and lock delay
    pub fn with_seed(seed: u32) -> Self {
        Self::new(seed, Arc::new(AttackEconomy::default()), BoardConfig::default())
    }

    /// Return to a fresh state in place, reseeding the randomizer
    pub fn reset(&mut self, seed: u32) {
        self.grid.clear();
        self.active = None;
        self.bag = SevenBag::new(seed);
        self.next = std::array::from_fn(|_| self.bag.draw());
        self.hold = None;
        self.can_hold = true;
        self.garbage.clear();
        self.combo = -1;
        self.back_to_back = false;
        self.touching = false;
        self.lock_resets = 0;
        self.lock_timer_ms = 0;
        self.game_over = false;
        self.killer = None;
        self.last_clear = None;
        self.hole_rng = SimpleRng::new(seed ^ HOLE_SEED_SALT);
        self.spawn();
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Direct grid access for scenario setup
    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub fn active(&self) -> Option<&ActivePiece> {
        self.active.as_ref()
    }

    pub fn next_queue(&self) -> &[PieceKind; NEXT_QUEUE_LEN] {
        &self.next
    }

    pub fn hold_piece(&self) -> Option<PieceKind> {
        self.hold
    }

    pub fn can_hold(&self) -> bool {
        self.can_hold
    }

    pub fn garbage(&self) -> &GarbageQueue {
        &self.garbage
    }

    pub fn combo(&self) -> i32 {
        self.combo
    }

    pub fn back_to_back(&self) -> bool {
        self.back_to_back
    }

    pub fn is_touching(&self) -> bool {
        self.touching
    }

    pub fn lock_resets(&self) -> u8 {
        self.lock_resets
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Attacker whose garbage topped this board out
    pub fn killer(&self) -> Option<&PlayerId> {
        self.killer.as_ref()
    }

    /// Clear result of the most recent lock (`None` if it cleared nothing)
    pub fn last_clear(&self) -> Option<&ClearResult> {
        self.last_clear.as_ref()
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    /// Dequeue the next piece and place it at the spawn point
    ///
    /// Tops out (GameOver) if the spawn position is already occupied.
    pub fn spawn(&mut self) -> bool {
        if self.game_over {
            return false;
        }
        let kind = self.next[0];
        self.next.rotate_left(1);
        self.next[NEXT_QUEUE_LEN - 1] = self.bag.draw();
        self.place_new_piece(kind)
    }

    fn place_new_piece(&mut self, kind: PieceKind) -> bool {
        let piece = ActivePiece::spawn(kind);
        self.can_hold = true;
        self.touching = false;
        self.lock_resets = 0;
        self.lock_timer_ms = 0;

        if self.check_collision_for(kind, piece.column, piece.row, piece.rotation) {
            self.active = None;
            self.game_over = true;
            return false;
        }
        self.active = Some(piece);
        true
    }

    /// Whether the active piece would collide at the given placement
    ///
    /// With no active piece there is nothing to collide.
    pub fn check_collision(&self, column: i8, row: i8, rotation: Rotation) -> bool {
        match self.active {
            Some(piece) => self.check_collision_for(piece.kind, column, row, rotation),
            None => false,
        }
    }

    /// Collision test for an arbitrary kind
    ///
    /// Side walls and the floor always collide. Cells above the top row only collide
    /// with the walls, so pieces may sit partially above the visible area.
    pub fn check_collision_for(
        &self,
        kind: PieceKind,
        column: i8,
        row: i8,
        rotation: Rotation,
    ) -> bool {
        get_shape(kind, rotation).iter().any(|&(dx, dy)| {
            let c = column + dx;
            let r = row + dy;
            if c < 0 || c >= BOARD_WIDTH as i8 || r >= BOARD_HEIGHT as i8 {
                return true;
            }
            r >= 0 && self.grid.is_filled(c, r)
        })
    }

    fn reset_lock_delay(&mut self) {
        if self.touching && self.lock_resets < self.config.max_lock_resets {
            self.lock_resets += 1;
            self.lock_timer_ms = 0;
        }
    }

    /// Translate the active piece; applied only if the target does not collide
    pub fn move_piece(&mut self, d_column: i8, d_row: i8) -> bool {
        if self.game_over {
            return false;
        }
        let Some(piece) = self.active else {
            return false;
        };

        let column = piece.column + d_column;
        let row = piece.row + d_row;
        if self.check_collision_for(piece.kind, column, row, piece.rotation) {
            return false;
        }

        self.active = Some(ActivePiece {
            column,
            row,
            ..piece
        });
        self.reset_lock_delay();
        true
    }

    /// Rotate with SRS kicks; state is unchanged if every kick collides
    pub fn rotate(&mut self, clockwise: bool) -> bool {
        if self.game_over {
            return false;
        }
        let Some(piece) = self.active else {
            return false;
        };

        let result = try_rotate(
            piece.kind,
            piece.rotation,
            piece.column,
            piece.row,
            clockwise,
            |c, r, rot| self.check_collision_for(piece.kind, c, r, rot),
        );

        let Some((rotation, (dx, dy))) = result else {
            return false;
        };

        self.active = Some(ActivePiece {
            column: piece.column + dx,
            row: piece.row + dy,
            rotation,
            last_move_rotation: piece.last_move_rotation || piece.kind == PieceKind::T,
            ..piece
        });
        self.reset_lock_delay();
        true
    }

    /// Swap the active piece into the hold slot, once per spawned piece
    pub fn hold(&mut self) -> bool {
        if self.game_over || !self.can_hold {
            return false;
        }
        let Some(piece) = self.active else {
            return false;
        };

        match self.hold.replace(piece.kind) {
            Some(held) => {
                self.place_new_piece(held);
            }
            None => {
                self.spawn();
            }
        }
        self.can_hold = false;
        true
    }

    /// Gravity step: fall one row or open the lock-delay window
    ///
    /// Never locks by itself.
    pub fn gravity_step(&mut self) -> bool {
        if self.game_over || self.active.is_none() {
            return false;
        }
        if self.move_piece(0, 1) {
            self.touching = false;
            self.lock_resets = 0;
            self.lock_timer_ms = 0;
            true
        } else {
            self.touching = true;
            false
        }
    }

    /// Advance the lock-delay timer; locks once it expires
    ///
    /// Returns true if the piece locked.
    pub fn tick_lock(&mut self, elapsed_ms: u32) -> bool {
        let Some(delay) = self.config.lock_delay_ms else {
            return false;
        };
        if self.game_over || !self.touching || self.active.is_none() {
            return false;
        }

        // A move may have lifted the piece off the stack.
        if let Some(piece) = self.active {
            if !self.check_collision_for(piece.kind, piece.column, piece.row + 1, piece.rotation)
            {
                self.touching = false;
                self.lock_timer_ms = 0;
                return false;
            }
        }

        self.lock_timer_ms = self.lock_timer_ms.saturating_add(elapsed_ms);
        if self.lock_timer_ms >= delay {
            self.lock();
            return true;
        }
        false
    }

    /// Drop straight down and lock
    pub fn hard_drop(&mut self) -> Option<DropInfo> {
        if self.game_over || self.active.is_none() {
            return None;
        }
        while self.move_piece(0, 1) {}

        let piece = self.active?;
        let info = DropInfo {
            kind: piece.kind,
            column: piece.column,
            row: piece.row,
            rotation: piece.rotation,
        };
        self.lock();
        Some(info)
    }

    /// Stamp the active piece, evaluate clears, then spawn the next piece
    pub fn lock(&mut self) -> Option<ClearResult> {
        if self.game_over {
            return None;
        }
        let piece = self.active.take()?;
        let color = piece.kind.color_id();
        for (c, r) in piece.cells() {
            // Cells above the top row are dropped.
            self.grid.set(c, r, color);
        }

        let result = self.clear_lines();
        if !self.game_over {
            self.spawn();
        }
        result
    }

    /// Remove full rows and update combo / back-to-back
    ///
    /// A non-clearing lock resets the combo and drains pending garbage oldest-first.
    pub fn clear_lines(&mut self) -> Option<ClearResult> {
        let cleared = self.grid.clear_full_rows().len();

        if cleared == 0 {
            self.combo = -1;
            self.last_clear = None;
            while !self.game_over {
                let Some(entry) = self.garbage.pop_front() else {
                    break;
                };
                self.apply_garbage(entry.lines, entry.sender);
            }
            return None;
        }

        self.combo += 1;
        let kind = ClearKind::from_lines(cleared.min(4)).unwrap_or(ClearKind::Tetris);
        self.back_to_back = kind == ClearKind::Tetris;

        let result = ClearResult {
            lines: cleared as u32,
            kind,
            combo: self.combo,
            back_to_back: self.back_to_back,
        };
        self.last_clear = Some(result);
        Some(result)
    }

    /// Queue incoming garbage for the next non-clearing lock
    pub fn receive_garbage(&mut self, lines: u32, sender: Option<PlayerId>) {
        if !self.game_over {
            self.garbage.push(lines, sender);
        }
    }

    /// Cancel an outgoing attack against this board's pending garbage
    ///
    /// Returns the lines left to send.
    pub fn offset_garbage(&mut self, attack: u32) -> u32 {
        self.garbage.offset(attack)
    }

    /// Push `amount` garbage rows in from the bottom right now
    ///
    /// Tops out (with `sender` as killer) if filled rows are pushed off the top, or if the
    /// active piece cannot be lifted clear of the risen stack.
    pub fn apply_garbage(&mut self, amount: u32, sender: Option<PlayerId>) {
        if amount == 0 {
            return;
        }

        let rows = self.economy.generate_garbage(amount, &mut self.hole_rng);
        if self.grid.push_rows_from_bottom(&rows) {
            self.game_over = true;
            self.killer = sender.clone();
        }

        let Some(piece) = self.active else {
            return;
        };
        if !self.check_collision_for(piece.kind, piece.column, piece.row, piece.rotation) {
            return;
        }

        let lift = (0..=MAX_GARBAGE_LIFT).find(|&lift| {
            !self.check_collision_for(piece.kind, piece.column, piece.row - lift, piece.rotation)
        });
        match lift {
            Some(lift) => {
                self.active = Some(ActivePiece {
                    row: piece.row - lift,
                    ..piece
                });
            }
            None => {
                self.game_over = true;
                self.killer = sender;
            }
        }
    }

    /// Place the active piece directly, skipping kick and collision checks
    ///
    /// Used by automated agents that already validated the placement.
    pub fn set_active_placement(&mut self, column: i8, rotation: Rotation) {
        if let Some(piece) = self.active.as_mut() {
            piece.column = column;
            piece.rotation = rotation;
        }
    }

    /// Row the active piece would come to rest at from `(column, row)`
    pub fn resting_row(&self, kind: PieceKind, column: i8, row: i8, rotation: Rotation) -> i8 {
        let mut r = row;
        while !self.check_collision_for(kind, column, r + 1, rotation) {
            r += 1;
        }
        r
    }

    /// Force the board into GameOver (tests and admin tooling)
    pub fn top_out(&mut self, killer: Option<PlayerId>) {
        self.game_over = true;
        self.killer = killer;
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            grid: self.grid.to_rows(),
            active: self.active.map(Into::into),
            next: self.next.iter().copied().collect(),
            hold: self.hold,
            game_over: self.game_over,
            pending_garbage: self.garbage.total(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EMPTY_CELL, GARBAGE_CELL};

    fn board() -> Board {
        Board::with_seed(12345)
    }

    /// Fill a row except for `hole`
    fn fill_row_except(board: &mut Board, row: i8, hole: Option<i8>) {
        for c in 0..BOARD_WIDTH as i8 {
            if Some(c) != hole {
                board.grid_mut().set(c, row, GARBAGE_CELL);
            }
        }
    }

    fn replace_active(board: &mut Board, kind: PieceKind) {
        board.active = Some(ActivePiece::spawn(kind));
    }

    #[test]
    fn new_board_spawns_at_spawn_point() {
        let b = board();
        let piece = b.active().copied().unwrap();
        assert_eq!((piece.column, piece.row), (SPAWN_COLUMN, SPAWN_ROW));
        assert_eq!(piece.rotation, Rotation::North);
        assert_eq!(b.next_queue().len(), NEXT_QUEUE_LEN);
        assert_eq!(b.combo(), -1);
        assert!(!b.is_game_over());
    }

    #[test]
    fn next_queue_shifts_on_each_spawn() {
        let mut b = board();
        for _ in 0..30 {
            let before = *b.next_queue();
            b.hard_drop();
            if b.is_game_over() {
                break;
            }
            assert_eq!(b.active().unwrap().kind, before[0]);
            assert_eq!(b.next_queue()[..NEXT_QUEUE_LEN - 1], before[1..]);
        }
    }

    #[test]
    fn move_respects_walls() {
        let mut b = board();
        let mut moved = 0;
        while b.move_piece(-1, 0) {
            moved += 1;
            assert!(moved < 10);
        }
        for (c, _) in b.active().unwrap().cells() {
            assert!(c >= 0);
        }
        assert!(!b.move_piece(-1, 0));
    }

    #[test]
    fn collision_above_top_only_checks_walls() {
        let mut b = board();
        replace_active(&mut b, PieceKind::T);
        b.grid_mut().set(4, 0, 1);
        assert!(!b.check_collision(3, -2, Rotation::North));
        assert!(b.check_collision(-2, -2, Rotation::North));
    }

    #[test]
    fn rotation_failure_leaves_state_unchanged() {
        let mut b = board();
        replace_active(&mut b, PieceKind::T);
        for r in 0..BOARD_HEIGHT as i8 {
            for c in 0..BOARD_WIDTH as i8 {
                let inside = b.active().unwrap().cells().contains(&(c, r));
                if !inside {
                    b.grid_mut().set(c, r, GARBAGE_CELL);
                }
            }
        }
        let before = *b.active().unwrap();
        assert!(!b.rotate(true));
        assert_eq!(*b.active().unwrap(), before);
    }

    #[test]
    fn t_rotation_sets_flag() {
        let mut b = board();
        replace_active(&mut b, PieceKind::T);
        b.move_piece(0, 2);
        assert!(b.rotate(true));
        assert!(b.active().unwrap().last_move_rotation);
    }

    #[test]
    fn o_rotation_changes_state_without_moving() {
        let mut b = board();
        replace_active(&mut b, PieceKind::O);
        assert!(b.rotate(true));
        let piece = b.active().unwrap();
        assert_eq!(piece.rotation, Rotation::East);
        assert_eq!((piece.column, piece.row), (SPAWN_COLUMN, SPAWN_ROW));
    }

    #[test]
    fn hard_drop_locks_at_floor_and_spawns() {
        let mut b = board();
        replace_active(&mut b, PieceKind::I);
        let info = b.hard_drop().unwrap();
        assert_eq!(info.kind, PieceKind::I);
        // Flat I occupies shape row 1, so the box rests at row 18.
        assert_eq!(info.row, 18);
        for c in 3..7 {
            assert_eq!(b.grid().get(c, 19), Some(PieceKind::I.color_id()));
        }
        assert!(b.active().is_some());
        assert!(b.can_hold());
    }

    #[test]
    fn single_clear_updates_combo_and_b2b() {
        let mut b = board();
        fill_row_except(&mut b, 19, Some(0));
        b.grid_mut().set(0, 19, 1);

        let result = b.clear_lines().unwrap();
        assert_eq!(result.lines, 1);
        assert_eq!(result.kind, ClearKind::Single);
        assert_eq!(result.combo, 0);
        assert!(!result.back_to_back);
        assert!(b.grid().is_row_empty(19));
    }

    #[test]
    fn tetris_sets_back_to_back_and_lesser_clear_resets_it() {
        let mut b = board();
        for r in 16..20 {
            fill_row_except(&mut b, r, None);
        }
        let result = b.clear_lines().unwrap();
        assert_eq!(result.kind, ClearKind::Tetris);
        assert!(result.back_to_back);
        assert!(b.back_to_back());

        fill_row_except(&mut b, 19, None);
        let result = b.clear_lines().unwrap();
        assert_eq!(result.combo, 1);
        assert!(!result.back_to_back);
    }

    #[test]
    fn non_clearing_lock_resets_combo_and_drains_buffer() {
        let mut b = board();
        fill_row_except(&mut b, 19, None);
        b.clear_lines();
        assert_eq!(b.combo(), 0);

        b.receive_garbage(2, Some(PlayerId::from("a")));
        b.receive_garbage(1, Some(PlayerId::from("b")));
        assert_eq!(b.clear_lines(), None);
        assert_eq!(b.combo(), -1);
        assert!(b.garbage().is_empty());
        assert!(!b.grid().is_row_empty(17));
        assert!(b.grid().is_row_empty(16));
    }

    #[test]
    fn garbage_on_empty_top_rows_is_safe() {
        let mut b = board();
        b.active = None;
        b.apply_garbage(3, Some(PlayerId::from("x")));
        assert!(!b.is_game_over());
        for r in 17..20 {
            let row = b.grid().row(r);
            assert_eq!(row.iter().filter(|&&c| c == EMPTY_CELL).count(), 1);
        }
    }

    #[test]
    fn garbage_pushing_filled_rows_off_top_kills() {
        let mut b = board();
        b.active = None;
        b.grid_mut().set(9, 1, 3);
        b.apply_garbage(2, Some(PlayerId::from("killer")));
        assert!(b.is_game_over());
        assert_eq!(b.killer(), Some(&PlayerId::from("killer")));
    }

    #[test]
    fn garbage_lifts_active_piece() {
        let mut b = board();
        replace_active(&mut b, PieceKind::O);
        while b.move_piece(0, 1) {}
        let row = b.active().unwrap().row;

        b.apply_garbage(2, None);
        assert!(!b.is_game_over());
        let piece = b.active().unwrap();
        assert_eq!(piece.row, row - 2);
        for (c, r) in piece.cells() {
            assert!(!b.grid().is_filled(c, r));
        }
    }

    #[test]
    fn hold_swaps_once_per_piece() {
        let mut b = board();
        let first = b.active().unwrap().kind;
        assert!(b.hold());
        assert_eq!(b.hold_piece(), Some(first));
        assert!(!b.hold());

        b.hard_drop();
        let current = b.active().unwrap().kind;
        assert!(b.hold());
        assert_eq!(b.active().unwrap().kind, first);
        assert_eq!(b.hold_piece(), Some(current));
    }

    #[test]
    fn spawn_collision_tops_out() {
        let mut b = board();
        for c in 0..BOARD_WIDTH as i8 {
            b.grid_mut().set(c, 0, GARBAGE_CELL);
            b.grid_mut().set(c, 1, GARBAGE_CELL);
        }
        assert!(!b.spawn());
        assert!(b.is_game_over());
        assert!(b.active().is_none());
        assert!(!b.move_piece(1, 0));
        assert_eq!(b.hard_drop(), None);
    }

    #[test]
    fn gravity_opens_lock_window_without_locking() {
        let mut b = board();
        while b.gravity_step() {}
        assert!(b.is_touching());
        assert!(b.active().is_some());
        assert!(b.grid().cells().iter().all(|&c| c == EMPTY_CELL));
    }

    #[test]
    fn lock_delay_expires_after_configured_time() {
        let mut b = board();
        while b.gravity_step() {}
        assert!(!b.tick_lock(LOCK_DELAY_MS - 100));
        assert!(b.tick_lock(100));
        assert!(b.grid().cells().iter().any(|&c| c != EMPTY_CELL));
    }

    #[test]
    fn moves_while_touching_reset_lock_delay_up_to_limit() {
        let mut b = board();
        replace_active(&mut b, PieceKind::O);
        while b.gravity_step() {}

        for _ in 0..MAX_LOCK_RESETS {
            assert!(b.move_piece(1, 0) || b.move_piece(-1, 0));
        }
        assert_eq!(b.lock_resets(), MAX_LOCK_RESETS);
        assert!(!b.tick_lock(LOCK_DELAY_MS - 1));

        // Further moves no longer extend the window.
        assert!(b.move_piece(1, 0) || b.move_piece(-1, 0));
        assert!(b.tick_lock(1));
    }

    #[test]
    fn disabled_lock_delay_never_locks() {
        let config = BoardConfig {
            lock_delay_ms: None,
            ..BoardConfig::default()
        };
        let mut b = Board::new(1, Arc::new(AttackEconomy::default()), config);
        while b.gravity_step() {}
        assert!(!b.tick_lock(10_000));
    }

    #[test]
    fn reset_restores_fresh_state() {
        let mut b = board();
        b.hard_drop();
        b.hold();
        b.receive_garbage(3, None);
        b.top_out(Some(PlayerId::from("z")));

        b.reset(99);
        assert!(!b.is_game_over());
        assert!(b.killer().is_none());
        assert!(b.hold_piece().is_none());
        assert!(b.garbage().is_empty());
        assert_eq!(b.combo(), -1);
        assert!(b.grid().cells().iter().all(|&c| c == EMPTY_CELL));
        assert!(b.active().is_some());
    }
}
