//! Core simulation for the battle-royale engine - pure, deterministic, and testable
//!
//! Everything here is single-board logic with no notion of rooms, clocks or transport.
//! Given the same seed, a board replays identically.
//!
//! # Module Structure
//!
//! - [`rng`]: LCG generator and the 7-bag randomizer
//! - [`pieces`]: tetromino shapes and SRS wall kick tables
//! - [`grid`]: the 10x20 cell matrix with row clearing and bottom insertion
//! - [`garbage`]: FIFO buffer of pending incoming garbage with offset
//! - [`attack`]: table-driven attack calculation and garbage row generation
//! - [`board`]: the per-player piece state machine
//! - [`snapshot`]: copyable board views
//!
//! # Rules
//!
//! - **7-Bag Randomizer**: every batch of seven draws holds each kind exactly once
//! - **SRS Rotation**: kicks for JLSTZ and a separate I table; O never kicks
//! - **Lock Delay**: 500ms once grounded, up to 15 resets per piece
//! - **Hold**: once per spawned piece
//! - **Clears**: classified by line count only (Single/Double/Triple/Tetris)
//! - **Garbage**: one shared hole column per batch, applied between pieces
//!
//! # Example
//!
//! ```
//! use royale_core::Board;
//!
//! let mut board = Board::with_seed(12345);
//! board.move_piece(-1, 0);
//! board.rotate(true);
//! let drop = board.hard_drop().unwrap();
//! assert!(drop.row > 0);
//!
//! // One piece on an empty board clears nothing.
//! assert!(board.last_clear().is_none());
//! assert_eq!(board.combo(), -1);
//! ```

pub mod attack;
pub mod board;
pub mod garbage;
pub mod grid;
pub mod pieces;
pub mod rng;
pub mod snapshot;

pub use royale_types as types;

pub use attack::{AttackEconomy, AttackTables};
pub use board::{ActivePiece, Board, BoardConfig, ClearResult, DropInfo};
pub use garbage::{GarbageQueue, PendingGarbage};
pub use grid::{Grid, Row};
pub use pieces::{get_shape, kick_offsets, try_rotate};
pub use rng::{SevenBag, SimpleRng};
pub use snapshot::{ActiveSnapshot, BoardSnapshot};
