//! Shared data types and constants for the battle-royale engine
//!
//! Everything in this crate is plain data with no external dependencies, so it can be used
//! from the core simulation, the room orchestrator and the transport adapter alike.
//!
//! # Board Dimensions
//!
//! - **Width**: 10 columns (indexed 0-9)
//! - **Height**: 20 rows (indexed 0-19, row 0 is the top)
//! - **Spawn position**: column 3, row 0, rotation North
//!
//! # Cell Values
//!
//! | Value | Meaning |
//! |-------|---------|
//! | 0 | empty |
//! | 1-7 | piece color ([`PieceKind::color_id`]) |
//! | 8 | garbage |
//!
//! # Timing Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `BASE_GRAVITY_MS` | 1000 | Gravity cycle period |
//! | `LOGIC_TICK_MS` | 100 | Logic cycle period (eliminations, targeting) |
//! | `GARBAGE_DELAY_MS` | 500 | Delay between an attack event and garbage delivery |
//! | `LOCK_DELAY_MS` | 500 | Grace window before a grounded piece locks |
//! | `MAX_LOCK_RESETS` | 15 | Max lock-delay resets per piece |
//!
//! # Examples
//!
//! ```
//! use royale_types::{PieceKind, PlayerAction, Rotation, TargetingMode};
//!
//! assert_eq!(PieceKind::T.color_id(), 6);
//! assert_eq!(Rotation::North.rotate_cw(), Rotation::East);
//!
//! // Input strings are case-exact.
//! assert_eq!(PlayerAction::from_str("rotateCW"), Some(PlayerAction::RotateCw));
//! assert_eq!(PlayerAction::from_str("rotatecw"), None);
//!
//! assert_eq!(TargetingMode::default(), TargetingMode::Random);
//! ```

use std::fmt;

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: u8 = 10;

/// Board height in cells (20 rows)
pub const BOARD_HEIGHT: u8 = 20;

/// Empty grid cell
pub const EMPTY_CELL: Cell = 0;

/// Grid cell filled by incoming garbage
pub const GARBAGE_CELL: Cell = 8;

/// Spawn column of the piece bounding box
pub const SPAWN_COLUMN: i8 = 3;

/// Spawn row of the piece bounding box
pub const SPAWN_ROW: i8 = 0;

/// The next queue is topped up to at least this many entries after every dequeue
pub const NEXT_QUEUE_LEN: usize = 6;

/// Default gravity interval (1000ms per row)
pub const BASE_GRAVITY_MS: u32 = 1000;

/// Logic cycle period (eliminations, win detection, targeting)
pub const LOGIC_TICK_MS: u32 = 100;

/// Delay between an attack being reported and the garbage reaching the target
pub const GARBAGE_DELAY_MS: u32 = 500;

/// Lock delay once a piece is touching the surface
pub const LOCK_DELAY_MS: u32 = 500;

/// Maximum number of lock-delay resets per piece
pub const MAX_LOCK_RESETS: u8 = 15;

/// A cell on the grid, see the crate docs for the value table
pub type Cell = u8;

/// The seven tetromino piece kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PieceKind {
    I,
    J,
    L,
    O,
    S,
    T,
    Z,
}

impl PieceKind {
    /// All kinds in canonical bag order
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::J,
        PieceKind::L,
        PieceKind::O,
        PieceKind::S,
        PieceKind::T,
        PieceKind::Z,
    ];

    /// Color identifier stamped into the grid when this piece locks (1-7)
    pub fn color_id(self) -> Cell {
        match self {
            PieceKind::I => 1,
            PieceKind::J => 2,
            PieceKind::L => 3,
            PieceKind::O => 4,
            PieceKind::S => 5,
            PieceKind::T => 6,
            PieceKind::Z => 7,
        }
    }

    /// Parse an uppercase piece letter
    ///
    /// ```
    /// use royale_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("I"), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_str("x"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        PieceKind::ALL.into_iter().find(|k| k.as_str() == s)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PieceKind::I => "I",
            PieceKind::J => "J",
            PieceKind::L => "L",
            PieceKind::O => "O",
            PieceKind::S => "S",
            PieceKind::T => "T",
            PieceKind::Z => "Z",
        }
    }
}

/// Rotation states following SRS naming
///
/// Index 0 = North (spawn), 1 = East (R), 2 = South, 3 = West (L).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rotation {
    North,
    East,
    South,
    West,
}

impl Rotation {
    pub const ALL: [Rotation; 4] = [
        Rotation::North,
        Rotation::East,
        Rotation::South,
        Rotation::West,
    ];

    pub fn rotate_cw(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    pub fn rotate_ccw(self) -> Self {
        Self::from_index(self.index() + 3)
    }

    /// Rotation state as 0..=3
    pub fn index(self) -> u8 {
        match self {
            Rotation::North => 0,
            Rotation::East => 1,
            Rotation::South => 2,
            Rotation::West => 3,
        }
    }

    /// Build from any integer, taken modulo 4
    pub fn from_index(index: u8) -> Self {
        Rotation::ALL[(index % 4) as usize]
    }
}

/// Semantic input actions accepted from the transport layer
///
/// Parsing is case-exact; anything outside the vocabulary is ignored by callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerAction {
    Left,
    Right,
    Down,
    RotateCw,
    RotateCcw,
    Hold,
    HardDrop,
    SoftDrop,
    TargetRandom,
    TargetAttackers,
    TargetBadges,
    TargetKos,
}

impl PlayerAction {
    pub const ALL: [PlayerAction; 12] = [
        PlayerAction::Left,
        PlayerAction::Right,
        PlayerAction::Down,
        PlayerAction::RotateCw,
        PlayerAction::RotateCcw,
        PlayerAction::Hold,
        PlayerAction::HardDrop,
        PlayerAction::SoftDrop,
        PlayerAction::TargetRandom,
        PlayerAction::TargetAttackers,
        PlayerAction::TargetBadges,
        PlayerAction::TargetKos,
    ];

    /// Parse an input string (case-exact)
    ///
    /// ```
    /// use royale_types::PlayerAction;
    ///
    /// assert_eq!(PlayerAction::from_str("hardDrop"), Some(PlayerAction::HardDrop));
    /// assert_eq!(PlayerAction::from_str("targetKOs"), Some(PlayerAction::TargetKos));
    /// assert_eq!(PlayerAction::from_str("jump"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        PlayerAction::ALL.into_iter().find(|a| a.as_str() == s)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PlayerAction::Left => "left",
            PlayerAction::Right => "right",
            PlayerAction::Down => "down",
            PlayerAction::RotateCw => "rotateCW",
            PlayerAction::RotateCcw => "rotateCCW",
            PlayerAction::Hold => "hold",
            PlayerAction::HardDrop => "hardDrop",
            PlayerAction::SoftDrop => "softDrop",
            PlayerAction::TargetRandom => "targetRandom",
            PlayerAction::TargetAttackers => "targetAttackers",
            PlayerAction::TargetBadges => "targetBadges",
            PlayerAction::TargetKos => "targetKOs",
        }
    }

    /// Targeting-mode change carried by this action, if any
    pub fn targeting_mode(self) -> Option<TargetingMode> {
        match self {
            PlayerAction::TargetRandom => Some(TargetingMode::Random),
            PlayerAction::TargetAttackers => Some(TargetingMode::Attackers),
            PlayerAction::TargetBadges => Some(TargetingMode::Badges),
            PlayerAction::TargetKos => Some(TargetingMode::Kos),
            _ => None,
        }
    }
}

/// Policy a player uses to choose who receives its attacks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TargetingMode {
    #[default]
    Random,
    Attackers,
    Badges,
    Kos,
}

impl TargetingMode {
    pub fn as_str(self) -> &'static str {
        match self {
            TargetingMode::Random => "Random",
            TargetingMode::Attackers => "Attackers",
            TargetingMode::Badges => "Badges",
            TargetingMode::Kos => "KOs",
        }
    }
}

/// Line clear classification, by line count only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClearKind {
    Single,
    Double,
    Triple,
    Tetris,
}

impl ClearKind {
    /// Classify a clear of `lines` rows; `None` for 0 (or more than 4)
    pub fn from_lines(lines: usize) -> Option<Self> {
        match lines {
            1 => Some(ClearKind::Single),
            2 => Some(ClearKind::Double),
            3 => Some(ClearKind::Triple),
            4 => Some(ClearKind::Tetris),
            _ => None,
        }
    }

    pub fn lines(self) -> u32 {
        match self {
            ClearKind::Single => 1,
            ClearKind::Double => 2,
            ClearKind::Triple => 3,
            ClearKind::Tetris => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ClearKind::Single => "Single",
            ClearKind::Double => "Double",
            ClearKind::Triple => "Triple",
            ClearKind::Tetris => "Tetris",
        }
    }
}

/// Automated agent difficulty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Difficulty {
    Low,
    #[default]
    Medium,
    High,
}

impl Difficulty {
    /// Parse a difficulty string; anything unrecognized is `Medium`
    pub fn from_str_lossy(s: &str) -> Self {
        match s {
            "low" => Difficulty::Low,
            "high" => Difficulty::High,
            _ => Difficulty::Medium,
        }
    }

    /// Time between two placement decisions
    pub fn move_interval_ms(self) -> u32 {
        match self {
            Difficulty::Low => 1400,
            Difficulty::Medium => 850,
            Difficulty::High => 450,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Low => "low",
            Difficulty::Medium => "medium",
            Difficulty::High => "high",
        }
    }
}

/// Identity of a player within a room (assigned by the transport layer)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PlayerId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for PlayerId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity of a room in the registry
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomId(String);

impl RoomId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RoomId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
